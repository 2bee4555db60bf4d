use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AuthUser;
use valora_core::envelope::{ApiResponse, Paginated};

use crate::domain::types::Review;
use crate::error::StoreError;
use crate::handlers::PageQuery;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewUseCase, DeleteReviewUseCase, ListReviewsUseCase, UpdateReviewUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub verified: bool,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            product_id: review.product_id,
            user_id: review.user_id,
            user_name: review.user_name,
            rating: review.rating,
            comment: review.comment,
            verified: review.verified,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

// ── GET /api/products/{id}/reviews ───────────────────────────────────────────

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<ApiResponse<Paginated<ReviewResponse>>, StoreError> {
    let uc = ListReviewsUseCase {
        reviews: state.review_repo(),
        products: state.product_repo(),
    };
    let reviews = uc.execute(product_id, query.request()).await?;
    Ok(ApiResponse::ok(reviews.map(ReviewResponse::from).into()))
}

// ── POST /api/products/{id}/reviews ──────────────────────────────────────────

pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> Result<(StatusCode, ApiResponse<ReviewResponse>), StoreError> {
    let uc = CreateReviewUseCase {
        reviews: state.review_repo(),
        products: state.product_repo(),
        users: state.user_repo(),
        orders: state.order_repo(),
    };
    let review = uc
        .execute(auth.user_id, product_id, body.rating, &body.comment)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(review.into(), "review added"),
    ))
}

// ── PUT /api/reviews/{id} ────────────────────────────────────────────────────

pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewRequest>,
) -> Result<ApiResponse<ReviewResponse>, StoreError> {
    let uc = UpdateReviewUseCase {
        reviews: state.review_repo(),
        products: state.product_repo(),
    };
    let review = uc
        .execute(auth.user_id, id, body.rating, &body.comment)
        .await?;
    Ok(ApiResponse::with_message(review.into(), "review updated"))
}

// ── DELETE /api/reviews/{id} ─────────────────────────────────────────────────

pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = DeleteReviewUseCase {
        reviews: state.review_repo(),
        products: state.product_repo(),
    };
    uc.execute(auth.user_id, auth.is_admin(), id).await?;
    Ok(ApiResponse::message("review deleted"))
}

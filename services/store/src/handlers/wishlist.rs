use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use valora_auth_types::identity::AuthUser;
use valora_core::envelope::ApiResponse;

use crate::domain::types::WishlistEntry;
use crate::error::StoreError;
use crate::handlers::product::ProductResponse;
use crate::state::AppState;
use crate::usecase::wishlist::{
    AddToWishlistUseCase, ClearWishlistUseCase, GetWishlistUseCase, MoveToCartUseCase,
    RemoveFromWishlistUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntryResponse {
    pub product: ProductResponse,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub added_at: DateTime<Utc>,
}

fn to_responses(entries: Vec<WishlistEntry>) -> Vec<WishlistEntryResponse> {
    entries
        .into_iter()
        .map(|entry| WishlistEntryResponse {
            product: entry.product.into(),
            added_at: entry.added_at,
        })
        .collect()
}

// ── GET /api/wishlist ────────────────────────────────────────────────────────

pub async fn get_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<WishlistEntryResponse>>, StoreError> {
    let uc = GetWishlistUseCase {
        wishlists: state.wishlist_repo(),
    };
    Ok(ApiResponse::ok(to_responses(uc.execute(auth.user_id).await?)))
}

// ── POST /api/wishlist/{productId} ───────────────────────────────────────────

pub async fn add_to_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<WishlistEntryResponse>>, StoreError> {
    let uc = AddToWishlistUseCase {
        wishlists: state.wishlist_repo(),
        products: state.product_repo(),
    };
    let entries = uc.execute(auth.user_id, product_id).await?;
    Ok(ApiResponse::with_message(
        to_responses(entries),
        "added to wishlist",
    ))
}

// ── DELETE /api/wishlist/{productId} ─────────────────────────────────────────

pub async fn remove_from_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<WishlistEntryResponse>>, StoreError> {
    let uc = RemoveFromWishlistUseCase {
        wishlists: state.wishlist_repo(),
    };
    let entries = uc.execute(auth.user_id, product_id).await?;
    Ok(ApiResponse::with_message(
        to_responses(entries),
        "removed from wishlist",
    ))
}

// ── DELETE /api/wishlist ─────────────────────────────────────────────────────

pub async fn clear_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = ClearWishlistUseCase {
        wishlists: state.wishlist_repo(),
    };
    uc.execute(auth.user_id).await?;
    Ok(ApiResponse::message("wishlist cleared"))
}

// ── POST /api/wishlist/{productId}/move-to-cart ──────────────────────────────

pub async fn move_to_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<ApiResponse<Vec<WishlistEntryResponse>>, StoreError> {
    let uc = MoveToCartUseCase {
        wishlists: state.wishlist_repo(),
        cart: state.cart_repo(),
        products: state.product_repo(),
    };
    let entries = uc.execute(auth.user_id, product_id).await?;
    Ok(ApiResponse::with_message(
        to_responses(entries),
        "moved to cart",
    ))
}

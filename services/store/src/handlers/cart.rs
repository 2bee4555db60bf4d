use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AuthUser;
use valora_core::envelope::ApiResponse;

use crate::domain::types::CartLine;
use crate::error::StoreError;
use crate::handlers::product::ProductResponse;
use crate::state::AppState;
use crate::usecase::cart::{
    AddToCartUseCase, CartView, ClearCartUseCase, GetCartUseCase, RemoveCartItemUseCase,
    SyncCartUseCase, UpdateCartItemUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub product: ProductResponse,
    pub quantity: i32,
    /// `null` for coming-soon products.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub line_total: Option<Decimal>,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub added_at: DateTime<Utc>,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            line_total: line.line_total(),
            quantity: line.quantity,
            added_at: line.added_at,
            product: line.product.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub item_count: i32,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        Self {
            items: view.lines.into_iter().map(CartLineResponse::from).collect(),
            subtotal: view.subtotal,
            item_count: view.item_count,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

fn one() -> i32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[serde(default = "one")]
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Deserialize)]
pub struct SyncCartRequest {
    #[serde(default)]
    pub items: Vec<SyncItem>,
}

// ── GET /api/cart ────────────────────────────────────────────────────────────

pub async fn get_cart(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<CartResponse>, StoreError> {
    let uc = GetCartUseCase {
        cart: state.cart_repo(),
    };
    Ok(ApiResponse::ok(uc.execute(auth.user_id).await?.into()))
}

// ── POST /api/cart/items ─────────────────────────────────────────────────────

pub async fn add_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<AddItemRequest>,
) -> Result<ApiResponse<CartResponse>, StoreError> {
    let uc = AddToCartUseCase {
        cart: state.cart_repo(),
        products: state.product_repo(),
    };
    let cart = uc
        .execute(auth.user_id, body.product_id, body.quantity)
        .await?;
    Ok(ApiResponse::with_message(cart.into(), "added to cart"))
}

// ── PUT /api/cart/items/{productId} ──────────────────────────────────────────

pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<ApiResponse<CartResponse>, StoreError> {
    let uc = UpdateCartItemUseCase {
        cart: state.cart_repo(),
        products: state.product_repo(),
    };
    let cart = uc.execute(auth.user_id, product_id, body.quantity).await?;
    Ok(ApiResponse::with_message(cart.into(), "cart updated"))
}

// ── DELETE /api/cart/items/{productId} ───────────────────────────────────────

pub async fn remove_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<ApiResponse<CartResponse>, StoreError> {
    let uc = RemoveCartItemUseCase {
        cart: state.cart_repo(),
    };
    let cart = uc.execute(auth.user_id, product_id).await?;
    Ok(ApiResponse::with_message(cart.into(), "removed from cart"))
}

// ── DELETE /api/cart ─────────────────────────────────────────────────────────

pub async fn clear_cart(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = ClearCartUseCase {
        cart: state.cart_repo(),
    };
    uc.execute(auth.user_id).await?;
    Ok(ApiResponse::message("cart cleared"))
}

// ── POST /api/cart/sync ──────────────────────────────────────────────────────

pub async fn sync_cart(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<SyncCartRequest>,
) -> Result<ApiResponse<CartResponse>, StoreError> {
    let uc = SyncCartUseCase {
        cart: state.cart_repo(),
        products: state.product_repo(),
    };
    let items = body
        .items
        .into_iter()
        .map(|item| (item.product_id, item.quantity))
        .collect();
    let cart = uc.execute(auth.user_id, items).await?;
    Ok(ApiResponse::with_message(cart.into(), "cart synced"))
}

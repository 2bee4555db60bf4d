use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AuthUser;
use valora_core::envelope::{ApiResponse, Paginated};
use valora_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use valora_domain::pagination::PageRequest;
use valora_domain::product::Category;

use crate::domain::types::{Order, OrderItem, ShippingAddress};
use crate::error::StoreError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::order::{
    CancelOrderUseCase, GetOrderUseCase, ListMyOrdersUseCase, OrderItemRequest, PlaceOrderInput,
    PlaceOrderUseCase, ShippingChoice,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: Option<Uuid>,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            quantity: item.quantity,
            image: item.image,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub items: Vec<OrderItemResponse>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_charge: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub notes: Option<String>,
    pub can_cancel: bool,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            can_cancel: order.status.can_cancel(),
            order_number: order.order_number,
            user_id: order.user_id,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            status: order.status,
            payment_status: order.payment_status,
            subtotal: order.subtotal,
            shipping_charge: order.shipping_charge,
            total: order.total,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderItem {
    pub product_id: Option<Uuid>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub category: Option<Category>,
    pub quantity: i32,
}

impl From<PlaceOrderItem> for OrderItemRequest {
    fn from(item: PlaceOrderItem) -> Self {
        Self {
            product_id: item.product_id,
            slug: item.slug,
            name: item.name,
            category: item.category,
            quantity: item.quantity,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub items: Vec<PlaceOrderItem>,
    pub shipping_address: Option<ShippingAddress>,
    /// Takes precedence over `shippingAddress`.
    pub address_id: Option<Uuid>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl PlaceOrderRequest {
    fn into_input(self) -> Result<PlaceOrderInput, StoreError> {
        let shipping = match (self.address_id, self.shipping_address) {
            (Some(id), _) => ShippingChoice::Saved(id),
            (None, Some(address)) => ShippingChoice::Inline(address),
            (None, None) => return Err(StoreError::validation("shipping address is required")),
        };
        Ok(PlaceOrderInput {
            items: self.items.into_iter().map(OrderItemRequest::from).collect(),
            shipping,
            payment_method: self.payment_method,
            notes: self.notes,
        })
    }
}

#[derive(Deserialize)]
pub struct MyOrdersQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ── POST /api/orders ─────────────────────────────────────────────────────────

pub async fn place_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, ApiResponse<OrderResponse>), StoreError> {
    let uc = PlaceOrderUseCase {
        orders: state.order_repo(),
        products: state.product_repo(),
        users: state.user_repo(),
        addresses: state.address_repo(),
        settings: state.settings_repo(),
    };
    let order = uc.execute(auth.user_id, body.into_input()?).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(order.into(), "order placed"),
    ))
}

// ── GET /api/orders ──────────────────────────────────────────────────────────

pub async fn list_my_orders(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<MyOrdersQuery>,
) -> Result<ApiResponse<Paginated<OrderResponse>>, StoreError> {
    let status = parse_query(query.status.as_deref(), "status")?;
    let uc = ListMyOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = uc
        .execute(
            auth.user_id,
            status,
            PageRequest::from_query(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::ok(orders.map(OrderResponse::from).into()))
}

// ── GET /api/orders/{id} ─────────────────────────────────────────────────────

pub async fn get_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<OrderResponse>, StoreError> {
    let uc = GetOrderUseCase {
        orders: state.order_repo(),
    };
    let order = uc.execute(auth.user_id, auth.is_admin(), id).await?;
    Ok(ApiResponse::ok(order.into()))
}

// ── PUT /api/orders/{id}/cancel ──────────────────────────────────────────────

pub async fn cancel_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<OrderResponse>, StoreError> {
    let uc = CancelOrderUseCase {
        orders: state.order_repo(),
    };
    let order = uc.execute(auth.user_id, id).await?;
    Ok(ApiResponse::with_message(order.into(), "order cancelled"))
}

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AdminUser;
use valora_core::envelope::{ApiResponse, Paginated};
use valora_domain::order::{OrderStatus, PaymentStatus};
use valora_domain::pagination::PageRequest;
use valora_domain::user::UserRole;

use crate::domain::types::{DashboardStats, MonthlySales};
use crate::error::StoreError;
use crate::handlers::auth::UserResponse;
use crate::handlers::order::OrderResponse;
use crate::handlers::parse_query;
use crate::handlers::product::{ProductResponse, to_responses};
use crate::state::AppState;
use crate::usecase::admin::{
    ChangeUserRoleUseCase, DashboardStatsUseCase, DeleteUserUseCase, InventoryUseCase,
    ListOrdersUseCase, ListUsersUseCase, MonthlySalesUseCase, UpdateOrderStatusUseCase,
    UpdatePaymentStatusUseCase,
};

// ── Reports ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: u64,
    pub total_products: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub out_of_stock: u64,
    pub low_stock: u64,
    pub unread_notifications: u64,
}

impl From<DashboardStats> for StatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_users: stats.total_users,
            total_products: stats.total_products,
            total_orders: stats.total_orders,
            pending_orders: stats.pending_orders,
            total_revenue: stats.total_revenue,
            out_of_stock: stats.out_of_stock,
            low_stock: stats.low_stock,
            unread_notifications: stats.unread_notifications,
        }
    }
}

#[derive(Serialize)]
pub struct MonthResponse {
    pub month: u32,
    pub orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

impl From<MonthlySales> for MonthResponse {
    fn from(m: MonthlySales) -> Self {
        Self {
            month: m.month,
            orders: m.orders,
            revenue: m.revenue,
        }
    }
}

#[derive(Serialize)]
pub struct SalesResponse {
    pub year: i32,
    pub months: Vec<MonthResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub threshold: i32,
    pub out_of_stock: Vec<ProductResponse>,
    pub low_stock: Vec<ProductResponse>,
}

#[derive(Deserialize)]
pub struct SalesQuery {
    pub year: Option<String>,
}

#[derive(Deserialize)]
pub struct InventoryQuery {
    pub threshold: Option<String>,
}

// ── GET /api/admin/stats ─────────────────────────────────────────────────────

pub async fn stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<StatsResponse>, StoreError> {
    let uc = DashboardStatsUseCase {
        users: state.user_repo(),
        products: state.product_repo(),
        orders: state.order_repo(),
        notifications: state.notification_repo(),
    };
    Ok(ApiResponse::ok(uc.execute().await?.into()))
}

// ── GET /api/admin/sales ─────────────────────────────────────────────────────

pub async fn sales(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> Result<ApiResponse<SalesResponse>, StoreError> {
    let year = parse_query(query.year.as_deref(), "year")?;
    let uc = MonthlySalesUseCase {
        orders: state.order_repo(),
    };
    let (year, months) = uc.execute(year).await?;
    Ok(ApiResponse::ok(SalesResponse {
        year,
        months: months.into_iter().map(MonthResponse::from).collect(),
    }))
}

// ── GET /api/admin/inventory ─────────────────────────────────────────────────

pub async fn inventory(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> Result<ApiResponse<InventoryResponse>, StoreError> {
    let threshold = parse_query(query.threshold.as_deref(), "threshold")?;
    let uc = InventoryUseCase {
        products: state.product_repo(),
    };
    let report = uc.execute(threshold).await?;
    Ok(ApiResponse::ok(InventoryResponse {
        threshold: report.threshold,
        out_of_stock: to_responses(report.out_of_stock),
        low_stock: to_responses(report.low_stock),
    }))
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminOrdersQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

// ── GET /api/admin/orders ────────────────────────────────────────────────────

pub async fn list_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<AdminOrdersQuery>,
) -> Result<ApiResponse<Paginated<OrderResponse>>, StoreError> {
    let status = parse_query(query.status.as_deref(), "status")?;
    let uc = ListOrdersUseCase {
        orders: state.order_repo(),
    };
    let orders = uc
        .execute(
            status,
            query.search,
            PageRequest::from_query(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::ok(orders.map(OrderResponse::from).into()))
}

// ── PUT /api/admin/orders/{id}/status ────────────────────────────────────────

pub async fn update_order_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<OrderStatusRequest>,
) -> Result<ApiResponse<OrderResponse>, StoreError> {
    let uc = UpdateOrderStatusUseCase {
        orders: state.order_repo(),
    };
    let order = uc.execute(id, body.status).await?;
    Ok(ApiResponse::with_message(order.into(), "order status updated"))
}

// ── PUT /api/admin/orders/{id}/payment ───────────────────────────────────────

pub async fn update_payment_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentStatusRequest>,
) -> Result<ApiResponse<OrderResponse>, StoreError> {
    let uc = UpdatePaymentStatusUseCase {
        orders: state.order_repo(),
    };
    let order = uc.execute(id, body.payment_status).await?;
    Ok(ApiResponse::with_message(order.into(), "payment status updated"))
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: UserRole,
}

// ── GET /api/admin/users ─────────────────────────────────────────────────────

pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<ApiResponse<Paginated<UserResponse>>, StoreError> {
    let uc = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = uc
        .execute(
            query.search.as_deref(),
            PageRequest::from_query(query.page, query.limit),
        )
        .await?;
    Ok(ApiResponse::ok(users.map(UserResponse::from).into()))
}

// ── PUT /api/admin/users/{id}/role ───────────────────────────────────────────

pub async fn change_user_role(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<RoleRequest>,
) -> Result<ApiResponse<UserResponse>, StoreError> {
    let uc = ChangeUserRoleUseCase {
        users: state.user_repo(),
    };
    let user = uc.execute(actor.user_id, id, body.role).await?;
    Ok(ApiResponse::with_message(user.into(), "role updated"))
}

// ── DELETE /api/admin/users/{id} ─────────────────────────────────────────────

pub async fn delete_user(
    AdminUser(actor): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = DeleteUserUseCase {
        users: state.user_repo(),
        orders: state.order_repo(),
        reviews: state.review_repo(),
        products: state.product_repo(),
    };
    uc.execute(actor.user_id, id).await?;
    Ok(ApiResponse::message("user deleted"))
}

use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AdminUser;
use valora_core::envelope::{ApiResponse, Paginated};
use valora_domain::pagination::PageRequest;

use crate::domain::types::Notification;
use crate::error::StoreError;
use crate::handlers::parse_query;
use crate::state::AppState;
use crate::usecase::notification::{
    DeleteNotificationUseCase, ListNotificationsUseCase, MarkAllNotificationsReadUseCase,
    MarkNotificationReadUseCase, UnreadCountUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    pub order_id: Option<Uuid>,
    pub is_read: bool,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind.as_str(),
            title: n.title,
            message: n.message,
            order_id: n.order_id,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct NotificationsQuery {
    pub unread: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

// ── GET /api/admin/notifications ─────────────────────────────────────────────

pub async fn list_notifications(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Result<ApiResponse<Paginated<NotificationResponse>>, StoreError> {
    let unread_only = parse_query::<bool>(query.unread.as_deref(), "unread")?.unwrap_or(false);
    let uc = ListNotificationsUseCase {
        notifications: state.notification_repo(),
    };
    let page = uc
        .execute(unread_only, PageRequest::from_query(query.page, query.limit))
        .await?;
    Ok(ApiResponse::ok(page.map(NotificationResponse::from).into()))
}

// ── GET /api/admin/notifications/unread-count ────────────────────────────────

pub async fn unread_count(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<CountResponse>, StoreError> {
    let uc = UnreadCountUseCase {
        notifications: state.notification_repo(),
    };
    let count = uc.execute().await?;
    Ok(ApiResponse::ok(CountResponse { count }))
}

// ── PUT /api/admin/notifications/{id} ────────────────────────────────────────

pub async fn mark_read(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = MarkNotificationReadUseCase {
        notifications: state.notification_repo(),
    };
    uc.execute(id).await?;
    Ok(ApiResponse::message("notification marked as read"))
}

// ── PUT /api/admin/notifications/read-all ────────────────────────────────────

pub async fn mark_all_read(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<UpdatedResponse>, StoreError> {
    let uc = MarkAllNotificationsReadUseCase {
        notifications: state.notification_repo(),
    };
    let updated = uc.execute().await?;
    Ok(ApiResponse::with_message(
        UpdatedResponse { updated },
        "all notifications marked as read",
    ))
}

// ── DELETE /api/admin/notifications/{id} ─────────────────────────────────────

pub async fn delete_notification(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = DeleteNotificationUseCase {
        notifications: state.notification_repo(),
    };
    uc.execute(id).await?;
    Ok(ApiResponse::message("notification deleted"))
}

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AuthUser;
use valora_core::envelope::ApiResponse;
use valora_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::StoreError;
use crate::state::AppState;
use crate::usecase::auth::{
    AuthSession, ChangePasswordUseCase, GetMeUseCase, LoginUseCase, RegisterInput,
    RegisterUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
    /// Unix seconds.
    pub expires_at: u64,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ── POST /api/auth/register ──────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, ApiResponse<SessionResponse>), StoreError> {
    let uc = RegisterUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.0.clone(),
    };
    let session = uc
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            phone: body.phone,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(session.into(), "registration successful"),
    ))
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse<SessionResponse>, StoreError> {
    let uc = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.0.clone(),
    };
    let session = uc.execute(&body.email, &body.password).await?;
    Ok(ApiResponse::with_message(session.into(), "login successful"))
}

// ── GET /api/auth/me ─────────────────────────────────────────────────────────

pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<UserResponse>, StoreError> {
    let uc = GetMeUseCase {
        users: state.user_repo(),
    };
    let user = uc.execute(auth.user_id).await?;
    Ok(ApiResponse::ok(user.into()))
}

// ── PUT /api/auth/me ─────────────────────────────────────────────────────────

pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<ApiResponse<UserResponse>, StoreError> {
    let uc = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = uc
        .execute(
            auth.user_id,
            UpdateProfileInput {
                name: body.name,
                phone: body.phone,
            },
        )
        .await?;
    Ok(ApiResponse::with_message(user.into(), "profile updated"))
}

// ── PUT /api/auth/password ───────────────────────────────────────────────────

pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = ChangePasswordUseCase {
        users: state.user_repo(),
    };
    uc.execute(auth.user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(ApiResponse::message("password updated"))
}

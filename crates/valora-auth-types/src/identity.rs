//! Bearer-token identity extractors.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;
use uuid::Uuid;

use valora_core::error::error_response;
use valora_domain::user::UserRole;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret used to validate access tokens. Provide it from app state via `FromRef`.
#[derive(Clone)]
pub struct JwtSecret(pub Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Why a request was refused before reaching the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    AdminRequired,
}

impl AuthRejection {
    pub fn kind(self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "TOKEN_EXPIRED",
            Self::AdminRequired => "FORBIDDEN",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "not authorized, no token",
            Self::InvalidToken => "not authorized, token failed",
            Self::ExpiredToken => "not authorized, token expired",
            Self::AdminRequired => "admin access required",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Self::AdminRequired => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        error_response(self.status(), self.kind(), self.message())
    }
}

/// Caller identity taken from a valid `Authorization: Bearer <jwt>` header.
///
/// Returns 401 if the header is absent, not a bearer token, or fails validation.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn authenticate(parts: &Parts, secret: &JwtSecret) -> Result<AuthUser, AuthRejection> {
    let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;
    let info = validate_access_token(token, &secret.0).map_err(|e| {
        tracing::debug!(error = %e, "rejected access token");
        match e {
            AuthError::Expired => AuthRejection::ExpiredToken,
            _ => AuthRejection::InvalidToken,
        }
    })?;
    Ok(AuthUser {
        user_id: info.user_id,
        role: info.role,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`; do the work synchronously
    // and hand back a 'static future so no borrow of `parts` crosses the await.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(parts, &JwtSecret::from_ref(state));
        async move { result }
    }
}

/// An [`AuthUser`] whose role is `admin`. Returns 403 for authenticated non-admins.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = authenticate(parts, &JwtSecret::from_ref(state)).and_then(|user| {
            if user.is_admin() {
                Ok(AdminUser(user))
            } else {
                Err(AuthRejection::AdminRequired)
            }
        });
        async move { result }
    }
}

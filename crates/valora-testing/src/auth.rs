//! Signed-token helpers for tests.
//!
//! Requests to protected routes need a real `Authorization: Bearer` token signed with the
//! secret the router under test was built with. `MockAuth` issues one.

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use valora_auth_types::token::issue_access_token;
use valora_domain::user::UserRole;

/// JWT secret shared by test routers and [`MockAuth`].
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn user() -> Self {
        Self::new(Uuid::new_v4(), UserRole::User)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), UserRole::Admin)
    }

    /// A token signed with [`TEST_JWT_SECRET`].
    pub fn token(&self) -> String {
        let (token, _) = issue_access_token(self.user_id, self.role, TEST_JWT_SECRET)
            .expect("sign test token");
        token
    }

    /// The `Authorization` header as a (name, value) pair.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token()))
            .expect("bearer header value");
        (AUTHORIZATION, value)
    }
}

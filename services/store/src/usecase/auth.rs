use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use uuid::Uuid;

use valora_auth_types::token::issue_access_token;
use valora_domain::user::{MIN_PASSWORD_LEN, UserRole, normalize_email, validate_email};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::StoreError;

/// Hash a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::Internal(anyhow::anyhow!("hash password: {e}")))
}

/// `false` for a wrong password or an unparseable hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub(crate) fn check_password_len(password: &str) -> Result<(), StoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StoreError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn clean_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_owned())
        .filter(|p| !p.is_empty())
}

/// A signed-in user and their access token.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

fn start_session(user: User, secret: &str) -> Result<AuthSession, StoreError> {
    let (token, expires_at) = issue_access_token(user.id, user.role, secret)
        .map_err(|e| StoreError::Internal(anyhow::Error::new(e).context("issue access token")))?;
    Ok(AuthSession {
        user,
        token,
        expires_at,
    })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

pub struct RegisterUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: Arc<str>,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub async fn execute(&self, input: RegisterInput) -> Result<AuthSession, StoreError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("name is required"));
        }
        let email = normalize_email(&input.email);
        if !validate_email(&email) {
            return Err(StoreError::validation("a valid email is required"));
        }
        check_password_len(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(StoreError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            email,
            password_hash: hash_password(&input.password)?,
            phone: clean_phone(input.phone),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        start_session(user, &self.jwt_secret)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: Arc<str>,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(StoreError::InvalidCredentials)?;
        if !verify_password(password, &user.password_hash) {
            return Err(StoreError::InvalidCredentials);
        }
        start_session(user, &self.jwt_secret)
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetMeUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, StoreError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)
    }
}

pub struct UpdateProfileInput {
    pub name: Option<String>,
    /// An empty string clears the phone number.
    pub phone: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, StoreError> {
        if input.name.is_none() && input.phone.is_none() {
            return Err(StoreError::validation("nothing to update"));
        }
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;

        if let Some(name) = input.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(StoreError::validation("name cannot be empty"));
            }
            user.name = name.to_owned();
        }
        if input.phone.is_some() {
            user.phone = clean_phone(input.phone);
        }

        self.users
            .update_profile(user.id, &user.name, user.phone.as_deref())
            .await?;
        user.updated_at = Utc::now();
        Ok(user)
    }
}

pub struct ChangePasswordUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ChangePasswordUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        check_password_len(new_password)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(StoreError::IncorrectPassword);
        }
        let hash = hash_password(new_password)?;
        self.users.update_password(user.id, &hash).await
    }
}

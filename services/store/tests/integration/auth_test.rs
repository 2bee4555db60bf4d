use std::sync::Arc;

use valora_auth_types::token::validate_access_token;
use valora_domain::user::UserRole;
use valora_store::error::StoreError;
use valora_store::usecase::admin::{AdminProvision, CreateAdminUseCase};
use valora_store::usecase::auth::{
    ChangePasswordUseCase, LoginUseCase, RegisterInput, RegisterUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};
use valora_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{MemoryStore, TEST_PASSWORD, test_user};

fn secret() -> Arc<str> {
    Arc::from(TEST_JWT_SECRET)
}

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        name: "  Meera Iyer ".to_owned(),
        email: email.to_owned(),
        password: "s3cret-pass".to_owned(),
        phone: Some(" ".to_owned()),
    }
}

// ── RegisterUseCase ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_user_with_normalized_fields_and_token() {
    let store = MemoryStore::new();
    let uc = RegisterUseCase {
        users: store.clone(),
        jwt_secret: secret(),
    };

    let session = uc
        .execute(register_input("  Meera@Example.COM "))
        .await
        .unwrap();

    assert_eq!(session.user.name, "Meera Iyer");
    assert_eq!(session.user.email, "meera@example.com");
    assert_eq!(session.user.phone, None);
    assert_eq!(session.user.role, UserRole::User);
    assert_ne!(session.user.password_hash, "s3cret-pass");

    let claims = validate_access_token(&session.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.user_id, session.user.id);
    assert_eq!(claims.exp, session.expires_at);
    assert_eq!(store.tables().users.len(), 1);
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let existing = test_user();
    let store = MemoryStore::new().with_user(&existing);
    let uc = RegisterUseCase {
        users: store,
        jwt_secret: secret(),
    };

    let result = uc.execute(register_input(&existing.email)).await;
    assert!(
        matches!(result, Err(StoreError::EmailAlreadyExists)),
        "expected EmailAlreadyExists, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_short_password_and_bad_email() {
    let uc = RegisterUseCase {
        users: MemoryStore::new(),
        jwt_secret: secret(),
    };

    let mut short = register_input("meera@example.com");
    short.password = "12345".to_owned();
    assert!(matches!(uc.execute(short).await, Err(StoreError::Validation(_))));

    let result = uc.execute(register_input("not-an-email")).await;
    assert!(matches!(result, Err(StoreError::Validation(_))));
}

// ── LoginUseCase ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_case_insensitive_email() {
    let user = test_user();
    let uc = LoginUseCase {
        users: MemoryStore::new().with_user(&user),
        jwt_secret: secret(),
    };

    let session = uc
        .execute(&user.email.to_uppercase(), TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(session.user.id, user.id);
    assert!(session.expires_at > 0);
}

#[tokio::test]
async fn should_give_same_error_for_unknown_email_and_wrong_password() {
    let user = test_user();
    let uc = LoginUseCase {
        users: MemoryStore::new().with_user(&user),
        jwt_secret: secret(),
    };

    let wrong_password = uc.execute(&user.email, "not-the-password").await;
    let unknown = uc.execute("nobody@example.com", TEST_PASSWORD).await;
    assert!(matches!(wrong_password, Err(StoreError::InvalidCredentials)));
    assert!(matches!(unknown, Err(StoreError::InvalidCredentials)));
}

// ── Profile ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_name_and_clear_phone() {
    let mut user = test_user();
    user.phone = Some("9845012345".to_owned());
    let store = MemoryStore::new().with_user(&user);
    let uc = UpdateProfileUseCase {
        users: store.clone(),
    };

    let updated = uc
        .execute(
            user.id,
            UpdateProfileInput {
                name: Some("Asha R.".to_owned()),
                phone: Some(String::new()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Asha R.");
    assert_eq!(updated.phone, None);
    assert_eq!(store.tables().users[0].phone, None);
}

#[tokio::test]
async fn should_require_current_password_to_change_it() {
    let user = test_user();
    let store = MemoryStore::new().with_user(&user);
    let uc = ChangePasswordUseCase {
        users: store.clone(),
    };

    let result = uc.execute(user.id, "wrong", "brand-new-pass").await;
    assert!(matches!(result, Err(StoreError::IncorrectPassword)));

    uc.execute(user.id, TEST_PASSWORD, "brand-new-pass")
        .await
        .unwrap();
    let login = LoginUseCase {
        users: store,
        jwt_secret: secret(),
    };
    assert!(login.execute(&user.email, "brand-new-pass").await.is_ok());
}

// ── CreateAdminUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_admin_then_report_existing() {
    let store = MemoryStore::new();
    let uc = CreateAdminUseCase {
        users: store.clone(),
    };

    let created = uc
        .execute("Store Owner", "owner@valora.gold", "owner-pass")
        .await
        .unwrap();
    let AdminProvision::Created(id) = created else {
        panic!("expected Created, got {created:?}");
    };
    assert_eq!(store.tables().users[0].role, UserRole::Admin);

    let again = uc
        .execute("Store Owner", "OWNER@valora.gold", "ignored")
        .await
        .unwrap();
    assert_eq!(again, AdminProvision::AlreadyAdmin(id));
}

#[tokio::test]
async fn should_promote_existing_customer() {
    let user = test_user();
    let store = MemoryStore::new().with_user(&user);
    let uc = CreateAdminUseCase {
        users: store.clone(),
    };

    let result = uc.execute("", &user.email, "").await.unwrap();
    assert_eq!(result, AdminProvision::Promoted(user.id));
    assert_eq!(store.tables().users[0].role, UserRole::Admin);
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use valora_core::error::error_response;

/// Storefront service error variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("user already exists with this email")]
    EmailAlreadyExists,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("current password is incorrect")]
    IncorrectPassword,
    #[error("user not found")]
    UserNotFound,
    #[error("address not found")]
    AddressNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("product not found: {0}")]
    UnmatchedItem(String),
    #[error("a product with this slug already exists")]
    SlugAlreadyExists,
    #[error("{0} is coming soon and cannot be purchased yet")]
    ComingSoon(String),
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("the price of {0} has changed, please review your cart")]
    PriceChanged(String),
    #[error("only {available} of {name} left in stock")]
    InsufficientStock { name: String, available: i32 },
    #[error("item not found in cart")]
    CartItemNotFound,
    #[error("item not found in wishlist")]
    WishlistItemNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("order number already taken")]
    OrderNumberTaken,
    #[error("order can no longer be cancelled")]
    OrderNotCancellable,
    #[error("cannot change order status from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },
    #[error("review not found")]
    ReviewNotFound,
    #[error("you have already reviewed this product")]
    ReviewAlreadyExists,
    #[error("notification not found")]
    NotificationNotFound,
    #[error("user has orders and cannot be deleted")]
    UserHasOrders,
    #[error("you cannot change or delete your own account here")]
    SelfModification,
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("file exceeds the {limit_mib} MiB limit")]
    FileTooLarge { limit_mib: usize },
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::ProductNotFound | Self::UnmatchedItem(_) => "PRODUCT_NOT_FOUND",
            Self::SlugAlreadyExists => "SLUG_ALREADY_EXISTS",
            Self::ComingSoon(_) => "PRODUCT_COMING_SOON",
            Self::OutOfStock(_) => "OUT_OF_STOCK",
            Self::PriceChanged(_) => "PRICE_CHANGED",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            Self::WishlistItemNotFound => "WISHLIST_ITEM_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::OrderNumberTaken => "ORDER_NUMBER_CONFLICT",
            Self::OrderNotCancellable => "ORDER_NOT_CANCELLABLE",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::ReviewAlreadyExists => "REVIEW_ALREADY_EXISTS",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::UserHasOrders => "USER_HAS_ORDERS",
            Self::SelfModification => "SELF_MODIFICATION",
            Self::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE",
            Self::FileTooLarge { .. } => "FILE_TOO_LARGE",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::AddressNotFound
            | Self::ProductNotFound
            | Self::UnmatchedItem(_)
            | Self::CartItemNotFound
            | Self::WishlistItemNotFound
            | Self::OrderNotFound
            | Self::ReviewNotFound
            | Self::NotificationNotFound => StatusCode::NOT_FOUND,
            Self::OrderNumberTaken | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}

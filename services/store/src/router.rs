use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::Request,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use valora_core::health::{healthz, readiness};
use valora_core::middleware::{
    X_REQUEST_ID, cors_layer, propagate_request_id_layer, request_id_layer,
};

use crate::handlers::{
    address::{
        add_address, delete_address, list_addresses, set_default_address, update_address,
    },
    admin::{
        change_user_role, delete_user, inventory, list_orders, list_users, sales, stats,
        update_order_status, update_payment_status,
    },
    auth::{change_password, get_me, login, register, update_me},
    cart::{add_item, clear_cart, get_cart, remove_item, sync_cart, update_item},
    notification::{
        delete_notification, list_notifications, mark_all_read, mark_read, unread_count,
    },
    order::{cancel_order, get_order, list_my_orders, place_order},
    product::{
        create_product, delete_product, get_product, list_categories, list_products,
        update_product,
    },
    review::{create_review, delete_review, list_reviews, update_review},
    shipping::{get_shipping, set_shipping},
    upload::upload_images,
    wishlist::{
        add_to_wishlist, clear_wishlist, get_wishlist, move_to_cart, remove_from_wishlist,
    },
};
use crate::state::AppState;
use crate::usecase::upload::{MAX_FILES_PER_UPLOAD, MAX_UPLOAD_BYTES, UPLOADS_URL_PREFIX};

/// Multipart framing overhead allowed on top of the file bytes themselves.
const MULTIPART_SLACK_BYTES: usize = 1024 * 1024;

async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState, cors_origin: Option<&str>) -> Router {
    let uploads = ServeDir::new(&state.upload_dir);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth & profile
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(get_me).put(update_me))
        .route("/api/auth/password", put(change_password))
        .route("/api/auth/addresses", get(list_addresses).post(add_address))
        .route(
            "/api/auth/addresses/{id}",
            put(update_address).delete(delete_address),
        )
        .route("/api/auth/addresses/{id}/default", put(set_default_address))
        // Catalog
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/categories", get(list_categories))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        // Reviews
        .route(
            "/api/products/{id}/reviews",
            get(list_reviews).post(create_review),
        )
        .route("/api/reviews/{id}", put(update_review).delete(delete_review))
        // Cart
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_item))
        .route(
            "/api/cart/items/{product_id}",
            put(update_item).delete(remove_item),
        )
        .route("/api/cart/sync", post(sync_cart))
        // Wishlist
        .route("/api/wishlist", get(get_wishlist).delete(clear_wishlist))
        .route(
            "/api/wishlist/{product_id}",
            post(add_to_wishlist).delete(remove_from_wishlist),
        )
        .route("/api/wishlist/{product_id}/move-to-cart", post(move_to_cart))
        // Orders
        .route("/api/orders", get(list_my_orders).post(place_order))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/cancel", put(cancel_order))
        // Admin
        .route("/api/admin/stats", get(stats))
        .route("/api/admin/sales", get(sales))
        .route("/api/admin/inventory", get(inventory))
        .route("/api/admin/orders", get(list_orders))
        .route("/api/admin/orders/{id}/status", put(update_order_status))
        .route("/api/admin/orders/{id}/payment", put(update_payment_status))
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", delete(delete_user))
        .route("/api/admin/users/{id}/role", put(change_user_role))
        .route("/api/admin/notifications", get(list_notifications))
        .route("/api/admin/notifications/unread-count", get(unread_count))
        .route("/api/admin/notifications/read-all", put(mark_all_read))
        .route(
            "/api/admin/notifications/{id}",
            put(mark_read).delete(delete_notification),
        )
        // Shipping
        .route("/api/shipping", get(get_shipping).put(set_shipping))
        // Uploads
        .route(
            "/api/uploads",
            post(upload_images).layer(DefaultBodyLimit::max(
                MAX_FILES_PER_UPLOAD * MAX_UPLOAD_BYTES + MULTIPART_SLACK_BYTES,
            )),
        )
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                })
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(request_id_layer())
        .layer(cors_layer(cors_origin))
}

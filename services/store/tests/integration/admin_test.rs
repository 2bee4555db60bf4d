use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentStatus};
use valora_domain::pagination::PageRequest;
use valora_domain::user::UserRole;
use valora_store::domain::types::{Notification, NotificationKind};
use valora_store::error::StoreError;
use valora_store::usecase::admin::{
    ChangeUserRoleUseCase, DashboardStatsUseCase, DeleteUserUseCase, InventoryUseCase,
    ListOrdersUseCase, ListUsersUseCase, MonthlySalesUseCase, UpdateOrderStatusUseCase,
    UpdatePaymentStatusUseCase,
};
use valora_store::usecase::notification::{
    ListNotificationsUseCase, MarkAllNotificationsReadUseCase, MarkNotificationReadUseCase,
    UnreadCountUseCase,
};
use valora_store::usecase::review::CreateReviewUseCase;
use valora_store::usecase::shipping::{GetShippingChargeUseCase, SetShippingChargeUseCase};

use crate::helpers::{MemoryStore, test_admin, test_order, test_product, test_user};

// ── Reports ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_compute_dashboard_stats() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let mut sold_out = test_product("Kundan Choker", 9_000, 0);
    sold_out.in_stock = false;
    let store = MemoryStore::new()
        .with_user(&user)
        .with_product(&ring)
        .with_product(&sold_out)
        .with_product(&test_product("Temple Necklace", 80_000, 40))
        .with_order(&test_order(user.id, &ring, 1, OrderStatus::Pending))
        .with_order(&test_order(user.id, &ring, 2, OrderStatus::Delivered))
        .with_order(&test_order(user.id, &ring, 3, OrderStatus::Cancelled));
    let uc = DashboardStatsUseCase {
        users: store.clone(),
        products: store.clone(),
        orders: store.clone(),
        notifications: store.clone(),
    };

    let stats = uc.execute().await.unwrap();

    assert_eq!(stats.total_users, 1);
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.pending_orders, 1);
    assert_eq!(stats.total_revenue, Decimal::from(3_000));
    assert_eq!(stats.out_of_stock, 1);
    assert_eq!(stats.low_stock, 1);
    assert_eq!(stats.unread_notifications, 0);
}

#[tokio::test]
async fn should_zero_fill_monthly_sales() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new()
        .with_order(&test_order(user.id, &ring, 2, OrderStatus::Confirmed))
        .with_order(&test_order(user.id, &ring, 1, OrderStatus::Cancelled));
    let uc = MonthlySalesUseCase {
        orders: store.clone(),
    };

    let (year, months) = uc.execute(None).await.unwrap();

    let now = Utc::now();
    assert_eq!(year, now.year());
    assert_eq!(months.len(), 12);
    let current = &months[now.month0() as usize];
    assert_eq!(current.orders, 1);
    assert_eq!(current.revenue, Decimal::from(2_000));
    assert_eq!(
        months.iter().map(|m| m.orders).sum::<u64>(),
        1,
        "other months should be empty"
    );

    let (_, last_year) = uc.execute(Some(now.year() - 1)).await.unwrap();
    assert!(last_year.iter().all(|m| m.orders == 0));
}

#[tokio::test]
async fn should_report_inventory_with_threshold() {
    let store = MemoryStore::new()
        .with_product(&test_product("Aurora Ring", 1_000, 3))
        .with_product(&test_product("Jhumka Earrings", 500, 8))
        .with_product(&test_product("Kundan Choker", 9_000, 0));
    let uc = InventoryUseCase {
        products: store.clone(),
    };

    let default = uc.execute(None).await.unwrap();
    assert_eq!(default.threshold, 5);
    assert_eq!(default.low_stock.len(), 1);
    assert_eq!(default.out_of_stock.len(), 1);

    let wide = uc.execute(Some(10)).await.unwrap();
    assert_eq!(wide.low_stock.len(), 2);

    assert!(matches!(
        uc.execute(Some(0)).await,
        Err(StoreError::Validation(_))
    ));
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_advance_order_status_forward_only() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let order = test_order(user.id, &ring, 1, OrderStatus::Pending);
    let store = MemoryStore::new().with_product(&ring).with_order(&order);
    let uc = UpdateOrderStatusUseCase {
        orders: store.clone(),
    };

    let shipped = uc.execute(order.id, OrderStatus::Shipped).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let back = uc.execute(order.id, OrderStatus::Confirmed).await;
    assert!(
        matches!(back, Err(StoreError::InvalidStatusTransition { .. })),
        "expected InvalidStatusTransition, got {back:?}"
    );
    let cancel = uc.execute(order.id, OrderStatus::Cancelled).await;
    assert!(matches!(cancel, Err(StoreError::InvalidStatusTransition { .. })));
}

#[tokio::test]
async fn should_restore_stock_when_admin_cancels_processing_order() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let order = test_order(user.id, &ring, 2, OrderStatus::Processing);
    let store = MemoryStore::new().with_product(&ring).with_order(&order);

    let cancelled = UpdateOrderStatusUseCase {
        orders: store.clone(),
    }
    .execute(order.id, OrderStatus::Cancelled)
    .await
    .unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(store.product(ring.id).stock_count, 5);
    let t = store.tables();
    assert_eq!(t.notifications[0].kind, NotificationKind::OrderCancelled);
    assert!(t.notifications[0].message.contains("an admin"));
}

#[tokio::test]
async fn should_update_payment_status_and_search_orders() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let order = test_order(user.id, &ring, 1, OrderStatus::Pending);
    let store = MemoryStore::new()
        .with_order(&order)
        .with_order(&test_order(user.id, &ring, 2, OrderStatus::Pending));

    let paid = UpdatePaymentStatusUseCase {
        orders: store.clone(),
    }
    .execute(order.id, PaymentStatus::Paid)
    .await
    .unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let missing = UpdatePaymentStatusUseCase {
        orders: store.clone(),
    }
    .execute(Uuid::now_v7(), PaymentStatus::Paid)
    .await;
    assert!(matches!(missing, Err(StoreError::OrderNotFound)));

    let found = ListOrdersUseCase {
        orders: store.clone(),
    }
    .execute(None, Some("  test01 ".to_owned()), PageRequest::default())
    .await
    .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, order.id);
}

// ── Users ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_block_admin_from_changing_own_role() {
    let admin = test_admin();
    let user = test_user();
    let store = MemoryStore::new().with_user(&admin).with_user(&user);
    let uc = ChangeUserRoleUseCase {
        users: store.clone(),
    };

    assert!(matches!(
        uc.execute(admin.id, admin.id, UserRole::User).await,
        Err(StoreError::SelfModification)
    ));
    let promoted = uc.execute(admin.id, user.id, UserRole::Admin).await.unwrap();
    assert_eq!(promoted.role, UserRole::Admin);
}

#[tokio::test]
async fn should_delete_user_and_rerate_their_reviewed_products() {
    let admin = test_admin();
    let critic = test_user();
    let fan = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new()
        .with_user(&admin)
        .with_user(&critic)
        .with_user(&fan)
        .with_product(&ring);
    let review = CreateReviewUseCase {
        reviews: store.clone(),
        products: store.clone(),
        users: store.clone(),
        orders: store.clone(),
    };
    review.execute(critic.id, ring.id, 1, "Tarnished").await.unwrap();
    review.execute(fan.id, ring.id, 5, "Beautiful").await.unwrap();
    let uc = DeleteUserUseCase {
        users: store.clone(),
        orders: store.clone(),
        reviews: store.clone(),
        products: store.clone(),
    };

    assert!(matches!(
        uc.execute(admin.id, admin.id).await,
        Err(StoreError::SelfModification)
    ));
    uc.execute(admin.id, critic.id).await.unwrap();

    let product = store.product(ring.id);
    assert_eq!(product.num_reviews, 1);
    assert!((product.rating - 5.0).abs() < f64::EPSILON);
    assert!(matches!(
        uc.execute(admin.id, critic.id).await,
        Err(StoreError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_keep_customer_with_orders_and_their_sales() {
    let admin = test_admin();
    let buyer = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new()
        .with_user(&admin)
        .with_user(&buyer)
        .with_product(&ring)
        .with_order(&test_order(buyer.id, &ring, 2, OrderStatus::Delivered))
        .with_order(&test_order(buyer.id, &ring, 1, OrderStatus::Pending));
    let stats = DashboardStatsUseCase {
        users: store.clone(),
        products: store.clone(),
        orders: store.clone(),
        notifications: store.clone(),
    };
    let before = stats.execute().await.unwrap();
    let uc = DeleteUserUseCase {
        users: store.clone(),
        orders: store.clone(),
        reviews: store.clone(),
        products: store.clone(),
    };

    assert!(matches!(
        uc.execute(admin.id, buyer.id).await,
        Err(StoreError::UserHasOrders)
    ));

    let after = stats.execute().await.unwrap();
    assert_eq!(after.total_users, before.total_users);
    assert_eq!(after.total_orders, 2);
    assert_eq!(after.total_revenue, before.total_revenue);
    assert_eq!(after.total_revenue, Decimal::from(3_000));
    assert_eq!(store.product(ring.id).stock_count, 3);
}

#[tokio::test]
async fn should_search_users_by_name_or_email() {
    let admin = test_admin();
    let user = test_user();
    let store = MemoryStore::new().with_user(&admin).with_user(&user);
    let uc = ListUsersUseCase { users: store };

    let page = uc
        .execute(Some(" store owner "), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, admin.id);

    let everyone = uc.execute(Some("  "), PageRequest::default()).await.unwrap();
    assert_eq!(everyone.info.total, 2);
}

// ── Notifications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_track_unread_notifications() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new().with_product(&ring);
    for quantity in 1..=3 {
        let order = test_order(user.id, &ring, quantity, OrderStatus::Pending);
        store
            .tables()
            .notifications
            .push(Notification::new_order(&order, &user.name));
    }
    let first = store.tables().notifications[0].id;

    MarkNotificationReadUseCase {
        notifications: store.clone(),
    }
    .execute(first)
    .await
    .unwrap();
    let unread = UnreadCountUseCase {
        notifications: store.clone(),
    };
    assert_eq!(unread.execute().await.unwrap(), 2);

    let unread_page = ListNotificationsUseCase {
        notifications: store.clone(),
    }
    .execute(true, PageRequest::default())
    .await
    .unwrap();
    assert!(unread_page.items.iter().all(|n| !n.is_read));
    assert_eq!(unread_page.info.total, 2);

    let changed = MarkAllNotificationsReadUseCase {
        notifications: store.clone(),
    }
    .execute()
    .await
    .unwrap();
    assert_eq!(changed, 2);
    assert_eq!(unread.execute().await.unwrap(), 0);

    let missing = MarkNotificationReadUseCase {
        notifications: store.clone(),
    }
    .execute(Uuid::now_v7())
    .await;
    assert!(matches!(missing, Err(StoreError::NotificationNotFound)));
}

// ── Shipping ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_round_and_store_shipping_charge() {
    let store = MemoryStore::new();
    let set = SetShippingChargeUseCase {
        settings: store.clone(),
    };

    assert_eq!(
        GetShippingChargeUseCase {
            settings: store.clone()
        }
        .execute()
        .await
        .unwrap(),
        Decimal::ZERO
    );
    let stored = set.execute(Decimal::new(99_499, 3)).await.unwrap();
    assert_eq!(stored, Decimal::new(9_950, 2));
    assert!(matches!(
        set.execute(Decimal::new(-1, 0)).await,
        Err(StoreError::Validation(_))
    ));
    assert_eq!(store.tables().shipping_charge, Decimal::new(9_950, 2));
}

use rust_decimal::Decimal;
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use valora_domain::pagination::PageRequest;
use valora_domain::product::Category;
use valora_store::domain::repository::CartRepository;
use valora_store::domain::types::{Address, NotificationKind};
use valora_store::error::StoreError;
use valora_store::usecase::order::{
    CancelOrderUseCase, GetOrderUseCase, ListMyOrdersUseCase, OrderItemRequest, PlaceOrderInput,
    PlaceOrderUseCase, ShippingChoice,
};

use crate::helpers::{
    MemoryStore, Tables, coming_soon_product, test_address, test_order, test_product, test_user,
};

fn place_uc(
    store: &MemoryStore,
) -> PlaceOrderUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    PlaceOrderUseCase {
        orders: store.clone(),
        products: store.clone(),
        users: store.clone(),
        addresses: store.clone(),
        settings: store.clone(),
    }
}

fn by_id(id: Uuid, quantity: i32) -> OrderItemRequest {
    OrderItemRequest {
        product_id: Some(id),
        quantity,
        ..Default::default()
    }
}

fn input(items: Vec<OrderItemRequest>) -> PlaceOrderInput {
    PlaceOrderInput {
        items,
        shipping: ShippingChoice::Inline(test_address()),
        payment_method: PaymentMethod::Cod,
        notes: Some("  gift wrap please ".to_owned()),
    }
}

// ── PlaceOrderUseCase ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_place_order_and_apply_side_effects() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 12_500, 4);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);
    store.tables().shipping_charge = Decimal::from(99);
    store.set_quantity(user.id, ring.id, 2).await.unwrap();

    let order = place_uc(&store)
        .execute(user.id, input(vec![by_id(ring.id, 2)]))
        .await
        .unwrap();

    assert!(order.order_number.starts_with("VG-"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.subtotal, Decimal::from(25_000));
    assert_eq!(order.shipping_charge, Decimal::from(99));
    assert_eq!(order.total, Decimal::from(25_099));
    assert_eq!(order.notes.as_deref(), Some("gift wrap please"));
    assert_eq!(order.items[0].image.as_deref(), Some("/uploads/aurora-ring.jpg"));

    assert_eq!(store.product(ring.id).stock_count, 2);
    let t = store.tables();
    assert!(t.cart.is_empty(), "cart should be cleared");
    assert_eq!(t.notifications.len(), 1);
    assert_eq!(t.notifications[0].kind, NotificationKind::NewOrder);
    assert_eq!(t.outbox.len(), 1);
    assert_eq!(t.outbox[0].kind, "order_placed");
    assert_eq!(t.outbox[0].idempotency_key, format!("order_placed:{}", order.id));
}

#[tokio::test]
async fn should_match_items_by_slug_name_and_category() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 5);
    let mut bangle = test_product("Temple Bangle Set", 2_000, 5);
    bangle.category = Category::Bangles;
    let store = MemoryStore::new()
        .with_user(&user)
        .with_product(&ring)
        .with_product(&bangle);

    let items = vec![
        OrderItemRequest {
            slug: Some("aurora-ring".to_owned()),
            quantity: 1,
            ..Default::default()
        },
        OrderItemRequest {
            name: Some("temple bangle".to_owned()),
            category: Some(Category::Bangles),
            quantity: 1,
            ..Default::default()
        },
    ];
    let order = place_uc(&store).execute(user.id, input(items)).await.unwrap();

    let ids: Vec<_> = order.items.iter().map(|i| i.product_id).collect();
    assert_eq!(ids, vec![Some(ring.id), Some(bangle.id)]);
    assert_eq!(order.subtotal, Decimal::from(3_000));
}

#[tokio::test]
async fn should_merge_repeated_products_before_stock_check() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);

    let result = place_uc(&store)
        .execute(user.id, input(vec![by_id(ring.id, 2), by_id(ring.id, 2)]))
        .await;

    assert!(
        matches!(result, Err(StoreError::InsufficientStock { available: 3, .. })),
        "expected InsufficientStock, got {result:?}"
    );
    assert_eq!(store.product(ring.id).stock_count, 3);
    assert!(store.tables().orders.is_empty());
}

#[tokio::test]
async fn should_reject_unmatched_and_coming_soon_items() {
    let user = test_user();
    let preview = coming_soon_product("Celeste Pendant");
    let store = MemoryStore::new().with_user(&user).with_product(&preview);

    let unmatched = place_uc(&store)
        .execute(
            user.id,
            input(vec![OrderItemRequest {
                name: Some("Mystery Anklet".to_owned()),
                quantity: 1,
                ..Default::default()
            }]),
        )
        .await;
    assert!(
        matches!(&unmatched, Err(StoreError::UnmatchedItem(label)) if label == "Mystery Anklet"),
        "expected UnmatchedItem, got {unmatched:?}"
    );

    let coming_soon = place_uc(&store)
        .execute(user.id, input(vec![by_id(preview.id, 1)]))
        .await;
    assert!(matches!(coming_soon, Err(StoreError::ComingSoon(_))));
}

#[tokio::test]
async fn should_reject_order_when_price_changes_before_checkout_commits() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 5);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);
    let id = ring.id;
    store.tables().after_product_read = Some(Box::new(move |t: &mut Tables| {
        let p = t.products.iter_mut().find(|p| p.id == id).unwrap();
        p.price = Some(Decimal::from(1_400));
    }));

    let result = place_uc(&store)
        .execute(user.id, input(vec![by_id(ring.id, 2)]))
        .await;

    assert!(
        matches!(&result, Err(StoreError::PriceChanged(name)) if name == "Aurora Ring"),
        "expected PriceChanged, got {result:?}"
    );
    assert_eq!(store.product(ring.id).stock_count, 5);
    assert!(store.tables().orders.is_empty());
}

#[tokio::test]
async fn should_retry_once_with_fresh_order_number() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 5);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);
    store.tables().taken_order_numbers = 1;

    let order = place_uc(&store)
        .execute(user.id, input(vec![by_id(ring.id, 1)]))
        .await
        .unwrap();

    let t = store.tables();
    assert_eq!(t.orders.len(), 1);
    assert_eq!(t.orders[0].order_number, order.order_number);
    assert_eq!(t.notifications.len(), 1);
    assert_eq!(t.outbox.len(), 1);
}

#[tokio::test]
async fn should_give_up_after_second_order_number_collision() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 5);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);
    store.tables().taken_order_numbers = 2;

    let result = place_uc(&store)
        .execute(user.id, input(vec![by_id(ring.id, 1)]))
        .await;

    assert!(matches!(result, Err(StoreError::OrderNumberTaken)));
    assert_eq!(store.product(ring.id).stock_count, 5);
    assert!(store.tables().orders.is_empty());
}

#[tokio::test]
async fn should_reject_empty_order_and_zero_quantity() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);

    let empty = place_uc(&store).execute(user.id, input(vec![])).await;
    assert!(matches!(empty, Err(StoreError::Validation(_))));

    let zero = place_uc(&store)
        .execute(user.id, input(vec![by_id(ring.id, 0)]))
        .await;
    assert!(matches!(zero, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn should_use_saved_address_when_given() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new().with_user(&user).with_product(&ring);
    let mut saved = test_address();
    saved.city = "Mysuru".to_owned();
    let address = Address {
        id: Uuid::now_v7(),
        user_id: user.id,
        details: saved,
        is_default: true,
        created_at: chrono::Utc::now(),
    };
    store.tables().addresses.push(address.clone());

    let mut order_input = input(vec![by_id(ring.id, 1)]);
    order_input.shipping = ShippingChoice::Saved(address.id);
    let order = place_uc(&store).execute(user.id, order_input).await.unwrap();
    assert_eq!(order.shipping_address.city, "Mysuru");

    let mut missing = input(vec![by_id(ring.id, 1)]);
    missing.shipping = ShippingChoice::Saved(Uuid::now_v7());
    let result = place_uc(&store).execute(user.id, missing).await;
    assert!(matches!(result, Err(StoreError::AddressNotFound)));
}

// ── Queries ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_own_orders_filtered_by_status() {
    let user = test_user();
    let other = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let store = MemoryStore::new()
        .with_order(&test_order(user.id, &ring, 1, OrderStatus::Pending))
        .with_order(&test_order(user.id, &ring, 2, OrderStatus::Delivered))
        .with_order(&test_order(other.id, &ring, 1, OrderStatus::Pending));
    let uc = ListMyOrdersUseCase {
        orders: store.clone(),
    };

    let all = uc.execute(user.id, None, PageRequest::default()).await.unwrap();
    assert_eq!(all.info.total, 2);

    let pending = uc
        .execute(user.id, Some(OrderStatus::Pending), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(pending.items.len(), 1);
    assert_eq!(pending.items[0].user_id, user.id);
}

#[tokio::test]
async fn should_hide_order_from_other_customers_but_not_admins() {
    let owner = test_user();
    let ring = test_product("Aurora Ring", 1_000, 3);
    let order = test_order(owner.id, &ring, 1, OrderStatus::Pending);
    let uc = GetOrderUseCase {
        orders: MemoryStore::new().with_order(&order),
    };

    assert!(uc.execute(owner.id, false, order.id).await.is_ok());
    assert!(uc.execute(Uuid::now_v7(), true, order.id).await.is_ok());
    let result = uc.execute(Uuid::now_v7(), false, order.id).await;
    assert!(matches!(result, Err(StoreError::Forbidden)));
}

// ── CancelOrderUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_cancel_pending_order_and_restore_stock() {
    let user = test_user();
    let mut ring = test_product("Aurora Ring", 1_000, 0);
    ring.in_stock = false;
    let order = test_order(user.id, &ring, 2, OrderStatus::Pending);
    let store = MemoryStore::new().with_product(&ring).with_order(&order);
    let uc = CancelOrderUseCase {
        orders: store.clone(),
    };

    let cancelled = uc.execute(user.id, order.id).await.unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    let restocked = store.product(ring.id);
    assert_eq!(restocked.stock_count, 2);
    assert!(restocked.in_stock);
    let t = store.tables();
    assert_eq!(t.notifications.len(), 1);
    assert_eq!(t.notifications[0].kind, NotificationKind::OrderCancelled);
}

#[tokio::test]
async fn should_refund_paid_online_order_on_cancel() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 5);
    let mut order = test_order(user.id, &ring, 1, OrderStatus::Confirmed);
    order.payment_method = PaymentMethod::Online;
    order.payment_status = PaymentStatus::Paid;
    let store = MemoryStore::new().with_product(&ring).with_order(&order);

    let cancelled = CancelOrderUseCase {
        orders: store.clone(),
    }
    .execute(user.id, order.id)
    .await
    .unwrap();

    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);
}

#[tokio::test]
async fn should_refuse_to_cancel_shipped_or_foreign_orders() {
    let user = test_user();
    let ring = test_product("Aurora Ring", 1_000, 5);
    let shipped = test_order(user.id, &ring, 1, OrderStatus::Shipped);
    let pending = test_order(user.id, &ring, 1, OrderStatus::Pending);
    let store = MemoryStore::new()
        .with_product(&ring)
        .with_order(&shipped)
        .with_order(&pending);
    let uc = CancelOrderUseCase {
        orders: store.clone(),
    };

    let result = uc.execute(user.id, shipped.id).await;
    assert!(matches!(result, Err(StoreError::OrderNotCancellable)));

    let result = uc.execute(Uuid::now_v7(), pending.id).await;
    assert!(matches!(result, Err(StoreError::Forbidden)));
    assert_eq!(store.product(ring.id).stock_count, 5);
}

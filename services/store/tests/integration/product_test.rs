use rust_decimal::Decimal;

use valora_domain::pagination::PageRequest;
use valora_domain::product::{Category, StockStatus};
use valora_store::domain::repository::WishlistRepository;
use valora_store::domain::types::ProductFilter;
use valora_store::error::StoreError;
use valora_store::usecase::product::{
    CreateProductUseCase, DeleteProductUseCase, GetProductUseCase, ListCategoriesUseCase,
    ListProductsUseCase, NewProduct, ProductPatch, SeedProductsUseCase, UpdateProductUseCase,
};

use crate::helpers::{MemoryStore, Tables, coming_soon_product, test_product, test_user};

fn new_product(name: &str, price: Option<i64>, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        description: "22k gold".to_owned(),
        price: price.map(Decimal::from),
        original_price: None,
        category: Category::Necklaces,
        images: vec!["/uploads/a.jpg".to_owned()],
        stock_count: stock,
        in_stock: None,
        featured: false,
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_find_product_by_id_or_slug() {
    let ring = test_product("Aurora Ring", 1_000, 4);
    let uc = GetProductUseCase {
        products: MemoryStore::new().with_product(&ring),
    };

    assert_eq!(uc.execute(&ring.id.to_string()).await.unwrap().id, ring.id);
    assert_eq!(uc.execute("aurora-ring").await.unwrap().id, ring.id);
    assert!(matches!(
        uc.execute("no-such-piece").await,
        Err(StoreError::ProductNotFound)
    ));
}

#[tokio::test]
async fn should_list_every_category_with_zero_counts() {
    let store = MemoryStore::new()
        .with_product(&test_product("Aurora Ring", 1_000, 4))
        .with_product(&test_product("Solitaire Ring", 2_000, 4));

    let categories = ListCategoriesUseCase { products: store }
        .execute()
        .await
        .unwrap();

    assert_eq!(categories.len(), Category::ALL.len());
    let rings = categories
        .iter()
        .find(|c| c.category == Category::Rings)
        .unwrap();
    assert_eq!(rings.count, 2);
    assert!(
        categories
            .iter()
            .filter(|c| c.category != Category::Rings)
            .all(|c| c.count == 0)
    );
}

#[tokio::test]
async fn should_reject_inverted_price_range() {
    let uc = ListProductsUseCase {
        products: MemoryStore::new(),
    };
    let filter = ProductFilter {
        min_price: Some(Decimal::from(5_000)),
        max_price: Some(Decimal::from(1_000)),
        ..Default::default()
    };
    let result = uc.execute(filter, PageRequest::default()).await;
    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[tokio::test]
async fn should_paginate_listing() {
    let mut store = MemoryStore::new();
    for i in 0..5 {
        store = store.with_product(&test_product(&format!("Ring {i}"), 1_000, 4));
    }
    let uc = ListProductsUseCase { products: store };

    let page = uc
        .execute(
            ProductFilter::default(),
            PageRequest { page: 2, limit: 2 },
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.info.total, 5);
    assert_eq!(page.info.pages, 3);
}

// ── Create / update / delete ─────────────────────────────────────────────────

#[tokio::test]
async fn should_create_product_with_slug_and_derived_stock_flag() {
    let store = MemoryStore::new();
    let uc = CreateProductUseCase {
        products: store.clone(),
    };

    let product = uc
        .execute(new_product("  Kundan Choker ", Some(45_000), 0))
        .await
        .unwrap();
    assert_eq!(product.name, "Kundan Choker");
    assert_eq!(product.slug, "kundan-choker");
    assert!(!product.in_stock, "zero stock is never in stock");
    assert_eq!(product.stock_status(), StockStatus::OutOfStock);

    let duplicate = uc.execute(new_product("Kundan  Choker!", Some(1), 1)).await;
    assert!(matches!(duplicate, Err(StoreError::SlugAlreadyExists)));
}

#[tokio::test]
async fn should_queue_restock_events_for_wishlisting_users() {
    let fan = test_user();
    let mut choker = test_product("Kundan Choker", 45_000, 0);
    choker.in_stock = false;
    let store = MemoryStore::new().with_user(&fan).with_product(&choker);
    store.add(fan.id, choker.id).await.unwrap();
    let uc = UpdateProductUseCase {
        products: store.clone(),
        wishlists: store.clone(),
    };

    let updated = uc
        .execute(
            choker.id,
            ProductPatch {
                stock_count: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.in_stock);
    assert_eq!(updated.stock_status(), StockStatus::LowStock);
    let t = store.tables();
    assert_eq!(t.outbox.len(), 1);
    assert_eq!(t.outbox[0].kind, "wishlist_restock");
    assert_eq!(t.outbox[0].payload["email"], fan.email.as_str());
}

#[tokio::test]
async fn should_not_queue_restock_when_already_available() {
    let fan = test_user();
    let ring = test_product("Aurora Ring", 1_000, 2);
    let store = MemoryStore::new().with_user(&fan).with_product(&ring);
    store.add(fan.id, ring.id).await.unwrap();
    let uc = UpdateProductUseCase {
        products: store.clone(),
        wishlists: store.clone(),
    };

    uc.execute(
        ring.id,
        ProductPatch {
            stock_count: Some(20),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(store.tables().outbox.is_empty());
}

#[tokio::test]
async fn should_turn_product_into_coming_soon_when_price_cleared() {
    let ring = test_product("Aurora Ring", 1_000, 2);
    let store = MemoryStore::new().with_product(&ring);
    let uc = UpdateProductUseCase {
        products: store.clone(),
        wishlists: store.clone(),
    };

    let updated = uc
        .execute(
            ring.id,
            ProductPatch {
                price: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.is_coming_soon());
    assert_eq!(store.product(ring.id).price, None);
}

#[tokio::test]
async fn should_keep_stock_sold_while_editing_other_fields() {
    let ring = test_product("Aurora Ring", 1_000, 5);
    let store = MemoryStore::new().with_product(&ring);
    let id = ring.id;
    store.tables().after_product_read = Some(Box::new(move |t: &mut Tables| {
        let p = t.products.iter_mut().find(|p| p.id == id).unwrap();
        p.stock_count -= 2;
    }));
    let uc = UpdateProductUseCase {
        products: store.clone(),
        wishlists: store.clone(),
    };

    let updated = uc
        .execute(
            ring.id,
            ProductPatch {
                price: Some(Some(Decimal::from(1_200))),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.stock_count, 3);
    assert_eq!(updated.price, Some(Decimal::from(1_200)));
    assert_eq!(store.product(ring.id).stock_count, 3);
}

#[tokio::test]
async fn should_not_flag_sold_out_product_in_stock() {
    let ring = test_product("Aurora Ring", 1_000, 1);
    let store = MemoryStore::new().with_product(&ring);
    let id = ring.id;
    store.tables().after_product_read = Some(Box::new(move |t: &mut Tables| {
        let p = t.products.iter_mut().find(|p| p.id == id).unwrap();
        p.stock_count = 0;
    }));
    let uc = UpdateProductUseCase {
        products: store.clone(),
        wishlists: store.clone(),
    };

    let updated = uc
        .execute(
            ring.id,
            ProductPatch {
                in_stock: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(!updated.in_stock);
    assert_eq!(updated.stock_status(), StockStatus::OutOfStock);
}

#[tokio::test]
async fn should_delete_product_once() {
    let preview = coming_soon_product("Celeste Pendant");
    let uc = DeleteProductUseCase {
        products: MemoryStore::new().with_product(&preview),
    };

    uc.execute(preview.id).await.unwrap();
    assert!(matches!(
        uc.execute(preview.id).await,
        Err(StoreError::ProductNotFound)
    ));
}

// ── Seed ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_seed_skipping_existing_slugs() {
    let store = MemoryStore::new().with_product(&test_product("Aurora Ring", 1_000, 2));
    let uc = SeedProductsUseCase {
        products: store.clone(),
    };

    let report = uc
        .execute(vec![
            new_product("Aurora Ring", Some(1_000), 2),
            new_product("Temple Necklace", Some(80_000), 1),
            new_product("Celeste Pendant", None, 0),
        ])
        .await
        .unwrap();

    assert_eq!(report.created, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.tables().products.len(), 3);
}

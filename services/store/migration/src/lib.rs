use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_addresses;
mod m20250601_000003_create_products;
mod m20250601_000004_create_cart_items;
mod m20250601_000005_create_wishlist_items;
mod m20250601_000006_create_orders;
mod m20250601_000007_create_order_items;
mod m20250601_000008_create_reviews;
mod m20250601_000009_create_notifications;
mod m20250601_000010_create_settings;
mod m20250601_000011_create_outbox_events;
mod m20250601_000012_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_addresses::Migration),
            Box::new(m20250601_000003_create_products::Migration),
            Box::new(m20250601_000004_create_cart_items::Migration),
            Box::new(m20250601_000005_create_wishlist_items::Migration),
            Box::new(m20250601_000006_create_orders::Migration),
            Box::new(m20250601_000007_create_order_items::Migration),
            Box::new(m20250601_000008_create_reviews::Migration),
            Box::new(m20250601_000009_create_notifications::Migration),
            Box::new(m20250601_000010_create_settings::Migration),
            Box::new(m20250601_000011_create_outbox_events::Migration),
            Box::new(m20250601_000012_add_lookup_indexes::Migration),
        ]
    }
}

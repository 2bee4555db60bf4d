//! sea-orm entities for the storefront database.

pub mod addresses;
pub mod cart_items;
pub mod notifications;
pub mod order_items;
pub mod orders;
pub mod outbox_events;
pub mod products;
pub mod reviews;
pub mod settings;
pub mod users;
pub mod wishlist_items;

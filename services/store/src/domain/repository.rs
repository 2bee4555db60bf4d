#![allow(async_fn_in_trait)]

use rust_decimal::Decimal;
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentStatus};
use valora_domain::pagination::PageRequest;
use valora_domain::product::Category;
use valora_domain::user::UserRole;

use crate::domain::types::{
    Address, CartItem, CartLine, CategoryCount, MonthlySales, Notification, Order, OrderFilter,
    OutboxEvent, Product, ProductFilter, Review, StockWrite, User, WishlistEntry,
    WishlistSubscriber,
};
use crate::error::StoreError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `EmailAlreadyExists` if the email is taken.
    async fn create(&self, user: &User) -> Result<(), StoreError>;
    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<(), StoreError>;
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError>;
    /// Returns `false` if no such user.
    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreError>;
    /// Newest first. `search` matches name or email, case-insensitively.
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), StoreError>;
    /// Cascades to addresses, cart, wishlist and reviews. Fails with `UserHasOrders` while any
    /// order references the user.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
}

/// Repository for saved addresses.
///
/// Writes with `is_default = true` clear the flag on the user's other addresses atomically.
pub trait AddressRepository: Send + Sync {
    /// Default first, then newest.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Address>, StoreError>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Address>, StoreError>;
    async fn create(&self, address: &Address) -> Result<(), StoreError>;
    async fn update(&self, address: &Address) -> Result<(), StoreError>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
    async fn set_default(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

/// Repository for catalog products.
pub trait ProductRepository: Send + Sync {
    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError>;
    /// Case-insensitive exact name match.
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError>;
    /// First product in `category` whose name contains `name`, case-insensitively.
    async fn find_by_name_in_category(
        &self,
        category: Category,
        name: &str,
    ) -> Result<Option<Product>, StoreError>;
    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, StoreError>;
    async fn create(&self, product: &Product) -> Result<(), StoreError>;
    /// Persist the editable fields and enqueue `events` in the same transaction.
    ///
    /// Stock columns follow `stock`; rating and review count are never written.
    /// Fails with `ProductNotFound` if the row is gone.
    async fn update(
        &self,
        product: &Product,
        stock: StockWrite,
        events: &[OutboxEvent],
    ) -> Result<(), StoreError>;
    /// Cascades to reviews, cart and wishlist rows; order snapshots keep their copy.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn set_rating(&self, id: Uuid, rating: f64, num_reviews: i32) -> Result<(), StoreError>;
    async fn category_counts(&self) -> Result<Vec<CategoryCount>, StoreError>;
    async fn count(&self) -> Result<u64, StoreError>;
    /// Priced products that are flagged out of stock or have no units left.
    async fn out_of_stock(&self) -> Result<Vec<Product>, StoreError>;
    /// In-stock products with `1..=threshold` units left.
    async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, StoreError>;
    /// Same predicate as [`ProductRepository::out_of_stock`], counted in the database.
    async fn count_out_of_stock(&self) -> Result<u64, StoreError>;
    /// Same predicate as [`ProductRepository::low_stock`], counted in the database.
    async fn count_low_stock(&self, threshold: i32) -> Result<u64, StoreError>;
}

/// Repository for a user's cart.
pub trait CartRepository: Send + Sync {
    /// Oldest first. Lines whose product has been deleted are omitted.
    async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreError>;
    async fn get(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>, StoreError>;
    /// Insert or overwrite the line's quantity.
    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreError>;
    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError>;
    async fn clear(&self, user_id: Uuid) -> Result<(), StoreError>;
}

/// Repository for a user's wishlist.
pub trait WishlistRepository: Send + Sync {
    /// Newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError>;
    /// Returns `false` if the product was already wishlisted.
    async fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError>;
    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError>;
    async fn clear(&self, user_id: Uuid) -> Result<(), StoreError>;
    /// Users whose wishlist holds `product_id`.
    async fn subscribers(&self, product_id: Uuid) -> Result<Vec<WishlistSubscriber>, StoreError>;
}

/// Repository for orders.
pub trait OrderRepository: Send + Sync {
    /// In one transaction: decrement stock for every item (failing with `InsufficientStock` if a
    /// product no longer has enough units), insert the order, the admin notification and the
    /// outbox event, and clear the customer's cart.
    async fn place(
        &self,
        order: &Order,
        notification: &Notification,
        event: &OutboxEvent,
    ) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError>;
    /// Newest first.
    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), StoreError>;
    /// In one transaction: move the order from its current status to `cancelled` (failing with
    /// `OrderNotCancellable` if the status changed concurrently), set `payment_status`, restore
    /// stock and insert `notification`.
    async fn cancel(
        &self,
        order: &Order,
        payment_status: PaymentStatus,
        notification: &Notification,
    ) -> Result<(), StoreError>;
    /// Returns `false` if the order is no longer in status `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError>;
    async fn update_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<bool, StoreError>;
    /// Whether `user_id` has a delivered order containing `product_id`.
    async fn has_delivered_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, StoreError>;
    async fn count(&self, status: Option<OrderStatus>) -> Result<u64, StoreError>;
    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, StoreError>;
    /// Sum of totals over non-cancelled orders.
    async fn revenue(&self) -> Result<Decimal, StoreError>;
    /// Per-month sales for `year`; months without orders are absent.
    async fn monthly_sales(&self, year: i32) -> Result<Vec<MonthlySales>, StoreError>;
}

/// Repository for product reviews.
pub trait ReviewRepository: Send + Sync {
    /// Newest first, with the reviewer's name.
    async fn list_for_product(
        &self,
        product_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError>;
    async fn exists(&self, product_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    /// Fails with `ReviewAlreadyExists` on a second review by the same user.
    async fn create(&self, review: &Review) -> Result<(), StoreError>;
    async fn update(&self, id: Uuid, rating: u8, comment: &str) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn ratings_for_product(&self, product_id: Uuid) -> Result<Vec<u8>, StoreError>;
    async fn product_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError>;
}

/// Repository for admin notifications.
pub trait NotificationRepository: Send + Sync {
    /// Newest first.
    async fn list(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<(Vec<Notification>, u64), StoreError>;
    async fn unread_count(&self) -> Result<u64, StoreError>;
    async fn mark_read(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Returns the number of notifications changed.
    async fn mark_all_read(&self) -> Result<u64, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Key/value shop settings.
pub trait SettingsRepository: Send + Sync {
    /// Zero when never set.
    async fn shipping_charge(&self) -> Result<Decimal, StoreError>;
    async fn set_shipping_charge(&self, charge: Decimal) -> Result<(), StoreError>;
}

/// Destination for uploaded images.
pub trait FileStore: Send + Sync {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use valora_domain::pagination::PageRequest;
use valora_domain::product::{Category, slugify};
use valora_domain::user::UserRole;

use valora_store::domain::repository::{
    AddressRepository, CartRepository, NotificationRepository, OrderRepository,
    ProductRepository, ReviewRepository, SettingsRepository, UserRepository, WishlistRepository,
};
use valora_store::domain::types::{
    Address, CartItem, CartLine, CategoryCount, MonthlySales, Notification, Order, OrderFilter,
    OrderItem, OutboxEvent, Product, ProductFilter, Review, ShippingAddress, StockWrite, User,
    WishlistEntry, WishlistSubscriber,
};
use valora_store::error::StoreError;
use valora_store::usecase::auth::hash_password;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub const TEST_PASSWORD: &str = "hunter22";

pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        name: "Asha Rao".to_owned(),
        email: format!("asha+{}@example.com", Uuid::new_v4().simple()),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        phone: None,
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_admin() -> User {
    User {
        name: "Store Owner".to_owned(),
        role: UserRole::Admin,
        ..test_user()
    }
}

/// A priced, in-stock product with `stock` units.
pub fn test_product(name: &str, price: i64, stock: i32) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        slug: slugify(name),
        description: String::new(),
        price: Some(Decimal::from(price)),
        original_price: None,
        category: Category::Rings,
        images: vec![format!("/uploads/{}.jpg", slugify(name))],
        stock_count: stock,
        in_stock: stock > 0,
        featured: false,
        rating: 0.0,
        num_reviews: 0,
        created_at: now,
        updated_at: now,
    }
}

pub fn coming_soon_product(name: &str) -> Product {
    Product {
        price: None,
        ..test_product(name, 0, 0)
    }
}

pub fn test_address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Asha Rao".to_owned(),
        phone: "9845012345".to_owned(),
        line1: "12 MG Road".to_owned(),
        line2: None,
        city: "Bengaluru".to_owned(),
        state: "Karnataka".to_owned(),
        postal_code: "560001".to_owned(),
        country: "India".to_owned(),
    }
}

pub fn test_order(user_id: Uuid, product: &Product, quantity: i32, status: OrderStatus) -> Order {
    let now = Utc::now();
    let price = product.price.unwrap_or_default();
    let subtotal = price * Decimal::from(quantity);
    Order {
        id: Uuid::now_v7(),
        order_number: format!("VG-{}-TEST{:02}", now.format("%Y%m%d"), quantity),
        user_id,
        items: vec![OrderItem {
            product_id: Some(product.id),
            name: product.name.clone(),
            price,
            quantity,
            image: None,
        }],
        shipping_address: test_address(),
        payment_method: PaymentMethod::Cod,
        status,
        payment_status: PaymentStatus::Pending,
        subtotal,
        shipping_charge: Decimal::ZERO,
        total: subtotal,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

// ── MemoryStore ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub addresses: Vec<Address>,
    pub products: Vec<Product>,
    pub cart: Vec<(Uuid, CartItem)>,
    pub wishlist: Vec<(Uuid, Uuid, DateTime<Utc>)>,
    pub orders: Vec<Order>,
    pub reviews: Vec<Review>,
    pub notifications: Vec<Notification>,
    pub outbox: Vec<OutboxEvent>,
    pub shipping_charge: Decimal,
    /// Runs once, right after the next product read, as another request would between a
    /// read and a write.
    pub after_product_read: Option<Box<dyn FnOnce(&mut Tables) + Send>>,
    /// The next this many order placements find their order number already taken.
    pub taken_order_numbers: u32,
}

/// In-memory stand-in for every repository. Clones share the same tables, so one store can be
/// handed to each field of a use case and inspected afterwards.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn with_user(self, user: &User) -> Self {
        self.tables().users.push(user.clone());
        self
    }

    pub fn with_product(self, product: &Product) -> Self {
        self.tables().products.push(product.clone());
        self
    }

    pub fn with_order(self, order: &Order) -> Self {
        self.tables().orders.push(order.clone());
        self
    }

    pub fn product(&self, id: Uuid) -> Product {
        self.tables()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .unwrap()
    }

    pub fn order(&self, id: Uuid) -> Order {
        self.tables()
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .unwrap()
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> (Vec<T>, u64) {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = page.clamped().limit as usize;
    let slice = items.iter().skip(offset).take(limit).cloned().collect();
    (slice, items.len() as u64)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::EmailAlreadyExists);
        }
        t.users.push(user.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<(), StoreError> {
        if let Some(u) = self.tables().users.iter_mut().find(|u| u.id == id) {
            u.name = name.to_owned();
            u.phone = phone.map(str::to_owned);
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        if let Some(u) = self.tables().users.iter_mut().find(|u| u.id == id) {
            u.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreError> {
        Ok(match self.tables().users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.role = role;
                true
            }
            None => false,
        })
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), StoreError> {
        let t = self.tables();
        let mut users: Vec<User> = t
            .users
            .iter()
            .filter(|u| search.is_none_or(|s| contains_ci(&u.name, s) || contains_ci(&u.email, s)))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&users, page))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        if t.orders.iter().any(|o| o.user_id == id) {
            return Err(StoreError::UserHasOrders);
        }
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Ok(false);
        }
        t.addresses.retain(|a| a.user_id != id);
        t.cart.retain(|(u, _)| *u != id);
        t.wishlist.retain(|(u, _, _)| *u != id);
        t.reviews.retain(|r| r.user_id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.tables().users.len() as u64)
    }
}

impl AddressRepository for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Address>, StoreError> {
        let mut list: Vec<Address> = self
            .tables()
            .addresses
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(list)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Address>, StoreError> {
        Ok(self
            .tables()
            .addresses
            .iter()
            .find(|a| a.user_id == user_id && a.id == id)
            .cloned())
    }

    async fn create(&self, address: &Address) -> Result<(), StoreError> {
        let mut t = self.tables();
        if address.is_default {
            for a in t.addresses.iter_mut().filter(|a| a.user_id == address.user_id) {
                a.is_default = false;
            }
        }
        t.addresses.push(address.clone());
        Ok(())
    }

    async fn update(&self, address: &Address) -> Result<(), StoreError> {
        let mut t = self.tables();
        for a in t.addresses.iter_mut().filter(|a| a.user_id == address.user_id) {
            if a.id == address.id {
                *a = address.clone();
            } else if address.is_default {
                a.is_default = false;
            }
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let before = t.addresses.len();
        t.addresses.retain(|a| !(a.user_id == user_id && a.id == id));
        Ok(t.addresses.len() != before)
    }

    async fn set_default(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        if !t.addresses.iter().any(|a| a.user_id == user_id && a.id == id) {
            return Ok(false);
        }
        for a in t.addresses.iter_mut().filter(|a| a.user_id == user_id) {
            a.is_default = a.id == id;
        }
        Ok(true)
    }
}

impl ProductRepository for MemoryStore {
    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), StoreError> {
        let t = self.tables();
        let mut products: Vec<Product> = t
            .products
            .iter()
            .filter(|p| filter.category.is_none_or(|c| p.category == c))
            .filter(|p| filter.featured.is_none_or(|f| p.featured == f))
            .filter(|p| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|s| contains_ci(&p.name, s) || contains_ci(&p.description, s))
            })
            .filter(|p| {
                filter
                    .in_stock
                    .is_none_or(|flag| flag == (p.in_stock && p.stock_count > 0))
            })
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&products, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let mut t = self.tables();
        let found = t.products.iter().find(|p| p.id == id).cloned();
        if let Some(concurrent) = t.after_product_read.take() {
            concurrent(&mut *t);
        }
        Ok(found)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.tables().products.iter().find(|p| p.slug == slug).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_name_in_category(
        &self,
        category: Category,
        name: &str,
    ) -> Result<Option<Product>, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .find(|p| p.category == category && contains_ci(&p.name, name))
            .cloned())
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except))
    }

    async fn create(&self, product: &Product) -> Result<(), StoreError> {
        self.tables().products.push(product.clone());
        Ok(())
    }

    async fn update(
        &self,
        product: &Product,
        stock: StockWrite,
        events: &[OutboxEvent],
    ) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.products
            .iter()
            .any(|p| p.id != product.id && p.slug == product.slug)
        {
            return Err(StoreError::SlugAlreadyExists);
        }
        let p = t
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreError::ProductNotFound)?;
        p.name = product.name.clone();
        p.slug = product.slug.clone();
        p.description = product.description.clone();
        p.price = product.price;
        p.original_price = product.original_price;
        p.category = product.category;
        p.images = product.images.clone();
        p.featured = product.featured;
        p.updated_at = product.updated_at;
        match stock {
            StockWrite::Keep => {}
            StockWrite::Flag(flag) => p.in_stock = flag && p.stock_count > 0,
            StockWrite::Count { count, in_stock } => {
                p.stock_count = count;
                p.in_stock = in_stock;
            }
        }
        t.outbox.extend_from_slice(events);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        t.cart.retain(|(_, item)| item.product_id != id);
        t.wishlist.retain(|(_, p, _)| *p != id);
        t.reviews.retain(|r| r.product_id != id);
        Ok(t.products.len() != before)
    }

    async fn set_rating(&self, id: Uuid, rating: f64, num_reviews: i32) -> Result<(), StoreError> {
        if let Some(p) = self.tables().products.iter_mut().find(|p| p.id == id) {
            p.rating = rating;
            p.num_reviews = num_reviews;
        }
        Ok(())
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, StoreError> {
        let t = self.tables();
        let mut counts: Vec<CategoryCount> = Vec::new();
        for p in &t.products {
            match counts.iter_mut().find(|c| c.category == p.category) {
                Some(c) => c.count += 1,
                None => counts.push(CategoryCount {
                    category: p.category,
                    count: 1,
                }),
            }
        }
        Ok(counts)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.tables().products.len() as u64)
    }

    async fn out_of_stock(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .filter(|p| p.price.is_some() && p.is_out_of_stock())
            .cloned()
            .collect())
    }

    async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .tables()
            .products
            .iter()
            .filter(|p| p.price.is_some() && p.in_stock && (1..=threshold).contains(&p.stock_count))
            .cloned()
            .collect())
    }

    async fn count_out_of_stock(&self) -> Result<u64, StoreError> {
        Ok(self.out_of_stock().await?.len() as u64)
    }

    async fn count_low_stock(&self, threshold: i32) -> Result<u64, StoreError> {
        Ok(self.low_stock(threshold).await?.len() as u64)
    }
}

impl CartRepository for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreError> {
        let t = self.tables();
        Ok(t.cart
            .iter()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, item)| {
                t.products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|p| CartLine {
                        product: p.clone(),
                        quantity: item.quantity,
                        added_at: item.added_at,
                    })
            })
            .collect())
    }

    async fn get(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>, StoreError> {
        Ok(self
            .tables()
            .cart
            .iter()
            .find(|(u, item)| *u == user_id && item.product_id == product_id)
            .map(|(_, item)| item.clone()))
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let mut t = self.tables();
        match t
            .cart
            .iter_mut()
            .find(|(u, item)| *u == user_id && item.product_id == product_id)
        {
            Some((_, item)) => item.quantity = quantity,
            None => t.cart.push((
                user_id,
                CartItem {
                    product_id,
                    quantity,
                    added_at: Utc::now(),
                },
            )),
        }
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let before = t.cart.len();
        t.cart
            .retain(|(u, item)| !(*u == user_id && item.product_id == product_id));
        Ok(t.cart.len() != before)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.tables().cart.retain(|(u, _)| *u != user_id);
        Ok(())
    }
}

impl WishlistRepository for MemoryStore {
    async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError> {
        let t = self.tables();
        let mut entries: Vec<WishlistEntry> = t
            .wishlist
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, product_id, added_at)| {
                t.products
                    .iter()
                    .find(|p| p.id == *product_id)
                    .map(|p| WishlistEntry {
                        product: p.clone(),
                        added_at: *added_at,
                    })
            })
            .collect();
        entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(entries)
    }

    async fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        if t.wishlist
            .iter()
            .any(|(u, p, _)| *u == user_id && *p == product_id)
        {
            return Ok(false);
        }
        t.wishlist.push((user_id, product_id, Utc::now()));
        Ok(true)
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let before = t.wishlist.len();
        t.wishlist
            .retain(|(u, p, _)| !(*u == user_id && *p == product_id));
        Ok(t.wishlist.len() != before)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.tables().wishlist.retain(|(u, _, _)| *u != user_id);
        Ok(())
    }

    async fn subscribers(&self, product_id: Uuid) -> Result<Vec<WishlistSubscriber>, StoreError> {
        let t = self.tables();
        Ok(t.wishlist
            .iter()
            .filter(|(_, p, _)| *p == product_id)
            .filter_map(|(u, _, _)| t.users.iter().find(|user| user.id == *u))
            .map(|u| WishlistSubscriber {
                user_id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            })
            .collect())
    }
}

impl OrderRepository for MemoryStore {
    async fn place(
        &self,
        order: &Order,
        notification: &Notification,
        event: &OutboxEvent,
    ) -> Result<(), StoreError> {
        let mut t = self.tables();
        for item in &order.items {
            let Some(product_id) = item.product_id else {
                continue;
            };
            let product = t
                .products
                .iter()
                .find(|p| p.id == product_id)
                .ok_or_else(|| StoreError::UnmatchedItem(item.name.clone()))?;
            match product.price {
                None => return Err(StoreError::ComingSoon(item.name.clone())),
                Some(price) if price != item.price => {
                    return Err(StoreError::PriceChanged(item.name.clone()));
                }
                Some(_) => {}
            }
            if !product.in_stock || product.stock_count < item.quantity {
                return Err(StoreError::InsufficientStock {
                    name: product.name.clone(),
                    available: if product.in_stock { product.stock_count } else { 0 },
                });
            }
        }
        if t.taken_order_numbers > 0 {
            t.taken_order_numbers -= 1;
            return Err(StoreError::OrderNumberTaken);
        }
        if t.orders.iter().any(|o| o.order_number == order.order_number) {
            return Err(StoreError::OrderNumberTaken);
        }
        for item in &order.items {
            if let Some(p) = t.products.iter_mut().find(|p| Some(p.id) == item.product_id) {
                p.stock_count -= item.quantity;
                if p.stock_count == 0 {
                    p.in_stock = false;
                }
            }
        }
        t.orders.push(order.clone());
        t.notifications.push(notification.clone());
        t.outbox.push(event.clone());
        t.cart.retain(|(u, _)| *u != order.user_id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.tables().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let t = self.tables();
        let mut orders: Vec<Order> = t
            .orders
            .iter()
            .filter(|o| filter.user_id.is_none_or(|u| o.user_id == u))
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .filter(|o| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|s| contains_ci(&o.order_number, s))
            })
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&orders, page))
    }

    async fn cancel(
        &self,
        order: &Order,
        payment_status: PaymentStatus,
        notification: &Notification,
    ) -> Result<(), StoreError> {
        let mut t = self.tables();
        let stored = t
            .orders
            .iter_mut()
            .find(|o| o.id == order.id && o.status == order.status)
            .ok_or(StoreError::OrderNotCancellable)?;
        stored.status = OrderStatus::Cancelled;
        stored.payment_status = payment_status;
        stored.updated_at = Utc::now();
        for item in &order.items {
            if let Some(p) = t.products.iter_mut().find(|p| Some(p.id) == item.product_id) {
                p.stock_count += item.quantity;
                p.in_stock = true;
            }
        }
        t.notifications.push(notification.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError> {
        Ok(
            match self
                .tables()
                .orders
                .iter_mut()
                .find(|o| o.id == id && o.status == from)
            {
                Some(o) => {
                    o.status = to;
                    true
                }
                None => false,
            },
        )
    }

    async fn update_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<bool, StoreError> {
        Ok(match self.tables().orders.iter_mut().find(|o| o.id == id) {
            Some(o) => {
                o.payment_status = status;
                true
            }
            None => false,
        })
    }

    async fn has_delivered_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(self.tables().orders.iter().any(|o| {
            o.user_id == user_id
                && o.status == OrderStatus::Delivered
                && o.items.iter().any(|i| i.product_id == Some(product_id))
        }))
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<u64, StoreError> {
        Ok(self
            .tables()
            .orders
            .iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .count() as u64)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        Ok(self
            .tables()
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .count() as u64)
    }

    async fn revenue(&self) -> Result<Decimal, StoreError> {
        Ok(self
            .tables()
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total)
            .sum())
    }

    async fn monthly_sales(&self, year: i32) -> Result<Vec<MonthlySales>, StoreError> {
        let t = self.tables();
        let mut rows: Vec<MonthlySales> = Vec::new();
        for o in t
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled && o.created_at.year() == year)
        {
            let month = o.created_at.month();
            match rows.iter_mut().find(|r| r.month == month) {
                Some(r) => {
                    r.orders += 1;
                    r.revenue += o.total;
                }
                None => rows.push(MonthlySales {
                    month,
                    orders: 1,
                    revenue: o.total,
                }),
            }
        }
        Ok(rows)
    }
}

impl ReviewRepository for MemoryStore {
    async fn list_for_product(
        &self,
        product_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), StoreError> {
        let mut reviews: Vec<Review> = self
            .tables()
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&reviews, page))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        Ok(self.tables().reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn exists(&self, product_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .reviews
            .iter()
            .any(|r| r.product_id == product_id && r.user_id == user_id))
    }

    async fn create(&self, review: &Review) -> Result<(), StoreError> {
        let mut t = self.tables();
        if t.reviews
            .iter()
            .any(|r| r.product_id == review.product_id && r.user_id == review.user_id)
        {
            return Err(StoreError::ReviewAlreadyExists);
        }
        t.reviews.push(review.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, rating: u8, comment: &str) -> Result<(), StoreError> {
        if let Some(r) = self.tables().reviews.iter_mut().find(|r| r.id == id) {
            r.rating = rating;
            r.comment = comment.to_owned();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let before = t.reviews.len();
        t.reviews.retain(|r| r.id != id);
        Ok(t.reviews.len() != before)
    }

    async fn ratings_for_product(&self, product_id: Uuid) -> Result<Vec<u8>, StoreError> {
        Ok(self
            .tables()
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .map(|r| r.rating)
            .collect())
    }

    async fn product_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(self
            .tables()
            .reviews
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.product_id)
            .collect())
    }
}

impl NotificationRepository for MemoryStore {
    async fn list(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<(Vec<Notification>, u64), StoreError> {
        let mut list: Vec<Notification> = self
            .tables()
            .notifications
            .iter()
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&list, page))
    }

    async fn unread_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .tables()
            .notifications
            .iter()
            .filter(|n| !n.is_read)
            .count() as u64)
    }

    async fn mark_read(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(
            match self.tables().notifications.iter_mut().find(|n| n.id == id) {
                Some(n) => {
                    n.is_read = true;
                    true
                }
                None => false,
            },
        )
    }

    async fn mark_all_read(&self) -> Result<u64, StoreError> {
        let mut changed = 0;
        for n in self.tables().notifications.iter_mut().filter(|n| !n.is_read) {
            n.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut t = self.tables();
        let before = t.notifications.len();
        t.notifications.retain(|n| n.id != id);
        Ok(t.notifications.len() != before)
    }
}

impl SettingsRepository for MemoryStore {
    async fn shipping_charge(&self) -> Result<Decimal, StoreError> {
        Ok(self.tables().shipping_charge)
    }

    async fn set_shipping_charge(&self, charge: Decimal) -> Result<(), StoreError> {
        self.tables().shipping_charge = charge;
        Ok(())
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use rand::RngExt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentMethod, PaymentStatus, line_total};
use valora_domain::product::{
    Category, ProductSortBy, StockStatus, is_coming_soon, is_out_of_stock, sale_percentage,
};
use valora_domain::user::UserRole;

/// Registered customer or admin.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Postal address fields. Saved on addresses and snapshotted onto orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "India".to_owned()
}

impl ShippingAddress {
    /// Trim every field and reject blanks among the required ones.
    pub fn normalized(self) -> Result<Self, String> {
        let required = |field: &str, value: String| {
            let value = value.trim().to_owned();
            if value.is_empty() {
                Err(format!("{field} is required"))
            } else {
                Ok(value)
            }
        };
        Ok(Self {
            full_name: required("fullName", self.full_name)?,
            phone: required("phone", self.phone)?,
            line1: required("line1", self.line1)?,
            line2: self
                .line2
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty()),
            city: required("city", self.city)?,
            state: required("state", self.state)?,
            postal_code: required("postalCode", self.postal_code)?,
            country: required("country", self.country)?,
        })
    }
}

/// Address saved to a user's account.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: Uuid,
    pub user_id: Uuid,
    pub details: ShippingAddress,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Catalog product.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub category: Category,
    pub images: Vec<String>,
    pub stock_count: i32,
    pub in_stock: bool,
    pub featured: bool,
    pub rating: f64,
    pub num_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_coming_soon(&self) -> bool {
        is_coming_soon(self.price)
    }

    pub fn is_out_of_stock(&self) -> bool {
        is_out_of_stock(self.in_stock, self.stock_count)
    }

    pub fn sale_percentage(&self) -> Option<u32> {
        sale_percentage(self.price, self.original_price)
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::derive(self.price, self.in_stock, self.stock_count)
    }

    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// How a product update touches the stock columns, which orders decrement concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockWrite {
    /// Leave `stock_count` and `in_stock` as stored.
    Keep,
    /// Set the flag; `true` only holds while the stored count is positive.
    Flag(bool),
    /// Overwrite both columns.
    Count { count: i32, in_stock: bool },
}

/// Filters for the public product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub featured: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub sort: ProductSortBy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}

/// Raw cart row.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

/// Cart row joined with the current product.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i32,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// `None` for coming-soon products, which have no price.
    pub fn line_total(&self) -> Option<Decimal> {
        let quantity = u32::try_from(self.quantity).unwrap_or_default();
        self.product.price.map(|price| line_total(price, quantity))
    }
}

#[derive(Debug, Clone)]
pub struct WishlistEntry {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// A user to tell when a wishlisted product comes back into stock.
#[derive(Debug, Clone)]
pub struct WishlistSubscriber {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

/// Snapshot of a purchased product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_id: Option<Uuid>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub shipping_charge: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    /// Case-insensitive substring of the order number.
    pub search: Option<String>,
}

const ORDER_SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ORDER_SUFFIX_LEN: usize = 6;

/// `VG-YYYYMMDD-XXXXXX`, the suffix drawn from an unambiguous uppercase alphabet.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ORDER_SUFFIX_ALPHABET.len());
            ORDER_SUFFIX_ALPHABET[idx] as char
        })
        .collect();
    format!("VG-{}-{suffix}", now.format("%Y%m%d"))
}

#[derive(Debug, Clone)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    NewOrder,
    OrderCancelled,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewOrder => "new_order",
            Self::OrderCancelled => "order_cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new_order" => Some(Self::NewOrder),
            "order_cancelled" => Some(Self::OrderCancelled),
            _ => None,
        }
    }
}

/// Admin dashboard notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub order_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new_order(order: &Order, customer_name: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: NotificationKind::NewOrder,
            title: format!("New order {}", order.order_number),
            message: format!(
                "{customer_name} placed an order of {} item(s) totalling {}",
                order.items.iter().map(|i| i.quantity).sum::<i32>(),
                order.total
            ),
            order_id: Some(order.id),
            is_read: false,
            created_at: order.created_at,
        }
    }

    pub fn order_cancelled(order: &Order, by_customer: bool) -> Self {
        let who = if by_customer { "the customer" } else { "an admin" };
        Self {
            id: Uuid::now_v7(),
            kind: NotificationKind::OrderCancelled,
            title: format!("Order {} cancelled", order.order_number),
            message: format!("Order {} was cancelled by {who}", order.order_number),
            order_id: Some(order.id),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

/// Outbox event picked up by the external email/SMS worker.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

impl OutboxEvent {
    pub fn order_placed(order: &Order, customer: &User) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: "order_placed".to_owned(),
            payload: serde_json::json!({
                "email": customer.email,
                "name": customer.name,
                "phone": order.shipping_address.phone,
                "orderId": order.id,
                "orderNumber": order.order_number,
                "total": order.total.to_string(),
            }),
            idempotency_key: format!("order_placed:{}", order.id),
        }
    }

    /// One per subscriber; keyed on the restocking update so a retried request is not re-sent.
    pub fn wishlist_restock(subscriber: &WishlistSubscriber, product: &Product) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind: "wishlist_restock".to_owned(),
            payload: serde_json::json!({
                "email": subscriber.email,
                "name": subscriber.name,
                "productId": product.id,
                "productName": product.name,
                "productSlug": product.slug,
            }),
            idempotency_key: format!(
                "wishlist_restock:{}:{}:{}",
                product.id,
                subscriber.user_id,
                product.updated_at.timestamp_millis()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_products: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub total_revenue: Decimal,
    pub out_of_stock: u64,
    pub low_stock: u64,
    pub unread_notifications: u64,
}

/// Sales for one calendar month (1–12). Cancelled orders excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySales {
    pub month: u32,
    pub orders: u64,
    pub revenue: Decimal,
}

/// Expand sparse per-month rows into all twelve months, zero-filling the gaps.
pub fn fill_months(rows: &[MonthlySales]) -> Vec<MonthlySales> {
    (1..=12)
        .map(|month| {
            rows.iter()
                .find(|r| r.month == month)
                .cloned()
                .unwrap_or(MonthlySales {
                    month,
                    orders: 0,
                    revenue: Decimal::ZERO,
                })
        })
        .collect()
}

/// `[Jan 1 of year, Jan 1 of year + 1)` in UTC, or `None` for an out-of-range year.
pub fn year_bounds(year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?.and_hms_opt(0, 0, 0)?;
    Some((start.and_utc(), end.and_utc()))
}

#[derive(Debug, Clone)]
pub struct InventoryReport {
    pub threshold: i32,
    pub out_of_stock: Vec<Product>,
    pub low_stock: Vec<Product>,
}

/// `settings` key holding the flat shipping charge.
pub const SHIPPING_CHARGE_KEY: &str = "shipping_charge";

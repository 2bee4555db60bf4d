use chrono::{Datelike, Utc};
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentStatus};
use valora_domain::pagination::{Page, PageRequest};
use valora_domain::product::LOW_STOCK_THRESHOLD;
use valora_domain::user::{UserRole, normalize_email, validate_email};

use crate::domain::repository::{
    NotificationRepository, OrderRepository, ProductRepository, ReviewRepository, UserRepository,
};
use crate::domain::types::{
    DashboardStats, InventoryReport, MonthlySales, Order, OrderFilter, User, fill_months,
    year_bounds,
};
use crate::error::StoreError;
use crate::usecase::auth::{check_password_len, hash_password};
use crate::usecase::order::cancel_order;
use crate::usecase::review::refresh_product_rating;

// ── Reports ──────────────────────────────────────────────────────────────────

pub struct DashboardStatsUseCase<U, P, O, N>
where
    U: UserRepository,
    P: ProductRepository,
    O: OrderRepository,
    N: NotificationRepository,
{
    pub users: U,
    pub products: P,
    pub orders: O,
    pub notifications: N,
}

impl<U, P, O, N> DashboardStatsUseCase<U, P, O, N>
where
    U: UserRepository,
    P: ProductRepository,
    O: OrderRepository,
    N: NotificationRepository,
{
    pub async fn execute(&self) -> Result<DashboardStats, StoreError> {
        Ok(DashboardStats {
            total_users: self.users.count().await?,
            total_products: self.products.count().await?,
            total_orders: self.orders.count(None).await?,
            pending_orders: self.orders.count(Some(OrderStatus::Pending)).await?,
            total_revenue: self.orders.revenue().await?,
            out_of_stock: self.products.count_out_of_stock().await?,
            low_stock: self.products.count_low_stock(LOW_STOCK_THRESHOLD).await?,
            unread_notifications: self.notifications.unread_count().await?,
        })
    }
}

pub struct MonthlySalesUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> MonthlySalesUseCase<O> {
    /// Twelve entries for `year` (default: the current year), zero-filled.
    pub async fn execute(&self, year: Option<i32>) -> Result<(i32, Vec<MonthlySales>), StoreError> {
        let year = year.unwrap_or_else(|| Utc::now().year());
        if year_bounds(year).is_none() {
            return Err(StoreError::validation("year is out of range"));
        }
        let rows = self.orders.monthly_sales(year).await?;
        Ok((year, fill_months(&rows)))
    }
}

pub struct InventoryUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> InventoryUseCase<P> {
    pub async fn execute(&self, threshold: Option<i32>) -> Result<InventoryReport, StoreError> {
        let threshold = threshold.unwrap_or(LOW_STOCK_THRESHOLD);
        if threshold < 1 {
            return Err(StoreError::validation("threshold must be at least 1"));
        }
        Ok(InventoryReport {
            threshold,
            out_of_stock: self.products.out_of_stock().await?,
            low_stock: self.products.low_stock(threshold).await?,
        })
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

pub struct ListOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ListOrdersUseCase<O> {
    pub async fn execute(
        &self,
        status: Option<OrderStatus>,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        let page = page.clamped();
        let filter = OrderFilter {
            user_id: None,
            status,
            search: search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty()),
        };
        let (items, total) = self.orders.list(&filter, page).await?;
        Ok(Page::new(items, page, total))
    }
}

pub struct UpdateOrderStatusUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> UpdateOrderStatusUseCase<O> {
    /// Forward-only transitions; cancelling restores stock.
    pub async fn execute(&self, id: Uuid, next: OrderStatus) -> Result<Order, StoreError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound)?;
        let rejected = || StoreError::InvalidStatusTransition {
            from: order.status.to_string(),
            to: next.to_string(),
        };
        if !order.status.can_transition_to(next) {
            return Err(rejected());
        }
        if next == OrderStatus::Cancelled {
            return cancel_order(&self.orders, &order, false).await;
        }
        if !self.orders.update_status(id, order.status, next).await? {
            return Err(rejected());
        }
        tracing::info!(order_id = %id, from = %order.status, to = %next, "order status updated");
        self.orders
            .find_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound)
    }
}

pub struct UpdatePaymentStatusUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> UpdatePaymentStatusUseCase<O> {
    pub async fn execute(&self, id: Uuid, status: PaymentStatus) -> Result<Order, StoreError> {
        if !self.orders.update_payment_status(id, status).await? {
            return Err(StoreError::OrderNotFound);
        }
        self.orders
            .find_by_id(id)
            .await?
            .ok_or(StoreError::OrderNotFound)
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<User>, StoreError> {
        let page = page.clamped();
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (items, total) = self.users.list(search, page).await?;
        Ok(Page::new(items, page, total))
    }
}

pub struct ChangeUserRoleUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ChangeUserRoleUseCase<U> {
    /// An admin cannot change their own role.
    pub async fn execute(&self, actor: Uuid, id: Uuid, role: UserRole) -> Result<User, StoreError> {
        if actor == id {
            return Err(StoreError::SelfModification);
        }
        if !self.users.update_role(id, role).await? {
            return Err(StoreError::UserNotFound);
        }
        self.users
            .find_by_id(id)
            .await?
            .ok_or(StoreError::UserNotFound)
    }
}

pub struct DeleteUserUseCase<U, O, R, P>
where
    U: UserRepository,
    O: OrderRepository,
    R: ReviewRepository,
    P: ProductRepository,
{
    pub users: U,
    pub orders: O,
    pub reviews: R,
    pub products: P,
}

impl<U, O, R, P> DeleteUserUseCase<U, O, R, P>
where
    U: UserRepository,
    O: OrderRepository,
    R: ReviewRepository,
    P: ProductRepository,
{
    /// Removes the account and everything it owns, then re-rates the products it had reviewed.
    ///
    /// Accounts with orders are kept so sales history and revenue stay intact.
    pub async fn execute(&self, actor: Uuid, id: Uuid) -> Result<(), StoreError> {
        if actor == id {
            return Err(StoreError::SelfModification);
        }
        if self.orders.count_for_user(id).await? > 0 {
            return Err(StoreError::UserHasOrders);
        }
        let reviewed = self.reviews.product_ids_by_user(id).await?;
        if !self.users.delete(id).await? {
            return Err(StoreError::UserNotFound);
        }
        for product_id in reviewed {
            refresh_product_rating(&self.reviews, &self.products, product_id).await?;
        }
        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}

/// Result of [`CreateAdminUseCase`].
#[derive(Debug, PartialEq, Eq)]
pub enum AdminProvision {
    Created(Uuid),
    Promoted(Uuid),
    AlreadyAdmin(Uuid),
}

pub struct CreateAdminUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateAdminUseCase<U> {
    /// Create an admin account, or promote the existing account with that email. The password is
    /// only used when creating.
    pub async fn execute(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AdminProvision, StoreError> {
        let email = normalize_email(email);
        if !validate_email(&email) {
            return Err(StoreError::validation("a valid email is required"));
        }
        if let Some(user) = self.users.find_by_email(&email).await? {
            if user.role.is_admin() {
                return Ok(AdminProvision::AlreadyAdmin(user.id));
            }
            self.users.update_role(user.id, UserRole::Admin).await?;
            tracing::info!(user_id = %user.id, "user promoted to admin");
            return Ok(AdminProvision::Promoted(user.id));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("name is required"));
        }
        check_password_len(password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name: name.to_owned(),
            email,
            password_hash: hash_password(password)?,
            phone: None,
            role: UserRole::Admin,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, "admin created");
        Ok(AdminProvision::Created(user.id))
    }
}

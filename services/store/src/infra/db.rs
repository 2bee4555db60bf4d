use std::collections::HashMap;
use std::str::FromStr;

use anyhow::Context as _;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, FromQueryResult,
    Order as SortOrder, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, SqlErr,
    Statement, TransactionError, TransactionTrait,
    sea_query::{Expr, Func, NullOrdering, OnConflict, SimpleExpr},
};
use uuid::Uuid;

use valora_domain::order::{OrderStatus, PaymentStatus};
use valora_domain::pagination::{PageRequest, Sort};
use valora_domain::product::{Category, ProductSortBy};
use valora_domain::user::UserRole;
use valora_store_schema::{
    addresses, cart_items, notifications, order_items, orders, outbox_events, products, reviews,
    settings, users, wishlist_items,
};

use crate::domain::repository::{
    AddressRepository, CartRepository, NotificationRepository, OrderRepository, ProductRepository,
    ReviewRepository, SettingsRepository, UserRepository, WishlistRepository,
};
use crate::domain::types::{
    Address, CartItem, CartLine, CategoryCount, MonthlySales, Notification, NotificationKind, Order,
    OrderFilter, OrderItem, OutboxEvent, Product, ProductFilter, Review, SHIPPING_CHARGE_KEY,
    ShippingAddress, StockWrite, User, WishlistEntry, WishlistSubscriber, year_bounds,
};
use crate::error::StoreError;

// ── Shared helpers ───────────────────────────────────────────────────────────

/// Map a unique-constraint violation to `conflict`; anything else is internal.
fn unique_or(err: DbErr, conflict: StoreError, what: &'static str) -> StoreError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        conflict
    } else {
        StoreError::Internal(anyhow::Error::new(err).context(what))
    }
}

/// Map a foreign-key violation to `conflict`; anything else is internal.
fn referenced_or(err: DbErr, conflict: StoreError, what: &'static str) -> StoreError {
    if matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_))) {
        conflict
    } else {
        StoreError::Internal(anyhow::Error::new(err).context(what))
    }
}

fn from_txn(err: TransactionError<StoreError>) -> StoreError {
    match err {
        TransactionError::Connection(e) => {
            StoreError::Internal(anyhow::Error::new(e).context("database transaction"))
        }
        TransactionError::Transaction(e) => e,
    }
}

fn parse_column<T>(value: &str, column: &'static str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("decode {column} column"))
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `lower(col) LIKE '%needle%'`.
fn contains_ci<C: ColumnTrait>(col: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}

fn page_bounds(page: PageRequest) -> (u64, u64) {
    let page = page.clamped();
    (page.offset(), u64::from(page.limit))
}

async fn insert_outbox_event(
    txn: &DatabaseTransaction,
    event: &OutboxEvent,
) -> Result<(), StoreError> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(txn)
    .await
    .context("insert outbox event")?;
    Ok(())
}

async fn insert_notification(
    txn: &DatabaseTransaction,
    notification: &Notification,
) -> Result<(), StoreError> {
    notifications::ActiveModel {
        id: Set(notification.id),
        kind: Set(notification.kind.as_str().to_owned()),
        title: Set(notification.title.clone()),
        message: Set(notification.message.clone()),
        order_id: Set(notification.order_id),
        is_read: Set(notification.is_read),
        created_at: Set(notification.created_at),
    }
    .insert(txn)
    .await
    .context("insert notification")?;
    Ok(())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create(&self, user: &User) -> Result<(), StoreError> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone: Set(user.phone.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_or(e, StoreError::EmailAlreadyExists, "create user"))?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<(), StoreError> {
        users::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
            phone: Set(phone.map(str::to_owned)),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user profile")?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user password")?;
        Ok(())
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update user role")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), StoreError> {
        let mut query = users::Entity::find();
        if let Some(search) = search {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(users::Column::Name, search))
                    .add(contains_ci(users::Column::Email, search)),
            );
        }
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count users")?;
        let (offset, limit) = page_bounds(page);
        let models = query
            .order_by_desc(users::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list users")?;
        let items = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<_>>()?;
        Ok((items, total))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| referenced_or(e, StoreError::UserHasOrders, "delete user"))?;
        Ok(result.rows_affected > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(users::Entity::find()
            .count(&self.db)
            .await
            .context("count users")?)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        phone: model.phone,
        role: parse_column(&model.role, "users.role")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Address repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: DatabaseConnection,
}

/// Clear `is_default` on every address of `user_id`.
async fn clear_default_address(txn: &DatabaseTransaction, user_id: Uuid) -> Result<(), DbErr> {
    addresses::Entity::update_many()
        .col_expr(addresses::Column::IsDefault, Expr::value(false))
        .filter(addresses::Column::UserId.eq(user_id))
        .filter(addresses::Column::IsDefault.eq(true))
        .exec(txn)
        .await?;
    Ok(())
}

impl AddressRepository for DbAddressRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<Address>, StoreError> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_desc(addresses::Column::IsDefault)
            .order_by_desc(addresses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list addresses")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Address>, StoreError> {
        let model = addresses::Entity::find_by_id(id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .context("find address")?;
        Ok(model.map(address_from_model))
    }

    async fn create(&self, address: &Address) -> Result<(), StoreError> {
        self.db
            .transaction::<_, (), StoreError>(|txn| {
                let address = address.clone();
                Box::pin(async move {
                    if address.is_default {
                        clear_default_address(txn, address.user_id)
                            .await
                            .context("clear default address")?;
                    }
                    address_active_model(&address)
                        .insert(txn)
                        .await
                        .context("insert address")?;
                    Ok(())
                })
            })
            .await
            .map_err(from_txn)
    }

    async fn update(&self, address: &Address) -> Result<(), StoreError> {
        self.db
            .transaction::<_, (), StoreError>(|txn| {
                let address = address.clone();
                Box::pin(async move {
                    if address.is_default {
                        clear_default_address(txn, address.user_id)
                            .await
                            .context("clear default address")?;
                    }
                    address_active_model(&address)
                        .update(txn)
                        .await
                        .context("update address")?;
                    Ok(())
                })
            })
            .await
            .map_err(from_txn)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = addresses::Entity::delete_many()
            .filter(addresses::Column::Id.eq(id))
            .filter(addresses::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete address")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_default(&self, user_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        self.db
            .transaction::<_, bool, StoreError>(|txn| {
                Box::pin(async move {
                    let exists = addresses::Entity::find_by_id(id)
                        .filter(addresses::Column::UserId.eq(user_id))
                        .count(txn)
                        .await
                        .context("find address")?
                        > 0;
                    if !exists {
                        return Ok(false);
                    }
                    clear_default_address(txn, user_id)
                        .await
                        .context("clear default address")?;
                    addresses::Entity::update_many()
                        .col_expr(addresses::Column::IsDefault, Expr::value(true))
                        .filter(addresses::Column::Id.eq(id))
                        .exec(txn)
                        .await
                        .context("set default address")?;
                    Ok(true)
                })
            })
            .await
            .map_err(from_txn)
    }
}

fn address_active_model(address: &Address) -> addresses::ActiveModel {
    let details = &address.details;
    addresses::ActiveModel {
        id: Set(address.id),
        user_id: Set(address.user_id),
        full_name: Set(details.full_name.clone()),
        phone: Set(details.phone.clone()),
        line1: Set(details.line1.clone()),
        line2: Set(details.line2.clone()),
        city: Set(details.city.clone()),
        state: Set(details.state.clone()),
        postal_code: Set(details.postal_code.clone()),
        country: Set(details.country.clone()),
        is_default: Set(address.is_default),
        created_at: Set(address.created_at),
    }
}

fn address_from_model(model: addresses::Model) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        details: ShippingAddress {
            full_name: model.full_name,
            phone: model.phone,
            line1: model.line1,
            line2: model.line2,
            city: model.city,
            state: model.state,
            postal_code: model.postal_code,
            country: model.country,
        },
        is_default: model.is_default,
        created_at: model.created_at,
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

fn priced() -> SimpleExpr {
    products::Column::Price.is_not_null()
}

fn available() -> Condition {
    Condition::all()
        .add(products::Column::InStock.eq(true))
        .add(products::Column::StockCount.gt(0))
}

impl ProductRepository for DbProductRepository {
    async fn list(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), StoreError> {
        let mut query = products::Entity::find();
        if let Some(search) = filter.search.as_deref() {
            query = query.filter(
                Condition::any()
                    .add(contains_ci(products::Column::Name, search))
                    .add(contains_ci(products::Column::Description, search)),
            );
        }
        if let Some(category) = filter.category {
            query = query.filter(products::Column::Category.eq(category.as_str()));
        }
        if let Some(featured) = filter.featured {
            query = query.filter(products::Column::Featured.eq(featured));
        }
        if let Some(min) = filter.min_price {
            query = query.filter(products::Column::Price.gte(min));
        }
        if let Some(max) = filter.max_price {
            query = query.filter(products::Column::Price.lte(max));
        }
        match filter.in_stock {
            Some(true) => query = query.filter(available()),
            Some(false) => query = query.filter(available().not()),
            None => {}
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count products")?;

        query = match filter.sort {
            ProductSortBy::Newest => query.order_by_desc(products::Column::CreatedAt),
            ProductSortBy::Oldest => query.order_by_asc(products::Column::CreatedAt),
            // Coming-soon products have no price and sort last either way.
            ProductSortBy::Price(Sort::Asc) => query.order_by_with_nulls(
                products::Column::Price,
                SortOrder::Asc,
                NullOrdering::Last,
            ),
            ProductSortBy::Price(Sort::Desc) => query.order_by_with_nulls(
                products::Column::Price,
                SortOrder::Desc,
                NullOrdering::Last,
            ),
            ProductSortBy::Rating => query
                .order_by_desc(products::Column::Rating)
                .order_by_desc(products::Column::NumReviews),
            ProductSortBy::Name => query.order_by_asc(products::Column::Name),
        };

        let (offset, limit) = page_bounds(page);
        let models = query
            .order_by_asc(products::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok((products_from_models(models)?, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model).transpose()?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, StoreError> {
        let model = products::Entity::find()
            .filter(products::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find product by slug")?;
        Ok(model.map(product_from_model).transpose()?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let model = products::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(products::Column::Name))).eq(name.to_lowercase()))
            .order_by_asc(products::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find product by name")?;
        Ok(model.map(product_from_model).transpose()?)
    }

    async fn find_by_name_in_category(
        &self,
        category: Category,
        name: &str,
    ) -> Result<Option<Product>, StoreError> {
        let model = products::Entity::find()
            .filter(products::Column::Category.eq(category.as_str()))
            .filter(contains_ci(products::Column::Name, name))
            .order_by_asc(products::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find product by name in category")?;
        Ok(model.map(product_from_model).transpose()?)
    }

    async fn slug_exists(&self, slug: &str, except: Option<Uuid>) -> Result<bool, StoreError> {
        let mut query = products::Entity::find().filter(products::Column::Slug.eq(slug));
        if let Some(id) = except {
            query = query.filter(products::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.context("check product slug")?;
        Ok(count > 0)
    }

    async fn create(&self, product: &Product) -> Result<(), StoreError> {
        product_active_model(product)?
            .insert(&self.db)
            .await
            .map_err(|e| unique_or(e, StoreError::SlugAlreadyExists, "create product"))?;
        Ok(())
    }

    async fn update(
        &self,
        product: &Product,
        stock: StockWrite,
        events: &[OutboxEvent],
    ) -> Result<(), StoreError> {
        let model = product_edit_model(product)?;
        let id = product.id;
        self.db
            .transaction::<_, (), StoreError>(|txn| {
                let events = events.to_vec();
                Box::pin(async move {
                    let mut update = products::Entity::update_many()
                        .set(model)
                        .filter(products::Column::Id.eq(id));
                    match stock {
                        StockWrite::Keep => {}
                        StockWrite::Flag(true) => {
                            update = update.col_expr(
                                products::Column::InStock,
                                Expr::col(products::Column::StockCount).gt(0),
                            );
                        }
                        StockWrite::Flag(false) => {
                            update = update.col_expr(products::Column::InStock, Expr::value(false));
                        }
                        StockWrite::Count { count, in_stock } => {
                            update = update
                                .col_expr(products::Column::StockCount, Expr::value(count))
                                .col_expr(products::Column::InStock, Expr::value(in_stock));
                        }
                    }
                    let result = update
                        .exec(txn)
                        .await
                        .map_err(|e| unique_or(e, StoreError::SlugAlreadyExists, "update product"))?;
                    if result.rows_affected == 0 {
                        return Err(StoreError::ProductNotFound);
                    }
                    for event in &events {
                        insert_outbox_event(txn, event).await?;
                    }
                    Ok(())
                })
            })
            .await
            .map_err(from_txn)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_rating(&self, id: Uuid, rating: f64, num_reviews: i32) -> Result<(), StoreError> {
        products::Entity::update_many()
            .col_expr(products::Column::Rating, Expr::value(rating))
            .col_expr(products::Column::NumReviews, Expr::value(num_reviews))
            .filter(products::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set product rating")?;
        Ok(())
    }

    async fn category_counts(&self) -> Result<Vec<CategoryCount>, StoreError> {
        let rows: Vec<(String, i64)> = products::Entity::find()
            .select_only()
            .column(products::Column::Category)
            .column_as(Expr::col(products::Column::Id).count(), "count")
            .group_by(products::Column::Category)
            .into_tuple()
            .all(&self.db)
            .await
            .context("count products per category")?;
        let counts = rows
            .into_iter()
            .map(|(category, count)| {
                Ok(CategoryCount {
                    category: parse_column(&category, "products.category")?,
                    count: u64::try_from(count).unwrap_or_default(),
                })
            })
            .collect::<anyhow::Result<_>>()?;
        Ok(counts)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?)
    }

    async fn out_of_stock(&self) -> Result<Vec<Product>, StoreError> {
        let models = out_of_stock_query()
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .context("list out-of-stock products")?;
        Ok(products_from_models(models)?)
    }

    async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, StoreError> {
        let models = low_stock_query(threshold)
            .order_by_asc(products::Column::StockCount)
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
            .context("list low-stock products")?;
        Ok(products_from_models(models)?)
    }

    async fn count_out_of_stock(&self) -> Result<u64, StoreError> {
        Ok(out_of_stock_query()
            .count(&self.db)
            .await
            .context("count out-of-stock products")?)
    }

    async fn count_low_stock(&self, threshold: i32) -> Result<u64, StoreError> {
        Ok(low_stock_query(threshold)
            .count(&self.db)
            .await
            .context("count low-stock products")?)
    }
}

fn out_of_stock_query() -> Select<products::Entity> {
    products::Entity::find()
        .filter(priced())
        .filter(available().not())
}

fn low_stock_query(threshold: i32) -> Select<products::Entity> {
    products::Entity::find()
        .filter(priced())
        .filter(products::Column::InStock.eq(true))
        .filter(products::Column::StockCount.between(1, threshold))
}

fn product_active_model(product: &Product) -> anyhow::Result<products::ActiveModel> {
    Ok(products::ActiveModel {
        id: Set(product.id),
        name: Set(product.name.clone()),
        slug: Set(product.slug.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price),
        original_price: Set(product.original_price),
        category: Set(product.category.as_str().to_owned()),
        images: Set(serde_json::to_value(&product.images).context("encode product images")?),
        stock_count: Set(product.stock_count),
        in_stock: Set(product.in_stock),
        featured: Set(product.featured),
        rating: Set(product.rating),
        num_reviews: Set(product.num_reviews),
        created_at: Set(product.created_at),
        updated_at: Set(product.updated_at),
    })
}

/// Editable columns only; stock and rating are written by their own statements.
fn product_edit_model(product: &Product) -> anyhow::Result<products::ActiveModel> {
    Ok(products::ActiveModel {
        name: Set(product.name.clone()),
        slug: Set(product.slug.clone()),
        description: Set(product.description.clone()),
        price: Set(product.price),
        original_price: Set(product.original_price),
        category: Set(product.category.as_str().to_owned()),
        images: Set(serde_json::to_value(&product.images).context("encode product images")?),
        featured: Set(product.featured),
        updated_at: Set(product.updated_at),
        ..Default::default()
    })
}

fn product_from_model(model: products::Model) -> anyhow::Result<Product> {
    Ok(Product {
        id: model.id,
        category: parse_column(&model.category, "products.category")?,
        images: serde_json::from_value(model.images).context("decode products.images column")?,
        name: model.name,
        slug: model.slug,
        description: model.description,
        price: model.price,
        original_price: model.original_price,
        stock_count: model.stock_count,
        in_stock: model.in_stock,
        featured: model.featured,
        rating: model.rating,
        num_reviews: model.num_reviews,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn products_from_models(models: Vec<products::Model>) -> anyhow::Result<Vec<Product>> {
    models.into_iter().map(product_from_model).collect()
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .find_also_related(products::Entity)
            .order_by_asc(cart_items::Column::AddedAt)
            .all(&self.db)
            .await
            .context("list cart items")?;
        let mut lines = Vec::with_capacity(rows.len());
        for (item, product) in rows {
            let Some(product) = product else { continue };
            lines.push(CartLine {
                product: product_from_model(product)?,
                quantity: item.quantity,
                added_at: item.added_at,
            });
        }
        Ok(lines)
    }

    async fn get(&self, user_id: Uuid, product_id: Uuid) -> Result<Option<CartItem>, StoreError> {
        let model = cart_items::Entity::find_by_id((user_id, product_id))
            .one(&self.db)
            .await
            .context("find cart item")?;
        Ok(model.map(|m| CartItem {
            product_id: m.product_id,
            quantity: m.quantity,
            added_at: m.added_at,
        }))
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<(), StoreError> {
        let model = cart_items::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            added_at: Set(Utc::now()),
        };
        cart_items::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([cart_items::Column::UserId, cart_items::Column::ProductId])
                    .update_column(cart_items::Column::Quantity)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert cart item")?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .context("remove cart item")?;
        Ok(result.rows_affected > 0)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), StoreError> {
        cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("clear cart")?;
        Ok(())
    }
}

// ── Wishlist repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWishlistRepository {
    pub db: DatabaseConnection,
}

impl WishlistRepository for DbWishlistRepository {
    async fn list(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError> {
        let rows = wishlist_items::Entity::find()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .find_also_related(products::Entity)
            .order_by_desc(wishlist_items::Column::AddedAt)
            .all(&self.db)
            .await
            .context("list wishlist")?;
        let mut entries = Vec::with_capacity(rows.len());
        for (item, product) in rows {
            let Some(product) = product else { continue };
            entries.push(WishlistEntry {
                product: product_from_model(product)?,
                added_at: item.added_at,
            });
        }
        Ok(entries)
    }

    async fn add(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError> {
        let model = wishlist_items::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            added_at: Set(Utc::now()),
        };
        let inserted = wishlist_items::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    wishlist_items::Column::UserId,
                    wishlist_items::Column::ProductId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("add wishlist item")?;
        Ok(inserted > 0)
    }

    async fn remove(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, StoreError> {
        let result = wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .context("remove wishlist item")?;
        Ok(result.rows_affected > 0)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), StoreError> {
        wishlist_items::Entity::delete_many()
            .filter(wishlist_items::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("clear wishlist")?;
        Ok(())
    }

    async fn subscribers(&self, product_id: Uuid) -> Result<Vec<WishlistSubscriber>, StoreError> {
        let rows = wishlist_items::Entity::find()
            .filter(wishlist_items::Column::ProductId.eq(product_id))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .context("list wishlist subscribers")?;
        Ok(rows
            .into_iter()
            .filter_map(|(_, user)| user)
            .map(|user| WishlistSubscriber {
                user_id: user.id,
                name: user.name,
                email: user.email,
            })
            .collect())
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct MonthlySalesRow {
    month: i32,
    orders: i64,
    revenue: Decimal,
}

/// Take `quantity` units, only if that many are left. Returns `false` when the product is short.
/// Decrement stock only while the product still sells at `price` with enough units.
async fn take_stock(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    price: Decimal,
    quantity: i32,
) -> Result<bool, DbErr> {
    let result = products::Entity::update_many()
        .col_expr(
            products::Column::StockCount,
            Expr::col(products::Column::StockCount).sub(quantity),
        )
        .col_expr(
            products::Column::InStock,
            Expr::col(products::Column::StockCount).gt(quantity),
        )
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(product_id))
        .filter(products::Column::Price.eq(price))
        .filter(products::Column::InStock.eq(true))
        .filter(products::Column::StockCount.gte(quantity))
        .exec(txn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Why `take_stock` matched no row for `item`.
fn stock_miss(item: &OrderItem, current: Option<products::Model>) -> StoreError {
    let Some(product) = current else {
        return StoreError::UnmatchedItem(item.name.clone());
    };
    match product.price {
        None => StoreError::ComingSoon(item.name.clone()),
        Some(price) if price != item.price => StoreError::PriceChanged(item.name.clone()),
        Some(_) => StoreError::InsufficientStock {
            name: item.name.clone(),
            available: if product.in_stock {
                product.stock_count.max(0)
            } else {
                0
            },
        },
    }
}

async fn return_stock(
    txn: &DatabaseTransaction,
    product_id: Uuid,
    quantity: i32,
) -> Result<(), DbErr> {
    products::Entity::update_many()
        .col_expr(
            products::Column::StockCount,
            Expr::col(products::Column::StockCount).add(quantity),
        )
        .col_expr(products::Column::InStock, Expr::value(true))
        .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(products::Column::Id.eq(product_id))
        .exec(txn)
        .await?;
    Ok(())
}

async fn load_order_items<C: ConnectionTrait>(
    db: &C,
    order_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<order_items::Model>>, DbErr> {
    let rows = order_items::Entity::find()
        .filter(order_items::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_items::Column::Position)
        .all(db)
        .await?;
    let mut grouped: HashMap<Uuid, Vec<order_items::Model>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row);
    }
    Ok(grouped)
}

impl OrderRepository for DbOrderRepository {
    async fn place(
        &self,
        order: &Order,
        notification: &Notification,
        event: &OutboxEvent,
    ) -> Result<(), StoreError> {
        let (model, items) = order_active_models(order)?;
        self.db
            .transaction::<_, (), StoreError>(|txn| {
                let order = order.clone();
                let notification = notification.clone();
                let event = event.clone();
                Box::pin(async move {
                    for item in &order.items {
                        let Some(product_id) = item.product_id else { continue };
                        if take_stock(txn, product_id, item.price, item.quantity)
                            .await
                            .context("decrement stock")?
                        {
                            continue;
                        }
                        let current = products::Entity::find_by_id(product_id)
                            .one(txn)
                            .await
                            .context("reload product stock")?;
                        return Err(stock_miss(item, current));
                    }

                    model
                        .insert(txn)
                        .await
                        .map_err(|e| unique_or(e, StoreError::OrderNumberTaken, "insert order"))?;
                    for item in items {
                        item.insert(txn).await.context("insert order item")?;
                    }
                    insert_notification(txn, &notification).await?;
                    insert_outbox_event(txn, &event).await?;
                    cart_items::Entity::delete_many()
                        .filter(cart_items::Column::UserId.eq(order.user_id))
                        .exec(txn)
                        .await
                        .context("clear cart after order")?;
                    Ok(())
                })
            })
            .await
            .map_err(from_txn)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let Some(model) = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order")?
        else {
            return Ok(None);
        };
        let mut items = load_order_items(&self.db, vec![model.id])
            .await
            .context("load order items")?;
        let items = items.remove(&model.id).unwrap_or_default();
        Ok(Some(order_from_model(model, items)?))
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<(Vec<Order>, u64), StoreError> {
        let mut query = orders::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(orders::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        if let Some(search) = filter.search.as_deref() {
            query = query.filter(contains_ci(orders::Column::OrderNumber, search));
        }
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count orders")?;
        let (offset, limit) = page_bounds(page);
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list orders")?;

        let ids = models.iter().map(|m| m.id).collect();
        let mut items = load_order_items(&self.db, ids)
            .await
            .context("load order items")?;
        let orders = models
            .into_iter()
            .map(|model| {
                let lines = items.remove(&model.id).unwrap_or_default();
                order_from_model(model, lines)
            })
            .collect::<anyhow::Result<_>>()?;
        Ok((orders, total))
    }

    async fn cancel(
        &self,
        order: &Order,
        payment_status: PaymentStatus,
        notification: &Notification,
    ) -> Result<(), StoreError> {
        self.db
            .transaction::<_, (), StoreError>(|txn| {
                let order = order.clone();
                let notification = notification.clone();
                Box::pin(async move {
                    let result = orders::Entity::update_many()
                        .col_expr(
                            orders::Column::Status,
                            Expr::value(OrderStatus::Cancelled.as_str()),
                        )
                        .col_expr(
                            orders::Column::PaymentStatus,
                            Expr::value(payment_status.as_str()),
                        )
                        .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(orders::Column::Id.eq(order.id))
                        .filter(orders::Column::Status.eq(order.status.as_str()))
                        .exec(txn)
                        .await
                        .context("cancel order")?;
                    if result.rows_affected == 0 {
                        return Err(StoreError::OrderNotCancellable);
                    }
                    for item in &order.items {
                        if let Some(product_id) = item.product_id {
                            return_stock(txn, product_id, item.quantity)
                                .await
                                .context("restore stock")?;
                        }
                    }
                    insert_notification(txn, &notification).await
                })
            })
            .await
            .map_err(from_txn)
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(to.as_str()))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .context("update order status")?;
        Ok(result.rows_affected > 0)
    }

    async fn update_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
    ) -> Result<bool, StoreError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::PaymentStatus, Expr::value(status.as_str()))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update payment status")?;
        Ok(result.rows_affected > 0)
    }

    async fn has_delivered_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<bool, StoreError> {
        let count = order_items::Entity::find()
            .inner_join(orders::Entity)
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::Status.eq(OrderStatus::Delivered.as_str()))
            .filter(order_items::Column::ProductId.eq(product_id))
            .count(&self.db)
            .await
            .context("check delivered purchase")?;
        Ok(count > 0)
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<u64, StoreError> {
        let mut query = orders::Entity::find();
        if let Some(status) = status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        Ok(query.count(&self.db).await.context("count orders")?)
    }

    async fn count_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        Ok(orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count user orders")?)
    }

    async fn revenue(&self) -> Result<Decimal, StoreError> {
        let sum: Option<Option<Decimal>> = orders::Entity::find()
            .select_only()
            .column_as(Expr::col(orders::Column::Total).sum(), "revenue")
            .filter(orders::Column::Status.ne(OrderStatus::Cancelled.as_str()))
            .into_tuple()
            .one(&self.db)
            .await
            .context("sum revenue")?;
        Ok(sum.flatten().unwrap_or(Decimal::ZERO))
    }

    async fn monthly_sales(&self, year: i32) -> Result<Vec<MonthlySales>, StoreError> {
        let Some((start, end)) = year_bounds(year) else {
            return Ok(Vec::new());
        };
        let sql = r#"
            SELECT
                EXTRACT(MONTH FROM created_at)::int4 AS month,
                COUNT(*)::int8 AS orders,
                COALESCE(SUM(total), 0) AS revenue
            FROM orders
            WHERE status <> $1 AND created_at >= $2 AND created_at < $3
            GROUP BY 1
            ORDER BY 1
        "#;
        let rows = MonthlySalesRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [
                OrderStatus::Cancelled.as_str().into(),
                start.into(),
                end.into(),
            ],
        ))
        .all(&self.db)
        .await
        .context("aggregate monthly sales")?;

        Ok(rows
            .into_iter()
            .map(|row| MonthlySales {
                month: u32::try_from(row.month).unwrap_or_default(),
                orders: u64::try_from(row.orders).unwrap_or_default(),
                revenue: row.revenue,
            })
            .collect())
    }
}

fn order_active_models(
    order: &Order,
) -> anyhow::Result<(orders::ActiveModel, Vec<order_items::ActiveModel>)> {
    let model = orders::ActiveModel {
        id: Set(order.id),
        order_number: Set(order.order_number.clone()),
        user_id: Set(order.user_id),
        status: Set(order.status.as_str().to_owned()),
        payment_status: Set(order.payment_status.as_str().to_owned()),
        payment_method: Set(order.payment_method.as_str().to_owned()),
        shipping_address: Set(
            serde_json::to_value(&order.shipping_address).context("encode shipping address")?
        ),
        subtotal: Set(order.subtotal),
        shipping_charge: Set(order.shipping_charge),
        total: Set(order.total),
        notes: Set(order.notes.clone()),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    };
    let items = order
        .items
        .iter()
        .zip(0..)
        .map(|(item, position)| order_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            name: Set(item.name.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity),
            image: Set(item.image.clone()),
            position: Set(position),
        })
        .collect();
    Ok((model, items))
}

fn order_from_model(
    model: orders::Model,
    items: Vec<order_items::Model>,
) -> anyhow::Result<Order> {
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        user_id: model.user_id,
        items: items
            .into_iter()
            .map(|item| OrderItem {
                product_id: item.product_id,
                name: item.name,
                price: item.price,
                quantity: item.quantity,
                image: item.image,
            })
            .collect(),
        shipping_address: serde_json::from_value(model.shipping_address)
            .context("decode orders.shipping_address column")?,
        payment_method: parse_column(&model.payment_method, "orders.payment_method")?,
        status: parse_column(&model.status, "orders.status")?,
        payment_status: parse_column(&model.payment_status, "orders.payment_status")?,
        subtotal: model.subtotal,
        shipping_charge: model.shipping_charge,
        total: model.total,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn list_for_product(
        &self,
        product_id: Uuid,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), StoreError> {
        let total = reviews::Entity::find()
            .filter(reviews::Column::ProductId.eq(product_id))
            .count(&self.db)
            .await
            .context("count reviews")?;
        let (offset, limit) = page_bounds(page);
        let rows = reviews::Entity::find()
            .filter(reviews::Column::ProductId.eq(product_id))
            .find_also_related(users::Entity)
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list reviews")?;
        let items = rows
            .into_iter()
            .map(|(review, user)| review_from_model(review, user))
            .collect();
        Ok((items, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, StoreError> {
        let row = reviews::Entity::find_by_id(id)
            .find_also_related(users::Entity)
            .one(&self.db)
            .await
            .context("find review")?;
        Ok(row.map(|(review, user)| review_from_model(review, user)))
    }

    async fn exists(&self, product_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let count = reviews::Entity::find()
            .filter(reviews::Column::ProductId.eq(product_id))
            .filter(reviews::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("check existing review")?;
        Ok(count > 0)
    }

    async fn create(&self, review: &Review) -> Result<(), StoreError> {
        reviews::ActiveModel {
            id: Set(review.id),
            product_id: Set(review.product_id),
            user_id: Set(review.user_id),
            rating: Set(i16::from(review.rating)),
            comment: Set(review.comment.clone()),
            verified: Set(review.verified),
            created_at: Set(review.created_at),
            updated_at: Set(review.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| unique_or(e, StoreError::ReviewAlreadyExists, "create review"))?;
        Ok(())
    }

    async fn update(&self, id: Uuid, rating: u8, comment: &str) -> Result<(), StoreError> {
        reviews::Entity::update_many()
            .col_expr(reviews::Column::Rating, Expr::value(i16::from(rating)))
            .col_expr(reviews::Column::Comment, Expr::value(comment))
            .col_expr(reviews::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reviews::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update review")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }

    async fn ratings_for_product(&self, product_id: Uuid) -> Result<Vec<u8>, StoreError> {
        let ratings: Vec<i16> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::Rating)
            .filter(reviews::Column::ProductId.eq(product_id))
            .into_tuple()
            .all(&self.db)
            .await
            .context("load product ratings")?;
        Ok(ratings
            .into_iter()
            .filter_map(|r| u8::try_from(r).ok())
            .collect())
    }

    async fn product_ids_by_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let ids: Vec<Uuid> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::ProductId)
            .filter(reviews::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .context("list reviewed products")?;
        Ok(ids)
    }
}

fn review_from_model(model: reviews::Model, user: Option<users::Model>) -> Review {
    Review {
        id: model.id,
        product_id: model.product_id,
        user_id: model.user_id,
        user_name: user.map(|u| u.name).unwrap_or_default(),
        rating: u8::try_from(model.rating).unwrap_or_default(),
        comment: model.comment,
        verified: model.verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn list(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<(Vec<Notification>, u64), StoreError> {
        let mut query = notifications::Entity::find();
        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }
        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count notifications")?;
        let (offset, limit) = page_bounds(page);
        let models = query
            .order_by_desc(notifications::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list notifications")?;
        let items = models
            .into_iter()
            .map(notification_from_model)
            .collect::<anyhow::Result<_>>()?;
        Ok((items, total))
    }

    async fn unread_count(&self) -> Result<u64, StoreError> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .context("count unread notifications")?)
    }

    async fn mark_read(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("mark notification read")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_all_read(&self) -> Result<u64, StoreError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .context("mark all notifications read")?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = notifications::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete notification")?;
        Ok(result.rows_affected > 0)
    }
}

fn notification_from_model(model: notifications::Model) -> anyhow::Result<Notification> {
    let kind = NotificationKind::parse(&model.kind)
        .with_context(|| format!("decode notifications.kind column: {}", model.kind))?;
    Ok(Notification {
        id: model.id,
        kind,
        title: model.title,
        message: model.message,
        order_id: model.order_id,
        is_read: model.is_read,
        created_at: model.created_at,
    })
}

// ── Settings repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSettingsRepository {
    pub db: DatabaseConnection,
}

impl SettingsRepository for DbSettingsRepository {
    async fn shipping_charge(&self) -> Result<Decimal, StoreError> {
        let model = settings::Entity::find_by_id(SHIPPING_CHARGE_KEY.to_owned())
            .one(&self.db)
            .await
            .context("load shipping charge")?;
        let Some(model) = model else {
            return Ok(Decimal::ZERO);
        };
        let charge = serde_json::from_value(model.value).context("decode shipping charge")?;
        Ok(charge)
    }

    async fn set_shipping_charge(&self, charge: Decimal) -> Result<(), StoreError> {
        let model = settings::ActiveModel {
            key: Set(SHIPPING_CHARGE_KEY.to_owned()),
            value: Set(serde_json::to_value(charge).context("encode shipping charge")?),
            updated_at: Set(Utc::now()),
        };
        settings::Entity::insert(model)
            .on_conflict(
                OnConflict::column(settings::Column::Key)
                    .update_columns([settings::Column::Value, settings::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("save shipping charge")?;
        Ok(())
    }
}

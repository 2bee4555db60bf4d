use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use valora_domain::pagination::{Page, PageRequest};
use valora_domain::product::{Category, slugify};

use crate::domain::repository::{ProductRepository, WishlistRepository};
use crate::domain::types::{CategoryCount, OutboxEvent, Product, ProductFilter, StockWrite};
use crate::error::StoreError;

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListProductsUseCase<P> {
    pub async fn execute(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(StoreError::validation("minPrice cannot exceed maxPrice"));
            }
        }
        let page = page.clamped();
        let (items, total) = self.products.list(&filter, page).await?;
        Ok(Page::new(items, page, total))
    }
}

pub struct GetProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    /// Accepts either a product id or its slug.
    pub async fn execute(&self, id_or_slug: &str) -> Result<Product, StoreError> {
        let found = match id_or_slug.parse::<Uuid>() {
            Ok(id) => self.products.find_by_id(id).await?,
            Err(_) => self.products.find_by_slug(id_or_slug).await?,
        };
        found.ok_or(StoreError::ProductNotFound)
    }
}

pub struct ListCategoriesUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListCategoriesUseCase<P> {
    /// Every category in display order, including empty ones.
    pub async fn execute(&self) -> Result<Vec<CategoryCount>, StoreError> {
        let counts = self.products.category_counts().await?;
        Ok(Category::ALL
            .into_iter()
            .map(|category| CategoryCount {
                category,
                count: counts
                    .iter()
                    .find(|c| c.category == category)
                    .map_or(0, |c| c.count),
            })
            .collect())
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub category: Category,
    pub images: Vec<String>,
    pub stock_count: i32,
    pub in_stock: Option<bool>,
    pub featured: bool,
}

fn check_price(field: &str, value: Option<Decimal>) -> Result<(), StoreError> {
    match value {
        Some(v) if v.is_sign_negative() => Err(StoreError::validation(format!(
            "{field} cannot be negative"
        ))),
        _ => Ok(()),
    }
}

fn check_stock(stock_count: i32) -> Result<(), StoreError> {
    if stock_count < 0 {
        return Err(StoreError::validation("stockCount cannot be negative"));
    }
    Ok(())
}

fn slug_for(name: &str) -> Result<String, StoreError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(StoreError::validation(
            "name must contain at least one letter or digit",
        ));
    }
    Ok(slug)
}

fn clean_images(images: Vec<String>) -> Vec<String> {
    images
        .into_iter()
        .map(|i| i.trim().to_owned())
        .filter(|i| !i.is_empty())
        .collect()
}

/// Validate a new product and build it with a fresh id, slug and timestamps.
fn prepare_product(input: NewProduct) -> Result<Product, StoreError> {
    let name = input.name.trim().to_owned();
    if name.is_empty() {
        return Err(StoreError::validation("name is required"));
    }
    check_price("price", input.price)?;
    check_price("originalPrice", input.original_price)?;
    check_stock(input.stock_count)?;

    let now = Utc::now();
    Ok(Product {
        id: Uuid::now_v7(),
        slug: slug_for(&name)?,
        name,
        description: input.description.trim().to_owned(),
        price: input.price,
        original_price: input.original_price,
        category: input.category,
        images: clean_images(input.images),
        stock_count: input.stock_count,
        in_stock: input.stock_count > 0 && input.in_stock.unwrap_or(true),
        featured: input.featured,
        rating: 0.0,
        num_reviews: 0,
        created_at: now,
        updated_at: now,
    })
}

pub struct CreateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> CreateProductUseCase<P> {
    pub async fn execute(&self, input: NewProduct) -> Result<Product, StoreError> {
        let product = prepare_product(input)?;
        if self.products.slug_exists(&product.slug, None).await? {
            return Err(StoreError::SlugAlreadyExists);
        }
        self.products.create(&product).await?;
        Ok(product)
    }
}

// ── Update ───────────────────────────────────────────────────────────────────

/// Partial update. For the prices, `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Option<Decimal>>,
    pub original_price: Option<Option<Decimal>>,
    pub category: Option<Category>,
    pub images: Option<Vec<String>>,
    pub stock_count: Option<i32>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
}

pub struct UpdateProductUseCase<P: ProductRepository, W: WishlistRepository> {
    pub products: P,
    pub wishlists: W,
}

impl<P: ProductRepository, W: WishlistRepository> UpdateProductUseCase<P, W> {
    /// A product going from out of stock to purchasable queues a `wishlist_restock` event for
    /// every user wishlisting it.
    pub async fn execute(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(StoreError::ProductNotFound)?;
        let was_unavailable = !product.stock_status().is_purchasable();

        if let Some(name) = patch.name {
            let name = name.trim().to_owned();
            if name.is_empty() {
                return Err(StoreError::validation("name cannot be empty"));
            }
            if name != product.name {
                let slug = slug_for(&name)?;
                if self.products.slug_exists(&slug, Some(id)).await? {
                    return Err(StoreError::SlugAlreadyExists);
                }
                product.slug = slug;
            }
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description.trim().to_owned();
        }
        if let Some(price) = patch.price {
            check_price("price", price)?;
            product.price = price;
        }
        if let Some(original_price) = patch.original_price {
            check_price("originalPrice", original_price)?;
            product.original_price = original_price;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(images) = patch.images {
            product.images = clean_images(images);
        }
        if let Some(featured) = patch.featured {
            product.featured = featured;
        }
        if let Some(stock_count) = patch.stock_count {
            check_stock(stock_count)?;
        }
        let stock = stock_write(patch.stock_count, patch.in_stock);
        apply_stock(&mut product, stock);
        product.updated_at = Utc::now();

        let restocked = was_unavailable && product.stock_status().is_purchasable();
        let events: Vec<OutboxEvent> = if restocked {
            self.wishlists
                .subscribers(product.id)
                .await?
                .iter()
                .map(|s| OutboxEvent::wishlist_restock(s, &product))
                .collect()
        } else {
            Vec::new()
        };

        self.products.update(&product, stock, &events).await?;
        if !events.is_empty() {
            tracing::info!(
                product_id = %product.id,
                subscribers = events.len(),
                "queued wishlist restock notifications"
            );
        }
        self.products
            .find_by_id(id)
            .await?
            .ok_or(StoreError::ProductNotFound)
    }
}

/// Stock columns are only written when the patch names them.
fn stock_write(stock_count: Option<i32>, in_stock: Option<bool>) -> StockWrite {
    match (stock_count, in_stock) {
        (Some(count), flag) => StockWrite::Count {
            count,
            in_stock: flag.unwrap_or(true) && count > 0,
        },
        (None, Some(flag)) => StockWrite::Flag(flag),
        (None, None) => StockWrite::Keep,
    }
}

fn apply_stock(product: &mut Product, stock: StockWrite) {
    match stock {
        StockWrite::Keep => {}
        StockWrite::Flag(flag) => product.in_stock = flag && product.stock_count > 0,
        StockWrite::Count { count, in_stock } => {
            product.stock_count = count;
            product.in_stock = in_stock;
        }
    }
}

pub struct DeleteProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> DeleteProductUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<(), StoreError> {
        if !self.products.delete(id).await? {
            return Err(StoreError::ProductNotFound);
        }
        Ok(())
    }
}

// ── Seed ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

pub struct SeedProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> SeedProductsUseCase<P> {
    /// Create each product, skipping any whose slug already exists.
    pub async fn execute(&self, items: Vec<NewProduct>) -> Result<SeedReport, StoreError> {
        let mut report = SeedReport::default();
        for item in items {
            let product = prepare_product(item)?;
            if self.products.slug_exists(&product.slug, None).await? {
                tracing::debug!(slug = %product.slug, "seed product already exists");
                report.skipped += 1;
                continue;
            }
            self.products.create(&product).await?;
            report.created += 1;
        }
        Ok(report)
    }
}

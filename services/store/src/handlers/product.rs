use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use valora_auth_types::identity::AdminUser;
use valora_core::envelope::{ApiResponse, Paginated};
use valora_domain::pagination::PageRequest;
use valora_domain::product::{Category, ProductSortBy, StockStatus};

use crate::domain::types::{CategoryCount, Product, ProductFilter};
use crate::error::StoreError;
use crate::handlers::{double_option, parse_query};
use crate::state::AppState;
use crate::usecase::product::{
    CreateProductUseCase, DeleteProductUseCase, GetProductUseCase, ListCategoriesUseCase,
    ListProductsUseCase, NewProduct, ProductPatch, UpdateProductUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

/// A product with its derived storefront states.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_price: Option<Decimal>,
    pub category: Category,
    pub images: Vec<String>,
    pub stock_count: i32,
    pub in_stock: bool,
    pub featured: bool,
    pub rating: f64,
    pub num_reviews: i32,
    pub coming_soon: bool,
    pub out_of_stock: bool,
    pub sale_percentage: Option<u32>,
    pub stock_status: StockStatus,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "valora_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            coming_soon: product.is_coming_soon(),
            out_of_stock: product.is_out_of_stock(),
            sale_percentage: product.sale_percentage(),
            stock_status: product.stock_status(),
            id: product.id,
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price,
            original_price: product.original_price,
            category: product.category,
            images: product.images,
            stock_count: product.stock_count,
            in_stock: product.in_stock,
            featured: product.featured,
            rating: product.rating,
            num_reviews: product.num_reviews,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

pub(crate) fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

#[derive(Serialize)]
pub struct CategoryResponse {
    pub category: Category,
    pub count: u64,
}

impl From<CategoryCount> for CategoryResponse {
    fn from(c: CategoryCount) -> Self {
        Self {
            category: c.category,
            count: c.count,
        }
    }
}

// ── Request types ────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock: Option<bool>,
    pub sort: Option<String>,
}

impl ProductListQuery {
    fn filter(&self) -> Result<ProductFilter, StoreError> {
        let sort = match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => ProductSortBy::default(),
            Some(s) => ProductSortBy::from_kebab_case(s)
                .ok_or_else(|| StoreError::validation(format!("invalid sort: {s}")))?,
        };
        Ok(ProductFilter {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            category: parse_query(self.category.as_deref(), "category")?,
            featured: self.featured,
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock: self.in_stock,
            sort,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock_count: i32,
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub featured: bool,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(body: CreateProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
            original_price: body.original_price,
            category: body.category,
            images: body.images,
            stock_count: body.stock_count,
            in_stock: body.in_stock,
            featured: body.featured,
        }
    }
}

/// Partial update. `price: null` turns the product into a coming-soon listing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub price: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub original_price: Option<Option<Decimal>>,
    pub category: Option<Category>,
    pub images: Option<Vec<String>>,
    pub stock_count: Option<i32>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(body: UpdateProductRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            price: body.price,
            original_price: body.original_price,
            category: body.category,
            images: body.images,
            stock_count: body.stock_count,
            in_stock: body.in_stock,
            featured: body.featured,
        }
    }
}

// ── GET /api/products ────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<ApiResponse<Paginated<ProductResponse>>, StoreError> {
    let uc = ListProductsUseCase {
        products: state.product_repo(),
    };
    let page = PageRequest::from_query(query.page, query.limit);
    let products = uc.execute(query.filter()?, page).await?;
    Ok(ApiResponse::ok(products.map(ProductResponse::from).into()))
}

// ── GET /api/products/categories ─────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<CategoryResponse>>, StoreError> {
    let uc = ListCategoriesUseCase {
        products: state.product_repo(),
    };
    let counts = uc.execute().await?;
    Ok(ApiResponse::ok(
        counts.into_iter().map(CategoryResponse::from).collect(),
    ))
}

// ── GET /api/products/{idOrSlug} ─────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<ApiResponse<ProductResponse>, StoreError> {
    let uc = GetProductUseCase {
        products: state.product_repo(),
    };
    let product = uc.execute(&id_or_slug).await?;
    Ok(ApiResponse::ok(product.into()))
}

// ── POST /api/products ───────────────────────────────────────────────────────

pub async fn create_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, ApiResponse<ProductResponse>), StoreError> {
    let uc = CreateProductUseCase {
        products: state.product_repo(),
    };
    let product = uc.execute(body.into()).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(product.into(), "product created"),
    ))
}

// ── PUT /api/products/{id} ───────────────────────────────────────────────────

pub async fn update_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<ApiResponse<ProductResponse>, StoreError> {
    let uc = UpdateProductUseCase {
        products: state.product_repo(),
        wishlists: state.wishlist_repo(),
    };
    let product = uc.execute(id, body.into()).await?;
    Ok(ApiResponse::with_message(product.into(), "product updated"))
}

// ── DELETE /api/products/{id} ────────────────────────────────────────────────

pub async fn delete_product(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<()>, StoreError> {
    let uc = DeleteProductUseCase {
        products: state.product_repo(),
    };
    uc.execute(id).await?;
    Ok(ApiResponse::message("product deleted"))
}

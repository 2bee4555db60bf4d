use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::repository::{CartRepository, ProductRepository};
use crate::domain::types::{CartLine, Product};
use crate::error::StoreError;

/// Cart contents with totals computed from current product prices.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub item_count: i32,
}

impl CartView {
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let subtotal = lines.iter().filter_map(CartLine::line_total).sum();
        let item_count = lines.iter().map(|l| l.quantity).sum();
        Self {
            lines,
            subtotal,
            item_count,
        }
    }
}

/// Coming-soon and out-of-stock products cannot go into a cart or an order.
pub(crate) fn ensure_purchasable(product: &Product) -> Result<(), StoreError> {
    if product.is_coming_soon() {
        return Err(StoreError::ComingSoon(product.name.clone()));
    }
    if product.is_out_of_stock() {
        return Err(StoreError::OutOfStock(product.name.clone()));
    }
    Ok(())
}

pub(crate) fn ensure_within_stock(product: &Product, quantity: i32) -> Result<(), StoreError> {
    if quantity > product.stock_count {
        return Err(StoreError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock_count,
        });
    }
    Ok(())
}

/// Add `quantity` units, merging with an existing line. Shared with wishlist move-to-cart.
pub(crate) async fn add_to_cart<C: CartRepository, P: ProductRepository>(
    cart: &C,
    products: &P,
    user_id: Uuid,
    product_id: Uuid,
    quantity: i32,
) -> Result<(), StoreError> {
    if quantity < 1 {
        return Err(StoreError::validation("quantity must be at least 1"));
    }
    let product = products
        .find_by_id(product_id)
        .await?
        .ok_or(StoreError::ProductNotFound)?;
    ensure_purchasable(&product)?;

    let existing = cart
        .get(user_id, product_id)
        .await?
        .map_or(0, |item| item.quantity);
    let total = existing.saturating_add(quantity);
    ensure_within_stock(&product, total)?;
    cart.set_quantity(user_id, product_id, total).await
}

pub struct GetCartUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> GetCartUseCase<C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<CartView, StoreError> {
        Ok(CartView::from_lines(self.cart.list(user_id).await?))
    }
}

pub struct AddToCartUseCase<C: CartRepository, P: ProductRepository> {
    pub cart: C,
    pub products: P,
}

impl<C: CartRepository, P: ProductRepository> AddToCartUseCase<C, P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, StoreError> {
        add_to_cart(&self.cart, &self.products, user_id, product_id, quantity).await?;
        Ok(CartView::from_lines(self.cart.list(user_id).await?))
    }
}

pub struct UpdateCartItemUseCase<C: CartRepository, P: ProductRepository> {
    pub cart: C,
    pub products: P,
}

impl<C: CartRepository, P: ProductRepository> UpdateCartItemUseCase<C, P> {
    /// Set the line's quantity. Zero removes the line.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, StoreError> {
        if quantity < 0 {
            return Err(StoreError::validation("quantity cannot be negative"));
        }
        if self.cart.get(user_id, product_id).await?.is_none() {
            return Err(StoreError::CartItemNotFound);
        }
        if quantity == 0 {
            self.cart.remove(user_id, product_id).await?;
        } else {
            let product = self
                .products
                .find_by_id(product_id)
                .await?
                .ok_or(StoreError::ProductNotFound)?;
            ensure_purchasable(&product)?;
            ensure_within_stock(&product, quantity)?;
            self.cart.set_quantity(user_id, product_id, quantity).await?;
        }
        Ok(CartView::from_lines(self.cart.list(user_id).await?))
    }
}

pub struct RemoveCartItemUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> RemoveCartItemUseCase<C> {
    pub async fn execute(&self, user_id: Uuid, product_id: Uuid) -> Result<CartView, StoreError> {
        if !self.cart.remove(user_id, product_id).await? {
            return Err(StoreError::CartItemNotFound);
        }
        Ok(CartView::from_lines(self.cart.list(user_id).await?))
    }
}

pub struct ClearCartUseCase<C: CartRepository> {
    pub cart: C,
}

impl<C: CartRepository> ClearCartUseCase<C> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.cart.clear(user_id).await
    }
}

pub struct SyncCartUseCase<C: CartRepository, P: ProductRepository> {
    pub cart: C,
    pub products: P,
}

impl<C: CartRepository, P: ProductRepository> SyncCartUseCase<C, P> {
    /// Merge a client-side cart: per product keep the larger quantity, capped at current stock.
    /// Unknown and unavailable products are skipped.
    pub async fn execute(
        &self,
        user_id: Uuid,
        items: Vec<(Uuid, i32)>,
    ) -> Result<CartView, StoreError> {
        for (product_id, quantity) in items {
            if quantity < 1 {
                continue;
            }
            let Some(product) = self.products.find_by_id(product_id).await? else {
                continue;
            };
            if ensure_purchasable(&product).is_err() {
                continue;
            }
            let existing = self
                .cart
                .get(user_id, product_id)
                .await?
                .map_or(0, |item| item.quantity);
            let merged = existing.max(quantity).min(product.stock_count);
            if merged >= 1 && merged != existing {
                self.cart.set_quantity(user_id, product_id, merged).await?;
            }
        }
        Ok(CartView::from_lines(self.cart.list(user_id).await?))
    }
}

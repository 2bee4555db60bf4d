use uuid::Uuid;

use crate::domain::repository::{CartRepository, ProductRepository, WishlistRepository};
use crate::domain::types::WishlistEntry;
use crate::error::StoreError;
use crate::usecase::cart::add_to_cart;

pub struct GetWishlistUseCase<W: WishlistRepository> {
    pub wishlists: W,
}

impl<W: WishlistRepository> GetWishlistUseCase<W> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError> {
        self.wishlists.list(user_id).await
    }
}

pub struct AddToWishlistUseCase<W: WishlistRepository, P: ProductRepository> {
    pub wishlists: W,
    pub products: P,
}

impl<W: WishlistRepository, P: ProductRepository> AddToWishlistUseCase<W, P> {
    /// Idempotent: adding a product twice keeps one entry.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<WishlistEntry>, StoreError> {
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(StoreError::ProductNotFound);
        }
        self.wishlists.add(user_id, product_id).await?;
        self.wishlists.list(user_id).await
    }
}

pub struct RemoveFromWishlistUseCase<W: WishlistRepository> {
    pub wishlists: W,
}

impl<W: WishlistRepository> RemoveFromWishlistUseCase<W> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<WishlistEntry>, StoreError> {
        if !self.wishlists.remove(user_id, product_id).await? {
            return Err(StoreError::WishlistItemNotFound);
        }
        self.wishlists.list(user_id).await
    }
}

pub struct ClearWishlistUseCase<W: WishlistRepository> {
    pub wishlists: W,
}

impl<W: WishlistRepository> ClearWishlistUseCase<W> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), StoreError> {
        self.wishlists.clear(user_id).await
    }
}

pub struct MoveToCartUseCase<W: WishlistRepository, C: CartRepository, P: ProductRepository> {
    pub wishlists: W,
    pub cart: C,
    pub products: P,
}

impl<W, C, P> MoveToCartUseCase<W, C, P>
where
    W: WishlistRepository,
    C: CartRepository,
    P: ProductRepository,
{
    /// Add one unit to the cart, then drop the wishlist entry. Nothing changes if the product
    /// cannot be bought.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<WishlistEntry>, StoreError> {
        let wishlisted = self
            .wishlists
            .list(user_id)
            .await?
            .iter()
            .any(|e| e.product.id == product_id);
        if !wishlisted {
            return Err(StoreError::WishlistItemNotFound);
        }
        add_to_cart(&self.cart, &self.products, user_id, product_id, 1).await?;
        self.wishlists.remove(user_id, product_id).await?;
        self.wishlists.list(user_id).await
    }
}

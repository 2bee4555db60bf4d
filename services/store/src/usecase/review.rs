use chrono::Utc;
use uuid::Uuid;

use valora_domain::pagination::{Page, PageRequest};
use valora_domain::review::{Rating, average_rating};

use crate::domain::repository::{
    OrderRepository, ProductRepository, ReviewRepository, UserRepository,
};
use crate::domain::types::Review;
use crate::error::StoreError;

/// Recompute a product's denormalized `rating` and `num_reviews` from its reviews.
pub(crate) async fn refresh_product_rating<R: ReviewRepository, P: ProductRepository>(
    reviews: &R,
    products: &P,
    product_id: Uuid,
) -> Result<(), StoreError> {
    let ratings = reviews.ratings_for_product(product_id).await?;
    let (rating, count) = average_rating(&ratings);
    products.set_rating(product_id, rating, count).await
}

fn validate(rating: i64, comment: &str) -> Result<(Rating, String), StoreError> {
    let rating = Rating::new(rating)
        .ok_or_else(|| StoreError::validation("rating must be between 1 and 5"))?;
    let comment = comment.trim();
    if comment.is_empty() {
        return Err(StoreError::validation("comment is required"));
    }
    Ok((rating, comment.to_owned()))
}

pub struct ListReviewsUseCase<R: ReviewRepository, P: ProductRepository> {
    pub reviews: R,
    pub products: P,
}

impl<R: ReviewRepository, P: ProductRepository> ListReviewsUseCase<R, P> {
    pub async fn execute(
        &self,
        product_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Review>, StoreError> {
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(StoreError::ProductNotFound);
        }
        let page = page.clamped();
        let (items, total) = self.reviews.list_for_product(product_id, page).await?;
        Ok(Page::new(items, page, total))
    }
}

pub struct CreateReviewUseCase<R, P, U, O>
where
    R: ReviewRepository,
    P: ProductRepository,
    U: UserRepository,
    O: OrderRepository,
{
    pub reviews: R,
    pub products: P,
    pub users: U,
    pub orders: O,
}

impl<R, P, U, O> CreateReviewUseCase<R, P, U, O>
where
    R: ReviewRepository,
    P: ProductRepository,
    U: UserRepository,
    O: OrderRepository,
{
    /// `verified` is set when the reviewer has a delivered order containing the product.
    pub async fn execute(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        rating: i64,
        comment: &str,
    ) -> Result<Review, StoreError> {
        let (rating, comment) = validate(rating, comment)?;
        if self.products.find_by_id(product_id).await?.is_none() {
            return Err(StoreError::ProductNotFound);
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(StoreError::UserNotFound)?;
        if self.reviews.exists(product_id, user_id).await? {
            return Err(StoreError::ReviewAlreadyExists);
        }

        let now = Utc::now();
        let review = Review {
            id: Uuid::now_v7(),
            product_id,
            user_id,
            user_name: user.name,
            rating: rating.get(),
            comment,
            verified: self.orders.has_delivered_product(user_id, product_id).await?,
            created_at: now,
            updated_at: now,
        };
        self.reviews.create(&review).await?;
        refresh_product_rating(&self.reviews, &self.products, product_id).await?;
        Ok(review)
    }
}

pub struct UpdateReviewUseCase<R: ReviewRepository, P: ProductRepository> {
    pub reviews: R,
    pub products: P,
}

impl<R: ReviewRepository, P: ProductRepository> UpdateReviewUseCase<R, P> {
    /// Only the author may edit a review.
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        rating: i64,
        comment: &str,
    ) -> Result<Review, StoreError> {
        let (rating, comment) = validate(rating, comment)?;
        let mut review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(StoreError::ReviewNotFound)?;
        if review.user_id != user_id {
            return Err(StoreError::Forbidden);
        }
        self.reviews.update(id, rating.get(), &comment).await?;
        refresh_product_rating(&self.reviews, &self.products, review.product_id).await?;

        review.rating = rating.get();
        review.comment = comment;
        review.updated_at = Utc::now();
        Ok(review)
    }
}

pub struct DeleteReviewUseCase<R: ReviewRepository, P: ProductRepository> {
    pub reviews: R,
    pub products: P,
}

impl<R: ReviewRepository, P: ProductRepository> DeleteReviewUseCase<R, P> {
    /// Authors may delete their own reviews; admins may delete any.
    pub async fn execute(&self, user_id: Uuid, is_admin: bool, id: Uuid) -> Result<(), StoreError> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or(StoreError::ReviewNotFound)?;
        if review.user_id != user_id && !is_admin {
            return Err(StoreError::Forbidden);
        }
        if !self.reviews.delete(id).await? {
            return Err(StoreError::ReviewNotFound);
        }
        refresh_product_rating(&self.reviews, &self.products, review.product_id).await
    }
}

use std::sync::Arc;
use thiserror::Error;

use crate::{
    guard::{ensure_owner, GuardError},
    Database, DatabaseError, NewReview, NewReviewImage, PrimaryKey, ReviewData, ReviewImageData,
    UpdatedReview, UserData,
};

pub struct ReviewManager<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// A review joined with its author and images
#[derive(Debug, Clone)]
pub struct ReviewDetails {
    pub review: ReviewData,
    pub reviewer: UserData,
    pub images: Vec<ReviewImageData>,
}

impl<Db> ReviewManager<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    pub async fn reviews_for_spot(
        &self,
        spot_id: PrimaryKey,
    ) -> Result<Vec<ReviewDetails>, DatabaseError> {
        // Ensure spot exists
        let _ = self.db.spot_by_id(spot_id).await?;

        let reviews = self.db.reviews_by_spot(spot_id).await?;
        let mut result = Vec::with_capacity(reviews.len());

        for review in reviews {
            let reviewer = self.db.user_by_id(review.user_id).await?;
            let images = self.db.review_images(review.id).await?;

            result.push(ReviewDetails {
                review,
                reviewer,
                images,
            });
        }

        Ok(result)
    }

    pub async fn reviews_for_user(
        &self,
        user_id: PrimaryKey,
    ) -> Result<Vec<ReviewData>, DatabaseError> {
        self.db.reviews_by_user(user_id).await
    }

    /// Creates a review. A user may only review each spot once; the store
    /// rejects a second one as a conflict.
    pub async fn create_review(&self, new_review: NewReview) -> Result<ReviewData, DatabaseError> {
        // Missing spots take priority over duplicates
        let _ = self.db.spot_by_id(new_review.spot_id).await?;

        self.db.create_review(new_review).await
    }

    pub async fn update_review(
        &self,
        user_id: PrimaryKey,
        updated_review: UpdatedReview,
    ) -> Result<ReviewData, ReviewError> {
        let review = self.db.review_by_id(updated_review.id).await?;

        ensure_owner(user_id, &review)?;

        Ok(self.db.update_review(updated_review).await?)
    }

    /// Deletes a review along with its images
    pub async fn delete_review(
        &self,
        user_id: PrimaryKey,
        review_id: PrimaryKey,
    ) -> Result<(), ReviewError> {
        let review = self.db.review_by_id(review_id).await?;

        ensure_owner(user_id, &review)?;

        Ok(self.db.delete_review(review.id).await?)
    }

    pub async fn add_image(
        &self,
        user_id: PrimaryKey,
        new_image: NewReviewImage,
    ) -> Result<ReviewImageData, ReviewError> {
        let review = self.db.review_by_id(new_image.review_id).await?;

        ensure_owner(user_id, &review)?;

        Ok(self.db.create_review_image(new_image).await?)
    }
}

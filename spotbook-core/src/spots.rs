use std::sync::Arc;
use thiserror::Error;

use crate::{
    guard::{ensure_owner, GuardError},
    Database, DatabaseError, NewSpot, NewSpotImage, Pagination, PrimaryKey, SpotData,
    SpotImageData, SpotRating, UpdatedSpot, UserData,
};

pub struct SpotManager<Db> {
    db: Arc<Db>,
}

#[derive(Debug, Error)]
pub enum SpotError {
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// A spot with everything its detail view needs
#[derive(Debug, Clone)]
pub struct SpotDetails {
    pub spot: SpotData,
    pub owner: UserData,
    pub images: Vec<SpotImageData>,
    pub rating: SpotRating,
}

/// A spot with its review aggregates, as listed for its owner
#[derive(Debug, Clone)]
pub struct RatedSpot {
    pub spot: SpotData,
    pub rating: SpotRating,
}

impl<Db> SpotManager<Db>
where
    Db: Database,
{
    pub fn new(db: &Arc<Db>) -> Self {
        Self { db: db.clone() }
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<SpotData>, DatabaseError> {
        self.db.list_spots(page).await
    }

    pub async fn spot_by_id(&self, spot_id: PrimaryKey) -> Result<SpotDetails, DatabaseError> {
        let spot = self.db.spot_by_id(spot_id).await?;
        let owner = self.db.user_by_id(spot.owner_id).await?;
        let images = self.db.spot_images(spot.id).await?;
        let rating = self.db.spot_rating(spot.id).await?;

        Ok(SpotDetails {
            spot,
            owner,
            images,
            rating,
        })
    }

    /// Spots owned by a user, with their review aggregates
    pub async fn spots_for_owner(
        &self,
        owner_id: PrimaryKey,
    ) -> Result<Vec<RatedSpot>, DatabaseError> {
        let spots = self.db.spots_by_owner(owner_id).await?;
        let mut result = Vec::with_capacity(spots.len());

        for spot in spots {
            let rating = self.db.spot_rating(spot.id).await?;
            result.push(RatedSpot { spot, rating });
        }

        Ok(result)
    }

    pub async fn create_spot(&self, new_spot: NewSpot) -> Result<SpotData, DatabaseError> {
        self.db.create_spot(new_spot).await
    }

    pub async fn update_spot(
        &self,
        user_id: PrimaryKey,
        updated_spot: UpdatedSpot,
    ) -> Result<SpotData, SpotError> {
        let spot = self.db.spot_by_id(updated_spot.id).await?;

        ensure_owner(user_id, &spot)?;

        Ok(self.db.update_spot(updated_spot).await?)
    }

    /// Deletes a spot along with its bookings, reviews, and images
    pub async fn delete_spot(
        &self,
        user_id: PrimaryKey,
        spot_id: PrimaryKey,
    ) -> Result<(), SpotError> {
        let spot = self.db.spot_by_id(spot_id).await?;

        ensure_owner(user_id, &spot)?;

        Ok(self.db.delete_spot(spot.id).await?)
    }

    pub async fn add_image(
        &self,
        user_id: PrimaryKey,
        new_image: NewSpotImage,
    ) -> Result<SpotImageData, SpotError> {
        let spot = self.db.spot_by_id(new_image.spot_id).await?;

        ensure_owner(user_id, &spot)?;

        Ok(self.db.create_spot_image(new_image).await?)
    }
}

mod auth;
mod bookings;
mod db;
mod reviews;
mod spots;
mod util;

pub mod availability;
pub mod guard;

use std::sync::Arc;

pub use auth::*;
pub use bookings::*;
pub use db::*;
pub use reviews::*;
pub use spots::*;

/// The spotbook system, bundling authentication and the booking, spot, and
/// review managers over one shared database.
pub struct Spotbook<Db> {
    database: Arc<Db>,

    pub auth: Auth<Db>,
    pub bookings: BookingManager<Db>,
    pub spots: SpotManager<Db>,
    pub reviews: ReviewManager<Db>,
}

impl<Db> Spotbook<Db>
where
    Db: Database,
{
    pub fn new(database: Db) -> Self {
        let database = Arc::new(database);

        Self {
            auth: Auth::new(&database),
            bookings: BookingManager::new(&database),
            spots: SpotManager::new(&database),
            reviews: ReviewManager::new(&database),
            database,
        }
    }

    pub fn database(&self) -> &Arc<Db> {
        &self.database
    }
}

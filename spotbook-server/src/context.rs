use std::sync::Arc;

use axum::extract::FromRef;
use spotbook_core::{PgDatabase, Spotbook};

#[derive(Clone, FromRef)]
pub struct ServerContext {
    pub spotbook: Arc<Spotbook<PgDatabase>>,
}

use std::{env, process, sync::Arc};

use log::{error, info};
use spotbook_core::{PgDatabase, Spotbook};
use spotbook_server::{logging, run_server, ServerContext};

#[tokio::main]
async fn main() {
    logging::init_logger();

    let database_url = match env::var("SPOTBOOK_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("SPOTBOOK_DATABASE_URL must be set");
            process::exit(1);
        }
    };

    info!("Connecting to database...");

    let database = match PgDatabase::new(&database_url).await {
        Ok(database) => database,
        Err(error) => {
            error!("Could not connect to database: {}", error);
            process::exit(1);
        }
    };

    let spotbook = Spotbook::new(database);

    run_server(ServerContext {
        spotbook: Arc::new(spotbook),
    })
    .await;
}

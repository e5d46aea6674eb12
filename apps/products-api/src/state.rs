//! Application state management

use mongodb::{Client, Database};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}

/// State pointing at an address nothing listens on; the driver connects
/// lazily, so only handlers that touch the store will fail.
#[cfg(test)]
pub(crate) async fn unreachable_state() -> AppState {
    use crate::config::{Config, Environment};
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::MongoConfig;
    use std::time::Duration;

    let url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200&connectTimeoutMS=200";
    let mongo_client = Client::with_uri_str(url).await.unwrap();
    let db = mongo_client.database("products_api_test");

    AppState {
        config: Config {
            app: app_info!(),
            mongodb: MongoConfig::with_database(url, "products_api_test"),
            server: ServerConfig::default(),
            environment: Environment::Development,
            products_collection: "products".to_string(),
            shutdown_timeout: Duration::from_secs(1),
        },
        mongo_client,
        db,
    }
}

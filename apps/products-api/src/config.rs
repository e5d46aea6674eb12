//! Configuration for Products API

use core_config::{app_info, env_or_default, env_parse_or, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::PRODUCTS_COLLECTION;
use std::time::Duration;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Collection holding product documents
    pub products_collection: String,
    /// Upper bound on cleanup once a shutdown signal arrives
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let products_collection = env_or_default("PRODUCTS_COLLECTION", PRODUCTS_COLLECTION);
        let shutdown_timeout = Duration::from_secs(env_parse_or("SHUTDOWN_TIMEOUT_SECS", 30u64)?);

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            products_collection,
            shutdown_timeout,
        })
    }
}

use deadpool_postgres::{Config, CreatePoolError, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

use crate::settings::config_model::DatabaseConfig;

pub mod frc;

pub use frc::PgGateway;

/// Builds the connection pool shared by all handlers. Connections are opened lazily.
pub fn create_pool(config: &DatabaseConfig) -> Result<Pool, CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(config.get_connection_string());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(config.pool_size));

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

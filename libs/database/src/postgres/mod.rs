//! PostgreSQL pool configuration and connection helpers.

mod config;
mod connector;

pub use config::PostgresConfig;
pub use connector::{connect, connect_with_retry};

pub use sea_orm::{DatabaseConnection, DbErr};

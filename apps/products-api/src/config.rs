//! Configuration for Products API

use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::time::Duration;

pub use core_config::Environment;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Deadline for each product operation (`REQUEST_TIMEOUT_MS`)
    pub request_timeout: Duration,
    /// Bound on draining requests and on closing the pool (`SHUTDOWN_TIMEOUT_SECS`)
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let request_timeout = Duration::from_millis(env_parse(
            "REQUEST_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
        )?);
        if request_timeout.is_zero() {
            eyre::bail!("REQUEST_TIMEOUT_MS must be greater than zero");
        }

        let shutdown_timeout = Duration::from_secs(env_parse(
            "SHUTDOWN_TIMEOUT_SECS",
            DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        )?);

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            request_timeout,
            shutdown_timeout,
        })
    }
}

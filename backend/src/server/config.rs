//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use recipe_backend::domain::PasswordPolicy;
use recipe_backend::outbound::persistence::DbPool;
use recipe_backend::outbound::security::DEFAULT_BCRYPT_COST;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) media_root: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) password_policy: PasswordPolicy,
    pub(crate) bcrypt_cost: u32,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration that keeps data in memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, media_root: PathBuf) -> Self {
        Self {
            bind_addr,
            media_root,
            db_pool: None,
            password_policy: PasswordPolicy::default(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool; repositories switch to Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = policy;
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

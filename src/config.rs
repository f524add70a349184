//! Service configuration.

use serde::Deserialize;

/// Configuration for the microblog service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    #[serde(default = "defaults::database_url")]
    pub database_url: String,

    /// Maximum items per listing page. Applies to every listing view.
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,

    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            database_url: defaults::database_url(),
            page_size: defaults::page_size(),
            max_connections: defaults::max_connections(),
        }
    }
}

mod defaults {
    pub fn bind_address() -> String {
        "0.0.0.0:3080".into()
    }

    pub fn database_url() -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://microblog.db".into())
    }

    pub fn page_size() -> usize {
        10
    }

    pub fn max_connections() -> u32 {
        5
    }
}

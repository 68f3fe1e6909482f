//! Configuration for the registry client

use serde::{Deserialize, Serialize};

/// Environment variable holding the deployed contract address
pub const CONTRACT_ADDRESS_ENV: &str = "MRV_CONTRACT_ADDRESS";

/// Environment variable holding the ledger node URL
pub const LEDGER_URL_ENV: &str = "MRV_LEDGER_URL";

/// Environment variable holding the request timeout in seconds
pub const REQUEST_TIMEOUT_ENV: &str = "MRV_REQUEST_TIMEOUT_SECS";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Deployed registry contract address. Empty means the service stays
    /// uninitialized and every ledger operation fails fast.
    #[serde(default)]
    pub contract_address: String,

    /// Ledger node websocket URL
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Request timeout in seconds, including write confirmation
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    "ws://localhost:9944".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            contract_address: String::new(),
            endpoint_url: default_endpoint_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from the environment, falling back to defaults.
    /// An absent contract address leaves the service uninitialized.
    pub fn from_env() -> Self {
        Self {
            contract_address: std::env::var(CONTRACT_ADDRESS_ENV).unwrap_or_default(),
            endpoint_url: std::env::var(LEDGER_URL_ENV).unwrap_or_else(|_| default_endpoint_url()),
            request_timeout_secs: std::env::var(REQUEST_TIMEOUT_ENV)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_request_timeout),
        }
    }
}

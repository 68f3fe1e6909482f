//! Rust client for the MRV on-chain registry
//!
//! Creates immutable monitoring/reporting/verification records on a ledger,
//! links them into per-project audit trails, and computes deterministic
//! confidence scores from weighted verification inputs. The ledger owns
//! every record; this client holds only transient decoded views.
//!
//! # Example
//!
//! ```rust,no_run
//! use mrv_registry_client::{
//!     CreateMrvParams, MrvRegistryService, RegistryConfig, ReportType, WsTransport,
//!     WsTransportConfig,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RegistryConfig::from_env();
//! let transport = Arc::new(
//!     WsTransport::connect(WsTransportConfig {
//!         url: config.endpoint_url.clone(),
//!         request_timeout_secs: config.request_timeout_secs,
//!     })
//!     .await?,
//! );
//!
//! let service = MrvRegistryService::new(config, transport);
//! service.initialize()?;
//!
//! let tx_id = service
//!     .create_mrv_record(
//!         "0xreporter",
//!         &CreateMrvParams {
//!             project_id: "proj-001".into(),
//!             report_type: ReportType::Monitoring,
//!             data_hash: "sha256-…".into(),
//!             methodology: "VCS-VM0015".into(),
//!             co2_measured: "1250.75".into(),
//!             satellite_data: "sha256-…".into(),
//!             sensor_data: "sha256-…".into(),
//!         },
//!     )
//!     .await?;
//! println!("confirmed: {tx_id}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod gateway;
pub mod numeric;
pub mod scoring;
pub mod service;
pub mod transport;
pub mod types;
pub mod wire;

// Re-export main types
pub use config::RegistryConfig;
pub use content::derive_content_address;
pub use error::{RegistryError, Result};
pub use events::{EventHandler, EventHandlers, EventRouter, HandlerErrorHook};
pub use gateway::LedgerGateway;
pub use numeric::{decode_fixed_point, encode_fixed_point, FIXED_POINT_DECIMALS};
pub use scoring::{compute_confidence_score, ScoreFactors};
pub use service::MrvRegistryService;
pub use transport::{LedgerTransport, WsTransport, WsTransportConfig};
pub use types::*;

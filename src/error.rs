//! Error types for the registry client

use thiserror::Error;

/// Registry client error
///
/// Write failures distinguish two outcomes that demand different retry
/// handling: [`RegistryError::TransactionFailed`] means the ledger
/// definitively rejected the call, while [`RegistryError::LedgerUnavailable`]
/// means the transport failed and the true outcome is unknown.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Service or gateway used before binding to a deployed contract address
    #[error("contract not initialized")]
    ContractNotInitialized,

    /// Missing or structurally invalid operation parameters
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Out-of-range or malformed scalar input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Payload cannot be serialized for content addressing
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// The ledger rejected or reverted the write. Inspect the cause and
    /// re-read the relevant entity before retrying.
    #[error("transaction failed in {operation}: {reason}")]
    TransactionFailed {
        operation: &'static str,
        reason: String,
    },

    /// Transport failure; confirmation status unknown. Reads may retry
    /// unconditionally, writes must be re-verified by id first.
    #[error("ledger unavailable in {operation}: {reason}")]
    LedgerUnavailable {
        operation: &'static str,
        reason: String,
    },

    /// Reply envelope did not match the expected shape
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl RegistryError {
    /// True for read failures that are safe to retry unconditionally.
    pub fn is_retryable_read(&self) -> bool {
        matches!(self, RegistryError::LedgerUnavailable { .. })
    }

    /// True when ledger state may have changed despite the error.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, RegistryError::LedgerUnavailable { .. })
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

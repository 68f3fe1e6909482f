//! Transaction and query transport to the ledger node
//!
//! [`LedgerTransport`] is the seam between the gateway and the wire: submit
//! a call and block until the ledger confirms it, run a read-only query, or
//! subscribe to the push event feed. The production implementation is
//! [`WsTransport`]; tests drive the same trait with an in-memory ledger.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::types::{LedgerEvent, TxId};
use crate::wire::{QueryReply, QueryRequest, SubmitRequest};

pub mod ws;

pub use ws::{WsTransport, WsTransportConfig};

/// Capacity of the event fan-out channel
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Transport boundary to the on-chain registry
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Submit a state-changing call and block until the ledger confirms it.
    ///
    /// A reverted call fails with `TransactionFailed` (definitively
    /// rejected); a transport failure or exceeded deadline fails with
    /// `LedgerUnavailable` (outcome indeterminate).
    async fn submit(&self, request: SubmitRequest) -> Result<TxId>;

    /// Execute a read-only contract query. Transport failures surface as
    /// `LedgerUnavailable` and are safe to retry.
    async fn query(&self, request: QueryRequest) -> Result<QueryReply>;

    /// Subscribe to ledger-emitted events. No replay: only events emitted
    /// after this call are delivered.
    fn subscribe(&self) -> broadcast::Receiver<LedgerEvent>;
}

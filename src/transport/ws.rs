//! WebSocket transport to a ledger node
//!
//! JSON envelopes over a single WebSocket connection. Requests carry a
//! monotonically-assigned id; a receiver task correlates replies back to the
//! waiting caller and fans push events into a broadcast channel. The
//! transport knows envelope framing only; contract semantics live in the
//! gateway.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};

use super::{LedgerTransport, EVENT_CHANNEL_CAPACITY};
use crate::error::{RegistryError, Result};
use crate::types::{LedgerEvent, TxId};
use crate::wire::{QueryReply, QueryRequest, SubmitRequest};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Reply>>>>;

/// Configuration for connecting to a ledger node
#[derive(Debug, Clone)]
pub struct WsTransportConfig {
    /// Ledger node websocket URL
    pub url: String,
    /// Deadline for a single request, including write confirmation
    pub request_timeout_secs: u64,
}

impl Default for WsTransportConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:9944".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Outbound request envelope
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
enum Request {
    Submit { id: u64, request: SubmitRequest },
    Query { id: u64, request: QueryRequest },
}

/// Inbound envelope: a correlated reply or an unsolicited event push
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload")]
enum Inbound {
    Confirmed { id: u64, tx_id: String },
    Reverted { id: u64, reason: String },
    QueryResult { id: u64, reply: QueryReply },
    QueryError { id: u64, reason: String },
    Event { event: LedgerEvent },
}

#[derive(Debug)]
enum Reply {
    Confirmed { tx_id: String },
    Reverted { reason: String },
    QueryResult { reply: QueryReply },
    QueryError { reason: String },
}

/// WebSocket implementation of [`LedgerTransport`]
///
/// Can only be obtained via [`WsTransport::connect`], which returns once the
/// connection is established. If you hold a `WsTransport`, you can make
/// calls.
pub struct WsTransport {
    sink: Mutex<WsSink>,
    pending: PendingMap,
    events: broadcast::Sender<LedgerEvent>,
    next_id: AtomicU64,
    request_timeout: Duration,
    receiver: JoinHandle<()>,
}

impl WsTransport {
    /// Connect to a ledger node and start the receiver loop.
    pub async fn connect(config: WsTransportConfig) -> Result<Self> {
        debug!(url = %config.url, "connecting to ledger node");

        let (ws, _) = connect_async(&config.url).await.map_err(|e| {
            RegistryError::LedgerUnavailable {
                operation: "connect",
                reason: e.to_string(),
            }
        })?;
        let (sink, stream) = ws.split();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let receiver = tokio::spawn(receiver_loop(
            stream,
            Arc::clone(&pending),
            events.clone(),
        ));

        debug!(url = %config.url, "ledger node connected");
        Ok(Self {
            sink: Mutex::new(sink),
            pending,
            events,
            next_id: AtomicU64::new(1),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            receiver,
        })
    }

    async fn request(&self, operation: &'static str, request: Request, id: u64) -> Result<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.lock().await.insert(id, reply_tx);

        let text = serde_json::to_string(&request)
            .map_err(|e| RegistryError::Protocol(format!("encode request: {e}")))?;

        if let Err(e) = self.sink.lock().await.send(Message::Text(text)).await {
            self.pending.lock().await.remove(&id);
            return Err(RegistryError::LedgerUnavailable {
                operation,
                reason: format!("send failed: {e}"),
            });
        }

        match tokio::time::timeout(self.request_timeout, reply_rx).await {
            Ok(Ok(reply)) => Ok(reply),
            // Receiver loop ended and dropped the pending sender
            Ok(Err(_)) => Err(RegistryError::LedgerUnavailable {
                operation,
                reason: "connection closed before reply".to_string(),
            }),
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(RegistryError::LedgerUnavailable {
                    operation,
                    reason: "request deadline exceeded".to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl LedgerTransport for WsTransport {
    async fn submit(&self, request: SubmitRequest) -> Result<TxId> {
        let operation = request.call.method_name();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        match self
            .request(operation, Request::Submit { id, request }, id)
            .await?
        {
            Reply::Confirmed { tx_id } => Ok(tx_id),
            Reply::Reverted { reason } => {
                Err(RegistryError::TransactionFailed { operation, reason })
            }
            other => Err(RegistryError::Protocol(format!(
                "unexpected reply to submit: {other:?}"
            ))),
        }
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryReply> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        match self
            .request("query", Request::Query { id, request }, id)
            .await?
        {
            Reply::QueryResult { reply } => Ok(reply),
            Reply::QueryError { reason } => Err(RegistryError::Protocol(reason)),
            other => Err(RegistryError::Protocol(format!(
                "unexpected reply to query: {other:?}"
            ))),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.receiver.abort();
    }
}

/// Receiver loop: routes correlated replies to their waiting callers and
/// pushes events into the broadcast channel. Runs until the stream ends.
async fn receiver_loop(
    mut stream: WsStream,
    pending: PendingMap,
    events: broadcast::Sender<LedgerEvent>,
) {
    while let Some(message) = stream.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                warn!(error = %e, "websocket receive error");
                break;
            }
        };

        let inbound: Inbound = match serde_json::from_str(&text) {
            Ok(inbound) => inbound,
            Err(e) => {
                warn!(error = %e, "dropping undecodable ledger message");
                continue;
            }
        };

        match inbound {
            Inbound::Event { event } => {
                // No receivers is fine; events are fire-and-forget here
                let _ = events.send(event);
            }
            Inbound::Confirmed { id, tx_id } => {
                deliver(&pending, id, Reply::Confirmed { tx_id }).await;
            }
            Inbound::Reverted { id, reason } => {
                deliver(&pending, id, Reply::Reverted { reason }).await;
            }
            Inbound::QueryResult { id, reply } => {
                deliver(&pending, id, Reply::QueryResult { reply }).await;
            }
            Inbound::QueryError { id, reason } => {
                deliver(&pending, id, Reply::QueryError { reason }).await;
            }
        }
    }

    // Dropping the senders wakes every waiter with a closed-connection error
    pending.lock().await.clear();
    debug!("ledger receiver loop ended");
}

async fn deliver(pending: &PendingMap, id: u64, reply: Reply) {
    match pending.lock().await.remove(&id) {
        Some(tx) => {
            let _ = tx.send(reply);
        }
        None => debug!(id, "reply for unknown or timed-out request"),
    }
}

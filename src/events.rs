//! Event subscription and dispatch
//!
//! Routes ledger-emitted events to registered handlers. At most one handler
//! is active per event kind; registering again replaces it. Each kind gets
//! its own dispatch lane (queue + worker task), so delivery within a kind is
//! FIFO in emission order while a slow handler for one kind never delays
//! another kind's deliveries. There is no replay: catch-up for events
//! emitted before registration goes through the gateway's read operations.
//!
//! A handler that fails stays registered and does not halt delivery; the
//! failure is reported through the error hook, or logged if none is set.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::types::{EventKind, LedgerEvent};

/// Application callback for one event kind
pub type EventHandler = Box<dyn FnMut(LedgerEvent) -> anyhow::Result<()> + Send>;

/// Callback invoked when a handler fails
pub type HandlerErrorHook = Box<dyn Fn(EventKind, &anyhow::Error) + Send + Sync>;

type HandlerSlot = Arc<Mutex<Option<EventHandler>>>;
type ErrorHookSlot = Arc<Mutex<Option<HandlerErrorHook>>>;

/// Per-kind handler registration, for [`EventRouter::install`]
#[derive(Default)]
pub struct EventHandlers {
    pub on_mrv_record_created: Option<EventHandler>,
    pub on_audit_record_created: Option<EventHandler>,
    pub on_verification_completed: Option<EventHandler>,
    pub on_compliance_updated: Option<EventHandler>,
    pub on_data_integrity_alert: Option<EventHandler>,
}

struct Lane {
    handler: HandlerSlot,
    worker: JoinHandle<()>,
}

/// Dispatches the transport's event feed to registered handlers
pub struct EventRouter {
    lanes: HashMap<EventKind, Lane>,
    error_hook: ErrorHookSlot,
    router: JoinHandle<()>,
}

impl EventRouter {
    /// Start dispatching from a transport event feed. Spawns one worker per
    /// event kind plus a routing task; all are stopped on drop.
    pub fn new(feed: broadcast::Receiver<LedgerEvent>) -> Self {
        let error_hook: ErrorHookSlot = Arc::new(Mutex::new(None));

        let mut lanes = HashMap::new();
        let mut queues = HashMap::new();
        for kind in EventKind::ALL {
            let (queue, rx) = mpsc::unbounded_channel();
            let handler: HandlerSlot = Arc::new(Mutex::new(None));
            let worker = tokio::spawn(lane_loop(
                kind,
                rx,
                Arc::clone(&handler),
                Arc::clone(&error_hook),
            ));
            queues.insert(kind, queue);
            lanes.insert(kind, Lane { handler, worker });
        }

        let router = tokio::spawn(route_loop(feed, queues));

        Self {
            lanes,
            error_hook,
            router,
        }
    }

    /// Register the handler for an event kind, replacing any existing one.
    pub fn set_handler(&self, kind: EventKind, handler: EventHandler) {
        *self.lanes[&kind].handler.lock().unwrap() = Some(handler);
    }

    /// Detach the handler for an event kind. Subsequent events of that kind
    /// are dropped until a new handler is registered.
    pub fn clear_handler(&self, kind: EventKind) {
        *self.lanes[&kind].handler.lock().unwrap() = None;
    }

    /// Install every handler present in the bundle.
    pub fn install(&self, handlers: EventHandlers) {
        let EventHandlers {
            on_mrv_record_created,
            on_audit_record_created,
            on_verification_completed,
            on_compliance_updated,
            on_data_integrity_alert,
        } = handlers;
        for (kind, handler) in [
            (EventKind::MrvRecordCreated, on_mrv_record_created),
            (EventKind::AuditRecordCreated, on_audit_record_created),
            (EventKind::VerificationCompleted, on_verification_completed),
            (EventKind::ComplianceUpdated, on_compliance_updated),
            (EventKind::DataIntegrityAlert, on_data_integrity_alert),
        ] {
            if let Some(handler) = handler {
                self.set_handler(kind, handler);
            }
        }
    }

    /// Set the hook invoked when a handler fails. Without a hook, failures
    /// are logged at warn level.
    pub fn set_error_hook(&self, hook: HandlerErrorHook) {
        *self.error_hook.lock().unwrap() = Some(hook);
    }
}

impl Drop for EventRouter {
    fn drop(&mut self) {
        self.router.abort();
        for lane in self.lanes.values() {
            lane.worker.abort();
        }
    }
}

/// Routing task: drains the broadcast feed and forwards each event to its
/// kind's lane. Cross-kind ordering is not guaranteed; per-kind order is.
async fn route_loop(
    mut feed: broadcast::Receiver<LedgerEvent>,
    queues: HashMap<EventKind, mpsc::UnboundedSender<LedgerEvent>>,
) {
    loop {
        match feed.recv().await {
            Ok(event) => {
                let _ = queues[&event.kind()].send(event);
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "event feed lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn lane_loop(
    kind: EventKind,
    mut rx: mpsc::UnboundedReceiver<LedgerEvent>,
    handler: HandlerSlot,
    error_hook: ErrorHookSlot,
) {
    while let Some(event) = rx.recv().await {
        let outcome = {
            let mut slot = handler.lock().unwrap();
            match slot.as_mut() {
                Some(handler) => handler(event),
                // No handler registered yet: drop, no replay
                None => continue,
            }
        };

        if let Err(error) = outcome {
            let hook = error_hook.lock().unwrap();
            match hook.as_ref() {
                Some(hook) => hook(kind, &error),
                None => warn!(kind = kind.as_str(), error = %error, "event handler failed"),
            }
        }
    }
}

//! The bridge engine: outbound dispatch, inbound matching, deadlines.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::BridgeConfig;
use crate::correlation::id::RequestId;
use crate::correlation::table::RequestTable;
use crate::error::{BridgeError, BridgeResult};
use crate::transport::{MessageSink, RawMessage, SinkSet, Transport};
use crate::wire::{self, OutboundEnvelope, Reply};

/// Well-known action names answered by the host.
pub mod actions {
    /// Fetch the device's current geolocation.
    pub const GET_NATIVE_LOCATION: &str = "getNativeLocation";
    /// Fetch the device's push-notification registration token.
    pub const GET_FCM_TOKEN: &str = "getFcmToken";
}

/// A geographic position as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// The correlation engine.
///
/// Owns the request table and the single inbound dispatcher for its
/// transport. Cloning yields another handle to the same engine; this is how
/// the engine is shared, rather than through any global instance.
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    table: RequestTable,
    sinks: SinkSet,
    dispatcher: JoinHandle<()>,
}

impl Drop for BridgeInner {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}

impl Bridge {
    /// Construct an engine over `transport`.
    ///
    /// Consumes the transport: its inbound receiver moves into the one
    /// dispatcher task, so no second listener can exist for this channel.
    pub fn new(transport: Transport, config: BridgeConfig) -> Self {
        let (sinks, inbound_rx) = transport.into_parts();
        let table = RequestTable::new();
        let dispatcher = spawn_dispatcher(table.clone(), inbound_rx);

        tracing::debug!(
            timeout_ms = config.timeout_ms,
            dialect = ?config.dialect,
            "Bridge initialized"
        );

        Self {
            inner: Arc::new(BridgeInner {
                config,
                table,
                sinks,
                dispatcher,
            }),
        }
    }

    /// Construct an engine with the default configuration.
    pub fn with_defaults(transport: Transport) -> Self {
        Self::new(transport, BridgeConfig::default())
    }

    /// Send `action` to the host and await its reply, using the configured
    /// default deadline.
    pub async fn call(&self, action: &str, payload: Value) -> BridgeResult<Value> {
        self.call_with_timeout(action, payload, self.inner.config.default_timeout())
            .await
    }

    /// Send `action` to the host and await its reply for at most `timeout`.
    ///
    /// Exactly one of three things happens, first wins:
    /// a success reply resolves with its data, an error reply fails with the
    /// host's message, or the deadline fails the call with
    /// [`BridgeError::Timeout`]. A reply arriving after the deadline finds no
    /// table entry and is dropped.
    pub async fn call_with_timeout(
        &self,
        action: &str,
        payload: Value,
        timeout: Duration,
    ) -> BridgeResult<Value> {
        let id = RequestId::next();
        let reply_rx = self.inner.table.register(id);

        let envelope = OutboundEnvelope {
            id,
            action: action.to_string(),
            data: payload,
        };
        if let Err(err) = self.inner.sinks.send(&envelope.encode(self.inner.config.dialect)) {
            // Never leave an entry behind for a request that was never sent.
            self.inner.table.forget(id);
            return Err(BridgeError::Transport(err));
        }

        tracing::debug!(request_id = %id, action, timeout_ms = timeout.as_millis() as u64, "Request dispatched");

        match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(Reply::Success(data))) => {
                tracing::debug!(request_id = %id, action, "Request succeeded");
                Ok(data)
            }
            Ok(Ok(Reply::Error(message))) => {
                tracing::debug!(request_id = %id, action, error = %message, "Host reported error");
                Err(BridgeError::Host(message))
            }
            // Sender dropped without a reply: the dispatcher is gone.
            Ok(Err(_)) => Err(BridgeError::Closed),
            Err(_) => {
                // Delete-if-present: a reply may have claimed the entry in
                // the same instant, in which case there is nothing to clean.
                self.inner.table.forget(id);
                tracing::debug!(request_id = %id, action, "Request timed out");
                Err(BridgeError::Timeout {
                    elapsed_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    /// Fetch the device's current geolocation from the host.
    pub async fn get_native_location(&self) -> BridgeResult<Location> {
        let data = self.call(actions::GET_NATIVE_LOCATION, empty_payload()).await?;
        serde_json::from_value(data).map_err(|source| BridgeError::Decode {
            action: actions::GET_NATIVE_LOCATION,
            source,
        })
    }

    /// Fetch the device's push-notification registration token from the host.
    pub async fn get_fcm_token(&self) -> BridgeResult<String> {
        let data = self.call(actions::GET_FCM_TOKEN, empty_payload()).await?;
        serde_json::from_value(data).map_err(|source| BridgeError::Decode {
            action: actions::GET_FCM_TOKEN,
            source,
        })
    }

    /// Whether the host-injected message sink is currently present.
    ///
    /// Pure probe: touches no request state.
    pub fn is_host_present(&self) -> bool {
        self.inner.sinks.host_present()
    }

    /// Attach the host-injected sink; subsequent sends prefer it.
    pub fn attach_host(&self, sink: Arc<dyn MessageSink>) {
        self.inner.sinks.attach_host(sink);
    }

    /// Detach the host sink, reverting sends to the parent fallback.
    pub fn detach_host(&self) {
        self.inner.sinks.detach_host();
    }

    /// Number of calls currently awaiting a reply.
    pub fn pending_requests(&self) -> usize {
        self.inner.table.len()
    }
}

fn empty_payload() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Run the process-wide inbound loop for one transport: decode each raw
/// payload and resolve the matching table entry, if any.
fn spawn_dispatcher(
    table: RequestTable,
    mut inbound_rx: mpsc::UnboundedReceiver<RawMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(raw) = inbound_rx.recv().await {
            let Some(envelope) = wire::decode(raw) else {
                // Foreign traffic on the shared channel.
                tracing::debug!("Ignoring inbound message with no recognizable envelope");
                continue;
            };
            if !table.complete(envelope.id, envelope.reply) {
                // Stale duplicate or a reply that lost to its deadline.
                tracing::trace!(request_id = %envelope.id, "Dropping reply with no pending request");
            }
        }
        tracing::debug!("Inbound channel closed, dispatcher exiting");
    })
}

//! Transport abstraction over the embedding environment's messaging.
//!
//! # Responsibilities
//! - Hand serialized outbound envelopes to a message sink
//! - Prefer the host-injected sink, fall back to the parent context sink
//! - Expose a handle on which the embedding delivers raw inbound payloads
//!
//! # Design Decisions
//! - Sinks are trait objects so the real environment bindings and the
//!   in-process test doubles share one seam.
//! - The host sink may appear or disappear at runtime (the host injects it
//!   after page load); the fallback to the parent sink never errors on mere
//!   absence.
//! - The inbound side is a single channel; the engine consumes the receiver
//!   exactly once when it is constructed, so a duplicate listener is
//!   unrepresentable.

pub mod channel;

use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

/// Failures handing a message to a sink.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The sink's far side is gone.
    #[error("message sink closed")]
    Closed,

    /// The sink rejected the message.
    #[error("post failed: {0}")]
    PostFailed(String),
}

/// One-way outbound message sink. Accepts a serialized envelope.
pub trait MessageSink: Send + Sync {
    /// Hand one serialized message to the far side.
    fn post(&self, raw: &str) -> Result<(), TransportError>;
}

/// A raw inbound payload as delivered by the shared event channel: either
/// text to be parsed or an already-structured value.
#[derive(Debug, Clone)]
pub enum RawMessage {
    Text(String),
    Structured(Value),
}

/// Cloneable handle the embedding uses to deliver inbound payloads.
#[derive(Debug, Clone)]
pub struct InboundHandle {
    tx: mpsc::UnboundedSender<RawMessage>,
}

impl InboundHandle {
    /// Deliver one raw payload to the engine. Delivery after the engine is
    /// gone is silently dropped, matching fire-and-forget semantics.
    pub fn deliver(&self, message: RawMessage) {
        let _ = self.tx.send(message);
    }

    /// Convenience for text payloads.
    pub fn deliver_text(&self, text: impl Into<String>) {
        self.deliver(RawMessage::Text(text.into()));
    }
}

/// The outbound sink pair: a mandatory parent sink plus an optional,
/// runtime-swappable host sink.
#[derive(Clone)]
pub(crate) struct SinkSet {
    inner: Arc<SinkSetInner>,
}

struct SinkSetInner {
    parent: Arc<dyn MessageSink>,
    host: RwLock<Option<Arc<dyn MessageSink>>>,
}

impl SinkSet {
    fn new(parent: Arc<dyn MessageSink>) -> Self {
        Self {
            inner: Arc::new(SinkSetInner {
                parent,
                host: RwLock::new(None),
            }),
        }
    }

    /// Send to the host sink when present, otherwise to the parent sink.
    pub(crate) fn send(&self, raw: &str) -> Result<(), TransportError> {
        let host = self
            .inner
            .host
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match host {
            Some(sink) => sink.post(raw),
            None => self.inner.parent.post(raw),
        }
    }

    pub(crate) fn attach_host(&self, sink: Arc<dyn MessageSink>) {
        *self
            .inner
            .host
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(sink);
    }

    pub(crate) fn detach_host(&self) {
        *self
            .inner
            .host
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub(crate) fn host_present(&self) -> bool {
        self.inner
            .host
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }
}

/// The bidirectional seam between the bridge and its embedding environment.
///
/// Constructed with the always-available parent sink; the host sink can be
/// attached before or after the engine takes ownership. Consumed by
/// [`Bridge::new`](crate::Bridge::new), which takes the inbound receiver —
/// one transport, one listener.
pub struct Transport {
    sinks: SinkSet,
    inbound_tx: mpsc::UnboundedSender<RawMessage>,
    inbound_rx: mpsc::UnboundedReceiver<RawMessage>,
}

impl Transport {
    /// Create a transport over the given parent sink.
    pub fn new(parent: Arc<dyn MessageSink>) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            sinks: SinkSet::new(parent),
            inbound_tx,
            inbound_rx,
        }
    }

    /// Attach the host-injected sink. Subsequent sends prefer it.
    pub fn attach_host(&self, sink: Arc<dyn MessageSink>) {
        self.sinks.attach_host(sink);
    }

    /// Handle for the embedding to deliver inbound payloads on.
    pub fn inbound_handle(&self) -> InboundHandle {
        InboundHandle {
            tx: self.inbound_tx.clone(),
        }
    }

    /// Split into the send side and the inbound receiver.
    pub(crate) fn into_parts(self) -> (SinkSet, mpsc::UnboundedReceiver<RawMessage>) {
        (self.sinks, self.inbound_rx)
    }
}

#[cfg(test)]
mod tests {
    use super::channel::ChannelSink;
    use super::*;

    #[tokio::test]
    async fn send_falls_back_to_parent_without_host() {
        let (parent, mut parent_rx) = ChannelSink::new();
        let transport = Transport::new(Arc::new(parent));

        assert!(!transport.sinks.host_present());
        transport.sinks.send("ping").unwrap();
        assert_eq!(parent_rx.recv().await.unwrap(), "ping");
    }

    #[tokio::test]
    async fn send_prefers_host_when_attached() {
        let (parent, mut parent_rx) = ChannelSink::new();
        let (host, mut host_rx) = ChannelSink::new();
        let transport = Transport::new(Arc::new(parent));
        transport.attach_host(Arc::new(host));

        assert!(transport.sinks.host_present());
        transport.sinks.send("ping").unwrap();
        assert_eq!(host_rx.recv().await.unwrap(), "ping");
        assert!(parent_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn detach_restores_parent_fallback() {
        let (parent, mut parent_rx) = ChannelSink::new();
        let (host, _host_rx) = ChannelSink::new();
        let transport = Transport::new(Arc::new(parent));
        transport.attach_host(Arc::new(host));
        transport.sinks.detach_host();

        transport.sinks.send("ping").unwrap();
        assert_eq!(parent_rx.recv().await.unwrap(), "ping");
    }

    #[tokio::test]
    async fn closed_sink_reports_error() {
        let (parent, parent_rx) = ChannelSink::new();
        drop(parent_rx);
        let transport = Transport::new(Arc::new(parent));

        assert!(matches!(
            transport.sinks.send("ping"),
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn inbound_handle_delivers_in_arrival_order() {
        let (parent, _parent_rx) = ChannelSink::new();
        let transport = Transport::new(Arc::new(parent));
        let handle = transport.inbound_handle();

        handle.deliver_text("one");
        handle.deliver(RawMessage::Structured(serde_json::json!({"id": 2})));

        let (_, mut rx) = transport.into_parts();
        assert!(matches!(rx.recv().await.unwrap(), RawMessage::Text(t) if t == "one"));
        assert!(matches!(rx.recv().await.unwrap(), RawMessage::Structured(_)));
    }
}

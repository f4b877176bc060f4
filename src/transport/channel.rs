//! In-process channel-backed sink for tests and demos.

use tokio::sync::mpsc;

use super::{MessageSink, TransportError};

/// A [`MessageSink`] that forwards posted messages onto an unbounded channel.
///
/// Lets a test or demo play the host (or parent) side of the bridge: posted
/// envelopes come out of the paired receiver as plain strings.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiver its messages arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageSink for ChannelSink {
    fn post(&self, raw: &str) -> Result<(), TransportError> {
        self.tx
            .send(raw.to_string())
            .map_err(|_| TransportError::Closed)
    }
}

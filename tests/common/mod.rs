//! Shared utilities for bridge integration tests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;

use hostbridge::{Bridge, BridgeConfig, ChannelSink, InboundHandle, Transport};

/// Build a bridge whose host side is driven by the test: returns the bridge,
/// the receiver carrying its outbound envelopes, and the handle to deliver
/// inbound replies on.
pub fn bridge_with_channel_host(
    config: BridgeConfig,
) -> (Bridge, mpsc::UnboundedReceiver<String>, InboundHandle) {
    let (parent, _parent_rx) = ChannelSink::new();
    let transport = Transport::new(Arc::new(parent));
    let inbound = transport.inbound_handle();

    let (host, host_rx) = ChannelSink::new();
    transport.attach_host(Arc::new(host));

    (Bridge::new(transport, config), host_rx, inbound)
}

/// Start a programmable host that maps every outbound envelope to a reply.
///
/// The closure receives the decoded outbound envelope and returns the raw
/// reply to deliver, or `None` to stay silent for that request.
pub fn start_scripted_host<F, Fut>(
    mut outbound: mpsc::UnboundedReceiver<String>,
    inbound: InboundHandle,
    respond: F,
) where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<Value>> + Send + 'static,
{
    let respond = Arc::new(respond);
    tokio::spawn(async move {
        while let Some(raw) = outbound.recv().await {
            let Ok(envelope) = serde_json::from_str::<Value>(&raw) else {
                continue;
            };
            let respond = respond.clone();
            let inbound = inbound.clone();
            tokio::spawn(async move {
                if let Some(reply) = respond(envelope).await {
                    inbound.deliver_text(reply.to_string());
                }
            });
        }
    });
}

/// A host that answers after a fixed delay.
#[allow(dead_code)]
pub fn start_delayed_host<F>(
    outbound: mpsc::UnboundedReceiver<String>,
    inbound: InboundHandle,
    delay: Duration,
    respond: F,
) where
    F: Fn(Value) -> Option<Value> + Send + Sync + 'static,
{
    start_scripted_host(outbound, inbound, move |envelope| {
        let reply = respond(envelope);
        async move {
            tokio::time::sleep(delay).await;
            reply
        }
    });
}

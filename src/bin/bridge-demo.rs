//! Demo binary: runs the bridge against a simulated host.
//!
//! The simulated host lives on the other end of an in-process sink and
//! answers the well-known actions after a configurable delay, so both the
//! success and the timeout paths can be exercised from the command line.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hostbridge::{Bridge, BridgeConfig, ChannelSink, InboundHandle, Transport, WireDialect};

#[derive(Parser)]
#[command(name = "bridge-demo")]
#[command(about = "Exercise the host bridge against a simulated host", long_about = None)]
struct Cli {
    /// Default per-request deadline in milliseconds.
    #[arg(long, default_value_t = 2_000)]
    timeout_ms: u64,

    /// Delay before the simulated host answers, in milliseconds.
    #[arg(long, default_value_t = 50)]
    host_delay_ms: u64,

    /// Use the legacy wire dialect (messageId / postMessageType).
    #[arg(long)]
    legacy: bool,

    /// Make the simulated host deny every request.
    #[arg(long)]
    deny: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hostbridge=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = BridgeConfig {
        timeout_ms: cli.timeout_ms,
        dialect: if cli.legacy {
            WireDialect::Legacy
        } else {
            WireDialect::Standard
        },
    };
    config.validate()?;

    let (parent, _parent_rx) = ChannelSink::new();
    let transport = Transport::new(Arc::new(parent));
    let inbound = transport.inbound_handle();

    let (host, host_rx) = ChannelSink::new();
    transport.attach_host(Arc::new(host));
    simulate_host(
        host_rx,
        inbound,
        Duration::from_millis(cli.host_delay_ms),
        cli.deny,
    );

    let bridge = Bridge::new(transport, config);
    tracing::info!(host_present = bridge.is_host_present(), "Bridge ready");

    match bridge.get_native_location().await {
        Ok(location) => tracing::info!(?location, "getNativeLocation succeeded"),
        Err(err) => tracing::warn!(%err, "getNativeLocation failed"),
    }

    match bridge.get_fcm_token().await {
        Ok(token) => tracing::info!(token = %token, "getFcmToken succeeded"),
        Err(err) => tracing::warn!(%err, "getFcmToken failed"),
    }

    // An action the simulated host does not implement: demonstrates timeout.
    match bridge
        .call_with_timeout("openSettings", json!({}), Duration::from_millis(200))
        .await
    {
        Ok(data) => tracing::info!(%data, "openSettings succeeded"),
        Err(err) => tracing::warn!(%err, "openSettings failed"),
    }

    Ok(())
}

/// Play the host: answer known actions after `delay`, stay silent otherwise.
fn simulate_host(
    mut outbound: mpsc::UnboundedReceiver<String>,
    inbound: InboundHandle,
    delay: Duration,
    deny: bool,
) {
    tokio::spawn(async move {
        while let Some(raw) = outbound.recv().await {
            let Ok(envelope) = serde_json::from_str::<Value>(&raw) else {
                continue;
            };
            let id = envelope.get("id").or_else(|| envelope.get("messageId")).cloned();
            let action = envelope
                .get("action")
                .or_else(|| envelope.get("postMessageType"))
                .and_then(Value::as_str)
                .map(str::to_string);
            let (Some(id), Some(action)) = (id, action) else {
                continue;
            };

            let inbound = inbound.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let reply = if deny {
                    json!({"id": id, "error": "denied"})
                } else {
                    match action.as_str() {
                        "getNativeLocation" => {
                            json!({"id": id, "data": {"latitude": 52.52, "longitude": 13.405}})
                        }
                        "getFcmToken" => json!({"id": id, "data": "fcm-demo-token"}),
                        // Unknown action: never answer, let the caller time out.
                        _ => return,
                    }
                };
                inbound.deliver_text(reply.to_string());
            });
        }
    });
}

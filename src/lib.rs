//! Host Bridge SDK
//!
//! A request/response correlation layer for web content embedded in a native
//! host application. The embedding environment only offers one-way,
//! fire-and-forget string messaging in each direction; this crate turns that
//! raw channel into promise-like calls with per-request timeouts.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller                      ┌──────────────────────────────┐
//!   ──── call(action) ─────────▶│        correlation           │
//!                               │  id gen → RequestTable entry │
//!                               │        │                     │
//!                               │        ▼                     │
//!                               │  wire (encode envelope)      │
//!                               │        │                     │      host
//!                               │        ▼                     │   application
//!                               │  transport ──────────────────┼──────▶
//!                               │  (host sink, parent fallback)│
//!                               │                              │
//!                               │  dispatcher ◀────────────────┼──────
//!                               │  decode → match id →         │  inbound
//!   ◀─── outcome ───────────────│  resolve / reject / ignore   │  channel
//!                               └──────────────────────────────┘
//! ```
//!
//! Every call resolves exactly once: with the host's reply data, with the
//! host's reported error, or with a timeout — whichever happens first.
//! Inbound traffic that is malformed or references no pending request is
//! dropped silently, since the shared channel may carry foreign messages.

pub mod config;
pub mod correlation;
pub mod error;
pub mod transport;
pub mod wire;

pub use config::BridgeConfig;
pub use correlation::engine::{actions, Bridge, Location};
pub use correlation::id::RequestId;
pub use error::{BridgeError, BridgeResult};
pub use transport::channel::ChannelSink;
pub use transport::{InboundHandle, MessageSink, RawMessage, Transport, TransportError};
pub use wire::WireDialect;

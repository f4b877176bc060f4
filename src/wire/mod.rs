//! Wire format for bridge envelopes.
//!
//! # Data Flow
//! ```text
//! Outbound:
//!     OutboundEnvelope { id, action, data }
//!         → encode(dialect) → JSON text → transport sink
//!
//! Inbound (untrusted):
//!     raw text or structured value
//!         → decode → InboundEnvelope { id, reply } or None (not ours)
//! ```
//!
//! # Design Decisions
//! - Two field-name dialects exist in the wild (`id`/`action` and
//!   `messageId`/`postMessageType`); both are instances of the same contract.
//!   Outbound picks one, inbound accepts either.
//! - Inbound decoding never fails loudly. The event channel is shared with
//!   other consumers, so anything unrecognizable decodes to `None`.
//! - Failure is signaled by the presence of an `error` field, success by its
//!   absence; `data` is optional either way.

pub mod envelope;

pub use envelope::{decode, InboundEnvelope, OutboundEnvelope, Reply, WireDialect};

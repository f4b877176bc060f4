//! Request/response correlation over the one-way message channel.
//!
//! # Responsibilities
//! - Generate identifiers unique among outstanding requests
//! - Track in-flight requests in an owned table (never module-global)
//! - Match inbound envelopes to pending requests and resolve them
//! - Enforce one deadline per request
//! - Guarantee at-most-one completion per request
//!
//! # Data Flow
//! ```text
//! call(action, payload):
//!     id.rs (fresh RequestId)
//!         → table.rs (register pending entry)
//!         → wire encode → transport send
//!         → await reply-or-deadline
//!
//! inbound message:
//!     engine.rs dispatcher → wire decode
//!         → table.rs complete (delete-if-present, first completer wins)
//! ```

pub mod engine;
pub mod id;
pub mod table;

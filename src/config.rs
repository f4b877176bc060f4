//! Bridge configuration.
//!
//! All types derive Serde traits so embedders can load configuration from
//! JSON handed over by the host page. Every field has a default; an empty
//! document is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wire::WireDialect;

/// Default per-request deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration for a [`Bridge`](crate::Bridge) instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Deadline applied to calls that do not specify their own, in
    /// milliseconds. Every call has a deadline; zero is rejected by
    /// [`validate`](Self::validate).
    pub timeout_ms: u64,

    /// Field-name dialect used for outbound envelopes. Inbound decoding
    /// accepts both dialects regardless of this setting.
    pub dialect: WireDialect,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            dialect: WireDialect::Standard,
        }
    }
}

impl BridgeConfig {
    /// The default deadline as a [`Duration`].
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the configuration for values the engine cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

/// Configuration validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A zero deadline would make every call fail immediately.
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,
}

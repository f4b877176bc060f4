//! Request identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global atomic counter for request IDs.
/// Relaxed ordering is sufficient since we only need uniqueness, not
/// synchronization. A counter cannot collide with any live entry: it never
/// repeats within a process, and uniqueness is only required among
/// concurrently outstanding requests.
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Correlation identifier linking an outbound request to its reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Generate a fresh unique request ID.
    pub fn next() -> Self {
        Self(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Reconstruct an ID from its wire value.
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_unique() {
        let id1 = RequestId::next();
        let id2 = RequestId::next();
        assert_ne!(id1, id2);
    }

    #[test]
    fn wire_round_trip() {
        let id = RequestId::next();
        assert_eq!(RequestId::from_u64(id.as_u64()), id);
    }

    #[test]
    fn display_format() {
        assert_eq!(RequestId::from_u64(12).to_string(), "req-12");
    }
}

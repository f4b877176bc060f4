//! The in-flight request table.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::oneshot;

use crate::correlation::id::RequestId;
use crate::wire::Reply;

/// One outstanding call awaiting its reply.
///
/// The oneshot sender is the success/failure continuation pair: it can fire
/// once, and dropping it unanswered tells the caller the bridge went away.
#[derive(Debug)]
pub(crate) struct PendingRequest {
    reply_tx: oneshot::Sender<Reply>,
}

/// Thread-safe map of request ID to pending request.
///
/// Exactly one entry exists per in-flight call. Removal is delete-if-present:
/// `complete` and `forget` may race (a reply against a deadline) and the map
/// hands the entry to exactly one of them.
#[derive(Debug, Clone, Default)]
pub struct RequestTable {
    inner: Arc<DashMap<RequestId, PendingRequest>>,
}

impl RequestTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending request and return the receiver its reply will
    /// arrive on.
    pub(crate) fn register(&self, id: RequestId) -> oneshot::Receiver<Reply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inner.insert(id, PendingRequest { reply_tx });
        reply_rx
    }

    /// Resolve the pending request for `id` with `reply`.
    ///
    /// Returns `false` when no such entry is live (already completed, timed
    /// out, or never existed) — the caller drops the reply silently.
    pub(crate) fn complete(&self, id: RequestId, reply: Reply) -> bool {
        match self.inner.remove(&id) {
            Some((_, pending)) => {
                // The receiver may already be gone if the caller's deadline
                // won the race in the same instant; that is fine.
                let _ = pending.reply_tx.send(reply);
                true
            }
            None => false,
        }
    }

    /// Remove the entry for `id` without resolving it, if still present.
    ///
    /// Used by the timeout path and by failed sends. Idempotent.
    pub(crate) fn forget(&self, id: RequestId) -> bool {
        self.inner.remove(&id).is_some()
    }

    /// Number of in-flight requests.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no requests are in flight.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complete_delivers_reply_and_removes_entry() {
        let table = RequestTable::new();
        let id = RequestId::next();
        let mut rx = table.register(id);
        assert_eq!(table.len(), 1);

        assert!(table.complete(id, Reply::Success(json!("ok"))));
        assert!(table.is_empty());
        assert_eq!(rx.try_recv().unwrap(), Reply::Success(json!("ok")));
    }

    #[test]
    fn complete_unknown_id_is_noop() {
        let table = RequestTable::new();
        assert!(!table.complete(RequestId::next(), Reply::Success(json!(null))));
    }

    #[test]
    fn second_completion_is_impossible() {
        let table = RequestTable::new();
        let id = RequestId::next();
        let _rx = table.register(id);

        assert!(table.complete(id, Reply::Error("first".to_string())));
        assert!(!table.complete(id, Reply::Error("second".to_string())));
    }

    #[test]
    fn forget_is_idempotent() {
        let table = RequestTable::new();
        let id = RequestId::next();
        let _rx = table.register(id);

        assert!(table.forget(id));
        assert!(!table.forget(id));
        assert!(!table.complete(id, Reply::Success(json!(null))));
    }

    #[test]
    fn entries_are_independent() {
        let table = RequestTable::new();
        let id_a = RequestId::next();
        let id_b = RequestId::next();
        let _rx_a = table.register(id_a);
        let mut rx_b = table.register(id_b);

        assert!(table.forget(id_a));
        assert_eq!(table.len(), 1);

        assert!(table.complete(id_b, Reply::Success(json!(2))));
        assert_eq!(rx_b.try_recv().unwrap(), Reply::Success(json!(2)));
    }
}

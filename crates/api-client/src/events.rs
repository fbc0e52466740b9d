use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;

use taskdeck_api::Identity;

/// One auth-state report. The sequence number is assigned at publish time and
/// is strictly increasing across the process, so consumers can apply reports
/// last-writer-wins by sequence instead of by arrival time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub seq: u64,
    pub identity: Option<Identity>,
}

/// Broadcast of auth-state changes from the backend client. Cloned handles
/// share one sequence counter; a subscription stays active until its receiver
/// is dropped.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    seq: Arc<AtomicU64>,
    tx: broadcast::Sender<AuthChange>,
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            seq: Arc::new(AtomicU64::new(0)),
            tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.tx.subscribe()
    }

    /// Stamp and broadcast a report. Returns the stamped change so the caller
    /// can also hand it to whoever triggered the operation. Publishing with no
    /// live subscribers is not an error.
    pub fn publish(&self, identity: Option<Identity>) -> AuthChange {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let change = AuthChange { seq, identity };
        let _ = self.tx.send(change.clone());
        change
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.to_string(),
            email: format!("{id}@example.com"),
        }
    }

    #[test]
    fn sequence_numbers_are_strictly_increasing() {
        let events = AuthEvents::new();
        let a = events.publish(Some(identity("u-1")));
        let b = events.publish(None);
        let c = events.publish(Some(identity("u-2")));
        assert!(a.seq < b.seq && b.seq < c.seq);
    }

    #[test]
    fn subscribers_receive_published_changes_in_order() {
        let events = AuthEvents::new();
        let mut rx = events.subscribe();

        events.publish(Some(identity("u-1")));
        events.publish(None);

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.identity.as_ref().map(|i| i.id.as_str()), Some("u-1"));
        assert!(second.identity.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn cloned_handles_share_the_sequence_counter() {
        let events = AuthEvents::new();
        let other = events.clone();
        let a = events.publish(None);
        let b = other.publish(None);
        assert_eq!(b.seq, a.seq + 1);
    }
}

use std::collections::BTreeSet;
use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

use crate::{Error, NodeId, Result};

/// Creates a readiness gate that opens once `expected` distinct members
/// have reported ready.
pub fn gate(expected: usize) -> (ReadinessNotifier, Readiness) {
    let (tx, rx) = watch::channel(BTreeSet::new());
    (
        ReadinessNotifier { tx: Arc::new(tx) },
        Readiness { rx, expected },
    )
}

/// The side members use to report that they can receive messages.
#[derive(Debug, Clone)]
pub struct ReadinessNotifier {
    tx: Arc<watch::Sender<BTreeSet<NodeId>>>,
}

impl ReadinessNotifier {
    pub fn mark_ready(&self, id: NodeId) {
        debug!("[NODE-{id}] ready");
        self.tx.send_modify(|ready| {
            ready.insert(id);
        });
    }
}

/// The side `start` waits on.
#[derive(Debug, Clone)]
pub struct Readiness {
    rx: watch::Receiver<BTreeSet<NodeId>>,
    expected: usize,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.rx.borrow().len() >= self.expected
    }

    /// Resolves once every member is ready.
    pub async fn wait(&self) -> Result<()> {
        let expected = self.expected;
        let mut rx = self.rx.clone();
        rx.wait_for(|ready| ready.len() >= expected)
            .await
            .map(|_| ())
            .map_err(|_| Error::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gate_opens_when_everyone_is_ready() {
        let (notifier, readiness) = gate(2);
        assert!(!readiness.is_ready());

        notifier.mark_ready(0);
        notifier.mark_ready(0);
        assert!(!readiness.is_ready());

        let waiter = tokio::spawn({
            let readiness = readiness.clone();
            async move { readiness.wait().await }
        });
        notifier.mark_ready(1);

        waiter.await.unwrap().unwrap();
        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn test_wait_fails_when_gate_is_dropped() {
        let (notifier, readiness) = gate(1);
        drop(notifier);
        assert!(matches!(readiness.wait().await, Err(Error::NotReady)));
    }
}

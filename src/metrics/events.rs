//! Events delivered to collector subscribers

use super::TrafficSnapshot;
use std::time::SystemTime;
use tokio::sync::broadcast;
use tracing::debug;

/// Message published by the sampling loop
#[derive(Debug, Clone, PartialEq)]
pub enum CollectorEvent {
    /// A new snapshot was taken and stored in the history
    Snapshot(TrafficSnapshot),
    /// Gathering counters from the data store failed on this tick
    CollectionError { message: String, at: SystemTime },
}

impl CollectorEvent {
    /// The snapshot carried by this event, if any
    #[must_use]
    pub fn snapshot(&self) -> Option<&TrafficSnapshot> {
        match self {
            Self::Snapshot(snapshot) => Some(snapshot),
            Self::CollectionError { .. } => None,
        }
    }
}

/// Receiving end of the collector's event stream
///
/// The channel is bounded. When this subscriber falls behind, the oldest
/// undelivered events are dropped and `recv` resumes at the oldest retained
/// one, so a slow consumer always catches up to fresh data.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<CollectorEvent>,
    dropped: u64,
}

impl Subscription {
    pub(crate) fn new(rx: broadcast::Receiver<CollectorEvent>) -> Self {
        Self { rx, dropped: 0 }
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the collector has been dropped and every buffered
    /// event has been received.
    pub async fn recv(&mut self) -> Option<CollectorEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    self.dropped += skipped;
                    debug!(skipped, "Subscriber lagging, dropped oldest events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event without waiting
    pub fn try_recv(&mut self) -> Option<CollectorEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    self.dropped += skipped;
                }
                Err(_) => return None,
            }
        }
    }

    /// Total number of events dropped because this subscriber lagged
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

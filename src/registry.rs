//! Listener registry for the streaming channel
//!
//! Tracks attached listeners by opaque handle and fans payloads out to all of
//! them. Each listener owns a bounded queue; the transport task drains that
//! queue into its socket. The registry never touches sockets directly, so a
//! connection knows nothing about the registry holding it.
//!
//! Delivery is best-effort and isolated per listener:
//! - sends run concurrently, each bounded by `send_timeout`
//! - a closed or stalled listener is logged, detached, and skipped
//! - failures never reach the publisher or other listeners

use dashmap::DashMap;
use futures::future::join_all;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default per-listener send bound
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-listener queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default maximum attached listeners
pub const DEFAULT_MAX_LISTENERS: usize = 1024;

/// Opaque listener identity, unique for the listener's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionHandle(Uuid);

impl ConnectionHandle {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving half handed to the transport for one listener
pub type ListenerReceiver = mpsc::Receiver<String>;

/// Why a single listener missed a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryFailure {
    #[error("listener channel closed")]
    Closed,

    #[error("send timed out")]
    TimedOut,
}

/// Registry tuning
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub send_timeout: Duration,
    pub queue_capacity: usize,
    pub max_listeners: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            send_timeout: DEFAULT_SEND_TIMEOUT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_listeners: DEFAULT_MAX_LISTENERS,
        }
    }
}

/// Outcome of one broadcast
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    pub failed: Vec<(ConnectionHandle, DeliveryFailure)>,
}

impl PublishReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// Concurrency-safe set of attached listeners
pub struct ConnectionRegistry {
    listeners: DashMap<ConnectionHandle, mpsc::Sender<String>>,
    /// Reserved slots, bounded by `max_listeners`
    slots: AtomicUsize,
    config: RegistryConfig,
}

impl ConnectionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            listeners: DashMap::with_capacity(config.max_listeners.min(DEFAULT_MAX_LISTENERS)),
            slots: AtomicUsize::new(0),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register a new listener, or `None` when `max_listeners` are attached
    pub fn try_attach(&self) -> Option<(ConnectionHandle, ListenerReceiver)> {
        let max = self.config.max_listeners;
        self.slots
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < max).then_some(n + 1))
            .ok()?;

        let handle = ConnectionHandle::new();
        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));
        self.listeners.insert(handle, tx);

        debug!(%handle, count = self.listener_count(), "Listener attached");
        Some((handle, rx))
    }

    /// Remove a listener; returns `false` if it was already gone
    pub fn detach(&self, handle: &ConnectionHandle) -> bool {
        let removed = self.listeners.remove(handle).is_some();
        if removed {
            self.slots.fetch_sub(1, Ordering::AcqRel);
            debug!(%handle, count = self.listener_count(), "Listener detached");
        }
        removed
    }

    pub fn contains(&self, handle: &ConnectionHandle) -> bool {
        self.listeners.contains_key(handle)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.slots.load(Ordering::Acquire) >= self.config.max_listeners
    }

    /// Deliver `payload` to every attached listener.
    ///
    /// Iterates a snapshot, so listeners attaching or detaching mid-publish
    /// neither block nor disturb the fan-out. Failed listeners are detached
    /// eagerly.
    pub async fn publish_all(&self, payload: &str) -> PublishReport {
        let snapshot: Vec<(ConnectionHandle, mpsc::Sender<String>)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        let send_timeout = self.config.send_timeout;
        let sends = snapshot.into_iter().map(|(handle, tx)| {
            let payload = payload.to_string();
            async move { (handle, deliver(&tx, payload, send_timeout).await) }
        });

        let mut report = PublishReport::default();
        for (handle, outcome) in join_all(sends).await {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(failure) => {
                    warn!(%handle, %failure, "Broadcast to listener failed, detaching");
                    self.detach(&handle);
                    report.failed.push((handle, failure));
                }
            }
        }

        debug!(
            delivered = report.delivered,
            failed = report.failed.len(),
            "Broadcast complete"
        );
        report
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

/// Time-bounded send to a single listener
async fn deliver(
    tx: &mpsc::Sender<String>,
    payload: String,
    send_timeout: Duration,
) -> Result<(), DeliveryFailure> {
    match tokio::time::timeout(send_timeout, tx.send(payload)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(_)) => Err(DeliveryFailure::Closed),
        Err(_) => Err(DeliveryFailure::TimedOut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc::error::TryRecvError;

    fn registry() -> ConnectionRegistry {
        ConnectionRegistry::new(RegistryConfig {
            send_timeout: Duration::from_millis(50),
            queue_capacity: 8,
            max_listeners: 16,
        })
    }

    #[test]
    fn test_attach_detach() {
        let registry = registry();
        let (a, _rx_a) = registry.try_attach().unwrap();
        let (b, _rx_b) = registry.try_attach().unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.listener_count(), 2);
        assert!(registry.contains(&a));

        assert!(registry.detach(&a));
        assert!(!registry.contains(&a));
        assert_eq!(registry.listener_count(), 1);
    }

    #[test]
    fn test_detach_twice_is_noop() {
        let registry = registry();
        let (handle, _rx) = registry.try_attach().unwrap();

        assert!(registry.detach(&handle));
        assert!(!registry.detach(&handle));
        assert_eq!(registry.listener_count(), 0);
    }

    #[test]
    fn test_capacity() {
        let registry = ConnectionRegistry::new(RegistryConfig {
            max_listeners: 2,
            ..RegistryConfig::default()
        });
        let _a = registry.try_attach().unwrap();
        assert!(!registry.is_at_capacity());
        let (b, _rx_b) = registry.try_attach().unwrap();
        assert!(registry.is_at_capacity());
        assert!(registry.try_attach().is_none());
        assert_eq!(registry.listener_count(), 2);

        registry.detach(&b);
        assert!(!registry.is_at_capacity());
        assert!(registry.try_attach().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_attach_respects_capacity() {
        let registry = Arc::new(ConnectionRegistry::new(RegistryConfig {
            max_listeners: 4,
            ..RegistryConfig::default()
        }));

        let attempts: Vec<_> = (0..64)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.try_attach() })
            })
            .collect();

        let mut attached = Vec::new();
        for attempt in attempts {
            if let Some(listener) = attempt.await.unwrap() {
                attached.push(listener);
            }
        }

        assert_eq!(attached.len(), 4);
        assert_eq!(registry.listener_count(), 4);
    }

    #[tokio::test]
    async fn test_publish_reaches_only_attached_listeners() {
        let registry = registry();
        let (_a, mut rx_a) = registry.try_attach().unwrap();
        let (b, mut rx_b) = registry.try_attach().unwrap();
        let (_c, mut rx_c) = registry.try_attach().unwrap();
        registry.detach(&b);

        let report = registry.publish_all("payload").await;

        assert_eq!(report.delivered, 2);
        assert!(report.failed.is_empty());
        assert_eq!(rx_a.recv().await.as_deref(), Some("payload"));
        assert_eq!(rx_c.recv().await.as_deref(), Some("payload"));
        assert_eq!(rx_b.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test]
    async fn test_failed_listener_is_isolated_and_detached() {
        let registry = registry();
        let (broken, rx_broken) = registry.try_attach().unwrap();
        let (_healthy, mut rx_healthy) = registry.try_attach().unwrap();
        drop(rx_broken);

        let report = registry.publish_all("payload").await;

        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, vec![(broken, DeliveryFailure::Closed)]);
        assert_eq!(rx_healthy.recv().await.as_deref(), Some("payload"));
        assert!(!registry.contains(&broken));
        assert_eq!(registry.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_stalled_listener_times_out() {
        let registry = ConnectionRegistry::new(RegistryConfig {
            send_timeout: Duration::from_millis(20),
            queue_capacity: 1,
            max_listeners: 16,
        });
        let (stalled, _rx_stalled) = registry.try_attach().unwrap();
        let (_healthy, mut rx_healthy) = registry.try_attach().unwrap();

        assert_eq!(registry.publish_all("first").await.delivered, 2);
        assert_eq!(rx_healthy.recv().await.as_deref(), Some("first"));

        // stalled queue is still full
        let report = registry.publish_all("second").await;
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, vec![(stalled, DeliveryFailure::TimedOut)]);
        assert_eq!(rx_healthy.recv().await.as_deref(), Some("second"));
        assert!(!registry.contains(&stalled));
    }

    #[tokio::test]
    async fn test_publish_with_no_listeners() {
        let report = registry().publish_all("payload").await;
        assert_eq!(report.attempted(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_attach_detach_during_publish() {
        let registry = Arc::new(ConnectionRegistry::new(RegistryConfig {
            send_timeout: Duration::from_millis(50),
            queue_capacity: 256,
            max_listeners: 1024,
        }));

        let mut keep = Vec::new();
        for _ in 0..8 {
            keep.push(registry.try_attach().unwrap());
        }

        let churn = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                for _ in 0..200 {
                    let (handle, _rx) = registry.try_attach().unwrap();
                    tokio::task::yield_now().await;
                    registry.detach(&handle);
                }
            })
        };

        for i in 0..50 {
            registry.publish_all(&format!("msg-{}", i)).await;
        }
        churn.await.unwrap();

        assert_eq!(registry.listener_count(), 8);
        for (_, rx) in keep.iter_mut() {
            let mut received = 0;
            while rx.try_recv().is_ok() {
                received += 1;
            }
            assert_eq!(received, 50);
        }
    }
}

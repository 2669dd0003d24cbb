//! Readiness gate: wait for the bridge to be published before anything else
//! runs.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use arc_swap::ArcSwapOption;

use crate::bridge::BackendClient;
use crate::error::AppError;

/// How the gate polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            max_attempts: 50,
        }
    }
}

impl GatePolicy {
    /// Longest the gate will wait before giving up. Saturates instead of
    /// overflowing.
    pub fn budget(&self) -> Duration {
        self.interval
            .checked_mul(self.max_attempts)
            .unwrap_or(Duration::MAX)
    }
}

/// Where the host publishes the bridge once it is up.
///
/// Cloning shares the slot.
#[derive(Clone, Default)]
pub struct BridgeSlot {
    inner: Arc<ArcSwapOption<BackendClient>>,
}

impl BridgeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, client: BackendClient) {
        self.inner.store(Some(Arc::new(client)));
    }

    pub fn get(&self) -> Option<Arc<BackendClient>> {
        self.inner.load_full()
    }
}

pub struct ReadinessGate {
    slot: BridgeSlot,
    policy: GatePolicy,
    ready: OnceLock<Arc<BackendClient>>,
}

impl ReadinessGate {
    pub fn new(slot: BridgeSlot, policy: GatePolicy) -> Self {
        Self {
            slot,
            policy,
            ready: OnceLock::new(),
        }
    }

    /// Resolve the backend handle, polling the slot if it is not there yet.
    ///
    /// Once resolved the handle is cached and later calls return it without
    /// touching the slot.
    pub async fn await_backend(&self) -> Result<Arc<BackendClient>, AppError> {
        if let Some(client) = self.ready.get() {
            return Ok(client.clone());
        }

        let mut attempts = 0;
        let mut found = self.slot.get();
        while found.is_none() && attempts < self.policy.max_attempts {
            tracing::debug!(
                attempt = attempts + 1,
                max = self.policy.max_attempts,
                "waiting for backend bridge"
            );
            tokio::time::sleep(self.policy.interval).await;
            attempts += 1;
            found = self.slot.get();
        }

        match found {
            Some(client) => {
                tracing::info!(attempts, "backend bridge ready");
                Ok(self.ready.get_or_init(|| client).clone())
            }
            None => {
                let waited = self.policy.budget();
                tracing::error!(attempts, ?waited, "backend bridge unavailable");
                Err(AppError::BackendUnavailable { attempts, waited })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::mock::MockBridge;
    use tokio::time::Instant;

    fn client() -> BackendClient {
        BackendClient::new(Arc::new(MockBridge::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn already_published_resolves_without_waiting() {
        let slot = BridgeSlot::new();
        slot.publish(client());
        let gate = ReadinessGate::new(slot, GatePolicy::default());

        let start = Instant::now();
        gate.await_backend().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn late_publish_is_picked_up_on_next_poll() {
        let slot = BridgeSlot::new();
        let gate = ReadinessGate::new(slot.clone(), GatePolicy::default());

        let publisher = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(250)).await;
            slot.publish(client());
        });

        let start = Instant::now();
        gate.await_backend().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(300));
        publisher.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_fifty_attempts() {
        let gate = ReadinessGate::new(BridgeSlot::new(), GatePolicy::default());

        let start = Instant::now();
        let err = gate.await_backend().await.unwrap_err();
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert_eq!(
            err,
            AppError::BackendUnavailable {
                attempts: 50,
                waited: Duration::from_secs(5),
            }
        );
        assert!(gate.ready.get().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn handle_is_cached() {
        let slot = BridgeSlot::new();
        slot.publish(client());
        let gate = ReadinessGate::new(slot.clone(), GatePolicy::default());
        let first = gate.await_backend().await.unwrap();

        // a later publish does not replace the cached handle
        slot.publish(client());
        let second = gate.await_backend().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(gate.ready.get().is_some());
    }
}

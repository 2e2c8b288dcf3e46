use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::{info, warn};

use batepapo_types::ChatError;

use crate::LEAVE_TEXT;
use crate::clock::Clock;
use crate::messages::MessageLog;
use crate::registry::Registry;
use crate::store::SharedStore;

pub const DEFAULT_IDLE_AFTER: Duration = Duration::from_secs(10);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15);

/// Evicts participants whose last heartbeat is older than `idle_after`.
///
/// Removal and the "left" notice are separate writes. If the process dies
/// between them the participant is gone without a notice.
pub struct Reaper {
    registry: Registry,
    log: MessageLog,
    clock: Arc<dyn Clock>,
    idle_after: TimeDelta,
}

impl Reaper {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>, idle_after: Duration) -> Self {
        Self {
            registry: Registry::new(store.clone(), clock.clone()),
            log: MessageLog::new(store, clock.clone()),
            clock,
            idle_after: TimeDelta::from_std(idle_after).unwrap_or(TimeDelta::MAX),
        }
    }

    /// One pass over a snapshot of the registry. Per-participant failures
    /// are logged and skipped; only failing to take the snapshot is an error.
    /// Returns how many participants were removed.
    pub fn sweep(&self) -> Result<usize, ChatError> {
        let snapshot = self.registry.list()?;
        let now = self.clock.now();

        let mut evicted = 0;
        for participant in snapshot {
            if now.signed_duration_since(participant.last_seen) <= self.idle_after {
                continue;
            }

            if let Err(e) = self.registry.remove(&participant.name) {
                warn!("Failed to evict {}: {}", participant.name, e);
                continue;
            }
            evicted += 1;
            info!("{} timed out", participant.name);

            // A lost notice does not undo the removal
            if let Err(e) = self.log.announce(&participant.name, LEAVE_TEXT) {
                warn!("Failed to announce departure of {}: {}", participant.name, e);
            }
        }

        Ok(evicted)
    }
}

/// Background task that sweeps idle participants on a fixed cadence.
pub async fn run_reaper_loop(reaper: Arc<Reaper>, every: Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        let pass = reaper.clone();
        match tokio::task::spawn_blocking(move || pass.sweep()).await {
            Ok(Ok(count)) => {
                if count > 0 {
                    info!("Reaper: evicted {} idle participants", count);
                }
            }
            Ok(Err(e)) => warn!("Reaper error: {}", e),
            Err(e) => warn!("Reaper task join error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use crate::{ChatStore, ManualClock, MemoryStore, MessageEdit};
    use anyhow::{Result, anyhow};
    use batepapo_types::{BROADCAST_TARGET, Message, MessageKind, Participant};
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn leave_notices(store: &SharedStore) -> Vec<Message> {
        store
            .recent_messages(None)
            .unwrap()
            .into_iter()
            .filter(|m| m.text == LEAVE_TEXT)
            .collect()
    }

    #[test]
    fn idle_participant_is_evicted_with_notice() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock.clone());
        let reaper = Reaper::new(store.clone(), clock.clone(), DEFAULT_IDLE_AFTER);
        let t0 = clock.now();
        registry.register("Bob").unwrap();

        clock.set(t0 + TimeDelta::seconds(5));
        assert_eq!(reaper.sweep().unwrap(), 0);
        assert!(registry.exists("Bob").unwrap());
        assert!(leave_notices(&store).is_empty());

        clock.set(t0 + TimeDelta::seconds(12));
        assert_eq!(reaper.sweep().unwrap(), 1);
        assert!(!registry.exists("Bob").unwrap());

        let left = leave_notices(&store);
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].from, "Bob");
        assert_eq!(left[0].to, BROADCAST_TARGET);
        assert_eq!(left[0].kind, MessageKind::Status);
    }

    #[test]
    fn exactly_at_threshold_is_not_idle() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock.clone());
        let reaper = Reaper::new(store, clock.clone(), DEFAULT_IDLE_AFTER);
        registry.register("Bob").unwrap();

        clock.advance(DEFAULT_IDLE_AFTER);
        assert_eq!(reaper.sweep().unwrap(), 0);
    }

    #[test]
    fn heartbeat_keeps_participant() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock.clone());
        let reaper = Reaper::new(store, clock.clone(), DEFAULT_IDLE_AFTER);
        registry.register("Alice").unwrap();
        registry.register("Bob").unwrap();

        clock.advance(Duration::from_secs(8));
        registry.heartbeat("Alice").unwrap();
        clock.advance(Duration::from_secs(4));

        assert_eq!(reaper.sweep().unwrap(), 1);
        let names: Vec<String> = registry.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Alice"]);
    }

    /// Store whose participant removal always fails.
    struct StuckStore(MemoryStore);

    impl ChatStore for StuckStore {
        fn insert_participant(&self, p: &Participant) -> Result<bool> {
            self.0.insert_participant(p)
        }
        fn list_participants(&self) -> Result<Vec<Participant>> {
            self.0.list_participants()
        }
        fn find_participant(&self, name: &str) -> Result<Option<Participant>> {
            self.0.find_participant(name)
        }
        fn touch_participant(&self, name: &str, at: DateTime<Utc>) -> Result<bool> {
            self.0.touch_participant(name, at)
        }
        fn remove_participant(&self, name: &str) -> Result<()> {
            if name == "Stuck" {
                return Err(anyhow!("disk on fire"));
            }
            self.0.remove_participant(name)
        }
        fn insert_message(&self, m: &Message) -> Result<()> {
            self.0.insert_message(m)
        }
        fn recent_messages(&self, limit: Option<usize>) -> Result<Vec<Message>> {
            self.0.recent_messages(limit)
        }
        fn find_message(&self, id: Uuid) -> Result<Option<Message>> {
            self.0.find_message(id)
        }
        fn update_message(&self, id: Uuid, edit: &MessageEdit) -> Result<bool> {
            self.0.update_message(id, edit)
        }
        fn delete_message(&self, id: Uuid) -> Result<bool> {
            self.0.delete_message(id)
        }
    }

    #[test]
    fn failed_removal_does_not_stop_the_pass() {
        let store: SharedStore = Arc::new(StuckStore(MemoryStore::default()));
        let clock = Arc::new(ManualClock::new());
        let registry = Registry::new(store.clone(), clock.clone());
        let reaper = Reaper::new(store.clone(), clock.clone(), DEFAULT_IDLE_AFTER);
        registry.register("Stuck").unwrap();
        registry.register("Bob").unwrap();

        clock.advance(Duration::from_secs(30));
        assert_eq!(reaper.sweep().unwrap(), 1);
        assert_eq!(reaper.sweep().unwrap(), 0);
        assert_eq!(reaper.sweep().unwrap(), 0);

        assert!(registry.exists("Stuck").unwrap());
        assert!(!registry.exists("Bob").unwrap());

        let left: Vec<String> = leave_notices(&store).into_iter().map(|m| m.from).collect();
        assert_eq!(left, ["Bob"]);
    }

    #[tokio::test]
    async fn loop_sweeps_on_each_tick() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock.clone());
        registry.register("Bob").unwrap();
        clock.advance(Duration::from_secs(60));

        let reaper = Arc::new(Reaper::new(store, clock, DEFAULT_IDLE_AFTER));
        let handle = tokio::spawn(run_reaper_loop(reaper, DEFAULT_SWEEP_INTERVAL));

        for _ in 0..50 {
            if !registry.exists("Bob").unwrap() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        handle.abort();
        assert!(!registry.exists("Bob").unwrap());
    }
}

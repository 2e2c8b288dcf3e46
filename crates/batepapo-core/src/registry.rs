use std::sync::Arc;

use batepapo_types::{ChatError, Participant};
use tracing::{debug, info};

use crate::JOIN_TEXT;
use crate::clock::Clock;
use crate::messages::MessageLog;
use crate::policy;
use crate::store::{SharedStore, unavailable};

/// Participants currently in the room, keyed by exact name.
#[derive(Clone)]
pub struct Registry {
    store: SharedStore,
    clock: Arc<dyn Clock>,
    log: MessageLog,
}

impl Registry {
    pub fn new(store: SharedStore, clock: Arc<dyn Clock>) -> Self {
        let log = MessageLog::new(store.clone(), clock.clone());
        Self { store, clock, log }
    }

    /// Adds a participant and broadcasts the join notice.
    ///
    /// Uniqueness is decided by the store's conditional insert, so two
    /// concurrent registrations of one name cannot both succeed.
    pub fn register(&self, raw_name: &str) -> Result<Participant, ChatError> {
        let name = policy::validate_name(raw_name)?;
        let participant = Participant {
            name,
            last_seen: self.clock.now(),
        };

        let inserted = self
            .store
            .insert_participant(&participant)
            .map_err(unavailable("insert participant"))?;
        if !inserted {
            return Err(ChatError::NameTaken(participant.name));
        }

        self.log.announce(&participant.name, JOIN_TEXT)?;
        info!("{} joined", participant.name);
        Ok(participant)
    }

    pub fn list(&self) -> Result<Vec<Participant>, ChatError> {
        self.store
            .list_participants()
            .map_err(unavailable("list participants"))
    }

    pub fn heartbeat(&self, name: &str) -> Result<(), ChatError> {
        let touched = self
            .store
            .touch_participant(name, self.clock.now())
            .map_err(unavailable("touch participant"))?;
        if !touched {
            return Err(ChatError::NotFound(format!("participant '{name}'")));
        }
        debug!("Heartbeat from {}", name);
        Ok(())
    }

    pub fn exists(&self, name: &str) -> Result<bool, ChatError> {
        Ok(self
            .store
            .find_participant(name)
            .map_err(unavailable("find participant"))?
            .is_some())
    }

    /// Removing an absent name is a no-op.
    pub fn remove(&self, name: &str) -> Result<(), ChatError> {
        self.store
            .remove_participant(name)
            .map_err(unavailable("remove participant"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::fixture;
    use batepapo_types::{BROADCAST_TARGET, MessageKind};

    #[test]
    fn register_announces_join() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock.clone());

        let alice = registry.register("Alice").unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.last_seen, clock.now());

        let log = store.recent_messages(None).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].from, "Alice");
        assert_eq!(log[0].to, BROADCAST_TARGET);
        assert_eq!(log[0].kind, MessageKind::Status);
        assert_eq!(log[0].text, JOIN_TEXT);
    }

    #[test]
    fn duplicate_trimmed_name_is_taken() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock);

        registry.register("Alice").unwrap();
        let err = registry.register("  Alice  ").unwrap_err();
        assert_eq!(err, ChatError::NameTaken("Alice".into()));

        assert_eq!(registry.list().unwrap().len(), 1);
        assert_eq!(store.recent_messages(None).unwrap().len(), 1);
    }

    #[test]
    fn names_are_case_sensitive() {
        let (store, clock) = fixture();
        let registry = Registry::new(store, clock);
        registry.register("Alice").unwrap();
        registry.register("alice").unwrap();
        assert_eq!(registry.list().unwrap().len(), 2);
    }

    #[test]
    fn blank_name_is_invalid() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock);
        for name in ["", "   "] {
            assert!(matches!(
                registry.register(name),
                Err(ChatError::InvalidInput(_))
            ));
        }
        assert!(registry.list().unwrap().is_empty());
        assert!(store.recent_messages(None).unwrap().is_empty());
    }

    #[test]
    fn list_keeps_registration_order() {
        let (store, clock) = fixture();
        let registry = Registry::new(store, clock);
        for name in ["Zoe", "Adam", "Mia"] {
            registry.register(name).unwrap();
        }
        let names: Vec<String> = registry.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Zoe", "Adam", "Mia"]);
    }

    #[test]
    fn heartbeat_refreshes_last_seen() {
        let (store, clock) = fixture();
        let registry = Registry::new(store.clone(), clock.clone());
        registry.register("Bob").unwrap();

        clock.advance(Duration::from_secs(7));
        registry.heartbeat("Bob").unwrap();

        let bob = store.find_participant("Bob").unwrap().unwrap();
        assert_eq!(bob.last_seen, clock.now());
    }

    #[test]
    fn heartbeat_for_unknown_name_is_not_found() {
        let (store, clock) = fixture();
        let registry = Registry::new(store, clock);
        assert!(matches!(
            registry.heartbeat("Nobody"),
            Err(ChatError::NotFound(_))
        ));
    }

    #[test]
    fn exists_and_idempotent_remove() {
        let (store, clock) = fixture();
        let registry = Registry::new(store, clock);
        registry.register("Bob").unwrap();
        assert!(registry.exists("Bob").unwrap());

        registry.remove("Bob").unwrap();
        registry.remove("Bob").unwrap();
        assert!(!registry.exists("Bob").unwrap());
    }
}

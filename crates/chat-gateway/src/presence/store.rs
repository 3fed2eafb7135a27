//! Ephemeral typing state, one entry per user id

use std::collections::HashMap;

use chat_core::{PresenceState, UserId, UserIdentity};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct PresenceTable {
    /// Entries in first-seen order
    entries: Vec<PresenceState>,
    /// User id -> position in `entries`
    index: HashMap<UserId, usize>,
}

/// In-memory presence map
///
/// Entries are inserted on the first `set_typing` for a user and overwritten
/// afterwards, never removed. Locks are held only for the map operation itself.
#[derive(Debug, Default)]
pub struct PresenceStore {
    inner: RwLock<PresenceTable>,
}

impl PresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `user.id`
    ///
    /// The stored identity is replaced by `user`, the entry keeps its position.
    pub fn set_typing(&self, user: UserIdentity, typing: bool) {
        let mut table = self.inner.write();

        if let Some(&position) = table.index.get(&user.id) {
            table.entries[position] = PresenceState::new(user, typing);
            return;
        }

        let position = table.entries.len();
        table.index.insert(user.id.clone(), position);
        table.entries.push(PresenceState::new(user, typing));
    }

    /// Users currently typing, in first-seen order
    pub fn active_typers(&self) -> Vec<UserIdentity> {
        self.inner
            .read()
            .entries
            .iter()
            .filter(|state| state.typing)
            .map(|state| state.user.clone())
            .collect()
    }

    pub fn get(&self, user_id: &UserId) -> Option<PresenceState> {
        let table = self.inner.read();
        table
            .index
            .get(user_id)
            .map(|&position| table.entries[position].clone())
    }

    pub fn is_typing(&self, user_id: &UserId) -> bool {
        self.get(user_id).is_some_and(|state| state.typing)
    }

    /// Set an existing entry to not typing
    ///
    /// Returns `true` if the user was typing before the call.
    pub fn clear_typing(&self, user_id: &UserId) -> bool {
        let mut table = self.inner.write();
        let Some(&position) = table.index.get(user_id) else {
            return false;
        };

        let state = &mut table.entries[position];
        std::mem::replace(&mut state.typing, false)
    }

    /// Number of users that ever sent a typing event
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn user(id: &str) -> UserIdentity {
        UserIdentity::new(UserId::parse(id).unwrap()).with_attribute("name", id.to_uppercase())
    }

    fn ids(users: &[UserIdentity]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_one_entry_per_user() {
        let store = PresenceStore::new();
        store.set_typing(user("a"), true);
        store.set_typing(user("a"), false);
        store.set_typing(user("a"), true);
        store.set_typing(user("b"), false);

        assert_eq!(store.len(), 2);
        assert_eq!(ids(&store.active_typers()), vec!["a"]);
    }

    #[test]
    fn test_latest_call_wins() {
        let store = PresenceStore::new();
        let calls = [true, true, false, true, false, false];
        for (step, typing) in calls.into_iter().enumerate() {
            store.set_typing(user("u"), typing);
            assert_eq!(store.is_typing(&UserId::parse("u").unwrap()), typing, "step {step}");
            assert_eq!(store.active_typers().len(), usize::from(typing));
        }
    }

    #[test]
    fn test_first_seen_order_is_stable() {
        let store = PresenceStore::new();
        store.set_typing(user("c"), true);
        store.set_typing(user("a"), true);
        store.set_typing(user("b"), true);
        store.set_typing(user("c"), false);
        store.set_typing(user("c"), true);

        assert_eq!(ids(&store.active_typers()), vec!["c", "a", "b"]);
        assert_eq!(store.active_typers(), store.active_typers());
    }

    #[test]
    fn test_overwrite_refreshes_identity() {
        let store = PresenceStore::new();
        store.set_typing(user("a"), true);
        let renamed = UserIdentity::new(UserId::parse("a").unwrap()).with_attribute("name", "Alicia");
        store.set_typing(renamed, true);

        assert_eq!(store.active_typers()[0].name(), Some("Alicia"));
    }

    #[test]
    fn test_clear_typing_keeps_entry() {
        let store = PresenceStore::new();
        let id = UserId::parse("a").unwrap();

        assert!(!store.clear_typing(&id));
        store.set_typing(user("a"), true);
        assert!(store.clear_typing(&id));
        assert!(!store.clear_typing(&id));

        let state = store.get(&id).unwrap();
        assert!(!state.typing);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let store = Arc::new(PresenceStore::new());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.set_typing(user(&format!("user-{n}")), true);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8);
        assert_eq!(store.active_typers().len(), 8);
    }
}

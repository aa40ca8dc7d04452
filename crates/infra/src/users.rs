use std::collections::HashMap;
use std::sync::RwLock;

use orderdesk_auth::User;
use orderdesk_core::{DomainError, DomainResult, UserId};

/// In-memory user store. Username uniqueness is enforced here, inside the
/// write lock, so check and insert cannot race.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    inner: RwLock<HashMap<UserId, User>>,
}

fn poisoned() -> DomainError {
    DomainError::storage("user store lock poisoned")
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) -> DomainResult<User> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.values().any(|u| u.username == user.username) {
            return Err(DomainError::conflict("username already exists"));
        }
        inner.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.get(&id).cloned())
    }

    pub fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    pub fn exists_by_username(&self, username: &str) -> DomainResult<bool> {
        Ok(self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .values()
            .any(|u| u.username == username))
    }

    /// Atomic read-guard-write: `f` runs under the write lock; an error from
    /// it leaves the stored user unchanged.
    pub fn mutate<R>(
        &self,
        id: UserId,
        f: impl FnOnce(&mut User, &dyn Fn(&str) -> bool) -> DomainResult<R>,
    ) -> DomainResult<(User, R)> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let taken_by_other: Vec<String> = inner
            .values()
            .filter(|u| u.id != id)
            .map(|u| u.username.clone())
            .collect();
        let user = inner
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("user"))?;

        let mut candidate = user.clone();
        let taken = |name: &str| taken_by_other.iter().any(|u| u == name);
        let out = f(&mut candidate, &taken)?;
        *user = candidate.clone();
        Ok((candidate, out))
    }

    pub fn remove(&self, id: UserId) -> DomainResult<User> {
        self.inner
            .write()
            .map_err(|_| poisoned())?
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("user"))
    }

    pub fn list(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self
            .inner
            .read()
            .map_err(|_| poisoned())?
            .values()
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderdesk_auth::Role;

    fn user(name: &str) -> User {
        User::with_role(name, "pw", Role::Staff, Utc::now()).unwrap()
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let store = InMemoryUsers::new();
        store.insert(user("alice")).unwrap();
        let err = store.insert(user("alice")).unwrap_err();
        assert_eq!(err, DomainError::conflict("username already exists"));
    }

    #[test]
    fn lookup_by_username() {
        let store = InMemoryUsers::new();
        let alice = store.insert(user("alice")).unwrap();
        assert_eq!(store.find_by_username("alice").unwrap().unwrap().id, alice.id);
        assert!(store.find_by_username("bob").unwrap().is_none());
        assert!(store.exists_by_username("alice").unwrap());
    }

    #[test]
    fn mutate_exposes_other_usernames_for_uniqueness() {
        let store = InMemoryUsers::new();
        store.insert(user("alice")).unwrap();
        let bob = store.insert(user("bob")).unwrap();

        // Renaming bob to alice must be refusable by the caller.
        let err = store
            .mutate(bob.id, |u, taken| {
                if taken("alice") {
                    return Err(DomainError::conflict("username already exists"));
                }
                u.update_credentials("alice", "pw", Utc::now())
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Keeping your own name is not a collision.
        store
            .mutate(bob.id, |u, taken| {
                assert!(!taken("bob"));
                u.update_credentials("bob", "new-pw", Utc::now())
            })
            .unwrap();
        assert!(store.find_by_username("bob").unwrap().unwrap().verify_password("new-pw"));
    }

    #[test]
    fn failed_mutation_leaves_the_user_untouched() {
        let store = InMemoryUsers::new();
        let alice = store.insert(user("alice")).unwrap();

        let _ = store.mutate(alice.id, |u, _| {
            u.username = "mangled".to_string();
            Err::<(), _>(DomainError::validation("boom"))
        });

        assert!(store.exists_by_username("alice").unwrap());
        assert!(!store.exists_by_username("mangled").unwrap());
    }
}

//! In-process profile store used when no database is configured and in tests.
//!
//! Mirrors the database adapter's semantics: every staged profile whose row
//! exists counts as changed on commit, even when its values are identical.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ProfilePredicate, ProfileStore, ProfileStoreError, ProfileUnitOfWork,
};
use crate::domain::{UserProfile, Username};

#[derive(Debug, Default)]
struct State {
    profiles: HashMap<Username, UserProfile>,
    units_begun: usize,
    commits: usize,
}

/// Thread-safe profile table shared by all units of work.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> Result<MutexGuard<'_, State>, ProfileStoreError> {
    state
        .lock()
        .map_err(|_| ProfileStoreError::query("in-memory profile table lock poisoned"))
}

impl InMemoryProfileStore {
    /// Store preloaded with `profiles`.
    pub fn with_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let store = Self::default();
        for profile in profiles {
            store.insert(profile);
        }
        store
    }

    /// Insert or replace a profile outside any unit of work.
    pub fn insert(&self, profile: UserProfile) {
        if let Ok(mut state) = lock(&self.state) {
            state.profiles.insert(profile.username().clone(), profile);
        }
    }

    /// Remove a profile outside any unit of work.
    pub fn remove(&self, username: &Username) -> Option<UserProfile> {
        lock(&self.state)
            .ok()
            .and_then(|mut state| state.profiles.remove(username))
    }

    /// Committed profile for `username`, read outside any unit of work.
    pub fn get(&self, username: &Username) -> Option<UserProfile> {
        lock(&self.state)
            .ok()
            .and_then(|state| state.profiles.get(username).cloned())
    }

    /// Units of work opened so far.
    pub fn units_begun(&self) -> usize {
        lock(&self.state).map_or(0, |state| state.units_begun)
    }

    /// Successful commits so far.
    pub fn commits(&self) -> usize {
        lock(&self.state).map_or(0, |state| state.commits)
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn begin(&self) -> Result<Box<dyn ProfileUnitOfWork>, ProfileStoreError> {
        lock(&self.state)?.units_begun += 1;
        Ok(Box::new(InMemoryUnitOfWork {
            state: Arc::clone(&self.state),
            pending: Vec::new(),
        }))
    }
}

struct InMemoryUnitOfWork {
    state: Arc<Mutex<State>>,
    pending: Vec<UserProfile>,
}

#[async_trait]
impl ProfileUnitOfWork for InMemoryUnitOfWork {
    async fn find_profile(
        &mut self,
        predicate: &ProfilePredicate,
    ) -> Result<Option<UserProfile>, ProfileStoreError> {
        let state = lock(&self.state)?;
        let found = match predicate {
            ProfilePredicate::Username(username) => state.profiles.get(username).cloned(),
        };
        Ok(found)
    }

    fn mark_modified(&mut self, profile: UserProfile) {
        self.pending.retain(|staged| staged.username() != profile.username());
        self.pending.push(profile);
    }

    async fn commit(&mut self) -> Result<usize, ProfileStoreError> {
        let mut state = lock(&self.state)?;
        let mut changed = 0;
        for profile in self.pending.drain(..) {
            if let Some(row) = state.profiles.get_mut(profile.username()) {
                *row = profile;
                changed += 1;
            }
        }
        state.commits += 1;
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::demo_profiles;
    use rstest::{fixture, rstest};

    fn username(raw: &str) -> Username {
        Username::new(raw).expect("valid username")
    }

    #[fixture]
    fn store() -> InMemoryProfileStore {
        InMemoryProfileStore::with_profiles(demo_profiles())
    }

    #[rstest]
    #[tokio::test]
    async fn staged_changes_are_invisible_until_commit(store: InMemoryProfileStore) {
        let mut unit = store.begin().await.expect("begin");
        let mut bob = unit
            .find_profile(&ProfilePredicate::Username(username("bob")))
            .await
            .expect("lookup")
            .expect("bob exists");
        bob.set_display_name("Robert");
        unit.mark_modified(bob);

        assert_eq!(store.get(&username("bob")).map(|p| p.display_name().to_owned()), Some("Bob".into()));
        assert_eq!(unit.commit().await.expect("commit"), 1);
        assert_eq!(store.get(&username("bob")).map(|p| p.display_name().to_owned()), Some("Robert".into()));
    }

    #[rstest]
    #[tokio::test]
    async fn unchanged_profile_still_counts_as_written(store: InMemoryProfileStore) {
        let mut unit = store.begin().await.expect("begin");
        let tom = store.get(&username("tom")).expect("tom exists");
        unit.mark_modified(tom);
        assert_eq!(unit.commit().await.expect("commit"), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn vanished_rows_are_not_counted(store: InMemoryProfileStore) {
        let mut unit = store.begin().await.expect("begin");
        let jane = store.get(&username("jane")).expect("jane exists");
        store.remove(&username("jane"));
        unit.mark_modified(jane);
        assert_eq!(unit.commit().await.expect("commit"), 0);
        assert!(store.get(&username("jane")).is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn dropping_a_unit_discards_staged_changes(store: InMemoryProfileStore) {
        let mut unit = store.begin().await.expect("begin");
        let mut bob = store.get(&username("bob")).expect("bob exists");
        bob.set_bio("never saved");
        unit.mark_modified(bob);
        drop(unit);

        assert_eq!(store.get(&username("bob")).and_then(|p| p.bio().map(str::to_owned)), None);
        assert_eq!(store.commits(), 0);
        assert_eq!(store.units_begun(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn restaging_keeps_latest_copy(store: InMemoryProfileStore) {
        let mut unit = store.begin().await.expect("begin");
        let mut bob = store.get(&username("bob")).expect("bob exists");
        bob.set_bio("first");
        unit.mark_modified(bob.clone());
        bob.set_bio("second");
        unit.mark_modified(bob);
        assert_eq!(unit.commit().await.expect("commit"), 1);
        assert_eq!(
            store.get(&username("bob")).and_then(|p| p.bio().map(str::to_owned)),
            Some("second".to_owned())
        );
    }
}

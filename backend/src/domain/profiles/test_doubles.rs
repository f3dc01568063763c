//! Scripted unit of work for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::ports::{MockProfileStore, ProfilePredicate, ProfileStoreError, ProfileUnitOfWork};
use crate::domain::{UserProfile, Username};

/// What a scripted unit saw.
#[derive(Debug, Default)]
pub(super) struct Journal {
    pub lookups: Vec<ProfilePredicate>,
    pub staged: Vec<UserProfile>,
    pub commits: usize,
}

#[derive(Clone)]
pub(super) struct Script {
    pub found: Option<UserProfile>,
    pub commit: Result<usize, ProfileStoreError>,
    pub journal: Arc<Mutex<Journal>>,
}

impl Script {
    pub fn finding(profile: Option<UserProfile>) -> Self {
        Self {
            found: profile,
            commit: Ok(1),
            journal: Arc::default(),
        }
    }

    pub fn committing(mut self, commit: Result<usize, ProfileStoreError>) -> Self {
        self.commit = commit;
        self
    }

    pub fn journal(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().expect("journal lock")
    }

    /// Store mock that opens exactly one unit following this script.
    pub fn store(&self) -> MockProfileStore {
        let script = self.clone();
        let mut store = MockProfileStore::new();
        store
            .expect_begin()
            .times(1)
            .returning(move || {
                let unit: Box<dyn ProfileUnitOfWork> = Box::new(ScriptedUnit(script.clone()));
                Ok(unit)
            });
        store
    }
}

struct ScriptedUnit(Script);

#[async_trait]
impl ProfileUnitOfWork for ScriptedUnit {
    async fn find_profile(
        &mut self,
        predicate: &ProfilePredicate,
    ) -> Result<Option<UserProfile>, ProfileStoreError> {
        self.0.journal().lookups.push(predicate.clone());
        Ok(self.0.found.clone().filter(|p| predicate.matches(p)))
    }

    fn mark_modified(&mut self, profile: UserProfile) {
        self.0.journal().staged.push(profile);
    }

    async fn commit(&mut self) -> Result<usize, ProfileStoreError> {
        self.0.journal().commits += 1;
        self.0.commit.clone()
    }
}

pub(super) fn profile(username: &str, display_name: &str, bio: Option<&str>) -> UserProfile {
    UserProfile::new(
        Username::new(username).expect("valid username"),
        display_name,
        bio.map(str::to_owned),
    )
}

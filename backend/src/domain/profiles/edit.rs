//! Edit the caller's own profile.
//!
//! Template for mutating handlers: fetch, apply present fields, mark
//! modified, commit, then judge the outcome by the changed-row count.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::domain::ports::{ProfilePredicate, ProfileStore};
use crate::domain::{Fault, Handler, Outcome, Request, RequestContext, RuleSet, Validate};

/// Longest display name accepted.
pub const DISPLAY_NAME_MAX_CHARS: usize = 50;

/// Reason reported when the store writes nothing.
pub const EDIT_FAILED: &str = "Problem editing the profile";

/// Partial profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditProfile {
    /// New display name.
    #[schema(example = "Bob")]
    pub display_name: Option<String>,
    /// New bio.
    #[schema(example = "Weekend hiker")]
    pub bio: Option<String>,
}

impl Validate for EditProfile {
    fn rules() -> RuleSet<Self> {
        RuleSet::new()
            .not_empty(
                "displayName",
                "'Display Name' must not be empty.",
                |r: &Self| r.display_name.as_deref(),
            )
            .max_chars("displayName", DISPLAY_NAME_MAX_CHARS, |r: &Self| {
                r.display_name.as_deref()
            })
    }
}

impl Request for EditProfile {
    type Output = ();
    const NAME: &'static str = "EditProfile";
}

/// Applies an [`EditProfile`] to the caller's own profile.
pub struct EditProfileHandler<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> EditProfileHandler<S> {
    /// Handler writing through `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> Handler<EditProfile> for EditProfileHandler<S>
where
    S: ProfileStore + ?Sized,
{
    async fn handle(
        &self,
        request: EditProfile,
        context: &RequestContext,
    ) -> Result<Outcome<()>, Fault> {
        let username = context.identity().current_username()?;
        let cancellation = context.cancellation();

        cancellation.ensure_active()?;
        let mut unit = cancellation.run_until_cancelled(self.store.begin()).await??;

        let predicate = ProfilePredicate::Username(username.clone());
        let mut profile = cancellation
            .run_until_cancelled(unit.find_profile(&predicate))
            .await??
            .ok_or_else(|| Fault::integrity(format!("no profile for user `{username}`")))?;

        let EditProfile { display_name, bio } = request;
        if let Some(display_name) = display_name {
            profile.set_display_name(display_name);
        }
        if let Some(bio) = bio {
            profile.set_bio(bio);
        }
        unit.mark_modified(profile);

        // Final check; the commit itself is not raced against cancellation.
        cancellation.ensure_active()?;
        let changed = unit.commit().await?;
        debug!(user = %username, changed, "profile commit finished");

        if changed > 0 {
            info!(user = %username, "profile edited");
            Ok(Outcome::success(()))
        } else {
            Ok(Outcome::failure(EDIT_FAILED))
        }
    }
}

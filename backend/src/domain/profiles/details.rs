//! Read any user's public profile.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ProfilePredicate, ProfileStore};
use crate::domain::{
    Fault, Handler, Outcome, Request, RequestContext, RuleSet, UserProfile, Username, Validate,
};

/// Look up the profile of `username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    /// Username to look up.
    pub username: String,
}

impl Validate for ProfileDetails {
    fn rules() -> RuleSet<Self> {
        RuleSet::new().rule("username", "'Username' is not valid.", |r: &Self| {
            Username::new(r.username.as_str()).is_ok()
        })
    }
}

impl Request for ProfileDetails {
    /// `None` when no such user exists; the transport decides how to report it.
    type Output = Option<UserProfile>;
    const NAME: &'static str = "ProfileDetails";
}

/// Looks a profile up without committing anything.
pub struct ProfileDetailsHandler<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> ProfileDetailsHandler<S> {
    /// Handler reading through `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> Handler<ProfileDetails> for ProfileDetailsHandler<S>
where
    S: ProfileStore + ?Sized,
{
    async fn handle(
        &self,
        request: ProfileDetails,
        context: &RequestContext,
    ) -> Result<Outcome<Option<UserProfile>>, Fault> {
        // Rules already rejected malformed names.
        let username = Username::new(request.username)
            .map_err(|err| Fault::integrity(format!("unvalidated username reached handler: {err}")))?;
        let cancellation = context.cancellation();

        cancellation.ensure_active()?;
        let mut unit = cancellation.run_until_cancelled(self.store.begin()).await??;
        let profile = cancellation
            .run_until_cancelled(unit.find_profile(&ProfilePredicate::Username(username)))
            .await??;
        Ok(Outcome::success(profile))
    }
}

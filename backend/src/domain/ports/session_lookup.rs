//! Port resolving the user behind a session cookie.

use async_trait::async_trait;

use crate::domain::{SessionUser, UserId};

use super::DataServiceError;
use super::fixture_accounts::FixtureAccount;

/// Resolve a session user from the id stored in the session cookie.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionLookup: Send + Sync {
    /// Load the user, their profile name and roles.
    ///
    /// `Ok(None)` means the id no longer names a user.
    async fn session_user(&self, user_id: &UserId) -> Result<Option<SessionUser>, DataServiceError>;
}

/// In-memory lookup over the development accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionLookup;

#[async_trait]
impl SessionLookup for FixtureSessionLookup {
    async fn session_user(&self, user_id: &UserId) -> Result<Option<SessionUser>, DataServiceError> {
        Ok(FixtureAccount::by_id(user_id).map(|account| account.session_user(user_id.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AppRole;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_lookup_finds_known_account() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id");
        let user = FixtureSessionLookup
            .session_user(&id)
            .await
            .expect("lookup succeeds")
            .expect("user exists");
        assert_eq!(user.email(), "ops@fastlease.ae");
        assert_eq!(user.primary_role(), Some(AppRole::OpManager));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_lookup_misses_unknown_account() {
        let user = FixtureSessionLookup
            .session_user(&UserId::random())
            .await
            .expect("lookup succeeds");
        assert!(user.is_none());
    }
}

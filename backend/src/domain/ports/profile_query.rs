//! Driving port for the profile pages.

use async_trait::async_trait;

use crate::domain::{ProfilePageData, SessionUser};

use super::DataServiceError;

/// Load the data shown on a user's profile page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    async fn profile_page_data(&self, user: &SessionUser) -> Result<ProfilePageData, DataServiceError>;
}

/// Builds the page from the session user alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileQuery;

#[async_trait]
impl ProfileQuery for FixtureProfileQuery {
    async fn profile_page_data(&self, user: &SessionUser) -> Result<ProfilePageData, DataServiceError> {
        Ok(ProfilePageData::assemble(user, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AppRole, DEFAULT_TIMEZONE, UserId};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_profile_uses_session_name() {
        let user = SessionUser::new(
            UserId::random(),
            "ada@example.com",
            Some("Ada Lovelace".to_owned()),
            vec![AppRole::Support],
            vec![],
        );
        let data = FixtureProfileQuery
            .profile_page_data(&user)
            .await
            .expect("profile data");
        assert_eq!(data.full_name, "Ada Lovelace");
        assert_eq!(data.timezone, DEFAULT_TIMEZONE);
    }
}

//! Driving port for password sign-in.
//!
//! Inbound adapters call it to authenticate credentials without knowing the
//! backing auth service, which keeps HTTP handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, LoginCredentials};

use super::fixture_accounts::FixtureAccount;

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the signed-in identity.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error>;
}

/// Authenticates the development accounts with the shared fixture password.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error> {
        let account = FixtureAccount::by_email(credentials.email())
            .filter(|account| account.password == credentials.password())
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        let id = account
            .user_id()
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        Ok(AuthenticatedUser {
            id,
            email: account.email.to_owned(),
            roles: account.roles.to_vec(),
        })
    }
}

//! Driving port deciding which portal an identity belongs to.

use async_trait::async_trait;

use crate::domain::{Error, PortalDetection};

use super::fixture_accounts::FixtureAccount;

/// Identify the portal for a login identity before authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PortalDetector: Send + Sync {
    async fn detect(&self, email: &str) -> Result<PortalDetection, Error>;
}

/// Detects from the development accounts, falling back to e-mail hints.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePortalDetector;

#[async_trait]
impl PortalDetector for FixturePortalDetector {
    async fn detect(&self, email: &str) -> Result<PortalDetection, Error> {
        let roles = FixtureAccount::by_email(email)
            .map(|account| account.roles.to_vec())
            .unwrap_or_default();
        Ok(PortalDetection::from_roles(roles, email))
    }
}

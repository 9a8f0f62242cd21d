//! Driving port for admin user provisioning.

use async_trait::async_trait;

use crate::domain::{CreateUserRequest, CreatedUser, UserId};

use super::DataServiceError;

/// Create accounts on behalf of an administrator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminUsersCommand: Send + Sync {
    /// Create the auth user, assign the role and upsert the profile.
    async fn create_user(&self, request: &CreateUserRequest) -> Result<CreatedUser, DataServiceError>;
}

/// Accepts every request and mints a fresh id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminUsersCommand;

#[async_trait]
impl AdminUsersCommand for FixtureAdminUsersCommand {
    async fn create_user(&self, request: &CreateUserRequest) -> Result<CreatedUser, DataServiceError> {
        Ok(CreatedUser {
            user_id: UserId::random(),
            invite_link: None,
            temporary_password: (!request.send_invite).then(|| uuid::Uuid::new_v4().simple().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminUserStatus, AppRole};
    use rstest::rstest;

    #[rstest]
    #[case(true, false)]
    #[case(false, true)]
    #[tokio::test]
    async fn temporary_password_only_without_invite(
        #[case] send_invite: bool,
        #[case] expect_password: bool,
    ) {
        let request = CreateUserRequest {
            email: "ann@example.com".to_owned(),
            full_name: "Ann Lee".to_owned(),
            role: AppRole::Client,
            read_only: false,
            send_invite,
            status: if send_invite {
                AdminUserStatus::Pending
            } else {
                AdminUserStatus::Active
            },
            invited_by: UserId::random(),
        };
        let created = FixtureAdminUsersCommand
            .create_user(&request)
            .await
            .expect("fixture accepts");
        assert_eq!(created.temporary_password.is_some(), expect_password);
    }
}

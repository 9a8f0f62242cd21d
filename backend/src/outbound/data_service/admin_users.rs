//! Admin user creation through the GoTrue admin API.
//!
//! Existing accounts with the same e-mail are reused. After the auth user
//! exists the profile row is upserted and the role assigned; failures in
//! those follow-up writes are logged and do not undo the account.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::DataServiceClient;
use super::auth::find_user_by_email;
use super::dto::{AuthUserDto, GenerateLinkDto, ProfileUpsertDto, UserRoleInsertDto};
use crate::domain::ports::{AdminUsersCommand, DataServiceError};
use crate::domain::{CreateUserRequest, CreatedUser, UserId};

fn generate_password() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[derive(Clone)]
pub struct RestAdminUsersCommand {
    client: DataServiceClient,
}

impl RestAdminUsersCommand {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }

    async fn create_auth_user(
        &self,
        request: &CreateUserRequest,
        password: &str,
    ) -> Result<UserId, DataServiceError> {
        let role = request.role.code();
        let body = json!({
            "email": request.email,
            "password": password,
            "email_confirm": !request.send_invite,
            "user_metadata": {
                "full_name": request.full_name,
                "invited_via": "admin_portal",
            },
            "app_metadata": {
                "roles": [role],
                "primary_role": role,
            },
        });
        let builder = self.client.auth(Method::POST, "admin/users")?.json(&body);
        let created: AuthUserDto = DataServiceClient::send_json(builder).await?;
        created.user_id().map_err(DataServiceError::decode)
    }

    async fn reset_password(&self, user_id: &UserId, password: &str) -> Result<(), DataServiceError> {
        let builder = self
            .client
            .auth(Method::PUT, &format!("admin/users/{user_id}"))?
            .json(&json!({ "password": password, "email_confirm": true }));
        DataServiceClient::send_empty(builder).await
    }

    async fn generate_link(&self, link_type: &str, email: &str) -> Result<Option<String>, DataServiceError> {
        let builder = self
            .client
            .auth(Method::POST, "admin/generate_link")?
            .json(&json!({ "type": link_type, "email": email }));
        let link: GenerateLinkDto = DataServiceClient::send_json(builder).await?;
        Ok(link.into_link())
    }

    async fn upsert_profile(&self, user_id: &UserId, request: &CreateUserRequest) -> Result<(), DataServiceError> {
        let row = ProfileUpsertDto {
            user_id: user_id.to_string(),
            full_name: &request.full_name,
            status: request.status,
            metadata: json!({
                "created_via": "admin_portal",
                "invited_by": request.invited_by.to_string(),
            }),
        };
        let builder = self
            .client
            .rest(Method::POST, "profiles")?
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);
        DataServiceClient::send_empty(builder).await
    }

    async fn assign_role(&self, user_id: &UserId, request: &CreateUserRequest) -> Result<(), DataServiceError> {
        let row = UserRoleInsertDto {
            user_id: user_id.to_string(),
            role: request.role.code(),
            read_only: request.read_only,
        };
        let builder = self
            .client
            .rest(Method::POST, "user_roles")?
            .query(&[("on_conflict", "user_id,role")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);
        DataServiceClient::send_empty(builder).await
    }
}

#[async_trait]
impl AdminUsersCommand for RestAdminUsersCommand {
    async fn create_user(&self, request: &CreateUserRequest) -> Result<CreatedUser, DataServiceError> {
        let existing = find_user_by_email(&self.client, &request.email).await?;
        let newly_created = existing.is_none();
        let mut temporary_password = None;

        let user_id = match existing {
            Some(user) => {
                let user_id = user.user_id().map_err(DataServiceError::decode)?;
                if !request.send_invite {
                    let password = generate_password();
                    match self.reset_password(&user_id, &password).await {
                        Ok(()) => temporary_password = Some(password),
                        Err(err) => warn!(%user_id, error = %err, "password reset for existing user failed"),
                    }
                }
                user_id
            }
            None => {
                let password = generate_password();
                let user_id = self.create_auth_user(request, &password).await?;
                if !request.send_invite {
                    temporary_password = Some(password);
                }
                user_id
            }
        };

        let invite_link = if request.send_invite {
            let link_type = if newly_created { "invite" } else { "magiclink" };
            self.generate_link(link_type, &request.email)
                .await
                .unwrap_or_else(|err| {
                    warn!(%user_id, error = %err, link_type, "invite link generation failed");
                    None
                })
        } else {
            None
        };

        if let Err(err) = self.upsert_profile(&user_id, request).await {
            warn!(%user_id, error = %err, "profile upsert failed");
        }
        self.assign_role(&user_id, request).await?;

        info!(
            %user_id,
            role = request.role.code(),
            invited_by = %request.invited_by,
            newly_created,
            "admin created user"
        );
        Ok(CreatedUser {
            user_id,
            invite_link,
            temporary_password,
        })
    }
}

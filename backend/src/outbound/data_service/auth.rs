//! GoTrue-backed sign-in, user search and portal detection.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::warn;

use super::DataServiceClient;
use super::dto::{AdminUserListDto, AuthUserDto, TokenResponseDto, split_role_rows};
use super::queries::fetch_role_rows;
use crate::domain::ports::{DataServiceError, LoginService, PortalDetector};
use crate::domain::{
    AppRole, AuthenticatedUser, Error, LoginCredentials, PortalDetection, normalize_roles,
};

const USERS_PAGE_SIZE: usize = 30;
const USERS_MAX_PAGES: usize = 40;

/// Page through the GoTrue admin user list looking for `email`.
pub(super) async fn find_user_by_email(
    client: &DataServiceClient,
    email: &str,
) -> Result<Option<AuthUserDto>, DataServiceError> {
    let normalized = email.trim().to_lowercase();
    for page in 1..=USERS_MAX_PAGES {
        let request = client
            .auth(Method::GET, "admin/users")?
            .query(&[("page", page), ("per_page", USERS_PAGE_SIZE)]);
        let listing: AdminUserListDto = DataServiceClient::send_json(request).await?;
        let exhausted = listing.users.len() < USERS_PAGE_SIZE;
        if let Some(found) = listing.users.into_iter().find(|user| {
            user.email
                .as_deref()
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(&normalized))
        }) {
            return Ok(Some(found));
        }
        if exhausted {
            break;
        }
    }
    Ok(None)
}

/// Metadata roles merged with the `user_roles` rows of `user`.
async fn merged_roles(
    client: &DataServiceClient,
    user: &AuthUserDto,
) -> Result<Vec<AppRole>, DataServiceError> {
    let id = user.user_id().map_err(DataServiceError::decode)?;
    let (table_roles, _) = split_role_rows(fetch_role_rows(client, &id).await?);
    let mut roles = user.metadata_roles();
    roles.extend(table_roles);
    Ok(normalize_roles(roles.iter().map(|role| role.code())))
}

/// Password grant against `auth/v1/token`.
#[derive(Clone)]
pub struct GoTrueLoginService {
    client: DataServiceClient,
}

impl GoTrueLoginService {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LoginService for GoTrueLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser, Error> {
        let request = self
            .client
            .auth(Method::POST, "token")?
            .query(&[("grant_type", "password")])
            .json(&json!({
                "email": credentials.email(),
                "password": credentials.password(),
            }));
        let token: TokenResponseDto = match DataServiceClient::send_json(request).await {
            Ok(token) => token,
            Err(DataServiceError::Rejected {
                status: 400 | 401, ..
            }) => return Err(Error::unauthorized("invalid credentials")),
            Err(err) => return Err(err.into()),
        };

        let roles = merged_roles(&self.client, &token.user).await?;
        let mut user = token
            .user
            .into_authenticated(credentials.email())
            .map_err(|message| Error::from(DataServiceError::decode(message)))?;
        user.roles = roles;
        Ok(user)
    }
}

/// Detector that consults GoTrue metadata and `user_roles`, degrading to
/// e-mail heuristics when the directory cannot be read.
#[derive(Clone)]
pub struct GoTruePortalDetector {
    client: DataServiceClient,
}

impl GoTruePortalDetector {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }

    async fn known_roles(&self, email: &str) -> Result<Vec<AppRole>, DataServiceError> {
        match find_user_by_email(&self.client, email).await? {
            Some(user) => merged_roles(&self.client, &user).await,
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl PortalDetector for GoTruePortalDetector {
    async fn detect(&self, email: &str) -> Result<PortalDetection, Error> {
        let roles = self.known_roles(email).await.unwrap_or_else(|err| {
            warn!(error = %err, "user directory unavailable during portal detection");
            Vec::new()
        });
        Ok(PortalDetection::from_roles(roles, email))
    }
}

//! Read-side adapters: session users, profiles and operations listings.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::DataServiceClient;
use super::dto::{AuthUserDto, ProfileRowDto, UserRoleRowDto, split_role_rows};
use crate::domain::ports::{DataServiceError, OperationsQuery, ProfileQuery, SessionLookup};
use crate::domain::{ProfilePageData, ProfileRecord, SessionUser, UserId};

pub(super) fn eq<T: std::fmt::Display + ?Sized>(value: &T) -> String {
    format!("eq.{value}")
}

pub(super) async fn fetch_profile(
    client: &DataServiceClient,
    user_id: &UserId,
) -> Result<Option<ProfileRecord>, DataServiceError> {
    let request = client.rest(Method::GET, "profiles")?.query(&[
        ("select", "full_name,phone,timezone".to_owned()),
        ("user_id", eq(user_id)),
        ("limit", "1".to_owned()),
    ]);
    let rows: Vec<ProfileRowDto> = DataServiceClient::send_json(request).await?;
    Ok(rows.into_iter().next().map(ProfileRecord::from))
}

pub(super) async fn fetch_role_rows(
    client: &DataServiceClient,
    user_id: &UserId,
) -> Result<Vec<UserRoleRowDto>, DataServiceError> {
    let request = client.rest(Method::GET, "user_roles")?.query(&[
        ("select", "role,read_only".to_owned()),
        ("user_id", eq(user_id)),
    ]);
    DataServiceClient::send_json(request).await
}

/// Session lookup against GoTrue users plus `user_roles` and `profiles`.
#[derive(Clone)]
pub struct RestSessionLookup {
    client: DataServiceClient,
}

impl RestSessionLookup {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionLookup for RestSessionLookup {
    async fn session_user(&self, user_id: &UserId) -> Result<Option<SessionUser>, DataServiceError> {
        let request = self
            .client
            .auth(Method::GET, &format!("admin/users/{user_id}"))?;
        let auth_user: AuthUserDto = match DataServiceClient::send_json(request).await {
            Ok(user) => user,
            Err(DataServiceError::Rejected { status: 404, .. }) => {
                debug!(%user_id, "session user no longer exists");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let (role_rows, profile) = futures_util::try_join!(
            fetch_role_rows(&self.client, user_id),
            fetch_profile(&self.client, user_id),
        )?;
        let (roles, read_only_roles) = split_role_rows(role_rows);
        let full_name = profile
            .and_then(|record| record.full_name)
            .or_else(|| auth_user.full_name());

        Ok(Some(SessionUser::new(
            user_id.clone(),
            auth_user.email.unwrap_or_default(),
            full_name,
            roles,
            read_only_roles,
        )))
    }
}

/// Profile page data from the `profiles` table.
#[derive(Clone)]
pub struct RestProfileQuery {
    client: DataServiceClient,
}

impl RestProfileQuery {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileQuery for RestProfileQuery {
    async fn profile_page_data(&self, user: &SessionUser) -> Result<ProfilePageData, DataServiceError> {
        let record = fetch_profile(&self.client, user.id()).await?;
        Ok(ProfilePageData::assemble(user, record))
    }
}

/// Table, columns and ordering behind one operations listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Listing {
    table: &'static str,
    select: &'static str,
    order: Option<&'static str>,
}

const CARS: Listing = Listing {
    table: "vehicles",
    select: "*",
    order: Some("make.asc"),
};
const CLIENTS: Listing = Listing {
    table: "profiles",
    select: "user_id,full_name,status,phone,nationality,metadata",
    order: Some("full_name.asc"),
};
const SELLERS: Listing = Listing {
    table: "sellers",
    select: "*",
    order: None,
};
const BROKERS: Listing = Listing {
    table: "brokers",
    select: "*",
    order: None,
};

/// Operations listings, passed through as raw rows.
#[derive(Clone)]
pub struct RestOperationsQuery {
    client: DataServiceClient,
}

impl RestOperationsQuery {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }

    fn request(&self, listing: Listing) -> Result<reqwest::RequestBuilder, DataServiceError> {
        let mut params = vec![("select", listing.select)];
        if let Some(order) = listing.order {
            params.push(("order", order));
        }
        Ok(self.client.rest(Method::GET, listing.table)?.query(&params))
    }

    async fn list(&self, listing: Listing) -> Result<Vec<Value>, DataServiceError> {
        DataServiceClient::send_json(self.request(listing)?).await
    }
}

#[async_trait]
impl OperationsQuery for RestOperationsQuery {
    async fn cars(&self) -> Result<Vec<Value>, DataServiceError> {
        self.list(CARS).await
    }

    async fn clients(&self) -> Result<Vec<Value>, DataServiceError> {
        self.list(CLIENTS).await
    }

    async fn sellers(&self) -> Result<Vec<Value>, DataServiceError> {
        self.list(SELLERS).await
    }

    async fn brokers(&self) -> Result<Vec<Value>, DataServiceError> {
        self.list(BROKERS).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::Url;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn query() -> RestOperationsQuery {
        let base = Url::parse("https://data.example").expect("url");
        let client = DataServiceClient::new(base, "key", Duration::from_secs(1)).expect("client");
        RestOperationsQuery::new(client)
    }

    #[rstest]
    #[case::clients(
        CLIENTS,
        "/rest/v1/profiles",
        "select=user_id%2Cfull_name%2Cstatus%2Cphone%2Cnationality%2Cmetadata&order=full_name.asc"
    )]
    #[case::cars(CARS, "/rest/v1/vehicles", "select=*&order=make.asc")]
    #[case::sellers(SELLERS, "/rest/v1/sellers", "select=*")]
    fn listings_target_their_tables(
        query: RestOperationsQuery,
        #[case] listing: Listing,
        #[case] path: &str,
        #[case] params: &str,
    ) {
        let request = query.request(listing).expect("builder").build().expect("request");
        assert_eq!(request.url().path(), path);
        assert_eq!(request.url().query(), Some(params));
    }
}

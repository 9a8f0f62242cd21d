//! `role_access_rules` table adapter.

use async_trait::async_trait;
use reqwest::Method;

use super::DataServiceClient;
use super::dto::RoleAccessRuleRowDto;
use super::queries::eq;
use crate::domain::RoleAccessRule;
use crate::domain::ports::{DataServiceError, RoleAccessRules};

#[derive(Clone)]
pub struct RestRoleAccessRules {
    client: DataServiceClient,
}

impl RestRoleAccessRules {
    pub fn new(client: DataServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleAccessRules for RestRoleAccessRules {
    async fn rules(&self) -> Result<Vec<RoleAccessRule>, DataServiceError> {
        let request = self
            .client
            .rest(Method::GET, "role_access_rules")?
            .query(&[("select", "section,role,allowed")]);
        let rows: Vec<RoleAccessRuleRowDto> = DataServiceClient::send_json(request).await?;
        Ok(rows.into_iter().map(RoleAccessRule::from).collect())
    }

    async fn upsert_rule(&self, rule: &RoleAccessRule) -> Result<(), DataServiceError> {
        let request = self
            .client
            .rest(Method::POST, "role_access_rules")?
            .query(&[("on_conflict", "role,section")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[RoleAccessRuleRowDto::from(rule)]);
        DataServiceClient::send_empty(request).await
    }

    async fn reset_section(&self, section: &str) -> Result<(), DataServiceError> {
        let request = self
            .client
            .rest(Method::DELETE, "role_access_rules")?
            .query(&[("section", eq(section))]);
        DataServiceClient::send_empty(request).await
    }
}

//! Port for the stored role access overrides.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::RoleAccessRule;

use super::DataServiceError;

/// Read and edit `role_access_rules` rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleAccessRules: Send + Sync {
    /// Every stored override.
    async fn rules(&self) -> Result<Vec<RoleAccessRule>, DataServiceError>;

    /// Insert or replace the override for `(rule.section, rule.role)`.
    async fn upsert_rule(&self, rule: &RoleAccessRule) -> Result<(), DataServiceError>;

    /// Drop every override of `section`.
    async fn reset_section(&self, section: &str) -> Result<(), DataServiceError>;
}

/// Process-local override store.
#[derive(Debug, Default)]
pub struct FixtureRoleAccessRules {
    rules: Mutex<Vec<RoleAccessRule>>,
}

impl FixtureRoleAccessRules {
    pub fn with_rules(rules: Vec<RoleAccessRule>) -> Self {
        Self {
            rules: Mutex::new(rules),
        }
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Vec<RoleAccessRule>>, DataServiceError> {
        self.rules
            .lock()
            .map_err(|_| DataServiceError::unavailable("fixture rule store poisoned"))
    }
}

#[async_trait]
impl RoleAccessRules for FixtureRoleAccessRules {
    async fn rules(&self) -> Result<Vec<RoleAccessRule>, DataServiceError> {
        Ok(self.guard()?.clone())
    }

    async fn upsert_rule(&self, rule: &RoleAccessRule) -> Result<(), DataServiceError> {
        let mut rules = self.guard()?;
        match rules
            .iter_mut()
            .find(|stored| stored.section == rule.section && stored.role == rule.role)
        {
            Some(stored) => stored.allowed = rule.allowed,
            None => rules.push(rule.clone()),
        }
        Ok(())
    }

    async fn reset_section(&self, section: &str) -> Result<(), DataServiceError> {
        self.guard()?.retain(|rule| rule.section != section);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn upsert_replaces_matching_row() {
        let store = FixtureRoleAccessRules::default();
        store
            .upsert_rule(&RoleAccessRule::new("workspace_cars", "CLIENT", true))
            .await
            .expect("insert");
        store
            .upsert_rule(&RoleAccessRule::new("workspace_cars", "CLIENT", false))
            .await
            .expect("update");

        let rules = store.rules().await.expect("rules");
        assert_eq!(rules, vec![RoleAccessRule::new("workspace_cars", "CLIENT", false)]);
    }

    #[rstest]
    #[tokio::test]
    async fn reset_only_touches_one_section() {
        let store = FixtureRoleAccessRules::with_rules(vec![
            RoleAccessRule::new("workspace_cars", "CLIENT", true),
            RoleAccessRule::new("workspace_deals", "LEGAL", false),
        ]);
        store.reset_section("workspace_cars").await.expect("reset");

        let rules = store.rules().await.expect("rules");
        assert_eq!(rules, vec![RoleAccessRule::new("workspace_deals", "LEGAL", false)]);
    }
}

//! Domain ports and supporting types for the hexagonal boundary.

mod admin_users_command;
mod data_service_error;
mod fixture_accounts;
mod login_service;
mod operations_query;
mod portal_detector;
mod profile_query;
mod role_access_rules;
mod session_lookup;

#[cfg(test)]
pub use admin_users_command::MockAdminUsersCommand;
pub use admin_users_command::{AdminUsersCommand, FixtureAdminUsersCommand};
pub use data_service_error::DataServiceError;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use operations_query::MockOperationsQuery;
pub use operations_query::{FixtureOperationsQuery, OperationsQuery};
#[cfg(test)]
pub use portal_detector::MockPortalDetector;
pub use portal_detector::{FixturePortalDetector, PortalDetector};
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{FixtureProfileQuery, ProfileQuery};
#[cfg(test)]
pub use role_access_rules::MockRoleAccessRules;
pub use role_access_rules::{FixtureRoleAccessRules, RoleAccessRules};
#[cfg(test)]
pub use session_lookup::MockSessionLookup;
pub use session_lookup::{FixtureSessionLookup, SessionLookup};

//! Data-service outbound adapters.
//!
//! Thin HTTP implementations of the domain ports against a PostgREST
//! (`rest/v1`) and GoTrue (`auth/v1`) deployment, authenticated with the
//! service key.

mod admin_users;
mod auth;
mod client;
mod dto;
mod queries;
mod role_access;

pub use admin_users::RestAdminUsersCommand;
pub use auth::{GoTrueLoginService, GoTruePortalDetector};
pub use client::DataServiceClient;
pub use queries::{RestOperationsQuery, RestProfileQuery, RestSessionLookup};
pub use role_access::RestRoleAccessRules;

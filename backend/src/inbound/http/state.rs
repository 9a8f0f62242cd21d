//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `web::Data` so they depend only on
//! domain ports and policies and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdminUsersCommand, FixtureAdminUsersCommand, FixtureLoginService, FixtureOperationsQuery,
    FixturePortalDetector, FixtureProfileQuery, FixtureRoleAccessRules, FixtureSessionLookup,
    LoginService, OperationsQuery, PortalDetector, ProfileQuery, RoleAccessRules, SessionLookup,
};
use crate::domain::{AccessPolicy, SessionGate};

/// Parameter object bundling every port implementation.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub sessions: Arc<dyn SessionLookup>,
    pub login: Arc<dyn LoginService>,
    pub portal_detector: Arc<dyn PortalDetector>,
    pub operations: Arc<dyn OperationsQuery>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub role_access: Arc<dyn RoleAccessRules>,
    pub admin_users: Arc<dyn AdminUsersCommand>,
}

impl HttpStatePorts {
    /// In-memory adapters over the development accounts.
    ///
    /// # Examples
    /// ```
    /// use portal_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::fixtures());
    /// let _gate = state.gate.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            sessions: Arc::new(FixtureSessionLookup),
            login: Arc::new(FixtureLoginService),
            portal_detector: Arc::new(FixturePortalDetector),
            operations: Arc::new(FixtureOperationsQuery),
            profiles: Arc::new(FixtureProfileQuery),
            role_access: Arc::new(FixtureRoleAccessRules::default()),
            admin_users: Arc::new(FixtureAdminUsersCommand),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub gate: SessionGate,
    pub access: AccessPolicy,
    pub login: Arc<dyn LoginService>,
    pub portal_detector: Arc<dyn PortalDetector>,
    pub operations: Arc<dyn OperationsQuery>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub role_access: Arc<dyn RoleAccessRules>,
    pub admin_users: Arc<dyn AdminUsersCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Build the session gate and access policy over `ports`.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            sessions,
            login,
            portal_detector,
            operations,
            profiles,
            role_access,
            admin_users,
        } = ports;
        Self {
            gate: SessionGate::new(sessions),
            access: AccessPolicy::new(role_access.clone()),
            login,
            portal_detector,
            operations,
            profiles,
            role_access,
            admin_users,
        }
    }
}

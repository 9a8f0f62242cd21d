//! Portals: the dashboard areas users sign in to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AppRole;

/// A named dashboard area with its own login entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    Admin,
    Ops,
    Partner,
    Client,
    Risk,
    Support,
    Tech,
    Legal,
    Investor,
    Finance,
    Accounting,
}

/// Unknown portal code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown portal: {0}")]
pub struct UnknownPortal(pub String);

impl Portal {
    /// Every portal in navigation order.
    pub const ALL: [Self; 11] = [
        Self::Admin,
        Self::Ops,
        Self::Partner,
        Self::Client,
        Self::Risk,
        Self::Support,
        Self::Tech,
        Self::Legal,
        Self::Investor,
        Self::Finance,
        Self::Accounting,
    ];

    /// Lower-case code used in paths.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Ops => "ops",
            Self::Partner => "partner",
            Self::Client => "client",
            Self::Risk => "risk",
            Self::Support => "support",
            Self::Tech => "tech",
            Self::Legal => "legal",
            Self::Investor => "investor",
            Self::Finance => "finance",
            Self::Accounting => "accounting",
        }
    }

    /// Header shown on the portal's pages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administration",
            Self::Ops => "Operations",
            Self::Partner => "Partner portal",
            Self::Client => "Client cabinet",
            Self::Risk => "Risk management",
            Self::Support => "Support desk",
            Self::Tech => "Technical",
            Self::Legal => "Legal",
            Self::Investor => "Investor cabinet",
            Self::Finance => "Finance",
            Self::Accounting => "Accounting",
        }
    }

    /// Roles allowed into the portal. An empty list admits any
    /// authenticated user.
    pub const fn allowed_roles(self) -> &'static [AppRole] {
        use AppRole::{
            Accounting, Admin, Client, Finance, Investor, Legal, OpManager, RiskManager, Support,
            TechSpecialist,
        };
        match self {
            Self::Admin => &[Admin],
            Self::Ops => &[OpManager, Support, Finance, TechSpecialist, Admin],
            Self::Partner => &[],
            Self::Client => &[Client],
            Self::Risk => &[RiskManager, Admin],
            Self::Support => &[Support, OpManager, Admin],
            Self::Tech => &[TechSpecialist, OpManager, Admin],
            Self::Legal => &[Legal, Admin],
            Self::Investor => &[Investor, Admin],
            Self::Finance => &[Finance, Accounting, Admin],
            Self::Accounting => &[Accounting, Finance, Admin],
        }
    }

    /// Landing page of the portal.
    pub fn home_path(self) -> String {
        format!("/{}/dashboard", self.code())
    }

    /// Login entry point dedicated to the portal.
    pub fn login_path(self) -> String {
        format!("/login/{}", self.code())
    }

    /// Whether a user holding `roles` may enter the portal.
    pub fn admits(self, roles: &[AppRole]) -> bool {
        let allowed = self.allowed_roles();
        allowed.is_empty() || roles.iter().any(|role| allowed.contains(role))
    }

    /// Portal a user whose primary role is `role` belongs to.
    pub const fn for_role(role: AppRole) -> Self {
        match role {
            AppRole::Admin => Self::Admin,
            AppRole::OpManager => Self::Ops,
            AppRole::Finance => Self::Finance,
            AppRole::Support => Self::Support,
            AppRole::Investor => Self::Investor,
            AppRole::Client => Self::Client,
            AppRole::RiskManager => Self::Risk,
            AppRole::Legal => Self::Legal,
            AppRole::Accounting => Self::Accounting,
            AppRole::TechSpecialist => Self::Tech,
        }
    }

    /// Portals open to a user holding `roles`.
    pub fn accessible_to(roles: &[AppRole]) -> Vec<Self> {
        if roles.is_empty() {
            return Vec::new();
        }
        Self::ALL
            .into_iter()
            .filter(|portal| portal.admits(roles))
            .collect()
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Portal {
    type Err = UnknownPortal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|portal| portal.code() == lowered)
            .ok_or_else(|| UnknownPortal(s.to_owned()))
    }
}

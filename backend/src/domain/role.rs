//! Application roles and their priority, labels and home paths.
//!
//! Role codes arrive from several places (the `user_roles` table, auth
//! metadata, admin payloads) with inconsistent casing. [`AppRole::parse`]
//! is the single normalisation point; unknown codes are dropped rather than
//! rejected so a stray metadata value cannot lock a user out.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Roles understood by the portals, declared in priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppRole {
    Admin,
    OpManager,
    Finance,
    Support,
    Investor,
    Client,
    RiskManager,
    Legal,
    Accounting,
    TechSpecialist,
}

impl AppRole {
    /// Every role, highest priority first.
    pub const PRIORITY: [Self; 10] = [
        Self::Admin,
        Self::OpManager,
        Self::Finance,
        Self::Support,
        Self::Investor,
        Self::Client,
        Self::RiskManager,
        Self::Legal,
        Self::Accounting,
        Self::TechSpecialist,
    ];

    /// Normalise a raw role code (trimmed, case-insensitive).
    ///
    /// # Examples
    /// ```
    /// use portal_backend::domain::AppRole;
    ///
    /// assert_eq!(AppRole::parse(" op_manager "), Some(AppRole::OpManager));
    /// assert_eq!(AppRole::parse("janitor"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::PRIORITY
            .into_iter()
            .find(|role| role.code() == normalized)
    }

    /// Canonical upper-case code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::OpManager => "OP_MANAGER",
            Self::Finance => "FINANCE",
            Self::Support => "SUPPORT",
            Self::Investor => "INVESTOR",
            Self::Client => "CLIENT",
            Self::RiskManager => "RISK_MANAGER",
            Self::Legal => "LEGAL",
            Self::Accounting => "ACCOUNTING",
            Self::TechSpecialist => "TECH_SPECIALIST",
        }
    }

    /// Display label used on dashboards.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::OpManager => "Operations Manager",
            Self::Finance => "Finance",
            Self::Support => "Support",
            Self::Investor => "Investor",
            Self::Client => "Client",
            Self::RiskManager => "Risk Manager",
            Self::Legal => "Legal",
            Self::Accounting => "Accounting",
            Self::TechSpecialist => "Technical Specialist",
        }
    }

    /// Where a user whose primary role is `self` lands after login.
    pub const fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/bpm",
            Self::OpManager => "/ops/dashboard",
            Self::Finance | Self::RiskManager | Self::Legal | Self::Accounting => "/ops/deals",
            Self::Support => "/ops/tasks",
            Self::Investor => "/investor/dashboard",
            Self::Client => "/client/dashboard",
            Self::TechSpecialist => "/tech/dashboard",
        }
    }

    fn priority(self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|role| *role == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Highest-priority role in `roles`.
pub fn resolve_primary_role(roles: &[AppRole]) -> Option<AppRole> {
    roles.iter().copied().min_by_key(|role| role.priority())
}

/// Home path of the primary role, or `fallback` when `roles` is empty.
pub fn resolve_home_path<'a>(roles: &[AppRole], fallback: &'a str) -> &'a str {
    match resolve_primary_role(roles) {
        Some(role) => role.home_path(),
        None => fallback,
    }
}

/// Normalise raw role codes, dropping unknown values and duplicates and
/// returning the result in priority order.
pub fn normalize_roles<I, S>(raw: I) -> Vec<AppRole>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let set: BTreeSet<AppRole> = raw
        .into_iter()
        .filter_map(|code| AppRole::parse(code.as_ref()))
        .collect();
    sort_by_priority(set)
}

/// Collect roles from auth metadata.
///
/// Accepts role arrays, single role strings, and objects carrying `roles`,
/// `primary_role` or `primaryRole` keys; both `app_metadata` and
/// `user_metadata` are inspected.
pub fn roles_from_metadata(app_metadata: Option<&Value>, user_metadata: Option<&Value>) -> Vec<AppRole> {
    let mut roles = BTreeSet::new();
    for source in [app_metadata, user_metadata].into_iter().flatten() {
        collect_roles(source, &mut roles);
    }
    sort_by_priority(roles)
}

fn collect_roles(source: &Value, target: &mut BTreeSet<AppRole>) {
    match source {
        Value::Array(items) => {
            target.extend(items.iter().filter_map(Value::as_str).filter_map(AppRole::parse));
        }
        Value::String(code) => target.extend(AppRole::parse(code)),
        Value::Object(record) => {
            for key in ["roles", "primary_role", "primaryRole"] {
                if let Some(nested) = record.get(key) {
                    collect_roles(nested, target);
                }
            }
        }
        _ => {}
    }
}

fn sort_by_priority(roles: BTreeSet<AppRole>) -> Vec<AppRole> {
    let mut roles: Vec<AppRole> = roles.into_iter().collect();
    roles.sort_by_key(|role| role.priority());
    roles
}

//! Path-based access policy for protected portal pages.
//!
//! Every protected path belongs to at most one [`AccessSection`]. A section
//! carries default roles; administrators may override them per role through
//! [`RoleAccessRule`] rows held by the data service. Workspace pages are
//! reachable under `/workspace/{section}` and under each internal portal
//! prefix (`/ops/cars`, `/risk/deals`, ...); those aliases resolve to the
//! shared workspace section before the generic prefix table is consulted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::ports::RoleAccessRules;
use super::{AppRole, resolve_home_path};

/// A protected path prefix with its default roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessSection {
    pub id: &'static str,
    pub label: &'static str,
    pub prefix: &'static str,
    pub default_roles: &'static [AppRole],
}

use AppRole::{
    Accounting, Admin, Client, Finance, Investor, Legal, OpManager, RiskManager, Support,
    TechSpecialist,
};

const OPS_ROLES: &[AppRole] = &[OpManager, Support, Finance, TechSpecialist, Admin];
const WORKSPACE_ROLES: &[AppRole] = &[
    OpManager,
    Support,
    Finance,
    TechSpecialist,
    RiskManager,
    Legal,
    Accounting,
    Admin,
];

const fn section(
    id: &'static str,
    label: &'static str,
    prefix: &'static str,
    default_roles: &'static [AppRole],
) -> AccessSection {
    AccessSection {
        id,
        label,
        prefix,
        default_roles,
    }
}

/// Every access section, grouped by portal.
pub const ACCESS_SECTIONS: &[AccessSection] = &[
    section("client_dashboard", "Dashboard", "/client/dashboard", &[Client]),
    section("client_vehicle", "Vehicle", "/client/vehicle", &[Client]),
    section("client_invoices", "Invoices", "/client/invoices", &[Client]),
    section("client_documents", "Documents", "/client/documents", &[Client]),
    section("client_profile", "Profile", "/client/profile", &[Client]),
    section("client_referrals", "Referrals", "/client/referrals", &[Client]),
    section("client_support", "Support", "/client/support", &[Client]),
    section("client_all", "Other", "/client", &[Client]),
    section("ops_dashboard", "Dashboard", "/ops/dashboard", OPS_ROLES),
    section("ops_all", "Other", "/ops", OPS_ROLES),
    section("workspace_tasks", "Tasks", "/workspace/tasks", WORKSPACE_ROLES),
    section("workspace_deals", "Deals", "/workspace/deals", WORKSPACE_ROLES),
    section("workspace_clients", "Clients", "/workspace/clients", WORKSPACE_ROLES),
    section("workspace_sellers", "Sellers", "/workspace/sellers", WORKSPACE_ROLES),
    section("workspace_cars", "Cars", "/workspace/cars", WORKSPACE_ROLES),
    section("workspace_all", "Workspace Other", "/workspace", WORKSPACE_ROLES),
    section(
        "finance_dashboard",
        "Finance Dashboard",
        "/finance/dashboard",
        &[Finance, Accounting, Admin],
    ),
    section("finance_all", "Finance", "/finance", &[Finance, Accounting, Admin]),
    section(
        "support_dashboard",
        "Support Dashboard",
        "/support/dashboard",
        &[Support, OpManager, Admin],
    ),
    section("support_all", "Support", "/support", &[Support, OpManager, Admin]),
    section(
        "tech_dashboard",
        "Technical Dashboard",
        "/tech/dashboard",
        &[TechSpecialist, OpManager, Admin],
    ),
    section("tech_all", "Technical", "/tech", &[TechSpecialist, OpManager, Admin]),
    section("risk_dashboard", "Risk Dashboard", "/risk/dashboard", &[RiskManager, Admin]),
    section("risk_all", "Risk", "/risk", &[RiskManager, Admin]),
    section("legal_dashboard", "Legal Dashboard", "/legal/dashboard", &[Legal, Admin]),
    section("legal_all", "Legal", "/legal", &[Legal, Admin]),
    section(
        "accounting_dashboard",
        "Accounting Dashboard",
        "/accounting/dashboard",
        &[Accounting, Finance, Admin],
    ),
    section(
        "accounting_all",
        "Accounting",
        "/accounting",
        &[Accounting, Finance, Admin],
    ),
    section("admin_bpm", "BPM", "/admin/bpm", &[Admin]),
    section("admin_users", "Users", "/admin/users", &[Admin]),
    section("admin_roles", "Roles", "/admin/roles", &[Admin]),
    section("admin_integrations", "Integrations", "/admin/integrations", &[Admin]),
    section("admin_all", "Other", "/admin", &[Admin]),
    section("investor_dashboard", "Dashboard", "/investor/dashboard", &[Investor, Admin]),
    section("investor_portfolio", "Portfolio", "/investor/portfolio", &[Investor, Admin]),
    section("investor_reports", "Reports", "/investor/reports", &[Investor, Admin]),
    section("investor_all", "Other", "/investor", &[Investor, Admin]),
    section(
        "settings_all",
        "Settings",
        "/settings",
        &[Client, OpManager, Support, Finance, TechSpecialist],
    ),
];

const WORKSPACE_PAGES: [&str; 5] = ["tasks", "deals", "clients", "sellers", "cars"];
const WORKSPACE_PORTALS: [&str; 8] = [
    "ops",
    "admin",
    "finance",
    "support",
    "tech",
    "risk",
    "legal",
    "accounting",
];

impl AccessSection {
    /// Look a section up by id.
    pub fn by_id(id: &str) -> Option<&'static Self> {
        ACCESS_SECTIONS.iter().find(|section| section.id == id)
    }

    /// Navigation group: the first path segment of the prefix.
    pub fn group_id(&self) -> &'static str {
        self.prefix
            .split('/')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .unwrap_or("misc")
    }
}

/// Resolve the section guarding `path`.
///
/// Workspace aliases win; otherwise the longest matching prefix is chosen.
/// Matching is case-insensitive.
///
/// # Examples
/// ```
/// use portal_backend::domain::resolve_section_for_path;
///
/// let section = resolve_section_for_path("/ops/dashboard/today").unwrap();
/// assert_eq!(section.id, "ops_dashboard");
/// assert!(resolve_section_for_path("/apply").is_none());
/// ```
pub fn resolve_section_for_path(path: &str) -> Option<&'static AccessSection> {
    let normalized = path.to_lowercase();
    if let Some(section) = resolve_workspace_alias(&normalized) {
        return Some(section);
    }
    ACCESS_SECTIONS
        .iter()
        .filter(|section| normalized.starts_with(section.prefix))
        .max_by_key(|section| section.prefix.len())
}

fn resolve_workspace_alias(normalized: &str) -> Option<&'static AccessSection> {
    let mut segments = normalized.trim_start_matches('/').split('/');
    let portal = segments.next()?;
    let page = segments.next()?;
    if portal != "workspace" && !WORKSPACE_PORTALS.contains(&portal) {
        return None;
    }
    let page = WORKSPACE_PAGES
        .into_iter()
        .find(|candidate| page.starts_with(candidate))?;
    AccessSection::by_id(&format!("workspace_{page}"))
}

/// An override row from the `role_access_rules` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleAccessRule {
    pub section: String,
    pub role: String,
    pub allowed: bool,
}

impl RoleAccessRule {
    pub fn new(section: impl Into<String>, role: impl Into<String>, allowed: bool) -> Self {
        Self {
            section: section.into(),
            role: role.into(),
            allowed,
        }
    }
}

/// Roles allowed into `section` after applying the matching overrides.
///
/// Returns `None` when no override row targets the section, so callers can
/// fall back to [`AccessSection::default_roles`].
pub fn overridden_roles(section: &AccessSection, rules: &[RoleAccessRule]) -> Option<Vec<AppRole>> {
    let mut allowed: BTreeSet<AppRole> = section.default_roles.iter().copied().collect();
    let mut has_override = false;
    for rule in rules.iter().filter(|rule| rule.section == section.id) {
        has_override = true;
        let Some(role) = AppRole::parse(&rule.role) else {
            continue;
        };
        if rule.allowed {
            allowed.insert(role);
        } else {
            allowed.remove(&role);
        }
    }
    has_override.then(|| allowed.into_iter().collect())
}

/// Decide whether `roles` may open `path`.
///
/// Users without roles are always denied and administrators always pass.
/// Paths outside every section are open. `custom_allowed` replaces the
/// section defaults when overrides exist.
pub fn is_access_allowed(path: &str, roles: &[AppRole], custom_allowed: Option<&[AppRole]>) -> bool {
    if roles.is_empty() {
        return false;
    }
    if roles.contains(&AppRole::Admin) {
        return true;
    }
    let allowed = match custom_allowed {
        Some(allowed) => allowed,
        None => match resolve_section_for_path(path) {
            Some(section) => section.default_roles,
            None => return true,
        },
    };
    roles.iter().any(|role| allowed.contains(role))
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    /// Access denied; send the user to `redirect_to`.
    Denied { redirect_to: String },
}

/// Applies the section table plus stored overrides to a request path.
#[derive(Clone)]
pub struct AccessPolicy {
    rules: Arc<dyn RoleAccessRules>,
}

impl AccessPolicy {
    pub fn new(rules: Arc<dyn RoleAccessRules>) -> Self {
        Self { rules }
    }

    /// Check `path` for a user holding `roles`.
    ///
    /// Override lookup failures are logged and the section defaults apply.
    pub async fn check(&self, path: &str, roles: &[AppRole]) -> AccessDecision {
        let custom_allowed = match resolve_section_for_path(path) {
            Some(section) if !roles.is_empty() && !roles.contains(&AppRole::Admin) => {
                match self.rules.rules().await {
                    Ok(rules) => overridden_roles(section, &rules),
                    Err(error) => {
                        warn!(
                            section = section.id,
                            error = %error,
                            "role access overrides unavailable; using defaults"
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        if is_access_allowed(path, roles, custom_allowed.as_deref()) {
            AccessDecision::Allowed
        } else {
            AccessDecision::Denied {
                redirect_to: resolve_home_path(roles, "/").to_owned(),
            }
        }
    }
}

/// Section group shown as a heading in the role matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MatrixGroup {
    pub id: String,
    pub label: String,
}

/// One row of the role matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatrixSection {
    pub id: String,
    pub label: String,
    pub prefix: String,
    pub has_override: bool,
    pub group_id: String,
    pub grants: BTreeMap<AppRole, bool>,
    pub defaults: BTreeMap<AppRole, bool>,
}

/// Role × section grid rendered on the admin roles page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RoleAccessMatrix {
    pub roles: Vec<AppRole>,
    pub groups: Vec<MatrixGroup>,
    pub sections: Vec<MatrixSection>,
}

/// Combine the section table with override rows.
///
/// Rows naming unknown sections or roles are ignored. For each section the
/// last row per role wins.
pub fn role_access_matrix(rules: &[RoleAccessRule]) -> RoleAccessMatrix {
    let mut overrides: BTreeMap<&str, BTreeMap<AppRole, bool>> = BTreeMap::new();
    let mut sections_with_overrides = BTreeSet::new();
    for rule in rules {
        let Some(section) = AccessSection::by_id(&rule.section) else {
            continue;
        };
        sections_with_overrides.insert(section.id);
        if let Some(role) = AppRole::parse(&rule.role) {
            overrides
                .entry(section.id)
                .or_default()
                .insert(role, rule.allowed);
        }
    }

    let sections: Vec<MatrixSection> = ACCESS_SECTIONS
        .iter()
        .map(|section| {
            let defaults: BTreeMap<AppRole, bool> = AppRole::PRIORITY
                .into_iter()
                .map(|role| (role, section.default_roles.contains(&role)))
                .collect();
            let section_overrides = overrides.get(section.id);
            let grants = defaults
                .iter()
                .map(|(role, default)| {
                    let granted = section_overrides
                        .and_then(|map| map.get(role))
                        .copied()
                        .unwrap_or(*default);
                    (*role, granted)
                })
                .collect();
            MatrixSection {
                id: section.id.to_owned(),
                label: section.label.to_owned(),
                prefix: section.prefix.to_owned(),
                has_override: sections_with_overrides.contains(section.id),
                group_id: section.group_id().to_owned(),
                grants,
                defaults,
            }
        })
        .collect();

    let mut groups: Vec<MatrixGroup> = Vec::new();
    for section in &sections {
        if !groups.iter().any(|group| group.id == section.group_id) {
            groups.push(MatrixGroup {
                id: section.group_id.clone(),
                label: section.group_id.to_uppercase(),
            });
        }
    }

    RoleAccessMatrix {
        roles: AppRole::PRIORITY.to_vec(),
        groups,
        sections,
    }
}

//! Profile page view model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SessionUser;

/// Timezone shown when the profile does not set one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Dubai";

/// Subset of a `profiles` row used by the profile pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileRecord {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub timezone: Option<String>,
}

/// Data rendered on `/{portal}/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePageData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub timezone: String,
}

impl ProfilePageData {
    /// Merge the session user with their stored profile, if any.
    pub fn assemble(user: &SessionUser, record: Option<ProfileRecord>) -> Self {
        let record = record.unwrap_or_default();
        Self {
            full_name: record
                .full_name
                .or_else(|| user.full_name().map(str::to_owned))
                .unwrap_or_default(),
            email: user.email().to_owned(),
            phone: record.phone.unwrap_or_default(),
            timezone: record
                .timezone
                .filter(|zone| !zone.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TIMEZONE.to_owned()),
        }
    }
}

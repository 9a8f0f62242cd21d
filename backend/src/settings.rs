//! Application settings loaded via OrthoConfig.
//!
//! Sources are layered: command-line flags over `PORTAL_*` environment
//! variables over an optional configuration file.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the portal server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Base URL of the data service (`rest/v1` and `auth/v1` live below it).
    pub data_service_url: Option<String>,
    /// Service-role key sent as `apikey` and bearer token.
    pub data_service_key: Option<String>,
    /// Per-request timeout for data service calls.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
}

/// Resolved data service connection.
#[derive(Debug, Clone)]
pub struct DataServiceSettings {
    pub base_url: Url,
    pub service_key: String,
    pub timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("invalid data service url '{value}': {source}")]
    DataServiceUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("PORTAL_DATA_SERVICE_KEY is required when PORTAL_DATA_SERVICE_URL is set")]
    MissingServiceKey,
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

impl AppSettings {
    /// Address the HTTP server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Data service connection, or `None` to run on fixtures.
    ///
    /// A blank URL counts as unset.
    pub fn data_service(&self) -> Result<Option<DataServiceSettings>, SettingsError> {
        let Some(raw) = self
            .data_service_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Ok(None);
        };
        let base_url = Url::parse(raw).map_err(|source| SettingsError::DataServiceUrl {
            value: raw.to_owned(),
            source,
        })?;
        let service_key = self
            .data_service_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingServiceKey)?
            .to_owned();
        if self.request_timeout_secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(Some(DataServiceSettings {
            base_url,
            service_key,
            timeout: Duration::from_secs(self.request_timeout_secs),
        }))
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            data_service_url: None,
            data_service_key: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "PORTAL_BIND_ADDR",
        "PORTAL_DATA_SERVICE_URL",
        "PORTAL_DATA_SERVICE_KEY",
        "PORTAL_REQUEST_TIMEOUT_SECS",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("portal-backend")]).expect("config should load")
    }

    #[rstest]
    fn defaults_run_on_fixtures() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert!(settings.data_service().expect("no service").is_none());
        assert_eq!(settings.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[rstest]
    fn environment_configures_the_data_service() {
        let _guard = lock_env([
            ("PORTAL_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "PORTAL_DATA_SERVICE_URL",
                Some("https://project.example.co".to_owned()),
            ),
            ("PORTAL_DATA_SERVICE_KEY", Some("service-role".to_owned())),
            ("PORTAL_REQUEST_TIMEOUT_SECS", Some("3".to_owned())),
        ]);
        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("address").port(),
            9000
        );
        let service = settings
            .data_service()
            .expect("valid settings")
            .expect("service configured");
        assert_eq!(service.base_url.as_str(), "https://project.example.co/");
        assert_eq!(service.service_key, "service-role");
        assert_eq!(service.timeout, Duration::from_secs(3));
    }

    #[rstest]
    #[case(AppSettings { data_service_url: Some("https://x.example".to_owned()), ..AppSettings::default() })]
    #[case(AppSettings {
        data_service_url: Some("https://x.example".to_owned()),
        data_service_key: Some("   ".to_owned()),
        ..AppSettings::default()
    })]
    fn url_without_key_is_rejected(#[case] settings: AppSettings) {
        assert!(matches!(
            settings.data_service(),
            Err(SettingsError::MissingServiceKey)
        ));
    }

    #[rstest]
    fn malformed_values_are_reported() {
        let settings = AppSettings {
            bind_addr: Some("localhost".to_owned()),
            data_service_url: Some("not a url".to_owned()),
            data_service_key: Some("key".to_owned()),
            ..AppSettings::default()
        };
        assert!(matches!(settings.bind_addr(), Err(SettingsError::BindAddr { .. })));
        assert!(matches!(
            settings.data_service(),
            Err(SettingsError::DataServiceUrl { .. })
        ));
    }

    #[rstest]
    fn blank_url_means_fixtures() {
        let settings = AppSettings {
            data_service_url: Some("  ".to_owned()),
            ..AppSettings::default()
        };
        assert!(settings.data_service().expect("blank is unset").is_none());
    }
}

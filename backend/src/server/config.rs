//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use portal_backend::inbound::http::session_config::SessionSettings;
use portal_backend::settings::DataServiceSettings;

/// Everything `create_server` needs, resolved up front.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) data_service: Option<DataServiceSettings>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
            ttl,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl: ttl,
            bind_addr,
            data_service: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Use the data service adapters instead of fixtures.
    #[must_use]
    pub fn with_data_service(mut self, data_service: Option<DataServiceSettings>) -> Self {
        self.data_service = data_service;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

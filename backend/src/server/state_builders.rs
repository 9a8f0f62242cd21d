//! Port wiring: data service adapters when configured, fixtures otherwise.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use portal_backend::inbound::http::health::PortBackend;
use portal_backend::inbound::http::state::{HttpState, HttpStatePorts};
use portal_backend::outbound::data_service::{
    DataServiceClient, GoTrueLoginService, GoTruePortalDetector, RestAdminUsersCommand,
    RestOperationsQuery, RestProfileQuery, RestRoleAccessRules, RestSessionLookup,
};
use portal_backend::settings::DataServiceSettings;

fn data_service_ports(client: &DataServiceClient) -> HttpStatePorts {
    HttpStatePorts {
        sessions: Arc::new(RestSessionLookup::new(client.clone())),
        login: Arc::new(GoTrueLoginService::new(client.clone())),
        portal_detector: Arc::new(GoTruePortalDetector::new(client.clone())),
        operations: Arc::new(RestOperationsQuery::new(client.clone())),
        profiles: Arc::new(RestProfileQuery::new(client.clone())),
        role_access: Arc::new(RestRoleAccessRules::new(client.clone())),
        admin_users: Arc::new(RestAdminUsersCommand::new(client.clone())),
    }
}

/// Build the shared handler state and report which backend serves it.
///
/// # Errors
/// Returns [`std::io::Error`] when the HTTP client cannot be constructed.
pub(crate) fn build_http_state(
    data_service: Option<&DataServiceSettings>,
) -> std::io::Result<(web::Data<HttpState>, PortBackend)> {
    let (ports, backend) = match data_service {
        Some(settings) => {
            let client = DataServiceClient::new(
                settings.base_url.clone(),
                settings.service_key.clone(),
                settings.timeout,
            )
            .map_err(|e| std::io::Error::other(format!("data service client: {e}")))?;
            info!(base_url = %settings.base_url, "using data service adapters");
            (data_service_ports(&client), PortBackend::DataService)
        }
        None => {
            info!("no data service configured; using fixture adapters");
            (HttpStatePorts::fixtures(), PortBackend::Fixtures)
        }
    };
    Ok((web::Data::new(HttpState::new(ports)), backend))
}

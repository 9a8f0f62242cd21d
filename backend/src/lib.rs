//! Backend for the Fast Lease leasing portals.
//!
//! Layout follows ports and adapters: [`domain`] holds roles, portals,
//! access rules and the port traits; [`inbound`] serves HTTP; [`outbound`]
//! talks to the data service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

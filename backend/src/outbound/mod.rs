//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **data_service**: reqwest adapters for the PostgREST/GoTrue data service
//!
//! Adapters are thin translators that convert between domain types and
//! transport representations. They contain no business logic.

pub mod data_service;

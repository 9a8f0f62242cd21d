//! HTTP inbound adapter: JSON API handlers and HTML page scaffolds.

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod operations;
pub mod pages;
pub mod render;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

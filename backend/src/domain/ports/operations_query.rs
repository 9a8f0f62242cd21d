//! Driving port for the operations listings (cars, clients, sellers,
//! brokers).
//!
//! Records are opaque JSON objects and pass through unchanged.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::DataServiceError;

/// Listing queries behind the ops pages and `/api/ops/*`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OperationsQuery: Send + Sync {
    async fn cars(&self) -> Result<Vec<Value>, DataServiceError>;
    async fn clients(&self) -> Result<Vec<Value>, DataServiceError>;
    async fn sellers(&self) -> Result<Vec<Value>, DataServiceError>;
    async fn brokers(&self) -> Result<Vec<Value>, DataServiceError>;
}

/// Sample records served when no data service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOperationsQuery;

#[async_trait]
impl OperationsQuery for FixtureOperationsQuery {
    async fn cars(&self) -> Result<Vec<Value>, DataServiceError> {
        Ok(vec![
            json!({ "id": "car-1", "make": "Toyota", "model": "Land Cruiser", "year": 2023, "status": "available" }),
            json!({ "id": "car-2", "make": "Nissan", "model": "Patrol", "year": 2022, "status": "leased" }),
        ])
    }

    async fn clients(&self) -> Result<Vec<Value>, DataServiceError> {
        Ok(vec![json!({
            "id": "client-1",
            "full_name": "Chloe Client",
            "status": "active"
        })])
    }

    async fn sellers(&self) -> Result<Vec<Value>, DataServiceError> {
        Ok(vec![json!({ "id": "seller-1", "name": "Dubai Motors", "status": "verified" })])
    }

    async fn brokers(&self) -> Result<Vec<Value>, DataServiceError> {
        Ok(Vec::new())
    }
}

//! Operations listings API.
//!
//! ```text
//! GET /api/ops/cars
//! GET /api/ops/clients
//! GET /api/ops/sellers
//! GET /api/ops/brokers
//! ```
//!
//! Records are returned exactly as the data service stores them.

use actix_web::{get, web};
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::DataServiceError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn listing(
    kind: &'static str,
    result: Result<Vec<Value>, DataServiceError>,
) -> ApiResult<web::Json<Vec<Value>>> {
    let records = result?;
    debug!(kind, count = records.len(), "served operations listing");
    Ok(web::Json(records))
}

/// Vehicles in the fleet.
#[utoipa::path(
    get,
    path = "/api/ops/cars",
    responses(
        (status = 200, description = "Vehicle records", body = Vec<Object>),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Data service unavailable", body = crate::domain::Error)
    ),
    tags = ["ops"],
    operation_id = "listCars"
)]
#[get("/ops/cars")]
pub async fn list_cars(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Value>>> {
    listing("cars", state.operations.cars().await)
}

/// Leasing clients.
#[utoipa::path(
    get,
    path = "/api/ops/clients",
    responses(
        (status = 200, description = "Client records", body = Vec<Object>),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Data service unavailable", body = crate::domain::Error)
    ),
    tags = ["ops"],
    operation_id = "listClients"
)]
#[get("/ops/clients")]
pub async fn list_clients(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Value>>> {
    listing("clients", state.operations.clients().await)
}

/// Vehicle sellers.
#[utoipa::path(
    get,
    path = "/api/ops/sellers",
    responses(
        (status = 200, description = "Seller records", body = Vec<Object>),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Data service unavailable", body = crate::domain::Error)
    ),
    tags = ["ops"],
    operation_id = "listSellers"
)]
#[get("/ops/sellers")]
pub async fn list_sellers(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Value>>> {
    listing("sellers", state.operations.sellers().await)
}

/// Brokers.
#[utoipa::path(
    get,
    path = "/api/ops/brokers",
    responses(
        (status = 200, description = "Broker records", body = Vec<Object>),
        (status = 500, description = "Internal server error", body = crate::domain::Error),
        (status = 503, description = "Data service unavailable", body = crate::domain::Error)
    ),
    tags = ["ops"],
    operation_id = "listBrokers"
)]
#[get("/ops/brokers")]
pub async fn list_brokers(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Value>>> {
    listing("brokers", state.operations.brokers().await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::MockOperationsQuery;
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    async fn get(ports: HttpStatePorts, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(ports)))
                .service(
                    web::scope("/api")
                        .service(list_cars)
                        .service(list_clients)
                        .service(list_sellers)
                        .service(list_brokers),
                ),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn ports_with(query: MockOperationsQuery) -> HttpStatePorts {
        HttpStatePorts {
            operations: Arc::new(query),
            ..HttpStatePorts::fixtures()
        }
    }

    #[rstest]
    #[case("/api/ops/cars")]
    #[case("/api/ops/clients")]
    #[case("/api/ops/sellers")]
    #[case("/api/ops/brokers")]
    #[actix_web::test]
    async fn fixture_listings_are_arrays(#[case] uri: &str) {
        let (status, body) = get(HttpStatePorts::fixtures(), uri).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_array(), "expected array, got {body}");
    }

    #[rstest]
    #[actix_web::test]
    async fn cars_pass_through_verbatim() {
        let mut query = MockOperationsQuery::new();
        query
            .expect_cars()
            .times(1)
            .returning(|| Ok(vec![json!({ "vin": "JT123", "extra": { "colour": "white" } })]));
        let (status, body) = get(ports_with(query), "/api/ops/cars").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{ "vin": "JT123", "extra": { "colour": "white" } }]));
    }

    #[rstest]
    #[case(DataServiceError::unavailable("connect timeout"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(DataServiceError::rejected(500_u16, "relation missing"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(DataServiceError::decode("not an array"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[actix_web::test]
    async fn failures_map_to_error_envelope(
        #[case] failure: DataServiceError,
        #[case] expected: StatusCode,
    ) {
        let mut query = MockOperationsQuery::new();
        query
            .expect_sellers()
            .times(1)
            .return_once(move || Err(failure));
        let (status, body) = get(ports_with(query), "/api/ops/sellers").await;
        assert_eq!(status, expected);
        assert!(body.get("code").is_some(), "missing error code: {body}");
    }

    #[rstest]
    #[case(DataServiceError::unavailable("connect timeout"), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(DataServiceError::rejected(404_u16, "relation missing"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[actix_web::test]
    async fn car_listing_failures_are_not_successful(
        #[case] failure: DataServiceError,
        #[case] expected: StatusCode,
    ) {
        let mut query = MockOperationsQuery::new();
        query
            .expect_cars()
            .times(1)
            .return_once(move || Err(failure));
        let (status, body) = get(ports_with(query), "/api/ops/cars").await;
        assert!(!status.is_success());
        assert_eq!(status, expected);
        assert!(body.get("code").is_some(), "missing error code: {body}");
    }
}

//! Reqwest client shared by every data-service adapter.
//!
//! Owns transport details only: base URL joining, service-key headers,
//! timeout and HTTP error mapping, and JSON decoding.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::domain::ports::DataServiceError;

/// Authenticated handle on the PostgREST (`rest/v1`) and GoTrue (`auth/v1`)
/// endpoints. Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct DataServiceClient {
    client: Client,
    base_url: Url,
    service_key: Arc<Zeroizing<String>>,
}

impl DataServiceClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        mut base_url: Url,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            service_key: Arc::new(Zeroizing::new(service_key.into())),
        })
    }

    pub(super) fn rest(&self, method: Method, table: &str) -> Result<RequestBuilder, DataServiceError> {
        self.request(method, &format!("rest/v1/{table}"))
    }

    pub(super) fn auth(&self, method: Method, path: &str) -> Result<RequestBuilder, DataServiceError> {
        self.request(method, &format!("auth/v1/{path}"))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, DataServiceError> {
        let url = self.base_url.join(path).map_err(|err| {
            DataServiceError::unavailable(format!("invalid data service path {path}: {err}"))
        })?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
            .header(ACCEPT, "application/json"))
    }

    /// Send `request` and decode a successful JSON body.
    pub(super) async fn send_json<T: DeserializeOwned>(
        request: RequestBuilder,
    ) -> Result<T, DataServiceError> {
        let body = Self::send(request).await?;
        decode(&body)
    }

    /// Send `request`, discarding any successful body.
    pub(super) async fn send_empty(request: RequestBuilder) -> Result<(), DataServiceError> {
        Self::send(request).await.map(|_| ())
    }

    async fn send(request: RequestBuilder) -> Result<Vec<u8>, DataServiceError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, DataServiceError> {
    serde_json::from_slice(body)
        .map_err(|err| DataServiceError::decode(format!("invalid JSON payload: {err}")))
}

fn map_transport_error(error: reqwest::Error) -> DataServiceError {
    DataServiceError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DataServiceError {
    let detail = error_detail(body);
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        detail
    };

    match status {
        StatusCode::REQUEST_TIMEOUT
        | StatusCode::TOO_MANY_REQUESTS
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => DataServiceError::unavailable(message),
        _ => DataServiceError::rejected(status.as_u16(), message),
    }
}

/// Human-readable error text from a GoTrue or PostgREST error body.
fn error_detail(body: &[u8]) -> String {
    const MESSAGE_KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            MESSAGE_KEYS
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_owned))
        })
        .map(|message| body_preview(message.as_bytes()))
        .unwrap_or_else(|| body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::throttled(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::down(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[case::conflict(StatusCode::CONFLICT, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn statuses_split_between_unavailable_and_rejected(
        #[case] status: StatusCode,
        #[case] unavailable: bool,
    ) {
        let error = map_status_error(status, b"");
        assert_eq!(
            matches!(error, DataServiceError::Unavailable { .. }),
            unavailable,
            "unexpected mapping for {status}: {error:?}"
        );
    }

    #[rstest]
    fn rejected_errors_carry_the_service_message() {
        let error = map_status_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"code":422,"msg":"A user with this email address has already been registered"}"#,
        );
        assert_eq!(
            error,
            DataServiceError::rejected(
                422_u16,
                "A user with this email address has already been registered"
            )
        );
    }

    #[rstest]
    fn empty_bodies_fall_back_to_the_status() {
        let error = map_status_error(StatusCode::BAD_REQUEST, b"  ");
        assert_eq!(error, DataServiceError::rejected(400_u16, "status 400"));
    }

    #[rstest]
    fn previews_are_compacted_and_capped() {
        let body = format!("line one\n\n  {}", "x".repeat(200));
        let preview = body_preview(body.as_bytes());
        assert!(preview.starts_with("line one x"));
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 163);
    }

    #[rstest]
    fn base_url_gains_a_trailing_slash() {
        let base = Url::parse("https://data.example/project").expect("url");
        let client = DataServiceClient::new(base, "key", Duration::from_secs(1)).expect("client");
        assert_eq!(client.base_url.as_str(), "https://data.example/project/");
    }

    #[rstest]
    fn decode_failures_are_decode_errors() {
        let error = decode::<Vec<Value>>(b"{not json").expect_err("invalid body");
        assert!(matches!(error, DataServiceError::Decode { .. }));
    }
}

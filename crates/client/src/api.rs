//! HTTP client for the VeriFarm registry API.
//!
//! [`ProductApi`] is the seam the tracker drives; [`ApiClient`] implements it
//! over HTTP with `ureq`. Requests are blocking, one per call, with the
//! transport's default timeouts and no retries.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use ureq::http::Response;
use ureq::Body;
use verifarm_storage::{NewProduct, ProductRecord};

use crate::error::ClientError;

/// Default API base used when neither `--api-url` nor `VERIFARM_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// `error` message the service uses for an unknown product id. Other 404s
/// (an unmatched route behind a wrong base URL) are not lookups that missed.
const PRODUCT_NOT_FOUND: &str = "Product not found";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Operations the registry service offers to clients.
pub trait ProductApi {
    fn health(&self) -> Result<HealthStatus, ClientError>;

    fn list_products(&self) -> Result<Vec<ProductRecord>, ClientError>;

    /// `Ok(None)` when the service reports the product as not found.
    fn get_product(&self, id: &str) -> Result<Option<ProductRecord>, ClientError>;

    fn create_product(&self, draft: &NewProduct) -> Result<ProductRecord, ClientError>;
}

// ─── ApiClient ────────────────────────────────────────────────────────────────

/// HTTP client for the registry API.
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// Uses `api_url` if provided, otherwise falls back to
    /// [`DEFAULT_API_URL`]. A trailing slash is ignored.
    pub fn new(api_url: Option<&str>) -> Self {
        let base_url = api_url
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        // Non-2xx responses are inspected here rather than surfaced as errors,
        // so the server's `error` message can be read.
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();

        Self {
            base_url,
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn product_url(&self, id: &str) -> String {
        self.url(&format!("/products/{}", urlencoded(id)))
    }

    fn connection_error(&self, url: &str, err: ureq::Error) -> ClientError {
        ClientError::Connection {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl ProductApi for ApiClient {
    /// GET `/health`
    fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.url("/health");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| self.connection_error(&url, e))?;
        read_success(response)
    }

    /// GET `/products`
    fn list_products(&self) -> Result<Vec<ProductRecord>, ClientError> {
        let url = self.url("/products");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| self.connection_error(&url, e))?;
        let products: Vec<ProductRecord> = read_success(response)?;
        tracing::debug!(count = products.len(), "loaded products from registry");
        Ok(products)
    }

    /// GET `/products/{id}`
    fn get_product(&self, id: &str) -> Result<Option<ProductRecord>, ClientError> {
        let url = self.product_url(id);
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| self.connection_error(&url, e))?;
        match read_success(response) {
            Ok(product) => Ok(Some(product)),
            Err(e) if is_product_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// POST `/products`
    fn create_product(&self, draft: &NewProduct) -> Result<ProductRecord, ClientError> {
        let url = self.url("/products");
        let response = self
            .agent
            .post(&url)
            .send_json(draft)
            .map_err(|e| self.connection_error(&url, e))?;
        read_success(response)
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Decode a 2xx body as `T`, or turn any other status into `Rejected`.
fn read_success<T: DeserializeOwned>(response: Response<Body>) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return response
            .into_body()
            .read_json::<T>()
            .map_err(|e| ClientError::Decode(e.to_string()));
    }

    let message = response
        .into_body()
        .read_json::<ErrorBody>()
        .map(|body| body.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

fn is_product_not_found(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::Rejected { status: 404, message } if message == PRODUCT_NOT_FOUND
    )
}

/// Percent-encode a path segment (spaces → %20, `/` → %2F, etc.).
///
/// Only unreserved characters pass through unchanged.
pub fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(ch),
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).as_bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_product_lookup_404_means_absent() {
        let missing = ClientError::Rejected {
            status: 404,
            message: "Product not found".to_string(),
        };
        let wrong_route = ClientError::Rejected {
            status: 404,
            message: "not found".to_string(),
        };
        let server_error = ClientError::Rejected {
            status: 500,
            message: "Product not found".to_string(),
        };
        assert!(is_product_not_found(&missing));
        assert!(!is_product_not_found(&wrong_route));
        assert!(!is_product_not_found(&server_error));
    }

    #[test]
    fn base_url_defaults_and_trims_trailing_slash() {
        assert_eq!(ApiClient::new(None).base_url(), DEFAULT_API_URL);
        assert_eq!(
            ApiClient::new(Some("http://example.test/api/")).base_url(),
            "http://example.test/api"
        );
    }

    #[test]
    fn product_url_encodes_identifier() {
        let client = ApiClient::new(Some("http://example.test/api"));
        assert_eq!(
            client.product_url("AGT001"),
            "http://example.test/api/products/AGT001"
        );
        assert_eq!(
            client.product_url("a b/c"),
            "http://example.test/api/products/a%20b%2Fc"
        );
    }

    #[test]
    fn urlencoded_handles_multibyte() {
        assert_eq!(urlencoded("°"), "%C2%B0");
        assert_eq!(urlencoded("AGT-1_x.~"), "AGT-1_x.~");
    }

    #[test]
    fn unreachable_server_is_a_connection_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let client = ApiClient::new(Some("http://127.0.0.1:9/api"));
        let err = client.list_products().unwrap_err();
        assert!(err.is_connection(), "expected connection error, got {err}");
    }
}

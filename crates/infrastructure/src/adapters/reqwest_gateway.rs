//! Product service client implementation using reqwest.
//!
//! This adapter implements the `ProductGateway` port using the reqwest
//! library. Every call carries a fresh `x-request-id` that is also recorded
//! on the tracing span of the call.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use catalog_application::{ApplicationError, ApplicationResult, ProductGateway};
use catalog_domain::{CanonicalRecord, ListParams, Product, ProductDraft, ProductId, ProductPage};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ClientConfig;

/// Header carrying the per-call correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Serialize)]
struct BulkUploadBody<'a> {
    products: &'a [CanonicalRecord],
}

#[derive(Deserialize)]
struct BulkUploadResponse {
    count: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Product service client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestProductGateway {
    client: Client,
    base_url: Url,
    timeout_ms: u64,
}

impl ReqwestProductGateway {
    /// Creates a client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot
    /// be created.
    pub fn new(config: &ClientConfig) -> ApplicationResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApplicationError::Network(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(client, &config.base_url, config.timeout_ms)
    }

    /// Creates a client around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn with_client(client: Client, base_url: &str, timeout_ms: u64) -> ApplicationResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApplicationError::Network(format!("invalid base URL {base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url,
            timeout_ms,
        })
    }

    /// Returns the base URL all endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApplicationResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApplicationError::Network(format!("invalid endpoint {path}: {e}")))
    }

    /// Builds the list URL; absent parameters are left out.
    fn products_url(&self, params: &ListParams) -> ApplicationResult<Url> {
        let mut url = self.endpoint("products")?;
        let query = params.to_query_string()?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    /// Sends a request and returns the raw body of a successful response.
    async fn send(&self, builder: RequestBuilder, operation: &'static str) -> ApplicationResult<Vec<u8>> {
        let request_id = Uuid::now_v7();
        let span = tracing::info_span!("product_service", operation, %request_id);
        async move {
            let start = Instant::now();
            let response = builder
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .send()
                .await
                .map_err(|e| Self::map_error(&e, self.timeout_ms))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, self.timeout_ms))?;
            tracing::debug!(
                status = status.as_u16(),
                elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "response received"
            );
            if status.is_success() {
                Ok(body.to_vec())
            } else {
                let detail = Self::parse_detail(&body);
                tracing::warn!(status = status.as_u16(), detail = detail.as_deref(), "request rejected");
                Err(ApplicationError::Rejected {
                    status: status.as_u16(),
                    detail,
                })
            }
        }
        .instrument(span)
        .await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &'static str,
    ) -> ApplicationResult<T> {
        let body = self.send(builder, operation).await?;
        serde_json::from_slice(&body)
            .map_err(|e| ApplicationError::Decode(format!("{operation}: {e}")))
    }

    /// Extracts the `detail` string of an error body, if there is one.
    fn parse_detail(body: &[u8]) -> Option<String> {
        match serde_json::from_slice::<ErrorBody>(body).ok()?.detail? {
            serde_json::Value::String(detail) => Some(detail),
            _ => None,
        }
    }

    /// Maps reqwest errors to `ApplicationError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> ApplicationError {
        if error.is_timeout() {
            return ApplicationError::Timeout { timeout_ms };
        }
        if error.is_decode() {
            return ApplicationError::Decode(error.to_string());
        }
        if error.is_connect() {
            let host = error
                .url()
                .and_then(|u| u.host_str().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".to_string());
            return ApplicationError::Network(format!("could not connect to {host}: {error}"));
        }
        ApplicationError::Network(error.to_string())
    }
}

#[async_trait]
impl ProductGateway for ReqwestProductGateway {
    async fn list_products(&self, params: &ListParams) -> ApplicationResult<ProductPage> {
        let url = self.products_url(params)?;
        self.send_json(self.client.get(url), "list_products").await
    }

    async fn list_categories(&self) -> ApplicationResult<Vec<String>> {
        let url = self.endpoint("categories")?;
        self.send_json(self.client.get(url), "list_categories").await
    }

    async fn get_product(&self, id: ProductId) -> ApplicationResult<Product> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.send_json(self.client.get(url), "get_product").await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ApplicationResult<Product> {
        let url = self.endpoint("products")?;
        self.send_json(self.client.post(url).json(draft), "create_product")
            .await
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> ApplicationResult<Product> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.send_json(self.client.put(url).json(draft), "update_product")
            .await
    }

    async fn delete_product(&self, id: ProductId) -> ApplicationResult<()> {
        let url = self.endpoint(&format!("products/{id}"))?;
        self.send(self.client.delete(url), "delete_product").await?;
        Ok(())
    }

    async fn bulk_upload(&self, records: &[CanonicalRecord]) -> ApplicationResult<u64> {
        let url = self.endpoint("products/bulk-upload")?;
        let body = BulkUploadBody { products: records };
        let response: BulkUploadResponse = self
            .send_json(self.client.post(url).json(&body), "bulk_upload")
            .await?;
        Ok(response.count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use catalog_domain::SortField;
    use pretty_assertions::assert_eq;

    fn gateway(base_url: &str) -> ReqwestProductGateway {
        ReqwestProductGateway::with_client(Client::new(), base_url, 10_000).unwrap()
    }

    #[test]
    fn test_base_url_keeps_its_path() {
        let gateway = gateway("http://localhost:8000/api");
        assert_eq!(
            gateway.endpoint("products/bulk-upload").unwrap().as_str(),
            "http://localhost:8000/api/products/bulk-upload"
        );
        let gateway = self::gateway("http://localhost:8000/api/");
        assert_eq!(
            gateway.endpoint("categories").unwrap().as_str(),
            "http://localhost:8000/api/categories"
        );
    }

    #[test]
    fn test_products_url_omits_empty_params() {
        let gateway = gateway("http://localhost:8000/api");
        assert_eq!(
            gateway.products_url(&ListParams::default()).unwrap().as_str(),
            "http://localhost:8000/api/products"
        );
        let params = ListParams {
            page: Some(3),
            category: Some("Home & Garden".to_string()),
            sort_by: Some(SortField::Name),
            ..ListParams::default()
        };
        assert_eq!(
            gateway.products_url(&params).unwrap().as_str(),
            "http://localhost:8000/api/products?page=3&category=Home+%26+Garden&sort_by=name"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ReqwestProductGateway::with_client(Client::new(), "not a url", 10);
        assert!(matches!(result, Err(ApplicationError::Network(_))));
    }

    #[test]
    fn test_parse_detail() {
        assert_eq!(
            ReqwestProductGateway::parse_detail(br#"{"detail": "Product not found"}"#),
            Some("Product not found".to_string())
        );
        assert_eq!(
            ReqwestProductGateway::parse_detail(br#"{"detail": [{"loc": ["body"]}]}"#),
            None
        );
        assert_eq!(ReqwestProductGateway::parse_detail(b"Internal Server Error"), None);
    }
}

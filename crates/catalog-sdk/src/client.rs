//! Catalog client implementation.

use crate::error::SdkError;
use crate::service::CatalogService;
use crate::wire::{ErrorBody, SavedRecommendation};
use catalog_domain::{LinkedRequest, Product, ProductId};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the REST catalog service
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    /// Create a client for the service rooted at `base_url`
    /// (e.g. `http://localhost:8080/api`)
    pub fn new(base_url: &str) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::InvalidEndpoint(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_http_client(base_url, http))
    }

    /// Create a client around an existing reqwest client
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into [`SdkError::Rejected`], keeping the
    /// service's `error` message when the body carries one
    async fn reject(response: reqwest::Response) -> SdkError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error);
        SdkError::Rejected { status, message }
    }
}

impl CatalogService for CatalogClient {
    async fn list_products(&self) -> Result<Vec<Product>, SdkError> {
        let url = self.url("/products");
        tracing::debug!(%url, "GET products");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let products: Vec<Product> = response.json().await?;
        tracing::debug!(count = products.len(), "Catalog fetched");
        Ok(products)
    }

    async fn create_product(&self, body: &Value) -> Result<(), SdkError> {
        let url = self.url("/products");
        tracing::debug!(%url, "POST product");

        let response = self.http.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        // The created record is not used; callers refetch the catalog
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), SdkError> {
        let url = self.url(&format!("/products/{}", id));
        tracing::debug!(%url, "DELETE product");

        let response = self.http.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        Ok(())
    }

    async fn save_recommendation(
        &self,
        request: &LinkedRequest,
    ) -> Result<SavedRecommendation, SdkError> {
        let url = self.url("/recommended-products");
        tracing::debug!(%url, "POST recommended product");

        let response = self.http.post(&url).json(request).send().await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let saved: SavedRecommendation = response.json().await?;
        Ok(saved)
    }
}

//! Trait boundary between the controller and the catalog service.

use crate::error::SdkError;
use crate::wire::SavedRecommendation;
use catalog_domain::{LinkedRequest, Product, ProductId};
use serde_json::Value;
use std::future::Future;

/// Operations the recommendation controller needs from the catalog service
///
/// Implemented by [`CatalogClient`](crate::CatalogClient) over HTTP; tests
/// provide in-memory implementations.
pub trait CatalogService: Send + Sync + 'static {
    /// `GET /products`
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, SdkError>> + Send;

    /// `POST /products` with the given body
    fn create_product(&self, body: &Value) -> impl Future<Output = Result<(), SdkError>> + Send;

    /// `DELETE /products/{id}`
    fn delete_product(&self, id: ProductId) -> impl Future<Output = Result<(), SdkError>> + Send;

    /// `POST /recommended-products`
    fn save_recommendation(
        &self,
        request: &LinkedRequest,
    ) -> impl Future<Output = Result<SavedRecommendation, SdkError>> + Send;
}

//! Response bodies exchanged with the catalog service.

use catalog_domain::ProductId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error body some endpoints return alongside a non-2xx status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure reason
    #[serde(default)]
    pub error: Option<String>,
}

/// Response to `POST /recommended-products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRecommendation {
    /// The product as persisted; the service may have assigned a new id
    #[serde(default)]
    pub recommended_product: Option<Value>,
}

impl SavedRecommendation {
    /// Identifier the service reports for the saved product
    pub fn product_id(&self) -> Option<ProductId> {
        self.recommended_product
            .as_ref()
            .and_then(|p| p.get("id"))
            .and_then(ProductId::from_json)
    }
}

//! Product reference module - resolves the two recommendation payload shapes
//!
//! Recommendations reach the client either as a flat product record or as a
//! `{sourceProductId, recommendedProduct}` wrapper. The shape is decided once,
//! here, and everything downstream works with [`ProductRef`].

use crate::product::{json_price, json_text, ProductId, ProductView};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Untyped JSON object
pub type JsonMap = Map<String, Value>;

/// Wire key of the originating product in the linked shape
pub const SOURCE_PRODUCT_ID: &str = "sourceProductId";

/// Wire key of the nested candidate product in the linked shape
pub const RECOMMENDED_PRODUCT: &str = "recommendedProduct";

/// Properties shown for every recommendation row
pub const DISPLAY_PROPERTIES: [&str; 5] = ["id", "name", "description", "category", "price"];

/// Rejection of a payload that is not a JSON object at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeError {
    found: &'static str,
}

impl ShapeError {
    /// JSON type that was received instead of an object
    pub fn found(&self) -> &'static str {
        self.found
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recommendation payload must be a JSON object, got {}", self.found)
    }
}

impl std::error::Error for ShapeError {}

/// Body of a save request for a linked recommendation
///
/// Both fields are forwarded exactly as they arrived in the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedRequest {
    /// Product that generated the recommendation
    pub source_product_id: Value,
    /// Candidate product to persist
    pub recommended_product: Value,
}

/// A normalized recommendation payload
///
/// Both variants keep the full top-level object: property lookup always
/// consults the nested `recommendedProduct` first, whatever the shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRef {
    /// Plain product record (not savable)
    Flat(JsonMap),

    /// Wrapper carrying a truthy `sourceProductId` and an object
    /// `recommendedProduct`
    Linked {
        /// Raw `sourceProductId` as received
        source_product_id: Value,
        /// Top-level payload object
        fields: JsonMap,
    },
}

impl ProductRef {
    /// Normalize a raw payload
    ///
    /// # Errors
    /// Returns [`ShapeError`] when the payload is not a JSON object.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_domain::ProductRef;
    /// use serde_json::json;
    ///
    /// let linked = ProductRef::from_value(json!({
    ///     "sourceProductId": 1,
    ///     "recommendedProduct": {"id": 7, "name": "Widget"}
    /// })).unwrap();
    /// assert!(linked.is_linked());
    /// assert_eq!(linked.view().name.as_deref(), Some("Widget"));
    ///
    /// let flat = ProductRef::from_value(json!({"id": 7, "name": "Widget"})).unwrap();
    /// assert!(!flat.is_linked());
    /// ```
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        let fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(ShapeError {
                    found: json_type(&other),
                })
            }
        };

        let source = fields.get(SOURCE_PRODUCT_ID).filter(|v| is_truthy(v));
        let nested_is_object = fields
            .get(RECOMMENDED_PRODUCT)
            .map(Value::is_object)
            .unwrap_or(false);

        match source {
            Some(source) if nested_is_object => Ok(ProductRef::Linked {
                source_product_id: source.clone(),
                fields,
            }),
            _ => Ok(ProductRef::Flat(fields)),
        }
    }

    /// Whether this payload can be sent to the save endpoint
    pub fn is_linked(&self) -> bool {
        matches!(self, ProductRef::Linked { .. })
    }

    /// Top-level payload object
    pub fn fields(&self) -> &JsonMap {
        match self {
            ProductRef::Flat(fields) => fields,
            ProductRef::Linked { fields, .. } => fields,
        }
    }

    /// Look up a display property
    ///
    /// The nested `recommendedProduct` wins whenever it defines the key,
    /// even as `null`; otherwise the top-level field of the same name is used.
    pub fn property(&self, name: &str) -> Option<&Value> {
        let fields = self.fields();
        fields
            .get(RECOMMENDED_PRODUCT)
            .and_then(Value::as_object)
            .and_then(|nested| nested.get(name))
            .or_else(|| fields.get(name))
    }

    /// Canonical product id of the candidate
    pub fn product_id(&self) -> Option<ProductId> {
        self.property("id").and_then(ProductId::from_json)
    }

    /// Id of the product that produced the recommendation, when known
    pub fn source_product_id(&self) -> Option<ProductId> {
        match self {
            ProductRef::Linked {
                source_product_id, ..
            } => ProductId::from_json(source_product_id),
            ProductRef::Flat(fields) => fields.get(SOURCE_PRODUCT_ID).and_then(ProductId::from_json),
        }
    }

    /// Canonical flat view used for display
    pub fn view(&self) -> ProductView {
        ProductView {
            id: self.product_id(),
            name: self.property("name").and_then(json_text),
            description: self.property("description").and_then(json_text),
            category: self.property("category").and_then(json_text),
            price: self.property("price").and_then(json_price),
        }
    }

    /// Save request body, or `None` for flat payloads
    pub fn linked_request(&self) -> Option<LinkedRequest> {
        match self {
            ProductRef::Linked {
                source_product_id,
                fields,
            } => Some(LinkedRequest {
                source_product_id: source_product_id.clone(),
                recommended_product: fields.get(RECOMMENDED_PRODUCT).cloned().unwrap_or(Value::Null),
            }),
            ProductRef::Flat(_) => None,
        }
    }
}

/// JavaScript-style truthiness; the shape decision has always been made this way
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

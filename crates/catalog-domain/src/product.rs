//! Product module - catalog records as the service returns them

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier assigned to a product by the catalog service
///
/// The service owns the identifier space; the client never invents product
/// ids, it only reads them back from responses and payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Wrap a raw identifier
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw identifier
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Read a product id out of an untyped JSON value
    ///
    /// Accepts integers, integral floats and integer strings, which covers
    /// every way the id has been observed on the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_domain::ProductId;
    /// use serde_json::json;
    ///
    /// assert_eq!(ProductId::from_json(&json!(7)), Some(ProductId::new(7)));
    /// assert_eq!(ProductId::from_json(&json!("7")), Some(ProductId::new(7)));
    /// assert_eq!(ProductId::from_json(&json!(null)), None);
    /// ```
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| is_integral_i64(*f)).map(|f| f as i64))
                .map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid product id '{}': {}", s, e))
    }
}

/// A product as stored by the catalog service
///
/// Only `id` is required. Any field the client does not model is kept in
/// `extra` so that a product can be passed back to the service untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Service-assigned identifier
    #[serde(deserialize_with = "lenient_id")]
    pub id: ProductId,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Unit price; numeric strings are accepted, anything else reads as absent
    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,

    /// Fields not modelled by the client
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical flat view of a product-like record
///
/// Every field is optional because recommendation payloads are not
/// validated beyond their outer shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductView {
    /// Product id, if the payload carried a usable one
    pub id: Option<ProductId>,
    /// Display name
    pub name: Option<String>,
    /// Free-text description
    pub description: Option<String>,
    /// Category label
    pub category: Option<String>,
    /// Unit price
    pub price: Option<f64>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price,
        }
    }
}

/// Whole floats inside the `i64` range; `i64::MAX as f64` rounds up, hence `<`
fn is_integral_i64(f: f64) -> bool {
    f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ProductId, D::Error> {
    let value = Value::deserialize(deserializer)?;
    ProductId::from_json(&value)
        .ok_or_else(|| de::Error::custom(format!("invalid product id: {}", value)))
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(json_price(&value))
}

/// Render an untyped JSON scalar as display text
///
/// Strings are returned without quotes; `null` yields `None`.
pub(crate) fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read a price out of an untyped JSON value (number or numeric string)
pub(crate) fn json_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_id_from_json() {
        assert_eq!(ProductId::from_json(&json!(3)), Some(ProductId::new(3)));
        assert_eq!(ProductId::from_json(&json!(3.0)), Some(ProductId::new(3)));
        assert_eq!(ProductId::from_json(&json!(" 12 ")), Some(ProductId::new(12)));
        assert_eq!(ProductId::from_json(&json!(3.5)), None);
        assert_eq!(ProductId::from_json(&json!("abc")), None);
        assert_eq!(ProductId::from_json(&json!({"id": 3})), None);
    }

    #[test]
    fn test_product_id_out_of_range_float() {
        assert_eq!(ProductId::from_json(&json!(1e20)), None);
        assert_eq!(ProductId::from_json(&json!(-1e20)), None);
        assert_eq!(ProductId::from_json(&json!(9.3e18)), None);
        assert_eq!(ProductId::from_json(&json!(-4.0)), Some(ProductId::new(-4)));
    }

    #[test]
    fn test_catalog_accepts_mixed_id_and_price_types() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {"id": 1, "price": 12.5},
            {"id": "2", "price": "9.99"},
            {"id": 3.0, "price": null},
            {"id": 4, "price": "n/a"}
        ]))
        .unwrap();

        let ids: Vec<i64> = products.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(products[1].price, Some(9.99));
        assert!(products[2].price.is_none());
        assert!(products[3].price.is_none());
        assert!(products[3].extra.get("price").is_none());
    }

    #[test]
    fn test_catalog_rejects_unusable_id() {
        let result = serde_json::from_value::<Product>(json!({"id": "abc"}));
        assert!(result.unwrap_err().to_string().contains("invalid product id"));
        assert!(serde_json::from_value::<Product>(json!({"name": "No id"})).is_err());
    }

    #[test]
    fn test_product_id_parse() {
        let id: ProductId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
        assert!("forty-two".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_product_keeps_unknown_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Lamp",
            "price": 12.5,
            "stock": 4
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name.as_deref(), Some("Lamp"));
        assert!(product.description.is_none());
        assert_eq!(product.extra.get("stock"), Some(&json!(4)));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["stock"], json!(4));
        assert!(back.get("description").is_none());
    }

    #[test]
    fn test_view_from_product() {
        let product: Product =
            serde_json::from_value(json!({"id": 9, "category": "tools"})).unwrap();
        let view = ProductView::from(&product);
        assert_eq!(view.id, Some(ProductId::new(9)));
        assert_eq!(view.category.as_deref(), Some("tools"));
    }

    #[test]
    fn test_json_helpers() {
        assert_eq!(json_text(&json!("a")), Some("a".to_string()));
        assert_eq!(json_text(&json!(5)), Some("5".to_string()));
        assert_eq!(json_text(&json!(null)), None);
        assert_eq!(json_price(&json!("9.99")), Some(9.99));
        assert_eq!(json_price(&json!(true)), None);
    }
}

//! Recommendation entry module - one queued candidate and its identity

use crate::product::{ProductId, ProductView};
use crate::product_ref::ProductRef;
use serde::{Serialize, Serializer};
use std::fmt;

/// Synthetic identifier stamped on a recommendation when it is queued
///
/// Backed by a UUIDv7: the top 48 bits are the millisecond insertion time
/// and the remainder is counter and random bits, so two entries queued in
/// the same millisecond still get distinct ids. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u128);

impl EntryId {
    /// Stamp a new entry id
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_domain::EntryId;
    ///
    /// let a = EntryId::new();
    /// let b = EntryId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EntryId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an EntryId from its string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid entry id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Insertion time in milliseconds since the Unix epoch
    pub fn timestamp(&self) -> u64 {
        (self.0 >> 80) as u64
    }

    /// First eight hex digits, for compact display
    pub fn short(&self) -> String {
        self.to_string()[..8].to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for EntryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// How a caller refers to a queued recommendation
///
/// `Entry` is the normal key. `Product` matches on the canonical product id
/// and is the fallback for callers that never saw the stamp; it matches
/// every entry for that product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EntryKey {
    /// Match by insertion stamp
    Entry(EntryId),
    /// Match by canonical product id
    Product(ProductId),
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Entry(id) => write!(f, "entry:{}", id),
            EntryKey::Product(id) => write!(f, "product:{}", id),
        }
    }
}

impl From<EntryId> for EntryKey {
    fn from(id: EntryId) -> Self {
        EntryKey::Entry(id)
    }
}

/// Lifecycle status stored on a queued entry
///
/// Highlighting is tracked on the catalog row, not here, and removal means
/// the entry is gone from the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Waiting for the user to save it
    Pending,
    /// Save request in flight
    Saving,
    /// Saved; shown fading until removal
    Fading,
}

impl EntryStatus {
    /// Status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Pending => "pending",
            EntryStatus::Saving => "saving",
            EntryStatus::Fading => "fading",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recommendation candidate held in the client-side queue
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationEntry {
    /// Insertion stamp; immutable
    pub id: EntryId,

    /// Normalized payload
    pub product: ProductRef,

    /// Canonical view, computed once on insertion
    pub view: ProductView,

    /// Current lifecycle status
    pub status: EntryStatus,
}

impl RecommendationEntry {
    /// Stamp a normalized payload as a new pending entry
    pub fn new(product: ProductRef) -> Self {
        let view = product.view();
        Self {
            id: EntryId::new(),
            product,
            view,
            status: EntryStatus::Pending,
        }
    }

    /// Primary key of this entry
    pub fn key(&self) -> EntryKey {
        EntryKey::Entry(self.id)
    }

    /// Whether `key` refers to this entry
    pub fn matches(&self, key: &EntryKey) -> bool {
        match key {
            EntryKey::Entry(id) => self.id == *id,
            EntryKey::Product(pid) => self.view.id == Some(*pid),
        }
    }

    /// Product that generated the recommendation, when known
    pub fn source_product_id(&self) -> Option<ProductId> {
        self.product.source_product_id()
    }

    /// Insertion time in milliseconds since the Unix epoch
    pub fn created_at(&self) -> u64 {
        self.id.timestamp()
    }
}

//! Catalog Domain Layer
//!
//! Value types shared by the catalog client crates. Nothing here performs
//! I/O or depends on an async runtime.
//!
//! ## Key Concepts
//!
//! - **Product**: a catalog record owned by the remote service
//! - **ProductRef**: a recommendation payload, resolved once into either a
//!   flat record or a linked `{sourceProductId, recommendedProduct}` wrapper
//! - **RecommendationEntry**: a queued candidate, stamped with an
//!   [`EntryId`] on insertion
//! - **EntryStatus**: pending → saving → fading (removal purges the entry)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod product;
pub mod product_ref;

// Re-exports for convenience
pub use entry::{EntryId, EntryKey, EntryStatus, RecommendationEntry};
pub use product::{Product, ProductId, ProductView};
pub use product_ref::{JsonMap, LinkedRequest, ProductRef, ShapeError};

//! Catalog Rust SDK
//!
//! Async client for the REST catalog service, plus the [`CatalogService`]
//! trait the recommendation controller is written against.
//!
//! # Example
//!
//! ```no_run
//! use catalog_sdk::{CatalogClient, CatalogService};
//!
//! # async fn demo() -> Result<(), catalog_sdk::SdkError> {
//! let client = CatalogClient::new("http://localhost:8080/api");
//! let products = client.list_products().await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod service;
mod wire;

pub use client::CatalogClient;
pub use error::SdkError;
pub use service::CatalogService;
pub use wire::{ErrorBody, SavedRecommendation};

//! Catalog Curator
//!
//! Client-side recommendation queue and the controller that saves queued
//! recommendations into the catalog.
//!
//! # Overview
//!
//! The curator is responsible for:
//! - **Queueing**: accepting recommendation payloads in either the flat or
//!   the `{sourceProductId, recommendedProduct}` shape
//! - **Saving**: one save in flight at a time, with failures surfaced as
//!   notices and the entry left ready to retry
//! - **Post-save effects**: highlighting the saved catalog row and fading
//!   the entry out of the queue on timers
//! - **Catalog actions**: refresh, create and delete, tracked on the same
//!   snapshot renderers read
//!
//! # Entry Lifecycle
//!
//! | Phase | Held in | Leaves when |
//! |-------|---------|-------------|
//! | **pending** | entry status | save admitted |
//! | **saving** | entry status + saving marker | service answers |
//! | **highlighting** | `highlighted_product_id` | `highlight_ms` elapses (3000) |
//! | **fading** | entry status | `fade_ms` elapses (1000) |
//! | **removed** | absence from the queue | - |
//!
//! # Usage
//!
//! ```no_run
//! use catalog_curator::{Controller, CuratorConfig};
//! use catalog_domain::EntryKey;
//! use catalog_sdk::CatalogClient;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new("http://localhost:8080/api");
//!     let controller = Controller::new(client, CuratorConfig::default());
//!
//!     let mut updates = controller.subscribe();
//!     tokio::spawn(async move {
//!         while updates.changed().await.is_ok() {
//!             let snapshot = updates.borrow().clone();
//!             if let Some(notice) = snapshot.notice {
//!                 eprintln!("{}", notice);
//!             }
//!         }
//!     });
//!
//!     let id = controller.add(json!({
//!         "sourceProductId": 1,
//!         "recommendedProduct": {"id": 7, "name": "Widget"}
//!     }))?;
//!     controller.save(EntryKey::Entry(id)).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [curator]
//! highlight_ms = 3000
//! fade_ms = 1000
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod notice;
mod orchestrator;
mod queue;
mod timers;

pub use config::CuratorConfig;
pub use controller::{ControllerSnapshot, Controller, EntrySnapshot, RowFlags, SaveOutcome};
pub use error::{failure_message, CuratorError};
pub use notice::Notice;
pub use orchestrator::{save_failure_message, SaveOrchestrator, SaveSuccess, SaveTicket};
pub use queue::RecommendationQueue;
pub use timers::{TimerKey, TimerRegistry};

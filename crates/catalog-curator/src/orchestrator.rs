//! Save orchestration - the per-entry save state machine
//!
//! ```text
//! pending ──begin──▶ saving ──succeed──▶ fading ──(fade timer)──▶ removed
//!    ▲                  │
//!    └──────fail────────┘
//! ```
//!
//! The orchestrator owns the single saving marker. It performs no I/O and
//! schedules nothing itself; the controller runs the request between
//! [`SaveOrchestrator::begin`] and [`SaveOrchestrator::succeed`] /
//! [`SaveOrchestrator::fail`] and arms the timers the outcome asks for.

use crate::error::{failure_message, CuratorError};
use crate::queue::RecommendationQueue;
use catalog_domain::{EntryId, EntryKey, EntryStatus, LinkedRequest, ProductId};
use catalog_sdk::{SavedRecommendation, SdkError};

/// Everything needed to finish a save that [`SaveOrchestrator::begin`] admitted
#[derive(Debug, Clone)]
pub struct SaveTicket {
    /// Entry being saved
    pub entry_id: EntryId,
    /// Canonical product id of the entry, used when the response has none
    pub product_id: Option<ProductId>,
    /// Request body to send
    pub request: LinkedRequest,
}

/// What the controller must do after a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSuccess {
    /// Entry that was saved
    pub entry_id: EntryId,
    /// Catalog row to highlight
    pub highlight: Option<ProductId>,
    /// Whether the entry is still queued and now fading; false when the
    /// queue was cleared while the request was in flight
    pub fading: bool,
}

/// Owner of the single "currently saving" marker
#[derive(Debug, Default, Clone)]
pub struct SaveOrchestrator {
    saving: Option<EntryKey>,
}

impl SaveOrchestrator {
    /// Create an idle orchestrator
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the entry whose save is in flight
    pub fn saving(&self) -> Option<EntryKey> {
        self.saving
    }

    /// Admit a save request: `pending → saving`
    ///
    /// # Errors
    /// - [`CuratorError::Busy`] while another save is in flight
    /// - [`CuratorError::EntryNotFound`] if `key` matches nothing
    /// - [`CuratorError::NotSavable`] if the entry is not pending
    /// - [`CuratorError::InvalidShape`] for flat payloads
    ///
    /// On error nothing changes.
    pub fn begin(
        &mut self,
        queue: &mut RecommendationQueue,
        key: &EntryKey,
    ) -> Result<SaveTicket, CuratorError> {
        if let Some(current) = self.saving {
            return Err(CuratorError::Busy(current));
        }

        let entry = queue
            .find_mut(key)
            .ok_or(CuratorError::EntryNotFound(*key))?;

        if entry.status != EntryStatus::Pending {
            return Err(CuratorError::NotSavable {
                key: *key,
                status: entry.status,
            });
        }

        let request = entry
            .product
            .linked_request()
            .ok_or(CuratorError::InvalidShape)?;

        entry.status = EntryStatus::Saving;
        self.saving = Some(entry.key());

        tracing::debug!(entry = %entry.id, "pending -> saving");

        Ok(SaveTicket {
            entry_id: entry.id,
            product_id: entry.view.id,
            request,
        })
    }

    /// Settle a save that the service accepted: `saving → fading`
    ///
    /// Releases the marker. The product id reported by the service wins
    /// over the one held locally.
    pub fn succeed(
        &mut self,
        queue: &mut RecommendationQueue,
        ticket: &SaveTicket,
        saved: &SavedRecommendation,
    ) -> SaveSuccess {
        self.release(ticket);

        let fading = match queue.get_mut(ticket.entry_id) {
            Some(entry) => {
                entry.status = EntryStatus::Fading;
                tracing::debug!(entry = %entry.id, "saving -> fading");
                true
            }
            None => {
                tracing::debug!(entry = %ticket.entry_id, "Saved entry no longer queued");
                false
            }
        };

        SaveSuccess {
            entry_id: ticket.entry_id,
            highlight: saved.product_id().or(ticket.product_id),
            fading,
        }
    }

    /// Settle a save that failed: `saving → pending`
    ///
    /// Releases the marker and returns the error to surface. The entry
    /// stays queued, unchanged, and can be saved again.
    pub fn fail(
        &mut self,
        queue: &mut RecommendationQueue,
        ticket: &SaveTicket,
        error: SdkError,
    ) -> CuratorError {
        self.release(ticket);

        if let Some(entry) = queue.get_mut(ticket.entry_id) {
            entry.status = EntryStatus::Pending;
            tracing::debug!(entry = %entry.id, "saving -> pending");
        }

        CuratorError::Service {
            message: save_failure_message(&error),
            source: error,
        }
    }

    fn release(&mut self, ticket: &SaveTicket) {
        if self.saving == Some(EntryKey::Entry(ticket.entry_id)) {
            self.saving = None;
        }
    }
}

/// User-facing text for a failed save
///
/// A message supplied by the service takes priority over the generic
/// status-coded one.
pub fn save_failure_message(error: &SdkError) -> String {
    match error.server_message() {
        Some(message) => message.to_string(),
        None => failure_message("save recommendation", error),
    }
}

//! Controller facade over the queue, the save orchestrator and the timers
//!
//! Every operation locks the shared state, applies one transition, publishes
//! a fresh [`ControllerSnapshot`] and unlocks. The lock is never held across
//! a service call, so renderers reading [`Controller::current_state`] never
//! wait on the network.

use crate::config::CuratorConfig;
use crate::error::CuratorError;
use crate::notice::Notice;
use crate::orchestrator::{SaveOrchestrator, SaveSuccess};
use crate::queue::RecommendationQueue;
use crate::timers::{TimerKey, TimerRegistry};
use catalog_domain::{
    EntryId, EntryKey, EntryStatus, Product, ProductId, ProductView, RecommendationEntry,
};
use catalog_sdk::CatalogService;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;

/// Immutable view of everything a renderer needs
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControllerSnapshot {
    /// Queued recommendations in display order
    pub entries: Vec<EntrySnapshot>,
    /// Last catalog fetched from the service
    pub catalog: Vec<Product>,
    /// Catalog row highlighted after a save
    pub highlighted_product_id: Option<ProductId>,
    /// Entry whose save is in flight
    pub saving: Option<EntryKey>,
    /// Product whose deletion is in flight
    pub deleting_product_id: Option<ProductId>,
    /// Most recent failure, until dismissed
    pub notice: Option<Notice>,
    /// Incremented on every published change
    pub version: u64,
}

/// One queued recommendation as rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot {
    /// Entry stamp
    pub id: EntryId,
    /// Lifecycle status
    pub status: EntryStatus,
    /// Canonical flat view
    pub view: ProductView,
    /// Whether the entry carries a save request
    pub linked: bool,
    /// Product that generated the recommendation
    pub source_product_id: Option<ProductId>,
}

impl From<&RecommendationEntry> for EntrySnapshot {
    fn from(entry: &RecommendationEntry) -> Self {
        Self {
            id: entry.id,
            status: entry.status,
            view: entry.view.clone(),
            linked: entry.product.is_linked(),
            source_product_id: entry.source_product_id(),
        }
    }
}

/// Presentation flags for a queue row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFlags {
    /// Row's save is in flight
    pub saving: bool,
    /// Row is fading out
    pub fading: bool,
    /// Save action unavailable
    pub disabled: bool,
}

impl ControllerSnapshot {
    /// Flags for rendering `entry`
    ///
    /// Saving is disabled for the row being saved, for fading rows, and for
    /// every row while any save is in flight.
    pub fn row_flags(&self, entry: &EntrySnapshot) -> RowFlags {
        let saving = entry.status == EntryStatus::Saving;
        let fading = entry.status == EntryStatus::Fading;
        RowFlags {
            saving,
            fading,
            disabled: saving || fading || self.saving.is_some(),
        }
    }

    /// Whether the catalog row for `product` is highlighted
    pub fn is_highlighted(&self, product: &Product) -> bool {
        self.highlighted_product_id == Some(product.id)
    }

    /// Whether `product` is being deleted
    pub fn is_deleting(&self, product: &Product) -> bool {
        self.deleting_product_id == Some(product.id)
    }

    /// Entry at a display position
    pub fn entry_at(&self, index: usize) -> Option<&EntrySnapshot> {
        self.entries.get(index)
    }
}

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Entry that was saved
    pub entry_id: EntryId,
    /// Catalog row now highlighted
    pub highlighted: Option<ProductId>,
    /// Whether the entry is fading out of the queue
    pub fading: bool,
}

impl From<SaveSuccess> for SaveOutcome {
    fn from(success: SaveSuccess) -> Self {
        Self {
            entry_id: success.entry_id,
            highlighted: success.highlight,
            fading: success.fading,
        }
    }
}

struct State {
    queue: RecommendationQueue,
    orchestrator: SaveOrchestrator,
    catalog: Vec<Product>,
    highlighted: Option<ProductId>,
    deleting: Option<ProductId>,
    notice: Option<Notice>,
    next_notice: u64,
    timers: TimerRegistry<TimerKey>,
    version: u64,
}

impl State {
    fn new() -> Self {
        Self {
            queue: RecommendationQueue::new(),
            orchestrator: SaveOrchestrator::new(),
            catalog: Vec::new(),
            highlighted: None,
            deleting: None,
            notice: None,
            next_notice: 1,
            timers: TimerRegistry::new(),
            version: 0,
        }
    }

    fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            entries: self.queue.iter().map(EntrySnapshot::from).collect(),
            catalog: self.catalog.clone(),
            highlighted_product_id: self.highlighted,
            saving: self.orchestrator.saving(),
            deleting_product_id: self.deleting,
            notice: self.notice.clone(),
            version: self.version,
        }
    }
}

struct Inner<S> {
    service: S,
    config: CuratorConfig,
    state: Mutex<State>,
    updates: watch::Sender<ControllerSnapshot>,
}

impl<S> Inner<S> {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &mut State) {
        state.version += 1;
        self.updates.send_replace(state.snapshot());
    }

    /// Record `error` as the current notice and hand it back
    fn notify(&self, state: &mut State, error: CuratorError) -> CuratorError {
        let message = error.notice_message();
        tracing::warn!(error = %message, "Controller operation failed");

        state.notice = Some(Notice {
            id: state.next_notice,
            message,
        });
        state.next_notice += 1;
        self.publish(state);
        error
    }

    fn end_highlight(&self, entry: EntryId) {
        let key = TimerKey::Highlight(entry);
        let mut state = self.lock();
        if !state.timers.is_scheduled(&key) {
            return;
        }
        state.timers.complete(&key);
        state.highlighted = None;
        tracing::debug!(entry = %entry, "Highlight cleared");
        self.publish(&mut state);
    }

    fn end_fade(&self, entry: EntryId) {
        let key = TimerKey::Fade(entry);
        let mut state = self.lock();
        if !state.timers.is_scheduled(&key) {
            return;
        }
        state.timers.complete(&key);
        let removed = state.queue.remove(&EntryKey::Entry(entry));
        if !removed.is_empty() {
            tracing::info!(entry = %entry, "Recommendation removed");
        }
        self.publish(&mut state);
    }
}

/// Recommendation controller
///
/// Cheap to clone; clones share state. Dropping the last clone cancels all
/// pending timers. Must be used from within a tokio runtime.
///
/// # Example
///
/// ```no_run
/// use catalog_curator::{Controller, CuratorConfig};
/// use catalog_domain::EntryKey;
/// use catalog_sdk::CatalogClient;
/// use serde_json::json;
///
/// # async fn demo() -> Result<(), catalog_curator::CuratorError> {
/// let controller = Controller::new(
///     CatalogClient::new("http://localhost:8080/api"),
///     CuratorConfig::default(),
/// );
/// controller.refresh_catalog().await?;
///
/// let id = controller.add(json!({
///     "sourceProductId": 1,
///     "recommendedProduct": {"id": 7, "name": "Widget"}
/// }))?;
/// let outcome = controller.save(EntryKey::Entry(id)).await?;
/// assert!(outcome.fading);
/// # Ok(())
/// # }
/// ```
pub struct Controller<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Controller<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: CatalogService> Controller<S> {
    /// Create a controller talking to `service`
    pub fn new(service: S, config: CuratorConfig) -> Self {
        let (updates, _) = watch::channel(ControllerSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                service,
                config,
                state: Mutex::new(State::new()),
                updates,
            }),
        }
    }

    /// The underlying catalog service
    pub fn service(&self) -> &S {
        &self.inner.service
    }

    /// Active timings
    pub fn config(&self) -> &CuratorConfig {
        &self.inner.config
    }

    /// Queue a recommendation received from the recommendation source
    ///
    /// # Errors
    /// Returns [`CuratorError::Payload`] if the payload is not an object.
    pub fn add(&self, payload: Value) -> Result<EntryId, CuratorError> {
        let mut state = self.inner.lock();
        match state.queue.add(payload) {
            Ok(id) => {
                tracing::info!(entry = %id, queued = state.queue.len(), "Recommendation received");
                self.inner.publish(&mut state);
                Ok(id)
            }
            Err(e) => Err(self.inner.notify(&mut state, e)),
        }
    }

    /// Empty the queue and cancel every pending removal
    ///
    /// Highlight timers keep running. A save in flight still settles, but
    /// its entry is gone so nothing fades.
    pub fn clear(&self) -> usize {
        let mut state = self.inner.lock();
        let removed = state.queue.clear();
        let cancelled = state
            .timers
            .cancel_where(|k| matches!(k, TimerKey::Fade(_)));

        tracing::info!(removed, cancelled, "Recommendations cleared");
        self.inner.publish(&mut state);
        removed
    }

    /// Persist a linked recommendation
    ///
    /// On success the saved product is highlighted for
    /// [`CuratorConfig::highlight_ms`], the entry fades for
    /// [`CuratorConfig::fade_ms`] and is then removed, and the catalog is
    /// refetched.
    ///
    /// # Errors
    /// Guard failures from [`SaveOrchestrator::begin`], or
    /// [`CuratorError::Service`] if the service refuses. Every error is
    /// also published as a notice.
    pub async fn save(&self, key: EntryKey) -> Result<SaveOutcome, CuratorError> {
        let ticket = {
            let mut guard = self.inner.lock();
            let state = &mut *guard;
            match state.orchestrator.begin(&mut state.queue, &key) {
                Ok(ticket) => {
                    self.inner.publish(state);
                    ticket
                }
                Err(e) => return Err(self.inner.notify(state, e)),
            }
        };

        tracing::info!(entry = %ticket.entry_id, "Saving recommendation");
        let result = self.inner.service.save_recommendation(&ticket.request).await;

        let success = {
            let mut guard = self.inner.lock();
            let state = &mut *guard;
            match result {
                Ok(saved) => {
                    let success = state.orchestrator.succeed(&mut state.queue, &ticket, &saved);
                    state.highlighted = success.highlight;
                    self.schedule_timers(state, &success);
                    self.inner.publish(state);
                    success
                }
                Err(e) => {
                    let error = state.orchestrator.fail(&mut state.queue, &ticket, e);
                    return Err(self.inner.notify(state, error));
                }
            }
        };

        tracing::info!(
            entry = %success.entry_id,
            product = ?success.highlight,
            "Recommendation saved"
        );

        // A failed refetch is already a notice; the save itself stands.
        if let Err(e) = self.refresh_catalog().await {
            tracing::debug!(error = %e, "Catalog refresh after save failed");
        }

        Ok(success.into())
    }

    fn schedule_timers(&self, state: &mut State, success: &SaveSuccess) {
        let entry = success.entry_id;

        let weak: Weak<Inner<S>> = Arc::downgrade(&self.inner);
        state.timers.schedule(
            TimerKey::Highlight(entry),
            self.inner.config.highlight_duration(),
            move || {
                if let Some(inner) = weak.upgrade() {
                    inner.end_highlight(entry);
                }
            },
        );

        if success.fading {
            let weak: Weak<Inner<S>> = Arc::downgrade(&self.inner);
            state.timers.schedule(
                TimerKey::Fade(entry),
                self.inner.config.fade_duration(),
                move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.end_fade(entry);
                    }
                },
            );
        }
    }

    /// Latest published snapshot
    pub fn current_state(&self) -> ControllerSnapshot {
        self.inner.updates.borrow().clone()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Refetch the catalog; returns the number of products
    pub async fn refresh_catalog(&self) -> Result<usize, CuratorError> {
        let result = self.inner.service.list_products().await;

        let mut state = self.inner.lock();
        match result {
            Ok(products) => {
                let count = products.len();
                tracing::debug!(count, "Catalog refreshed");
                state.catalog = products;
                self.inner.publish(&mut state);
                Ok(count)
            }
            Err(e) => Err(self
                .inner
                .notify(&mut state, CuratorError::service("load products", e))),
        }
    }

    /// Create an empty product, then refetch the catalog either way
    pub async fn create_product(&self) -> Result<(), CuratorError> {
        let created = self
            .inner
            .service
            .create_product(&Value::Object(Map::new()))
            .await;
        let refreshed = self.refresh_catalog().await;

        match created {
            Ok(()) => {
                tracing::info!("Product created");
                refreshed.map(|_| ())
            }
            Err(e) => {
                let mut state = self.inner.lock();
                Err(self
                    .inner
                    .notify(&mut state, CuratorError::service("create product", e)))
            }
        }
    }

    /// Delete a catalog product
    ///
    /// `deleting_product_id` is set for the duration of the call. On
    /// failure the catalog is left as it was.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), CuratorError> {
        {
            let mut state = self.inner.lock();
            state.deleting = Some(id);
            self.inner.publish(&mut state);
        }

        let result = self.inner.service.delete_product(id).await;

        {
            let mut state = self.inner.lock();
            if state.deleting == Some(id) {
                state.deleting = None;
            }
            match result {
                Ok(()) => {
                    tracing::info!(product = %id, "Product deleted");
                    self.inner.publish(&mut state);
                }
                Err(e) => {
                    return Err(self
                        .inner
                        .notify(&mut state, CuratorError::service("delete product", e)));
                }
            }
        }

        self.refresh_catalog().await.map(|_| ())
    }

    /// Drop the current notice, returning it
    pub fn dismiss_notice(&self) -> Option<Notice> {
        let mut state = self.inner.lock();
        let notice = state.notice.take();
        if notice.is_some() {
            self.inner.publish(&mut state);
        }
        notice
    }

    /// Number of timers not yet fired or cancelled
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.pending()
    }
}

impl<S> std::fmt::Debug for Controller<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Controller")
            .field("config", &self.inner.config)
            .field("queued", &state.queue.len())
            .field("saving", &state.orchestrator.saving())
            .field("timers", &state.timers)
            .field("version", &state.version)
            .finish()
    }
}

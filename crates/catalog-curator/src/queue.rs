//! Ordered queue of recommendation candidates

use crate::error::CuratorError;
use catalog_domain::{EntryId, EntryKey, EntryStatus, ProductRef, RecommendationEntry};
use serde_json::Value;

/// Client-side recommendation queue
///
/// Insertion order is display order. There is no size bound and the same
/// product may be queued any number of times; each insertion is its own
/// entry with its own [`EntryId`].
#[derive(Debug, Default, Clone)]
pub struct RecommendationQueue {
    entries: Vec<RecommendationEntry>,
}

impl RecommendationQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `payload`, stamp it and append it
    ///
    /// # Errors
    /// Returns [`CuratorError::Payload`] if the payload is not a JSON object.
    pub fn add(&mut self, payload: Value) -> Result<EntryId, CuratorError> {
        let product = ProductRef::from_value(payload)?;
        let entry = RecommendationEntry::new(product);
        let id = entry.id;

        tracing::debug!(
            entry = %id,
            product = ?entry.view.id,
            linked = entry.product.is_linked(),
            "Recommendation queued"
        );

        self.entries.push(entry);
        Ok(id)
    }

    /// Remove every entry; returns how many were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Remove the entries `key` refers to
    ///
    /// An [`EntryKey::Entry`] removes at most one entry. The
    /// [`EntryKey::Product`] fallback removes every entry whose canonical
    /// product id matches.
    pub fn remove(&mut self, key: &EntryKey) -> Vec<RecommendationEntry> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.matches(key) {
                removed.push(entry);
            } else {
                kept.push(entry);
            }
        }
        self.entries = kept;
        removed
    }

    /// Entry `key` refers to
    ///
    /// A product key can match several entries; the first pending one wins,
    /// then the first match of any status.
    pub fn find(&self, key: &EntryKey) -> Option<&RecommendationEntry> {
        self.position(key).map(|index| &self.entries[index])
    }

    /// Mutable access to the entry `key` refers to, chosen as in [`find`](Self::find)
    pub fn find_mut(&mut self, key: &EntryKey) -> Option<&mut RecommendationEntry> {
        let index = self.position(key)?;
        self.entries.get_mut(index)
    }

    fn position(&self, key: &EntryKey) -> Option<usize> {
        let first_pending = match key {
            EntryKey::Entry(_) => None,
            EntryKey::Product(_) => self
                .entries
                .iter()
                .position(|e| e.matches(key) && e.status == EntryStatus::Pending),
        };
        first_pending.or_else(|| self.entries.iter().position(|e| e.matches(key)))
    }

    /// Entry with the given stamp
    pub fn get(&self, id: EntryId) -> Option<&RecommendationEntry> {
        self.find(&EntryKey::Entry(id))
    }

    /// Mutable access to the entry with the given stamp
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut RecommendationEntry> {
        self.find_mut(&EntryKey::Entry(id))
    }

    /// Entry at a display position
    pub fn at(&self, index: usize) -> Option<&RecommendationEntry> {
        self.entries.get(index)
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = &RecommendationEntry> {
        self.entries.iter()
    }

    /// Entries currently in the `saving` state
    pub fn saving(&self) -> impl Iterator<Item = &RecommendationEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == EntryStatus::Saving)
    }

    /// Number of queued entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_domain::ProductId;
    use serde_json::json;

    fn widget(id: i64) -> Value {
        json!({
            "sourceProductId": 1,
            "recommendedProduct": {"id": id, "name": "Widget", "price": 9.99}
        })
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut queue = RecommendationQueue::new();
        let a = queue.add(widget(1)).unwrap();
        let b = queue.add(json!({"id": 2, "name": "Flat"})).unwrap();
        let c = queue.add(widget(3)).unwrap();

        let order: Vec<EntryId> = queue.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(queue.at(1).unwrap().view.name.as_deref(), Some("Flat"));
    }

    #[test]
    fn test_add_rejects_non_object() {
        let mut queue = RecommendationQueue::new();
        let err = queue.add(json!(42)).unwrap_err();
        assert!(matches!(err, CuratorError::Payload(_)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicates_are_distinct_and_independently_removable() {
        let mut queue = RecommendationQueue::new();
        let first = queue.add(widget(7)).unwrap();
        let second = queue.add(widget(7)).unwrap();
        assert_ne!(first, second);
        assert_eq!(queue.len(), 2);

        let removed = queue.remove(&EntryKey::Entry(first));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, first);
        assert_eq!(queue.len(), 1);
        assert!(queue.get(second).is_some());
    }

    #[test]
    fn test_remove_by_product_fallback() {
        let mut queue = RecommendationQueue::new();
        queue.add(widget(7)).unwrap();
        queue.add(widget(8)).unwrap();
        queue.add(json!({"id": 7})).unwrap();

        let removed = queue.remove(&EntryKey::Product(ProductId::new(7)));
        assert_eq!(removed.len(), 2);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.at(0).unwrap().view.id, Some(ProductId::new(8)));
    }

    #[test]
    fn test_product_key_prefers_pending_duplicate() {
        let mut queue = RecommendationQueue::new();
        let fading = queue.add(widget(7)).unwrap();
        let pending = queue.add(widget(7)).unwrap();
        queue.get_mut(fading).unwrap().status = EntryStatus::Fading;

        let key = EntryKey::Product(ProductId::new(7));
        assert_eq!(queue.find(&key).unwrap().id, pending);
        assert_eq!(queue.find_mut(&key).unwrap().id, pending);

        // With nothing pending, the first match is still found
        queue.get_mut(pending).unwrap().status = EntryStatus::Saving;
        assert_eq!(queue.find(&key).unwrap().id, fading);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut queue = RecommendationQueue::new();
        queue.add(widget(7)).unwrap();
        assert!(queue.remove(&EntryKey::Entry(EntryId::new())).is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut queue = RecommendationQueue::new();
        queue.add(widget(1)).unwrap();
        queue.add(widget(2)).unwrap();
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.clear(), 0);
    }

    #[test]
    fn test_saving_filter() {
        let mut queue = RecommendationQueue::new();
        let a = queue.add(widget(1)).unwrap();
        queue.add(widget(2)).unwrap();
        queue.get_mut(a).unwrap().status = EntryStatus::Saving;

        let saving: Vec<EntryId> = queue.saving().map(|e| e.id).collect();
        assert_eq!(saving, vec![a]);
    }
}

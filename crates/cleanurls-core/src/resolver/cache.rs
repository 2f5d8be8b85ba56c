//! Memoized short-name lookups, cleared when caches are purged.

use std::collections::HashMap;
use std::sync::RwLock;

use super::EntityKind;

/// Process-local cache of `(kind, id) -> short name` answers, including misses.
///
/// Shared by concurrent calls; reads take the read lock, inserts and
/// [`clear`](Self::clear) the write lock. Every clear bumps the generation, and
/// an answer looked up before a clear is returned but never stored.
#[derive(Debug, Default)]
pub struct ResolverCache {
    inner: RwLock<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    generation: u64,
    map: HashMap<(EntityKind, i64), Option<String>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached answer for `(kind, id)`, computing and storing it on a miss.
    pub fn get_or_insert_with(
        &self,
        kind: EntityKind,
        id: i64,
        lookup: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        let generation = {
            let entries = self.inner.read().unwrap_or_else(|e| e.into_inner());
            if let Some(hit) = entries.map.get(&(kind, id)) {
                return hit.clone();
            }
            entries.generation
        };
        let value = lookup();
        let mut entries = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if entries.generation == generation {
            entries.map.insert((kind, id), value.clone());
        } else {
            tracing::trace!(?kind, id, "caches purged during lookup; not storing");
        }
        value
    }

    pub fn clear(&self) {
        let mut entries = self.inner.write().unwrap_or_else(|e| e.into_inner());
        entries.map.clear();
        entries.generation = entries.generation.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn caches_hits_and_misses() {
        let cache = ResolverCache::new();
        let calls = Cell::new(0);
        let lookup = || {
            calls.set(calls.get() + 1);
            None
        };
        assert_eq!(cache.get_or_insert_with(EntityKind::Course, 1, lookup), None);
        assert_eq!(cache.get_or_insert_with(EntityKind::Course, 1, lookup), None);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_forces_fresh_lookup() {
        let cache = ResolverCache::new();
        cache.get_or_insert_with(EntityKind::User, 2, || Some("old".to_string()));
        cache.clear();
        assert!(cache.is_empty());
        let v = cache.get_or_insert_with(EntityKind::User, 2, || Some("new".to_string()));
        assert_eq!(v.as_deref(), Some("new"));
    }

    #[test]
    fn kinds_do_not_share_entries() {
        let cache = ResolverCache::new();
        cache.get_or_insert_with(EntityKind::Course, 3, || Some("c".to_string()));
        let v = cache.get_or_insert_with(EntityKind::Category, 3, || Some("k".to_string()));
        assert_eq!(v.as_deref(), Some("k"));
    }

    #[test]
    fn lookup_racing_a_purge_is_not_stored() {
        let cache = ResolverCache::new();
        let v = cache.get_or_insert_with(EntityKind::Course, 4, || {
            cache.clear();
            Some("stale".to_string())
        });
        assert_eq!(v.as_deref(), Some("stale"));
        assert!(cache.is_empty());

        let v = cache.get_or_insert_with(EntityKind::Course, 4, || Some("fresh".to_string()));
        assert_eq!(v.as_deref(), Some("fresh"));
        assert_eq!(cache.len(), 1);
    }
}

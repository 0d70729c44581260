use cwfcore::ac::Authority;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    generation: u64,
    entries: HashMap<(i64, i64), Authority>,
}

/// Resolved authorities keyed by `(resource_id, group_id)`, shared by
/// concurrent readers.
///
/// Every write to the permission entries must be followed by a call to
/// [`ResolverCache::invalidate`].  A resolution is only stored against
/// the generation it was computed under, so a lookup that raced with an
/// invalidation cannot repopulate the cache with a stale value.
#[derive(Debug, Default)]
pub struct ResolverCache(RwLock<Inner>);

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, resource_id: i64, group_id: i64) -> Option<Authority> {
        self.0.read().entries.get(&(resource_id, group_id)).copied()
    }

    /// The generation to pass to [`ResolverCache::insert`] for a value
    /// about to be computed.
    pub fn ticket(&self) -> u64 {
        self.0.read().generation
    }

    /// Returns whether the value was stored.
    pub fn insert(
        &self,
        ticket: u64,
        resource_id: i64,
        group_id: i64,
        authority: Authority,
    ) -> bool {
        let mut inner = self.0.write();
        if inner.generation != ticket {
            log::trace!(
                "discarding stale resolution for resource {resource_id} group {group_id}"
            );
            return false;
        }
        inner.entries.insert((resource_id, group_id), authority);
        true
    }

    pub fn invalidate(&self) {
        let mut inner = self.0.write();
        inner.generation += 1;
        inner.entries.clear();
        log::debug!("resolver cache invalidated, generation {}", inner.generation);
    }

    pub fn len(&self) -> usize {
        self.0.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

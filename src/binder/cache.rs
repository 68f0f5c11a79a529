//! Concurrency-safe schema cache.
//!
//! Schemas are built once per type and shared for the lifetime of the
//! owning [`Mapper`](super::Mapper). Reads are lock-free against a
//! published immutable snapshot (`ArcSwap`); a build for a type not yet
//! cached takes an exclusive build lock, double-checks the snapshot
//! (another thread may have finished first), and republishes a
//! copy-on-write snapshot with a single atomic swap, so concurrent
//! readers never observe a partially built schema or a torn map. There
//! is no eviction.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use tracing::debug;

use super::schema::Schema;

pub(crate) struct SchemaCache {
    snapshot: ArcSwap<HashMap<TypeId, Arc<Schema>>>,
    build_lock: Mutex<()>,
}

impl SchemaCache {
    pub(crate) fn new() -> SchemaCache {
        SchemaCache {
            snapshot: ArcSwap::from_pointee(HashMap::new()),
            build_lock: Mutex::new(()),
        }
    }

    pub(crate) fn get(&self, key: &TypeId) -> Option<Arc<Schema>> {
        self.snapshot.load().get(key).map(Arc::clone)
    }

    /// Fetch the schema for `key`, building it at most once under
    /// contention.
    pub(crate) fn get_or_build(
        &self,
        key: TypeId,
        build: impl FnOnce() -> Schema,
    ) -> Arc<Schema> {
        if let Some(schema) = self.get(&key) {
            return schema;
        }

        // The critical section only ever publishes complete schemas, so
        // a poisoned lock is safe to reuse.
        let guard = self
            .build_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Double-check: another thread may have built and published
        // this schema while we waited for the lock.
        if let Some(schema) = self.get(&key) {
            return schema;
        }

        let schema = Arc::new(build());

        let current = self.snapshot.load();
        let mut next: HashMap<TypeId, Arc<Schema>> = HashMap::with_capacity(current.len() + 1);
        for (k, v) in current.iter() {
            next.insert(*k, Arc::clone(v));
        }
        next.insert(key, Arc::clone(&schema));
        self.snapshot.store(Arc::new(next));

        debug!(type_name = schema.type_name, "published schema to cache");
        drop(guard);

        schema
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        SchemaCache::new()
    }
}

use ahash::AHashMap;
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;

/// How long an entry stays alive relative to the logical request.
///
/// `FilterChain` entries are discarded when the stream is recreated and the
/// filter chain restarts from the top. `Request` entries survive the replay
/// and are only dropped when the request completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifespan {
    FilterChain,
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    ReadOnly,
    Mutable,
}

#[derive(Debug, Error)]
pub enum FilterStateError {
    #[error("filter state key '{key}' is read-only and cannot be replaced")]
    ReadOnlyViolation { key: &'static str },
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    mutability: Mutability,
    lifespan: Lifespan,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("mutability", &self.mutability)
            .field("lifespan", &self.lifespan)
            .finish_non_exhaustive()
    }
}

/// Request-scoped typed key-value store used to pass data between filter
/// invocations, including across a stream replay.
///
/// Keys are fixed namespaced strings owned by the writing filter. The store
/// belongs to the request: it is single-writer, and a read-only entry can
/// never be replaced once set.
#[derive(Debug, Default)]
pub struct FilterState {
    entries: AHashMap<&'static str, Entry>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data<T: Send + Sync + 'static>(
        &mut self,
        key: &'static str,
        value: Arc<T>,
        mutability: Mutability,
        lifespan: Lifespan,
    ) -> Result<(), FilterStateError> {
        if let Some(existing) = self.entries.get(key) {
            if existing.mutability == Mutability::ReadOnly {
                return Err(FilterStateError::ReadOnlyViolation { key });
            }
        }

        self.entries.insert(
            key,
            Entry {
                value,
                mutability,
                lifespan,
            },
        );

        Ok(())
    }

    /// Typed read access. Returns `None` when the key is absent or holds a
    /// value of a different type.
    pub fn get_read_only<T: Send + Sync + 'static>(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.entries.get(key)?;
        Arc::clone(&entry.value).downcast::<T>().ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Invoked by the pipeline when the stream is recreated. Entries scoped
    /// to the filter chain do not survive; request-scoped entries do.
    pub fn on_stream_replay(&mut self) {
        self.entries.retain(|_, e| e.lifespan == Lifespan::Request);
    }
}

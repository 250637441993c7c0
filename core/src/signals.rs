//! Per-document signals computed offline (pagerank, pageviews).
//!
//! Tables are looked up by id with a zero default. They are not blended into
//! ranking; they are served as-is through their own endpoints.

use crate::error::IndexError;
use crate::persist::load_signal;
use crate::DocId;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Where a signal table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalSource {
    File(PathBuf),
    InMemory,
    /// No candidate file existed; every lookup yields the default.
    NotLoaded,
}

#[derive(Debug, Clone)]
pub struct SignalTable<V> {
    values: HashMap<DocId, V>,
    source: SignalSource,
}

impl<V> Default for SignalTable<V> {
    fn default() -> Self {
        Self { values: HashMap::new(), source: SignalSource::NotLoaded }
    }
}

impl<V: Copy + Default> SignalTable<V> {
    pub fn new(values: HashMap<DocId, V>) -> Self {
        Self { values, source: SignalSource::InMemory }
    }

    /// Load the first candidate that exists, in order.
    ///
    /// A candidate that exists but does not decode as `HashMap<DocId, V>` is
    /// an error, not a reason to try the next one. When no candidate exists
    /// the table is empty and reports [`SignalSource::NotLoaded`].
    pub fn load_first<P: AsRef<Path>>(name: &str, candidates: &[P]) -> Result<Self, IndexError>
    where
        V: DeserializeOwned,
    {
        for path in candidates {
            let path = path.as_ref();
            if !path.is_file() {
                tracing::debug!(table = name, path = %path.display(), "signal candidate absent");
                continue;
            }
            let values = load_signal(path)?;
            tracing::info!(table = name, path = %path.display(), entries = values.len(), "loaded signal table");
            return Ok(Self { values, source: SignalSource::File(path.to_path_buf()) });
        }
        tracing::warn!(table = name, candidates = candidates.len(), "no signal table found, serving defaults");
        Ok(Self::default())
    }

    pub fn get(&self, doc_id: DocId) -> V {
        self.values.get(&doc_id).copied().unwrap_or_default()
    }

    /// Values for `ids`, same length and order.
    pub fn lookup(&self, ids: &[DocId]) -> Vec<V> {
        ids.iter().map(|id| self.get(*id)).collect()
    }

    pub fn source(&self) -> &SignalSource { &self.source }

    pub fn is_loaded(&self) -> bool { self.source != SignalSource::NotLoaded }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

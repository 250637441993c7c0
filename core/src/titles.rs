use crate::error::IndexError;
use crate::persist::{load_titles, IndexPaths};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ranked result, serialized as `[doc_id, title]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit(pub DocId, pub String);

/// Document titles, read once at startup.
#[derive(Debug, Default, Clone)]
pub struct TitleStore {
    titles: HashMap<DocId, String>,
}

impl TitleStore {
    pub fn new(titles: HashMap<DocId, String>) -> Self { Self { titles } }

    pub fn load(paths: &IndexPaths) -> Result<Self, IndexError> {
        let titles = load_titles(paths)?;
        tracing::info!(num_titles = titles.len(), "loaded titles");
        Ok(Self { titles })
    }

    pub fn title(&self, doc_id: DocId) -> Option<&str> {
        self.titles.get(&doc_id).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.titles.len() }

    pub fn is_empty(&self) -> bool { self.titles.is_empty() }

    /// Attach titles to ranked ids; unknown ids get an empty title.
    pub fn hits(&self, ranked: impl IntoIterator<Item = DocId>) -> Vec<Hit> {
        ranked
            .into_iter()
            .map(|doc_id| Hit(doc_id, self.title(doc_id).unwrap_or_default().to_string()))
            .collect()
    }
}

impl FromIterator<(DocId, String)> for TitleStore {
    fn from_iter<I: IntoIterator<Item = (DocId, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

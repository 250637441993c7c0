use crate::error::IndexError;
use crate::index::{PostingList, TermStatistics};
use crate::persist::{load_dictionary, open_postings_for_term, PostingPaths};
use crate::TermId;
use std::collections::HashMap;
use std::path::Path;

/// Term statistics backed by an on-disk posting index.
///
/// The dictionary and df vector are held in memory; posting files are opened
/// and streamed on every request.
pub struct DiskTermStatistics {
    paths: PostingPaths,
    dictionary: HashMap<String, TermId>,
    df: Vec<u32>,
}

impl DiskTermStatistics {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, IndexError> {
        let paths = PostingPaths::new(root);
        let (dictionary, df) = load_dictionary(&paths)?;
        tracing::info!(root = %paths.root.display(), num_terms = dictionary.len(), "loaded posting dictionary");
        Ok(Self { paths, dictionary, df })
    }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }
}

impl TermStatistics for DiskTermStatistics {
    fn document_frequency(&self, term: &str) -> u32 {
        self.dictionary
            .get(term)
            .and_then(|tid| self.df.get(*tid as usize).copied())
            .unwrap_or(0)
    }

    fn posting_list(&self, term: &str) -> Result<PostingList<'_>, IndexError> {
        let Some(&tid) = self.dictionary.get(term) else {
            return Ok(Box::new(std::iter::empty()));
        };
        match open_postings_for_term(&self.paths, tid)? {
            Some(reader) => Ok(Box::new(reader)),
            None => {
                // df says the term exists but nothing was written for it
                tracing::warn!(term, term_id = tid, "posting file missing, treating as empty");
                Ok(Box::new(std::iter::empty()))
            }
        }
    }
}

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32, // raw occurrences of the term in the document
}

/// A posting list streamed one record at a time.
pub type PostingList<'a> = Box<dyn Iterator<Item = Result<Posting, IndexError>> + 'a>;

/// Read side of an inverted index: document frequencies and posting lists.
///
/// Implementations are shared by every concurrent query, so they must be
/// immutable after construction.
pub trait TermStatistics: Send + Sync {
    /// Number of documents containing `term`; 0 when the term is unknown.
    fn document_frequency(&self, term: &str) -> u32;

    /// Stream the postings of `term`. Unknown terms yield an empty list.
    fn posting_list(&self, term: &str) -> Result<PostingList<'_>, IndexError>;
}

/// Fully in-memory inverted index.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub dictionary: HashMap<String, TermId>,
    pub df: Vec<u32>,
    pub postings: HashMap<TermId, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    fn term_id_or_insert(&mut self, term: &str) -> TermId {
        if let Some(&tid) = self.dictionary.get(term) {
            return tid;
        }
        let tid = self.df.len() as TermId;
        self.dictionary.insert(term.to_string(), tid);
        self.df.push(0);
        tid
    }

    /// Record that `doc_id` contains `term` `tf` times. Bumps the term's df.
    pub fn add_posting(&mut self, term: &str, doc_id: DocId, tf: u32) -> TermId {
        let tid = self.term_id_or_insert(term);
        self.df[tid as usize] += 1;
        self.postings.entry(tid).or_default().push(Posting { doc_id, tf });
        tid
    }

    /// Tokenize `text` and add one posting per distinct term it contains.
    pub fn add_document(&mut self, doc_id: DocId, text: &str) {
        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        for term in crate::tokenizer::tokenize(text) {
            *tf_counts.entry(term).or_insert(0) += 1;
        }
        for (term, tf) in tf_counts {
            self.add_posting(&term, doc_id, tf);
        }
    }

    /// Overwrite the recorded df of a term, independent of its postings.
    pub fn set_document_frequency(&mut self, term: &str, df: u32) {
        let tid = self.term_id_or_insert(term);
        self.df[tid as usize] = df;
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.dictionary.get(term).copied()
    }

    pub fn num_terms(&self) -> usize { self.dictionary.len() }
}

impl TermStatistics for InvertedIndex {
    fn document_frequency(&self, term: &str) -> u32 {
        self.term_id(term)
            .and_then(|tid| self.df.get(tid as usize).copied())
            .unwrap_or(0)
    }

    fn posting_list(&self, term: &str) -> Result<PostingList<'_>, IndexError> {
        let postings = self
            .term_id(term)
            .and_then(|tid| self.postings.get(&tid))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(Box::new(postings.iter().copied().map(Ok)))
    }
}

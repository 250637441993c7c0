//! First-stage scoring: stream the posting list of every weighted query term
//! and sum, per document, the dot product with the query, the squared
//! document weight and the number of matched terms.
//!
//! Terms are fetched in parallel. Each rayon task fills its own partial
//! [`Accumulator`]; partials are merged after the join, in term order, so no
//! locks are taken and repeated queries produce bit-identical sums.

use crate::error::SearchError;
use crate::index::TermStatistics;
use crate::query::{idf, log_tf, QueryVector};
use crate::DocId;
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;

pub(crate) const DEADLINE_CHECK_INTERVAL: usize = 4096;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocSums {
    pub dot: f64,
    pub norm_sq: f64,
    pub matched: u32,
}

#[derive(Debug, Default)]
pub struct Accumulator {
    docs: HashMap<DocId, DocSums>,
}

impl Accumulator {
    pub fn add(&mut self, doc_id: DocId, w_doc: f64, w_query: f64) {
        let sums = self.docs.entry(doc_id).or_default();
        sums.dot += w_doc * w_query;
        sums.norm_sq += w_doc * w_doc;
        sums.matched += 1;
    }

    /// Sum two partial accumulators. The larger map absorbs the smaller one;
    /// each per-document addition is commutative, so the swap does not change results.
    pub fn merge(mut self, mut other: Self) -> Self {
        if self.docs.len() < other.docs.len() {
            std::mem::swap(&mut self, &mut other);
        }
        for (doc_id, theirs) in other.docs {
            let ours = self.docs.entry(doc_id).or_default();
            ours.dot += theirs.dot;
            ours.norm_sq += theirs.norm_sq;
            ours.matched += theirs.matched;
        }
        self
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocSums> { self.docs.get(&doc_id) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &DocSums)> + '_ {
        self.docs.iter().map(|(id, sums)| (*id, sums))
    }
}

pub(crate) fn check_deadline(deadline: Option<Instant>) -> Result<(), SearchError> {
    match deadline {
        Some(at) if Instant::now() >= at => Err(SearchError::DeadlineExceeded),
        _ => Ok(()),
    }
}

fn accumulate_term(
    term: &str,
    w_query: f64,
    stats: &dyn TermStatistics,
    num_docs: u64,
    deadline: Option<Instant>,
) -> Result<Accumulator, SearchError> {
    let mut acc = Accumulator::default();
    let df = stats.document_frequency(term);
    if df == 0 {
        return Ok(acc);
    }
    // recomputed from df rather than taken from the query side
    let idf = idf(num_docs, df);
    let postings_err = |source| SearchError::Postings { term: term.to_string(), source };
    let postings = stats.posting_list(term).map_err(postings_err)?;
    for (i, posting) in postings.enumerate() {
        if i % DEADLINE_CHECK_INTERVAL == 0 {
            check_deadline(deadline)?;
        }
        let posting = posting.map_err(postings_err)?;
        acc.add(posting.doc_id, log_tf(posting.tf) * idf, w_query);
    }
    Ok(acc)
}

/// Accumulate the per-document sums of `query` against `stats`.
///
/// Any posting list that cannot be read fails the whole query, as does
/// passing `deadline`.
pub fn accumulate(
    query: &QueryVector,
    stats: &dyn TermStatistics,
    num_docs: u64,
    deadline: Option<Instant>,
) -> Result<Accumulator, SearchError> {
    let terms: Vec<(&str, f64)> = query.weights.iter().map(|(term, &w)| (term.as_str(), w)).collect();
    let partials = terms
        .par_iter()
        .map(|&(term, w_query)| accumulate_term(term, w_query, stats, num_docs, deadline))
        .collect::<Result<Vec<_>, _>>()?;
    check_deadline(deadline)?;
    // Folded in term order: per-document float sums must not depend on
    // which rayon task finished first.
    let acc = partials.into_iter().fold(Accumulator::default(), Accumulator::merge);
    tracing::debug!(terms = query.len(), docs = acc.len(), "accumulated posting lists");
    Ok(acc)
}

use crate::accumulate::{check_deadline, DEADLINE_CHECK_INTERVAL};
use crate::error::SearchError;
use crate::index::TermStatistics;
use crate::DocId;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

fn touched_by_term(
    term: &str,
    stats: &dyn TermStatistics,
    deadline: Option<Instant>,
) -> Result<HashMap<DocId, u32>, SearchError> {
    let mut touched = HashMap::new();
    if stats.document_frequency(term) == 0 {
        return Ok(touched);
    }
    let postings_err = |source| SearchError::Postings { term: term.to_string(), source };
    for (i, posting) in stats.posting_list(term).map_err(postings_err)?.enumerate() {
        if i % DEADLINE_CHECK_INTERVAL == 0 {
            check_deadline(deadline)?;
        }
        // insert, not add: a document counts once per term
        touched.insert(posting.map_err(postings_err)?.doc_id, 1);
    }
    Ok(touched)
}

fn merge_counts(mut a: HashMap<DocId, u32>, mut b: HashMap<DocId, u32>) -> HashMap<DocId, u32> {
    if a.len() < b.len() {
        std::mem::swap(&mut a, &mut b);
    }
    for (doc_id, n) in b {
        *a.entry(doc_id).or_insert(0) += n;
    }
    a
}

/// Rank every document touched by any of `terms` by how many of them it contains.
///
/// Frequencies are ignored. Nothing is truncated: all matching documents are
/// returned, most distinct terms first, ties by ascending doc id.
pub fn rank_by_coverage(
    terms: &HashSet<String>,
    stats: &dyn TermStatistics,
    deadline: Option<Instant>,
) -> Result<Vec<(DocId, u32)>, SearchError> {
    let counts = terms
        .par_iter()
        .map(|term| touched_by_term(term, stats, deadline))
        .try_reduce(HashMap::new, |a, b| Ok(merge_counts(a, b)))?;
    check_deadline(deadline)?;

    let mut ranked: Vec<(DocId, u32)> = counts.into_iter().collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tracing::debug!(terms = terms.len(), docs = ranked.len(), "ranked by coverage");
    Ok(ranked)
}

use crate::select::{top_k, Scored};
use crate::titles::TitleStore;
use crate::tokenizer::tokenize;
use rayon::prelude::*;
use std::collections::HashSet;

/// Number of distinct query terms that occur in `title`.
pub fn title_match_count(title: &str, query_terms: &HashSet<String>) -> usize {
    let title_terms: HashSet<String> = tokenize(title).into_iter().collect();
    query_terms.iter().filter(|t| title_terms.contains(*t)).count()
}

/// Boost each candidate by its title overlap with the query and keep the best `limit`.
pub fn rerank_by_title(
    candidates: &[Scored],
    query_terms: &HashSet<String>,
    titles: &TitleStore,
    title_boost: f64,
    limit: usize,
) -> Vec<Scored> {
    let reranked: Vec<Scored> = candidates
        .par_iter()
        .map(|c| {
            let matches = titles
                .title(c.doc_id)
                .map(|title| title_match_count(title, query_terms))
                .unwrap_or(0);
            Scored { doc_id: c.doc_id, score: c.score * (1.0 + title_boost * matches as f64) }
        })
        .collect();
    top_k(reranked, limit)
}

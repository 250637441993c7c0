use crate::accumulate::Accumulator;
use crate::DocId;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A document and its score. Orders by score, then by lower doc id.
#[derive(Debug, Clone, Copy)]
pub struct Scored {
    pub doc_id: DocId,
    pub score: f64,
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.doc_id.cmp(&self.doc_id))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for Scored {}

/// Keep the `k` best items, best first, with a min-heap of size `k`.
pub fn top_k(items: impl IntoIterator<Item = Scored>, k: usize) -> Vec<Scored> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<Scored>> = BinaryHeap::with_capacity(k.min(4096) + 1);
    for item in items {
        heap.push(Reverse(item));
        if heap.len() > k {
            heap.pop();
        }
    }
    // ascending under Reverse is best first
    heap.into_sorted_vec().into_iter().map(|Reverse(s)| s).collect()
}

/// Cosine similarity with a bonus per matched query term.
pub fn body_score(dot: f64, norm_sq: f64, q_norm: f64, matched: u32, coverage_boost: f64) -> f64 {
    let cosine = dot / (norm_sq.sqrt() * q_norm);
    cosine * (1.0 + coverage_boost * matched as f64)
}

/// Score every accumulated document and keep the best `limit`.
///
/// Documents with a zero squared norm have no defined cosine and are skipped.
pub fn select_candidates(acc: &Accumulator, q_norm: f64, coverage_boost: f64, limit: usize) -> Vec<Scored> {
    let scored = acc
        .iter()
        .filter(|(_, sums)| sums.norm_sq != 0.0)
        .map(|(doc_id, sums)| Scored {
            doc_id,
            score: body_score(sums.dot, sums.norm_sq, q_norm, sums.matched, coverage_boost),
        });
    top_k(scored, limit)
}

use crate::index::TermStatistics;
use std::collections::BTreeMap;

/// `ln((N + 1) / df)`. Callers only pass `df > 0`.
pub fn idf(num_docs: u64, df: u32) -> f64 {
    ((num_docs as f64 + 1.0) / df as f64).ln()
}

/// Sublinear term frequency weight `1 + ln(tf)`, 0 for `tf == 0`.
pub fn log_tf(tf: u32) -> f64 {
    if tf == 0 { 0.0 } else { 1.0 + (tf as f64).ln() }
}

/// Weighted query terms, in term order, and the Euclidean norm of their weights.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    pub weights: BTreeMap<String, f64>,
    pub norm: f64,
}

impl QueryVector {
    /// Weight every distinct query term known to `stats`.
    ///
    /// Returns `None` when no term survives, or when every surviving weight is
    /// zero: such a query has no results.
    pub fn build(tokens: &[String], stats: &dyn TermStatistics, num_docs: u64) -> Option<Self> {
        // sorted so the norm is summed in the same order on every call
        let mut tf_q: BTreeMap<&str, u32> = BTreeMap::new();
        for token in tokens {
            *tf_q.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut weights = BTreeMap::new();
        let mut norm_sq = 0.0f64;
        for (term, tf) in tf_q {
            let df = stats.document_frequency(term);
            if df == 0 {
                continue;
            }
            let w = log_tf(tf) * idf(num_docs, df);
            weights.insert(term.to_string(), w);
            norm_sq += w * w;
        }

        let norm = norm_sq.sqrt();
        if weights.is_empty() || norm == 0.0 || !norm.is_finite() {
            return None;
        }
        Some(Self { weights, norm })
    }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }
}

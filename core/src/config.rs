use serde::{Deserialize, Serialize};

/// Approximate size of the English Wikipedia dump the ranking was tuned on.
pub const DEFAULT_NUM_DOCS: u64 = 6_348_910;

/// Tunable constants of the ranking pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingParams {
    /// Collection size `N` in `idf = ln((N + 1) / df)`.
    pub num_docs: u64,
    /// Candidates carried from body scoring into the title rerank.
    pub candidate_limit: usize,
    /// Results returned by the body and full pipelines.
    pub result_limit: usize,
    /// Per matched query term: `body = cosine * (1 + coverage_boost * matched)`.
    pub coverage_boost: f64,
    /// Per query term in the title: `final = body * (1 + title_boost * title_matches)`.
    pub title_boost: f64,
}

impl Default for RankingParams {
    fn default() -> Self {
        Self {
            num_docs: DEFAULT_NUM_DOCS,
            candidate_limit: 2000,
            result_limit: 100,
            coverage_boost: 0.15,
            title_boost: 0.30,
        }
    }
}

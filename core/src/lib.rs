//! Query-time ranking over a precomputed inverted index.
//!
//! Body search scores documents by log-tf/idf cosine similarity with a
//! per-term coverage boost, prunes to a bounded candidate set and reranks it
//! by title overlap. Title and anchor search rank by the number of distinct
//! query terms matched.

pub mod accumulate;
pub mod config;
pub mod engine;
pub mod error;
pub mod exact;
pub mod index;
pub mod persist;
pub mod query;
pub mod rerank;
pub mod select;
pub mod signals;
pub mod store;
pub mod titles;
pub mod tokenizer;

pub use config::RankingParams;
pub use engine::SearchEngine;
pub use error::{IndexError, SearchError};
pub use index::{DocId, InvertedIndex, Posting, PostingList, TermId, TermStatistics};
pub use signals::{SignalSource, SignalTable};
pub use store::DiskTermStatistics;
pub use titles::{Hit, TitleStore};

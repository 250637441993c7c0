use std::collections::HashMap;
use std::path::PathBuf;

use wikisearch_core::accumulate::accumulate;
use wikisearch_core::query::QueryVector;
use wikisearch_core::select::select_candidates;
use wikisearch_core::tokenizer::tokenize;
use wikisearch_core::{
    DocId, Hit, IndexError, InvertedIndex, PostingList, RankingParams, SearchEngine, SearchError, SignalTable,
    TermStatistics, TitleStore,
};

fn titles(pairs: &[(DocId, &str)]) -> TitleStore {
    pairs.iter().map(|(id, t)| (*id, t.to_string())).collect()
}

/// Title index built from the same titles the store holds.
fn title_index(pairs: &[(DocId, &str)]) -> InvertedIndex {
    let mut idx = InvertedIndex::new();
    for (id, title) in pairs {
        idx.add_document(*id, title);
    }
    idx
}

fn params(num_docs: u64) -> RankingParams {
    RankingParams { num_docs, ..RankingParams::default() }
}

fn engine(body: InvertedIndex, pairs: &[(DocId, &str)], params: RankingParams) -> SearchEngine {
    SearchEngine::new(body, title_index(pairs), titles(pairs), params)
}

fn ids(hits: &[Hit]) -> Vec<DocId> {
    hits.iter().map(|h| h.0).collect()
}

fn hello_world() -> SearchEngine {
    let mut body = InvertedIndex::new();
    body.add_posting("hello", 1, 3);
    body.add_posting("hello", 2, 1);
    body.add_posting("world", 1, 2);
    engine(body, &[(1, "Hello World"), (2, "Hello")], params(2))
}

#[test]
fn document_matching_both_terms_ranks_first() {
    let engine = hello_world();
    let hits = engine.search("hello world", None).unwrap();
    assert_eq!(hits, vec![Hit(1, "Hello World".into()), Hit(2, "Hello".into())]);
    assert_eq!(ids(&engine.search_body("hello world", None).unwrap()), vec![1, 2]);
}

#[test]
fn empty_query_returns_nothing() {
    let engine = hello_world();
    assert!(engine.search("", None).unwrap().is_empty());
    assert!(engine.search_body("", None).unwrap().is_empty());
    assert!(engine.search_title("", None).unwrap().is_empty());
    assert!(engine.search_anchor("", None).unwrap().is_empty());
}

#[test]
fn stopword_only_query_returns_nothing() {
    let engine = hello_world();
    assert!(engine.search("the of", None).unwrap().is_empty());
}

#[test]
fn unknown_terms_return_nothing() {
    let engine = hello_world();
    assert!(engine.search("zeppelin quasar", None).unwrap().is_empty());
    // unknown terms next to a known one are just dropped
    assert_eq!(ids(&engine.search("zeppelin world", None).unwrap()), vec![1]);
}

#[test]
fn body_results_are_capped_but_title_results_are_not() {
    let mut body = InvertedIndex::new();
    let pairs: Vec<(DocId, String)> = (0..250).map(|id| (id, format!("Common topic {id}"))).collect();
    for (id, _) in &pairs {
        body.add_posting("common", *id, 1 + id % 7);
    }
    let pairs: Vec<(DocId, &str)> = pairs.iter().map(|(id, t)| (*id, t.as_str())).collect();
    let engine = engine(body, &pairs, params(10_000));

    assert_eq!(engine.search_body("common", None).unwrap().len(), 100);
    assert_eq!(engine.search("common", None).unwrap().len(), 100);
    assert_eq!(engine.search_title("common", None).unwrap().len(), 250);
}

#[test]
fn candidates_are_pruned_before_title_rerank() {
    let mut body = InvertedIndex::new();
    body.add_posting("alpha", 1, 1);
    body.add_posting("beta", 1, 1);
    body.add_posting("alpha", 2, 1);
    let pairs = [(1, "Unrelated"), (2, "Alpha Beta")];
    let boosted = RankingParams { title_boost: 1.0, ..params(100) };

    let wide = engine(body.clone(), &pairs, boosted);
    assert_eq!(ids(&wide.search("alpha beta", None).unwrap()), vec![2, 1]);

    let narrow = engine(body, &pairs, RankingParams { candidate_limit: 1, ..boosted });
    assert_eq!(ids(&narrow.search("alpha beta", None).unwrap()), vec![1]);
}

fn body_score_of(doc_id: DocId, body: &InvertedIndex, query: &str, num_docs: u64) -> f64 {
    let q = QueryVector::build(&tokenize(query), body, num_docs).unwrap();
    let acc = accumulate(&q, body, num_docs, None).unwrap();
    select_candidates(&acc, q.norm, 0.15, usize::MAX)
        .into_iter()
        .find(|c| c.doc_id == doc_id)
        .map(|c| c.score)
        .unwrap()
}

#[test]
fn raising_tf_of_underweighted_term_does_not_lower_score() {
    let build = |alpha_tf: u32| {
        let mut body = InvertedIndex::new();
        body.add_posting("alpha", 1, alpha_tf);
        body.add_posting("beta", 1, 5);
        body.set_document_frequency("alpha", 10);
        body.set_document_frequency("beta", 100);
        body
    };
    let before = body_score_of(1, &build(1), "alpha beta", 1000);
    let after = body_score_of(1, &build(2), "alpha beta", 1000);
    assert!(after >= before, "{after} < {before}");
}

#[test]
fn single_term_score_ignores_tf() {
    let mut low = InvertedIndex::new();
    low.add_posting("alpha", 1, 1);
    let mut high = InvertedIndex::new();
    high.add_posting("alpha", 1, 40);
    let (a, b) = (body_score_of(1, &low, "alpha", 50), body_score_of(1, &high, "alpha", 50));
    assert!((a - b).abs() < 1e-12, "{a} != {b}");
}

#[test]
fn covering_more_terms_ranks_higher() {
    let mut body = InvertedIndex::new();
    body.add_posting("alpha", 1, 1);
    body.add_posting("beta", 1, 1);
    body.add_posting("alpha", 2, 1);
    let engine = engine(body, &[], params(100));
    assert_eq!(ids(&engine.search_body("alpha beta", None).unwrap()), vec![1, 2]);
}

#[test]
fn repeated_queries_are_identical() {
    let mut body = InvertedIndex::new();
    for id in 0..50 {
        body.add_posting("shared", id, 1 + id % 3);
        if id % 4 == 0 {
            body.add_posting("rare", id, 2);
        }
    }
    let engine = engine(body, &[(0, "Shared rare"), (8, "Rare")], params(1000));
    let first = engine.search("shared rare", None).unwrap();
    assert_eq!(first, engine.search("shared rare", None).unwrap());
    assert_eq!(first.len(), 50);
}

fn permutations(items: &[u32]) -> Vec<Vec<u32>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

const TIED_TERMS: [&str; 4] = ["alpha", "bravo", "charlie", "delta"];

#[test]
fn equal_multi_term_scores_order_by_doc_id() {
    let mut body = InvertedIndex::new();
    // same tf vector for every doc, inserted out of id order
    for id in [42, 7, 19, 3, 88] {
        for (term, tf) in TIED_TERMS.iter().zip([7, 14, 21, 28]) {
            body.add_posting(term, id, tf);
        }
    }
    let engine = engine(body, &[], params(1000));
    let query = TIED_TERMS.join(" ");
    for _ in 0..50 {
        assert_eq!(ids(&engine.search_body(&query, None).unwrap()), vec![3, 7, 19, 42, 88]);
        assert_eq!(ids(&engine.search(&query, None).unwrap()), vec![3, 7, 19, 42, 88]);
    }
}

#[test]
fn permuted_tf_vectors_rank_the_same_every_time() {
    // every doc holds the same tf values on different terms, so all scores
    // are equal up to rounding
    let mut body = InvertedIndex::new();
    for (id, tfs) in permutations(&[7, 14, 21, 28]).into_iter().enumerate() {
        for (term, tf) in TIED_TERMS.iter().zip(tfs) {
            body.add_posting(term, id as DocId, tf);
        }
    }
    let engine = engine(body, &[], params(1000));
    let query = TIED_TERMS.join(" ");

    let first = engine.search_body(&query, None).unwrap();
    assert_eq!(first.len(), 24);
    for _ in 0..300 {
        assert_eq!(engine.search_body(&query, None).unwrap(), first);
    }
}

#[test]
fn known_term_without_postings_is_tolerated() {
    let mut body = InvertedIndex::new();
    body.add_posting("hello", 1, 1);
    body.set_document_frequency("ghost", 5);
    let engine = engine(body, &[(1, "Hello")], params(10));
    assert_eq!(ids(&engine.search("hello ghost", None).unwrap()), vec![1]);
    assert!(engine.search("ghost", None).unwrap().is_empty());
}

#[test]
fn title_search_ranks_by_distinct_matches() {
    let pairs = [(3, "Hello World"), (7, "Hello there"), (9, "Goodbye")];
    let engine = engine(InvertedIndex::new(), &pairs, params(10));
    let hits = engine.search_title("hello world hello", None).unwrap();
    assert_eq!(hits, vec![Hit(3, "Hello World".into()), Hit(7, "Hello there".into())]);
}

#[test]
fn anchor_search_without_index_is_empty() {
    let engine = hello_world();
    assert!(!engine.has_anchor_index());
    assert!(engine.search_anchor("hello", None).unwrap().is_empty());
}

#[test]
fn anchor_search_uses_anchor_postings() {
    let mut anchor = InvertedIndex::new();
    anchor.add_document(2, "hello link");
    anchor.add_document(1, "hello world link");
    let engine = hello_world().with_anchor(anchor);
    assert_eq!(ids(&engine.search_anchor("hello world", None).unwrap()), vec![1, 2]);
}

#[test]
fn signal_lookups_keep_order_and_default() {
    let engine = hello_world()
        .with_pagerank(SignalTable::new(HashMap::from([(1, 4.2)])))
        .with_pageviews(SignalTable::new(HashMap::from([(2, 10)])));
    assert_eq!(engine.pagerank(&[1, 999]), vec![4.2, 0.0]);
    assert_eq!(engine.pageviews(&[2, 1, 2]), vec![10, 0, 10]);
    assert!(engine.pagerank(&[]).is_empty());
}

struct Unreachable;

impl TermStatistics for Unreachable {
    fn document_frequency(&self, _term: &str) -> u32 { 1 }

    fn posting_list(&self, _term: &str) -> Result<PostingList<'_>, IndexError> {
        Err(IndexError::Io {
            path: PathBuf::from("postings/00000000.postings.bin"),
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store offline"),
        })
    }
}

#[test]
fn unreachable_postings_fail_the_query() {
    let engine = SearchEngine::new(Unreachable, Unreachable, TitleStore::default(), params(10));
    assert!(matches!(engine.search("hello", None), Err(SearchError::Postings { .. })));
    assert!(matches!(engine.search_title("hello", None), Err(SearchError::Postings { .. })));
}

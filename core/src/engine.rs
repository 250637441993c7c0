use crate::accumulate::accumulate;
use crate::config::RankingParams;
use crate::error::{IndexError, SearchError};
use crate::exact::rank_by_coverage;
use crate::index::TermStatistics;
use crate::persist::IndexPaths;
use crate::query::QueryVector;
use crate::rerank::rerank_by_title;
use crate::select::{select_candidates, Scored};
use crate::signals::SignalTable;
use crate::store::DiskTermStatistics;
use crate::titles::{Hit, TitleStore};
use crate::tokenizer::tokenize;
use crate::DocId;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

/// Everything a query needs, built once and shared read-only by all requests.
pub struct SearchEngine {
    body: Box<dyn TermStatistics>,
    title: Box<dyn TermStatistics>,
    anchor: Option<Box<dyn TermStatistics>>,
    titles: TitleStore,
    pagerank: SignalTable<f64>,
    pageviews: SignalTable<u64>,
    params: RankingParams,
}

impl SearchEngine {
    pub fn new(
        body: impl TermStatistics + 'static,
        title: impl TermStatistics + 'static,
        titles: TitleStore,
        params: RankingParams,
    ) -> Self {
        Self {
            body: Box::new(body),
            title: Box::new(title),
            anchor: None,
            titles,
            pagerank: SignalTable::default(),
            pageviews: SignalTable::default(),
            params,
        }
    }

    pub fn with_anchor(mut self, anchor: impl TermStatistics + 'static) -> Self {
        self.anchor = Some(Box::new(anchor));
        self
    }

    pub fn with_pagerank(mut self, pagerank: SignalTable<f64>) -> Self {
        self.pagerank = pagerank;
        self
    }

    pub fn with_pageviews(mut self, pageviews: SignalTable<u64>) -> Self {
        self.pageviews = pageviews;
        self
    }

    /// Open an on-disk index. Body and title indexes and the titles table are
    /// required; the anchor index and both signal tables are optional.
    pub fn open<P: AsRef<Path>>(root: P, params: RankingParams) -> Result<Self, IndexError> {
        let paths = IndexPaths::new(root);
        let body = DiskTermStatistics::open(paths.body().root)?;
        let title = DiskTermStatistics::open(paths.title().root)?;
        let titles = TitleStore::load(&paths)?;
        let mut engine = Self::new(body, title, titles, params)
            .with_pagerank(SignalTable::load_first("pagerank", &paths.pagerank_candidates())?)
            .with_pageviews(SignalTable::load_first("pageviews", &paths.pageviews_candidates())?);

        let anchor = paths.anchor();
        if anchor.exists() {
            engine = engine.with_anchor(DiskTermStatistics::open(anchor.root)?);
        } else {
            tracing::warn!(root = %anchor.root.display(), "no anchor index, anchor search will return nothing");
        }
        Ok(engine)
    }

    pub fn params(&self) -> &RankingParams { &self.params }

    pub fn titles(&self) -> &TitleStore { &self.titles }

    pub fn has_anchor_index(&self) -> bool { self.anchor.is_some() }

    pub fn pagerank_table(&self) -> &SignalTable<f64> { &self.pagerank }

    pub fn pageviews_table(&self) -> &SignalTable<u64> { &self.pageviews }

    /// Body cosine with coverage boost, best `limit` documents.
    fn score_body(&self, tokens: &[String], limit: usize, deadline: Option<Instant>) -> Result<Vec<Scored>, SearchError> {
        let Some(query) = QueryVector::build(tokens, self.body.as_ref(), self.params.num_docs) else {
            return Ok(Vec::new());
        };
        let acc = accumulate(&query, self.body.as_ref(), self.params.num_docs, deadline)?;
        Ok(select_candidates(&acc, query.norm, self.params.coverage_boost, limit))
    }

    /// Full pipeline: body scoring, candidate pruning, title rerank.
    pub fn search(&self, query: &str, deadline: Option<Instant>) -> Result<Vec<Hit>, SearchError> {
        let tokens = tokenize(query);
        let candidates = self.score_body(&tokens, self.params.candidate_limit, deadline)?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let query_terms: HashSet<String> = tokens.into_iter().collect();
        let ranked = rerank_by_title(
            &candidates,
            &query_terms,
            &self.titles,
            self.params.title_boost,
            self.params.result_limit,
        );
        tracing::debug!(query, candidates = candidates.len(), results = ranked.len(), "search");
        Ok(self.titles.hits(ranked.into_iter().map(|c| c.doc_id)))
    }

    /// Body cosine and coverage only, no title rerank.
    pub fn search_body(&self, query: &str, deadline: Option<Instant>) -> Result<Vec<Hit>, SearchError> {
        let tokens = tokenize(query);
        let ranked = self.score_body(&tokens, self.params.result_limit, deadline)?;
        tracing::debug!(query, results = ranked.len(), "search_body");
        Ok(self.titles.hits(ranked.into_iter().map(|c| c.doc_id)))
    }

    /// All documents with a query term in their title, by distinct-term count.
    pub fn search_title(&self, query: &str, deadline: Option<Instant>) -> Result<Vec<Hit>, SearchError> {
        self.search_exact(self.title.as_ref(), query, deadline)
    }

    /// All documents with a query term in inbound anchor text, by distinct-term
    /// count. Empty when no anchor index is loaded.
    pub fn search_anchor(&self, query: &str, deadline: Option<Instant>) -> Result<Vec<Hit>, SearchError> {
        match &self.anchor {
            Some(anchor) => self.search_exact(anchor.as_ref(), query, deadline),
            None => Ok(Vec::new()),
        }
    }

    fn search_exact(&self, stats: &dyn TermStatistics, query: &str, deadline: Option<Instant>) -> Result<Vec<Hit>, SearchError> {
        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let ranked = rank_by_coverage(&terms, stats, deadline)?;
        Ok(self.titles.hits(ranked.into_iter().map(|(doc_id, _)| doc_id)))
    }

    pub fn pagerank(&self, ids: &[DocId]) -> Vec<f64> { self.pagerank.lookup(ids) }

    pub fn pageviews(&self, ids: &[DocId]) -> Vec<u64> { self.pageviews.lookup(ids) }
}

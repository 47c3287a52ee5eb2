//! The two retrieval operations: bill summaries across the corpus and
//! passages inside one bill

use crate::embed::{EmbeddingProvider, ModelId};
use crate::query::{build_query, Column, Comparison, FilterValue, OneOf, Operator, QuerySpec};
use crate::rerank::{rerank_passages, rerank_precomputed, Passage};
use crate::store::BillStore;
use billsearch_core::{
    BillSummary, PassageMatch, PassageRequest, SearchConfig, SearchError, SearchResult,
    SummaryRequest,
};
use billsearch_text::{chunk, Normalizer};
use std::path::PathBuf;

/// Search engine over one bill database. Holds the loaded models; every call
/// opens its own read-only connection.
pub struct SearchEngine {
    db_path: PathBuf,
    config: SearchConfig,
    normalizer: Normalizer,
    embeddings: EmbeddingProvider,
}

impl SearchEngine {
    /// Load both embedding models named in `config`
    pub fn new(db_path: impl Into<PathBuf>, config: SearchConfig) -> SearchResult<Self> {
        let embeddings = EmbeddingProvider::from_config(&config)?;
        Ok(Self::with_provider(db_path, config, embeddings))
    }

    pub fn with_provider(
        db_path: impl Into<PathBuf>,
        config: SearchConfig,
        embeddings: EmbeddingProvider,
    ) -> Self {
        Self {
            db_path: db_path.into(),
            config,
            normalizer: Normalizer::new(),
            embeddings,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ranked bill summaries for `request`, at most `number_to_return` long
    pub fn retrieve_summary(&self, request: &SummaryRequest) -> SearchResult<Vec<BillSummary>> {
        let store = BillStore::open_read_only(&self.db_path)?;

        let terms = self.normalizer.remove_stopwords_and_stem(&request.query);
        if terms.is_empty() {
            tracing::debug!(query = %request.query, "no searchable terms");
            return Ok(Vec::new());
        }

        let spec = self.summary_query(request, &terms)?;
        let built = build_query(&spec)?;

        let mut candidates = store.lexical_candidates(&built)?;
        tracing::debug!(candidates = candidates.len(), "lexical stage");
        if candidates.is_empty() || request.number_to_return == 0 {
            return Ok(Vec::new());
        }

        let depth = self.config.reranking_depth.min(candidates.len());
        let tail = candidates.split_off(depth);
        let head_ids: Vec<i64> = candidates.iter().map(|c| c.bill_id).collect();

        let query_vector = self.embeddings.embed(&terms.join(" "), ModelId::Legal)?;
        let legal_name = self.embeddings.model(ModelId::Legal).name();
        let stored = store.embeddings(&head_ids, legal_name, self.config.embedding_version)?;
        tracing::debug!(
            reranked = head_ids.len(),
            with_vectors = stored.len(),
            "rerank stage"
        );

        let mut ranked = rerank_precomputed(&query_vector, candidates, &stored)?;
        ranked.extend(tail);
        ranked.truncate(request.number_to_return);

        let ids: Vec<i64> = ranked.iter().map(|c| c.bill_id).collect();
        let mut summaries = store.summaries(&ids)?;

        if request.get_sponsors {
            for summary in &mut summaries {
                summary.sponsors = Some(store.sponsors(summary.id)?);
            }
        }

        tracing::debug!(returned = summaries.len(), "summary search done");
        Ok(summaries)
    }

    /// [`Self::retrieve_summary`] over a loose JSON parameter object
    pub fn retrieve_summary_params(
        &self,
        params: &serde_json::Value,
    ) -> SearchResult<Vec<BillSummary>> {
        self.retrieve_summary(&SummaryRequest::from_params(params)?)
    }

    /// Best-matching passages of one bill's full text
    pub fn retrieve_full_text_chunks(
        &self,
        request: &PassageRequest,
        bill_id: i64,
    ) -> SearchResult<Vec<PassageMatch>> {
        let query_tokens = self.normalizer.remove_stopwords(&request.query);

        let text = {
            let store = BillStore::open_read_only(&self.db_path)?;
            store
                .full_text(bill_id)?
                .ok_or(SearchError::NotFound { bill_id })?
        };

        let passages: Vec<Passage> = chunk(&text, self.config.chunk_size, self.config.chunk_overlap)?
            .into_iter()
            .map(|c| {
                let text = c.replace('\t', " ");
                let scorable = self.normalizer.remove_stopwords(&text);
                Passage { text, scorable }
            })
            .collect();
        tracing::debug!(bill_id, chunks = passages.len(), "passage stage");

        let mut matches = rerank_passages(
            &query_tokens,
            passages,
            self.config.max_chunks_to_score,
            self.embeddings.model(ModelId::Sentence),
        )?;
        matches.truncate(request.number_to_return);
        Ok(matches)
    }

    pub fn retrieve_full_text_chunks_params(
        &self,
        params: &serde_json::Value,
        bill_id: i64,
    ) -> SearchResult<Vec<PassageMatch>> {
        self.retrieve_full_text_chunks(&PassageRequest::from_params(params)?, bill_id)
    }

    fn summary_query(&self, request: &SummaryRequest, terms: &[String]) -> SearchResult<QuerySpec> {
        let mut spec = QuerySpec::new(terms.iter().cloned())
            .with_limit(self.config.bm25_ranking_depth)
            .with_comparison(Comparison::new(
                Column::Date,
                Operator::Ge,
                FilterValue::Date(request.date_range.start),
            )?)
            .with_comparison(Comparison::new(
                Column::Date,
                Operator::Le,
                FilterValue::Date(request.date_range.end),
            )?);

        if let Some(publisher) = request.chamber.publisher() {
            spec = spec.with_comparison(Comparison::new(
                Column::Publisher,
                Operator::Eq,
                FilterValue::Text(publisher.to_string()),
            )?);
        }

        if request.require_bipartisan {
            spec = spec.with_comparison(Comparison::new(
                Column::MultipleParties,
                Operator::Eq,
                FilterValue::Bool(true),
            )?);
        }

        if let Some(types) = request.legislative_types.as_ref().filter(|t| !t.is_empty()) {
            spec = spec.with_one_of(OneOf::new(
                Column::LegisType,
                types.iter().cloned().map(FilterValue::Text).collect(),
            )?);
        }

        for substring in request.exact_match_strings.iter().filter(|s| !s.is_empty()) {
            spec = spec.with_exact_match(substring.as_str());
        }

        if let Some(bill_type) = &self.config.bill_type_restriction {
            spec = spec.restricted_to_bill_type(bill_type.as_str());
        }

        Ok(spec)
    }
}

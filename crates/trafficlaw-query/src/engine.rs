//! The question-answering pipeline.
//!
//! Normalize, gate on token count, detect the vehicle category, restrict the
//! candidate set, embed, then take the best cosine match at or above the
//! confidence threshold. Every stage that drops a query does so as a clean
//! "no match", never an error; errors are reserved for provider failures.

use tracing::debug;

use trafficlaw_ai::EmbeddingProvider;
use trafficlaw_core::{ViolationRecord, detect_category, normalize};
use trafficlaw_store::CatalogIndex;

use crate::error::QueryError;
use crate::matcher::find_best;

/// Minimum cosine similarity for an answer.
pub const DEFAULT_THRESHOLD: f32 = 0.45;

/// Queries with fewer whitespace tokens than this are rejected outright.
pub const DEFAULT_MIN_TOKENS: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    pub threshold: f32,
    pub min_tokens: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_tokens: DEFAULT_MIN_TOKENS,
        }
    }
}

/// Answers free-text questions against an indexed catalog.
pub struct QueryEngine<P> {
    index: CatalogIndex,
    provider: P,
    config: MatchConfig,
}

impl<P: EmbeddingProvider> QueryEngine<P> {
    pub fn new(index: CatalogIndex, provider: P) -> Self {
        Self::with_config(index, provider, MatchConfig::default())
    }

    pub fn with_config(index: CatalogIndex, provider: P, config: MatchConfig) -> Self {
        Self {
            index,
            provider,
            config,
        }
    }

    pub fn config(&self) -> MatchConfig {
        self.config
    }

    /// The best-matching violation for a raw user question, if any scores at
    /// or above the threshold.
    ///
    /// `Ok(None)` covers every benign miss: too few tokens, no catalog rows
    /// for the detected category, or nothing similar enough.
    pub fn find_violation(&mut self, raw: &str) -> Result<Option<&ViolationRecord>, QueryError> {
        let normalized = normalize(raw);

        if normalized.split_whitespace().count() < self.config.min_tokens {
            debug!(%normalized, "query below minimum token count");
            return Ok(None);
        }

        let category = detect_category(&normalized);
        let candidates = self.index.filter_by_category(category);
        debug!(?category, candidates = candidates.len(), "category filter");
        if candidates.is_empty() {
            return Ok(None);
        }

        let query_vec = self.provider.embed(&normalized)?;
        if query_vec.len() != self.index.dim() {
            return Err(QueryError::DimensionMismatch {
                expected: self.index.dim(),
                got: query_vec.len(),
            });
        }

        match find_best(&query_vec, &candidates, &self.index, self.config.threshold) {
            Some((i, score)) => {
                debug!(best = i, score, "matched violation");
                Ok(Some(self.index.record(i)))
            }
            None => {
                debug!("no candidate at or above threshold");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use trafficlaw_ai::{EmbedError, HashingEmbedder};
    use trafficlaw_core::VehicleCategory;

    fn record(
        description: &str,
        name: &str,
        category: Option<VehicleCategory>,
    ) -> ViolationRecord {
        ViolationRecord {
            description: description.to_string(),
            violation_name: Some(name.to_string()),
            legal_article: Some("Điều 6".to_string()),
            penalty_amount: Some("800.000đ".to_string()),
            points_deducted: Some(4),
            vehicle_category: category,
        }
    }

    fn catalog() -> Vec<ViolationRecord> {
        vec![
            record(
                "xe máy vượt đèn đỏ",
                "Vượt đèn đỏ",
                Some(VehicleCategory::MotorbikeOrMoped),
            ),
            record(
                "ô tô chạy quá tốc độ quy định",
                "Chạy quá tốc độ",
                Some(VehicleCategory::Car),
            ),
            record(
                "xe máy chạy quá tốc độ quy định",
                "Chạy quá tốc độ (xe máy)",
                Some(VehicleCategory::MotorbikeOrMoped),
            ),
        ]
    }

    fn engine() -> QueryEngine<HashingEmbedder> {
        let mut provider = HashingEmbedder::default();
        let index = CatalogIndex::build(catalog(), &mut provider).unwrap();
        QueryEngine::new(index, provider)
    }

    #[test]
    fn new_engine_uses_the_default_config() {
        let engine = engine();
        let config = engine.config();
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.min_tokens, DEFAULT_MIN_TOKENS);
    }

    #[test]
    fn verbatim_description_returns_its_record() {
        let mut engine = engine();
        let hit = engine.find_violation("xe máy vượt đèn đỏ").unwrap().unwrap();
        assert_eq!(hit.violation_name.as_deref(), Some("Vượt đèn đỏ"));
        assert_eq!(hit.penalty_amount.as_deref(), Some("800.000đ"));
    }

    #[test]
    fn casing_and_punctuation_are_normalised_away() {
        let mut engine = engine();
        let hit = engine
            .find_violation("  Xe Máy VƯỢT đèn đỏ?!  ")
            .unwrap()
            .unwrap();
        assert_eq!(hit.violation_name.as_deref(), Some("Vượt đèn đỏ"));
    }

    #[test]
    fn detected_category_restricts_the_candidates() {
        let mut engine = engine();
        // Both speed records share most tokens; the motorbike term must pick
        // the motorbike row, not the car row.
        let hit = engine
            .find_violation("xe máy chạy quá tốc độ quy định")
            .unwrap()
            .unwrap();
        assert_eq!(
            hit.vehicle_category,
            Some(VehicleCategory::MotorbikeOrMoped)
        );
        assert_eq!(hit.violation_name.as_deref(), Some("Chạy quá tốc độ (xe máy)"));
    }

    #[test]
    fn no_vehicle_term_searches_the_whole_catalog() {
        let mut engine = engine();
        let hit = engine
            .find_violation("vượt đèn đỏ bị phạt bao nhiêu")
            .unwrap()
            .unwrap();
        assert_eq!(hit.violation_name.as_deref(), Some("Vượt đèn đỏ"));
    }

    #[test]
    fn dissimilar_query_in_category_returns_none() {
        let mut engine = engine();
        // Category matches rows, but the content shares no tokens with them.
        let miss = engine.find_violation("mô tô chở ba người lớn").unwrap();
        assert!(miss.is_none());
    }

    /// Wraps the hashing embedder and counts embed calls.
    struct Counting {
        inner: HashingEmbedder,
        calls: Rc<Cell<usize>>,
    }

    impl EmbeddingProvider for Counting {
        fn embed(&mut self, text: &str) -> Result<Vec<f32>, EmbedError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.embed(text)
        }

        fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.embed_batch(texts)
        }

        fn dim(&self) -> usize {
            self.inner.dim()
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn counting_engine(records: Vec<ViolationRecord>) -> (QueryEngine<Counting>, Rc<Cell<usize>>) {
        let mut build_provider = HashingEmbedder::default();
        let index = CatalogIndex::build(records, &mut build_provider).unwrap();
        let calls = Rc::new(Cell::new(0));
        let provider = Counting {
            inner: HashingEmbedder::default(),
            calls: Rc::clone(&calls),
        };
        (QueryEngine::new(index, provider), calls)
    }

    #[test]
    fn short_query_is_rejected_before_embedding() {
        let (mut engine, calls) = counting_engine(catalog());
        assert!(engine.find_violation("đèn").unwrap().is_none());
        assert!(engine.find_violation("   ").unwrap().is_none());
        assert!(engine.find_violation("!!!").unwrap().is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn category_without_rows_misses_before_embedding() {
        let (mut engine, calls) = counting_engine(catalog());
        // No pedestrian rows exist in the catalog.
        assert!(engine.find_violation("đi bộ qua đường").unwrap().is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn category_filter_blocks_cross_category_leakage() {
        // The motorbike row shares almost every token with the car query, so
        // raw similarity would clear the threshold. The car filter leaves no
        // candidates, so the query misses without touching the provider.
        let records = vec![record(
            "xe máy đậu sai quy định",
            "Đậu sai quy định",
            Some(VehicleCategory::MotorbikeOrMoped),
        )];
        let (mut engine, calls) = counting_engine(records);
        assert!(
            engine
                .find_violation("ô tô đậu sai quy định")
                .unwrap()
                .is_none()
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_catalog_always_misses() {
        let (mut engine, calls) = counting_engine(vec![]);
        assert!(
            engine
                .find_violation("vượt đèn đỏ bị phạt bao nhiêu")
                .unwrap()
                .is_none()
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn repeat_queries_give_the_same_answer() {
        let mut engine = engine();
        let first = engine
            .find_violation("xe máy vượt đèn đỏ")
            .unwrap()
            .cloned();
        let second = engine
            .find_violation("xe máy vượt đèn đỏ")
            .unwrap()
            .cloned();
        assert_eq!(first, second);
    }

    #[test]
    fn tie_between_identical_rows_returns_the_first() {
        let records = vec![
            record("đỗ xe trên vỉa hè", "first", None),
            record("đỗ xe trên vỉa hè", "second", None),
        ];
        let mut provider = HashingEmbedder::default();
        let index = CatalogIndex::build(records, &mut provider).unwrap();
        let mut engine = QueryEngine::new(index, provider);

        let hit = engine.find_violation("đỗ xe trên vỉa hè").unwrap().unwrap();
        assert_eq!(hit.violation_name.as_deref(), Some("first"));
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let mut provider = HashingEmbedder::default();
        let index = CatalogIndex::build(catalog(), &mut provider).unwrap();
        let config = MatchConfig {
            threshold: 0.999,
            min_tokens: DEFAULT_MIN_TOKENS,
        };
        let mut engine = QueryEngine::with_config(index, provider, config);

        // Verbatim still scores 1.0; a paraphrase no longer clears the bar.
        assert!(
            engine
                .find_violation("xe máy vượt đèn đỏ")
                .unwrap()
                .is_some()
        );
        assert!(
            engine
                .find_violation("vượt đèn đỏ bị phạt bao nhiêu")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn custom_min_tokens_is_honoured() {
        let records = vec![record("độc thoại", "one", None)];
        let mut provider = HashingEmbedder::default();
        let index = CatalogIndex::build(records, &mut provider).unwrap();
        let config = MatchConfig {
            threshold: DEFAULT_THRESHOLD,
            min_tokens: 1,
        };
        let mut engine = QueryEngine::with_config(index, provider, config);
        // A single token clears a min_tokens of 1 and half-matches the row.
        assert!(engine.find_violation("độc").unwrap().is_some());
    }

    /// Provider whose embed always fails.
    struct Failing;

    impl EmbeddingProvider for Failing {
        fn embed(&mut self, _text: &str) -> Result<Vec<f32>, EmbedError> {
            Err(EmbedError::Unavailable("offline".into()))
        }

        fn embed_batch(&mut self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Err(EmbedError::Unavailable("offline".into()))
        }

        fn dim(&self) -> usize {
            HashingEmbedder::DEFAULT_DIM
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn provider_failure_surfaces_as_an_error() {
        let mut build_provider = HashingEmbedder::default();
        let index = CatalogIndex::build(catalog(), &mut build_provider).unwrap();
        let mut engine = QueryEngine::new(index, Failing);

        let err = engine
            .find_violation("vượt đèn đỏ bị phạt bao nhiêu")
            .unwrap_err();
        assert!(matches!(err, QueryError::Embed(_)));
    }

    /// Provider that returns vectors shorter than it declares.
    struct WrongDim;

    impl EmbeddingProvider for WrongDim {
        fn embed(&mut self, _text: &str) -> Result<Vec<f32>, EmbedError> {
            Ok(vec![1.0; 3])
        }

        fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
            Ok(texts.iter().map(|_| vec![1.0; 3]).collect())
        }

        fn dim(&self) -> usize {
            HashingEmbedder::DEFAULT_DIM
        }

        fn name(&self) -> &str {
            "wrong-dim"
        }
    }

    #[test]
    fn query_vector_dimension_is_checked_against_the_index() {
        let mut build_provider = HashingEmbedder::default();
        let index = CatalogIndex::build(catalog(), &mut build_provider).unwrap();
        let mut engine = QueryEngine::new(index, WrongDim);

        let err = engine
            .find_violation("vượt đèn đỏ bị phạt bao nhiêu")
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::DimensionMismatch {
                expected: 256,
                got: 3
            }
        ));
    }
}

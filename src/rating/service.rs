use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument, warn};

use super::config::RatingConfig;
use super::error::RatingError;
use super::stats::{RatingStats, RatingStatsSnapshot};
use crate::cache::{CacheStats, CacheStatus, CacheStoreHandle};
use crate::metrics::{MetricsBundle, MetricsProvider};
use crate::processing;
use crate::resource::{RatingInput, Resource, ResourceId};
use crate::scoring::{CriterionScores, ScoreCalculator, WeightTable};

/// One input that [`RatingService::rate_batch_report`] skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSkip {
    /// Position in the submitted input list.
    pub index: usize,
    pub resource_id: ResourceId,
    /// [`RatingError::kind`] of the failure.
    pub kind: &'static str,
    pub reason: String,
}

/// Outcome of a batch: rated resources in input order, plus skipped inputs.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rated: Vec<Resource>,
    pub skipped: Vec<BatchSkip>,
}

/// Drives a rating request through cache lookup, staleness check, validation,
/// metrics gathering, scoring and cache write.
///
/// The cache lock is only held inside individual cache calls, never across metrics
/// gathering or scoring. Two concurrent requests for the same identity may both
/// compute; the last write wins.
pub struct RatingService<P: MetricsProvider> {
    cache: CacheStoreHandle,
    provider: P,
    calculator: ScoreCalculator,
    config: RatingConfig,
    stats: Arc<RatingStats>,
}

impl<P: MetricsProvider> std::fmt::Debug for RatingService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingService")
            .field("cache", &self.cache)
            .field("calculator", &self.calculator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<P: MetricsProvider> RatingService<P> {
    pub fn new(
        cache: CacheStoreHandle,
        provider: P,
        calculator: ScoreCalculator,
        config: RatingConfig,
    ) -> Self {
        Self {
            cache,
            provider,
            calculator,
            config,
            stats: Arc::new(RatingStats::new()),
        }
    }

    /// Replaces the statistics accumulator, e.g. to share one across services.
    pub fn with_stats(mut self, stats: Arc<RatingStats>) -> Self {
        self.stats = stats;
        self
    }

    pub fn cache(&self) -> &CacheStoreHandle {
        &self.cache
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn stats_handle(&self) -> &Arc<RatingStats> {
        &self.stats
    }

    /// Rates one resource.
    ///
    /// A fresh cached rating is returned as is unless `force_refresh` is set.
    /// Validation, metrics and scoring errors propagate; the resource is then not cached.
    #[instrument(skip_all, fields(resource_id = tracing::field::Empty, force_refresh))]
    pub fn rate(
        &self,
        input: impl Into<RatingInput>,
        force_refresh: bool,
    ) -> Result<Resource, RatingError> {
        let input = input.into();
        let id = input.resource_id();
        tracing::Span::current().record("resource_id", id.as_str());
        self.stats.record_request();

        if !force_refresh
            && let Some(cached) = self.load_cached(&id)
        {
            if !cached.is_stale(self.config.max_age) {
                debug!("Serving fresh cached rating");
                self.stats.record_hit();
                return Ok(cached);
            }
            debug!(last_rated = ?cached.last_rated(), "Cached rating is stale");
            self.stats.record_stale();
        } else {
            self.stats.record_miss();
        }

        match self.compute(input, id) {
            Ok(resource) => {
                self.store(&resource);
                Ok(resource)
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    /// Rates `inputs` in sequential chunks of `batch_size` (`0` = one chunk) and returns
    /// only the successes, in input order. Failures are logged and skipped.
    pub fn rate_batch(&self, inputs: Vec<RatingInput>, batch_size: usize) -> Vec<Resource> {
        self.rate_batch_report(inputs, batch_size).rated
    }

    /// Like [`rate_batch`](Self::rate_batch), also reporting which inputs were skipped.
    #[instrument(skip_all, fields(total = inputs.len(), batch_size))]
    pub fn rate_batch_report(&self, inputs: Vec<RatingInput>, batch_size: usize) -> BatchReport {
        let total = inputs.len();
        let chunk_size = if batch_size == 0 { total.max(1) } else { batch_size };
        let mut report = BatchReport {
            rated: Vec::with_capacity(total),
            skipped: Vec::new(),
        };

        let mut inputs = inputs.into_iter().enumerate().peekable();
        let mut chunk_index = 0usize;
        while inputs.peek().is_some() {
            let chunk: Vec<(usize, RatingInput)> = inputs.by_ref().take(chunk_size).collect();
            debug!(chunk = chunk_index, size = chunk.len(), "Rating batch chunk");

            for (index, input) in chunk {
                let id = input.resource_id();
                match self.rate(input, false) {
                    Ok(resource) => report.rated.push(resource),
                    Err(e) => {
                        warn!(
                            index,
                            resource_id = %id,
                            kind = e.kind(),
                            error = %e,
                            "Skipping resource in batch"
                        );
                        self.stats.record_batch_skip();
                        report.skipped.push(BatchSkip {
                            index,
                            resource_id: id,
                            kind: e.kind(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
            chunk_index += 1;
        }

        info!(
            rated = report.rated.len(),
            skipped = report.skipped.len(),
            "Batch rating complete"
        );
        report
    }

    /// The cached rating for `id`, whether or not it is stale. `None` on a miss or an
    /// unreadable snapshot.
    pub fn get_cached_rating(&self, id: &ResourceId) -> Option<Resource> {
        self.load_cached(id)
    }

    pub fn clear_rating_cache(&self) {
        self.cache.clear();
        info!("Rating cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn stats(&self) -> RatingStatsSnapshot {
        self.stats.snapshot()
    }

    fn load_cached(&self, id: &ResourceId) -> Option<Resource> {
        let (bytes, status) = self.cache.lookup(id.as_str());
        if status == CacheStatus::Expired {
            debug!(resource_id = %id, "Cached rating expired");
        }
        let bytes = bytes?;

        match serde_json::from_slice::<Resource>(&bytes) {
            Ok(resource) if resource.is_well_formed() && resource.id() == id => Some(resource),
            Ok(_) => {
                warn!(resource_id = %id, "Cached rating violates score invariants, discarding");
                self.discard_corrupt(id);
                None
            }
            Err(e) => {
                warn!(resource_id = %id, error = %e, "Cached rating unreadable, discarding");
                self.discard_corrupt(id);
                None
            }
        }
    }

    fn discard_corrupt(&self, id: &ResourceId) {
        self.stats.record_corrupt();
        self.cache.delete(id.as_str());
    }

    fn compute(&self, input: RatingInput, id: ResourceId) -> Result<Resource, RatingError> {
        let mut resource = processing::prepare(input)?;
        debug_assert_eq!(resource.id(), &id);

        let bundle = self.provider.collect(&resource.content, &resource.metadata)?;

        let scores = self
            .calculator
            .score_bundle(&bundle, resource.metadata.has_cta());
        for (criterion, score) in &scores {
            resource.update_score(*criterion, *score);
        }

        let review_count = resource.metadata.review_count();
        let final_score = self
            .calculator
            .calculate_final_score(resource.scores(), review_count)?;

        let rated_at = Utc::now();
        let provenance = provenance(
            &bundle,
            resource.scores(),
            self.calculator.weights(),
            review_count,
            rated_at,
        );
        resource.set_final_score(final_score, provenance, rated_at)?;
        self.stats.record_computation();

        info!(resource_id = %id, final_score, review_count, "Rated resource");
        Ok(resource)
    }

    fn store(&self, resource: &Resource) {
        match serde_json::to_vec(resource) {
            Ok(bytes) => self
                .cache
                .put(resource.id().as_str(), bytes, self.config.cache_ttl),
            Err(e) => {
                warn!(resource_id = %resource.id(), error = %e, "Failed to serialize rating, not cached");
            }
        }
    }
}

/// Provenance recorded alongside a final score.
fn provenance(
    bundle: &MetricsBundle,
    scores: &CriterionScores,
    weights: &WeightTable,
    review_count: u64,
    rated_at: DateTime<Utc>,
) -> Map<String, Value> {
    let breakdown: Map<String, Value> = scores
        .iter()
        .map(|(criterion, score)| {
            let weight = weights.weight(*criterion);
            (
                criterion.as_str().to_string(),
                json!({
                    "score": score,
                    "weight": weight,
                    "weighted": score * weight,
                }),
            )
        })
        .collect();

    let mut map = Map::new();
    map.insert("content_metrics".into(), bundle.content_metrics());
    map.insert("engagement_metrics".into(), json!(bundle.engagement));
    map.insert("authority_metrics".into(), json!(bundle.authority));
    map.insert("impact_metrics".into(), json!(bundle.impact));
    map.insert("calculation_timestamp".into(), json!(rated_at.to_rfc3339()));
    map.insert("review_count".into(), json!(review_count));
    map.insert("score_breakdown".into(), Value::Object(breakdown));
    map
}

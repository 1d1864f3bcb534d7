use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::input::RatingResult;
use super::types::{ResourceId, ResourceMetadata};
use crate::scoring::{
    Criterion, CriterionScores, MAX_FINAL_SCORE, MIN_FINAL_SCORE, ScoreCalculator, ScoringError,
};

/// A rated (or to-be-rated) content item.
///
/// Criterion scores are always within `[0, 10]` and the final score within `[1, 10]`;
/// both are clamped on write. A final score is only ever present together with all
/// five criterion scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    resource_id: ResourceId,
    pub title: String,
    pub author: String,
    pub url: String,
    pub publication_date: DateTime<Utc>,
    pub metadata: ResourceMetadata,
    pub content: String,
    #[serde(default)]
    scores: CriterionScores,
    #[serde(default)]
    final_score: Option<f64>,
    #[serde(default)]
    rating_metadata: Map<String, Value>,
    #[serde(default)]
    last_rated: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(
        resource_id: ResourceId,
        title: impl Into<String>,
        author: impl Into<String>,
        url: impl Into<String>,
        publication_date: DateTime<Utc>,
        metadata: ResourceMetadata,
        content: impl Into<String>,
    ) -> Self {
        Self {
            resource_id,
            title: title.into(),
            author: author.into(),
            url: url.into(),
            publication_date,
            metadata,
            content: content.into(),
            scores: CriterionScores::new(),
            final_score: None,
            rating_metadata: Map::new(),
            last_rated: None,
        }
    }

    #[inline]
    pub fn id(&self) -> &ResourceId {
        &self.resource_id
    }

    pub fn scores(&self) -> &CriterionScores {
        &self.scores
    }

    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.scores.get(&criterion).copied()
    }

    pub fn final_score(&self) -> Option<f64> {
        self.final_score
    }

    pub fn rating_metadata(&self) -> &Map<String, Value> {
        &self.rating_metadata
    }

    pub fn last_rated(&self) -> Option<DateTime<Utc>> {
        self.last_rated
    }

    pub fn is_rated(&self) -> bool {
        self.final_score.is_some()
    }

    /// Sets one criterion score, clamped to `[0, 10]` (NaN becomes 0).
    pub fn update_score(&mut self, criterion: Criterion, score: f64) {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 10.0) };
        self.scores.insert(criterion, score);
    }

    /// Drops scores, final score and provenance before a recomputation.
    pub fn reset_rating(&mut self) {
        self.scores.clear();
        self.final_score = None;
        self.rating_metadata.clear();
        self.last_rated = None;
    }

    /// Completes the rating: final score clamped to `[1, 10]`, provenance merged into
    /// `rating_metadata`, `last_rated` set to `rated_at`.
    ///
    /// Fails if any of the five criterion scores is missing.
    pub fn set_final_score(
        &mut self,
        score: f64,
        provenance: Map<String, Value>,
        rated_at: DateTime<Utc>,
    ) -> Result<(), ScoringError> {
        ScoreCalculator::check_complete(&self.scores)?;

        let score = if score.is_nan() {
            MIN_FINAL_SCORE
        } else {
            score.clamp(MIN_FINAL_SCORE, MAX_FINAL_SCORE)
        };
        self.final_score = Some(score);
        self.rating_metadata.extend(provenance);
        self.last_rated = Some(rated_at);
        Ok(())
    }

    /// Stale if never rated or rated more than `max_age` before `now`.
    pub fn is_stale_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        let Some(last_rated) = self.last_rated else {
            return true;
        };
        match TimeDelta::from_std(max_age) {
            Ok(max_age) => now - last_rated > max_age,
            // Larger than chrono can represent: never stale.
            Err(_) => false,
        }
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.is_stale_at(Utc::now(), max_age)
    }

    /// Whether a deserialized snapshot upholds the score invariants.
    pub fn is_well_formed(&self) -> bool {
        let scores_in_range = self
            .scores
            .values()
            .all(|s| (0.0..=10.0).contains(s));
        let final_ok = match self.final_score {
            Some(f) => {
                (MIN_FINAL_SCORE..=MAX_FINAL_SCORE).contains(&f)
                    && ScoreCalculator::check_complete(&self.scores).is_ok()
            }
            None => true,
        };
        scores_in_range && final_ok
    }

    /// The stable result shape; `None` until the resource has been rated.
    pub fn to_rating_result(&self) -> Option<RatingResult> {
        let final_score = self.final_score?;
        let rating_timestamp = self.last_rated?;
        Some(RatingResult {
            resource_id: self.resource_id.clone(),
            title: self.title.clone(),
            scores: self.scores.clone(),
            final_score,
            rating_timestamp,
            metadata: self.rating_metadata.clone(),
        })
    }
}

use tracing::debug;

use super::error::ScoringError;
use super::types::{Criterion, CriterionScores, WeightTable};
use crate::constants::{DEFAULT_CRITERION_MAX, REVIEW_COUNT_BONUS_THRESHOLD};
use crate::metrics::MetricsBundle;

/// Lowest possible criterion score.
pub const MIN_CRITERION_SCORE: f64 = 0.0;
/// Highest possible criterion score.
pub const MAX_CRITERION_SCORE: f64 = 10.0;
/// Floor of the final score; distinguishes "rated low" from "unrated".
pub const MIN_FINAL_SCORE: f64 = 1.0;
/// Ceiling of the final score.
pub const MAX_FINAL_SCORE: f64 = 10.0;

/// Applied when any criterion reaches this score.
pub const EXCELLENCE_THRESHOLD: f64 = 9.5;
pub const EXCELLENCE_BONUS: f64 = 0.5;
/// Applied when any criterion falls to this score.
pub const WEAKNESS_THRESHOLD: f64 = 3.0;
pub const WEAKNESS_PENALTY: f64 = 0.5;
/// Applied when the review count reaches [`REVIEW_COUNT_BONUS_THRESHOLD`].
pub const REVIEW_COUNT_BONUS: f64 = 0.2;

/// Clamps to `[0, 10]`; NaN becomes `0`.
#[inline]
fn clamp_criterion(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_CRITERION_SCORE;
    }
    value.clamp(MIN_CRITERION_SCORE, MAX_CRITERION_SCORE)
}

/// `numerator / denominator * 10`, clamped; `0` for a non-positive denominator.
#[inline]
fn ratio_score(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || denominator.is_nan() {
        return MIN_CRITERION_SCORE;
    }
    clamp_criterion(numerator / denominator * 10.0)
}

/// Deterministic criterion and final score computation.
///
/// Holds only the validated, read-only weight table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCalculator {
    weights: WeightTable,
}

impl ScoreCalculator {
    /// Fails with a configuration error if the weights do not sum to 1.0.
    pub fn new(weights: WeightTable) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Calculator over [`WeightTable::STANDARD`].
    pub fn standard() -> Self {
        Self {
            weights: WeightTable::STANDARD,
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn calculate_relevance(&self, matched_keywords: u64, total_keywords: u64) -> f64 {
        if total_keywords == 0 {
            return MIN_CRITERION_SCORE;
        }
        ratio_score(matched_keywords as f64, total_keywords as f64)
    }

    pub fn calculate_authority(&self, citations: f64, credentials_score: f64, max_authority: f64) -> f64 {
        ratio_score(citations + credentials_score, max_authority)
    }

    pub fn calculate_engagement(
        &self,
        interactions: f64,
        session_time: f64,
        social_shares: f64,
        max_engagement: f64,
    ) -> f64 {
        ratio_score(interactions + session_time * 2.0 + social_shares, max_engagement)
    }

    pub fn calculate_clarity(
        &self,
        readability: f64,
        usability_features: f64,
        has_cta: bool,
        max_clarity: f64,
    ) -> f64 {
        let cta = if has_cta { 1.0 } else { 0.0 };
        ratio_score(
            readability / 100.0 * 5.0 + usability_features * 0.5 + cta,
            max_clarity,
        )
    }

    pub fn calculate_impact(&self, positive_outcomes: f64, tangible_metrics: f64, max_impact: f64) -> f64 {
        ratio_score(positive_outcomes + tangible_metrics, max_impact)
    }

    /// Maps a metrics bundle to all five criterion scores.
    pub fn score_bundle(&self, bundle: &MetricsBundle, has_cta: bool) -> CriterionScores {
        let max = DEFAULT_CRITERION_MAX;
        let mut scores = CriterionScores::new();

        scores.insert(
            Criterion::Relevance,
            self.calculate_relevance(bundle.keyword_count, bundle.word_count),
        );
        scores.insert(
            Criterion::Authority,
            self.calculate_authority(
                bundle.authority.citation_impact,
                bundle.authority.author_expertise,
                max,
            ),
        );
        scores.insert(
            Criterion::Engagement,
            self.calculate_engagement(
                bundle.engagement.interaction_rate,
                bundle.engagement.avg_session_time,
                bundle.engagement.social_impact,
                max,
            ),
        );
        scores.insert(
            Criterion::Clarity,
            self.calculate_clarity(
                bundle.readability_score,
                bundle.keyword_count as f64,
                has_cta,
                max,
            ),
        );
        scores.insert(
            Criterion::Impact,
            self.calculate_impact(
                bundle.impact.outcome_effectiveness,
                bundle.impact.conversion_impact,
                max,
            ),
        );

        scores
    }

    /// Checks that all five criteria are present and finite.
    pub fn check_complete(scores: &CriterionScores) -> Result<(), ScoringError> {
        let missing: Vec<Criterion> = Criterion::ALL
            .into_iter()
            .filter(|c| !scores.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(ScoringError::MissingCriteria { missing });
        }

        if let Some((criterion, _)) = scores.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ScoringError::NonFiniteScore {
                criterion: *criterion,
            });
        }

        Ok(())
    }

    /// Weighted sum of the (clamped) criterion scores. Absent criteria contribute nothing.
    pub fn weighted_sum(&self, scores: &CriterionScores) -> f64 {
        scores
            .iter()
            .map(|(criterion, score)| clamp_criterion(*score) * self.weights.weight(*criterion))
            .sum()
    }

    /// Excellence bonus and weakness penalty; both may apply.
    pub fn apply_modifiers(scores: &CriterionScores) -> f64 {
        let mut modifier = 0.0;
        if scores.values().any(|s| *s >= EXCELLENCE_THRESHOLD) {
            modifier += EXCELLENCE_BONUS;
        }
        if scores.values().any(|s| *s <= WEAKNESS_THRESHOLD) {
            modifier -= WEAKNESS_PENALTY;
        }
        modifier
    }

    /// `clamp(weighted_sum + modifiers, 1, 10)`.
    pub fn calculate_final_score(
        &self,
        scores: &CriterionScores,
        review_count: u64,
    ) -> Result<f64, ScoringError> {
        Self::check_complete(scores)?;

        let weighted = self.weighted_sum(scores);
        let mut modifier = Self::apply_modifiers(scores);
        if review_count >= REVIEW_COUNT_BONUS_THRESHOLD {
            modifier += REVIEW_COUNT_BONUS;
        }

        let final_score = (weighted + modifier).clamp(MIN_FINAL_SCORE, MAX_FINAL_SCORE);

        debug!(weighted, modifier, review_count, final_score, "Calculated final score");

        Ok(final_score)
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

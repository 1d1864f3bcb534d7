//! Score calculator: five criterion scores and a weighted final score.
//!
//! Everything here is pure. Given identical inputs the calculator always returns the
//! same scores; it performs no I/O and keeps no mutable state.
//!
//! # Final score
//!
//! ```text
//! final = clamp(sum(score[c] * weight[c]) + modifiers, 1, 10)
//! ```
//!
//! Modifiers are `+0.5` if any criterion is `>= 9.5`, `-0.5` if any is `<= 3.0`, and
//! `+0.2` when the review count reaches 500. The floor of `1` keeps a rated resource
//! distinguishable from an unrated one.

pub mod calculator;
pub mod error;
pub mod types;


pub use calculator::{MAX_FINAL_SCORE, MIN_FINAL_SCORE, ScoreCalculator};
pub use error::ScoringError;
pub use types::{Criterion, CriterionScores, WeightTable};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ScoringError;
use crate::constants::WEIGHT_SUM_TOLERANCE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The five fixed rating criteria.
pub enum Criterion {
    Relevance,
    Authority,
    Engagement,
    Clarity,
    Impact,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Relevance,
        Criterion::Authority,
        Criterion::Engagement,
        Criterion::Clarity,
        Criterion::Impact,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Relevance => "relevance",
            Criterion::Authority => "authority",
            Criterion::Engagement => "engagement",
            Criterion::Clarity => "clarity",
            Criterion::Impact => "impact",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "authority" => Ok(Self::Authority),
            "engagement" => Ok(Self::Engagement),
            "clarity" => Ok(Self::Clarity),
            "impact" => Ok(Self::Impact),
            _ => Err(format!("Unknown criterion: {}", s)),
        }
    }
}

/// Criterion name to score in `[0, 10]`.
pub type CriterionScores = BTreeMap<Criterion, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Per-criterion weights for the final score. Must sum to 1.0.
pub struct WeightTable {
    pub relevance: f64,
    pub authority: f64,
    pub engagement: f64,
    pub clarity: f64,
    pub impact: f64,
}

impl WeightTable {
    /// relevance 0.25, authority 0.20, engagement 0.20, clarity 0.15, impact 0.20.
    pub const STANDARD: WeightTable = WeightTable {
        relevance: 0.25,
        authority: 0.20,
        engagement: 0.20,
        clarity: 0.15,
        impact: 0.20,
    };

    #[inline]
    pub fn weight(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Relevance => self.relevance,
            Criterion::Authority => self.authority,
            Criterion::Engagement => self.engagement,
            Criterion::Clarity => self.clarity,
            Criterion::Impact => self.impact,
        }
    }

    pub fn sum(&self) -> f64 {
        Criterion::ALL.iter().map(|c| self.weight(*c)).sum()
    }

    /// Checks each weight is finite and non-negative and the total is 1.0 ± 1e-4.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for criterion in Criterion::ALL {
            let weight = self.weight(criterion);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidWeight { criterion, weight });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeightSum { sum });
        }

        Ok(())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::STANDARD
    }
}

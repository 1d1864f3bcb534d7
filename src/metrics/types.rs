use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A keyword and its frequency in the analyzed text.
pub struct KeywordFrequency {
    pub word: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Output of a [`TextAnalyzer`](super::TextAnalyzer).
pub struct TextAnalysis {
    pub word_count: u64,
    pub sentence_count: u64,
    pub avg_sentence_length: f64,
    /// Flesch reading ease in `[0, 100]`.
    pub readability_score: f64,
    /// Most frequent non-stop-words, most frequent first.
    pub keywords: Vec<KeywordFrequency>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Engagement signals normalized to a 10-point scale.
pub struct EngagementMetrics {
    pub interaction_rate: f64,
    pub avg_session_time: f64,
    pub social_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Authority signals normalized to a 10-point scale.
pub struct AuthorityMetrics {
    pub citation_impact: f64,
    pub author_expertise: f64,
    pub domain_authority: f64,
    pub overall_authority: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Impact signals normalized to a 10-point scale.
pub struct ImpactMetrics {
    pub outcome_effectiveness: f64,
    pub conversion_impact: f64,
    pub user_satisfaction: f64,
    pub overall_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Everything the score calculator consumes for one resource.
pub struct MetricsBundle {
    pub word_count: u64,
    pub keyword_count: u64,
    /// `0..=100`.
    pub readability_score: f64,
    #[serde(default)]
    pub keywords: Vec<KeywordFrequency>,
    pub engagement: EngagementMetrics,
    pub authority: AuthorityMetrics,
    pub impact: ImpactMetrics,
}

impl MetricsBundle {
    /// Builds a bundle from a text analysis and the three signal groups.
    pub fn from_parts(
        text: TextAnalysis,
        engagement: EngagementMetrics,
        authority: AuthorityMetrics,
        impact: ImpactMetrics,
    ) -> Self {
        Self {
            word_count: text.word_count,
            keyword_count: text.keywords.len() as u64,
            readability_score: text.readability_score,
            keywords: text.keywords,
            engagement,
            authority,
            impact,
        }
    }

    /// The text-derived part of the bundle, as recorded in rating provenance.
    pub fn content_metrics(&self) -> serde_json::Value {
        serde_json::json!({
            "word_count": self.word_count,
            "keyword_count": self.keyword_count,
            "readability_score": self.readability_score,
            "keywords": self.keywords,
        })
    }
}

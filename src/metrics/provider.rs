use serde_json::Value;
use tracing::debug;

use super::error::{MetricsError, MetricsResult};
use super::text::{BasicTextAnalyzer, TextAnalyzer};
use super::types::{AuthorityMetrics, EngagementMetrics, ImpactMetrics, MetricsBundle};
use crate::resource::ResourceMetadata;

pub const SIGNAL_VIEW_COUNT: &str = "view_count";
pub const SIGNAL_AVG_INTERACTION_TIME: &str = "avg_interaction_time";
pub const SIGNAL_SOCIAL_SHARES: &str = "social_shares";
pub const SIGNAL_TOTAL_INTERACTIONS: &str = "total_interactions";
pub const SIGNAL_CITATIONS: &str = "citations";
pub const SIGNAL_AUTHOR_CREDENTIALS: &str = "author_credentials_score";
pub const SIGNAL_DOMAIN_AUTHORITY: &str = "domain_authority";
pub const SIGNAL_POSITIVE_OUTCOMES: &str = "positive_outcomes";
pub const SIGNAL_CONVERSION_RATE: &str = "conversion_rate";
pub const SIGNAL_USER_SATISFACTION: &str = "user_satisfaction";

/// Signals that strict mode requires. `total_interactions` is always optional.
pub const REQUIRED_SIGNALS: [&str; 9] = [
    SIGNAL_VIEW_COUNT,
    SIGNAL_AVG_INTERACTION_TIME,
    SIGNAL_SOCIAL_SHARES,
    SIGNAL_CITATIONS,
    SIGNAL_AUTHOR_CREDENTIALS,
    SIGNAL_DOMAIN_AUTHORITY,
    SIGNAL_POSITIVE_OUTCOMES,
    SIGNAL_CONVERSION_RATE,
    SIGNAL_USER_SATISFACTION,
];

/// Produces the metrics bundle for a resource's normalized content and metadata.
pub trait MetricsProvider: Send + Sync {
    fn collect(&self, content: &str, metadata: &ResourceMetadata) -> MetricsResult<MetricsBundle>;
}

/// Reads a numeric signal from metadata. Absent or `null` yields `Ok(None)`.
pub fn read_signal(metadata: &ResourceMetadata, name: &str) -> MetricsResult<Option<f64>> {
    match metadata.extra.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| MetricsError::InvalidSignal {
            name: name.to_string(),
            found: n.to_string(),
        }),
        Some(other) => Err(MetricsError::InvalidSignal {
            name: name.to_string(),
            found: other.to_string(),
        }),
    }
}

#[inline]
fn cap10(value: f64) -> f64 {
    value.min(10.0)
}

/// Computes engagement, authority and impact metrics from metadata signals and
/// delegates text statistics to a [`TextAnalyzer`].
#[derive(Debug, Clone)]
pub struct SignalMetricsProvider<A: TextAnalyzer = BasicTextAnalyzer> {
    analyzer: A,
    strict: bool,
}

impl SignalMetricsProvider<BasicTextAnalyzer> {
    /// Lenient provider: absent signals count as zero.
    pub fn new() -> Self {
        Self::with_analyzer(BasicTextAnalyzer::new())
    }

    /// Strict provider: absent required signals fail with [`MetricsError::MissingSignals`].
    pub fn strict() -> Self {
        Self::with_analyzer(BasicTextAnalyzer::new()).require_signals(true)
    }
}

impl Default for SignalMetricsProvider<BasicTextAnalyzer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: TextAnalyzer> SignalMetricsProvider<A> {
    pub fn with_analyzer(analyzer: A) -> Self {
        Self {
            analyzer,
            strict: false,
        }
    }

    pub fn require_signals(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn check_required(&self, metadata: &ResourceMetadata) -> MetricsResult<()> {
        if !self.strict {
            return Ok(());
        }

        let missing: Vec<String> = REQUIRED_SIGNALS
            .iter()
            .filter(|name| matches!(metadata.extra.get(**name), None | Some(Value::Null)))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MetricsError::MissingSignals { missing })
        }
    }

    pub fn engagement(metadata: &ResourceMetadata) -> MetricsResult<EngagementMetrics> {
        let views = read_signal(metadata, SIGNAL_VIEW_COUNT)?.unwrap_or(0.0);
        let interaction_time = read_signal(metadata, SIGNAL_AVG_INTERACTION_TIME)?.unwrap_or(0.0);
        let shares = read_signal(metadata, SIGNAL_SOCIAL_SHARES)?.unwrap_or(0.0);
        let interactions = read_signal(metadata, SIGNAL_TOTAL_INTERACTIONS)?.unwrap_or(0.0);

        let views = views.max(1.0);
        Ok(EngagementMetrics {
            interaction_rate: cap10(interactions / views * 10.0),
            avg_session_time: cap10(interaction_time / 5.0),
            social_impact: cap10(shares / views * 20.0),
        })
    }

    pub fn authority(metadata: &ResourceMetadata) -> MetricsResult<AuthorityMetrics> {
        let citations = read_signal(metadata, SIGNAL_CITATIONS)?.unwrap_or(0.0);
        let credentials = read_signal(metadata, SIGNAL_AUTHOR_CREDENTIALS)?.unwrap_or(0.0);
        let domain = read_signal(metadata, SIGNAL_DOMAIN_AUTHORITY)?.unwrap_or(0.0);

        let citation_impact = cap10(citations / 10.0);
        let author_expertise = cap10(credentials);
        let domain_authority = cap10(domain);
        Ok(AuthorityMetrics {
            citation_impact,
            author_expertise,
            domain_authority,
            overall_authority: (citation_impact + author_expertise + domain_authority) / 3.0,
        })
    }

    pub fn impact(metadata: &ResourceMetadata) -> MetricsResult<ImpactMetrics> {
        let outcomes = read_signal(metadata, SIGNAL_POSITIVE_OUTCOMES)?.unwrap_or(0.0);
        let conversion = read_signal(metadata, SIGNAL_CONVERSION_RATE)?.unwrap_or(0.0);
        let satisfaction = read_signal(metadata, SIGNAL_USER_SATISFACTION)?.unwrap_or(0.0);

        let outcome_effectiveness = cap10(outcomes);
        let conversion_impact = cap10(conversion * 10.0);
        let user_satisfaction = cap10(satisfaction);
        Ok(ImpactMetrics {
            outcome_effectiveness,
            conversion_impact,
            user_satisfaction,
            overall_impact: (outcome_effectiveness + conversion_impact + user_satisfaction) / 3.0,
        })
    }
}

impl<A: TextAnalyzer> MetricsProvider for SignalMetricsProvider<A> {
    fn collect(&self, content: &str, metadata: &ResourceMetadata) -> MetricsResult<MetricsBundle> {
        self.check_required(metadata)?;

        let engagement = Self::engagement(metadata)?;
        let authority = Self::authority(metadata)?;
        let impact = Self::impact(metadata)?;
        let text = self.analyzer.analyze(content);

        debug!(
            word_count = text.word_count,
            keywords = text.keywords.len(),
            readability = text.readability_score,
            "Collected metrics bundle"
        );

        Ok(MetricsBundle::from_parts(text, engagement, authority, impact))
    }
}

#[cfg(any(test, feature = "mock"))]
/// Provider returning a fixed bundle, counting calls, optionally failing.
#[derive(Debug, Default)]
pub struct MockMetricsProvider {
    bundle: MetricsBundle,
    fail_when_content_contains: Option<String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "mock"))]
impl MockMetricsProvider {
    pub fn new(bundle: MetricsBundle) -> Self {
        Self {
            bundle,
            ..Default::default()
        }
    }

    /// Fails with [`MetricsError::ProviderFailed`] for content containing `marker`.
    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_when_content_contains = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
impl MetricsProvider for MockMetricsProvider {
    fn collect(&self, content: &str, _metadata: &ResourceMetadata) -> MetricsResult<MetricsBundle> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if let Some(marker) = &self.fail_when_content_contains
            && content.contains(marker.as_str())
        {
            return Err(MetricsError::ProviderFailed {
                reason: format!("content contains '{}'", marker),
            });
        }

        Ok(self.bundle.clone())
    }
}

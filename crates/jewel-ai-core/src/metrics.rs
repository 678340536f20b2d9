//! Prometheus metrics for pipeline invocations
//!
//! - `jewel_ai_invocations_total` (counter) - invocations by task and outcome
//! - `jewel_ai_duration_seconds` (histogram) - end-to-end invocation latency
//!
//! Metrics are write-only; nothing in the pipeline reads them back.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

/// Result type for metric registration
pub type Result<T> = std::result::Result<T, prometheus::Error>;

const NAMESPACE: &str = "jewel_ai";

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The model's reply passed validation
    Generated,
    /// No JSON could be extracted
    ExtractionFallback,
    /// JSON was found but did not match the contract
    ValidationFallback,
    /// The generation service failed
    TransportError,
}

impl Outcome {
    /// Label value
    pub const fn as_str(&self) -> &'static str {
        match self {
            Outcome::Generated => "generated",
            Outcome::ExtractionFallback => "extraction_fallback",
            Outcome::ValidationFallback => "validation_fallback",
            Outcome::TransportError => "transport_error",
        }
    }
}

/// Pipeline counters and histograms
#[derive(Clone)]
pub struct PipelineMetrics {
    invocations_total: CounterVec,
    duration_seconds: HistogramVec,
}

impl PipelineMetrics {
    /// Create the metrics and register them with `registry`
    pub fn new(registry: &Registry) -> Result<Self> {
        let invocations_total = CounterVec::new(
            Opts::new(
                "invocations_total",
                "Total structured generation invocations by outcome",
            )
            .namespace(NAMESPACE),
            &["task", "outcome"],
        )?;

        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "duration_seconds",
                "Structured generation duration in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
            &["task"],
        )?;

        registry.register(Box::new(invocations_total.clone()))?;
        registry.register(Box::new(duration_seconds.clone()))?;

        Ok(Self {
            invocations_total,
            duration_seconds,
        })
    }

    /// Count one finished invocation
    pub fn record(&self, task: &str, outcome: Outcome) {
        self.invocations_total
            .with_label_values(&[task, outcome.as_str()])
            .inc();
    }

    /// Observe invocation duration
    pub fn observe_duration(&self, task: &str, duration_secs: f64) {
        self.duration_seconds
            .with_label_values(&[task])
            .observe(duration_secs);
    }

    /// Current count for a task and outcome
    pub fn count(&self, task: &str, outcome: Outcome) -> u64 {
        self.invocations_total
            .with_label_values(&[task, outcome.as_str()])
            .get() as u64
    }
}

impl std::fmt::Debug for PipelineMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineMetrics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let registry = Registry::new();
        let metrics = PipelineMetrics::new(&registry).unwrap();

        metrics.record("design_suggestion", Outcome::Generated);
        metrics.record("design_suggestion", Outcome::Generated);
        metrics.record("design_suggestion", Outcome::ValidationFallback);
        metrics.observe_duration("design_suggestion", 0.3);

        assert_eq!(metrics.count("design_suggestion", Outcome::Generated), 2);
        assert_eq!(metrics.count("design_suggestion", Outcome::ValidationFallback), 1);
        assert_eq!(metrics.count("profile_analysis", Outcome::Generated), 0);

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"jewel_ai_invocations_total".to_string()));
        assert!(names.contains(&"jewel_ai_duration_seconds".to_string()));
    }

    #[test]
    fn test_double_registration_fails() {
        let registry = Registry::new();
        assert!(PipelineMetrics::new(&registry).is_ok());
        assert!(PipelineMetrics::new(&registry).is_err());
    }
}

//! Concurrent fan-out to every data source and fan-in into one aggregate

use std::sync::Arc;
use std::time::Duration;

use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::aggregate::AggregateResult;
use crate::config::{AggregatorConfig, ConfidenceWeights, PlannerConfig};
use crate::cross_reference::CrossReferencer;
use crate::query::Query;
use crate::sources::{DataSource, SourceData, SourceError, SourceKind, default_sources};

pub struct Aggregator {
    sources: Vec<Arc<dyn DataSource>>,
    default_timeout: Duration,
    weights: ConfidenceWeights,
    cross_referencer: CrossReferencer,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn DataSource>>, config: &AggregatorConfig) -> Self {
        Self {
            sources,
            default_timeout: config.default_timeout(),
            weights: config.confidence,
            cross_referencer: CrossReferencer::new(config.proximity),
        }
    }

    /// All eight sources wired from configuration
    pub fn from_config(config: &PlannerConfig, client: ClientWithMiddleware) -> Self {
        Self::new(default_sources(config, client), &config.aggregator)
    }

    #[must_use]
    pub fn configured_sources(&self) -> usize {
        self.sources.len()
    }

    /// Fetch, score and cross-reference. Never fails; failed sources are simply absent.
    #[instrument(skip(self, query), fields(destination = query.destination(), theme = %query.theme()))]
    pub async fn aggregate(&self, query: &Query) -> AggregateResult {
        let mut aggregate = self.collect(query).await;
        self.cross_referencer.enrich(&mut aggregate);
        aggregate
    }

    /// Raw aggregate with confidence score, before cross-referencing
    pub async fn collect(&self, query: &Query) -> AggregateResult {
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let kind = source.kind();
                let timeout = source.timeout().unwrap_or(self.default_timeout);
                let task = tokio::spawn(fetch_bounded(Arc::clone(source), query.clone(), timeout));
                (kind, task)
            })
            .collect();

        let (kinds, tasks): (Vec<SourceKind>, Vec<_>) = handles.into_iter().unzip();
        let outcomes = futures::future::join_all(tasks).await;

        let mut aggregate = AggregateResult::new(query);
        for (kind, outcome) in kinds.into_iter().zip(outcomes) {
            let result = outcome.unwrap_or_else(|e| Err(SourceError::Panicked(e.to_string())));
            match result {
                Ok(data) if data.kind() == kind => {
                    debug!("{} succeeded (quality {:.2})", kind, data.quality_score());
                    aggregate.record(data);
                }
                Ok(data) => {
                    warn!("{} returned a {} payload, dropping it", kind, data.kind());
                }
                Err(e) => {
                    warn!("{} failed: {}", kind, e);
                }
            }
        }

        let qualities: Vec<f64> = aggregate.sources().map(SourceData::quality_score).collect();
        aggregate.confidence_score =
            confidence_score(&qualities, self.sources.len(), &self.weights);

        info!(
            "Aggregated {}/{} sources for {}, confidence {:.2}",
            aggregate.data_sources_used().len(),
            self.sources.len(),
            query.destination(),
            aggregate.confidence_score
        );
        aggregate
    }
}

async fn fetch_bounded(
    source: Arc<dyn DataSource>,
    query: Query,
    timeout: Duration,
) -> Result<SourceData, SourceError> {
    match tokio::time::timeout(timeout, source.fetch(&query)).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(timeout.as_secs())),
    }
}

/// Weighted blend of source diversity and mean source quality, rounded to two decimals
#[must_use]
pub fn confidence_score(qualities: &[f64], configured: usize, weights: &ConfidenceWeights) -> f64 {
    let diversity = if configured == 0 {
        0.0
    } else {
        qualities.len() as f64 / configured as f64
    };
    let avg_quality = if qualities.is_empty() {
        weights.zero_source_quality
    } else {
        qualities.iter().sum::<f64>() / qualities.len() as f64
    };

    let score = weights.diversity_weight * diversity + weights.quality_weight * avg_quality;
    ((score * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

use std::time::Duration;

use super::config::ProviderConfig;
use super::sources::{self, Deadline, HttpClient, Observation, RateSource};
use super::ReferenceRate;
use crate::{CreditoError, CreditoResult};

/// Acquires the reference rate from an ordered chain of sources.
///
/// Sources are tried one after another under a single deadline; the first
/// usable value wins. Failures never reach the caller: they resolve to the
/// configured fallback rate.
pub struct RateProvider {
    config: ProviderConfig,
    sources: Vec<Box<dyn RateSource>>,
}

impl RateProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let sources = config.sources.iter().map(sources::from_config).collect();
        RateProvider { config, sources }
    }

    /// Use explicit sources instead of the ones listed in `config`.
    pub fn with_sources(config: ProviderConfig, sources: Vec<Box<dyn RateSource>>) -> Self {
        RateProvider { config, sources }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Fetch the reference rate, waiting at most `timeout_ms` (or the
    /// configured timeout) across all sources.
    pub fn fetch_reference_rate(&self, timeout_ms: Option<u64>) -> ReferenceRate {
        let budget = self.config.timeout(timeout_ms);
        match self.first_usable(budget) {
            Ok((provider, obs)) => {
                tracing::info!(
                    source = %provider,
                    rate = %obs.value_percent,
                    as_of = ?obs.as_of,
                    "reference rate acquired"
                );
                ReferenceRate::live(obs.value_percent, obs.as_of, provider)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = %self.config.fallback_rate_percent,
                    "reference rate unavailable; using fallback"
                );
                ReferenceRate::fallback(self.config.fallback_rate_percent)
            }
        }
    }

    fn first_usable(&self, budget: Duration) -> CreditoResult<(String, Observation)> {
        let deadline = Deadline::after(budget);
        let mut builder = HttpClient::builder()
            .user_agent(self.config.user_agent.as_str())
            .connect_timeout(budget)
            .timeout(budget);
        if !self.config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| CreditoError::Transport {
                source_name: "http client".into(),
                reason: e.to_string(),
            })?;

        let mut last_error = CreditoError::NoUsableValue("no rate sources configured".into());
        for source in &self.sources {
            match source.fetch(&client, &deadline) {
                Ok(obs) => return Ok((source.name().to_string(), obs)),
                Err(e) => {
                    tracing::warn!(source = %source.name(), error = %e, "rate source failed");
                    last_error = e;
                }
            }
            if deadline.is_expired() {
                break;
            }
        }
        Err(last_error)
    }
}

/// Fetch the reference rate with the default configuration.
pub fn fetch_reference_rate(timeout_ms: Option<u64>) -> ReferenceRate {
    RateProvider::new(ProviderConfig::default()).fetch_reference_rate(timeout_ms)
}

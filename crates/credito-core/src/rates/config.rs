use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::Percent;
use crate::{CreditoError, CreditoResult};

pub const DEFAULT_TIMEOUT_MS: u64 = 4000;
pub const DEFAULT_SERIES_BASE_URL: &str = "https://apis.datos.gob.ar/series/api";
pub const DEFAULT_SERIES_ID: &str = "7917";
pub const DEFAULT_CATALOG_URL: &str =
    "https://api.bcra.gob.ar/estadisticas/v2.0/principalesvariables";
pub const DEFAULT_CATALOG_SERIES_URL: &str =
    "https://api.bcra.gob.ar/estadisticas/v2.0/DatosVariable/{id}/{from}/{to}";
pub const DEFAULT_CATALOG_KEYWORD: &str = "tasa de política monetaria";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
/// Ten years of daily observations.
pub const MAX_LOOKBACK_DAYS: u32 = 3660;

/// Rate provider settings. Every field has a default, so a partial file is
/// enough to override one knob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub timeout_ms: u64,
    /// Rate reported when no source yields a usable value. Product choice:
    /// some deployments prefer 0, others 1.
    pub fallback_rate_percent: Percent,
    pub user_agent: String,
    /// Honour `HTTP(S)_PROXY` from the environment.
    pub use_system_proxy: bool,
    /// Tried in order; the first usable value wins.
    pub sources: Vec<SourceConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback_rate_percent: Decimal::ZERO,
            user_agent: format!("credito/{}", env!("CARGO_PKG_VERSION")),
            use_system_proxy: true,
            sources: vec![SourceConfig::default_series(), SourceConfig::default_catalog()],
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> CreditoResult<()> {
        if self.timeout_ms == 0 {
            return Err(CreditoError::Config("timeout_ms must be positive.".into()));
        }
        if self.fallback_rate_percent < Decimal::ZERO {
            return Err(CreditoError::Config(
                "fallback_rate_percent cannot be negative.".into(),
            ));
        }
        for source in &self.sources {
            source.validate()?;
        }
        Ok(())
    }

    /// Effective timeout: the override when given, else the configured one.
    pub fn timeout(&self, override_ms: Option<u64>) -> Duration {
        Duration::from_millis(override_ms.unwrap_or(self.timeout_ms))
    }
}

/// One remote endpoint in the fallback chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Statistics-series API addressed by a fixed series id.
    Series {
        #[serde(default = "default_series_base_url")]
        base_url: String,
        series_id: String,
    },
    /// Central-bank variables catalogue, matched by description keyword.
    /// With `series_url` set, the matched variable's series is fetched
    /// (`{id}`, `{from}`, `{to}` are substituted).
    Catalog {
        #[serde(default = "default_catalog_url")]
        catalog_url: String,
        keyword: String,
        #[serde(default)]
        series_url: Option<String>,
        #[serde(default = "default_lookback_days")]
        lookback_days: u32,
    },
}

impl SourceConfig {
    pub fn default_series() -> Self {
        SourceConfig::Series {
            base_url: DEFAULT_SERIES_BASE_URL.into(),
            series_id: DEFAULT_SERIES_ID.into(),
        }
    }

    pub fn default_catalog() -> Self {
        SourceConfig::Catalog {
            catalog_url: DEFAULT_CATALOG_URL.into(),
            keyword: DEFAULT_CATALOG_KEYWORD.into(),
            series_url: Some(DEFAULT_CATALOG_SERIES_URL.into()),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    fn validate(&self) -> CreditoResult<()> {
        match self {
            SourceConfig::Series { base_url, series_id } => {
                require_http_url(base_url)?;
                if series_id.trim().is_empty() {
                    return Err(CreditoError::Config("series_id cannot be empty.".into()));
                }
            }
            SourceConfig::Catalog {
                catalog_url,
                keyword,
                series_url,
                lookback_days,
            } => {
                require_http_url(catalog_url)?;
                if keyword.trim().is_empty() {
                    return Err(CreditoError::Config("catalog keyword cannot be empty.".into()));
                }
                if let Some(url) = series_url {
                    require_http_url(url)?;
                    if !url.contains("{id}") {
                        return Err(CreditoError::Config(format!(
                            "series_url '{url}' has no {{id}} placeholder."
                        )));
                    }
                }
                if *lookback_days > MAX_LOOKBACK_DAYS {
                    return Err(CreditoError::Config(format!(
                        "lookback_days must be at most {MAX_LOOKBACK_DAYS}."
                    )));
                }
            }
        }
        Ok(())
    }
}

fn require_http_url(url: &str) -> CreditoResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(CreditoError::Config(format!("'{url}' is not an http(s) URL.")))
    }
}

fn default_series_base_url() -> String {
    DEFAULT_SERIES_BASE_URL.into()
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.into()
}

fn default_lookback_days() -> u32 {
    DEFAULT_LOOKBACK_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_valid() {
        let cfg = ProviderConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.timeout(None), Duration::from_millis(4000));
        assert_eq!(cfg.timeout(Some(250)), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: ProviderConfig =
            serde_json::from_str(r#"{ "fallback_rate_percent": "1" }"#).unwrap();
        assert_eq!(cfg.fallback_rate_percent, dec!(1));
        assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(cfg.sources.len(), 2);
    }

    #[test]
    fn test_tagged_sources() {
        let cfg: ProviderConfig = serde_json::from_str(
            r#"{ "sources": [
                { "kind": "series", "series_id": "42" },
                { "kind": "catalog", "keyword": "badlar" }
            ] }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.sources[0],
            SourceConfig::Series {
                base_url: DEFAULT_SERIES_BASE_URL.into(),
                series_id: "42".into()
            }
        );
        match &cfg.sources[1] {
            SourceConfig::Catalog { series_url, lookback_days, .. } => {
                assert!(series_url.is_none());
                assert_eq!(*lookback_days, DEFAULT_LOOKBACK_DAYS);
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = ProviderConfig {
            timeout_ms: 0,
            ..ProviderConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CreditoError::Config(_))));

        cfg.timeout_ms = 100;
        cfg.fallback_rate_percent = dec!(-1);
        assert!(cfg.validate().is_err());

        cfg.fallback_rate_percent = dec!(1);
        cfg.sources = vec![SourceConfig::Series {
            base_url: "ftp://example".into(),
            series_id: "1".into(),
        }];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_lookback_days() {
        let with_lookback = |lookback_days| ProviderConfig {
            sources: vec![SourceConfig::Catalog {
                catalog_url: DEFAULT_CATALOG_URL.into(),
                keyword: "badlar".into(),
                series_url: Some(DEFAULT_CATALOG_SERIES_URL.into()),
                lookback_days,
            }],
            ..ProviderConfig::default()
        };
        assert!(with_lookback(MAX_LOOKBACK_DAYS).validate().is_ok());
        assert!(matches!(
            with_lookback(u32::MAX).validate(),
            Err(CreditoError::Config(_))
        ));
    }
}

//! Reference annual rate (TNA) acquisition.
//!
//! [`ReferenceRate`] and [`config::ProviderConfig`] are always available; the
//! HTTP-backed [`provider::RateProvider`] and its sources need the `http`
//! feature.

pub mod config;

#[cfg(feature = "http")]
pub mod provider;

#[cfg(feature = "http")]
pub mod sources;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::Percent;

#[cfg(feature = "http")]
pub use provider::{fetch_reference_rate, RateProvider};

/// Where a reference rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateOrigin {
    #[serde(rename = "live source")]
    Live,
    #[serde(rename = "unavailable/fallback")]
    Fallback,
}

impl RateOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Live => "live source",
            Self::Fallback => "unavailable/fallback",
        }
    }

    /// Short note shown next to the rate field.
    pub fn annotation(&self) -> &'static str {
        match self {
            Self::Live => "(BCRA)",
            Self::Fallback => "(sin conexión)",
        }
    }
}

impl std::fmt::Display for RateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference nominal annual rate, created once per start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRate {
    pub value_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    pub source: RateOrigin,
    /// Name of the source that answered, for live rates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl ReferenceRate {
    pub fn live(value_percent: Percent, as_of: Option<NaiveDate>, provider: impl Into<String>) -> Self {
        ReferenceRate {
            value_percent,
            as_of,
            source: RateOrigin::Live,
            provider: Some(provider.into()),
        }
    }

    pub fn fallback(value_percent: Percent) -> Self {
        ReferenceRate {
            value_percent,
            as_of: None,
            source: RateOrigin::Fallback,
            provider: None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.source == RateOrigin::Live
    }
}

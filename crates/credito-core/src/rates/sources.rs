//! Remote rate sources. Each source performs its own requests and either
//! yields an [`Observation`] or an error; the provider chains them.

use chrono::{Duration as Days, NaiveDate, Utc};
use serde_json::Value;
use std::time::{Duration, Instant};

use super::config::SourceConfig;
use crate::parse::parse_rate_value;
use crate::types::Percent;
use crate::{CreditoError, CreditoResult};

pub use reqwest::blocking::Client as HttpClient;

/// A rate value read from a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub value_percent: Percent,
    pub as_of: Option<NaiveDate>,
}

/// Shared time budget for one acquisition attempt across all sources.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Deadline {
            at: Instant::now() + budget,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Time left, or a timeout error naming the source that ran out.
    pub fn remaining(&self, source_name: &str) -> CreditoResult<Duration> {
        let left = self.at.saturating_duration_since(Instant::now());
        if left.is_zero() {
            Err(CreditoError::Timeout(source_name.to_string()))
        } else {
            Ok(left)
        }
    }
}

/// One link of the fallback chain.
pub trait RateSource {
    fn name(&self) -> &str;
    fn fetch(&self, client: &HttpClient, deadline: &Deadline) -> CreditoResult<Observation>;
}

/// Build the source a config entry describes.
pub fn from_config(config: &SourceConfig) -> Box<dyn RateSource> {
    match config {
        SourceConfig::Series { base_url, series_id } => {
            Box::new(SeriesApi::new(base_url.clone(), series_id.clone()))
        }
        SourceConfig::Catalog {
            catalog_url,
            keyword,
            series_url,
            lookback_days,
        } => Box::new(CatalogApi {
            name: format!("catalog:{keyword}"),
            catalog_url: catalog_url.clone(),
            keyword: keyword.clone(),
            series_url: series_url.clone(),
            lookback_days: *lookback_days,
        }),
    }
}

// ---------------------------------------------------------------------------
// Statistics-series API
// ---------------------------------------------------------------------------

/// `GET {base}/series/?ids={id}` returning `{ "data": [[date, value], ...] }`.
#[derive(Debug, Clone)]
pub struct SeriesApi {
    name: String,
    base_url: String,
    series_id: String,
}

impl SeriesApi {
    pub fn new(base_url: impl Into<String>, series_id: impl Into<String>) -> Self {
        let series_id = series_id.into();
        SeriesApi {
            name: format!("series:{series_id}"),
            base_url: base_url.into(),
            series_id,
        }
    }

    /// Newest observation first, one row.
    pub fn url(&self) -> String {
        format!(
            "{}/series/?ids={}&sort=desc&limit=1",
            self.base_url.trim_end_matches('/'),
            self.series_id
        )
    }
}

impl RateSource for SeriesApi {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, client: &HttpClient, deadline: &Deadline) -> CreditoResult<Observation> {
        let payload = get_json(client, &self.url(), &self.name, deadline)?;
        parse_series_payload(&payload, &self.name)
    }
}

/// Read the first `[date, value]` row of a series payload.
pub fn parse_series_payload(payload: &Value, source_name: &str) -> CreditoResult<Observation> {
    let rows = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(source_name, "missing `data` array"))?;
    let row = rows
        .first()
        .and_then(Value::as_array)
        .ok_or_else(|| CreditoError::NoUsableValue(source_name.to_string()))?;

    let value_percent = row
        .get(1)
        .and_then(parse_rate_value)
        .ok_or_else(|| CreditoError::NoUsableValue(source_name.to_string()))?;
    let as_of = row.first().and_then(Value::as_str).and_then(parse_date);

    Ok(Observation {
        value_percent,
        as_of,
    })
}

// ---------------------------------------------------------------------------
// Central-bank variables catalogue
// ---------------------------------------------------------------------------

/// Catalogue lookup by description keyword, optionally followed by a
/// series fetch for the matched variable.
#[derive(Debug, Clone)]
pub struct CatalogApi {
    name: String,
    catalog_url: String,
    keyword: String,
    series_url: Option<String>,
    lookback_days: u32,
}

impl CatalogApi {
    pub fn new(catalog_url: impl Into<String>, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        CatalogApi {
            name: format!("catalog:{keyword}"),
            catalog_url: catalog_url.into(),
            keyword,
            series_url: None,
            lookback_days: super::config::DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_series_url(mut self, template: impl Into<String>, lookback_days: u32) -> Self {
        self.series_url = Some(template.into());
        self.lookback_days = lookback_days;
        self
    }

    fn series_request(&self, template: &str, id: &str, today: NaiveDate) -> CreditoResult<String> {
        let from = today
            .checked_sub_signed(Days::days(i64::from(self.lookback_days)))
            .ok_or_else(|| {
                CreditoError::Config(format!(
                    "{}: lookback of {} days goes past the earliest date",
                    self.name, self.lookback_days
                ))
            })?;
        Ok(template
            .replace("{id}", id)
            .replace("{from}", &from.format("%Y-%m-%d").to_string())
            .replace("{to}", &today.format("%Y-%m-%d").to_string()))
    }
}

impl RateSource for CatalogApi {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, client: &HttpClient, deadline: &Deadline) -> CreditoResult<Observation> {
        let catalog = get_json(client, &self.catalog_url, &self.name, deadline)?;
        let record = find_catalog_record(&catalog, &self.keyword, &self.name)?;

        let Some(template) = &self.series_url else {
            return observation_from_record(record)
                .ok_or_else(|| CreditoError::NoUsableValue(self.name.clone()));
        };

        let id = match record.get("idVariable") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(malformed(&self.name, "matched record has no `idVariable`")),
        };
        tracing::debug!(source = %self.name, id = %id, "catalogue match");

        let url = self.series_request(template, &id, Utc::now().date_naive())?;
        let series = get_json(client, &url, &self.name, deadline)?;
        latest_record(&series, &self.name)
    }
}

/// First record of `results` whose `descripcion` contains `keyword`,
/// ignoring case and Spanish accents.
pub fn find_catalog_record<'a>(
    payload: &'a Value,
    keyword: &str,
    source_name: &str,
) -> CreditoResult<&'a Value> {
    let records = results(payload, source_name)?;
    let needle = fold(keyword);
    records
        .iter()
        .find(|r| {
            r.get("descripcion")
                .and_then(Value::as_str)
                .map(|d| fold(d).contains(&needle))
                .unwrap_or(false)
        })
        .ok_or_else(|| CreditoError::NoUsableValue(format!("{source_name} (no match for '{keyword}')")))
}

/// Most recent usable `{ fecha, valor }` record of a `results` payload.
pub fn latest_record(payload: &Value, source_name: &str) -> CreditoResult<Observation> {
    results(payload, source_name)?
        .iter()
        .filter_map(observation_from_record)
        .max_by_key(|obs| obs.as_of)
        .ok_or_else(|| CreditoError::NoUsableValue(source_name.to_string()))
}

fn observation_from_record(record: &Value) -> Option<Observation> {
    let value_percent = record.get("valor").and_then(parse_rate_value)?;
    let as_of = record.get("fecha").and_then(Value::as_str).and_then(parse_date);
    Some(Observation {
        value_percent,
        as_of,
    })
}

fn results<'a>(payload: &'a Value, source_name: &str) -> CreditoResult<&'a Vec<Value>> {
    payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(source_name, "missing `results` array"))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn get_json(
    client: &HttpClient,
    url: &str,
    source_name: &str,
    deadline: &Deadline,
) -> CreditoResult<Value> {
    let timeout = deadline.remaining(source_name)?;
    tracing::debug!(source = %source_name, url = %url, timeout_ms = timeout.as_millis() as u64, "GET");

    let resp = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .timeout(timeout)
        .send()
        .map_err(|e| CreditoError::from_http(source_name, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CreditoError::HttpStatus {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp
        .text()
        .map_err(|e| CreditoError::from_http(source_name, e))?;
    serde_json::from_str(&body).map_err(|e| malformed(source_name, &e.to_string()))
}

fn malformed(source_name: &str, reason: &str) -> CreditoError {
    CreditoError::Malformed {
        source_name: source_name.to_string(),
        reason: reason.to_string(),
    }
}

/// `2024-05-10`, `2024-05-10T00:00:00` or `10/05/2024`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

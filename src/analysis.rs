//! AEP analysis payload and display formatting.
//!
//! The service may omit any field or send it with an unexpected type. Decoding
//! never fails on field shape: such values simply come out as `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Summary statistics of one remote Monte Carlo AEP run.
///
/// Field names on the wire use the service's `aep_GWh_*` spelling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalysisResult {
    /// Run status reported by the service (e.g. `"success"`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Mean AEP across all iterations (GWh).
    #[serde(rename = "aep_GWh_mean", default, deserialize_with = "lenient_f64")]
    pub aep_gwh_mean: Option<f64>,
    /// Median AEP (GWh).
    #[serde(rename = "aep_GWh_p50", default, deserialize_with = "lenient_f64")]
    pub aep_gwh_p50: Option<f64>,
    /// AEP exceeded with 90% probability (GWh).
    #[serde(rename = "aep_GWh_p90", default, deserialize_with = "lenient_f64")]
    pub aep_gwh_p90: Option<f64>,
    /// AEP exceeded with 10% probability (GWh).
    #[serde(rename = "aep_GWh_p10", default, deserialize_with = "lenient_f64")]
    pub aep_gwh_p10: Option<f64>,
    /// Standard deviation of the AEP distribution (GWh).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub std_dev: Option<f64>,
    /// Relative variability, `std_dev / mean * 100` (%).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub uncertainty_pct: Option<f64>,
    /// Per-iteration AEP values, in iteration order.
    #[serde(default, deserialize_with = "lenient_distribution")]
    pub distribution: Option<Vec<f64>>,
}

impl AnalysisResult {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the body is not a JSON object.
    pub fn from_json_str(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(serde::de::Error::custom(
                "expected a JSON object for the analysis result",
            ));
        }
        serde_json::from_value(value)
    }

    /// Number of Monte Carlo iterations the service reported (0 if absent).
    pub fn iteration_count(&self) -> usize {
        self.distribution.as_ref().map_or(0, Vec::len)
    }

    /// Distribution values, empty if absent.
    pub fn distribution(&self) -> &[f64] {
        self.distribution.as_deref().unwrap_or(&[])
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(d)?.as_f64())
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Keeps one entry per array element so the bar count always matches the
/// iteration count; non-numeric entries become `0.0`.
fn lenient_distribution<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<f64>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(items.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect()),
        _ => None,
    })
}

/// Formats a metric to two decimals, or the empty string when absent.
pub fn format_metric(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

/// Formats a metric with its unit suffix, e.g. `"12.35 GWh"`.
///
/// An absent value renders as the bare unit.
pub fn format_with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(_) => format!("{} {unit}", format_metric(value)),
        None => unit.to_string(),
    }
}

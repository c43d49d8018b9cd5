use crate::domain::asset::AssetClass;
use crate::domain::method::Method;
use crate::domain::projection::{AccuracyLevel, ProjectionInput, MAX_HORIZON_DAYS};
use crate::error::InputError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A number as callers send it: JSON number or free text from a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    fn as_text(&self) -> String {
        match self {
            RawNumber::Number(n) => n.to_string(),
            RawNumber::Text(s) => s.trim().to_string(),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => Some(*n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// Unvalidated calculation request as received from a caller.
///
/// Absent `asset_class`, `methods` and `accuracy` take the form defaults (stocks, all six
/// methods, standard). An explicitly empty `methods` list is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionRequest {
    #[serde(default)]
    pub base_price: Option<RawNumber>,
    #[serde(default)]
    pub base_date: Option<String>,
    #[serde(default)]
    pub horizon_days: Option<RawNumber>,
    #[serde(default)]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub methods: Option<Vec<String>>,
    #[serde(default)]
    pub accuracy: Option<String>,
}

impl ProjectionRequest {
    pub fn validate_and_into_input(self) -> Result<ProjectionInput, InputError> {
        let base_price_text = self
            .base_price
            .as_ref()
            .map(RawNumber::as_text)
            .unwrap_or_default();
        let base_price = match &self.base_price {
            None => return Err(InputError::MissingBasePrice),
            Some(RawNumber::Text(s)) if s.trim().is_empty() => {
                return Err(InputError::MissingBasePrice)
            }
            Some(raw) => raw
                .to_f64()
                .filter(|p| p.is_finite() && *p > 0.0)
                .ok_or_else(|| InputError::InvalidBasePrice(raw.as_text()))?,
        };

        let base_date = match self.base_date.as_deref().map(str::trim) {
            None | Some("") => return Err(InputError::MissingBaseDate),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| InputError::InvalidBaseDate(s.to_string()))?,
        };

        let horizon_days = match &self.horizon_days {
            None => return Err(InputError::MissingHorizon),
            Some(RawNumber::Text(s)) if s.trim().is_empty() => {
                return Err(InputError::MissingHorizon)
            }
            Some(raw) => parse_horizon(raw).ok_or_else(|| InputError::InvalidHorizon(raw.as_text()))?,
        };

        let asset_class = match self.asset_class.as_deref() {
            None => AssetClass::Stocks,
            Some(s) => {
                AssetClass::from_key(s).ok_or_else(|| InputError::UnknownAssetClass(s.to_string()))?
            }
        };

        let methods = match self.methods {
            None => Method::ALL.into_iter().collect(),
            Some(keys) => {
                let mut out = BTreeSet::new();
                for key in keys {
                    if key.trim().is_empty() {
                        continue;
                    }
                    let method = Method::from_key(&key).ok_or(InputError::UnknownMethod(key))?;
                    out.insert(method);
                }
                if out.is_empty() {
                    return Err(InputError::NoMethodsSelected);
                }
                out
            }
        };

        let accuracy = match self.accuracy.as_deref() {
            None => AccuracyLevel::Standard,
            Some(s) => {
                AccuracyLevel::from_key(s).ok_or_else(|| InputError::UnknownAccuracy(s.to_string()))?
            }
        };

        Ok(ProjectionInput {
            base_price,
            base_price_text,
            base_date,
            horizon_days,
            asset_class,
            methods,
            accuracy,
        })
    }
}

fn parse_horizon(raw: &RawNumber) -> Option<u32> {
    let n = match raw {
        RawNumber::Number(n) if n.fract() == 0.0 => *n,
        RawNumber::Number(_) => return None,
        RawNumber::Text(s) => s.trim().parse::<u32>().ok()? as f64,
    };
    if (1.0..=f64::from(MAX_HORIZON_DAYS)).contains(&n) {
        Some(n as u32)
    } else {
        None
    }
}

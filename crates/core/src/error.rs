use crate::domain::projection::MAX_HORIZON_DAYS;
use std::fmt;

/// Rejected calculation input. Raised before any projection runs.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    MissingBasePrice,
    InvalidBasePrice(String),
    MissingBaseDate,
    InvalidBaseDate(String),
    MissingHorizon,
    InvalidHorizon(String),
    UnknownAssetClass(String),
    NoMethodsSelected,
    UnknownMethod(String),
    UnknownAccuracy(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBasePrice => write!(f, "base price is required"),
            Self::InvalidBasePrice(v) => write!(f, "base price must be a positive number (got {v})"),
            Self::MissingBaseDate => write!(f, "base date is required"),
            Self::InvalidBaseDate(v) => write!(f, "base date must be YYYY-MM-DD (got {v})"),
            Self::MissingHorizon => write!(f, "horizon days is required"),
            Self::InvalidHorizon(v) => write!(
                f,
                "horizon days must be a whole number from 1 to {MAX_HORIZON_DAYS} (got {v})"
            ),
            Self::UnknownAssetClass(v) => write!(f, "unknown asset class: {v}"),
            Self::NoMethodsSelected => write!(f, "select at least one calculation method"),
            Self::UnknownMethod(v) => write!(f, "unknown calculation method: {v}"),
            Self::UnknownAccuracy(v) => write!(f, "accuracy level must be standard or high (got {v})"),
        }
    }
}

impl std::error::Error for InputError {}

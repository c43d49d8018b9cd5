use crate::domain::method::Method;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Weight used for a method that has no entry in a profile's weight table.
pub const DEFAULT_METHOD_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stocks,
    Forex,
    Crypto,
    Commodities,
    Etf,
    Indices,
}

impl AssetClass {
    pub const ALL: [AssetClass; 6] = [
        AssetClass::Stocks,
        AssetClass::Forex,
        AssetClass::Crypto,
        AssetClass::Commodities,
        AssetClass::Etf,
        AssetClass::Indices,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Forex => "forex",
            AssetClass::Crypto => "crypto",
            AssetClass::Commodities => "commodities",
            AssetClass::Etf => "etf",
            AssetClass::Indices => "indices",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodWeights(BTreeMap<Method, f64>);

impl MethodWeights {
    pub fn new(entries: impl IntoIterator<Item = (Method, f64)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Weight of `method`, falling back to [`DEFAULT_METHOD_WEIGHT`] when absent.
    pub fn get(&self, method: Method) -> f64 {
        self.0
            .get(&method)
            .copied()
            .unwrap_or(DEFAULT_METHOD_WEIGHT)
    }

    pub fn missing(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| !self.0.contains_key(m))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, f64)> + '_ {
        self.0.iter().map(|(m, w)| (*m, *w))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    pub name: String,
    pub scale_factor: f64,
    pub gann_divisor: u32,
    pub weights: MethodWeights,
    pub exclude_weekends: bool,
}

impl AssetProfile {
    fn builtin(
        name: &str,
        scale_factor: f64,
        gann_divisor: u32,
        weights: [f64; 6],
        exclude_weekends: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            scale_factor,
            gann_divisor,
            weights: MethodWeights::new(Method::ALL.into_iter().zip(weights)),
            exclude_weekends,
        }
    }

    /// Rejects profiles that would silently fall back to default weights or divide by zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.name.trim().is_empty(), "profile name must be non-empty");
        ensure!(
            self.scale_factor.is_finite() && self.scale_factor > 0.0,
            "scale_factor must be positive (got {})",
            self.scale_factor
        );
        ensure!(self.gann_divisor > 0, "gann_divisor must be positive");

        let missing = self.weights.missing();
        ensure!(
            missing.is_empty(),
            "weights missing for methods: {}",
            missing
                .iter()
                .map(|m| m.key())
                .collect::<Vec<_>>()
                .join(", ")
        );
        for (method, weight) in self.weights.iter() {
            ensure!(
                weight.is_finite() && weight > 0.0,
                "weight for {} must be positive (got {weight})",
                method.key()
            );
        }
        Ok(())
    }
}

/// Read-only table of per-asset-class configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AssetRegistry {
    profiles: BTreeMap<AssetClass, AssetProfile>,
}

impl AssetRegistry {
    pub fn builtin() -> Self {
        // Weight order follows Method::ALL: gann, fibonacci, lunar, astro, gematria, natural.
        let profiles = BTreeMap::from([
            (
                AssetClass::Stocks,
                AssetProfile::builtin("Stocks", 1.0, 20, [1.4, 1.3, 1.0, 1.1, 0.8, 1.2], true),
            ),
            (
                AssetClass::Forex,
                AssetProfile::builtin("Forex", 0.0001, 5, [1.2, 1.0, 1.5, 1.5, 0.5, 1.0], false),
            ),
            (
                AssetClass::Crypto,
                AssetProfile::builtin("Crypto", 10.0, 100, [1.1, 1.2, 1.3, 1.2, 0.7, 2.0], false),
            ),
            (
                AssetClass::Commodities,
                AssetProfile::builtin(
                    "Commodities",
                    0.1,
                    10,
                    [1.3, 1.2, 1.4, 1.3, 0.6, 1.1],
                    false,
                ),
            ),
            (
                AssetClass::Etf,
                AssetProfile::builtin("ETFs", 1.0, 15, [1.4, 1.3, 0.9, 1.0, 0.8, 1.2], true),
            ),
            (
                AssetClass::Indices,
                AssetProfile::builtin("Indices", 1.0, 25, [1.5, 1.4, 1.1, 1.2, 0.9, 1.3], true),
            ),
        ]);
        Self { profiles }
    }

    /// Built-in registry with profiles replaced by the entries of a JSON file keyed by asset class.
    pub fn with_overrides_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read profile overrides {}", path.display()))?;
        let mut registry = Self::builtin();
        registry
            .apply_overrides_json(&text)
            .with_context(|| format!("invalid profile overrides in {}", path.display()))?;
        Ok(registry)
    }

    pub fn apply_overrides_json(&mut self, text: &str) -> anyhow::Result<()> {
        let overrides = serde_json::from_str::<BTreeMap<AssetClass, AssetProfile>>(text)
            .context("profile overrides are not a valid JSON object keyed by asset class")?;
        for (class, profile) in overrides {
            profile
                .validate()
                .with_context(|| format!("profile override for {class} rejected"))?;
            tracing::debug!(asset = %class, name = %profile.name, "applying profile override");
            self.profiles.insert(class, profile);
        }
        Ok(())
    }

    pub fn get(&self, class: AssetClass) -> Option<&AssetProfile> {
        self.profiles.get(&class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, &AssetProfile)> {
        self.profiles.iter().map(|(c, p)| (*c, p))
    }
}

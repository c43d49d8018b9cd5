use serde::{Deserialize, Serialize};
use std::fmt;

/// Date-projection heuristics. Declaration order is the order in which a calculation runs them,
/// and therefore the order contributions are merged into a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Gann,
    Fibonacci,
    Lunar,
    Astro,
    Gematria,
    Natural,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::Gann,
        Method::Fibonacci,
        Method::Lunar,
        Method::Astro,
        Method::Gematria,
        Method::Natural,
    ];

    /// Wire key used in requests, weight tables and config files.
    pub fn key(self) -> &'static str {
        match self {
            Method::Gann => "gann",
            Method::Fibonacci => "fibonacci",
            Method::Lunar => "lunar",
            Method::Astro => "astro",
            Method::Gematria => "gematria",
            Method::Natural => "natural",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Method::Gann => "Gann",
            Method::Fibonacci => "Fibonacci",
            Method::Lunar => "Lunar Cycle",
            Method::Astro => "Astrology",
            Method::Gematria => "Gematria",
            Method::Natural => "Natural",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

pub mod convergence;
pub mod domain;
pub mod engine;
pub mod error;
pub mod projection;
pub mod report;
pub mod time;

pub mod config {
    use crate::domain::asset::AssetRegistry;
    use crate::domain::projection::MAX_HORIZON_DAYS;
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_HORIZON_DAYS: u32 = 180;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub port: u16,
        pub profiles_path: Option<PathBuf>,
        pub default_horizon_days: u32,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let port = match std::env::var("PORT") {
                Ok(v) => v
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a port number (got {v})"))?,
                Err(_) => DEFAULT_PORT,
            };

            let default_horizon_days = match std::env::var("TURNPOINT_DEFAULT_HORIZON_DAYS") {
                Ok(v) => {
                    let n = v.trim().parse::<u32>().with_context(|| {
                        format!("TURNPOINT_DEFAULT_HORIZON_DAYS must be a positive integer (got {v})")
                    })?;
                    anyhow::ensure!(
                        (1..=MAX_HORIZON_DAYS).contains(&n),
                        "TURNPOINT_DEFAULT_HORIZON_DAYS must be between 1 and {MAX_HORIZON_DAYS}"
                    );
                    n
                }
                Err(_) => DEFAULT_HORIZON_DAYS,
            };

            Ok(Self {
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                port,
                profiles_path: std::env::var("TURNPOINT_PROFILES_PATH")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .map(PathBuf::from),
                default_horizon_days,
            })
        }

        /// Built-in asset profiles, with overrides applied when `TURNPOINT_PROFILES_PATH` is set.
        pub fn load_registry(&self) -> anyhow::Result<AssetRegistry> {
            match &self.profiles_path {
                Some(path) => AssetRegistry::with_overrides_from_file(path),
                None => Ok(AssetRegistry::builtin()),
            }
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;
pub const DEFAULT_PREDICTION_TIMEOUT_MS: u64 = 5000;

/// Runtime settings, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    /// Files published under `/static`. Kept apart from `assets_dir` so the
    /// model and roster are never served.
    pub static_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub db_path: PathBuf,
    pub model_path: PathBuf,
    pub cache_capacity: usize,
    pub prediction_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let assets_dir = PathBuf::from(get("ASSETS_DIR").unwrap_or_else(|| "assets".to_string()));
        let model_path = get("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| assets_dir.join("model.json"));

        Config {
            port: parse_or(get("PORT"), 3000),
            static_dir: PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| "static".to_string())),
            dist_dir: PathBuf::from(get("DIST_DIR").unwrap_or_else(|| "dist".to_string())),
            db_path: PathBuf::from(
                get("DB_PATH").unwrap_or_else(|| "data/analytics.redb".to_string()),
            ),
            model_path,
            assets_dir,
            cache_capacity: parse_or(get("CACHE_CAPACITY"), DEFAULT_CACHE_CAPACITY),
            prediction_timeout: Duration::from_millis(parse_or(
                get("PREDICTION_TIMEOUT_MS"),
                DEFAULT_PREDICTION_TIMEOUT_MS,
            )),
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(value = %raw, "ignoring unparsable config value");
            default
        }),
        None => default,
    }
}

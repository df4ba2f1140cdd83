use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreKind::Redis),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store {other:?}, expected redis or memory")),
        }
    }
}

/// How the tip catalog is laid out under the tips key.
///
/// `List` keeps insertion order so positional ids never move and lives under
/// `l_protips` by default. `Set` matches data written by older deployments
/// under `protip`; its member order comes from the store and ids can shift
/// between reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLayout {
    List,
    Set,
}

impl FromStr for CatalogLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(CatalogLayout::List),
            "set" => Ok(CatalogLayout::Set),
            other => Err(format!("unknown catalog layout {other:?}, expected list or set")),
        }
    }
}

impl CatalogLayout {
    pub fn default_key(self) -> &'static str {
        match self {
            CatalogLayout::List => "l_protips",
            CatalogLayout::Set => "protip",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub redis_url: String,
    pub tips_key: String,
    pub votes_key: String,
    pub catalog_layout: CatalogLayout,
    pub store_timeout: Duration,
    pub tips_file: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_layout: CatalogLayout = try_load(&lookup, "PROTIP_CATALOG", "list")?;

        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "3016")?,
            store: try_load(&lookup, "PROTIP_STORE", "redis")?,
            redis_url: try_load(&lookup, "REDIS_URL", "redis://localhost:6379")?,
            tips_key: try_load(&lookup, "PROTIP_TIPS_KEY", catalog_layout.default_key())?,
            votes_key: try_load(&lookup, "PROTIP_VOTES_KEY", "protip_votes")?,
            catalog_layout,
            store_timeout: Duration::from_millis(try_load(&lookup, "STORE_TIMEOUT_MS", "500")?),
            tips_file: lookup("PROTIP_TIPS_FILE"),
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            AppError::Config(format!("invalid {key}: {e}"))
        })
}

/// Reads a tips file, one tip per line. Blank lines are skipped.
pub fn read_tips(path: &str) -> Result<Vec<String>> {
    read_to_string(path)
        .map(|s| {
            s.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<Vec<String>>()
        })
        .map_err(|e| {
            warn!("Failed to read tips from {path}: {e}");
            AppError::Config(format!("unreadable tips file {path}: {e}"))
        })
}

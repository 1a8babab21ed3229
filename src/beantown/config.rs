use crate::error::{BeanError, Result};
use crate::paging::freshness::CacheFreshness;
use crate::paging::{PagingConfig, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_BASE_URL: &str = "https://jellybellywikiapi.onrender.com/api/";
const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 60 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Keys accepted by [`BeanTownConfig::get`] and [`BeanTownConfig::set`].
pub const CONFIG_KEYS: [&str; 5] = [
    "base-url",
    "page-size",
    "cache-timeout",
    "request-timeout",
    "prefetch-distance",
];

/// Configuration for beantown, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BeanTownConfig {
    /// Root of the jelly bean REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Beans per remote page. Changing it invalidates the `page` stamps of
    /// cached beans until the next refresh.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Cache age (seconds) after which a new session refreshes first
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Defaults to the page size when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefetch_distance: Option<u32>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_cache_timeout() -> u64 {
    DEFAULT_CACHE_TIMEOUT_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for BeanTownConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            cache_timeout_secs: default_cache_timeout(),
            request_timeout_secs: default_request_timeout(),
            prefetch_distance: None,
        }
    }
}

impl BeanTownConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: BeanTownConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Paging parameters for a session, with an optional page size override.
    pub fn paging_config(&self, page_size: Option<u32>) -> PagingConfig {
        let config = PagingConfig::new(page_size.unwrap_or(self.page_size));
        match self.prefetch_distance {
            Some(distance) => config.with_prefetch_distance(distance),
            None => config,
        }
    }

    pub fn freshness(&self) -> CacheFreshness {
        CacheFreshness::new(Duration::from_secs(self.cache_timeout_secs))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "base-url" => Some(self.base_url.clone()),
            "page-size" => Some(self.page_size.to_string()),
            "cache-timeout" => Some(self.cache_timeout_secs.to_string()),
            "request-timeout" => Some(self.request_timeout_secs.to_string()),
            "prefetch-distance" => Some(
                self.prefetch_distance
                    .unwrap_or(self.page_size)
                    .to_string(),
            ),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base-url" => {
                let url = reqwest::Url::parse(value)
                    .map_err(|e| BeanError::Config(format!("Invalid URL {}: {}", value, e)))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(BeanError::Config(format!(
                        "Unsupported URL scheme: {}",
                        url.scheme()
                    )));
                }
                self.base_url = value.to_string();
            }
            "page-size" => self.page_size = to_u32(key, parse_positive(key, value)?)?,
            "cache-timeout" => self.cache_timeout_secs = parse_number(key, value)?,
            "request-timeout" => self.request_timeout_secs = parse_positive(key, value)?,
            "prefetch-distance" => {
                self.prefetch_distance = Some(to_u32(key, parse_number(key, value)?)?)
            }
            _ => return Err(BeanError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| BeanError::Config(format!("{} expects a number, got '{}'", key, value)))
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match parse_number(key, value)? {
        0 => Err(BeanError::Config(format!("{} must be greater than zero", key))),
        n => Ok(n),
    }
}

fn to_u32(key: &str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| BeanError::Config(format!("{} is too large: {}", key, value)))
}

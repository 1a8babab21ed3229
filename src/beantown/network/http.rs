use super::{JellyBeanNetworkSource, NetworkJellyBeans, INVALID_RESPONSE};
use crate::config::BeanTownConfig;
use crate::error::{BeanError, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const BEANS_PATH: &str = "beans";

/// [`JellyBeanNetworkSource`] backed by the public jelly bean REST API.
pub struct HttpJellyBeanSource {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpJellyBeanSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BeanError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn from_config(config: &BeanTownConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn beans_url(&self, page_index: u32, page_size: u32) -> Result<Url> {
        let mut url = self
            .base_url
            .join(BEANS_PATH)
            .map_err(|e| BeanError::Config(format!("Invalid base URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("pageIndex", &page_index.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }
}

/// `Url::join` drops the last path segment unless it ends with a slash.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    Url::parse(&with_slash).map_err(|e| BeanError::Config(format!("Invalid base URL {}: {}", raw, e)))
}

#[async_trait]
impl JellyBeanNetworkSource for HttpJellyBeanSource {
    async fn get_jelly_beans(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<NetworkJellyBeans> {
        let url = self.beans_url(page_index, page_size)?;
        let started = Instant::now();

        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| BeanError::Transport {
                page: page_index,
                source,
            })?;

        let status = response.status();
        info!(
            %status,
            path = BEANS_PATH,
            round_trip_ms = started.elapsed().as_millis() as u64,
            "response"
        );

        if !status.is_success() {
            warn!(%status, page = page_index, "unusable response for page");
            return Ok(INVALID_RESPONSE);
        }

        response
            .json::<NetworkJellyBeans>()
            .await
            .map_err(|source| BeanError::Transport {
                page: page_index,
                source,
            })
    }
}

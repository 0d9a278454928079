use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::config::ImageSearchConfig;
use crate::error::UpstreamError;

/// Suffix appended to every query to bias the provider toward food photos.
const QUERY_SUFFIX: &str = "food meal dish";
/// Fixed candidate page size requested from the provider.
const PAGE_SIZE: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCandidate {
    pub width: u32,
    pub height: u32,
    pub url: String,
}

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Return candidate photos for a food-item name, in provider order.
    async fn search(&self, name: &str) -> Result<Vec<PhotoCandidate>, UpstreamError>;
}

/// Pick the widest-aspect candidate. Stable: on equal ratio the earlier
/// candidate wins, preserving provider relevance order.
pub fn best_candidate(candidates: &[PhotoCandidate]) -> Option<&PhotoCandidate> {
    let mut best: Option<(&PhotoCandidate, f64)> = None;
    for candidate in candidates {
        let ratio = candidate.width as f64 / candidate.height.max(1) as f64;
        match best {
            Some((_, best_ratio)) if ratio <= best_ratio => {}
            _ => best = Some((candidate, ratio)),
        }
    }
    best.map(|(c, _)| c)
}

/// Resolve a food-item name to a photo URL. Never fails the caller: any
/// provider error or empty result degrades to an empty string.
pub async fn resolve(search: &dyn ImageSearch, name: &str) -> String {
    match search.search(name).await {
        Ok(candidates) => best_candidate(&candidates)
            .map(|c| c.url.clone())
            .unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, item = %name, "image lookup failed, leaving url empty");
            String::new()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    src: PhotoSrc,
}

#[derive(Debug, Deserialize)]
struct PhotoSrc {
    large: String,
}

pub struct PexelsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PexelsClient {
    pub fn new(cfg: &ImageSearchConfig, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl ImageSearch for PexelsClient {
    async fn search(&self, name: &str) -> Result<Vec<PhotoCandidate>, UpstreamError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str())
            .query(&[
                ("query", format!("{name} {QUERY_SUFFIX}")),
                ("per_page", PAGE_SIZE.to_string()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::new("images", e))?
            .error_for_status()
            .map_err(|e| UpstreamError::new("images", e))?;

        let payload: SearchPayload = response
            .json()
            .await
            .map_err(|e| UpstreamError::new("images", e))?;

        Ok(payload
            .photos
            .into_iter()
            .map(|p| PhotoCandidate {
                width: p.width,
                height: p.height,
                url: p.src.large,
            })
            .collect())
    }
}

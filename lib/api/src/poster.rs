//! TMDB poster client
//!
//! Looks up `GET {base}/3/movie/{id}` and turns `poster_path` into a full
//! image URL. Every failure is absorbed into [`ImageRef::Absent`].

use async_trait::async_trait;
use serde::Deserialize;
use simrec_core::{ImageFetcher, ImageRef, ItemId};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base: String,
    pub language: String,
    /// Per-request timeout; an expired request counts as "no image"
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Why a poster could not be produced; never leaves this module's
/// [`ImageFetcher`] impl
#[derive(Error, Debug)]
pub enum ImageFetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no poster_path in response")]
    MissingPoster,
}

#[derive(Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

pub struct TmdbPosterClient {
    client: reqwest::Client,
    config: TmdbConfig,
}

impl TmdbPosterClient {
    pub fn new(config: TmdbConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TmdbConfig {
        &self.config
    }

    fn details_url(&self, id: &ItemId) -> String {
        format!("{}/3/movie/{}", self.config.base_url.trim_end_matches('/'), id)
    }

    /// Full poster URL for `id`
    pub async fn poster_url(&self, id: &ItemId) -> Result<String, ImageFetchError> {
        let response = self
            .client
            .get(self.details_url(id))
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageFetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let details: MovieDetails = serde_json::from_slice(&body)?;

        match details.poster_path {
            Some(path) if !path.trim().is_empty() => Ok(format!(
                "{}/{}",
                self.config.image_base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )),
            _ => Err(ImageFetchError::MissingPoster),
        }
    }
}

#[async_trait]
impl ImageFetcher for TmdbPosterClient {
    async fn fetch_image(&self, id: &ItemId) -> ImageRef {
        match self.poster_url(id).await {
            Ok(url) => ImageRef::Url(url),
            Err(ImageFetchError::MissingPoster) => {
                debug!("No poster_path found for movie_id {}", id);
                ImageRef::Absent
            }
            Err(e) => {
                warn!("Error fetching poster for movie_id {}: {}", id, e);
                ImageRef::Absent
            }
        }
    }
}

use crate::ItemId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Illustrative image for a recommended item
///
/// Serialized as the URL string, or `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ImageRef {
    Url(String),
    Absent,
}

impl ImageRef {
    /// Text shown in place of a missing image
    pub const PLACEHOLDER: &'static str = "Poster not available";

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, ImageRef::Absent)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageRef::Url(url) => Some(url),
            ImageRef::Absent => None,
        }
    }

    /// The URL, or [`ImageRef::PLACEHOLDER`]
    pub fn display(&self) -> &str {
        self.url().unwrap_or(Self::PLACEHOLDER)
    }
}

impl From<Option<String>> for ImageRef {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(url) if !url.is_empty() => ImageRef::Url(url),
            _ => ImageRef::Absent,
        }
    }
}

impl From<ImageRef> for Option<String> {
    fn from(value: ImageRef) -> Self {
        match value {
            ImageRef::Url(url) => Some(url),
            ImageRef::Absent => None,
        }
    }
}

/// Source of illustrative images, keyed by external item id
///
/// Implementations never fail: "not found", timeouts and transport errors
/// all come back as [`ImageRef::Absent`].
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_image(&self, id: &ItemId) -> ImageRef;
}

/// Fetcher used when no image service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

#[async_trait]
impl ImageFetcher for NoImages {
    async fn fetch_image(&self, _id: &ItemId) -> ImageRef {
        ImageRef::Absent
    }
}

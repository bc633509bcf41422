//! Recommendation engine
//!
//! Resolves a title to its catalog position, selects the top-K row entries
//! of the similarity matrix and enriches the survivors with images.

use crate::image::{ImageFetcher, ImageRef};
use crate::topk::top_k;
use crate::{Catalog, Error, Item, Result, SimilarityMatrix};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_K: usize = 5;
pub const DEFAULT_IMAGE_CONCURRENCY: usize = 5;

#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    pub default_k: usize,
    /// Maximum in-flight image fetches per recommendation
    pub image_concurrency: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_k: DEFAULT_K,
            image_concurrency: DEFAULT_IMAGE_CONCURRENCY,
        }
    }
}

/// A ranked candidate before image enrichment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub item: Item,
    pub score: f32,
}

/// One slot of a recommendation result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedItem {
    pub item: Item,
    pub score: f32,
    pub image: ImageRef,
}

/// Outcome of a single query
///
/// Query failures never escape as errors: `entries` is empty and `failure`
/// says why.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub query: String,
    pub entries: Vec<RecommendedItem>,
    pub failure: Option<Error>,
}

impl Recommendation {
    fn failed(query: &str, error: Error) -> Self {
        Self {
            query: query.to_string(),
            entries: Vec::new(),
            failure: Some(error),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.item.title.as_str()).collect()
    }
}

/// Read-only recommender over a loaded catalog and similarity matrix
///
/// Holds no mutable state, so it can be shared behind an `Arc` and queried
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    matrix: Arc<SimilarityMatrix>,
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, matrix: Arc<SimilarityMatrix>) -> Result<Self> {
        Self::with_config(catalog, matrix, RecommenderConfig::default())
    }

    pub fn with_config(
        catalog: Arc<Catalog>,
        matrix: Arc<SimilarityMatrix>,
        config: RecommenderConfig,
    ) -> Result<Self> {
        if matrix.dim() != catalog.size() {
            return Err(Error::DataCorrupt(format!(
                "similarity matrix is {0}x{0} but catalog has {1} items",
                matrix.dim(),
                catalog.size()
            )));
        }
        Ok(Self {
            catalog,
            matrix,
            config,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Largest valid `k`: every item except the query itself
    #[inline]
    pub fn max_k(&self) -> usize {
        self.catalog.size().saturating_sub(1)
    }

    /// Clamp a requested `k` into `[1, N-1]`
    pub fn clamp_k(&self, k: usize) -> usize {
        k.clamp(1, self.max_k().max(1))
    }

    fn validate_k(&self, k: usize) -> Result<()> {
        if k < 1 || k > self.max_k() {
            return Err(Error::InvalidArgument(format!(
                "k must be in [1, {}], got {}",
                self.max_k(),
                k
            )));
        }
        Ok(())
    }

    /// Top-`k` most similar items to `title`, best first
    pub fn rank(&self, title: &str, k: usize) -> Result<Vec<Ranked>> {
        let position = self.catalog.find_position(title)?;
        self.validate_k(k)?;

        let row = self.matrix.row(position)?;
        top_k(row, position, k)
            .into_iter()
            .map(|(candidate, score)| {
                Ok(Ranked {
                    item: self.catalog.item_at(candidate)?.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Rank, then attach an image to every entry
    ///
    /// Fetches run with at most `image_concurrency` in flight; results keep
    /// the ranked order regardless of completion order.
    pub async fn recommend(
        &self,
        title: &str,
        k: usize,
        images: &dyn ImageFetcher,
    ) -> Recommendation {
        let ranked = match self.rank(title, k) {
            Ok(ranked) => ranked,
            Err(e) => {
                warn!("Could not recommend for {:?}: {}", title, e);
                return Recommendation::failed(title, e);
            }
        };

        let fetched: Vec<ImageRef> = stream::iter(ranked.iter().map(|r| images.fetch_image(&r.item.id)))
            .buffered(self.config.image_concurrency.max(1))
            .collect()
            .await;

        let entries: Vec<RecommendedItem> = ranked
            .into_iter()
            .zip(fetched)
            .map(|(ranked, image)| {
                if image.is_absent() {
                    debug!("No image for item {} ({})", ranked.item.id, ranked.item.title);
                }
                RecommendedItem {
                    item: ranked.item,
                    score: ranked.score,
                    image,
                }
            })
            .collect();

        Recommendation {
            query: title.to_string(),
            entries,
            failure: None,
        }
    }

    /// [`Recommender::recommend`] with the configured default `k`, clamped to
    /// the number of available candidates
    ///
    /// Used when the caller does not ask for a specific `k`. An explicit `k`
    /// goes through [`Recommender::recommend`] and is never clamped.
    pub async fn recommend_default(&self, title: &str, images: &dyn ImageFetcher) -> Recommendation {
        self.recommend(title, self.clamp_k(self.config.default_k), images).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::NoImages;
    use crate::ItemId;
    use async_trait::async_trait;
    use std::time::Duration;

    fn abcd() -> Recommender {
        let catalog = Catalog::new(
            ["A", "B", "C", "D"]
                .iter()
                .enumerate()
                .map(|(i, t)| (ItemId::Integer(i as u64 + 1), t.to_string()))
                .collect(),
        )
        .unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9, 0.9, 0.1],
            vec![0.9, 1.0, 0.4, 0.2],
            vec![0.9, 0.4, 1.0, 0.7],
            vec![0.1, 0.2, 0.7, 1.0],
        ])
        .unwrap();
        Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap()
    }

    /// Completes in reverse rank order and has no image for id 3
    struct SlowAndPatchy;

    #[async_trait]
    impl ImageFetcher for SlowAndPatchy {
        async fn fetch_image(&self, id: &ItemId) -> ImageRef {
            let delay = match id {
                ItemId::Integer(n) => *n * 10,
                ItemId::String(_) => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            match id {
                ItemId::Integer(3) => ImageRef::Absent,
                other => ImageRef::Url(format!("https://img/{}.jpg", other)),
            }
        }
    }

    #[test]
    fn test_rank_tie_break() {
        let rec = abcd();
        let ranked = rec.rank("A", 2).unwrap();
        let titles: Vec<&str> = ranked.iter().map(|r| r.item.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_rank_never_returns_self() {
        let rec = abcd();
        for title in ["A", "B", "C", "D"] {
            let ranked = rec.rank(title, rec.max_k()).unwrap();
            assert_eq!(ranked.len(), 3);
            assert!(ranked.iter().all(|r| r.item.title != title));
            assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_invalid_k() {
        let rec = abcd();
        assert!(matches!(rec.rank("A", 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(rec.rank("A", 4), Err(Error::InvalidArgument(_))));
        assert_eq!(rec.clamp_k(0), 1);
        assert_eq!(rec.clamp_k(99), 3);
    }

    #[test]
    fn test_mismatched_dimensions() {
        let catalog = Catalog::new(vec![(ItemId::Integer(1), "A".to_string())]).unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let err = Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap_err();
        assert!(matches!(err, Error::DataCorrupt(_)));
    }

    #[tokio::test]
    async fn test_unknown_title_is_empty_with_failure() {
        let rec = abcd();
        let result = rec.recommend("Z", 2, &NoImages).await;
        assert!(result.is_empty());
        assert_eq!(result.failure, Some(Error::NotFound("Z".to_string())));
    }

    #[tokio::test]
    async fn test_missing_image_keeps_slot_and_order() {
        let rec = abcd();
        let result = rec.recommend("D", 3, &SlowAndPatchy).await;
        assert!(result.is_ok());
        assert_eq!(result.titles(), vec!["C", "B", "A"]);
        assert!(result.entries[0].image.is_absent());
        assert_eq!(result.entries[1].image.url(), Some("https://img/2.jpg"));
        assert_eq!(result.entries[2].image.url(), Some("https://img/1.jpg"));
    }

    #[tokio::test]
    async fn test_default_k() {
        let rec = abcd();
        // default_k is 5 but only three candidates exist
        let result = rec.recommend_default("A", &NoImages).await;
        assert!(result.is_ok());
        assert_eq!(result.titles(), vec!["B", "C", "D"]);
        assert!(result.entries.iter().all(|e| e.image.is_absent()));

        // An explicit k is not clamped
        let result = rec.recommend("A", rec.config().default_k, &NoImages).await;
        assert!(result.is_empty());
        assert!(matches!(result.failure, Some(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_single_item_catalog() {
        let catalog = Catalog::new(vec![(ItemId::Integer(7), "Solo".to_string())]).unwrap();
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let rec = Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap();

        assert_eq!(rec.max_k(), 0);
        assert_eq!(rec.clamp_k(5), 1);
        assert!(matches!(rec.rank("Solo", 1), Err(Error::InvalidArgument(_))));

        let result = rec.recommend("Solo", 1, &NoImages).await;
        assert!(result.is_empty());
        assert!(matches!(result.failure, Some(Error::InvalidArgument(_))));

        let result = rec.recommend_default("Solo", &NoImages).await;
        assert!(result.is_empty());
        assert!(matches!(result.failure, Some(Error::InvalidArgument(_))));
    }
}

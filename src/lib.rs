//! # simrec
//!
//! Item-to-item recommendations from a precomputed similarity matrix.
//!
//! simrec loads a fixed catalog and its N x N similarity matrix once, then
//! answers "what is most like this title?" with a deterministic top-K
//! lookup, enriching every result with a poster image when one is available.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! simrec --data-dir ./artifacts serve --http-port 8501
//! curl 'http://localhost:8501/recommend?title=Avatar'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use simrec::prelude::*;
//!
//! # async fn run() -> simrec::Result<()> {
//! let store = ArtifactStore::new("./artifacts");
//! let recommender = store.init()?;
//!
//! let result = recommender.recommend("Avatar", 5, &NoImages).await;
//! for entry in &result.entries {
//!     println!("{} {}", entry.item.title, entry.image.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `simrec-core` - Catalog, similarity matrix, top-K selection, recommender
//! - `simrec-storage` - Artifact loading/validation and the init-once store
//! - `simrec-api` - TMDB poster client and REST surface

// Re-export core types
pub use simrec_core::{
    Catalog, Error, ImageFetcher, ImageRef, Item, ItemId, NoImages, Ranked, Recommendation,
    RecommendedItem, Recommender, RecommenderConfig, Result, SimilarityMatrix,
};

// Re-export storage
pub use simrec_storage::ArtifactStore;

// Re-export API
pub use simrec_api::{RestApi, TmdbConfig, TmdbPosterClient};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactStore, Catalog, Error, ImageFetcher, ImageRef, Item, ItemId, NoImages,
        Recommendation, Recommender, RecommenderConfig, Result, RestApi, SimilarityMatrix,
        TmdbConfig, TmdbPosterClient,
    };
}

/// Top-K selection primitives
pub mod topk {
    pub use simrec_core::topk::{top_k, top_k_by_sort};
}

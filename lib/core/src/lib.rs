//! # simrec Core
//!
//! Core library for the simrec recommender.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`Item`] - A catalog entry with external id, title and position
//! - [`Catalog`] - The fixed, position-indexed item list
//! - [`SimilarityMatrix`] - Dense N x N precomputed similarity scores
//! - [`topk`] - Heap-based top-K selection with deterministic tie-breaking
//! - [`Recommender`] - Title in, ranked and image-enriched items out
//!
//! ## Example
//!
//! ```rust
//! use simrec_core::{Catalog, ItemId, NoImages, Recommender, SimilarityMatrix};
//! use std::sync::Arc;
//!
//! let catalog = Catalog::new(vec![
//!     (ItemId::Integer(1), "A".to_string()),
//!     (ItemId::Integer(2), "B".to_string()),
//!     (ItemId::Integer(3), "C".to_string()),
//! ]).unwrap();
//! let matrix = SimilarityMatrix::from_rows(vec![
//!     vec![1.0, 0.2, 0.8],
//!     vec![0.2, 1.0, 0.5],
//!     vec![0.8, 0.5, 1.0],
//! ]).unwrap();
//!
//! let recommender = Recommender::new(Arc::new(catalog), Arc::new(matrix)).unwrap();
//! let ranked = recommender.rank("A", 2).unwrap();
//! assert_eq!(ranked[0].item.title, "C");
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod image;
pub mod item;
pub mod matrix;
pub mod topk;

pub use catalog::Catalog;
pub use engine::{
    Ranked, Recommendation, RecommendedItem, Recommender, RecommenderConfig, DEFAULT_IMAGE_CONCURRENCY,
    DEFAULT_K,
};
pub use error::{Error, Result};
pub use image::{ImageFetcher, ImageRef, NoImages};
pub use item::{Item, ItemId};
pub use matrix::SimilarityMatrix;

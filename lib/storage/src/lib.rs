//! # simrec Storage
//!
//! Loading, validation and writing of the two persisted artifacts (catalog
//! and similarity matrix), plus the init-once [`ArtifactStore`] that turns
//! them into a shared [`simrec_core::Recommender`].

pub mod artifacts;
pub mod manager;

pub use artifacts::{load_catalog, load_matrix, save_catalog, save_matrix, CatalogRecord, MatrixData};
pub use manager::{ArtifactStore, DEFAULT_CATALOG_FILE, DEFAULT_MATRIX_FILE};

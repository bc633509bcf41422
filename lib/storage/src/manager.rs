use crate::artifacts::{load_catalog, load_matrix, save_catalog, save_matrix};
use parking_lot::RwLock;
use simrec_core::{Catalog, Error, Recommender, RecommenderConfig, Result, SimilarityMatrix};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_CATALOG_FILE: &str = "movie_list.json";
pub const DEFAULT_MATRIX_FILE: &str = "similarity.bin";

/// Tolerance for the load-time symmetry check
const SYMMETRY_TOLERANCE: f32 = 1e-5;

/// Owns the artifact locations and the recommender built from them
///
/// Queries are rejected with `DataUnavailable` until [`ArtifactStore::init`]
/// has loaded both artifacts successfully. A failed init installs nothing.
pub struct ArtifactStore {
    data_dir: PathBuf,
    catalog_file: String,
    matrix_file: String,
    config: RecommenderConfig,
    recommender: RwLock<Option<Arc<Recommender>>>,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            matrix_file: DEFAULT_MATRIX_FILE.to_string(),
            config: RecommenderConfig::default(),
            recommender: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_files(mut self, catalog_file: impl Into<String>, matrix_file: impl Into<String>) -> Self {
        self.catalog_file = catalog_file.into();
        self.matrix_file = matrix_file.into();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: RecommenderConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    pub fn matrix_path(&self) -> PathBuf {
        self.data_dir.join(&self.matrix_file)
    }

    /// Load both artifacts, cross-check them and install the recommender
    ///
    /// Installs at most once: after a successful init, later calls return
    /// the recommender already being served without touching the disk.
    pub fn init(&self) -> Result<Arc<Recommender>> {
        if let Some(installed) = self.recommender.read().clone() {
            debug!("Artifacts already initialized; keeping loaded state");
            return Ok(installed);
        }

        let catalog_path = self.catalog_path();
        let matrix_path = self.matrix_path();

        let catalog = load_catalog(&catalog_path)?;
        info!("Loaded catalog from {:?}: {} items", catalog_path, catalog.size());

        let matrix = load_matrix(&matrix_path)?;
        info!("Loaded similarity matrix from {:?}: {dim}x{dim}", matrix_path, dim = matrix.dim());

        if let Some((i, j)) = matrix.asymmetry(SYMMETRY_TOLERANCE) {
            warn!(
                "Similarity matrix is not symmetric: sim[{i}][{j}]={:?}, sim[{j}][{i}]={:?}",
                matrix.get(i, j),
                matrix.get(j, i)
            );
        }

        let recommender = Arc::new(Recommender::with_config(
            Arc::new(catalog),
            Arc::new(matrix),
            self.config.clone(),
        )?);

        // A concurrent init may have won the race while we were loading
        let mut slot = self.recommender.write();
        Ok(slot.get_or_insert(recommender).clone())
    }

    /// The installed recommender, or `DataUnavailable` before init
    pub fn recommender(&self) -> Result<Arc<Recommender>> {
        self.recommender
            .read()
            .clone()
            .ok_or_else(|| Error::DataUnavailable("artifacts not initialized".to_string()))
    }

    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.recommender.read().is_some()
    }

    /// Write both artifacts under this store's file names
    pub fn save(&self, catalog: &Catalog, matrix: &SimilarityMatrix) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        save_catalog(&self.catalog_path(), catalog)?;
        save_matrix(&self.matrix_path(), matrix)?;
        Ok(())
    }
}

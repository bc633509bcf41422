//! Persisted artifacts produced by the offline pipeline
//!
//! The catalog is JSON (optionally gzip-compressed), either as a list of
//! `{id, title}` rows or as a column-oriented frame dict
//! `{"movie_id": {"0": ..}, "title": {"0": ..}}`. The similarity matrix is
//! bincode-encoded [`MatrixData`].

use anyhow::{anyhow, Context};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use simrec_core::{Catalog, Error, ItemId, Result, SimilarityMatrix};
use std::io::{Read, Write};
use std::path::Path;

/// Column names accepted for the external id
const ID_KEYS: [&str; 2] = ["id", "movie_id"];
const TITLE_KEY: &str = "title";

/// Row form of a catalog entry, as written by [`save_catalog`]
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "movie_id")]
    pub id: ItemId,
    pub title: String,
}

/// On-disk similarity matrix
#[derive(Debug, Serialize, Deserialize)]
pub struct MatrixData {
    pub dim: u64,
    pub data: Vec<f32>,
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let raw = std::fs::read(path)
        .map_err(|e| Error::DataUnavailable(format!("{}: {}", path.display(), e)))?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| Error::DataCorrupt(format!("{}: gzip: {}", path.display(), e)))?;
        Ok(decoded)
    } else {
        Ok(raw)
    }
}

/// Load and validate the catalog
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let bytes = read_bytes(path)?;
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::DataCorrupt(format!("{}: {}", path.display(), e)))?;
    let records = parse_catalog(&value)?;
    Catalog::new(records)
}

/// Turn a decoded catalog document into `(id, title)` records in storage order
pub fn parse_catalog(value: &Value) -> Result<Vec<(ItemId, String)>> {
    match value {
        Value::Array(rows) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_row(i, row))
            .collect(),
        Value::Object(columns) if columns.contains_key(TITLE_KEY) => parse_columns(columns),
        _ => Err(Error::DataCorrupt(
            "catalog must be a list of records or a column dict with a 'title' column".to_string(),
        )),
    }
}

fn parse_row(index: usize, row: &Value) -> Result<(ItemId, String)> {
    let obj = row
        .as_object()
        .ok_or_else(|| Error::DataCorrupt(format!("catalog entry {} is not an object", index)))?;

    let id = ID_KEYS
        .iter()
        .find_map(|key| obj.get(*key))
        .ok_or_else(|| Error::DataCorrupt(format!("catalog entry {} has no id", index)))?;
    let title = obj
        .get(TITLE_KEY)
        .ok_or_else(|| Error::DataCorrupt(format!("catalog entry {} has no title", index)))?;

    Ok((parse_id(index, id)?, parse_title(index, title)?))
}

fn parse_columns(columns: &Map<String, Value>) -> Result<Vec<(ItemId, String)>> {
    let ids = ID_KEYS
        .iter()
        .find_map(|key| columns.get(*key))
        .and_then(Value::as_object)
        .ok_or_else(|| Error::DataCorrupt("catalog has no id column".to_string()))?;
    let titles = columns
        .get(TITLE_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| Error::DataCorrupt("title column is not a dict".to_string()))?;

    if ids.len() != titles.len() {
        return Err(Error::DataCorrupt(format!(
            "id column has {} rows, title column has {}",
            ids.len(),
            titles.len()
        )));
    }

    // Frame rows are keyed by their original row label
    let mut rows: Vec<(usize, &String)> = Vec::with_capacity(titles.len());
    for key in titles.keys() {
        let label = key
            .parse::<usize>()
            .map_err(|_| Error::DataCorrupt(format!("row label {:?} is not an integer", key)))?;
        rows.push((label, key));
    }
    rows.sort_unstable_by_key(|(label, _)| *label);
    if let Some(pair) = rows.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(Error::DataCorrupt(format!(
            "row labels {:?} and {:?} both resolve to row {}",
            pair[0].1, pair[1].1, pair[0].0
        )));
    }

    rows.into_iter()
        .enumerate()
        .map(|(i, (_, key))| {
            let id = ids
                .get(key)
                .ok_or_else(|| Error::DataCorrupt(format!("row {} has a title but no id", key)))?;
            Ok((parse_id(i, id)?, parse_title(i, &titles[key])?))
        })
        .collect()
}

/// Ids are non-negative integers (TMDB style) or non-empty strings
fn parse_id(index: usize, value: &Value) -> Result<ItemId> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(ItemId::Integer(u));
            }
            // Integral floats show up when a column held NaNs upstream
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(ItemId::Integer(f as u64)),
                _ => Err(Error::DataCorrupt(format!("catalog entry {} has invalid id {}", index, n))),
            }
        }
        Value::String(s) if !s.is_empty() => Ok(ItemId::String(s.clone())),
        other => Err(Error::DataCorrupt(format!(
            "catalog entry {} has invalid id {}",
            index, other
        ))),
    }
}

fn parse_title(index: usize, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::DataCorrupt(format!("catalog entry {} has a non-string title", index)))
}

/// Load and validate the similarity matrix
pub fn load_matrix(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_bytes(path)?;
    let data: MatrixData = bincode::deserialize(&bytes)
        .map_err(|e| Error::DataCorrupt(format!("{}: {}", path.display(), e)))?;
    let dim = usize::try_from(data.dim)
        .map_err(|_| Error::DataCorrupt(format!("matrix dimension {} too large", data.dim)))?;
    SimilarityMatrix::new(dim, data.data)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(bytes))
        .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))
}

/// Write the catalog as JSON rows
pub fn save_catalog(path: &Path, catalog: &Catalog) -> anyhow::Result<()> {
    let records: Vec<CatalogRecord> = catalog
        .iter()
        .map(|item| CatalogRecord {
            id: item.id.clone(),
            title: item.title.clone(),
        })
        .collect();
    let json = serde_json::to_vec(&records).context("Serialization error")?;
    write_atomic(path, &json)
}

pub fn save_matrix(path: &Path, matrix: &SimilarityMatrix) -> anyhow::Result<()> {
    let data = MatrixData {
        dim: matrix.dim() as u64,
        data: matrix.as_slice().to_vec(),
    };
    let bytes = bincode::serialize(&data).map_err(|e| anyhow!("Serialization error: {}", e))?;
    write_atomic(path, &bytes)
}

// In: src/chunk_store/source.rs

//! Data sources for the chunk store.
//!
//! A source is anything that can be decoded into a stream of record batches
//! restricted to the first `prefix` columns. `ParquetSource` is the on-disk
//! implementation; `MemorySource` wraps batches that already live in memory.

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::datatypes::SchemaRef;
use arrow::record_batch::{RecordBatch, RecordBatchIterator, RecordBatchReader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;

use crate::error::{IndisortError, Result};
use crate::log_metric;

//==================================================================================
// 1. The Source Contract
//==================================================================================

/// **CONTRACT:** a data unit that decodes into record batches.
///
/// The returned reader must yield batches whose first `prefix` columns are the
/// first `prefix` columns of the source's schema, in order.
pub trait BatchSource {
    /// Human-readable name used in logs and error messages.
    fn name(&self) -> String;

    fn batches(&self, prefix: usize) -> Result<Box<dyn RecordBatchReader + '_>>;
}

//==================================================================================
// 2. Filesystem Discovery
//==================================================================================

/// Strips a `file://` scheme, leaving plain paths untouched.
pub fn path_from_uri(uri: &str) -> Result<PathBuf> {
    if let Some(rest) = uri.strip_prefix("file://") {
        if rest.is_empty() {
            return Err(IndisortError::InvalidConfig(format!(
                "URI '{}' has no path",
                uri
            )));
        }
        return Ok(PathBuf::from(rest));
    }
    if let Some((scheme, _)) = uri.split_once("://") {
        return Err(IndisortError::InvalidConfig(format!(
            "unsupported URI scheme '{}'",
            scheme
        )));
    }
    Ok(PathBuf::from(uri))
}

/// Lists every non-directory entry below `uri`, recursively, in sorted path order.
///
/// Symlinks are followed, so a linked partition directory is walked like a real one.
pub fn discover(uri: &str) -> Result<Vec<PathBuf>> {
    let root = path_from_uri(uri)?;
    let mut files = Vec::new();
    walk(&root, &mut files)?;
    files.sort();

    if files.is_empty() {
        return Err(IndisortError::EmptyDataset(format!(
            "no data files under {}",
            root.display()
        )));
    }

    log_metric!("event"="discover", "root"=root.display(), "files"=files.len());
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if std::fs::metadata(&path)?.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

//==================================================================================
// 3. Parquet Files
//==================================================================================

/// An opened Parquet file.
pub struct ParquetSource {
    path: PathBuf,
    file: File,
}

impl ParquetSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Opens every file found under `uri`.
    pub fn open_all(uri: &str) -> Result<Vec<Self>> {
        discover(uri)?
            .iter()
            .map(|path| Self::open(path))
            .collect()
    }
}

impl BatchSource for ParquetSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn batches(&self, prefix: usize) -> Result<Box<dyn RecordBatchReader + '_>> {
        // Each call gets its own handle so repeated loads re-read from the start.
        let file = self.file.try_clone()?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let schema_descr = builder.metadata().file_metadata().schema_descr();
        let available = schema_descr.num_columns();
        if available < prefix {
            return Err(IndisortError::SchemaMismatch(format!(
                "{} has {} columns, {} requested",
                self.name(),
                available,
                prefix
            )));
        }

        let projection = ProjectionMask::leaves(schema_descr, 0..prefix);
        let reader = builder.with_projection(projection).build()?;
        Ok(Box::new(reader))
    }
}

//==================================================================================
// 4. In-Memory Batches
//==================================================================================

/// Batches that are already decoded, e.g. produced by a test or generator.
pub struct MemorySource {
    name: String,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            name: name.into(),
            schema,
            batches,
        }
    }
}

impl BatchSource for MemorySource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn batches(&self, prefix: usize) -> Result<Box<dyn RecordBatchReader + '_>> {
        if self.schema.fields().len() < prefix {
            return Err(IndisortError::SchemaMismatch(format!(
                "{} has {} columns, {} requested",
                self.name,
                self.schema.fields().len(),
                prefix
            )));
        }

        let indices: Vec<usize> = (0..prefix).collect();
        let schema = std::sync::Arc::new(self.schema.project(&indices)?);
        let projected = self
            .batches
            .iter()
            .map(|batch| batch.project(&indices))
            .collect::<Vec<_>>();

        Ok(Box::new(RecordBatchIterator::new(projected, schema)))
    }
}

// In: src/chunk_store/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Chunk Store
// ====================================================================================
//
// The chunk store owns every decoded value for the lifetime of a benchmark run.
// It is populated once and is read-only afterwards; nothing downstream ever moves
// or copies a value out of it except through `value_at`.
//
//   [BatchSource] --(record batches, first `prefix` columns)--> [ChunkStore]
//                                                                   |
//            columns[c][k] : Int64Array (chunk k of column c) <-----'
//
// Chunk `k` of every column comes from the same batch, so all columns share one
// chunk-length table and a single `RowRef` addresses a row in every column.
// ====================================================================================

pub mod source;

#[cfg(test)]
mod store_tests;

use arrow::array::{Array, AsArray, Int64Array};
use arrow::datatypes::{Int64Type, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchReader};

use crate::error::{IndisortError, Result};
use crate::log_metric;
use crate::types::{ColumnType, RowRef};
use source::BatchSource;

/// Immutable, chunked storage of `i64` columns.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    /// `columns[column_id][chunk_id]`
    columns: Vec<Vec<Int64Array>>,
    /// Shared by every column.
    chunk_lens: Vec<u32>,
    total_rows: usize,
}

impl ChunkStore {
    /// An empty store expecting `num_columns` aligned columns.
    pub fn with_columns(num_columns: usize) -> Self {
        Self {
            columns: vec![Vec::new(); num_columns],
            chunk_lens: Vec::new(),
            total_rows: 0,
        }
    }

    /// Decodes every source in order and appends its batches.
    ///
    /// Any failure aborts the whole load: a partially loaded store is never
    /// returned, since a benchmark over incomplete data would be misleading.
    pub fn load<S: BatchSource>(sources: &[S], prefix: usize) -> Result<Self> {
        if prefix == 0 {
            return Err(IndisortError::InvalidConfig(
                "column prefix must be at least 1".to_string(),
            ));
        }

        let mut store = Self::with_columns(prefix);
        for source in sources {
            let before = store.num_chunks();
            let reader = source.batches(prefix)?;
            // A source with no rows still has to declare the right key columns.
            check_key_schema(&reader.schema(), prefix)
                .map_err(|e| with_source(e, &source.name()))?;
            for batch in reader {
                store
                    .append_batch(&batch?)
                    .map_err(|e| with_source(e, &source.name()))?;
            }
            log::debug!(
                "loaded {} chunks from {}",
                store.num_chunks() - before,
                source.name()
            );
        }

        if store.total_rows == 0 {
            return Err(IndisortError::EmptyDataset(format!(
                "{} sources decoded to zero rows",
                sources.len()
            )));
        }

        log_metric!(
            "event"="store_loaded",
            "sources"=sources.len(),
            "chunks"=store.num_chunks(),
            "rows"=store.total_rows
        );
        Ok(store)
    }

    /// Builds a store from arrays that are already in memory.
    ///
    /// `columns[c][k]` is chunk `k` of column `c`.
    pub fn from_columns(columns: Vec<Vec<Int64Array>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(IndisortError::SchemaMismatch(
                "a store needs at least one column".to_string(),
            ));
        }

        let num_chunks = columns[0].len();
        if let Some((c, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, col)| col.len() != num_chunks)
        {
            return Err(IndisortError::SchemaMismatch(format!(
                "column {} has {} chunks, column 0 has {}",
                c,
                col.len(),
                num_chunks
            )));
        }
        check_chunk_id(num_chunks)?;

        let mut chunk_lens = Vec::with_capacity(num_chunks);
        for k in 0..num_chunks {
            let len = columns[0][k].len();
            for (c, col) in columns.iter().enumerate() {
                if col[k].len() != len {
                    return Err(IndisortError::SchemaMismatch(format!(
                        "chunk {} has {} rows in column 0 but {} in column {}",
                        k,
                        len,
                        col[k].len(),
                        c
                    )));
                }
                check_no_nulls(&col[k], c)?;
            }
            chunk_lens.push(check_chunk_len(len)?);
        }

        let total_rows = chunk_lens.iter().map(|&l| l as usize).sum();
        Ok(Self {
            columns,
            chunk_lens,
            total_rows,
        })
    }

    /// Appends one batch as one chunk per column.
    ///
    /// The batch must carry at least `num_columns()` columns; the leading ones must
    /// be null-free `Int64`. Zero-row batches are type-checked, then skipped.
    pub fn append_batch(&mut self, batch: &RecordBatch) -> Result<()> {
        let num_columns = self.columns.len();
        check_key_schema(&batch.schema(), num_columns)?;
        if batch.num_rows() == 0 {
            return Ok(());
        }

        check_chunk_id(self.chunk_lens.len() + 1)?;
        let len = check_chunk_len(batch.num_rows())?;

        // Validate every column before touching the store so a bad batch
        // leaves it unchanged.
        let mut arrays = Vec::with_capacity(num_columns);
        for column_id in 0..num_columns {
            let column = batch.column(column_id);
            let array = column.as_primitive::<Int64Type>().clone();
            check_no_nulls(&array, column_id)?;
            arrays.push(array);
        }

        for (column, array) in self.columns.iter_mut().zip(arrays) {
            column.push(array);
        }
        self.chunk_lens.push(len);
        self.total_rows += len as usize;
        Ok(())
    }

    /// Resolves `row` in column `column_id`.
    ///
    /// The caller guarantees `row` is valid; the logical index establishes that
    /// once at build time.
    #[inline]
    pub fn value_at(&self, column_id: usize, row: RowRef) -> i64 {
        self.columns[column_id][row.chunk_id as usize].value(row.offset as usize)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_chunks(&self) -> usize {
        self.chunk_lens.len()
    }

    pub fn chunk_len(&self, chunk_id: usize) -> usize {
        self.chunk_lens[chunk_id] as usize
    }

    pub fn chunk_lens(&self) -> &[u32] {
        &self.chunk_lens
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn chunk(&self, column_id: usize, chunk_id: usize) -> &Int64Array {
        &self.columns[column_id][chunk_id]
    }

    /// Returns `true` if `row` addresses an existing row.
    pub fn contains(&self, row: RowRef) -> bool {
        self.chunk_lens
            .get(row.chunk_id as usize)
            .map_or(false, |&len| row.offset < len)
    }
}

/// Requires the first `prefix` fields of `schema` to be `Int64`.
///
/// Nullable fields pass; nulls are rejected per batch by `check_no_nulls`.
fn check_key_schema(schema: &Schema, prefix: usize) -> Result<()> {
    let fields = schema.fields();
    if fields.len() < prefix {
        return Err(IndisortError::SchemaMismatch(format!(
            "schema has {} columns, store expects {}",
            fields.len(),
            prefix
        )));
    }
    for (column_id, field) in fields.iter().take(prefix).enumerate() {
        ColumnType::require_chunk_type(field.data_type(), column_id)?;
    }
    Ok(())
}

fn with_source(err: IndisortError, source: &str) -> IndisortError {
    match err {
        IndisortError::SchemaMismatch(msg) => {
            IndisortError::SchemaMismatch(format!("{}: {}", source, msg))
        }
        IndisortError::UnsupportedType(msg) => {
            IndisortError::UnsupportedType(format!("{}: {}", source, msg))
        }
        other => other,
    }
}

fn check_no_nulls(array: &Int64Array, column_id: usize) -> Result<()> {
    if array.null_count() > 0 {
        return Err(IndisortError::SchemaMismatch(format!(
            "column {} contains {} nulls; key columns must be non-null",
            column_id,
            array.null_count()
        )));
    }
    Ok(())
}

fn check_chunk_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| {
        IndisortError::SchemaMismatch(format!("chunk of {} rows exceeds u32 offsets", len))
    })
}

fn check_chunk_id(num_chunks: usize) -> Result<()> {
    if num_chunks > u32::MAX as usize {
        return Err(IndisortError::SchemaMismatch(format!(
            "{} chunks exceed u32 chunk ids",
            num_chunks
        )));
    }
    Ok(())
}

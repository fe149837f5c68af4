use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::source::{MemorySource, ParquetSource};
use super::ChunkStore;
use crate::error::IndisortError;
use crate::types::RowRef;

// Test Helpers
fn lineitem_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("l_orderkey", DataType::Int64, false),
        Field::new("l_partkey", DataType::Int64, false),
        Field::new("l_suppkey", DataType::Int64, false),
        Field::new("l_linenumber", DataType::Int64, false),
        Field::new("l_quantity", DataType::Float64, false),
    ]))
}

fn lineitem_batch(schema: &SchemaRef, orderkeys: Vec<i64>) -> RecordBatch {
    let n = orderkeys.len() as i64;
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(orderkeys)),
        Arc::new(Int64Array::from((0..n).map(|i| i * 10).collect::<Vec<_>>())),
        Arc::new(Int64Array::from((0..n).map(|i| i + 100).collect::<Vec<_>>())),
        Arc::new(Int64Array::from((0..n).map(|i| i % 7).collect::<Vec<_>>())),
        Arc::new(Float64Array::from((0..n).map(|i| i as f64).collect::<Vec<_>>())),
    ];
    RecordBatch::try_new(schema.clone(), columns).unwrap()
}

fn float_key_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("l_extendedprice", DataType::Float64, false),
        Field::new("l_discount", DataType::Float64, false),
    ]))
}

/// A file with a footer and a schema but no row groups.
fn write_empty_parquet(path: &Path, schema: SchemaRef) {
    let file = File::create(path).unwrap();
    let writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.close().unwrap();
}

fn write_parquet(path: &Path, batches: &[RecordBatch]) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batches[0].schema(), None).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
}

//==================================================================================
// In-memory construction
//==================================================================================

#[test]
fn test_from_columns_resolves_values() {
    let store = ChunkStore::from_columns(vec![
        vec![Int64Array::from(vec![10, 2]), Int64Array::from(vec![7, 9, 4])],
        vec![Int64Array::from(vec![1, 1]), Int64Array::from(vec![2, 2, 2])],
    ])
    .unwrap();

    assert_eq!(store.num_columns(), 2);
    assert_eq!(store.num_chunks(), 2);
    assert_eq!(store.total_rows(), 5);
    assert_eq!(store.chunk_len(1), 3);
    assert_eq!(store.value_at(0, RowRef::new(1, 2)), 4);
    assert_eq!(store.value_at(1, RowRef::new(0, 1)), 1);
    assert!(store.contains(RowRef::new(1, 2)));
    assert!(!store.contains(RowRef::new(1, 3)));
    assert!(!store.contains(RowRef::new(2, 0)));
}

#[test]
fn test_from_columns_rejects_misaligned_chunks() {
    let err = ChunkStore::from_columns(vec![
        vec![Int64Array::from(vec![1, 2])],
        vec![Int64Array::from(vec![1, 2, 3])],
    ])
    .unwrap_err();
    assert!(matches!(err, IndisortError::SchemaMismatch(_)));

    let err = ChunkStore::from_columns(vec![
        vec![Int64Array::from(vec![1]), Int64Array::from(vec![2])],
        vec![Int64Array::from(vec![1])],
    ])
    .unwrap_err();
    assert!(matches!(err, IndisortError::SchemaMismatch(_)));
}

#[test]
fn test_from_columns_rejects_nulls() {
    let err = ChunkStore::from_columns(vec![vec![Int64Array::from(vec![Some(1), None])]])
        .unwrap_err();
    assert!(err.to_string().contains("nulls"));
}

#[test]
fn test_append_batch_skips_empty_and_checks_types() {
    let schema = lineitem_schema();
    let mut store = ChunkStore::with_columns(4);

    store.append_batch(&lineitem_batch(&schema, vec![])).unwrap();
    assert_eq!(store.num_chunks(), 0);

    store.append_batch(&lineitem_batch(&schema, vec![3, 1, 2])).unwrap();
    assert_eq!(store.num_chunks(), 1);
    assert_eq!(store.value_at(2, RowRef::new(0, 1)), 101);

    // Five leading columns would reach the Float64 one.
    let mut wide = ChunkStore::with_columns(5);
    let err = wide
        .append_batch(&lineitem_batch(&schema, vec![1]))
        .unwrap_err();
    assert!(matches!(err, IndisortError::UnsupportedType(_)));
    assert_eq!(wide.num_chunks(), 0);
    assert_eq!(wide.total_rows(), 0);
}

#[test]
fn test_append_batch_type_checks_empty_batches() {
    let schema = float_key_schema();
    let mut store = ChunkStore::with_columns(2);
    let err = store
        .append_batch(&RecordBatch::new_empty(schema))
        .unwrap_err();
    assert!(matches!(err, IndisortError::UnsupportedType(_)));
}

//==================================================================================
// Loading from sources
//==================================================================================

#[test]
fn test_load_rejects_wrong_key_types_in_a_source_without_rows() {
    let float_schema = float_key_schema();
    let lineitem = lineitem_schema();

    for empty_batches in [vec![RecordBatch::new_empty(float_schema.clone())], vec![]] {
        let sources = vec![
            MemorySource::new("floats", float_schema.clone(), empty_batches),
            MemorySource::new(
                "lineitem",
                lineitem.clone(),
                vec![lineitem_batch(&lineitem, vec![3, 1])],
            ),
        ];
        let err = ChunkStore::load(&sources, 2).unwrap_err();
        assert!(matches!(err, IndisortError::UnsupportedType(_)));
        assert!(err.to_string().contains("floats"));
    }
}

#[test]
fn test_load_parquet_rejects_wrong_key_types_without_row_groups() {
    let dir = tempfile::tempdir().unwrap();
    let schema = lineitem_schema();
    write_parquet(&dir.path().join("a.parquet"), &[lineitem_batch(&schema, vec![1, 2])]);
    write_empty_parquet(&dir.path().join("b_empty.parquet"), float_key_schema());

    let sources = ParquetSource::open_all(dir.path().to_str().unwrap()).unwrap();
    let err = ChunkStore::load(&sources, 2).unwrap_err();
    assert!(matches!(err, IndisortError::UnsupportedType(_)));
    assert!(err.to_string().contains("b_empty.parquet"));
}

#[test]
fn test_load_parquet_accepts_int64_file_without_row_groups() {
    let dir = tempfile::tempdir().unwrap();
    let schema = lineitem_schema();
    write_parquet(&dir.path().join("a.parquet"), &[lineitem_batch(&schema, vec![1, 2])]);
    write_empty_parquet(&dir.path().join("b_empty.parquet"), schema);

    let sources = ParquetSource::open_all(dir.path().to_str().unwrap()).unwrap();
    let store = ChunkStore::load(&sources, 4).unwrap();
    assert_eq!(store.total_rows(), 2);
    assert_eq!(store.num_chunks(), 1);
}

#[test]
fn test_load_memory_sources_preserves_order() {
    let schema = lineitem_schema();
    let sources = vec![
        MemorySource::new(
            "first",
            schema.clone(),
            vec![
                lineitem_batch(&schema, vec![10, 2]),
                lineitem_batch(&schema, vec![5]),
            ],
        ),
        MemorySource::new("second", schema.clone(), vec![lineitem_batch(&schema, vec![7, 9])]),
    ];

    let store = ChunkStore::load(&sources, 2).unwrap();
    assert_eq!(store.num_columns(), 2);
    assert_eq!(store.chunk_lens(), &[2, 1, 2]);
    assert_eq!(store.value_at(0, RowRef::new(0, 0)), 10);
    assert_eq!(store.value_at(0, RowRef::new(1, 0)), 5);
    assert_eq!(store.value_at(0, RowRef::new(2, 1)), 9);
}

#[test]
fn test_load_rejects_all_empty_sources() {
    let schema = lineitem_schema();
    let sources = vec![MemorySource::new(
        "empty",
        schema.clone(),
        vec![lineitem_batch(&schema, vec![])],
    )];
    let err = ChunkStore::load(&sources, 2).unwrap_err();
    assert!(matches!(err, IndisortError::EmptyDataset(_)));
}

#[test]
fn test_load_parquet_tree_with_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("shipdate=1994");
    std::fs::create_dir_all(&nested).unwrap();

    let schema = lineitem_schema();
    let big: Vec<i64> = (0..2500).rev().collect();
    write_parquet(&dir.path().join("a.parquet"), &[lineitem_batch(&schema, big)]);
    write_parquet(&nested.join("b.parquet"), &[lineitem_batch(&schema, vec![-4, 8])]);

    let uri = format!("file://{}", dir.path().display());
    let sources = ParquetSource::open_all(&uri).unwrap();
    assert_eq!(sources.len(), 2);

    let store = ChunkStore::load(&sources, 4).unwrap();
    assert_eq!(store.num_columns(), 4);
    assert_eq!(store.total_rows(), 2502);

    // a.parquet is first in path order; its first value is 2499.
    assert_eq!(store.value_at(0, RowRef::new(0, 0)), 2499);
    let last_chunk = (store.num_chunks() - 1) as u32;
    assert_eq!(store.value_at(0, RowRef::new(last_chunk, 0)), -4);
    assert_eq!(store.value_at(3, RowRef::new(last_chunk, 1)), 1);

    // Loading twice reads each file from the start again.
    let again = ChunkStore::load(&sources, 2).unwrap();
    assert_eq!(again.total_rows(), 2502);
    assert_eq!(again.num_columns(), 2);
}

#[test]
fn test_load_parquet_rejects_non_int64_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let schema = lineitem_schema();
    write_parquet(&dir.path().join("a.parquet"), &[lineitem_batch(&schema, vec![1, 2])]);

    let sources = ParquetSource::open_all(dir.path().to_str().unwrap()).unwrap();
    let err = ChunkStore::load(&sources, 5).unwrap_err();
    assert!(matches!(err, IndisortError::UnsupportedType(_)));
    assert!(err.to_string().contains("a.parquet"));
}

#[test]
fn test_load_parquet_rejects_short_schema() {
    let dir = tempfile::tempdir().unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("k", DataType::Int64, false)]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef],
    )
    .unwrap();
    write_parquet(&dir.path().join("narrow.parquet"), &[batch]);

    let sources = ParquetSource::open_all(dir.path().to_str().unwrap()).unwrap();
    let err = ChunkStore::load(&sources, 2).unwrap_err();
    assert!(matches!(err, IndisortError::SchemaMismatch(_)));
}

#[test]
fn test_load_garbage_file_is_a_parquet_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("junk.parquet"), b"not parquet at all").unwrap();

    let sources = ParquetSource::open_all(dir.path().to_str().unwrap()).unwrap();
    let err = ChunkStore::load(&sources, 2).unwrap_err();
    assert!(matches!(err, IndisortError::Parquet(_)));
}

// In: src/logical_index.rs

//! The logical index: a dense permutation of row references over a `ChunkStore`.
//!
//! The index is the only thing the ordering engine mutates. It is built once in
//! natural order (chunk by chunk, offsets ascending) and afterwards only ever
//! reordered. Its length never changes and no reference is ever rewritten.

use bitvec::prelude::*;

use crate::chunk_store::ChunkStore;
use crate::error::{IndisortError, Result};
use crate::log_metric;
use crate::types::RowRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalIndex {
    rows: Vec<RowRef>,
}

impl LogicalIndex {
    /// Produces the identity permutation over `store`.
    pub fn build(store: &ChunkStore) -> Self {
        let mut rows = Vec::with_capacity(store.total_rows());
        fill_natural(store, &mut rows);
        log_metric!("event"="index_built", "rows"=rows.len());
        Self { rows }
    }

    /// Restores natural order in place, reusing the allocation.
    ///
    /// Panics if the index was not built over `store`.
    pub fn reset(&mut self, store: &ChunkStore) {
        assert_eq!(
            self.rows.len(),
            store.total_rows(),
            "index was built over a different store"
        );
        self.rows.clear();
        fill_natural(store, &mut self.rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<RowRef> {
        self.rows.get(i).copied()
    }

    pub fn as_slice(&self) -> &[RowRef] {
        &self.rows
    }

    /// Mutable access for the ordering engine. Callers may only reorder.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [RowRef] {
        &mut self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowRef> {
        self.rows.iter()
    }

    /// Resolves the current order to the values of one column.
    pub fn values(&self, store: &ChunkStore, column_id: usize) -> Vec<i64> {
        self.rows
            .iter()
            .map(|&row| store.value_at(column_id, row))
            .collect()
    }

    /// Verifies that the index holds every row of `store` exactly once.
    pub fn check_permutation(&self, store: &ChunkStore) -> Result<()> {
        if self.rows.len() != store.total_rows() {
            return Err(IndisortError::InvalidIndex(format!(
                "index has {} rows, store has {}",
                self.rows.len(),
                store.total_rows()
            )));
        }

        // Flat position of each chunk's first row.
        let mut starts = Vec::with_capacity(store.num_chunks());
        let mut running = 0usize;
        for &len in store.chunk_lens() {
            starts.push(running);
            running += len as usize;
        }

        let mut seen = bitvec![0; store.total_rows()];
        for (i, &row) in self.rows.iter().enumerate() {
            if !store.contains(row) {
                return Err(IndisortError::InvalidIndex(format!(
                    "position {} holds out-of-range reference {}",
                    i, row
                )));
            }
            let flat = starts[row.chunk_id as usize] + row.offset as usize;
            if seen.replace(flat, true) {
                return Err(IndisortError::InvalidIndex(format!(
                    "reference {} appears more than once (again at position {})",
                    row, i
                )));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LogicalIndex {
    type Item = &'a RowRef;
    type IntoIter = std::slice::Iter<'a, RowRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn fill_natural(store: &ChunkStore, rows: &mut Vec<RowRef>) {
    for (chunk_id, &len) in store.chunk_lens().iter().enumerate() {
        let chunk_id = chunk_id as u32;
        rows.extend((0..len).map(|offset| RowRef::new(chunk_id, offset)));
    }
}

//! Reproducible synthetic chunk stores for tests and benchmarks.

use arrow::array::Int64Array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::chunk_store::ChunkStore;
use crate::error::{IndisortError, Result};

/// Shape and value distribution of a generated store.
///
/// Narrow key ranges produce many duplicate keys, which is what the stability
/// and tie-breaking properties need.
#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub chunks: usize,
    pub chunk_len: usize,
    pub columns: usize,
    /// Inclusive range of column 0.
    pub primary: (i64, i64),
    /// Inclusive range of every other column.
    pub secondary: (i64, i64),
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            chunks: 8,
            chunk_len: 1_000,
            columns: 2,
            primary: (-500, 500),
            secondary: (0, 1_000),
            seed: 0x1D15_0B7,
        }
    }
}

impl SyntheticSpec {
    pub fn with_shape(mut self, chunks: usize, chunk_len: usize) -> Self {
        self.chunks = chunks;
        self.chunk_len = chunk_len;
        self
    }

    pub fn with_primary(mut self, lo: i64, hi: i64) -> Self {
        self.primary = (lo, hi);
        self
    }

    pub fn with_secondary(mut self, lo: i64, hi: i64) -> Self {
        self.secondary = (lo, hi);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn total_rows(&self) -> usize {
        self.chunks * self.chunk_len
    }

    pub fn generate(&self) -> Result<ChunkStore> {
        if self.primary.0 > self.primary.1 || self.secondary.0 > self.secondary.1 {
            return Err(IndisortError::InvalidConfig(format!(
                "empty value range in {:?}",
                self
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut columns = vec![Vec::with_capacity(self.chunks); self.columns];

        for _ in 0..self.chunks {
            for (column_id, column) in columns.iter_mut().enumerate() {
                let (lo, hi) = if column_id == 0 {
                    self.primary
                } else {
                    self.secondary
                };
                let values: Vec<i64> = (0..self.chunk_len)
                    .map(|_| rng.random_range(lo..=hi))
                    .collect();
                column.push(Int64Array::from(values));
            }
        }

        ChunkStore::from_columns(columns)
    }
}

//! Comparison-based algorithm policies.

use crate::chunk_store::ChunkStore;
use crate::ordering::key_policy::KeyPolicy;
use crate::types::RowRef;

/// Pattern-defeating quicksort; no guarantee about the order of equal keys.
pub fn sort_unstable<P: KeyPolicy>(rows: &mut [RowRef], store: &ChunkStore, policy: &P) {
    rows.sort_unstable_by(|&a, &b| policy.compare(store, a, b));
}

/// Merge-based sort; rows with equal keys keep their prior relative order.
pub fn sort_stable<P: KeyPolicy>(rows: &mut [RowRef], store: &ChunkStore, policy: &P) {
    rows.sort_by(|&a, &b| policy.compare(store, a, b));
}

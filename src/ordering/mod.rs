// In: src/ordering/mod.rs

//! The ordering engine.
//!
//! Reorders a `LogicalIndex` under two orthogonal policies chosen per call: a
//! `KeyPolicy` (what to order by) and an `Algorithm` (how). The engine keeps no
//! state between calls; the index contents are the only thing a sort leaves
//! behind. Column data in the `ChunkStore` is read, never moved.
//!
//! References in the index are trusted. They were validated when the index was
//! built, and re-checking them per comparison would dominate the measurement.

use std::fmt;
use std::str::FromStr;

use crate::chunk_store::ChunkStore;
use crate::error::IndisortError;
use crate::log_metric;
use crate::logical_index::LogicalIndex;

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod comparison;
pub mod key_policy;
pub mod radix;


//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::key_policy::{
    BiasedPackedCompositeDesc, KeyPolicy, KeyPolicyKind, PackedCompositeDesc, SingleKeyDesc,
    TwoStepCompositeDesc,
};

//==================================================================================
// 3. Algorithm Policy
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Comparison sort, no guarantee among equal keys.
    Unstable,
    /// Comparison sort preserving the prior order of equal keys.
    Stable,
    /// LSB byte-wise distribution sort on extracted keys.
    Radix,
    /// MSB in-place American-flag distribution sort on extracted keys.
    RadixInPlace,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Unstable,
        Algorithm::Stable,
        Algorithm::Radix,
        Algorithm::RadixInPlace,
    ];

    /// Whether the algorithm promises to keep equal keys in their prior order.
    pub fn is_stable(self) -> bool {
        matches!(self, Algorithm::Stable)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Unstable => "unstable",
            Algorithm::Stable => "stable",
            Algorithm::Radix => "radix",
            Algorithm::RadixInPlace => "radix_in_place",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Algorithm {
    type Err = IndisortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.to_string() == s)
            .ok_or_else(|| IndisortError::InvalidConfig(format!("unknown algorithm '{}'", s)))
    }
}

//==================================================================================
// 4. Entry Points
//==================================================================================

/// Reorders `index` by `policy` using `algorithm`.
pub fn sort<P: KeyPolicy>(
    index: &mut LogicalIndex,
    store: &ChunkStore,
    policy: &P,
    algorithm: Algorithm,
) {
    debug_assert!(
        store.num_columns() >= policy.required_columns(),
        "policy '{}' reads {} columns, store has {}",
        policy.name(),
        policy.required_columns(),
        store.num_columns()
    );

    let rows = index.as_mut_slice();
    match algorithm {
        Algorithm::Unstable => comparison::sort_unstable(rows, store, policy),
        Algorithm::Stable => comparison::sort_stable(rows, store, policy),
        Algorithm::Radix => radix::lsb_radix_sort(rows, store, policy),
        Algorithm::RadixInPlace => radix::msb_radix_sort_in_place(rows, store, policy),
    }

    log_metric!(
        "event"="sorted",
        "policy"=policy.name(),
        "algorithm"=algorithm,
        "rows"=index.len()
    );
}

/// Runtime-dispatched form of [`sort`], used where the policy is named by
/// configuration.
pub fn sort_by_kind(
    index: &mut LogicalIndex,
    store: &ChunkStore,
    kind: KeyPolicyKind,
    algorithm: Algorithm,
) {
    match kind {
        KeyPolicyKind::Single => sort(index, store, &SingleKeyDesc, algorithm),
        KeyPolicyKind::Packed => sort(index, store, &PackedCompositeDesc, algorithm),
        KeyPolicyKind::TwoStep => sort(index, store, &TwoStepCompositeDesc, algorithm),
        KeyPolicyKind::BiasedPacked => sort(index, store, &BiasedPackedCompositeDesc, algorithm),
    }
}

/// Returns `true` if no adjacent pair of `index` is out of order under `policy`.
pub fn is_sorted_desc<P: KeyPolicy>(index: &LogicalIndex, store: &ChunkStore, policy: &P) -> bool {
    index
        .as_slice()
        .windows(2)
        .all(|w| policy.compare(store, w[0], w[1]) != std::cmp::Ordering::Greater)
}

/// Runtime-dispatched form of [`is_sorted_desc`].
pub fn is_sorted_by_kind(index: &LogicalIndex, store: &ChunkStore, kind: KeyPolicyKind) -> bool {
    match kind {
        KeyPolicyKind::Single => is_sorted_desc(index, store, &SingleKeyDesc),
        KeyPolicyKind::Packed => is_sorted_desc(index, store, &PackedCompositeDesc),
        KeyPolicyKind::TwoStep => is_sorted_desc(index, store, &TwoStepCompositeDesc),
        KeyPolicyKind::BiasedPacked => is_sorted_desc(index, store, &BiasedPackedCompositeDesc),
    }
}

// In: src/ordering/key_policy.rs

//! Key policies: how a row reference becomes something to order by.
//!
//! Every policy orders rows **descending**. A policy exposes its key in two
//! shapes: an `Ord` value for the comparison sorts and, through the same value, a
//! `RadixKey` for the distribution sorts. Comparison sorts call `compare`, whose
//! default is "larger key first"; a policy may override it with an explicit
//! comparator as long as it describes the same order as its key.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::chunk_store::ChunkStore;
use crate::error::IndisortError;
use crate::traits::RadixKey;
use crate::types::RowRef;

/// Column holding the primary key.
pub const PRIMARY_COLUMN: usize = 0;
/// Column holding the secondary key.
pub const SECONDARY_COLUMN: usize = 1;

/// **CONTRACT:** a descending ordering over rows of a `ChunkStore`.
pub trait KeyPolicy {
    /// The extracted key. Larger keys sort first.
    type Key: Ord + RadixKey;

    fn name(&self) -> &'static str;

    /// How many leading store columns the policy reads.
    fn required_columns(&self) -> usize;

    fn key(&self, store: &ChunkStore, row: RowRef) -> Self::Key;

    /// `Less` means `a` sorts before `b`.
    #[inline]
    fn compare(&self, store: &ChunkStore, a: RowRef, b: RowRef) -> Ordering {
        self.key(store, b).cmp(&self.key(store, a))
    }
}

//==================================================================================
// 1. Single key
//==================================================================================

/// Column 0, larger first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleKeyDesc;

impl KeyPolicy for SingleKeyDesc {
    type Key = i64;

    fn name(&self) -> &'static str {
        "single"
    }

    fn required_columns(&self) -> usize {
        1
    }

    #[inline]
    fn key(&self, store: &ChunkStore, row: RowRef) -> i64 {
        store.value_at(PRIMARY_COLUMN, row)
    }
}

//==================================================================================
// 2. Composite keys
//==================================================================================

/// Column 0 descending, ties broken by column 1 descending, compared in two
/// explicit steps. This is the reference form the packed forms are checked
/// against.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoStepCompositeDesc;

impl KeyPolicy for TwoStepCompositeDesc {
    type Key = (i64, i64);

    fn name(&self) -> &'static str {
        "two_step"
    }

    fn required_columns(&self) -> usize {
        2
    }

    #[inline]
    fn key(&self, store: &ChunkStore, row: RowRef) -> (i64, i64) {
        (
            store.value_at(PRIMARY_COLUMN, row),
            store.value_at(SECONDARY_COLUMN, row),
        )
    }

    #[inline]
    fn compare(&self, store: &ChunkStore, a: RowRef, b: RowRef) -> Ordering {
        let a0 = store.value_at(PRIMARY_COLUMN, a);
        let b0 = store.value_at(PRIMARY_COLUMN, b);
        if a0 != b0 {
            return b0.cmp(&a0);
        }
        let a1 = store.value_at(SECONDARY_COLUMN, a);
        let b1 = store.value_at(SECONDARY_COLUMN, b);
        b1.cmp(&a1)
    }
}

/// Column 0 in the high 64 bits, the raw bit pattern of column 1 in the low 64
/// bits, compared as one `i128`.
///
/// Only equivalent to `TwoStepCompositeDesc` while every column-1 value is
/// non-negative. A negative secondary value has its sign bit set in the low half,
/// so it packs as a large unsigned number and ranks *above* every non-negative
/// secondary with the same primary key. `(1, -1)` therefore sorts before `(1, 0)`
/// here and after it under the two-step comparator. Use
/// `BiasedPackedCompositeDesc` when column 1 may be negative.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackedCompositeDesc;

impl PackedCompositeDesc {
    #[inline]
    pub fn pack(primary: i64, secondary: i64) -> i128 {
        ((primary as i128) << 64) | (secondary as u64 as i128)
    }
}

impl KeyPolicy for PackedCompositeDesc {
    type Key = i128;

    fn name(&self) -> &'static str {
        "packed"
    }

    fn required_columns(&self) -> usize {
        2
    }

    #[inline]
    fn key(&self, store: &ChunkStore, row: RowRef) -> i128 {
        Self::pack(
            store.value_at(PRIMARY_COLUMN, row),
            store.value_at(SECONDARY_COLUMN, row),
        )
    }
}

/// Like `PackedCompositeDesc`, but column 1 is bias-encoded (sign bit flipped)
/// before it is placed in the low bits. The low half then orders the same way
/// as the signed value, so this form matches `TwoStepCompositeDesc` for every
/// input.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiasedPackedCompositeDesc;

impl BiasedPackedCompositeDesc {
    #[inline]
    pub fn pack(primary: i64, secondary: i64) -> i128 {
        let biased = (secondary as u64) ^ (1u64 << 63);
        ((primary as i128) << 64) | (biased as i128)
    }
}

impl KeyPolicy for BiasedPackedCompositeDesc {
    type Key = i128;

    fn name(&self) -> &'static str {
        "biased_packed"
    }

    fn required_columns(&self) -> usize {
        2
    }

    #[inline]
    fn key(&self, store: &ChunkStore, row: RowRef) -> i128 {
        Self::pack(
            store.value_at(PRIMARY_COLUMN, row),
            store.value_at(SECONDARY_COLUMN, row),
        )
    }
}

//==================================================================================
// 3. Runtime selection
//==================================================================================

/// Names a key policy at runtime, for the harness and for configs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPolicyKind {
    Single,
    Packed,
    TwoStep,
    BiasedPacked,
}

impl KeyPolicyKind {
    pub const ALL: [KeyPolicyKind; 4] = [
        KeyPolicyKind::Single,
        KeyPolicyKind::Packed,
        KeyPolicyKind::TwoStep,
        KeyPolicyKind::BiasedPacked,
    ];

    pub fn is_composite(self) -> bool {
        !matches!(self, KeyPolicyKind::Single)
    }

    pub fn required_columns(self) -> usize {
        if self.is_composite() {
            2
        } else {
            1
        }
    }
}

impl fmt::Display for KeyPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyPolicyKind::Single => SingleKeyDesc.name(),
            KeyPolicyKind::Packed => PackedCompositeDesc.name(),
            KeyPolicyKind::TwoStep => TwoStepCompositeDesc.name(),
            KeyPolicyKind::BiasedPacked => BiasedPackedCompositeDesc.name(),
        };
        write!(f, "{}", name)
    }
}

impl FromStr for KeyPolicyKind {
    type Err = IndisortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPolicyKind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s)
            .ok_or_else(|| IndisortError::InvalidConfig(format!("unknown key policy '{}'", s)))
    }
}

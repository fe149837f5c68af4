// In: src/ordering/radix.rs

//! Distribution-sort algorithm policies.
//!
//! Both kernels extract each row's key exactly once into a `(key, row)` pair,
//! distribute the pairs by key bytes with no user comparator, and finally write
//! the row references back into the index. Keys are wrapped in `Descending` so
//! that an ascending byte order gives the descending row order the policies ask
//! for.
//!
//! * `lsb_radix_sort`: one counting pass builds every level's histogram, then one
//!   out-of-place scatter per byte, least significant first. Levels on which all
//!   keys share a byte are skipped.
//! * `msb_radix_sort_in_place`: American-flag ("ska") partitioning from the most
//!   significant byte down, swapping pairs in place and recursing per bucket.
//!   Small buckets fall back to a comparison sort.

use crate::chunk_store::ChunkStore;
use crate::ordering::key_policy::KeyPolicy;
use crate::traits::{Descending, RadixKey};
use crate::types::RowRef;

/// Buckets at or below this size are finished with a comparison sort.
const SMALL_BUCKET: usize = 64;

type Item<K> = (Descending<K>, RowRef);

//==================================================================================
// 1. Shared Helpers
//==================================================================================

#[inline]
fn get_prefix_sums(counts: &[usize; 256]) -> [usize; 256] {
    let mut sums = [0usize; 256];

    let mut running_total = 0;
    for (i, c) in counts.iter().enumerate() {
        sums[i] = running_total;
        running_total += c;
    }

    sums
}

#[inline]
fn is_homogenous_bucket(counts: &[usize; 256]) -> bool {
    counts.iter().filter(|&&c| c > 0).count() <= 1
}

fn extract<P: KeyPolicy>(rows: &[RowRef], store: &ChunkStore, policy: &P) -> Vec<Item<P::Key>> {
    rows.iter()
        .map(|&row| (Descending(policy.key(store, row)), row))
        .collect()
}

fn write_back<K>(rows: &mut [RowRef], items: &[Item<K>]) {
    for (slot, item) in rows.iter_mut().zip(items) {
        *slot = item.1;
    }
}

//==================================================================================
// 2. LSB Radix Sort
//==================================================================================

/// Histograms of every level, gathered in a single pass.
fn get_all_counts<K: RadixKey>(items: &[Item<K>]) -> Vec<[usize; 256]> {
    let mut counts = vec![[0usize; 256]; Descending::<K>::LEVELS];
    for (key, _) in items {
        for (level, level_counts) in counts.iter_mut().enumerate() {
            level_counts[key.get_level(level) as usize] += 1;
        }
    }
    counts
}

fn scatter<K: RadixKey>(src: &[Item<K>], dst: &mut [Item<K>], counts: &[usize; 256], level: usize) {
    let mut prefix_sums = get_prefix_sums(counts);
    for item in src {
        let bucket = item.0.get_level(level) as usize;
        dst[prefix_sums[bucket]] = *item;
        prefix_sums[bucket] += 1;
    }
}

pub fn lsb_radix_sort<P: KeyPolicy>(rows: &mut [RowRef], store: &ChunkStore, policy: &P) {
    if rows.len() < 2 {
        return;
    }

    let mut items = extract(rows, store, policy);
    let mut tmp = items.clone();
    let all_counts = get_all_counts(&items);

    for (level, counts) in all_counts.iter().enumerate() {
        if is_homogenous_bucket(counts) {
            continue;
        }
        scatter(&items, &mut tmp, counts, level);
        std::mem::swap(&mut items, &mut tmp);
    }

    write_back(rows, &items);
}

//==================================================================================
// 3. MSB In-Place (American Flag) Radix Sort
//==================================================================================

// Based upon (with modifications):
// https://probablydance.com/2016/12/27/i-wrote-a-faster-sorting-algorithm/
fn ska_partition<K: RadixKey>(bucket: &mut [Item<K>], counts: &[usize; 256], level: usize) {
    let mut heads = get_prefix_sums(counts);
    let mut ends = [0usize; 256];
    for b in 0..256 {
        ends[b] = heads[b] + counts[b];
    }

    for b in 0..256 {
        while heads[b] < ends[b] {
            let target = bucket[heads[b]].0.get_level(level) as usize;
            if target == b {
                heads[b] += 1;
            } else {
                bucket.swap(heads[b], heads[target]);
                heads[target] += 1;
            }
        }
    }
}

fn msb_sort_bucket<K: RadixKey + Ord>(bucket: &mut [Item<K>], level: usize) {
    if bucket.len() <= SMALL_BUCKET {
        // Higher levels are equal within a bucket, so comparing whole keys only
        // looks at the remaining levels.
        bucket.sort_unstable_by(|a, b| b.0 .0.cmp(&a.0 .0));
        return;
    }

    let mut counts = [0usize; 256];
    for item in bucket.iter() {
        counts[item.0.get_level(level) as usize] += 1;
    }

    if !is_homogenous_bucket(&counts) {
        ska_partition(bucket, &counts, level);
    }

    if level == 0 {
        return;
    }

    let mut start = 0;
    for &count in counts.iter() {
        if count > 1 {
            msb_sort_bucket(&mut bucket[start..start + count], level - 1);
        }
        start += count;
    }
}

pub fn msb_radix_sort_in_place<P: KeyPolicy>(rows: &mut [RowRef], store: &ChunkStore, policy: &P) {
    if rows.len() < 2 {
        return;
    }

    let mut items = extract(rows, store, policy);
    msb_sort_bucket(&mut items, Descending::<P::Key>::LEVELS - 1);
    write_back(rows, &items);
}

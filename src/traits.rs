//! This module defines the shared traits the radix kernels are generic over.

/// A key that can be consumed one byte at a time by a distribution sort.
///
/// `get_level(0)` is the least significant byte and `get_level(LEVELS - 1)` the
/// most significant. Sorting keys by their levels, most significant first, must
/// give the same order as the key's own ascending order.
pub trait RadixKey: Copy {
    const LEVELS: usize;

    fn get_level(&self, level: usize) -> u8;
}

// Unsigned integers are already byte-ordered.
macro_rules! impl_radix_key_unsigned {
    ($U:ty) => {
        impl RadixKey for $U {
            const LEVELS: usize = std::mem::size_of::<$U>();

            #[inline]
            fn get_level(&self, level: usize) -> u8 {
                (self >> (level * 8)) as u8
            }
        }
    };
}

// Signed integers flip the sign bit so negatives land below positives.
macro_rules! impl_radix_key_signed {
    ($S:ty) => {
        impl RadixKey for $S {
            const LEVELS: usize = std::mem::size_of::<$S>();

            #[inline]
            fn get_level(&self, level: usize) -> u8 {
                ((self ^ <$S>::MIN) >> (level * 8)) as u8
            }
        }
    };
}

impl_radix_key_unsigned!(u64);
impl_radix_key_unsigned!(u128);
impl_radix_key_signed!(i64);
impl_radix_key_signed!(i128);

/// Lexicographic pair: the first element is more significant than the second.
impl<A: RadixKey, B: RadixKey> RadixKey for (A, B) {
    const LEVELS: usize = A::LEVELS + B::LEVELS;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        if level < B::LEVELS {
            self.1.get_level(level)
        } else {
            self.0.get_level(level - B::LEVELS)
        }
    }
}

/// Reverses the radix order of the wrapped key.
///
/// Inverting every byte maps the largest key onto the smallest, so an ascending
/// distribution pass over `Descending<K>` yields `K` in descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descending<K>(pub K);

impl<K: RadixKey> RadixKey for Descending<K> {
    const LEVELS: usize = K::LEVELS;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        !self.0.get_level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radix_cmp<K: RadixKey>(a: &K, b: &K) -> std::cmp::Ordering {
        for level in (0..K::LEVELS).rev() {
            match a.get_level(level).cmp(&b.get_level(level)) {
                std::cmp::Ordering::Equal => continue,
                o => return o,
            }
        }
        std::cmp::Ordering::Equal
    }

    #[test]
    fn test_signed_levels_preserve_order() {
        let values = [i64::MIN, -300, -1, 0, 1, 255, 256, i64::MAX];
        for w in values.windows(2) {
            assert_eq!(radix_cmp(&w[0], &w[1]), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn test_i128_levels_preserve_order() {
        let values = [i128::MIN, -(1i128 << 64), -1, 0, 1i128 << 64, i128::MAX];
        for w in values.windows(2) {
            assert_eq!(radix_cmp(&w[0], &w[1]), std::cmp::Ordering::Less);
        }
    }

    #[test]
    fn test_pair_is_lexicographic() {
        assert_eq!(<(i64, i64)>::LEVELS, 16);
        assert_eq!(
            radix_cmp(&(1i64, i64::MAX), &(2i64, i64::MIN)),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            radix_cmp(&(2i64, -5i64), &(2i64, 7i64)),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn test_descending_reverses() {
        assert_eq!(
            radix_cmp(&Descending(10i64), &Descending(-10i64)),
            std::cmp::Ordering::Less
        );
        assert_eq!(
            radix_cmp(&Descending(7u64), &Descending(7u64)),
            std::cmp::Ordering::Equal
        );
    }
}

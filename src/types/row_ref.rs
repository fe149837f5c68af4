use std::fmt;

/// Identifies one logical row: the chunk it lives in and its offset within that
/// chunk. Resolved against the `ChunkStore`, never by value.
///
/// Both halves are `u32` so a reference is 8 bytes wide; the store refuses
/// shapes that would not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowRef {
    pub chunk_id: u32,
    pub offset: u32,
}

impl RowRef {
    #[inline]
    pub const fn new(chunk_id: u32, offset: u32) -> Self {
        Self { chunk_id, offset }
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{chunk_id = {}, offset = {}}}",
            self.chunk_id, self.offset
        )
    }
}

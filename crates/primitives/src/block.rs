use core::fmt;

/// A half-open range `[start, end)` of execution blocks covered by one finalized checkpoint.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockRange {
    /// The first block of the range.
    pub start: u64,
    /// The block resolved from the justified beacon block, excluded from the range.
    pub end: u64,
}

impl BlockRange {
    /// Returns a new instance of [`BlockRange`].
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Returns the range ending at `end` and spanning `interval` blocks. The start saturates at
    /// the genesis block.
    pub const fn ending_at(end: u64, interval: u64) -> Self {
        Self { start: end.saturating_sub(interval), end }
    }

    /// Returns the amount of blocks in the range.
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range does not contain any block.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

use thiserror::Error;

use crate::segment_table::SegmentId;

/// Why a logical address could not be reduced to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("Segment {segment} does not exist")]
    SegmentNotFound { segment: SegmentId },

    #[error("Offset exceeds limit (limit = {limit})")]
    OutOfBounds {
        segment: SegmentId,
        offset: i64,
        limit: u64,
    },
}

/// Rejected session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown replacement algorithm {0:?} (expected FIFO or LRU)")]
    InvalidAlgorithm(String),

    #[error("segment {segment} has size 0")]
    EmptySegment { segment: SegmentId },

    #[error("segment {segment} is defined more than once")]
    DuplicateSegment { segment: SegmentId },
}

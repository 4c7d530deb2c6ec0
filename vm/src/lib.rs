//! Segmented-paged virtual memory simulator.
//!
//! A [`SegmentTable`] reduces `(segment, offset)` pairs to page keys, a
//! [`PagingSession`] keeps those pages resident in a fixed number of frames,
//! and [`bulk::simulate`] replays raw page references in one pass.

pub mod bulk;
pub mod error;
pub mod event;
pub mod frame_table;
pub mod page_replacer;
pub mod segment_table;
pub mod session;

pub use error::{ConfigError, TranslationError};
pub use event::{AccessEvent, Outcome, Status};
pub use frame_table::FrameTable;
pub use page_replacer::Algorithm;
pub use segment_table::{PageKey, Resolved, SegmentId, SegmentTable};
pub use session::{PagingSession, SessionConfig, Simulator};

/// Size of every page and frame, in bytes.
pub const PAGE_SIZE: u64 = 100;

use std::fmt;

use crate::{
    error::TranslationError,
    frame_table,
    segment_table::{PageKey, Resolved, SegmentId},
};

/// What happened to one access. Only successful lookups carry an address,
/// and only faults carry loaded/evicted pages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rejected(TranslationError),
    Hit {
        frame: usize,
        physical_address: u64,
    },
    PageFault {
        frame: usize,
        physical_address: u64,
        loaded: PageKey,
        evicted: Option<PageKey>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    SegFault,
    OutOfBounds,
    Hit,
    PageFault,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::SegFault => "SEG_FAULT",
            Status::OutOfBounds => "OUT_OF_BOUNDS",
            Status::Hit => "HIT",
            Status::PageFault => "PAGE_FAULT",
        };

        f.pad(name)
    }
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::Rejected(TranslationError::SegmentNotFound { .. }) => Status::SegFault,
            Outcome::Rejected(TranslationError::OutOfBounds { .. }) => Status::OutOfBounds,
            Outcome::Hit { .. } => Status::Hit,
            Outcome::PageFault { .. } => Status::PageFault,
        }
    }
}

/// Trace record for one access against a paging session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessEvent {
    /// Session clock when the access was handled.
    pub step: u64,
    pub segment: SegmentId,
    pub offset: i64,
    pub outcome: Outcome,
    /// Page breakdown of the address; `None` exactly when rejected.
    pub resolved: Option<Resolved>,
    /// Frame contents after the access.
    pub frame_table: Vec<Option<PageKey>>,
    pub note: String,
}

impl AccessEvent {
    pub fn status(&self) -> Status {
        self.outcome.status()
    }

    /// `false` for validation failures, which leave the session untouched.
    pub fn is_valid(&self) -> bool {
        !matches!(self.outcome, Outcome::Rejected(_))
    }

    pub fn physical_address(&self) -> Option<u64> {
        match self.outcome {
            Outcome::Hit {
                physical_address, ..
            }
            | Outcome::PageFault {
                physical_address, ..
            } => Some(physical_address),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn page_index(&self) -> Option<u64> {
        self.resolved.map(|resolved| resolved.page_index())
    }

    pub fn offset_in_page(&self) -> Option<u64> {
        self.resolved.map(|resolved| resolved.offset_in_page)
    }

    /// Segment base plus offset, as if segments were not paged.
    pub fn segmented_address(&self) -> Option<u64> {
        self.resolved.map(|resolved| resolved.segmented_address)
    }

    pub fn frame(&self) -> Option<usize> {
        match self.outcome {
            Outcome::Hit { frame, .. } | Outcome::PageFault { frame, .. } => Some(frame),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn loaded(&self) -> Option<PageKey> {
        match self.outcome {
            Outcome::PageFault { loaded, .. } => Some(loaded),
            _ => None,
        }
    }

    pub fn evicted(&self) -> Option<PageKey> {
        match self.outcome {
            Outcome::PageFault { evicted, .. } => evicted,
            _ => None,
        }
    }

    pub fn rendered_frame_table(&self) -> Vec<String> {
        frame_table::render(&self.frame_table)
    }
}

impl fmt::Display for AccessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:>3} | {}:{} | {:<13} | [{}] | {}",
            self.step,
            self.segment,
            self.offset,
            self.status(),
            self.rendered_frame_table().join(" "),
            self.note
        )
    }
}

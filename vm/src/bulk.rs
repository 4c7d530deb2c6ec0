//! One-shot replay of a raw page reference string.
//!
//! No segments and no addresses: pages are plain identifiers, and every
//! reference is processed against fresh frames.

use std::{
    fmt::{Debug, Display},
    num::NonZeroUsize,
};

use log::debug;

use crate::{
    event::Status,
    frame_table::{self, FrameTable},
    page_replacer::{self, Algorithm, PageEvent},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BulkOutcome<K> {
    Hit { frame: usize },
    Fault { frame: usize, evicted: Option<K> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkEvent<K> {
    pub step: u64,
    pub page: K,
    pub outcome: BulkOutcome<K>,
    pub frame_table: Vec<Option<K>>,
}

impl<K: Display> BulkEvent<K> {
    pub fn rendered_frame_table(&self) -> Vec<String> {
        frame_table::render(&self.frame_table)
    }
}

impl<K: Copy> BulkEvent<K> {
    pub fn status(&self) -> Status {
        match self.outcome {
            BulkOutcome::Hit { .. } => Status::Hit,
            BulkOutcome::Fault { .. } => Status::PageFault,
        }
    }

    pub fn loaded(&self) -> Option<K> {
        match self.outcome {
            BulkOutcome::Fault { .. } => Some(self.page),
            BulkOutcome::Hit { .. } => None,
        }
    }

    pub fn evicted(&self) -> Option<K> {
        match self.outcome {
            BulkOutcome::Fault { evicted, .. } => evicted,
            BulkOutcome::Hit { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkReport<K> {
    pub events: Vec<BulkEvent<K>>,
    pub page_faults: u64,
}

impl<K> BulkReport<K> {
    pub fn hits(&self) -> u64 {
        self.events.len() as u64 - self.page_faults
    }

    /// Hits over references; zero for an empty sequence.
    pub fn hit_ratio(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }

        self.hits() as f64 / self.events.len() as f64
    }
}

pub fn simulate<K>(
    page_sequence: &[K],
    frame_count: NonZeroUsize,
    algorithm: Algorithm,
) -> BulkReport<K>
where
    K: Copy + Eq + Debug + 'static,
{
    let mut frames = FrameTable::new(frame_count);
    let mut replacer = algorithm.replacer();
    let mut page_faults = 0;
    let mut events = Vec::with_capacity(page_sequence.len());

    for (clock, &page) in (0u64..).zip(page_sequence) {
        let outcome = match frames.lookup(page) {
            Some(frame) => {
                replacer.page_event(PageEvent::Touched(page, clock));
                BulkOutcome::Hit { frame }
            }
            None => {
                page_faults += 1;

                let (frame, evicted) =
                    page_replacer::load_page(&mut frames, replacer.as_mut(), page, clock);

                BulkOutcome::Fault { frame, evicted }
            }
        };

        events.push(BulkEvent {
            step: clock,
            page,
            outcome,
            frame_table: frames.snapshot(),
        });
    }

    debug!(
        "bulk: {} references, {} faults, {} frames, {}",
        page_sequence.len(),
        page_faults,
        frame_count,
        algorithm
    );

    BulkReport {
        events,
        page_faults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_empty_sequence() {
        let report = simulate::<i64>(&[], frames(3), Algorithm::Fifo);

        assert!(report.events.is_empty());
        assert_eq!(report.page_faults, 0);
        assert_eq!(report.hit_ratio(), 0.0);
    }

    #[test]
    fn test_fifo_reference_string() {
        // classic 7 0 1 2 0 3 0 4 with three frames
        let report = simulate(&[7, 0, 1, 2, 0, 3, 0, 4], frames(3), Algorithm::Fifo);

        let statuses: Vec<Status> = report.events.iter().map(BulkEvent::status).collect();
        assert_eq!(
            statuses,
            vec![
                Status::PageFault,
                Status::PageFault,
                Status::PageFault,
                Status::PageFault,
                Status::Hit,
                Status::PageFault,
                Status::PageFault,
                Status::PageFault,
            ]
        );
        assert_eq!(report.page_faults, 7);
        assert_eq!(report.hits(), 1);
        assert_eq!(report.events[3].evicted(), Some(7));
        assert_eq!(report.events[5].evicted(), Some(0));
        assert_eq!(report.events[7].frame_table, vec![Some(4), Some(3), Some(0)]);
    }

    #[test]
    fn test_lru_reference_string() {
        let report = simulate(&[7, 0, 1, 2, 0, 3, 0, 4], frames(3), Algorithm::Lru);

        assert_eq!(report.page_faults, 6);
        assert_eq!(report.events[3].evicted(), Some(7));
        assert_eq!(report.events[5].evicted(), Some(1));
        assert_eq!(report.events[6].status(), Status::Hit);
        assert_eq!(report.events[7].evicted(), Some(2));
        assert_eq!(report.events[7].frame_table, vec![Some(4), Some(0), Some(3)]);
    }

    #[test]
    fn test_hit_reports_frame() {
        let report = simulate(&[5, 6, 5], frames(2), Algorithm::Fifo);

        assert_eq!(report.events[2].outcome, BulkOutcome::Hit { frame: 0 });
        assert_eq!(report.events[2].loaded(), None);
        assert_eq!(report.events[1].loaded(), Some(6));
        assert_eq!(report.events[0].rendered_frame_table(), vec!["5", "-"]);
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let first = simulate(&[1, 2], frames(2), Algorithm::Lru);
        let second = simulate(&[1, 2], frames(2), Algorithm::Lru);

        assert_eq!(first, second);
        assert_eq!(second.page_faults, 2);
    }
}

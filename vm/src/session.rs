use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
};

use log::{debug, trace};

use crate::{
    event::{AccessEvent, Outcome},
    frame_table::FrameTable,
    page_replacer::{self, Algorithm, PageEvent, PageReplacer},
    segment_table::{PageKey, SegmentId, SegmentTable},
    PAGE_SIZE,
};

/// Identity of a paging session. Two accesses share state only while their
/// configs compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionConfig {
    pub frame_count: NonZeroUsize,
    pub algorithm: Algorithm,
    pub segment_table: SegmentTable,
}

impl SessionConfig {
    pub fn new(
        frame_count: NonZeroUsize,
        algorithm: Algorithm,
        segment_table: SegmentTable,
    ) -> Self {
        SessionConfig {
            frame_count,
            algorithm,
            segment_table,
        }
    }

    /// Stable within a process; used to tell sessions apart in logs.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Frame table, replacement state, clock and fault counter of one simulation.
#[derive(Debug)]
pub struct PagingSession {
    config: SessionConfig,
    frames: FrameTable<PageKey>,
    replacer: Box<dyn PageReplacer<PageKey>>,
    clock: u64,
    page_faults: u64,
}

impl PagingSession {
    pub fn new(config: SessionConfig) -> Self {
        debug!(
            "session: {} frames, {}, {} segments",
            config.frame_count,
            config.algorithm,
            config.segment_table.len()
        );

        PagingSession {
            frames: FrameTable::new(config.frame_count),
            replacer: config.algorithm.replacer(),
            clock: 0,
            page_faults: 0,
            config,
        }
    }

    /// Empties every frame and zeroes the clock and fault counter.
    pub fn reset(&mut self) {
        self.frames = FrameTable::new(self.config.frame_count);
        self.replacer = self.config.algorithm.replacer();
        self.clock = 0;
        self.page_faults = 0;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn page_faults(&self) -> u64 {
        self.page_faults
    }

    pub fn frames(&self) -> &FrameTable<PageKey> {
        &self.frames
    }

    /// Resident pages in the order the replacement policy keeps them.
    pub fn resident_order(&self) -> Vec<PageKey> {
        self.replacer.tracked_pages()
    }

    /// Recency stamp of a resident page; `None` under FIFO.
    pub fn last_access(&self, page_key: PageKey) -> Option<u64> {
        self.replacer.last_access(page_key)
    }

    /// Handles one access. Rejected accesses change nothing, not even the clock.
    pub fn process(&mut self, segment: SegmentId, offset: i64) -> AccessEvent {
        let resolved = match self.config.segment_table.resolve(segment, offset) {
            Ok(resolved) => resolved,
            Err(err) => {
                trace!("session: rejected {}:{}: {}", segment, offset, err);

                return AccessEvent {
                    step: self.clock,
                    segment,
                    offset,
                    outcome: Outcome::Rejected(err),
                    resolved: None,
                    frame_table: self.frames.snapshot(),
                    note: err.to_string(),
                };
            }
        };

        let page_key = resolved.page_key;

        let (outcome, note) = match self.frames.lookup(page_key) {
            Some(frame) => {
                trace!("session: hit {} in frame {}", page_key, frame);

                self.replacer.page_event(PageEvent::Touched(page_key, self.clock));

                let outcome = Outcome::Hit {
                    frame,
                    physical_address: physical_address(frame, resolved.offset_in_page),
                };

                (outcome, format!("Page {} found in frame {}", page_key, frame))
            }
            None => {
                trace!("session: page fault on {}", page_key);

                let (frame, evicted) = self.handle_page_fault(page_key);

                let note = match evicted {
                    Some(victim) => format!(
                        "Page {} replaced {} in frame {} ({})",
                        page_key, victim, frame, self.config.algorithm
                    ),
                    None => format!("Page {} loaded into free frame {}", page_key, frame),
                };

                let outcome = Outcome::PageFault {
                    frame,
                    physical_address: physical_address(frame, resolved.offset_in_page),
                    loaded: page_key,
                    evicted,
                };

                (outcome, note)
            }
        };

        let event = AccessEvent {
            step: self.clock,
            segment,
            offset,
            outcome,
            resolved: Some(resolved),
            frame_table: self.frames.snapshot(),
            note,
        };

        self.clock += 1;

        event
    }

    fn handle_page_fault(&mut self, page_key: PageKey) -> (usize, Option<PageKey>) {
        self.page_faults += 1;

        let (frame, evicted) = page_replacer::load_page(
            &mut self.frames,
            self.replacer.as_mut(),
            page_key,
            self.clock,
        );

        if let Some(victim) = evicted {
            debug!(
                "session: evicted {} from frame {} ({})",
                victim, frame, self.config.algorithm
            );
        }

        (frame, evicted)
    }
}

fn physical_address(frame: usize, offset_in_page: u64) -> u64 {
    frame as u64 * PAGE_SIZE + offset_in_page
}

/// Caller-owned holder of the active session. Callers sharing one across
/// threads must serialize calls themselves.
#[derive(Debug, Default)]
pub struct Simulator {
    session: Option<PagingSession>,
}

impl Simulator {
    pub fn new() -> Self {
        Simulator { session: None }
    }

    /// Returns the session for `config`, replacing the active one when the
    /// config differs from it.
    pub fn configure(&mut self, config: &SessionConfig) -> &mut PagingSession {
        let stale = self
            .session
            .as_ref()
            .map_or(true, |session| session.config() != config);

        if stale {
            debug!("simulator: starting session {:016x}", config.fingerprint());
            self.session = None;
        }

        self.session.get_or_insert_with(|| PagingSession::new(config.clone()))
    }

    pub fn process(
        &mut self,
        config: &SessionConfig,
        segment: SegmentId,
        offset: i64,
    ) -> AccessEvent {
        self.configure(config).process(segment, offset)
    }

    pub fn session(&self) -> Option<&PagingSession> {
        self.session.as_ref()
    }

    /// Drops the active session; the next access starts from empty frames.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

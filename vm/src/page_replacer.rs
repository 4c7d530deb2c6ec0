use std::{collections::VecDeque, fmt, str::FromStr};

use crate::{error::ConfigError, frame_table::FrameTable};

/// Residency notifications, stamped with the session clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageEvent<K> {
    Touched(K, u64),
    Loaded(K, u64),
}

pub trait PageReplacer<K>: fmt::Debug {
    fn page_event(&mut self, _event: PageEvent<K>) {}

    /// Chooses and forgets the victim. `None` only when nothing is tracked.
    fn pick_replacement_page(&mut self) -> Option<K>;

    /// Pages currently tracked, in the replacer's own order.
    fn tracked_pages(&self) -> Vec<K>;

    /// Stamp of the latest access to `page`, for policies that keep one.
    fn last_access(&self, _page: K) -> Option<u64> {
        None
    }
}

/// Puts a missing `page` into the lowest free frame, or into the victim's
/// frame when none is free. Returns the frame and the evicted page.
pub fn load_page<K>(
    frames: &mut FrameTable<K>,
    replacer: &mut dyn PageReplacer<K>,
    page: K,
    at: u64,
) -> (usize, Option<K>)
where
    K: Copy + Eq,
{
    let (frame, evicted) = match frames.first_free() {
        Some(free) => (free, None),
        None => {
            let victim = replacer
                .pick_replacement_page()
                .and_then(|victim| frames.lookup(victim).map(|frame| (frame, victim)));

            match victim {
                Some((frame, victim)) => (frame, Some(victim)),
                None => unreachable!("full frame table but the replacer tracks no resident page"),
            }
        }
    };

    frames.place(frame, page);
    replacer.page_event(PageEvent::Loaded(page, at));

    (frame, evicted)
}

/// Evicts in load order. Hits do not move a page.
#[derive(Clone, Debug, Default)]
pub struct FifoPageReplacer<K> {
    fifo: VecDeque<K>,
}

impl<K> FifoPageReplacer<K> {
    pub fn new() -> Self {
        FifoPageReplacer {
            fifo: VecDeque::new(),
        }
    }
}

impl<K: Copy + fmt::Debug> PageReplacer<K> for FifoPageReplacer<K> {
    fn page_event(&mut self, event: PageEvent<K>) {
        if let PageEvent::Loaded(page, _) = event {
            self.fifo.push_back(page)
        }
    }

    fn pick_replacement_page(&mut self) -> Option<K> {
        self.fifo.pop_front()
    }

    fn tracked_pages(&self) -> Vec<K> {
        self.fifo.iter().copied().collect()
    }
}

/// Evicts the page with the oldest access stamp.
///
/// Entries are kept in insertion order and scanned front to back, so when
/// two stamps are equal the page inserted first is chosen.
#[derive(Clone, Debug, Default)]
pub struct LruPageReplacer<K> {
    recency: Vec<(K, u64)>,
}

impl<K> LruPageReplacer<K> {
    pub fn new() -> Self {
        LruPageReplacer {
            recency: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> LruPageReplacer<K> {
    fn stamp(&mut self, page: K, at: u64) {
        match self.recency.iter_mut().find(|(key, _)| *key == page) {
            Some(entry) => entry.1 = at,
            None => self.recency.push((page, at)),
        }
    }

    /// First entry holding the minimum stamp.
    fn least_recent(&self) -> Option<usize> {
        let mut victim: Option<(usize, u64)> = None;

        for (idx, &(_, at)) in self.recency.iter().enumerate() {
            match victim {
                Some((_, oldest)) if at >= oldest => {}
                _ => victim = Some((idx, at)),
            }
        }

        victim.map(|(idx, _)| idx)
    }
}

impl<K: Copy + Eq + fmt::Debug> PageReplacer<K> for LruPageReplacer<K> {
    fn page_event(&mut self, event: PageEvent<K>) {
        match event {
            PageEvent::Touched(page, at) | PageEvent::Loaded(page, at) => self.stamp(page, at),
        }
    }

    fn pick_replacement_page(&mut self) -> Option<K> {
        let idx = self.least_recent()?;

        Some(self.recency.remove(idx).0)
    }

    fn tracked_pages(&self) -> Vec<K> {
        self.recency.iter().map(|&(key, _)| key).collect()
    }

    fn last_access(&self, page: K) -> Option<u64> {
        self.recency
            .iter()
            .find(|(key, _)| *key == page)
            .map(|&(_, at)| at)
    }
}

/// Replacement policy selected for a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Fifo,
    Lru,
}

impl Algorithm {
    pub fn replacer<K>(self) -> Box<dyn PageReplacer<K>>
    where
        K: Copy + Eq + fmt::Debug + 'static,
    {
        match self {
            Algorithm::Fifo => Box::new(FifoPageReplacer::new()),
            Algorithm::Lru => Box::new(LruPageReplacer::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Fifo => f.write_str("FIFO"),
            Algorithm::Lru => f.write_str("LRU"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FIFO" => Ok(Algorithm::Fifo),
            "LRU" => Ok(Algorithm::Lru),
            _ => Err(ConfigError::InvalidAlgorithm(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn test_fifo_ignores_touches() {
        let mut fifo = FifoPageReplacer::new();
        fifo.page_event(PageEvent::Loaded(1, 0));
        fifo.page_event(PageEvent::Loaded(2, 1));
        fifo.page_event(PageEvent::Touched(1, 2));

        assert_eq!(fifo.pick_replacement_page(), Some(1));
        assert_eq!(fifo.pick_replacement_page(), Some(2));
        assert_eq!(fifo.pick_replacement_page(), None);
    }

    #[test]
    fn test_lru_follows_touches() {
        let mut lru = LruPageReplacer::new();
        lru.page_event(PageEvent::Loaded(1, 0));
        lru.page_event(PageEvent::Loaded(2, 1));
        lru.page_event(PageEvent::Touched(1, 2));

        assert_eq!(lru.last_access(1), Some(2));
        assert_eq!(lru.pick_replacement_page(), Some(2));
        assert_eq!(lru.tracked_pages(), vec![1]);
    }

    #[test]
    fn test_lru_tie_goes_to_first_inserted() {
        let mut lru = LruPageReplacer::new();
        lru.page_event(PageEvent::Loaded('b', 4));
        lru.page_event(PageEvent::Loaded('a', 4));
        lru.page_event(PageEvent::Loaded('c', 4));

        assert_eq!(lru.pick_replacement_page(), Some('b'));
        assert_eq!(lru.pick_replacement_page(), Some('a'));
    }

    #[test]
    fn test_lru_touch_keeps_insertion_position() {
        let mut lru = LruPageReplacer::new();
        lru.page_event(PageEvent::Loaded(1, 0));
        lru.page_event(PageEvent::Loaded(2, 1));
        lru.page_event(PageEvent::Touched(1, 5));

        assert_eq!(lru.tracked_pages(), vec![1, 2]);
    }

    #[test]
    fn test_load_page_fills_free_frames_first() {
        let mut frames = FrameTable::new(NonZeroUsize::new(2).unwrap());
        let mut fifo = FifoPageReplacer::new();

        assert_eq!(load_page(&mut frames, &mut fifo, 'a', 0), (0, None));
        assert_eq!(load_page(&mut frames, &mut fifo, 'b', 1), (1, None));
        assert_eq!(load_page(&mut frames, &mut fifo, 'c', 2), (0, Some('a')));
        assert_eq!(frames.slots(), &[Some('c'), Some('b')]);
        assert_eq!(fifo.tracked_pages(), vec!['b', 'c']);
    }

    #[test]
    fn test_load_page_evicts_least_recent_frame() {
        let mut frames = FrameTable::new(NonZeroUsize::new(2).unwrap());
        let mut lru = LruPageReplacer::new();

        load_page(&mut frames, &mut lru, 'a', 0);
        load_page(&mut frames, &mut lru, 'b', 1);
        lru.page_event(PageEvent::Touched('a', 2));

        assert_eq!(load_page(&mut frames, &mut lru, 'c', 3), (1, Some('b')));
        assert_eq!(lru.last_access('c'), Some(3));
        assert_eq!(lru.last_access('b'), None);
    }

    #[test]
    fn test_fifo_keeps_no_stamps() {
        let mut fifo = FifoPageReplacer::new();
        fifo.page_event(PageEvent::Loaded(1, 0));

        assert_eq!(fifo.last_access(1), None);
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("FIFO".parse::<Algorithm>(), Ok(Algorithm::Fifo));
        assert_eq!(" lru ".parse::<Algorithm>(), Ok(Algorithm::Lru));
        assert_eq!(
            "CLOCK".parse::<Algorithm>(),
            Err(ConfigError::InvalidAlgorithm("CLOCK".to_string()))
        );
        assert_eq!(Algorithm::Lru.to_string(), "LRU");
    }
}

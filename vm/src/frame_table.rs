use std::{fmt::Display, num::NonZeroUsize};

/// Marker rendered for a frame with nothing loaded.
pub const EMPTY_FRAME: &str = "-";

/// Physical frames, indexed by frame number. A page occupies at most one slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameTable<K> {
    slots: Vec<Option<K>>,
}

impl<K: Copy + Eq> FrameTable<K> {
    pub fn new(frame_count: NonZeroUsize) -> Self {
        FrameTable {
            slots: vec![None; frame_count.get()],
        }
    }

    /// Linear scan for the frame holding `key`.
    pub fn lookup(&self, key: K) -> Option<usize> {
        self.slots.iter().position(|slot| *slot == Some(key))
    }

    /// Linear scan for the lowest-numbered empty frame.
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Puts `key` in `frame_index`, returning whatever was there.
    pub fn place(&mut self, frame_index: usize, key: K) -> Option<K> {
        self.slots[frame_index].replace(key)
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn slots(&self) -> &[Option<K>] {
        &self.slots
    }

    pub fn snapshot(&self) -> Vec<Option<K>> {
        self.slots.clone()
    }
}

/// Renders each slot as its key, or [`EMPTY_FRAME`].
pub fn render<K: Display>(slots: &[Option<K>]) -> Vec<String> {
    slots
        .iter()
        .map(|slot| match slot {
            Some(key) => key.to_string(),
            None => EMPTY_FRAME.to_string(),
        })
        .collect()
}

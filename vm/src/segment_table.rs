use std::{collections::BTreeMap, fmt, num::NonZeroU64};

use crate::{
    error::{ConfigError, TranslationError},
    PAGE_SIZE,
};

pub type SegmentId = u32;

/// Identity of one page of one segment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageKey {
    pub segment: SegmentId,
    pub page: u64,
}

impl PageKey {
    pub fn new(segment: SegmentId, page: u64) -> Self {
        PageKey { segment, page }
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.segment, self.page)
    }
}

/// A logical address reduced to its page and the position inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub page_key: PageKey,
    pub offset_in_page: u64,
    /// Address with segments laid out back to back, before paging.
    pub segmented_address: u64,
}

impl Resolved {
    pub fn page_index(&self) -> u64 {
        self.page_key.page
    }
}

/// Base-address translation, without paging.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlatTranslation {
    pub base: u64,
    pub offset: u64,
    pub physical_address: u64,
}

impl FlatTranslation {
    pub fn note(&self) -> String {
        format!(
            "Physical address = base ({}) + offset ({})",
            self.base, self.offset
        )
    }
}

/// Segment id to segment size in bytes. Sizes are never zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SegmentTable {
    segments: BTreeMap<SegmentId, NonZeroU64>,
}

impl SegmentTable {
    pub fn from_sizes<I>(sizes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (SegmentId, u64)>,
    {
        let mut segments = BTreeMap::new();

        for (segment, size) in sizes {
            let size = NonZeroU64::new(size).ok_or(ConfigError::EmptySegment { segment })?;

            if segments.insert(segment, size).is_some() {
                return Err(ConfigError::DuplicateSegment { segment });
            }
        }

        Ok(SegmentTable { segments })
    }

    pub fn size(&self, segment: SegmentId) -> Option<u64> {
        self.segments.get(&segment).map(|size| size.get())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, u64)> + '_ {
        self.segments.iter().map(|(&id, size)| (id, size.get()))
    }

    /// Checks `offset` against the segment limit and splits it into page
    /// index and in-page offset.
    pub fn resolve(&self, segment: SegmentId, offset: i64) -> Result<Resolved, TranslationError> {
        let offset = self.check_bounds(segment, offset)?;

        Ok(Resolved {
            page_key: PageKey::new(segment, offset / PAGE_SIZE),
            offset_in_page: offset % PAGE_SIZE,
            segmented_address: self.base(segment).saturating_add(offset),
        })
    }

    /// Sum of the sizes of every segment with a smaller id.
    pub fn base_of(&self, segment: SegmentId) -> Option<u64> {
        if !self.segments.contains_key(&segment) {
            return None;
        }

        Some(self.base(segment))
    }

    fn base(&self, segment: SegmentId) -> u64 {
        self.segments
            .range(..segment)
            .fold(0u64, |acc, (_, size)| acc.saturating_add(size.get()))
    }

    /// Places segments back to back in ascending id order and adds `offset`
    /// to the segment base.
    pub fn translate_flat(
        &self,
        segment: SegmentId,
        offset: i64,
    ) -> Result<FlatTranslation, TranslationError> {
        let offset = self.check_bounds(segment, offset)?;
        let base = self
            .base_of(segment)
            .ok_or(TranslationError::SegmentNotFound { segment })?;

        Ok(FlatTranslation {
            base,
            offset,
            physical_address: base.saturating_add(offset),
        })
    }

    fn check_bounds(&self, segment: SegmentId, offset: i64) -> Result<u64, TranslationError> {
        let limit = self
            .size(segment)
            .ok_or(TranslationError::SegmentNotFound { segment })?;

        match u64::try_from(offset) {
            Ok(checked) if checked < limit => Ok(checked),
            _ => Err(TranslationError::OutOfBounds {
                segment,
                offset,
                limit,
            }),
        }
    }
}

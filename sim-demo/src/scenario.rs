//! Parsing of the compact text formats accepted on the command line:
//!
//! | what     | example          |
//! |----------|------------------|
//! | segments | `0-100;1-200`    |
//! | accesses | `0:10,0:150`     |
//! | pages    | `7,0,1,2` or `7 0 1 2` |

use std::{num::NonZeroUsize, str::FromStr};

use segvm::{ConfigError, SegmentId, SegmentTable};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("malformed segment {0:?} (expected ID-SIZE)")]
    MalformedSegment(String),

    #[error("malformed access {0:?} (expected SEGMENT:OFFSET)")]
    MalformedAccess(String),

    #[error("invalid {what} {value:?}")]
    InvalidNumber { what: &'static str, value: String },

    #[error("frame count must be a positive integer, got {0:?}")]
    InvalidFrames(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn number<T: FromStr>(what: &'static str, value: &str) -> Result<T, ScenarioError> {
    value.trim().parse().map_err(|_| ScenarioError::InvalidNumber {
        what,
        value: value.trim().to_string(),
    })
}

fn items<'a>(input: &'a str, separators: &'static [char]) -> impl Iterator<Item = &'a str> {
    input
        .split(|c: char| separators.contains(&c) || c.is_whitespace())
        .filter(|item| !item.is_empty())
}

pub fn parse_segments(input: &str) -> Result<SegmentTable, ScenarioError> {
    let sizes = items(input, &[';', ','])
        .map(|part| {
            let (id, size) = part
                .split_once('-')
                .ok_or_else(|| ScenarioError::MalformedSegment(part.to_string()))?;

            Ok((
                number::<SegmentId>("segment id", id)?,
                number::<u64>("segment size", size)?,
            ))
        })
        .collect::<Result<Vec<_>, ScenarioError>>()?;

    Ok(SegmentTable::from_sizes(sizes)?)
}

pub fn parse_accesses(input: &str) -> Result<Vec<(SegmentId, i64)>, ScenarioError> {
    items(input, &[';', ','])
        .map(|part| {
            let (segment, offset) = part
                .split_once(':')
                .ok_or_else(|| ScenarioError::MalformedAccess(part.to_string()))?;

            Ok((number("segment id", segment)?, number("offset", offset)?))
        })
        .collect()
}

pub fn parse_pages(input: &str) -> Result<Vec<i64>, ScenarioError> {
    items(input, &[',', ';'])
        .map(|page| number("page", page))
        .collect()
}

pub fn parse_frames(input: &str) -> Result<NonZeroUsize, ScenarioError> {
    input
        .trim()
        .parse()
        .map_err(|_| ScenarioError::InvalidFrames(input.to_string()))
}

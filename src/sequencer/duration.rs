// Duration codes - basic note durations used as time signature and tempo denominators
// Code n stands for a 1/2^n note (0 = whole note ... 5 = thirty-second note)

use crate::error::{MetronomeError, MetronomeResult};
use std::fmt;

/// Basic note duration, stored as a compact code
///
/// Serialized as the displayed denominator (1, 2, 4, 8, 16, 32) so config files
/// read the way the music is written.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum DurationCode {
    Whole = 0,
    Half = 1,
    #[default]
    Quarter = 2,
    Eighth = 3,
    Sixteenth = 4,
    ThirtySecond = 5,
}

impl DurationCode {
    /// All codes, shortest code first
    pub const ALL: [DurationCode; 6] = [
        DurationCode::Whole,
        DurationCode::Half,
        DurationCode::Quarter,
        DurationCode::Eighth,
        DurationCode::Sixteenth,
        DurationCode::ThirtySecond,
    ];

    /// Compact code (0..=5)
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up a duration from its compact code
    pub fn from_code(code: u8) -> MetronomeResult<Self> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(MetronomeError::InvalidDurationCode(code))
    }

    /// Denominator as written in the score: 2^code
    pub fn to_displayed(self) -> u32 {
        1 << self.code()
    }

    /// Inverse of `to_displayed`; only exact powers of two up to 32 are accepted
    pub fn from_displayed(displayed: u32) -> MetronomeResult<Self> {
        match displayed {
            1 => Ok(DurationCode::Whole),
            2 => Ok(DurationCode::Half),
            4 => Ok(DurationCode::Quarter),
            8 => Ok(DurationCode::Eighth),
            16 => Ok(DurationCode::Sixteenth),
            32 => Ok(DurationCode::ThirtySecond),
            other => Err(MetronomeError::InvalidDuration(other)),
        }
    }
}

impl TryFrom<u32> for DurationCode {
    type Error = MetronomeError;

    fn try_from(displayed: u32) -> Result<Self, Self::Error> {
        Self::from_displayed(displayed)
    }
}

impl From<DurationCode> for u32 {
    fn from(duration: DurationCode) -> Self {
        duration.to_displayed()
    }
}

impl fmt::Display for DurationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_displayed())
    }
}

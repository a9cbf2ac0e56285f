// Timeline - Musical value types for a single bar
// Time signature and tempo marking, each paired with a note-duration denominator

use super::duration::DurationCode;
use crate::error::{MetronomeError, MetronomeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time signature (numerator/denominator)
/// Example: 6/8 time = 6 beats per bar, each an eighth note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSignature")]
pub struct TimeSignature {
    numerator: u32,
    denominator: DurationCode,
}

#[derive(Deserialize)]
struct RawTimeSignature {
    numerator: u32,
    denominator: DurationCode,
}

impl TryFrom<RawTimeSignature> for TimeSignature {
    type Error = MetronomeError;

    fn try_from(raw: RawTimeSignature) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl TimeSignature {
    /// Creates a new time signature; the numerator must be > 0
    pub fn new(numerator: u32, denominator: DurationCode) -> MetronomeResult<Self> {
        if numerator == 0 {
            return Err(MetronomeError::InvalidValue(
                "Time signature numerator must be > 0".to_string(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self {
            numerator: 4,
            denominator: DurationCode::Quarter,
        }
    }

    /// Number of beats per bar
    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> DurationCode {
        self.denominator
    }

    /// Denominator as written in the score (4 for quarter notes)
    pub fn denominator_as_number(&self) -> u32 {
        self.denominator.to_displayed()
    }

    pub fn set_numerator(&mut self, numerator: u32) -> MetronomeResult<()> {
        *self = Self::new(numerator, self.denominator)?;
        Ok(())
    }

    pub fn set_denominator(&mut self, denominator: DurationCode) {
        self.denominator = denominator;
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Tempo marking: `per_minute` notes of `denominator` value per minute
/// Example: quarter = 120 is Tempo { per_minute: 120.0, denominator: Quarter }
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTempo")]
pub struct Tempo {
    per_minute: f64,
    denominator: DurationCode,
}

#[derive(Deserialize)]
struct RawTempo {
    per_minute: f64,
    denominator: DurationCode,
}

impl TryFrom<RawTempo> for Tempo {
    type Error = MetronomeError;

    fn try_from(raw: RawTempo) -> Result<Self, Self::Error> {
        Self::new(raw.per_minute, raw.denominator)
    }
}

impl Tempo {
    /// Creates a new tempo
    /// `per_minute` must be finite and > 0
    pub fn new(per_minute: f64, denominator: DurationCode) -> MetronomeResult<Self> {
        if !per_minute.is_finite() || per_minute <= 0.0 {
            return Err(MetronomeError::InvalidValue(format!(
                "Tempo must be a positive number of beats per minute, got {}",
                per_minute
            )));
        }
        Ok(Self {
            per_minute,
            denominator,
        })
    }

    /// Quarter note = `bpm`
    pub fn quarter(bpm: f64) -> MetronomeResult<Self> {
        Self::new(bpm, DurationCode::Quarter)
    }

    pub fn per_minute(&self) -> f64 {
        self.per_minute
    }

    pub fn denominator(&self) -> DurationCode {
        self.denominator
    }

    pub fn set_per_minute(&mut self, per_minute: f64) -> MetronomeResult<()> {
        *self = Self::new(per_minute, self.denominator)?;
        Ok(())
    }

    pub fn set_denominator(&mut self, denominator: DurationCode) {
        self.denominator = denominator;
    }

    /// Duration of one tempo beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.per_minute
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self {
            per_minute: 120.0,
            denominator: DurationCode::Quarter,
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{} = {:.1}", self.denominator, self.per_minute)
    }
}

/// One measure: a time signature and the tempo it is played at
///
/// Bars are never edited in place; a `BarSequence` replaces them wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bar {
    time_signature: TimeSignature,
    tempo: Tempo,
}

impl Bar {
    pub fn new(time_signature: TimeSignature, tempo: Tempo) -> Self {
        Self {
            time_signature,
            tempo,
        }
    }

    /// Copy of the bar's time signature
    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    /// Copy of the bar's tempo
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }
}

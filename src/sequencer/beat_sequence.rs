// Beat sequence time representation
// A bar sequence unrolled into individually timed beats, ready for playback

use crate::error::{MetronomeError, MetronomeResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One timed beat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatTimeRepresentation {
    duration_in_millis: f64,
    is_count_in: bool,
    is_first_beat_of_bar: bool,
    associated_bar_number: u32,
}

impl BeatTimeRepresentation {
    pub fn new(
        duration_in_millis: f64,
        is_count_in: bool,
        is_first_beat_of_bar: bool,
        associated_bar_number: u32,
    ) -> Self {
        Self {
            duration_in_millis,
            is_count_in,
            is_first_beat_of_bar,
            associated_bar_number,
        }
    }

    pub fn duration_in_millis(&self) -> f64 {
        self.duration_in_millis
    }

    /// Beat length as a `Duration` (sub-microsecond precision is kept)
    ///
    /// Fails for negative, NaN or unrepresentably long beats.
    pub fn duration(&self) -> MetronomeResult<Duration> {
        Duration::try_from_secs_f64(self.duration_in_millis / 1000.0).map_err(|e| {
            MetronomeError::InvalidValue(format!(
                "Beat of {} ms in bar {} has no playable duration: {}",
                self.duration_in_millis, self.associated_bar_number, e
            ))
        })
    }

    pub fn is_count_in(&self) -> bool {
        self.is_count_in
    }

    pub fn is_first_beat_of_bar(&self) -> bool {
        self.is_first_beat_of_bar
    }

    pub fn associated_bar_number(&self) -> u32 {
        self.associated_bar_number
    }

    /// Same beat, tagged as part of a count-in
    pub fn as_count_in(&self) -> Self {
        Self {
            is_count_in: true,
            ..*self
        }
    }
}

/// Immutable ordered sequence of timed beats
///
/// `trim` and `add_count_in` return new sequences and leave the receiver untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeatSequenceTimeRepresentation {
    beats: Vec<BeatTimeRepresentation>,
}

impl BeatSequenceTimeRepresentation {
    pub fn new(beats: Vec<BeatTimeRepresentation>) -> Self {
        Self { beats }
    }

    /// Keep only the beats of bar `position` onwards, without renumbering bars
    ///
    /// `position` may be one past the last bar, which yields an empty sequence.
    pub fn trim(&self, position: u32) -> MetronomeResult<Self> {
        let max = self.last_bar_number().unwrap_or(0) + 1;
        if position == 0 || position > max {
            return Err(MetronomeError::TrimOutOfRange { position, max });
        }

        Ok(Self::new(
            self.beats
                .iter()
                .filter(|beat| beat.associated_bar_number >= position)
                .copied()
                .collect(),
        ))
    }

    /// Prepend `length` repetitions of the first bar's beats, tagged as count-in
    ///
    /// Every repetition is built from fresh beat values; no two beats of the
    /// result share state.
    pub fn add_count_in(&self, length: u32) -> Self {
        let count_in_bar = self.first_bar_count_in();
        let mut beats = Vec::with_capacity(count_in_bar.len() * length as usize + self.beats.len());
        for _ in 0..length {
            beats.extend_from_slice(&count_in_bar);
        }
        beats.extend_from_slice(&self.beats);
        Self::new(beats)
    }

    /// Beat at `index` (0-indexed)
    pub fn get_beat(&self, index: usize) -> MetronomeResult<BeatTimeRepresentation> {
        self.beats
            .get(index)
            .copied()
            .ok_or(MetronomeError::BeatOutOfRange {
                index,
                len: self.beats.len(),
            })
    }

    pub fn is_final_beat(&self, index: usize) -> bool {
        !self.beats.is_empty() && index == self.beats.len() - 1
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BeatTimeRepresentation> + '_ {
        self.beats.iter()
    }

    pub fn beats(&self) -> &[BeatTimeRepresentation] {
        &self.beats
    }

    /// Bar number of the first beat, if any
    pub fn first_bar_number(&self) -> Option<u32> {
        self.beats.first().map(|beat| beat.associated_bar_number)
    }

    /// Bar number of the final beat, if any
    pub fn last_bar_number(&self) -> Option<u32> {
        self.beats.last().map(|beat| beat.associated_bar_number)
    }

    /// Sum of all beat durations
    ///
    /// Fails if any beat has no playable duration or the sum overflows.
    pub fn total_duration(&self) -> MetronomeResult<Duration> {
        self.beats.iter().try_fold(Duration::ZERO, |total, beat| {
            total.checked_add(beat.duration()?).ok_or_else(|| {
                MetronomeError::InvalidValue("Beat sequence is too long to play".to_string())
            })
        })
    }

    fn first_bar_count_in(&self) -> Vec<BeatTimeRepresentation> {
        let Some(first_bar) = self.first_bar_number() else {
            return Vec::new();
        };
        self.beats
            .iter()
            .filter(|beat| beat.associated_bar_number == first_bar)
            .map(BeatTimeRepresentation::as_count_in)
            .collect()
    }
}

impl FromIterator<BeatTimeRepresentation> for BeatSequenceTimeRepresentation {
    fn from_iter<I: IntoIterator<Item = BeatTimeRepresentation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

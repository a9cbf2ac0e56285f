// Count-in controller - whether to play a lead-in and how many bars long

use crate::sequencer::BeatSequenceTimeRepresentation;

/// Holds the count-in settings and prepends the lead-in bars
///
/// Starts disabled with a length of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountInController {
    enabled: bool,
    length: u32,
}

impl CountInController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(enabled: bool, length: u32) -> Self {
        Self { enabled, length }
    }

    /// Prepend `length` count-in bars if enabled, otherwise return `sequence` as is
    pub fn apply(
        &self,
        sequence: BeatSequenceTimeRepresentation,
    ) -> BeatSequenceTimeRepresentation {
        if self.enabled {
            sequence.add_count_in(self.length)
        } else {
            sequence
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_length(&mut self, length: u32) {
        self.length = length;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn length(&self) -> u32 {
        self.length
    }
}

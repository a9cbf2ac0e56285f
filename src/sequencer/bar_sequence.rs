// Bar sequence - the user-edited list of bars
// Bars are numbered 1..=count externally; deleting a bar renumbers everything after it

use super::beat_sequence::BeatSequenceTimeRepresentation;
use super::builder::BeatSequenceBuilder;
use super::timeline::{Bar, Tempo, TimeSignature};
use crate::error::{MetronomeError, MetronomeResult};
use serde::{Deserialize, Serialize};

/// Ordered collection of bars, 1-indexed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BarSequence {
    bars: Vec<Bar>,
}

impl BarSequence {
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Append `count` identical bars to the end
    pub fn append_bars(&mut self, time_signature: TimeSignature, tempo: Tempo, count: usize) {
        let bar = Bar::new(time_signature, tempo);
        self.bars.extend(std::iter::repeat_n(bar, count));
    }

    /// Replace bar `bar_number` wholesale
    pub fn replace_bar(
        &mut self,
        bar_number: u32,
        time_signature: TimeSignature,
        tempo: Tempo,
    ) -> MetronomeResult<()> {
        let index = self.index_of(bar_number)?;
        self.bars[index] = Bar::new(time_signature, tempo);
        Ok(())
    }

    /// Remove bar `bar_number`; later bars move down by one
    pub fn delete_bar(&mut self, bar_number: u32) -> MetronomeResult<Bar> {
        let index = self.index_of(bar_number)?;
        Ok(self.bars.remove(index))
    }

    pub fn time_signature_of(&self, bar_number: u32) -> MetronomeResult<TimeSignature> {
        Ok(self.bar(bar_number)?.time_signature())
    }

    pub fn tempo_of(&self, bar_number: u32) -> MetronomeResult<Tempo> {
        Ok(self.bar(bar_number)?.tempo())
    }

    /// Copy of bar `bar_number`
    pub fn bar(&self, bar_number: u32) -> MetronomeResult<Bar> {
        let index = self.index_of(bar_number)?;
        Ok(self.bars[index])
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Iterate as (bar_number, bar) pairs
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Bar)> + '_ {
        self.bars
            .iter()
            .enumerate()
            .map(|(index, bar)| (index as u32 + 1, bar))
    }

    /// Unroll this sequence into timed beats with the given strategy
    pub fn time_representation(
        &self,
        builder: &dyn BeatSequenceBuilder,
    ) -> BeatSequenceTimeRepresentation {
        builder.build(self)
    }

    fn index_of(&self, bar_number: u32) -> MetronomeResult<usize> {
        if bar_number == 0 || bar_number as usize > self.bars.len() {
            return Err(MetronomeError::BarOutOfRange {
                bar: bar_number,
                bar_count: self.bars.len(),
            });
        }
        Ok(bar_number as usize - 1)
    }
}

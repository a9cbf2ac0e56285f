// Beat sequence builders - strategies turning bars into timed beats

use super::bar_sequence::BarSequence;
use super::beat_sequence::{BeatSequenceTimeRepresentation, BeatTimeRepresentation};
use super::timeline::Bar;

/// Converts a bar sequence into a beat sequence time representation
///
/// Any `Fn(&BarSequence) -> BeatSequenceTimeRepresentation` is a builder, so
/// alternative strategies (swing, subdivisions) can be plain closures.
pub trait BeatSequenceBuilder {
    fn build(&self, bars: &BarSequence) -> BeatSequenceTimeRepresentation;
}

impl<F> BeatSequenceBuilder for F
where
    F: Fn(&BarSequence) -> BeatSequenceTimeRepresentation,
{
    fn build(&self, bars: &BarSequence) -> BeatSequenceTimeRepresentation {
        self(bars)
    }
}

/// One click per time-signature beat, scaled by the tempo/time-signature denominator ratio
///
/// A bar in 3/8 at quarter = 120 clicks on every eighth: 250ms each.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleBeatSequenceBuilder;

impl SimpleBeatSequenceBuilder {
    /// Milliseconds per time-signature beat for `bar`
    pub fn millis_per_subdivision(bar: &Bar) -> f64 {
        let time_signature = bar.time_signature();
        let tempo = bar.tempo();
        // tempo denominator over time-signature denominator, never the reverse
        let tempo_ratio = tempo.denominator().to_displayed() as f64
            / time_signature.denominator().to_displayed() as f64;
        tempo.beat_duration_seconds() * tempo_ratio * 1000.0
    }
}

impl BeatSequenceBuilder for SimpleBeatSequenceBuilder {
    fn build(&self, bars: &BarSequence) -> BeatSequenceTimeRepresentation {
        bars.iter()
            .flat_map(|(bar_number, bar)| {
                let millis = Self::millis_per_subdivision(bar);
                (0..bar.time_signature().numerator()).map(move |position| {
                    BeatTimeRepresentation::new(millis, false, position == 0, bar_number)
                })
            })
            .collect()
    }
}

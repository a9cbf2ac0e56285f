// Collaborator contracts
//
// Consumed by the engine (implemented by the UI / audio layers):
// - ClickProvider: high and low clicks
// - BarHighlighter: transient "now playing" highlight
// - BarMarker: persistent "selected" mark, independent of highlight
// - TimeRepresentationProvider: the current bar sequence, unrolled into beats
//
// Exposed by the engine to the UI layer:
// - CountInControl, PositionControl, PlaybackControl

use crate::error::{CollaboratorResult, MetronomeResult};
use crate::sequencer::BeatSequenceTimeRepresentation;

/// Audio side: fire-and-forget clicks
pub trait ClickProvider {
    fn play_high(&mut self) -> CollaboratorResult;
    fn play_low(&mut self) -> CollaboratorResult;
}

/// Rendering side: highlight the bar being played
///
/// Implementations must tolerate redundant calls (highlighting a bar that is
/// already highlighted, cancelling one that is not).
pub trait BarHighlighter {
    fn highlight_normal(&mut self, bar: u32) -> CollaboratorResult;
    fn highlight_count_in(&mut self, bar: u32) -> CollaboratorResult;
    fn cancel_highlight(&mut self, bar: u32) -> CollaboratorResult;
}

/// Rendering side: persistent mark on the user-selected bar
pub trait BarMarker {
    fn mark_bar(&mut self, bar: u32) -> CollaboratorResult;
    fn unmark_bar(&mut self, bar: u32) -> CollaboratorResult;
}

/// Source of the full (untrimmed, no count-in) beat sequence
pub trait TimeRepresentationProvider {
    fn time_representation(&self) -> BeatSequenceTimeRepresentation;
}

/// UI interface to the count-in settings
pub trait CountInControl {
    fn toggle_count_in(&mut self, enabled: bool);
    fn change_count_in_length(&mut self, bars: u32);
}

/// UI interface to user bar selection
pub trait PositionControl {
    /// Select `bar`, or deselect it if it is already selected
    /// Pauses playback first if a sequence is in flight.
    fn change_user_position(&mut self, bar: u32) -> MetronomeResult<()>;
}

/// UI interface to transport controls
pub trait PlaybackControl {
    fn start_playing(&mut self) -> MetronomeResult<()>;
    fn pause_playing(&mut self) -> MetronomeResult<()>;
    fn rewind(&mut self) -> MetronomeResult<()>;
}

// Position controller - playback position state machine
// Tracks the bar being played and the user-selected bar, and keeps the
// highlight and selection mark in the rendering layer in step with them.

use super::count_in::CountInController;
use super::interfaces::{BarHighlighter, BarMarker};
use crate::error::MetronomeResult;
use crate::sequencer::BeatSequenceTimeRepresentation;

/// Playback position state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Starting,
    Playing,
    Paused,
    RewoundToUserPosition,
    RewoundToStart,
}

impl PositionState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PositionState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PositionState::Paused)
    }

    /// Stopped at a position from which the next start begins
    pub fn is_rewound(&self) -> bool {
        matches!(
            self,
            PositionState::RewoundToUserPosition | PositionState::RewoundToStart
        )
    }
}

/// Owns the current play position and the user-selected bar
///
/// Bar numbers refer to the untrimmed bar sequence. The current play position
/// starts at bar 1 and is always a valid bar number.
pub struct PositionController {
    state: PositionState,
    current_play_position: u32,
    user_selected_bar: Option<u32>,
    highlighter: Box<dyn BarHighlighter>,
    marker: Box<dyn BarMarker>,
}

impl PositionController {
    pub fn new(highlighter: Box<dyn BarHighlighter>, marker: Box<dyn BarMarker>) -> Self {
        Self {
            state: PositionState::Starting,
            current_play_position: 1,
            user_selected_bar: None,
            highlighter,
            marker,
        }
    }

    pub fn state(&self) -> PositionState {
        self.state
    }

    pub fn current_play_position(&self) -> u32 {
        self.current_play_position
    }

    pub fn user_selected_bar(&self) -> Option<u32> {
        self.user_selected_bar
    }

    pub fn user_has_selected_bar(&self) -> bool {
        self.user_selected_bar.is_some()
    }

    /// Trim `full_sequence` to where the next playback starts, then add the count-in
    ///
    /// Starts from the paused bar when paused, otherwise from the user-selected
    /// bar, otherwise from bar 1.
    pub fn create_playable_sequence(
        &self,
        full_sequence: &BeatSequenceTimeRepresentation,
        count_in: &CountInController,
    ) -> MetronomeResult<BeatSequenceTimeRepresentation> {
        let trimmed = full_sequence.trim(self.start_position())?;
        Ok(count_in.apply(trimmed))
    }

    /// Bar the next playback starts from
    pub fn start_position(&self) -> u32 {
        if self.state.is_paused() {
            self.current_play_position
        } else {
            self.user_selected_bar.unwrap_or(1)
        }
    }

    pub fn begin_playback(&mut self) {
        self.transition(PositionState::Playing);
    }

    /// Stop at `bar`, the bar of the beat last played, and highlight it normally
    pub fn pause(&mut self, bar: u32) -> MetronomeResult<()> {
        self.move_highlight(bar, false)?;
        self.transition(PositionState::Paused);
        Ok(())
    }

    /// Move the play position to `bar`, highlighted as count-in or normal playback
    pub fn advance_to(&mut self, bar: u32, is_count_in: bool) -> MetronomeResult<()> {
        self.move_highlight(bar, is_count_in)
    }

    /// The final beat has been consumed: return to the user bar, or to the start
    pub fn finish_sequence(&mut self) -> MetronomeResult<()> {
        self.highlighter.cancel_highlight(self.current_play_position)?;
        match self.user_selected_bar {
            Some(selected) => {
                self.current_play_position = selected;
                self.highlighter.highlight_normal(selected)?;
                self.transition(PositionState::RewoundToUserPosition);
            }
            None => {
                self.current_play_position = 1;
                self.transition(PositionState::Starting);
            }
        }
        Ok(())
    }

    /// Fall back when the bar the next start would begin from no longer exists
    ///
    /// A selected bar past `last_bar` is unmarked and dropped. The position then
    /// moves to the remaining selection, or to bar 1.
    pub fn discard_stale_positions(&mut self, last_bar: u32) -> MetronomeResult<()> {
        let start = self.start_position();
        if start <= last_bar.max(1) {
            return Ok(());
        }
        log::warn!(
            "Bar {} no longer exists (last bar is {}), moving the start position back",
            start,
            last_bar
        );

        if let Some(selected) = self.user_selected_bar.filter(|&bar| bar > last_bar) {
            self.marker.unmark_bar(selected)?;
            self.user_selected_bar = None;
        }
        self.highlighter.cancel_highlight(self.current_play_position)?;
        match self.user_selected_bar {
            Some(selected) => {
                self.current_play_position = selected;
                self.highlighter.highlight_normal(selected)?;
                self.transition(PositionState::RewoundToUserPosition);
            }
            None => {
                self.current_play_position = 1;
                self.highlighter.highlight_normal(1)?;
                self.transition(PositionState::Starting);
            }
        }
        Ok(())
    }

    /// Select `bar`, or deselect it if it is already the selected bar
    ///
    /// Must only be called while no beat sequence is in flight; the coordinator
    /// pauses playback before calling this.
    pub fn select_user_bar(&mut self, bar: u32) -> MetronomeResult<()> {
        if self.user_selected_bar == Some(bar) {
            log::debug!("Deselecting bar {}", bar);
            self.cancel_highlights(bar)?;
            self.marker.unmark_bar(bar)?;
            self.user_selected_bar = None;
            self.current_play_position = 1;
            self.highlighter.highlight_normal(1)?;
            return Ok(());
        }

        log::debug!("Selecting bar {}", bar);
        if let Some(previous) = self.user_selected_bar.take() {
            self.marker.unmark_bar(previous)?;
            self.cancel_highlights(previous)?;
        } else {
            self.highlighter.cancel_highlight(self.current_play_position)?;
        }
        self.marker.mark_bar(bar)?;
        self.highlighter.highlight_normal(bar)?;
        self.user_selected_bar = Some(bar);
        self.current_play_position = bar;
        Ok(())
    }

    /// Back to the user-selected bar; if already there (or nothing is selected),
    /// back to the very start
    pub fn rewind(&mut self) -> MetronomeResult<()> {
        match self.user_selected_bar {
            Some(selected) if selected != self.current_play_position => {
                self.restore_user_position(selected)
            }
            _ => self.reset_all_positions(),
        }
    }

    fn restore_user_position(&mut self, selected: u32) -> MetronomeResult<()> {
        self.move_highlight(selected, false)?;
        self.transition(PositionState::RewoundToUserPosition);
        Ok(())
    }

    fn reset_all_positions(&mut self) -> MetronomeResult<()> {
        match self.user_selected_bar.take() {
            Some(selected) => {
                self.marker.unmark_bar(selected)?;
                self.cancel_highlights(selected)?;
            }
            None => self.highlighter.cancel_highlight(self.current_play_position)?,
        }
        self.current_play_position = 1;
        self.highlighter.highlight_normal(1)?;
        self.transition(PositionState::RewoundToStart);
        Ok(())
    }

    fn move_highlight(&mut self, bar: u32, is_count_in: bool) -> MetronomeResult<()> {
        self.highlighter.cancel_highlight(self.current_play_position)?;
        if is_count_in {
            self.highlighter.highlight_count_in(bar)?;
        } else {
            self.highlighter.highlight_normal(bar)?;
        }
        self.current_play_position = bar;
        Ok(())
    }

    /// Cancel the highlight on `bar` and on the play position, once each
    fn cancel_highlights(&mut self, bar: u32) -> MetronomeResult<()> {
        self.highlighter.cancel_highlight(bar)?;
        if self.current_play_position != bar {
            self.highlighter.cancel_highlight(self.current_play_position)?;
        }
        Ok(())
    }

    fn transition(&mut self, next: PositionState) {
        if self.state != next {
            log::debug!(
                "Position state {:?} -> {:?} at bar {}",
                self.state,
                next,
                self.current_play_position
            );
        }
        self.state = next;
    }
}

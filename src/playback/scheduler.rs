// Playback scheduler - walks a beat sequence in real time
//
// Single-threaded and cooperative: playing a beat fires its click and highlight,
// then leaves exactly one pending resumption due after the beat's duration.
// Nothing runs between resumptions, so the UI may pause, rewind or select bars
// freely while the engine is idle. Cancelling clears the pending resumption;
// no click or highlight for a cancelled beat fires afterwards.

use super::interfaces::ClickProvider;
use super::position::PositionController;
use crate::error::{MetronomeError, MetronomeResult};
use crate::messaging::PlaybackEvent;
use crate::sequencer::{BeatSequenceTimeRepresentation, BeatTimeRepresentation};
use std::time::Instant;

/// Metronome click type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickType {
    /// High click on the first beat of a bar
    Accent,
    /// Low click on the other beats
    Regular,
}

impl ClickType {
    pub fn for_beat(beat: &BeatTimeRepresentation) -> Self {
        if beat.is_first_beat_of_bar() {
            ClickType::Accent
        } else {
            ClickType::Regular
        }
    }
}

/// Identifies one scheduled resumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeAction {
    NextBeat(usize),
    FinishSequence,
}

#[derive(Debug, Clone, Copy)]
struct PendingResume {
    handle: CancelHandle,
    due: Instant,
    action: ResumeAction,
}

/// Plays a beat sequence one beat at a time
pub struct PlaybackScheduler {
    clicks: Box<dyn ClickProvider>,
    sequence: BeatSequenceTimeRepresentation,
    current_index: usize,
    pending: Option<PendingResume>,
    next_handle: u64,
}

impl PlaybackScheduler {
    pub fn new(clicks: Box<dyn ClickProvider>) -> Self {
        Self {
            clicks,
            sequence: BeatSequenceTimeRepresentation::default(),
            current_index: 0,
            pending: None,
            next_handle: 0,
        }
    }

    /// Play beat 0 of `sequence` now and schedule the rest
    ///
    /// Any resumption still pending from a previous sequence is cancelled first.
    pub fn play_sequence(
        &mut self,
        sequence: BeatSequenceTimeRepresentation,
        now: Instant,
        position: &mut PositionController,
    ) -> MetronomeResult<Vec<PlaybackEvent>> {
        self.cancel();
        self.sequence = sequence;
        self.current_index = 0;

        let mut events = Vec::new();
        if self.sequence.is_empty() {
            return Ok(events);
        }
        let result = self.play_current(now, position, &mut events);
        self.abort_on_error(result)?;
        Ok(events)
    }

    /// Fire every resumption due at or before `now`
    ///
    /// Each beat is timed from the previous beat's deadline, not from `now`, so
    /// late polling does not accumulate drift.
    pub fn poll(
        &mut self,
        now: Instant,
        position: &mut PositionController,
    ) -> MetronomeResult<Vec<PlaybackEvent>> {
        let mut events = Vec::new();
        while let Some(pending) = self.pending.filter(|pending| pending.due <= now) {
            self.pending = None;
            let result = match pending.action {
                ResumeAction::NextBeat(index) => {
                    self.current_index = index;
                    self.play_current(pending.due, position, &mut events)
                }
                ResumeAction::FinishSequence => self.finish(position, &mut events),
            };
            self.abort_on_error(result)?;
        }
        Ok(events)
    }

    /// Cancel playback and leave the position at the bar of the beat last played
    ///
    /// Returns that bar, or `None` when nothing was in flight.
    pub fn pause(&mut self, position: &mut PositionController) -> MetronomeResult<Option<u32>> {
        if self.cancel().is_none() {
            return Ok(None);
        }
        let bar = self
            .sequence
            .get_beat(self.current_index)?
            .associated_bar_number();
        self.sequence = BeatSequenceTimeRepresentation::default();
        position.pause(bar)?;
        Ok(Some(bar))
    }

    /// Cancel playback and rewind the position
    pub fn rewind(&mut self, position: &mut PositionController) -> MetronomeResult<()> {
        self.cancel();
        self.sequence = BeatSequenceTimeRepresentation::default();
        position.rewind()
    }

    /// Drop the pending resumption, returning its handle
    pub fn cancel(&mut self) -> Option<CancelHandle> {
        self.pending.take().map(|pending| {
            log::debug!("Cancelled resumption {:?}", pending.handle);
            pending.handle
        })
    }

    /// A resumption is outstanding
    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.due)
    }

    pub fn pending_handle(&self) -> Option<CancelHandle> {
        self.pending.map(|pending| pending.handle)
    }

    /// Index of the beat last played in the current sequence
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    fn play_current(
        &mut self,
        started_at: Instant,
        position: &mut PositionController,
        events: &mut Vec<PlaybackEvent>,
    ) -> MetronomeResult<()> {
        let index = self.current_index;
        let beat = self.sequence.get_beat(index)?;
        // Resolve the deadline first so an unplayable beat fires nothing
        let due = started_at.checked_add(beat.duration()?).ok_or_else(|| {
            MetronomeError::InvalidValue(format!("Beat {} ends beyond the clock's range", index))
        })?;
        let click = ClickType::for_beat(&beat);
        match click {
            ClickType::Accent => self.clicks.play_high()?,
            ClickType::Regular => self.clicks.play_low()?,
        }
        position.advance_to(beat.associated_bar_number(), beat.is_count_in())?;
        events.push(PlaybackEvent::BeatPlayed {
            index,
            bar: beat.associated_bar_number(),
            click,
            is_count_in: beat.is_count_in(),
        });

        let action = if self.sequence.is_final_beat(index) {
            ResumeAction::FinishSequence
        } else {
            ResumeAction::NextBeat(index + 1)
        };
        self.schedule(due, action);
        Ok(())
    }

    fn finish(
        &mut self,
        position: &mut PositionController,
        events: &mut Vec<PlaybackEvent>,
    ) -> MetronomeResult<()> {
        self.sequence = BeatSequenceTimeRepresentation::default();
        position.finish_sequence()?;
        log::info!(
            "Sequence finished, next start from bar {}",
            position.start_position()
        );
        events.push(PlaybackEvent::Finished {
            position: position.current_play_position(),
        });
        Ok(())
    }

    fn schedule(&mut self, due: Instant, action: ResumeAction) {
        let handle = CancelHandle(self.next_handle);
        self.next_handle += 1;
        log::debug!("Scheduled {:?} as {:?}", action, handle);
        self.pending = Some(PendingResume {
            handle,
            due,
            action,
        });
    }

    fn abort_on_error(&mut self, result: MetronomeResult<()>) -> MetronomeResult<()> {
        if let Err(err) = &result {
            log::error!("Playback aborted at beat {}: {}", self.current_index, err);
            self.pending = None;
            self.sequence = BeatSequenceTimeRepresentation::default();
        }
        result
    }
}

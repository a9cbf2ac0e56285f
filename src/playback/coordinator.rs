// Playback coordinator - facade over count-in, position and scheduling
//
// The UI layer talks to it through three narrow interfaces (CountInControl,
// PositionControl, PlaybackControl) and drives time with `poll()`.

use super::clock::{Clock, SystemClock};
use super::count_in::CountInController;
use super::interfaces::{
    BarHighlighter, BarMarker, ClickProvider, CountInControl, PlaybackControl, PositionControl,
    TimeRepresentationProvider,
};
use super::position::{PositionController, PositionState};
use super::scheduler::PlaybackScheduler;
use crate::config::EngineConfig;
use crate::error::{MetronomeError, MetronomeResult};
use crate::messaging::{Notification, NotificationProducer, PlaybackEvent};
use ringbuf::traits::Producer;
use std::time::Instant;

/// Owns the playback components for one session
pub struct PlaybackCoordinator {
    provider: Box<dyn TimeRepresentationProvider>,
    clock: Box<dyn Clock>,
    count_in: CountInController,
    position: PositionController,
    scheduler: PlaybackScheduler,
    notifications: Option<NotificationProducer>,
}

impl PlaybackCoordinator {
    /// Start building a coordinator; all four collaborators are required
    pub fn builder() -> PlaybackBuilder {
        PlaybackBuilder::new()
    }

    pub fn position(&self) -> &PositionController {
        &self.position
    }

    pub fn count_in(&self) -> &CountInController {
        &self.count_in
    }

    /// A beat sequence is in flight
    pub fn is_playing(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// When the next beat (or the end of the sequence) is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Fire everything due by now
    pub fn poll(&mut self) -> MetronomeResult<()> {
        let now = self.clock.now();
        let result = self.scheduler.poll(now, &mut self.position);
        let events = self.guard(result)?;
        self.publish_all(events);
        Ok(())
    }

    fn start(&mut self) -> MetronomeResult<()> {
        if self.scheduler.is_active() {
            log::debug!("Start requested while already playing, ignoring");
            return Ok(());
        }

        let full_sequence = self.provider.time_representation();
        let last_bar = full_sequence.last_bar_number().unwrap_or(0);
        let selected = self.position.user_selected_bar();
        let result = self.position.discard_stale_positions(last_bar);
        self.guard(result)?;
        if self.position.user_selected_bar() != selected {
            self.publish(PlaybackEvent::UserPositionChanged {
                selected: self.position.user_selected_bar(),
            });
        }

        let playable = self
            .position
            .create_playable_sequence(&full_sequence, &self.count_in)?;
        let Some(from_bar) = playable.first_bar_number() else {
            log::warn!(
                "Nothing to play from bar {}",
                self.position.start_position()
            );
            return Ok(());
        };
        let result = playable.total_duration();
        let total = self.guard(result)?;

        log::info!(
            "Playing {} beats ({:.1}s) from bar {} (count-in: {})",
            playable.len(),
            total.as_secs_f64(),
            from_bar,
            if self.count_in.is_enabled() {
                self.count_in.length()
            } else {
                0
            }
        );
        self.position.begin_playback();
        self.publish(PlaybackEvent::Started {
            from_bar,
            beat_count: playable.len(),
        });

        let now = self.clock.now();
        let result = self
            .scheduler
            .play_sequence(playable, now, &mut self.position);
        let events = self.guard(result)?;
        self.publish_all(events);
        Ok(())
    }

    fn pause(&mut self) -> MetronomeResult<()> {
        let result = self.scheduler.pause(&mut self.position);
        match self.guard(result)? {
            Some(bar) => {
                log::info!("Paused at bar {}", bar);
                self.publish(PlaybackEvent::Paused { bar });
            }
            None => log::debug!("Pause requested while not playing, ignoring"),
        }
        Ok(())
    }

    fn rewind_position(&mut self) -> MetronomeResult<()> {
        if !self.scheduler.is_active()
            && self.position.state() == PositionState::Starting
            && !self.position.user_has_selected_bar()
        {
            log::debug!("Rewind requested at start, ignoring");
            return Ok(());
        }

        let result = self.scheduler.rewind(&mut self.position);
        self.guard(result)?;
        self.publish(PlaybackEvent::Rewound {
            position: self.position.current_play_position(),
            state: self.position.state(),
        });
        Ok(())
    }

    fn select_bar(&mut self, bar: u32) -> MetronomeResult<()> {
        let last_bar = self
            .provider
            .time_representation()
            .last_bar_number()
            .unwrap_or(0);
        if bar == 0 || bar > last_bar {
            return Err(MetronomeError::BarOutOfRange {
                bar,
                bar_count: last_bar as usize,
            });
        }

        if self.scheduler.is_active() {
            self.pause()?;
        }
        let result = self.position.select_user_bar(bar);
        self.guard(result)?;
        self.publish(PlaybackEvent::UserPositionChanged {
            selected: self.position.user_selected_bar(),
        });
        Ok(())
    }

    /// Report a collaborator failure before handing it back
    fn guard<T>(&mut self, result: MetronomeResult<T>) -> MetronomeResult<T> {
        if let Err(err) = &result {
            self.publish(PlaybackEvent::Aborted {
                reason: err.to_string(),
            });
        }
        result
    }

    fn publish_all(&mut self, events: Vec<PlaybackEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    fn publish(&mut self, event: PlaybackEvent) {
        if let Some(producer) = self.notifications.as_mut()
            && producer.try_push(Notification::new(event)).is_err()
        {
            log::warn!("Notification channel full, dropping playback event");
        }
    }
}

impl CountInControl for PlaybackCoordinator {
    fn toggle_count_in(&mut self, enabled: bool) {
        self.count_in.set_enabled(enabled);
    }

    fn change_count_in_length(&mut self, bars: u32) {
        self.count_in.set_length(bars);
    }
}

impl PositionControl for PlaybackCoordinator {
    fn change_user_position(&mut self, bar: u32) -> MetronomeResult<()> {
        self.select_bar(bar)
    }
}

impl PlaybackControl for PlaybackCoordinator {
    fn start_playing(&mut self) -> MetronomeResult<()> {
        self.start()
    }

    fn pause_playing(&mut self) -> MetronomeResult<()> {
        self.pause()
    }

    fn rewind(&mut self) -> MetronomeResult<()> {
        self.rewind_position()
    }
}

/// Assembles a `PlaybackCoordinator`
///
/// The click provider, bar highlighter, bar marker and time representation
/// provider are required; the clock defaults to `SystemClock` and
/// notifications are optional.
#[derive(Default)]
pub struct PlaybackBuilder {
    clicks: Option<Box<dyn ClickProvider>>,
    highlighter: Option<Box<dyn BarHighlighter>>,
    marker: Option<Box<dyn BarMarker>>,
    provider: Option<Box<dyn TimeRepresentationProvider>>,
    clock: Option<Box<dyn Clock>>,
    notifications: Option<NotificationProducer>,
    count_in: CountInController,
}

impl PlaybackBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_click_provider(mut self, clicks: impl ClickProvider + 'static) -> Self {
        self.clicks = Some(Box::new(clicks));
        self
    }

    pub fn with_bar_highlighter(mut self, highlighter: impl BarHighlighter + 'static) -> Self {
        self.highlighter = Some(Box::new(highlighter));
        self
    }

    pub fn with_bar_marker(mut self, marker: impl BarMarker + 'static) -> Self {
        self.marker = Some(Box::new(marker));
        self
    }

    pub fn with_time_representation_provider(
        mut self,
        provider: impl TimeRepresentationProvider + 'static,
    ) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn with_notifications(mut self, producer: NotificationProducer) -> Self {
        self.notifications = Some(producer);
        self
    }

    /// Take the initial count-in settings from `config`
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.count_in =
            CountInController::with_settings(config.count_in.enabled, config.count_in.length);
        self
    }

    pub fn build(self) -> MetronomeResult<PlaybackCoordinator> {
        let missing: Vec<&str> = [
            ("click provider", self.clicks.is_none()),
            ("bar highlighter", self.highlighter.is_none()),
            ("bar marker", self.marker.is_none()),
            ("time representation provider", self.provider.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();

        let (Some(clicks), Some(highlighter), Some(marker), Some(provider)) =
            (self.clicks, self.highlighter, self.marker, self.provider)
        else {
            return Err(MetronomeError::Configuration(format!(
                "Playback needs a {}",
                missing.join(", a ")
            )));
        };

        Ok(PlaybackCoordinator {
            provider,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
            count_in: self.count_in,
            position: PositionController::new(highlighter, marker),
            scheduler: PlaybackScheduler::new(clicks),
            notifications: self.notifications,
        })
    }
}

//! End-to-end playback through the coordinator
//!
//! A session is edited, played on a manual clock, paused, rewound and
//! re-selected while a recording front-end captures every click and highlight.

use practice_metronome::playback::ClickType;
use practice_metronome::{
    BarHighlighter, BarMarker, ClickProvider, Clock, CollaboratorError, CollaboratorResult,
    CountInControl, DurationCode, EngineConfig, ManualClock, MetronomeError, PlaybackBuilder,
    PlaybackControl, PlaybackCoordinator, PlaybackEvent, PositionControl, PositionState, Session,
    SessionHandle, Tempo, TimeSignature, create_notification_channel, run_until_idle,
};
use ringbuf::traits::Consumer;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ui {
    High,
    Low,
    Normal(u32),
    CountIn(u32),
    Cancel(u32),
    Mark(u32),
    Unmark(u32),
}

/// Records what a front-end would have shown or played
#[derive(Clone, Default)]
struct FrontEnd {
    log: Rc<RefCell<Vec<Ui>>>,
    clicks_before_failure: Option<usize>,
}

impl FrontEnd {
    fn failing_after(clicks: usize) -> Self {
        Self {
            clicks_before_failure: Some(clicks),
            ..Self::default()
        }
    }

    fn take(&self) -> Vec<Ui> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    fn clicks(&self) -> Vec<Ui> {
        self.log
            .borrow()
            .iter()
            .copied()
            .filter(|ui| matches!(ui, Ui::High | Ui::Low))
            .collect()
    }

    fn push(&self, ui: Ui) -> CollaboratorResult {
        self.log.borrow_mut().push(ui);
        Ok(())
    }

    fn click(&self, ui: Ui) -> CollaboratorResult {
        if self
            .clicks_before_failure
            .is_some_and(|limit| self.clicks().len() >= limit)
        {
            return Err(CollaboratorError::new("audio output lost"));
        }
        self.push(ui)
    }
}

impl ClickProvider for FrontEnd {
    fn play_high(&mut self) -> CollaboratorResult {
        self.click(Ui::High)
    }

    fn play_low(&mut self) -> CollaboratorResult {
        self.click(Ui::Low)
    }
}

impl BarHighlighter for FrontEnd {
    fn highlight_normal(&mut self, bar: u32) -> CollaboratorResult {
        self.push(Ui::Normal(bar))
    }

    fn highlight_count_in(&mut self, bar: u32) -> CollaboratorResult {
        self.push(Ui::CountIn(bar))
    }

    fn cancel_highlight(&mut self, bar: u32) -> CollaboratorResult {
        self.push(Ui::Cancel(bar))
    }
}

impl BarMarker for FrontEnd {
    fn mark_bar(&mut self, bar: u32) -> CollaboratorResult {
        self.push(Ui::Mark(bar))
    }

    fn unmark_bar(&mut self, bar: u32) -> CollaboratorResult {
        self.push(Ui::Unmark(bar))
    }
}

fn session_of(bars: usize) -> SessionHandle {
    let mut session = Session::new();
    session.add_default_bars(bars);
    SessionHandle::new(session)
}

fn coordinator_for(
    session: &SessionHandle,
    front_end: &FrontEnd,
    clock: &ManualClock,
) -> PlaybackCoordinator {
    PlaybackCoordinator::builder()
        .with_click_provider(front_end.clone())
        .with_bar_highlighter(front_end.clone())
        .with_bar_marker(front_end.clone())
        .with_time_representation_provider(session.clone())
        .with_clock(clock.clone())
        .build()
        .unwrap()
}

#[test]
fn test_count_in_then_two_bars() {
    let session = session_of(2);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let start = clock.now();
    let mut coordinator = coordinator_for(&session, &front_end, &clock);

    coordinator.toggle_count_in(true);
    coordinator.change_count_in_length(1);
    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();

    let bar = [Ui::High, Ui::Low, Ui::Low, Ui::Low];
    assert_eq!(front_end.clicks(), [bar; 3].concat());
    assert_eq!(clock.now() - start, Duration::from_secs(6));

    let log = front_end.take();
    assert_eq!(&log[..3], &[Ui::High, Ui::Cancel(1), Ui::CountIn(1)]);
    assert!(log.contains(&Ui::Normal(2)));
    assert_eq!(log.last(), Some(&Ui::Cancel(2)));
    assert_eq!(coordinator.position().state(), PositionState::Starting);
    assert_eq!(coordinator.position().current_play_position(), 1);
}

#[test]
fn test_pause_resumes_from_paused_bar() {
    let session = session_of(3);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let mut coordinator = coordinator_for(&session, &front_end, &clock);

    coordinator.start_playing().unwrap();
    clock.advance_millis(2000);
    coordinator.poll().unwrap();
    assert_eq!(front_end.clicks().len(), 5);

    coordinator.pause_playing().unwrap();
    assert!(!coordinator.is_playing());
    assert_eq!(coordinator.position().state(), PositionState::Paused);
    assert_eq!(coordinator.position().current_play_position(), 2);

    // Nothing fires while paused
    clock.advance_millis(10_000);
    coordinator.poll().unwrap();
    assert_eq!(front_end.clicks().len(), 5);

    front_end.take();
    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();
    let clicks = front_end.clicks();
    assert_eq!(clicks.len(), 8);
    assert_eq!(clicks[0], Ui::High);
    assert_eq!(coordinator.position().state(), PositionState::Starting);
}

#[test]
fn test_user_selection_and_rewinds() {
    let session = session_of(3);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let mut coordinator = coordinator_for(&session, &front_end, &clock);

    coordinator.change_user_position(2).unwrap();
    assert_eq!(
        front_end.take(),
        vec![Ui::Cancel(1), Ui::Mark(2), Ui::Normal(2)]
    );

    coordinator.start_playing().unwrap();
    clock.advance_millis(2000);
    coordinator.poll().unwrap();
    assert_eq!(coordinator.position().current_play_position(), 3);

    coordinator.rewind().unwrap();
    assert!(!coordinator.is_playing());
    assert_eq!(
        coordinator.position().state(),
        PositionState::RewoundToUserPosition
    );
    assert_eq!(coordinator.position().current_play_position(), 2);
    assert_eq!(coordinator.position().user_selected_bar(), Some(2));

    coordinator.rewind().unwrap();
    assert_eq!(coordinator.position().state(), PositionState::RewoundToStart);
    assert_eq!(coordinator.position().current_play_position(), 1);
    assert_eq!(coordinator.position().user_selected_bar(), None);
    assert!(front_end.take().contains(&Ui::Unmark(2)));
}

#[test]
fn test_finishing_returns_to_selected_bar() {
    let session = session_of(3);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let mut coordinator = coordinator_for(&session, &front_end, &clock);

    coordinator.change_user_position(3).unwrap();
    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();

    assert_eq!(front_end.clicks().len(), 4);
    assert_eq!(
        coordinator.position().state(),
        PositionState::RewoundToUserPosition
    );
    assert_eq!(coordinator.position().start_position(), 3);

    // Selecting the same bar again deselects it
    front_end.take();
    coordinator.change_user_position(3).unwrap();
    assert_eq!(coordinator.position().user_selected_bar(), None);
    assert_eq!(
        front_end.take(),
        vec![Ui::Cancel(3), Ui::Unmark(3), Ui::Normal(1)]
    );
}

#[test]
fn test_deleting_selected_bar_restarts_from_bar_one() {
    let session = session_of(4);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let (producer, mut consumer) = create_notification_channel(64);
    let mut coordinator = PlaybackBuilder::new()
        .with_click_provider(front_end.clone())
        .with_bar_highlighter(front_end.clone())
        .with_bar_marker(front_end.clone())
        .with_time_representation_provider(session.clone())
        .with_clock(clock.clone())
        .with_notifications(producer)
        .build()
        .unwrap();

    coordinator.change_user_position(4).unwrap();
    session.edit(|bars| {
        bars.delete_bar(4).unwrap();
        bars.delete_bar(3).unwrap();
    });
    front_end.take();

    coordinator.start_playing().unwrap();
    assert_eq!(coordinator.position().user_selected_bar(), None);
    let log = front_end.take();
    assert_eq!(
        &log[..4],
        &[Ui::Unmark(4), Ui::Cancel(4), Ui::Normal(1), Ui::High]
    );

    run_until_idle(&mut coordinator).unwrap();
    assert_eq!(front_end.clicks().len(), 7);
    assert_eq!(coordinator.position().state(), PositionState::Starting);

    // A second start plays the shortened session normally
    front_end.take();
    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();
    assert_eq!(front_end.clicks().len(), 8);

    let events: Vec<PlaybackEvent> = std::iter::from_fn(|| consumer.try_pop())
        .map(|notification| notification.event)
        .collect();
    assert!(events.contains(&PlaybackEvent::UserPositionChanged { selected: None }));
}

#[test]
fn test_paused_bar_removed_while_paused() {
    let session = session_of(3);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let mut coordinator = coordinator_for(&session, &front_end, &clock);

    coordinator.start_playing().unwrap();
    clock.advance_millis(4000);
    coordinator.poll().unwrap();
    coordinator.pause_playing().unwrap();
    assert_eq!(coordinator.position().current_play_position(), 3);

    session.edit(|bars| bars.delete_bar(3).map(|_| ())).unwrap();
    front_end.take();
    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();
    assert_eq!(front_end.clicks().len(), 8);
}

#[test]
fn test_session_edits_apply_to_next_start() {
    let session = session_of(1);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let mut coordinator = coordinator_for(&session, &front_end, &clock);

    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();
    assert_eq!(front_end.clicks().len(), 4);

    session.edit(|bars| {
        bars.append_bars(
            TimeSignature::new(3, DurationCode::Eighth).unwrap(),
            Tempo::quarter(120.0).unwrap(),
            1,
        )
    });
    assert_eq!(session.revision(), 2);

    front_end.take();
    let start = clock.now();
    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();
    assert_eq!(front_end.clicks().len(), 7);
    assert_eq!(
        clock.now() - start,
        Duration::from_millis(2000 + 750)
    );
}

#[test]
fn test_notifications_follow_playback() {
    let session = session_of(1);
    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let (producer, mut consumer) = create_notification_channel(64);
    let mut coordinator = PlaybackBuilder::new()
        .with_click_provider(front_end.clone())
        .with_bar_highlighter(front_end.clone())
        .with_bar_marker(front_end.clone())
        .with_time_representation_provider(session.clone())
        .with_clock(clock.clone())
        .with_notifications(producer)
        .build()
        .unwrap();

    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();

    let events: Vec<PlaybackEvent> = std::iter::from_fn(|| consumer.try_pop())
        .map(|notification| notification.event)
        .collect();
    assert_eq!(events.len(), 6);
    assert_eq!(
        events[0],
        PlaybackEvent::Started {
            from_bar: 1,
            beat_count: 4
        }
    );
    assert_eq!(
        events[1],
        PlaybackEvent::BeatPlayed {
            index: 0,
            bar: 1,
            click: ClickType::Accent,
            is_count_in: false
        }
    );
    assert_eq!(events[5], PlaybackEvent::Finished { position: 1 });
}

#[test]
fn test_click_failure_aborts_sequence() {
    let session = session_of(2);
    let front_end = FrontEnd::failing_after(3);
    let clock = ManualClock::new();
    let (producer, mut consumer) = create_notification_channel(64);
    let mut coordinator = PlaybackBuilder::new()
        .with_click_provider(front_end.clone())
        .with_bar_highlighter(front_end.clone())
        .with_bar_marker(front_end.clone())
        .with_time_representation_provider(session.clone())
        .with_clock(clock.clone())
        .with_notifications(producer)
        .build()
        .unwrap();

    coordinator.start_playing().unwrap();
    let err = run_until_idle(&mut coordinator).unwrap_err();
    assert!(matches!(err, MetronomeError::Collaborator(_)));
    assert!(!coordinator.is_playing());
    assert_eq!(front_end.clicks().len(), 3);

    let aborted = std::iter::from_fn(|| consumer.try_pop()).any(|n| n.is_error());
    assert!(aborted);
}

#[test]
fn test_builder_reports_missing_collaborators() {
    let err = PlaybackCoordinator::builder()
        .with_time_representation_provider(session_of(1))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, MetronomeError::Configuration(_)));
    let message = err.to_string();
    for name in ["click provider", "bar highlighter", "bar marker"] {
        assert!(message.contains(name), "{message}");
    }
}

#[test]
fn test_config_drives_count_in_and_bar_defaults() {
    let config = EngineConfig::from_ron_str(
        "(count_in: (enabled: true, length: 2), default_tempo: (per_minute: 60.0, denominator: 4))",
    )
    .unwrap();
    let mut session = Session::from_config(&config);
    session.add_default_bars(1);
    let session = SessionHandle::new(session);

    let front_end = FrontEnd::default();
    let clock = ManualClock::new();
    let start = clock.now();
    let mut coordinator = PlaybackBuilder::new()
        .with_click_provider(front_end.clone())
        .with_bar_highlighter(front_end.clone())
        .with_bar_marker(front_end.clone())
        .with_time_representation_provider(session)
        .with_clock(clock.clone())
        .with_config(&config)
        .build()
        .unwrap();

    coordinator.start_playing().unwrap();
    run_until_idle(&mut coordinator).unwrap();
    assert_eq!(front_end.clicks().len(), 12);
    assert_eq!(clock.now() - start, Duration::from_secs(12));
}

use practice_metronome::{
    BarHighlighter, BarMarker, ClickProvider, CollaboratorResult, DurationCode, EngineConfig,
    MetronomeError, MetronomeResult, PlaybackControl, PlaybackCoordinator, Session, SessionHandle,
    Tempo, TimeSignature, create_notification_channel, run_until_idle_draining,
};
use std::path::Path;

/// Prints clicks instead of sounding them
struct ConsoleClicks;

impl ClickProvider for ConsoleClicks {
    fn play_high(&mut self) -> CollaboratorResult {
        println!("  TICK");
        Ok(())
    }

    fn play_low(&mut self) -> CollaboratorResult {
        println!("  tock");
        Ok(())
    }
}

/// Logs bar highlighting and marking
struct ConsoleBars;

impl BarHighlighter for ConsoleBars {
    fn highlight_normal(&mut self, bar: u32) -> CollaboratorResult {
        println!("[bar {}]", bar);
        Ok(())
    }

    fn highlight_count_in(&mut self, bar: u32) -> CollaboratorResult {
        println!("[count-in before bar {}]", bar);
        Ok(())
    }

    fn cancel_highlight(&mut self, bar: u32) -> CollaboratorResult {
        log::debug!("Highlight cleared on bar {}", bar);
        Ok(())
    }
}

impl BarMarker for ConsoleBars {
    fn mark_bar(&mut self, bar: u32) -> CollaboratorResult {
        log::info!("Bar {} marked", bar);
        Ok(())
    }

    fn unmark_bar(&mut self, bar: u32) -> CollaboratorResult {
        log::info!("Bar {} unmarked", bar);
        Ok(())
    }
}

fn load_config() -> EngineConfig {
    match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path)).unwrap_or_else(|e| {
            log::warn!("Could not load {}: {}, using defaults", path, e);
            EngineConfig::default()
        }),
        None => EngineConfig::load_or_default(),
    }
}

fn run(config: &EngineConfig) -> MetronomeResult<()> {
    let session = SessionHandle::new(Session::from_config(config));
    session.with_session(|session| session.add_default_bars(2));
    session.edit(|bars| {
        bars.append_bars(
            TimeSignature::new(3, DurationCode::Eighth)?,
            Tempo::quarter(120.0)?,
            1,
        );
        Ok::<(), MetronomeError>(())
    })?;

    let (producer, mut consumer) =
        create_notification_channel(config.notification_capacity.max(1));
    let mut coordinator = PlaybackCoordinator::builder()
        .with_click_provider(ConsoleClicks)
        .with_bar_highlighter(ConsoleBars)
        .with_bar_marker(ConsoleBars)
        .with_time_representation_provider(session.clone())
        .with_notifications(producer)
        .with_config(config)
        .build()?;

    coordinator.start_playing()?;
    run_until_idle_draining(&mut coordinator, &mut consumer, |notification| {
        log::debug!("{:?}", notification.event);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Practice Metronome ===");
    let config = load_config();
    if let Err(e) = run(&config) {
        log::error!("Playback failed: {}", e);
        std::process::exit(1);
    }
}

// Practice Metronome - Library exports for the binary, tests and benchmarks

pub mod config;
pub mod error;
pub mod messaging;
pub mod playback;
pub mod sequencer;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{CountInSettings, EngineConfig};
pub use error::{CollaboratorError, CollaboratorResult, MetronomeError, MetronomeResult};
pub use messaging::{Notification, PlaybackEvent, create_notification_channel};
pub use playback::{
    BarHighlighter, BarMarker, ClickProvider, Clock, CountInControl, ManualClock, PlaybackBuilder,
    PlaybackControl, PlaybackCoordinator, PositionControl, PositionState, SystemClock,
    TimeRepresentationProvider, run_until_idle, run_until_idle_draining,
};
pub use sequencer::{
    Bar, BarSequence, BeatSequenceBuilder, BeatSequenceTimeRepresentation, BeatTimeRepresentation,
    DurationCode, SimpleBeatSequenceBuilder, Tempo, TimeSignature,
};
pub use session::{Session, SessionHandle};

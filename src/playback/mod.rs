// Playback module
// Count-in, playback position state machine, beat scheduling and the
// coordinator facade the UI layer talks to.

pub mod clock;
pub mod coordinator;
pub mod count_in;
pub mod driver;
pub mod interfaces;
pub mod position;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use coordinator::{PlaybackBuilder, PlaybackCoordinator};
pub use count_in::CountInController;
pub use driver::{run_until_idle, run_until_idle_draining};
pub use interfaces::{
    BarHighlighter, BarMarker, ClickProvider, CountInControl, PlaybackControl, PositionControl,
    TimeRepresentationProvider,
};
pub use position::{PositionController, PositionState};
pub use scheduler::{CancelHandle, ClickType, PlaybackScheduler};

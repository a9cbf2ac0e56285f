// Playback notifications - what the engine did, for the UI to display

use crate::playback::position::PositionState;
use crate::playback::scheduler::ClickType;
use std::time::{SystemTime, UNIX_EPOCH};

/// Something the playback engine did
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// A playable sequence was handed to the scheduler
    Started { from_bar: u32, beat_count: usize },
    /// Click and highlight for one beat completed
    BeatPlayed {
        index: usize,
        bar: u32,
        click: ClickType,
        is_count_in: bool,
    },
    Paused { bar: u32 },
    /// The final beat has elapsed; `position` is where the next start begins
    Finished { position: u32 },
    Rewound { position: u32, state: PositionState },
    UserPositionChanged { selected: Option<u32> },
    /// A collaborator failed and the in-flight sequence was dropped
    Aborted { reason: String },
}

/// Event with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub event: PlaybackEvent,
    pub timestamp: u64, // Unix timestamp in milliseconds
}

impl Notification {
    /// Creates a new notification with the current timestamp
    pub fn new(event: PlaybackEvent) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Self { event, timestamp }
    }

    /// True when this notification is younger than `max_age_ms`
    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        now.saturating_sub(self.timestamp) < max_age_ms
    }

    pub fn is_error(&self) -> bool {
        matches!(self.event, PlaybackEvent::Aborted { .. })
    }
}

// Sequencer module
// Bars, musical value types, and the bar -> timed beat conversion

pub mod bar_sequence;
pub mod beat_sequence;
pub mod builder;
pub mod duration;
pub mod timeline;

pub use bar_sequence::BarSequence;
pub use beat_sequence::{BeatSequenceTimeRepresentation, BeatTimeRepresentation};
pub use builder::{BeatSequenceBuilder, SimpleBeatSequenceBuilder};
pub use duration::DurationCode;
pub use timeline::{Bar, Tempo, TimeSignature};

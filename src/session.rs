// Session - the bar sequence being practised and how it is unrolled into beats
//
// The editing layer changes bars through `SessionHandle::edit`; the playback
// layer reads a fresh beat sequence through `TimeRepresentationProvider`.

use crate::config::EngineConfig;
use crate::playback::TimeRepresentationProvider;
use crate::sequencer::{
    BarSequence, BeatSequenceBuilder, BeatSequenceTimeRepresentation, SimpleBeatSequenceBuilder,
    Tempo, TimeSignature,
};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Session {
    bars: BarSequence,
    builder: Box<dyn BeatSequenceBuilder>,
    default_time_signature: TimeSignature,
    default_tempo: Tempo,
    /// Bumped on every edit
    revision: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::with_builder(SimpleBeatSequenceBuilder)
    }

    pub fn with_builder(builder: impl BeatSequenceBuilder + 'static) -> Self {
        Self {
            bars: BarSequence::new(),
            builder: Box::new(builder),
            default_time_signature: TimeSignature::default(),
            default_tempo: Tempo::default(),
            revision: 0,
        }
    }

    /// Empty session whose new bars use the configured time signature and tempo
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut session = Self::new();
        session.default_time_signature = config.default_time_signature;
        session.default_tempo = config.default_tempo;
        session
    }

    pub fn bars(&self) -> &BarSequence {
        &self.bars
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append `count` bars with the session defaults
    pub fn add_default_bars(&mut self, count: usize) {
        let (time_signature, tempo) = (self.default_time_signature, self.default_tempo);
        self.edit(|bars| bars.append_bars(time_signature, tempo, count));
    }

    pub fn edit<R>(&mut self, f: impl FnOnce(&mut BarSequence) -> R) -> R {
        let result = f(&mut self.bars);
        self.revision += 1;
        log::debug!(
            "Session edited (revision {}, {} bars)",
            self.revision,
            self.bars.bar_count()
        );
        result
    }

    pub fn set_builder(&mut self, builder: impl BeatSequenceBuilder + 'static) {
        self.builder = Box::new(builder);
        self.revision += 1;
    }

    pub fn time_representation(&self) -> BeatSequenceTimeRepresentation {
        self.bars.time_representation(self.builder.as_ref())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a `Session`
///
/// Clones refer to the same session, so the editor can keep one while the
/// playback coordinator owns another.
#[derive(Clone, Default)]
pub struct SessionHandle(Rc<RefCell<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Rc::new(RefCell::new(session)))
    }

    pub fn edit<R>(&self, f: impl FnOnce(&mut BarSequence) -> R) -> R {
        self.0.borrow_mut().edit(f)
    }

    pub fn read<R>(&self, f: impl FnOnce(&BarSequence) -> R) -> R {
        f(self.0.borrow().bars())
    }

    /// Mutable access to the whole session (builder, defaults)
    pub fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn revision(&self) -> u64 {
        self.0.borrow().revision()
    }
}

impl TimeRepresentationProvider for SessionHandle {
    fn time_representation(&self) -> BeatSequenceTimeRepresentation {
        self.0.borrow().time_representation()
    }
}

// Recording collaborators for unit tests

use super::interfaces::{BarHighlighter, BarMarker, ClickProvider};
use crate::error::{CollaboratorError, CollaboratorResult};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    High,
    Low,
    Normal(u32),
    CountIn(u32),
    Cancel(u32),
    Mark(u32),
    Unmark(u32),
}

/// Click provider, highlighter and marker in one, logging every call in order
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    fail_clicks_after: Option<usize>,
    fail_highlights: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicks succeed `count` times, then fail
    pub fn failing_clicks_after(count: usize) -> Self {
        Self {
            fail_clicks_after: Some(count),
            ..Self::default()
        }
    }

    pub fn failing_highlights() -> Self {
        Self {
            fail_highlights: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn clicks(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .copied()
            .filter(|call| matches!(call, Call::High | Call::Low))
            .collect()
    }

    fn click(&mut self, call: Call) -> CollaboratorResult {
        let played = self.clicks().len();
        if self.fail_clicks_after.is_some_and(|limit| played >= limit) {
            return Err(CollaboratorError::new("click device unavailable"));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }

    fn highlight(&mut self, call: Call) -> CollaboratorResult {
        if self.fail_highlights {
            return Err(CollaboratorError::new("renderer detached"));
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl ClickProvider for Recorder {
    fn play_high(&mut self) -> CollaboratorResult {
        self.click(Call::High)
    }

    fn play_low(&mut self) -> CollaboratorResult {
        self.click(Call::Low)
    }
}

impl BarHighlighter for Recorder {
    fn highlight_normal(&mut self, bar: u32) -> CollaboratorResult {
        self.highlight(Call::Normal(bar))
    }

    fn highlight_count_in(&mut self, bar: u32) -> CollaboratorResult {
        self.highlight(Call::CountIn(bar))
    }

    fn cancel_highlight(&mut self, bar: u32) -> CollaboratorResult {
        self.highlight(Call::Cancel(bar))
    }
}

impl BarMarker for Recorder {
    fn mark_bar(&mut self, bar: u32) -> CollaboratorResult {
        self.calls.borrow_mut().push(Call::Mark(bar));
        Ok(())
    }

    fn unmark_bar(&mut self, bar: u32) -> CollaboratorResult {
        self.calls.borrow_mut().push(Call::Unmark(bar));
        Ok(())
    }
}

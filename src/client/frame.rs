//! Single-slot frame scheduling
//!
//! At most one visual update waits for the next display frame. Scheduling a
//! new one replaces whatever was pending, so rapid input never queues stale
//! frames.

#[derive(Debug)]
pub struct FrameSlot<T> {
    pending: Option<T>,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `value` for the next frame. Returns true if it superseded one.
    pub fn schedule(&mut self, value: T) -> bool {
        self.pending.replace(value).is_some()
    }

    /// Called when the frame fires
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

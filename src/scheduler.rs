//! Fixed-timestep frame scheduling with cancellable frame requests.
//!
//! The host feeds wall-clock time in with [`FrameScheduler::advance`]; each
//! time a full frame interval has accumulated and a request is pending, that
//! request becomes due. The frame callback is expected to request the next
//! frame itself, so cancelling the outstanding request stops the loop.

use std::time::Duration;

/// Handle for one requested frame; pass it back to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(u64);

#[derive(Debug)]
pub struct FrameScheduler {
    frame_dt: f32,
    max_backlog: u32,
    accumulator: f32,
    pending: Option<FrameRequest>,
    next_id: u64,
}

impl FrameScheduler {
    pub fn new(fps: f32) -> Self {
        Self {
            frame_dt: 1.0 / fps.max(1.0),
            max_backlog: 3,
            accumulator: 0.0,
            pending: None,
            next_id: 0,
        }
    }

    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    /// Requests a frame. Only one request is outstanding at a time; asking
    /// again returns the existing handle.
    pub fn request(&mut self) -> FrameRequest {
        if let Some(pending) = self.pending {
            return pending;
        }
        let request = FrameRequest(self.next_id);
        self.next_id += 1;
        self.pending = Some(request);
        request
    }

    /// Returns true if `request` was still pending.
    pub fn cancel(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Adds elapsed wall-clock time. A stalled host catches up at most
    /// `max_backlog` frames.
    pub fn advance(&mut self, elapsed: Duration) {
        self.accumulator += elapsed.as_secs_f32();
        let cap = self.frame_dt * self.max_backlog as f32;
        if self.accumulator > cap {
            self.accumulator = cap;
        }
    }

    /// Hands out the pending request if a frame interval has accumulated.
    pub fn take_due(&mut self) -> Option<FrameRequest> {
        if self.accumulator < self.frame_dt {
            return None;
        }
        let request = self.pending.take()?;
        self.accumulator -= self.frame_dt;
        Some(request)
    }
}

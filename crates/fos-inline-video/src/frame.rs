//! Frame Scheduling
//!
//! Display-refresh callbacks and the wall clock, as seen by the playback loop.

use std::collections::VecDeque;
use std::time::Instant;

/// Pending animation-frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host capabilities the playback loop needs.
///
/// A request is one-shot: the host calls back once, on the next display
/// refresh, unless the handle is cancelled first.
pub trait FrameHost {
    fn request_animation_frame(&mut self) -> FrameHandle;
    /// Cancelling an unknown or already-fired handle does nothing
    fn cancel_animation_frame(&mut self, handle: FrameHandle);
    /// Wall-clock time in milliseconds
    fn now_ms(&self) -> f64;
}

#[derive(Debug)]
enum Clock {
    Manual(f64),
    System(Instant),
}

/// Frame statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub frame_count: u64,
    pub requested: u64,
    pub cancelled: u64,
}

/// Frame host driven explicitly by its owner.
///
/// Requests queue up until [`take_due_frames`](Self::take_due_frames) is
/// called, which stands in for a display refresh.
#[derive(Debug)]
pub struct ManualFrameHost {
    clock: Clock,
    pending: VecDeque<FrameHandle>,
    next_handle: u64,
    stats: FrameStats,
}

impl Default for ManualFrameHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualFrameHost {
    /// Host with a manual clock starting at 0
    pub fn new() -> Self {
        Self::with_clock(Clock::Manual(0.0))
    }

    /// Host reading the system monotonic clock
    pub fn system() -> Self {
        Self::with_clock(Clock::System(Instant::now()))
    }

    fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            pending: VecDeque::new(),
            next_handle: 1,
            stats: FrameStats::default(),
        }
    }

    /// Move a manual clock forward. No effect on a system clock.
    pub fn advance(&mut self, ms: f64) {
        if let Clock::Manual(now) = &mut self.clock {
            *now += ms;
        }
    }

    /// Drain requests for this refresh
    pub fn take_due_frames(&mut self) -> Vec<FrameHandle> {
        let due: Vec<_> = self.pending.drain(..).collect();
        self.stats.frame_count += due.len() as u64;
        due
    }

    /// Requests waiting for the next refresh
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

impl FrameHost for ManualFrameHost {
    fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push_back(handle);
        self.stats.requested += 1;
        handle
    }

    fn cancel_animation_frame(&mut self, handle: FrameHandle) {
        if let Some(pos) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(pos);
            self.stats.cancelled += 1;
        }
    }

    fn now_ms(&self) -> f64 {
        match &self.clock {
            Clock::Manual(now) => *now,
            Clock::System(start) => start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

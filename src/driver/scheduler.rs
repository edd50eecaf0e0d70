//! Frame scheduling
//!
//! The loop never calls itself directly: each frame asks a [`FrameScheduler`]
//! for the next one. In the browser that is `requestAnimationFrame`; in tests
//! and headless runs it is a [`ManualScheduler`] stepped by hand.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Work to run on a future frame
pub type FrameCallback = Box<dyn FnOnce()>;

/// Source of animation frames
pub trait FrameScheduler {
    /// Queue `frame` to run once on the next refresh
    fn schedule(&self, frame: FrameCallback) -> CancelHandle;
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Rc<T> {
    fn schedule(&self, frame: FrameCallback) -> CancelHandle {
        (**self).schedule(frame)
    }
}

/// Shared flag that prevents a scheduled frame from running
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Scheduler driven explicitly by the caller
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<VecDeque<(FrameCallback, CancelHandle)>>,
    frames_run: Cell<u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames queued and not cancelled
    pub fn pending(&self) -> usize {
        self.queue
            .borrow()
            .iter()
            .filter(|(_, handle)| !handle.is_cancelled())
            .count()
    }

    /// Total callbacks run so far
    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }

    /// Run every frame queued before this call.
    ///
    /// Frames scheduled while running wait for the next call, like a real
    /// refresh. Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let due: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        let mut ran = 0;
        for (frame, handle) in due {
            if handle.is_cancelled() {
                continue;
            }
            frame();
            ran += 1;
        }
        self.frames_run.set(self.frames_run.get() + ran as u64);
        ran
    }

    /// Step `n` refreshes; stops early once nothing is queued
    pub fn run_frames(&self, n: usize) -> usize {
        let mut ran = 0;
        for _ in 0..n {
            if self.pending() == 0 {
                break;
            }
            ran += self.run_frame();
        }
        ran
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&self, frame: FrameCallback) -> CancelHandle {
        let handle = CancelHandle::new();
        self.queue.borrow_mut().push_back((frame, handle.clone()));
        handle
    }
}

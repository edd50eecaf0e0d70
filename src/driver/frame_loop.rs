//! Start/stop control over the repeating frame callback

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::scheduler::{CancelHandle, FrameScheduler};
use super::{FrameDriver, Host};
use crate::surface::DrawSurface;

struct LoopInner<S, H, Q> {
    driver: RefCell<FrameDriver<S>>,
    host: Rc<RefCell<H>>,
    scheduler: Q,
    pending: RefCell<Option<CancelHandle>>,
    started: Cell<bool>,
    stopped: Cell<bool>,
}

/// A frame driver bound to a host and a scheduler.
///
/// `start` draws the first frame immediately; each frame then schedules the
/// next one. The loop runs until `stop` is called or the loop is dropped.
pub struct FrameLoop<S, H, Q>
where
    S: DrawSurface + 'static,
    H: Host + 'static,
    Q: FrameScheduler + 'static,
{
    inner: Rc<LoopInner<S, H, Q>>,
}

impl<S, H, Q> FrameLoop<S, H, Q>
where
    S: DrawSurface + 'static,
    H: Host + 'static,
    Q: FrameScheduler + 'static,
{
    pub fn new(driver: FrameDriver<S>, host: Rc<RefCell<H>>, scheduler: Q) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                driver: RefCell::new(driver),
                host,
                scheduler,
                pending: RefCell::new(None),
                started: Cell::new(false),
                stopped: Cell::new(false),
            }),
        }
    }

    /// Mount: activate the driver and draw the first frame.
    ///
    /// Has no effect if the loop was already started or has been stopped.
    pub fn start(&self) {
        if self.inner.stopped.get() {
            log::warn!("Frame loop already stopped, not restarting");
            return;
        }
        if self.inner.started.replace(true) {
            return;
        }
        self.inner.driver.borrow_mut().activate();
        log::info!(
            "Frame loop started ({} particles)",
            self.inner.driver.borrow().particles().len()
        );
        run_frame(Rc::clone(&self.inner));
    }

    /// Unmount: cancel the pending frame and never schedule another
    pub fn stop(&self) {
        if self.inner.stopped.replace(true) {
            return;
        }
        if let Some(handle) = self.inner.pending.borrow_mut().take() {
            handle.cancel();
        }
        let driver = self.inner.driver.borrow();
        log::info!(
            "Frame loop stopped after {} frames ({} skipped)",
            driver.frames_drawn(),
            driver.frames_skipped()
        );
    }

    pub fn is_running(&self) -> bool {
        !self.inner.stopped.get()
            && self
                .inner
                .pending
                .borrow()
                .as_ref()
                .is_some_and(|handle| !handle.is_cancelled())
    }

    /// Access the driver between frames (attach a surface, inspect state)
    pub fn with_driver<R>(&self, f: impl FnOnce(&mut FrameDriver<S>) -> R) -> R {
        f(&mut self.inner.driver.borrow_mut())
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.inner.host
    }
}

impl<S, H, Q> Drop for FrameLoop<S, H, Q>
where
    S: DrawSurface + 'static,
    H: Host + 'static,
    Q: FrameScheduler + 'static,
{
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_frame<S, H, Q>(inner: Rc<LoopInner<S, H, Q>>)
where
    S: DrawSurface + 'static,
    H: Host + 'static,
    Q: FrameScheduler + 'static,
{
    inner.pending.borrow_mut().take();
    if inner.stopped.get() {
        return;
    }

    let arena = inner.host.borrow().arena();
    // Copied out so the host gets a snapshot and may touch the driver. The
    // host itself stays borrowed for the call.
    let updates = inner.driver.borrow_mut().draw(&arena).map(<[_]>::to_vec);
    if let Some(updates) = updates {
        inner.host.borrow_mut().on_update(&updates);
    }

    if inner.stopped.get() {
        return;
    }
    // Weak so a queued frame never keeps a dropped loop alive
    let next = Rc::downgrade(&inner);
    let handle = inner.scheduler.schedule(Box::new(move || {
        if let Some(inner) = Weak::upgrade(&next) {
            run_frame(inner);
        }
    }));
    if handle.is_cancelled() {
        log::warn!("Next frame could not be scheduled, loop halted");
    }
    inner.pending.replace(Some(handle));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ManualScheduler;
    use crate::renderer::QuadBatch;
    use crate::settings::DriverSettings;
    use crate::sim::{BoundingBox, ParticleDef, ParticleUpdate};

    struct RecordingHost {
        arena: BoundingBox,
        batches: Vec<Vec<ParticleUpdate>>,
    }

    impl RecordingHost {
        fn new(arena: BoundingBox) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                arena,
                batches: Vec::new(),
            }))
        }
    }

    impl Host for RecordingHost {
        fn arena(&self) -> BoundingBox {
            self.arena
        }

        fn on_update(&mut self, updates: &[ParticleUpdate]) {
            self.batches.push(updates.to_vec());
        }
    }

    type TestLoop = FrameLoop<QuadBatch, RecordingHost, Rc<ManualScheduler>>;

    fn build(speed: f32, arena: BoundingBox) -> (TestLoop, Rc<RefCell<RecordingHost>>, Rc<ManualScheduler>) {
        let particles = vec![ParticleDef::new(10.0, 10.0, [0.0, 0.0], speed, 5.0)];
        let driver = FrameDriver::new(particles, DriverSettings::default()).with_surface(QuadBatch::new(320, 240));
        let host = RecordingHost::new(arena);
        let scheduler = Rc::new(ManualScheduler::new());
        let frame_loop = FrameLoop::new(driver, Rc::clone(&host), Rc::clone(&scheduler));
        (frame_loop, host, scheduler)
    }

    #[test]
    fn test_start_draws_immediately_and_schedules_next() {
        let (frame_loop, host, scheduler) = build(10.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();
        assert_eq!(host.borrow().batches.len(), 1);
        assert_eq!(scheduler.pending(), 1);
        assert!(frame_loop.is_running());

        scheduler.run_frames(3);
        let host = host.borrow();
        assert_eq!(host.batches.len(), 4);
        assert_eq!(host.batches[3][0].bounding_box, BoundingBox::new(40.0, 40.0, 50.0, 50.0));
    }

    #[test]
    fn test_nothing_happens_before_start() {
        let (_frame_loop, host, scheduler) = build(10.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(scheduler.pending(), 0);
        assert!(host.borrow().batches.is_empty());
    }

    #[test]
    fn test_second_start_is_ignored() {
        let (frame_loop, host, scheduler) = build(10.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();
        frame_loop.start();
        assert_eq!(host.borrow().batches.len(), 1);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let (frame_loop, host, scheduler) = build(10.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();
        scheduler.run_frame();
        frame_loop.stop();
        assert!(!frame_loop.is_running());
        assert_eq!(scheduler.run_frames(5), 0);
        assert_eq!(host.borrow().batches.len(), 2);

        // Stopped loops stay stopped
        frame_loop.start();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_drop_stops_loop() {
        let (frame_loop, host, scheduler) = build(1.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();
        drop(frame_loop);
        assert_eq!(scheduler.run_frames(3), 0);
        assert_eq!(host.borrow().batches.len(), 1);
    }

    #[test]
    fn test_arena_read_fresh_each_frame() {
        let (frame_loop, host, scheduler) = build(0.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();
        host.borrow_mut().arena = BoundingBox::new(50.0, 50.0, 150.0, 150.0);
        scheduler.run_frame();

        let host = host.borrow();
        assert_eq!(host.batches[0][0].bounding_box, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(host.batches[1][0].bounding_box, BoundingBox::new(50.0, 50.0, 60.0, 60.0));
        frame_loop.with_driver(|d| assert_eq!(d.positions()[0], BoundingBox::new(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_missing_surface_skips_publish_and_keeps_looping() {
        let (frame_loop, host, scheduler) = build(10.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();

        let surface = frame_loop.with_driver(|d| d.detach_surface()).unwrap();
        scheduler.run_frame();
        assert_eq!(host.borrow().batches.len(), 1);
        assert_eq!(scheduler.pending(), 1);

        frame_loop.with_driver(|d| d.attach_surface(surface));
        scheduler.run_frame();
        let host = host.borrow();
        assert_eq!(host.batches.len(), 2);
        assert_eq!(host.batches[1][0].bounding_box, BoundingBox::new(20.0, 20.0, 30.0, 30.0));
    }

    #[test]
    fn test_start_with_preactivated_driver_still_runs() {
        let particles = vec![ParticleDef::new(10.0, 10.0, [0.0, 0.0], 10.0, 5.0)];
        let mut driver = FrameDriver::new(particles, DriverSettings::default()).with_surface(QuadBatch::new(100, 100));
        driver.activate();
        let host = RecordingHost::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        let scheduler = Rc::new(ManualScheduler::new());
        let frame_loop = FrameLoop::new(driver, Rc::clone(&host), Rc::clone(&scheduler));

        frame_loop.start();
        assert!(frame_loop.is_running());
        scheduler.run_frames(2);
        assert_eq!(host.borrow().batches.len(), 3);
    }

    #[test]
    fn test_unschedulable_frame_reports_not_running() {
        struct NoFrames;

        impl FrameScheduler for NoFrames {
            fn schedule(&self, _frame: crate::driver::FrameCallback) -> CancelHandle {
                let handle = CancelHandle::new();
                handle.cancel();
                handle
            }
        }

        let particles = vec![ParticleDef::new(10.0, 10.0, [0.0, 0.0], 1.0, 1.0)];
        let driver = FrameDriver::new(particles, DriverSettings::default()).with_surface(QuadBatch::new(100, 100));
        let host = RecordingHost::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        let frame_loop = FrameLoop::new(driver, Rc::clone(&host), NoFrames);

        frame_loop.start();
        assert_eq!(host.borrow().batches.len(), 1);
        assert!(!frame_loop.is_running());
    }

    #[test]
    fn test_dropped_loop_releases_state_despite_queued_frame() {
        let (frame_loop, host, scheduler) = build(1.0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        frame_loop.start();
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(Rc::strong_count(&host), 2);

        drop(frame_loop);
        // The cancelled frame is still queued but holds no reference
        assert_eq!(Rc::strong_count(&host), 1);
        assert_eq!(scheduler.run_frame(), 0);
    }

    #[test]
    fn test_host_can_move_arena_from_update() {
        use crate::driver::SharedArena;

        struct Remeasure {
            arena: SharedArena,
            resizer: SharedArena,
            seen: Vec<BoundingBox>,
        }

        impl Host for Remeasure {
            fn arena(&self) -> BoundingBox {
                self.arena.get()
            }

            fn on_update(&mut self, updates: &[ParticleUpdate]) {
                self.seen.push(updates[0].bounding_box);
                let a = self.resizer.get();
                self.resizer.set(BoundingBox::new(a.x1 + 10.0, a.y1, a.x2 + 10.0, a.y2));
            }
        }

        let arena = SharedArena::new(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        let particles = vec![ParticleDef::new(10.0, 10.0, [0.0, 0.0], 0.0, 1.0)];
        let driver = FrameDriver::new(particles, DriverSettings::default()).with_surface(QuadBatch::new(200, 200));
        let host = Rc::new(RefCell::new(Remeasure {
            arena: arena.clone(),
            resizer: arena.clone(),
            seen: Vec::new(),
        }));
        let scheduler = Rc::new(ManualScheduler::new());
        let frame_loop = FrameLoop::new(driver, Rc::clone(&host), Rc::clone(&scheduler));

        frame_loop.start();
        scheduler.run_frames(2);
        let host = host.borrow();
        let seen = &host.seen;
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].x1, 0.0);
        assert_eq!(seen[1].x1, 10.0);
        assert_eq!(seen[2].x1, 20.0);
        assert_eq!(arena.get(), BoundingBox::new(30.0, 0.0, 130.0, 100.0));
    }

    #[test]
    fn test_host_can_stop_from_update() {
        struct StopAfter {
            remaining: u32,
            frame_loop: Option<Rc<StopLoop>>,
        }

        type StopLoop = FrameLoop<QuadBatch, StopAfter, Rc<ManualScheduler>>;

        impl Host for StopAfter {
            fn arena(&self) -> BoundingBox {
                BoundingBox::new(0.0, 0.0, 100.0, 100.0)
            }

            fn on_update(&mut self, _updates: &[ParticleUpdate]) {
                self.remaining -= 1;
                if self.remaining == 0 {
                    if let Some(frame_loop) = self.frame_loop.take() {
                        frame_loop.stop();
                    }
                }
            }
        }

        let particles = vec![ParticleDef::new(10.0, 10.0, [0.0, 0.0], 1.0, 1.0)];
        let driver = FrameDriver::new(particles, DriverSettings::default()).with_surface(QuadBatch::new(100, 100));
        let host = Rc::new(RefCell::new(StopAfter {
            remaining: 3,
            frame_loop: None,
        }));
        let scheduler = Rc::new(ManualScheduler::new());
        let frame_loop = Rc::new(FrameLoop::new(driver, Rc::clone(&host), Rc::clone(&scheduler)));
        host.borrow_mut().frame_loop = Some(Rc::clone(&frame_loop));

        frame_loop.start();
        scheduler.run_frames(10);
        assert_eq!(host.borrow().remaining, 0);
        assert_eq!(frame_loop.with_driver(|d| d.frames_drawn()), 3);
        assert!(!frame_loop.is_running());
    }
}

//! Dodging Particles entry point
//!
//! Native: runs an encounter headless for a fixed number of frames and logs
//! what the host would receive. The browser build is driven from JS through
//! the library's `web` bindings.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use dodging_particles::driver::{FrameDriver, FrameLoop, Host, ManualScheduler};
    use dodging_particles::renderer::QuadBatch;
    use dodging_particles::sim::{BoundingBox, ParticleUpdate};
    use dodging_particles::{DriverSettings, Encounter, LoadError};

    /// Seed and size of the volley used when no encounter file is given
    const DEMO_SEED: u64 = 0x00d0_d9e5;
    const DEMO_HAZARDS: usize = 12;
    const DEMO_ARENA: BoundingBox = BoundingBox::new(240.0, 180.0, 560.0, 420.0);

    /// Stand-in for the battle screen: a fixed player box in the middle of
    /// the arena and a tally of what the driver reported
    struct DemoHost {
        arena: BoundingBox,
        player: BoundingBox,
        frames: u64,
        overlapping: u64,
        last: Vec<ParticleUpdate>,
    }

    impl DemoHost {
        fn new(arena: BoundingBox) -> Self {
            let centre = arena.origin() + arena.size() / 2.0;
            let half = glam::Vec2::splat(8.0);
            Self {
                arena,
                player: BoundingBox::from_origin_size(centre - half, half * 2.0),
                frames: 0,
                overlapping: 0,
                last: Vec::new(),
            }
        }
    }

    impl Host for DemoHost {
        fn arena(&self) -> BoundingBox {
            self.arena
        }

        fn on_update(&mut self, updates: &[ParticleUpdate]) {
            self.frames += 1;
            self.overlapping += updates
                .iter()
                .filter(|u| u.bounding_box.intersects(&self.player))
                .count() as u64;
            self.last = updates.to_vec();
        }
    }

    pub fn run() -> Result<(), LoadError> {
        let mut args = std::env::args().skip(1);
        let encounter = match args.next() {
            Some(path) => Encounter::load_from(path)?,
            None => {
                log::info!("No encounter file given, generating seed {:#x}", DEMO_SEED);
                Encounter::generate(DEMO_SEED, DEMO_ARENA, DEMO_HAZARDS)
            }
        };
        let settings = match args.next() {
            Some(path) => DriverSettings::load_from(path)?,
            None => DriverSettings::default(),
        };
        let max_frames = settings.max_frames;

        let (w, h) = (
            dodging_particles::consts::DEFAULT_SURFACE_WIDTH,
            dodging_particles::consts::DEFAULT_SURFACE_HEIGHT,
        );
        let driver = FrameDriver::new(encounter.particles, settings).with_surface(QuadBatch::new(w, h));
        let host = Rc::new(RefCell::new(DemoHost::new(encounter.bounding_box)));
        let scheduler = Rc::new(ManualScheduler::new());
        let frame_loop = FrameLoop::new(driver, Rc::clone(&host), Rc::clone(&scheduler));

        frame_loop.start();
        scheduler.run_frames(max_frames.saturating_sub(1) as usize);
        frame_loop.stop();

        let host = host.borrow();
        log::info!(
            "{} frames, {} hazard overlaps with the player box",
            host.frames,
            host.overlapping
        );
        for (i, update) in host.last.iter().enumerate() {
            let [x1, y1, x2, y2]: [f32; 4] = update.bounding_box.into();
            log::info!(
                "  #{:<2} [{:7.1} {:7.1} {:7.1} {:7.1}] damage {}",
                i,
                x1,
                y1,
                x2,
                y2,
                update.damage
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dodging Particles (native, headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::init`, this is just to satisfy the compiler
}

//! Neon Core headless runner
//!
//! Plays a run with the autopilot steering the ship, without a window.
//! Useful for soak tests and balance checks.
//!
//! ```bash
//! # Paced at 60 Hz until game over
//! cargo run --release
//!
//! # As fast as possible, 10 minutes of game time
//! cargo run --release -- --fast --frames 36000
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::thread;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use clap::Parser;

    use neon_core::consts::{FIELD_HEIGHT, FIELD_WIDTH, SIM_DT};
    use neon_core::platform::{FileStore, FpsCounter, FramePacer};
    use neon_core::renderer::VertexSurface;
    use neon_core::sim::{Engine, EventQueue, FrameTicket, GameEvent, autopilot};
    use neon_core::{Profile, Settings};

    /// Upgrade choices shown after each level-up
    const OFFER_SIZE: usize = 3;

    #[derive(Parser)]
    #[command(name = "neon-core")]
    #[command(about = "Headless Neon Core runner driven by the autopilot")]
    #[command(version)]
    struct Cli {
        /// Directory holding settings and the player profile
        #[arg(long, default_value = "./.neon-core")]
        data_dir: PathBuf,

        /// Run ticks back to back instead of pacing at 60 Hz
        #[arg(long)]
        fast: bool,

        /// Stop after this many ticks even if the run is still going
        #[arg(long, default_value_t = u64::MAX)]
        frames: u64,

        /// RNG seed (defaults to the clock)
        #[arg(long)]
        seed: Option<u64>,
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let mut store = FileStore::new(&cli.data_dir);
        let settings = Settings::load(&store);
        let profile = Profile::load(&store);
        log::info!(
            "Neon Core (headless) starting; best score {}, {} runs played",
            profile.high_score,
            profile.total_games_played
        );

        let seed = cli.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        });
        let mut engine = Engine::with_settings(seed, settings, EventQueue::new());
        let mut surface = VertexSurface::new(FIELD_WIDTH, FIELD_HEIGHT);
        let mut pacer = FramePacer::new();
        let mut fps = FpsCounter::new();

        let started = Instant::now();
        let mut last = started;
        let mut ticket: Option<FrameTicket> = Some(engine.start());

        while engine.frame() < cli.frames && !engine.is_game_over() {
            let due = if cli.fast {
                1
            } else {
                thread::sleep(Duration::from_secs_f32(SIM_DT));
                let now = Instant::now();
                let dt = now.duration_since(last).as_secs_f32();
                last = now;
                fps.record(now.duration_since(started).as_secs_f64() * 1000.0);
                pacer.push(dt)
            };

            for _ in 0..due {
                let Some(live) = ticket.take() else {
                    break;
                };
                engine.set_target(autopilot::steer(engine.state()));
                ticket = engine.run_frame(live, &mut surface);

                let events: Vec<GameEvent> = engine.events_mut().drain().collect();
                for event in events {
                    match event {
                        GameEvent::LevelUp(level) => log::debug!("Reached level {level}"),
                        GameEvent::PlaySound(cue) => log::trace!("sound {}", cue.name()),
                        _ => {}
                    }
                }

                // Level-up pauses the run until an upgrade is picked
                if ticket.is_none() && engine.is_paused() && !engine.is_game_over() {
                    let offer = engine.roll_upgrade_offer(OFFER_SIZE);
                    if let Some(pick) = offer.first() {
                        log::info!("Autopilot picked {} [{}]", pick.title, pick.tag.label());
                        engine.apply_upgrade(pick);
                    }
                    ticket = engine.resume();
                }
                if ticket.is_none() {
                    break;
                }
            }

            if ticket.is_none() && !engine.is_game_over() {
                log::warn!("Frame loop stalled at tick {}", engine.frame());
                break;
            }
            if !cli.fast && engine.frame() % 600 == 0 {
                log::debug!("{} fps, {} vertices last frame", fps.fps(), surface.vertex_count());
            }
        }

        log::info!(
            "Run finished: score {}, level {}, {} kills, {} ticks in {:.1}s",
            engine.score(),
            engine.level(),
            engine.kills(),
            engine.frame(),
            started.elapsed().as_secs_f32()
        );

        if Profile::update_high_score(&mut store, engine.score()) {
            println!("New high score: {}", engine.score());
        }
        Profile::record_game(&mut store, engine.kills());
        engine.settings().save(&mut store);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build embeds the library; there is no standalone binary
}

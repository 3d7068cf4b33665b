//! Sky Hop headless runner
//!
//! Drives the simulation with the autopilot at a fixed step and reports how
//! the runs went. Rendering, audio and input belong to the host front end.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use sky_hop::sim::{GameEvent, GameOverCause, GameState, autopilot_input, tick};
    use sky_hop::{Tuning, TuningError};

    #[derive(Parser, Debug)]
    #[command(name = "sky-hop")]
    #[command(about = "Run the Sky Hop simulation headless with the autopilot")]
    struct Args {
        /// RNG seed for level generation
        #[arg(short, long, default_value_t = 1)]
        seed: u64,

        /// Number of frames to simulate
        #[arg(short, long, default_value_t = 36_000)]
        frames: u64,

        /// JSON file with tuning overrides
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<(), TuningError> {
        let args = Args::parse();
        let tuning = match &args.tuning {
            Some(path) => {
                log::info!("Loading tuning from {}", path.display());
                Tuning::load(path)?
            }
            None => Tuning::default(),
        };

        log::info!("Sky Hop (headless) seed={} frames={}", args.seed, args.frames);
        let mut state = GameState::with_tuning(tuning, args.seed);

        let mut runs = 0u32;
        let mut enemy_deaths = 0u32;
        let mut kills = 0u32;
        let mut last = None;
        for _ in 0..args.frames {
            let input = autopilot_input(&state);
            let snapshot = tick(&mut state, &input);
            for event in &snapshot.events {
                match event {
                    GameEvent::GameOver { cause } => {
                        runs += 1;
                        if *cause == GameOverCause::Enemy {
                            enemy_deaths += 1;
                        }
                    }
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    _ => {}
                }
            }
            last = Some(snapshot);
        }

        println!("Finished runs:   {runs}");
        println!("Enemy deaths:    {enemy_deaths}");
        println!("Enemies shot:    {kills}");
        println!("High score:      {}", state.display_high_score());

        if let (true, Some(snapshot)) = (args.json, last) {
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("Failed to encode snapshot: {e}"),
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), sky_hop::TuningError> {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by the web host; nothing to run here
}

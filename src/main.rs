//! Brickfall headless runner
//!
//! Plays games with the autopilot at full speed, logging gameplay events and
//! recording results in the high score table. Rendering front ends drive the
//! same `tick` loop with real input instead.
//!
//! Usage: brickfall [--settings FILE] [--levels FILE] [--seed N] [--frames N]
//!                  [--scores FILE] [--name NAME]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use brickfall::sim::{GameEvent, GameState, LevelSource, autopilot, tick};
    use brickfall::{HighScores, Settings, SimError};

    /// Command line options
    pub struct Options {
        settings: Option<PathBuf>,
        levels: Option<PathBuf>,
        seed: u64,
        max_frames: u64,
        scores: PathBuf,
        name: String,
    }

    impl Default for Options {
        fn default() -> Self {
            Self {
                settings: None,
                levels: None,
                seed: 1,
                max_frames: 120 * 60 * 10,
                scores: PathBuf::from("brickfall_scores.json"),
                name: "AUTO".to_string(),
            }
        }
    }

    impl Options {
        pub fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut opts = Self::default();
            let mut args = args.skip(1);
            while let Some(arg) = args.next() {
                let mut value = || args.next().ok_or_else(|| format!("{} needs a value", arg));
                match arg.as_str() {
                    "--settings" => opts.settings = Some(PathBuf::from(value()?)),
                    "--levels" => opts.levels = Some(PathBuf::from(value()?)),
                    "--scores" => opts.scores = PathBuf::from(value()?),
                    "--name" => opts.name = value()?,
                    "--seed" => {
                        opts.seed = value()?
                            .parse()
                            .map_err(|e| format!("bad --seed: {}", e))?
                    }
                    "--frames" => {
                        opts.max_frames = value()?
                            .parse()
                            .map_err(|e| format!("bad --frames: {}", e))?
                    }
                    other => return Err(format!("unknown argument '{}'", other)),
                }
            }
            Ok(opts)
        }
    }

    pub fn run(opts: &Options) -> Result<(), SimError> {
        let settings = match &opts.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let source = match &opts.levels {
            Some(path) => {
                let text =
                    std::fs::read_to_string(path).map_err(|e| SimError::io(path, e))?;
                LevelSource::parse_fixed(&text)?
            }
            None => LevelSource::Procedural,
        };

        let mut state = GameState::with_source(settings, source, opts.seed)?;
        while !state.is_finished() && state.frame < opts.max_frames {
            let input = autopilot(&state);
            tick(&mut state, &input);
            for event in state.drain_events() {
                log_event(&event);
            }
        }

        log::info!(
            "Stopped after {} frames: level {}, score {}, lives {}",
            state.frame,
            state.level_number(),
            state.score(),
            state.lives.count()
        );

        let mut scores = HighScores::load_or_default(&opts.scores);
        if let Some(rank) = scores.add_score(&opts.name, state.score(), state.level_number()) {
            log::info!("New high score, rank {}", rank);
            scores.save(&opts.scores)?;
        }
        for line in scores.display_lines() {
            println!("{}", line);
        }
        Ok(())
    }

    fn log_event(event: &GameEvent) {
        match event {
            GameEvent::WallHit { .. }
            | GameEvent::PaddleHit { .. }
            | GameEvent::BallsCollided { .. } => log::trace!("{:?}", event),
            GameEvent::BallLaunched { .. } | GameEvent::BrickDestroyed { .. } => {
                log::debug!("{:?}", event)
            }
            _ => log::info!("{:?}", event),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brickfall (headless) starting...");

    let opts = match native::Options::parse(std::env::args()) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };
    if let Err(err) = native::run(&opts) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser front ends link the library directly
}

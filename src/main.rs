//! Cyber Dash headless entry point
//!
//! Runs autopilot sessions through the fixed-timestep loop and keeps the
//! save directory up to date. Usage: `cyber-dash [tuning.json] [save-dir]`.

use std::process::ExitCode;

use cyber_dash::persistence::{JsonDirStore, SaveData};
use cyber_dash::renderer::SpriteInstance;
use cyber_dash::shop::{ShopItem, purchase};
use cyber_dash::sim::{GameEvent, GameState, TickInput, World};
use cyber_dash::{GameLoop, RenderSink, Tuning};

/// Runs per session
const RUNS: u32 = 3;
/// Give up on a run after this many host frames (10 minutes at 60 Hz)
const MAX_FRAMES_PER_RUN: u32 = 36_000;

/// Logs a line every few seconds of play
struct LogSink {
    frames: u64,
}

impl RenderSink for LogSink {
    fn present(&mut self, state: &GameState, sprites: &[SpriteInstance]) {
        self.frames += 1;
        if self.frames % 300 == 0 {
            log::debug!(
                "t={} distance={:.0} ammo={}/{} sprites={}",
                state.time_ticks,
                state.distance,
                state.player.weapon.ammo,
                state.player.weapon.max_ammo,
                sprites.len()
            );
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Cyber Dash (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let save_dir = args.next().unwrap_or_else(|| "save".to_string());

    let mut store = match JsonDirStore::open(&save_dir) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open save directory {}: {}", save_dir, e);
            return ExitCode::FAILURE;
        }
    };
    let mut save = SaveData::load(&store);

    let seed = save.history.latest().map_or(1, |e| e.run as u64 + 1);
    let world = World::new(tuning, Default::default());
    let mut game = GameLoop::new(GameState::with_world(seed, world));
    let mut sink = LogSink { frames: 0 };
    let dt = game.sim_dt();

    for run in 0..RUNS {
        if run > 0 {
            game.state.restart();
        }
        for item in [ShopItem::WeaponUpgrade, ShopItem::ExtraLife] {
            let state = &mut game.state;
            if purchase(item, &mut save.coins, &mut state.player, &state.world).is_ok() {
                log::info!("Starting run with {:?}", item);
            }
        }

        game.set_input(TickInput {
            autopilot: true,
            ..Default::default()
        });
        let mut finished = false;
        for _ in 0..MAX_FRAMES_PER_RUN {
            game.frame(dt, &mut sink);
            for event in game.drain_events() {
                if let GameEvent::GameOver { distance, coins } = event {
                    if save.record_run(distance, coins) {
                        log::info!("New highscore: {:.0}", distance);
                    }
                    finished = true;
                }
            }
            if finished {
                break;
            }
        }
        if !finished {
            log::info!("Run hit the frame limit, recording it as finished");
            save.record_run(game.state.distance, game.state.coins);
        }

        if let Err(e) = save.save(&mut store) {
            log::error!("Failed to write save: {}", e);
            return ExitCode::FAILURE;
        }
    }

    log::info!(
        "Done: highscore {}, {} coins banked",
        save.highscore,
        save.coins
    );
    ExitCode::SUCCESS
}

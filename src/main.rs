use std::collections::HashMap;

use isosurvive::components::PlayerSkill;
use isosurvive::config::GameConfig;
use isosurvive::coords::MatrixPosition;
use isosurvive::events::GameEvent;
use isosurvive::hooks::{MemoryStore, ProgressStore, TransactionHooks};
use isosurvive::viewport::CameraView;
use isosurvive::GameState;
use log::{debug, info, warn};

/// Simulated frame length
const FRAME_MS: u64 = 16;
/// Length of the headless run in simulated seconds
const RUN_SECONDS: u64 = 180;

/// Logs the actions a transaction backend would receive
struct LoggingHooks;

impl TransactionHooks for LoggingHooks {
    fn on_player_move(&mut self, position: MatrixPosition) {
        debug!("tx: move to {:?}", position);
    }

    fn on_player_attack(&mut self) {
        debug!("tx: attack");
    }
}

fn load_config() -> Result<GameConfig, Box<dyn std::error::Error>> {
    match std::env::var("ISOSURVIVE_CONFIG") {
        Ok(path) => {
            info!("Loading config from {}", path);
            Ok(GameConfig::load(path)?)
        }
        Err(_) => Ok(GameConfig::default()),
    }
}

fn start_profiler() -> Option<puffin_http::Server> {
    std::env::var_os("ISOSURVIVE_PROFILE")?;
    puffin::set_scopes_on(true);
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            info!("Serving profile data on {}", addr);
            Some(server)
        }
        Err(err) => {
            warn!("Failed to start profiler server: {}", err);
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let _profiler = start_profiler();
    let config = load_config()?;

    let mut state = GameState::new(
        config,
        Box::new(CameraView::new(800.0, 600.0)),
        Box::new(LoggingHooks),
        Box::new(MemoryStore::default()),
    )?;

    let mut counts: HashMap<&'static str, u32> = HashMap::new();
    let frames = RUN_SECONDS * 1000 / FRAME_MS;

    for frame in 0..frames {
        let now = frame * FRAME_MS;

        // walk in a slowly turning circle, swing twice a second
        if now % 1000 < FRAME_MS {
            let angle = ((now / 1000) * 25 % 360) as f32;
            state.set_movement_angle(Some(angle));
        }
        if now % 500 < FRAME_MS {
            let _ = state.player_attack();
        }
        if now % 10_000 < FRAME_MS {
            for skill in PlayerSkill::ALL {
                let _ = state.upgrade_skill(skill);
            }
        }

        state.tick(FRAME_MS);
        puffin::GlobalProfiler::lock().new_frame();

        for event in state.drain_events() {
            let name = match event {
                GameEvent::EnemySpawned { .. } => "enemies spawned",
                GameEvent::EnemyDied { .. } => "enemies killed",
                GameEvent::CoinPickedUp { .. } => "coins picked up",
                GameEvent::SkillUpgraded { skill, level } => {
                    info!("{:?} is now level {}", skill, level);
                    "upgrades"
                }
                GameEvent::Explosion { .. } => "explosions",
                GameEvent::Damaged { .. } => "hits",
                _ => continue,
            };
            *counts.entry(name).or_default() += 1;
        }

        if state.is_game_over() {
            break;
        }
    }

    let mut summary: Vec<_> = counts.into_iter().collect();
    summary.sort();
    for (name, count) in summary {
        info!("{}: {}", name, count);
    }
    info!(
        "Ran {} s of game time, best stat {:?}",
        state.clock.lived_seconds(),
        state.store.best_stat()
    );
    Ok(())
}

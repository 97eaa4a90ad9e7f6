//! Core game state - owns the simulation data.

use crossbeam_channel::{Receiver, Sender};
use glam::Vec2;
use hecs::{Entity, World};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::{Player, PlayerSkill};
use crate::config::GameConfig;
use crate::coords::MatrixPosition;
use crate::error::{ActionError, SessionError, SpriteError};
use crate::events::{EventQueue, GameEvent};
use crate::hooks::{MemoryStore, NoopHooks, ProgressStore, TransactionHooks};
use crate::level::Level;
use crate::live::Live;
use crate::navigator::Navigator;
use crate::spawner::Spawner;
use crate::spawning::{self, SpriteData};
use crate::systems::npc::PathReply;
use crate::systems::{combat, player};
use crate::time_system::{TimerScheduler, WorldClock};
use crate::viewport::Viewport;

use super::{initialization, simulation};

/// Core game state - owns all simulation data.
pub struct GameState {
    /// The ECS world
    pub world: World,

    /// Biome map, tiles and collision grids
    pub level: Level,

    /// Player entity handle
    pub player_entity: Entity,

    /// Pausable world clock
    pub clock: WorldClock,

    /// Delayed callbacks keyed to the world clock
    pub timers: TimerScheduler,

    /// Incremental path searches
    pub navigator: Navigator,

    /// Finished searches travel back to their NPC through this channel
    pub path_tx: Sender<PathReply>,
    pub path_rx: Receiver<PathReply>,

    /// Events for the presentation layer
    pub events: EventQueue,

    /// Every random pick of the session
    pub rng: StdRng,

    pub config: GameConfig,

    pub spawner: Spawner,

    pub viewport: Box<dyn Viewport>,
    pub hooks: Box<dyn TransactionHooks>,
    pub store: Box<dyn ProgressStore>,

    /// Entities that died this tick and still await their death handling
    pub pending_deaths: Vec<Entity>,
}

impl GameState {
    /// Generate a level and start a full session on it.
    pub fn new(
        config: GameConfig,
        viewport: Box<dyn Viewport>,
        hooks: Box<dyn TransactionHooks>,
        store: Box<dyn ProgressStore>,
    ) -> Result<Self, SessionError> {
        initialization::new_session(config, viewport, hooks, store)
    }

    /// Bare state on a prepared level: the player only, nothing visible,
    /// no-op hooks and an in-memory store.
    pub fn from_level(
        level: Level,
        player_at: MatrixPosition,
        config: GameConfig,
    ) -> Result<Self, SpriteError> {
        let mut world = World::new();
        let store = MemoryStore::default();
        let player_entity = spawning::spawn_player(
            &mut world,
            &config.difficulty,
            store.load_coins(),
            SpriteData::at_matrix(player_at),
        )?;

        let (path_tx, path_rx) = crossbeam_channel::unbounded();
        let spawner = Spawner::new(&level, config.spawner.positions_grid);

        Ok(Self {
            world,
            level,
            player_entity,
            clock: WorldClock::new(),
            timers: TimerScheduler::new(),
            navigator: Navigator::new(config.path_budget),
            path_tx,
            path_rx,
            events: EventQueue::new(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            spawner,
            viewport: Box::new(|_: Vec2| false),
            hooks: Box::new(NoopHooks),
            store: Box::new(store),
            pending_deaths: Vec::new(),
        })
    }

    pub fn with_viewport(mut self, viewport: Box<dyn Viewport>) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn TransactionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_store(mut self, store: Box<dyn ProgressStore>) -> Self {
        self.store = store;
        self
    }

    /// Advance the simulation by `delta_ms` of real time
    pub fn tick(&mut self, delta_ms: u64) {
        simulation::tick(self, delta_ms);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain().collect()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.world
            .get::<&Live>(self.player_entity)
            .map_or(true, |live| live.is_dead())
    }

    /// Requested walking direction in screen degrees, `None` to stop.
    /// Ignored once the player is dead.
    pub fn set_movement_angle(&mut self, angle: Option<f32>) {
        if self.is_game_over() {
            return;
        }
        if let Ok(mut stats) = self.world.get::<&mut Player>(self.player_entity) {
            stats.movement_angle = angle;
        }
    }

    /// Melee sweep. Kills are settled right away; a refused attack also
    /// shows up as a notice.
    pub fn player_attack(&mut self) -> Result<(), ActionError> {
        let result = player::attack(self);
        combat::resolve_deaths(self);
        self.notify(result)
    }

    /// Buy the next level of `skill`. A refused upgrade also shows up as a
    /// notice.
    pub fn upgrade_skill(&mut self, skill: PlayerSkill) -> Result<(), ActionError> {
        let result = player::upgrade(self, skill);
        self.notify(result)
    }

    fn notify(&mut self, result: Result<(), ActionError>) -> Result<(), ActionError> {
        if let Err(err) = result {
            debug!("Action refused: {:?}", err);
            self.events.push(GameEvent::Notice {
                message: err.to_string(),
            });
        }
        result
    }
}

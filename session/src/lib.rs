#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session that owns the world and systems and drives one tick per frame.

mod draw;
mod menu;

pub use menu::{Button, ButtonAction};

use glam::Vec2;
use lane_defence_core::{Command, Cue, DefenderKind, Event, GameState, Rules};
use lane_defence_rendering::{Frame, FrameInput, FrameOutput, InputEvent, PointerButton};
use lane_defence_system_collision::Collision;
use lane_defence_system_spawning::{Config as SpawningConfig, Spawning};
use lane_defence_world::{self as world, query, World};
use tracing::{debug, info};

use self::menu::MenuLayout;

/// Interactive session: state machine, simulation pump and screen layout.
#[derive(Debug)]
pub struct Session {
    world: World,
    spawning: Spawning,
    collision: Collision,
    layout: MenuLayout,
    pending_cues: Vec<Cue>,
    exit_requested: bool,
}

impl Session {
    /// Creates a session in the menu using the provided rules and spawn seed.
    #[must_use]
    pub fn new(rules: Rules, seed: u64) -> Self {
        let layout = MenuLayout::new(&rules);
        let spawning = Spawning::new(SpawningConfig::from_rules(&rules, seed));
        Self {
            world: World::new(rules),
            spawning,
            collision: Collision::new(),
            layout,
            pending_cues: Vec::new(),
            exit_requested: false,
        }
    }

    /// Applies a single command outside of the tick pump.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        self.execute(command, &mut events);
        self.record(&events);
        events
    }

    /// Reacts to one input event and returns the world events it caused.
    pub fn handle_input(&mut self, input: InputEvent) -> Vec<Event> {
        let state = self.game_state();
        match input {
            InputEvent::QuitRequested => {
                self.request_exit();
                Vec::new()
            }
            InputEvent::PointerMoved(position) => {
                self.layout.hover(state, position);
                Vec::new()
            }
            InputEvent::PointerPressed {
                button: PointerButton::Primary,
                position,
            } => self.press(state, position),
            InputEvent::PointerPressed { .. } => Vec::new(),
        }
    }

    fn press(&mut self, state: GameState, position: Vec2) -> Vec<Event> {
        if state == GameState::Playing {
            let field = query::field(&self.world);
            let x = position.x.floor() as i32;
            let y = position.y.floor() as i32;
            return match field.cell_at(x, y) {
                Some(cell) => self.apply(Command::PlaceDefender { cell }),
                None => {
                    debug!(x, y, "click outside the grid ignored");
                    Vec::new()
                }
            };
        }

        let command = match self.layout.hit(state, position) {
            Some(ButtonAction::StartGame) => Command::StartGame,
            Some(ButtonAction::OpenShop) => Command::OpenShop,
            Some(ButtonAction::BackToMenu) => Command::BackToMenu,
            Some(ButtonAction::Select(kind)) => Command::SelectDefender { kind },
            Some(ButtonAction::Exit) => {
                self.request_exit();
                return Vec::new();
            }
            None => return Vec::new(),
        };
        self.apply(command)
    }

    fn request_exit(&mut self) {
        if !self.exit_requested {
            info!("exit requested");
        }
        self.exit_requested = true;
    }

    /// Runs one simulation tick and returns every event it produced.
    ///
    /// The world advances defenders, projectiles and enemies, the spawner
    /// reacts to the elapsed tick, hits are resolved and finally the breach
    /// condition is checked.
    pub fn update(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.execute(Command::Tick, &mut events);

        let state = self.game_state();
        let projectiles = query::projectile_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        let mut hits = Vec::new();
        self.collision.handle(state, &projectiles, &enemies, &mut hits);
        for hit in hits {
            self.execute(hit, &mut events);
        }

        self.execute(Command::CheckBreach, &mut events);
        self.record(&events);
        events
    }

    /// Applies a command to the world and lets the spawner observe its events.
    fn execute(&mut self, command: Command, events: &mut Vec<Event>) {
        let mut produced = Vec::new();
        world::apply(&mut self.world, command, &mut produced);

        let state = self.game_state();
        let mut spawns = Vec::new();
        self.spawning.handle(&produced, state, &mut spawns);
        events.append(&mut produced);

        for spawn in spawns {
            world::apply(&mut self.world, spawn, events);
        }
    }

    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GameStateChanged { state } => info!(?state, "game state changed"),
                Event::Breached { enemy } => {
                    info!(enemy = enemy.get(), "enemy breached the field")
                }
                Event::PlacementRejected { kind, cell, reason } => debug!(
                    ?kind,
                    column = cell.column(),
                    row = cell.row(),
                    ?reason,
                    "placement rejected"
                ),
                Event::DefenderPlaced { kind, cell, .. } => debug!(
                    ?kind,
                    column = cell.column(),
                    row = cell.row(),
                    currency = self.currency(),
                    "defender placed"
                ),
                Event::DefenderSelected { kind } => debug!(?kind, "defender selected"),
                Event::EnemyKilled { enemy } => debug!(enemy = enemy.get(), "enemy killed"),
                _ => {}
            }

            if let Some(cue) = event.cue() {
                self.pending_cues.push(cue);
            }
        }
    }

    /// Builds the draw list for the active screen.
    #[must_use]
    pub fn draw(&self) -> Frame {
        draw::compose(&self.world, self.layout.buttons(self.game_state()))
    }

    /// Runs a full frame: input, one tick, rendering and cue collection.
    pub fn frame(&mut self, input: FrameInput) -> FrameOutput {
        for event in input.events {
            let _ = self.handle_input(event);
        }
        let _ = self.update();

        FrameOutput {
            frame: self.draw(),
            cues: self.take_cues(),
            exit_requested: self.exit_requested,
        }
    }

    /// Drains the audio cues raised since the previous call.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.pending_cues)
    }

    /// Active state of the state machine.
    #[must_use]
    pub fn game_state(&self) -> GameState {
        query::game_state(&self.world)
    }

    /// Currency available for placements.
    #[must_use]
    pub fn currency(&self) -> u32 {
        query::currency(&self.world)
    }

    /// Defender kind the next placement creates.
    #[must_use]
    pub fn selected_defender(&self) -> DefenderKind {
        query::selected_defender(&self.world)
    }

    /// Ticks counted toward the next enemy spawn.
    #[must_use]
    pub fn spawn_timer(&self) -> u32 {
        self.spawning.spawn_timer()
    }

    /// Enemies spawned since the round started.
    #[must_use]
    pub fn spawn_count(&self) -> u32 {
        self.spawning.spawn_count()
    }

    /// Whether the player asked to leave the game.
    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Buttons shown on the active screen.
    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        self.layout.buttons(self.game_state())
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Lane Defence.
//!
//! The world owns every live entity, the currency counter, the defender
//! selection and the top-level state machine. It never decides anything on its
//! own: systems and the session submit [`Command`] values and react to the
//! [`Event`] values the world broadcasts in return.

mod defenders;
mod entities;

use lane_defence_core::{
    CellCoord, Command, DefenderKind, EntityId, Event, FieldGeometry, GameState, PlacementError,
    Rules, SpeedTier,
};

use self::defenders::DefenderRegistry;
use self::entities::{anchor_for, Defender, Enemy, Projectile};

/// Represents the authoritative Lane Defence world state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    field: FieldGeometry,
    state: GameState,
    currency: u32,
    selected: DefenderKind,
    defenders: DefenderRegistry,
    projectiles: Vec<Projectile>,
    enemies: Vec<Enemy>,
    next_entity_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world in the menu state, governed by the provided rules.
    ///
    /// Callers are expected to have checked the rules with
    /// [`Rules::validate`]; degenerate layouts simply never accept placements.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        let field = rules.field();
        Self {
            currency: rules.starting_currency,
            field,
            rules,
            state: GameState::Menu,
            selected: DefenderKind::Attacker,
            defenders: DefenderRegistry::new(),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            next_entity_id: 0,
            tick_index: 0,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    fn set_state(&mut self, state: GameState, out_events: &mut Vec<Event>) {
        if self.state != state {
            self.state = state;
            out_events.push(Event::GameStateChanged { state });
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.defenders.clear();
        self.projectiles.clear();
        self.enemies.clear();
        self.currency = self.rules.starting_currency;
        self.selected = DefenderKind::Attacker;
        out_events.push(Event::SessionReset);
    }

    fn place_defender(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let kind = self.selected;
        if let Err(reason) = self.check_placement(kind, cell) {
            out_events.push(Event::PlacementRejected { kind, cell, reason });
            return;
        }

        let id = self.allocate_id();
        let defender = Defender::place(id, kind, cell, &self.field, &self.rules);
        self.defenders.insert(defender);
        self.currency -= self.rules.cost(kind);
        out_events.push(Event::DefenderPlaced {
            defender: id,
            kind,
            cell,
        });
    }

    fn check_placement(&self, kind: DefenderKind, cell: CellCoord) -> Result<(), PlacementError> {
        if self.state != GameState::Playing {
            return Err(PlacementError::InvalidState);
        }
        if !self.field.contains_cell(cell) {
            return Err(PlacementError::OutOfBounds);
        }
        let anchor = anchor_for(cell, &self.field, &self.rules);
        if self.defenders.occupant(anchor).is_some() {
            return Err(PlacementError::Occupied);
        }
        if self.currency < self.rules.cost(kind) {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(())
    }

    fn advance_defenders(&mut self, out_events: &mut Vec<Event>) {
        let attack_interval = self.rules.attack_interval;
        let volleys: Vec<(EntityId, (i32, i32))> = self
            .defenders
            .iter_mut()
            .filter_map(|defender| {
                defender
                    .advance(attack_interval)
                    .map(|center| (defender.entity.id, center))
            })
            .collect();

        for (defender, center) in volleys {
            let projectile = self.allocate_id();
            self.projectiles
                .push(Projectile::centred_on(projectile, center, &self.rules));
            out_events.push(Event::ProjectileFired {
                defender,
                projectile,
            });
        }
    }

    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let field_width = self.field.width();
        self.projectiles.retain_mut(|projectile| {
            let on_field = projectile.advance(field_width);
            if !on_field {
                out_events.push(Event::ProjectileExpired {
                    projectile: projectile.entity.id,
                });
            }
            on_field
        });
    }

    fn advance_enemies(&mut self) {
        for enemy in &mut self.enemies {
            enemy.advance();
        }
    }

    fn spawn_enemy(&mut self, row: u32, speed: SpeedTier, out_events: &mut Vec<Event>) {
        if row >= self.field.rows() {
            return;
        }

        let enemy = self.allocate_id();
        self.enemies
            .push(Enemy::spawn(enemy, row, speed, &self.field, &self.rules));
        out_events.push(Event::EnemySpawned { enemy, row, speed });
    }

    fn resolve_hit(
        &mut self,
        projectile: EntityId,
        enemies: &[EntityId],
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self
            .projectiles
            .iter()
            .position(|candidate| candidate.entity.id == projectile)
        else {
            return;
        };
        let _ = self.projectiles.remove(index);

        let damage = self.rules.projectile_damage;
        let mut hits = 0;
        for &enemy_id in enemies {
            let Some(position) = self
                .enemies
                .iter()
                .position(|enemy| enemy.entity.id == enemy_id)
            else {
                continue;
            };

            hits += 1;
            let enemy = &mut self.enemies[position];
            let died = enemy.take_damage(damage);
            out_events.push(Event::EnemyDamaged {
                enemy: enemy_id,
                health: enemy.entity.health,
            });
            if died {
                let _ = self.enemies.remove(position);
                out_events.push(Event::EnemyKilled { enemy: enemy_id });
            }
        }

        out_events.push(Event::ProjectileResolved { projectile, hits });
    }

    fn check_breach(&mut self, out_events: &mut Vec<Event>) {
        let Some(enemy) = self
            .enemies
            .iter()
            .find(|enemy| enemy.has_breached())
            .map(|enemy| enemy.entity.id)
        else {
            return;
        };

        out_events.push(Event::Breached { enemy });
        self.reset(out_events);
        self.set_state(GameState::Menu, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that make no sense in the current state are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => {
            if world.state == GameState::Menu {
                world.reset(out_events);
                world.set_state(GameState::Playing, out_events);
            }
        }
        Command::OpenShop => {
            if world.state == GameState::Menu {
                world.set_state(GameState::Shop, out_events);
            }
        }
        Command::BackToMenu => {
            if world.state == GameState::Shop {
                world.set_state(GameState::Menu, out_events);
            }
        }
        Command::SelectDefender { kind } => {
            if world.state == GameState::Shop && world.selected != kind {
                world.selected = kind;
                out_events.push(Event::DefenderSelected { kind });
            }
        }
        Command::PlaceDefender { cell } => world.place_defender(cell, out_events),
        Command::Tick => {
            if world.state != GameState::Playing {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.advance_defenders(out_events);
            world.advance_projectiles(out_events);
            world.advance_enemies();
        }
        Command::SpawnEnemy { row, speed } => {
            if world.state == GameState::Playing {
                world.spawn_enemy(row, speed, out_events);
            }
        }
        Command::ResolveHit {
            projectile,
            enemies,
        } => {
            if world.state == GameState::Playing {
                world.resolve_hit(projectile, &enemies, out_events);
            }
        }
        Command::CheckBreach => {
            if world.state == GameState::Playing {
                world.check_breach(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_defence_core::{
        CellCoord, DefenderKind, DefenderSnapshot, EnemyView, EntitySnapshot, FieldGeometry,
        GameState, ProjectileView, Rules,
    };

    use super::World;

    /// Active state of the state machine.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Currency available for placements.
    #[must_use]
    pub fn currency(world: &World) -> u32 {
        world.currency
    }

    /// Defender kind the next placement creates.
    #[must_use]
    pub fn selected_defender(world: &World) -> DefenderKind {
        world.selected
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Pixel layout of the field.
    #[must_use]
    pub fn field(world: &World) -> FieldGeometry {
        world.field
    }

    /// Number of ticks simulated since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Defender occupying the provided cell, if any.
    #[must_use]
    pub fn defender_at(world: &World, cell: CellCoord) -> Option<DefenderSnapshot> {
        world.defenders.in_cell(cell).map(|defender| defender.snapshot())
    }

    /// Snapshots of every placed defender in identifier order.
    #[must_use]
    pub fn defenders(world: &World) -> Vec<DefenderSnapshot> {
        world
            .defenders
            .iter()
            .map(|defender| defender.snapshot())
            .collect()
    }

    /// Number of placed defenders.
    #[must_use]
    pub fn defender_count(world: &World) -> usize {
        world.defenders.len()
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the enemies on the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| enemy.snapshot())
                .collect(),
        )
    }

    /// Every live entity in back-to-front draw order.
    ///
    /// Defenders come first, then projectiles, then enemies; each group is
    /// ordered by identifier.
    #[must_use]
    pub fn entity_view(world: &World) -> Vec<EntitySnapshot> {
        let mut defenders: Vec<EntitySnapshot> = world
            .defenders
            .iter()
            .map(|defender| defender.entity_snapshot())
            .collect();
        let mut projectiles: Vec<EntitySnapshot> = world
            .projectiles
            .iter()
            .map(|projectile| projectile.entity_snapshot())
            .collect();
        let mut enemies: Vec<EntitySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| enemy.entity_snapshot())
            .collect();
        projectiles.sort_by_key(|snapshot| snapshot.id);
        enemies.sort_by_key(|snapshot| snapshot.id);

        defenders.append(&mut projectiles);
        defenders.append(&mut enemies);
        defenders
    }
}

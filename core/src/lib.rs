#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown by adapters when the experience boots.
pub const WINDOW_TITLE: &str = "Lane Defence";

/// Top-level state machine driving which surface is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Main menu; the initial state and the fold-back target after a breach.
    #[default]
    Menu,
    /// Shop screen where the player selects which defender kind to place.
    Shop,
    /// Active round with live simulation.
    Playing,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Leaves the menu and starts a fresh round.
    StartGame,
    /// Leaves the menu for the shop.
    OpenShop,
    /// Returns from the shop to the menu.
    BackToMenu,
    /// Chooses which defender kind subsequent placements create.
    SelectDefender {
        /// Kind that becomes the active selection.
        kind: DefenderKind,
    },
    /// Requests placement of the selected defender kind at the provided cell.
    PlaceDefender {
        /// Grid cell targeted by the placement.
        cell: CellCoord,
    },
    /// Advances defenders, projectiles and enemies by one simulation step.
    Tick,
    /// Requests that a new enemy enter the field on the provided row.
    SpawnEnemy {
        /// Zero-based row the enemy walks along.
        row: u32,
        /// Speed tier assigned to the enemy.
        speed: SpeedTier,
    },
    /// Applies the damage of one projectile to every enemy it overlapped.
    ResolveHit {
        /// Projectile consumed by the hit.
        projectile: EntityId,
        /// Enemies overlapped by the projectile, in ascending id order.
        enemies: Vec<EntityId>,
    },
    /// Checks the terminal condition and folds back to the menu on a breach.
    CheckBreach,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the state machine entered a new state.
    GameStateChanged {
        /// State active after processing the command.
        state: GameState,
    },
    /// Reports that currency, collections and counters returned to initial values.
    SessionReset,
    /// Confirms that the active defender selection changed.
    DefenderSelected {
        /// Newly selected kind.
        kind: DefenderKind,
    },
    /// Confirms that a defender was placed into the field.
    DefenderPlaced {
        /// Identifier allocated to the defender.
        defender: EntityId,
        /// Kind of defender that was placed.
        kind: DefenderKind,
        /// Cell that now holds the defender.
        cell: CellCoord,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Kind requested for placement.
        kind: DefenderKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks simulated since the world was created.
        tick: u64,
    },
    /// Confirms that an attacker emitted a projectile.
    ProjectileFired {
        /// Defender that fired.
        defender: EntityId,
        /// Identifier allocated to the projectile.
        projectile: EntityId,
    },
    /// Reports that a projectile left the field without hitting anything.
    ProjectileExpired {
        /// Projectile that was removed.
        projectile: EntityId,
    },
    /// Confirms that a projectile was consumed by a hit.
    ProjectileResolved {
        /// Projectile that was removed.
        projectile: EntityId,
        /// Number of live enemies that received damage.
        hits: u32,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EntityId,
        /// Row the enemy walks along.
        row: u32,
        /// Speed tier assigned to the enemy.
        speed: SpeedTier,
    },
    /// Reports that an enemy lost health.
    EnemyDamaged {
        /// Enemy that was hit.
        enemy: EntityId,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that an enemy ran out of health and was removed.
    EnemyKilled {
        /// Enemy that died.
        enemy: EntityId,
    },
    /// Reports that an enemy reached the defended boundary.
    Breached {
        /// Enemy that crossed the boundary.
        enemy: EntityId,
    },
}

impl Event {
    /// Audio cue the event should trigger, if any.
    #[must_use]
    pub const fn cue(&self) -> Option<Cue> {
        match self {
            Self::ProjectileFired { .. } => Some(Cue::Attack),
            Self::EnemySpawned { .. } => Some(Cue::EnemySpawn),
            Self::EnemyKilled { .. } => Some(Cue::EnemyDeath),
            Self::Breached { .. } => Some(Cue::GameOver),
            _ => None,
        }
    }
}

/// Abstract audio events consumed by the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    /// An attacker fired a projectile.
    Attack,
    /// An enemy entered the field.
    EnemySpawn,
    /// An enemy died.
    EnemyDeath,
    /// An enemy breached the defended boundary.
    GameOver,
}

impl Cue {
    /// Every cue in a stable order.
    pub const ALL: [Cue; 4] = [Cue::Attack, Cue::EnemySpawn, Cue::EnemyDeath, Cue::GameOver];
}

/// Unique identifier assigned to any live entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of defenders that can be placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenderKind {
    /// Periodically fires projectiles down its row.
    Attacker,
    /// Pure obstacle occupying a cell.
    Blocker,
}

impl DefenderKind {
    /// Human readable name used by the HUD and shop.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attacker => "Attacker",
            Self::Blocker => "Blocker",
        }
    }
}

/// Closed set of entity kinds used for update and draw dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Defender that fires projectiles.
    Attacker,
    /// Defender that only occupies its cell.
    Blocker,
    /// Projectile travelling east.
    Projectile,
    /// Enemy walking west.
    Enemy,
}

impl From<DefenderKind> for EntityKind {
    fn from(kind: DefenderKind) -> Self {
        match kind {
            DefenderKind::Attacker => Self::Attacker,
            DefenderKind::Blocker => Self::Blocker,
        }
    }
}

/// Speed tiers an enemy can be spawned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    /// Minimum speed, always used during the warm-up.
    Slow,
    /// Faster tier available once the warm-up is over.
    Fast,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementError {
    /// Placement is only possible while a round is being played.
    InvalidState,
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds a defender.
    Occupied,
    /// The currency counter cannot cover the defender's cost.
    InsufficientFunds,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Axis-aligned rectangle expressed in whole screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl PixelRect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the provided size centred on a point.
    ///
    /// Odd sizes round the origin towards the top-left.
    #[must_use]
    pub const fn centred_on(center_x: i32, center_y: i32, width: i32, height: i32) -> Self {
        Self::new(center_x - width / 2, center_y - height / 2, width, height)
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Centre point, rounded towards the top-left.
    #[must_use]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Returns the rectangle shifted horizontally by `dx` pixels.
    #[must_use]
    pub const fn shifted_x(self, dx: i32) -> Self {
        Self::new(self.x + dx, self.y, self.width, self.height)
    }

    /// Reports whether two rectangles share interior area.
    ///
    /// Rectangles that only touch along an edge do not overlap.
    #[must_use]
    pub const fn overlaps(&self, other: &PixelRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Derived pixel layout of the playable field and its grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldGeometry {
    width: i32,
    height: i32,
    columns: u32,
    rows: u32,
    y_offset: i32,
    cell_width: i32,
    cell_height: i32,
}

impl FieldGeometry {
    /// Derives the grid layout for a screen and grid configuration.
    ///
    /// Degenerate configurations produce zero-sized cells, for which
    /// [`FieldGeometry::cell_at`] never resolves a cell.
    #[must_use]
    pub fn new(width: i32, height: i32, columns: u32, rows: u32, y_offset: i32) -> Self {
        let cell_width = i32::try_from(columns)
            .ok()
            .and_then(|columns| width.checked_div(columns))
            .unwrap_or(0);
        let cell_height = i32::try_from(rows)
            .ok()
            .and_then(|rows| (height - y_offset).checked_div(rows))
            .unwrap_or(0);
        Self {
            width,
            height,
            columns,
            rows,
            y_offset,
            cell_width,
            cell_height,
        }
    }

    /// Width of the field, which is also its right boundary.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the screen the field is laid out on.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Top of the field band.
    #[must_use]
    pub const fn y_offset(&self) -> i32 {
        self.y_offset
    }

    /// Pixel width of one cell.
    #[must_use]
    pub const fn cell_width(&self) -> i32 {
        self.cell_width
    }

    /// Pixel height of one cell.
    #[must_use]
    pub const fn cell_height(&self) -> i32 {
        self.cell_height
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains_cell(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Maps a screen point to the grid cell underneath it.
    ///
    /// Returns `None` above the field band, outside the screen, or when the
    /// integer division lands past the last column or row.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellCoord> {
        if self.cell_width <= 0 || self.cell_height <= 0 {
            return None;
        }
        if x < 0 || y < self.y_offset || x >= self.width || y >= self.height {
            return None;
        }

        let column = u32::try_from(x / self.cell_width).ok()?;
        let row = u32::try_from((y - self.y_offset) / self.cell_height).ok()?;
        let cell = CellCoord::new(column, row);
        self.contains_cell(cell).then_some(cell)
    }

    /// Top-left pixel of the provided cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> (i32, i32) {
        let column = i32::try_from(cell.column()).unwrap_or(i32::MAX);
        (
            column.saturating_mul(self.cell_width),
            self.row_top(cell.row()),
        )
    }

    /// Top pixel of the provided row.
    #[must_use]
    pub fn row_top(&self, row: u32) -> i32 {
        let row = i32::try_from(row).unwrap_or(i32::MAX);
        row.saturating_mul(self.cell_height)
            .saturating_add(self.y_offset)
    }

    /// Rectangle covered by the field band.
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::new(0, self.y_offset, self.width, self.height - self.y_offset)
    }
}

/// Tunable constants of a round.
///
/// Every field has a default, so partially specified configuration files are
/// valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Width of the screen and of the field, in pixels.
    pub screen_width: i32,
    /// Height of the screen, in pixels.
    pub screen_height: i32,
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Top of the field band; the HUD lives above it.
    pub grid_y_offset: i32,
    /// Currency granted at the start of every round.
    pub starting_currency: u32,
    /// Price of an attacker.
    pub attacker_cost: u32,
    /// Price of a blocker.
    pub blocker_cost: u32,
    /// Offset of a defender's origin from its cell origin, on both axes.
    pub defender_inset: i32,
    /// Health assigned to placed defenders.
    pub defender_health: u32,
    /// Ticks an attacker waits after firing before it can fire again.
    pub attack_interval: u32,
    /// Horizontal distance a projectile travels per tick.
    pub projectile_speed: i32,
    /// Side length of the square projectile.
    pub projectile_size: i32,
    /// Damage dealt to each enemy a projectile overlaps.
    pub projectile_damage: u32,
    /// Health assigned to spawned enemies.
    pub enemy_health: u32,
    /// Width of an enemy.
    pub enemy_width: i32,
    /// Vertical gap between an enemy and its row's top and bottom edges.
    pub enemy_inset: i32,
    /// Pixels per tick for [`SpeedTier::Slow`].
    pub slow_speed: i32,
    /// Pixels per tick for [`SpeedTier::Fast`].
    pub fast_speed: i32,
    /// Ticks between enemy spawns.
    pub spawn_interval: u32,
    /// Number of initial spawns forced onto the slow tier.
    pub warmup_spawns: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 768,
            columns: 9,
            rows: 5,
            grid_y_offset: 200,
            starting_currency: 150,
            attacker_cost: 50,
            blocker_cost: 75,
            defender_inset: 5,
            defender_health: 100,
            attack_interval: 50,
            projectile_speed: 10,
            projectile_size: 10,
            projectile_damage: 10,
            enemy_health: 100,
            enemy_width: 40,
            enemy_inset: 10,
            slow_speed: 1,
            fast_speed: 2,
            spawn_interval: 100,
            warmup_spawns: 10,
        }
    }
}

impl Rules {
    /// Price of the provided defender kind.
    #[must_use]
    pub const fn cost(&self, kind: DefenderKind) -> u32 {
        match kind {
            DefenderKind::Attacker => self.attacker_cost,
            DefenderKind::Blocker => self.blocker_cost,
        }
    }

    /// Pixels per tick for the provided tier.
    #[must_use]
    pub const fn speed(&self, tier: SpeedTier) -> i32 {
        match tier {
            SpeedTier::Slow => self.slow_speed,
            SpeedTier::Fast => self.fast_speed,
        }
    }

    /// Pixel layout derived from the screen and grid settings.
    #[must_use]
    pub fn field(&self) -> FieldGeometry {
        FieldGeometry::new(
            self.screen_width,
            self.screen_height,
            self.columns,
            self.rows,
            self.grid_y_offset,
        )
    }

    /// Checks that the rules describe a playable field.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(RulesError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if self.grid_y_offset < 0 || self.grid_y_offset >= self.screen_height {
            return Err(RulesError::FieldBandOutsideScreen {
                offset: self.grid_y_offset,
                height: self.screen_height,
            });
        }

        let field = self.field();
        if field.cell_width() <= 2 * self.defender_inset
            || field.cell_height() <= 2 * self.defender_inset
            || field.cell_height() <= 2 * self.enemy_inset
        {
            return Err(RulesError::CellTooSmall {
                width: field.cell_width(),
                height: field.cell_height(),
            });
        }
        if self.projectile_speed <= 0 || self.slow_speed <= 0 || self.fast_speed <= 0 {
            return Err(RulesError::NonPositiveSpeed);
        }
        if self.spawn_interval == 0 {
            return Err(RulesError::ZeroSpawnInterval);
        }
        Ok(())
    }
}

/// Reasons a set of [`Rules`] cannot drive a round.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The grid must have at least one column and one row.
    #[error("grid must have at least one cell (columns: {columns}, rows: {rows})")]
    EmptyGrid {
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
    },
    /// The field band must start inside the screen.
    #[error("grid offset {offset} lies outside a screen {height} pixels tall")]
    FieldBandOutsideScreen {
        /// Configured offset of the field band.
        offset: i32,
        /// Configured screen height.
        height: i32,
    },
    /// Cells must leave room for the defender and enemy insets.
    #[error("cells of {width}x{height} pixels are too small for the configured insets")]
    CellTooSmall {
        /// Derived cell width.
        width: i32,
        /// Derived cell height.
        height: i32,
    },
    /// Projectiles and enemies must move.
    #[error("projectile and enemy speeds must be positive")]
    NonPositiveSpeed,
    /// Spawning needs a positive cadence.
    #[error("spawn interval must be at least one tick")]
    ZeroSpawnInterval,
}

/// Immutable representation of a defender used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenderSnapshot {
    /// Identifier allocated to the defender.
    pub id: EntityId,
    /// Kind of defender.
    pub kind: DefenderKind,
    /// Cell the defender occupies.
    pub cell: CellCoord,
    /// Pixel bounds of the defender.
    pub bounds: PixelRect,
    /// Ticks until the defender may fire again.
    pub cooldown: u32,
}

/// Immutable representation of a projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: EntityId,
    /// Pixel bounds of the projectile.
    pub bounds: PixelRect,
}

/// Immutable representation of an enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy.
    pub id: EntityId,
    /// Pixel bounds of the enemy.
    pub bounds: PixelRect,
    /// Remaining health.
    pub health: u32,
    /// Health the enemy spawned with.
    pub max_health: u32,
    /// Speed tier the enemy was spawned with.
    pub speed: SpeedTier,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all enemies on the field.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Kind-tagged snapshot of any live entity, used for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntitySnapshot {
    /// Identifier allocated to the entity.
    pub id: EntityId,
    /// Which of the closed set of kinds the entity is.
    pub kind: EntityKind,
    /// Pixel bounds of the entity.
    pub bounds: PixelRect,
    /// Remaining health.
    pub health: u32,
    /// Health the entity was created with.
    pub max_health: u32,
}

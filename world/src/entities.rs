//! Entity state and the per-tick update rules of each entity kind.

use lane_defence_core::{
    CellCoord, DefenderKind, DefenderSnapshot, EnemySnapshot, EntityId, EntityKind,
    EntitySnapshot, FieldGeometry, PixelRect, ProjectileSnapshot, Rules, SpeedTier,
};

/// Data shared by every entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Entity {
    pub(crate) id: EntityId,
    pub(crate) bounds: PixelRect,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
}

impl Entity {
    fn new(id: EntityId, bounds: PixelRect, health: u32) -> Self {
        Self {
            id,
            bounds,
            health,
            max_health: health,
        }
    }

    fn snapshot(&self, kind: EntityKind) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            kind,
            bounds: self.bounds,
            health: self.health,
            max_health: self.max_health,
        }
    }
}

/// Placed unit occupying exactly one grid cell.
#[derive(Clone, Debug)]
pub(crate) struct Defender {
    pub(crate) entity: Entity,
    pub(crate) kind: DefenderKind,
    pub(crate) cell: CellCoord,
    pub(crate) cooldown: u32,
}

impl Defender {
    pub(crate) fn place(
        id: EntityId,
        kind: DefenderKind,
        cell: CellCoord,
        field: &FieldGeometry,
        rules: &Rules,
    ) -> Self {
        let (x, y) = anchor_for(cell, field, rules);
        let inset = rules.defender_inset;
        let bounds = PixelRect::new(
            x,
            y,
            field.cell_width() - 2 * inset,
            field.cell_height() - 2 * inset,
        );
        Self {
            entity: Entity::new(id, bounds, rules.defender_health),
            kind,
            cell,
            cooldown: 0,
        }
    }

    /// Runs one tick of the defender's behaviour.
    ///
    /// Returns the point a projectile should be centred on when the defender
    /// fires. A defender that fires is not decremented on the same tick.
    pub(crate) fn advance(&mut self, attack_interval: u32) -> Option<(i32, i32)> {
        match self.kind {
            DefenderKind::Blocker => None,
            DefenderKind::Attacker => {
                if self.cooldown == 0 {
                    self.cooldown = attack_interval;
                    Some(self.entity.bounds.center())
                } else {
                    self.cooldown -= 1;
                    None
                }
            }
        }
    }

    pub(crate) fn snapshot(&self) -> DefenderSnapshot {
        DefenderSnapshot {
            id: self.entity.id,
            kind: self.kind,
            cell: self.cell,
            bounds: self.entity.bounds,
            cooldown: self.cooldown,
        }
    }

    pub(crate) fn entity_snapshot(&self) -> EntitySnapshot {
        self.entity.snapshot(EntityKind::from(self.kind))
    }
}

/// Pixel position a defender placed in `cell` is anchored at.
pub(crate) fn anchor_for(cell: CellCoord, field: &FieldGeometry, rules: &Rules) -> (i32, i32) {
    let (x, y) = field.cell_origin(cell);
    (x + rules.defender_inset, y + rules.defender_inset)
}

/// Projectile travelling east at a constant speed.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) entity: Entity,
    speed: i32,
}

impl Projectile {
    pub(crate) fn centred_on(id: EntityId, (x, y): (i32, i32), rules: &Rules) -> Self {
        let size = rules.projectile_size;
        Self {
            entity: Entity::new(id, PixelRect::centred_on(x, y, size, size), 1),
            speed: rules.projectile_speed,
        }
    }

    /// Moves the projectile and reports whether it is still on the field.
    pub(crate) fn advance(&mut self, field_width: i32) -> bool {
        self.entity.bounds = self.entity.bounds.shifted_x(self.speed);
        self.entity.bounds.x() <= field_width
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.entity.id,
            bounds: self.entity.bounds,
        }
    }

    pub(crate) fn entity_snapshot(&self) -> EntitySnapshot {
        self.entity.snapshot(EntityKind::Projectile)
    }
}

/// Enemy walking west toward the defended boundary.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) entity: Entity,
    tier: SpeedTier,
    speed: i32,
}

impl Enemy {
    pub(crate) fn spawn(
        id: EntityId,
        row: u32,
        tier: SpeedTier,
        field: &FieldGeometry,
        rules: &Rules,
    ) -> Self {
        let inset = rules.enemy_inset;
        let bounds = PixelRect::new(
            field.width(),
            field.row_top(row) + inset,
            rules.enemy_width,
            field.cell_height() - 2 * inset,
        );
        Self {
            entity: Entity::new(id, bounds, rules.enemy_health),
            tier,
            speed: rules.speed(tier),
        }
    }

    pub(crate) fn advance(&mut self) {
        self.entity.bounds = self.entity.bounds.shifted_x(-self.speed);
    }

    /// Applies damage and reports whether the enemy ran out of health.
    pub(crate) fn take_damage(&mut self, damage: u32) -> bool {
        self.entity.health = self.entity.health.saturating_sub(damage);
        self.entity.health == 0
    }

    pub(crate) fn has_breached(&self) -> bool {
        self.entity.bounds.x() <= 0
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.entity.id,
            bounds: self.entity.bounds,
            health: self.entity.health,
            max_health: self.entity.max_health,
            speed: self.tier,
        }
    }

    pub(crate) fn entity_snapshot(&self) -> EntitySnapshot {
        self.entity.snapshot(EntityKind::Enemy)
    }
}

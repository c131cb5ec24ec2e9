#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pairs projectiles with the enemies they overlap.

use lane_defence_core::{Command, EnemySnapshot, EnemyView, EntityId, GameState, ProjectileView};

/// Collision system that queues hit resolution commands.
#[derive(Debug, Default)]
pub struct Collision {
    scratch: Vec<Command>,
}

impl Collision {
    /// Creates a new collision system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits one `Command::ResolveHit` per projectile touching at least one enemy.
    ///
    /// Projectiles are visited in id order and every overlapping enemy is
    /// listed, so a single projectile may damage several enemies at once.
    pub fn handle(
        &mut self,
        game_state: GameState,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if game_state != GameState::Playing {
            return;
        }

        if projectiles.is_empty() || enemies.is_empty() {
            return;
        }

        self.scratch.clear();

        for projectile in projectiles.iter() {
            let hits = overlapping(enemies, |enemy| projectile.bounds.overlaps(&enemy.bounds));
            if hits.is_empty() {
                continue;
            }
            self.scratch.push(Command::ResolveHit {
                projectile: projectile.id,
                enemies: hits,
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn overlapping(enemies: &EnemyView, touches: impl Fn(&EnemySnapshot) -> bool) -> Vec<EntityId> {
    enemies
        .iter()
        .filter(|enemy| touches(enemy))
        .map(|enemy| enemy.id)
        .collect()
}

use lane_defence_core::{
    Command, EnemySnapshot, EnemyView, EntityId, GameState, PixelRect, ProjectileSnapshot,
    ProjectileView, SpeedTier,
};
use lane_defence_system_collision::Collision;
use proptest::prelude::*;

fn projectiles() -> impl Strategy<Value = Vec<ProjectileSnapshot>> {
    prop::collection::vec((0..1100i32, 180..780i32), 0..12).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(index, (x, y))| ProjectileSnapshot {
                id: EntityId::new(index as u32 * 2 + 1),
                bounds: PixelRect::new(x, y, 10, 10),
            })
            .collect()
    })
}

fn enemies() -> impl Strategy<Value = Vec<EnemySnapshot>> {
    prop::collection::vec((0..1100i32, 0..5i32), 0..12).prop_map(|points| {
        points
            .into_iter()
            .enumerate()
            .map(|(index, (x, row))| EnemySnapshot {
                id: EntityId::new(index as u32 * 2 + 2),
                bounds: PixelRect::new(x, 210 + row * 113, 40, 93),
                health: 100,
                max_health: 100,
                speed: SpeedTier::Slow,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn reported_hits_match_brute_force_overlap(
        projectiles in projectiles(),
        enemies in enemies(),
    ) {
        let mut expected = Vec::new();
        for projectile in &projectiles {
            let hits: Vec<EntityId> = enemies
                .iter()
                .filter(|enemy| projectile.bounds.overlaps(&enemy.bounds))
                .map(|enemy| enemy.id)
                .collect();
            if !hits.is_empty() {
                expected.push(Command::ResolveHit {
                    projectile: projectile.id,
                    enemies: hits,
                });
            }
        }

        let mut system = Collision::new();
        let mut out = Vec::new();
        system.handle(
            GameState::Playing,
            &ProjectileView::from_snapshots(projectiles),
            &EnemyView::from_snapshots(enemies),
            &mut out,
        );

        prop_assert_eq!(out, expected);
    }
}

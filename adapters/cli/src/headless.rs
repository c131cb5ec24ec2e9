//! Windowless simulation runs.

use lane_defence_core::{CellCoord, Command, Event, GameState, Rules};
use lane_defence_session::Session;
use lane_defence_world::query;
use tracing::info;

/// Tallies gathered over a headless run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct HeadlessSummary {
    pub(crate) ticks: u64,
    pub(crate) defenders: usize,
    pub(crate) shots: u32,
    pub(crate) spawned: u32,
    pub(crate) killed: u32,
    pub(crate) breached: bool,
}

/// Starts a round, fills the first column with the selected defender while
/// currency allows and simulates up to `ticks` ticks.
///
/// The run stops early when an enemy breaches the field.
pub(crate) fn run(rules: Rules, seed: u64, ticks: u64) -> HeadlessSummary {
    let rows = rules.rows;
    let mut session = Session::new(rules, seed);
    let _ = session.apply(Command::StartGame);
    for row in 0..rows {
        let _ = session.apply(Command::PlaceDefender {
            cell: CellCoord::new(0, row),
        });
    }

    let mut summary = HeadlessSummary {
        defenders: query::defender_count(session.world()),
        ..HeadlessSummary::default()
    };

    while summary.ticks < ticks && session.game_state() == GameState::Playing {
        summary.ticks += 1;
        for event in session.update() {
            match event {
                Event::ProjectileFired { .. } => summary.shots += 1,
                Event::EnemySpawned { .. } => summary.spawned += 1,
                Event::EnemyKilled { .. } => summary.killed += 1,
                Event::Breached { .. } => summary.breached = true,
                _ => {}
            }
        }
    }
    let _ = session.take_cues();

    info!(
        ticks = summary.ticks,
        defenders = summary.defenders,
        shots = summary.shots,
        spawned = summary.spawned,
        killed = summary.killed,
        breached = summary.breached,
        "headless run finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ticks_only_sets_up_the_round() {
        let summary = run(Rules::default(), 1, 0);

        assert_eq!(
            summary,
            HeadlessSummary {
                defenders: 3,
                ..HeadlessSummary::default()
            }
        );
    }

    #[test]
    fn spawns_follow_the_interval() {
        let summary = run(Rules::default(), 5, 350);

        assert_eq!(summary.ticks, 350);
        assert_eq!(summary.spawned, 3);
        assert_eq!(summary.shots, 3 * 7);
        assert!(!summary.breached);
    }

    #[test]
    fn undefended_rounds_end_in_a_breach() {
        let rules = Rules {
            starting_currency: 0,
            ..Rules::default()
        };
        let summary = run(rules, 9, 5_000);

        assert!(summary.breached);
        assert_eq!(summary.defenders, 0);
        // First spawn lands on tick 100 and walks 1024 pixels at one per tick.
        assert_eq!(summary.ticks, 1_124);
    }

    #[test]
    fn equal_seeds_produce_equal_summaries() {
        assert_eq!(run(Rules::default(), 42, 2_000), run(Rules::default(), 42, 2_000));
    }
}

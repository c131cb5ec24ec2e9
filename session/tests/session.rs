use glam::Vec2;
use lane_defence_core::{
    CellCoord, Command, Cue, DefenderKind, Event, GameState, PlacementError, Rules, SpeedTier,
};
use lane_defence_rendering::{DrawPrimitive, FrameInput, InputEvent, PointerButton};
use lane_defence_session::{ButtonAction, Session};
use lane_defence_world::query;

const START_BUTTON: Vec2 = Vec2::new(500.0, 340.0);
const SHOP_BUTTON: Vec2 = Vec2::new(500.0, 400.0);
const EXIT_BUTTON: Vec2 = Vec2::new(500.0, 460.0);
const FIRST_CELL: Vec2 = Vec2::new(56.0, 256.0);

fn press(session: &mut Session, position: Vec2) -> Vec<Event> {
    session.handle_input(InputEvent::PointerPressed {
        button: PointerButton::Primary,
        position,
    })
}

fn started() -> Session {
    let mut session = Session::new(Rules::default(), 7);
    let _ = press(&mut session, START_BUTTON);
    assert_eq!(session.game_state(), GameState::Playing);
    session
}

fn run(session: &mut Session, ticks: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(session.update());
    }
    events
}

#[test]
fn first_projectile_crosses_the_field_and_expires() {
    let mut session = started();
    let _ = press(&mut session, FIRST_CELL);
    assert_eq!(session.currency(), 100);

    let _ = run(&mut session, 51);
    let projectiles = query::projectile_view(session.world()).into_vec();
    assert_eq!(projectiles.len(), 1, "second shot lands on tick 52");
    let first = projectiles[0];
    assert_eq!(first.bounds.x(), 51 + 10 * 51);

    for tick in 52..98 {
        let _ = session.update();
        assert!(
            query::projectile_view(session.world())
                .iter()
                .any(|projectile| projectile.id == first.id),
            "projectile removed early on tick {tick}"
        );
    }

    let events = session.update();
    assert!(events.contains(&Event::ProjectileExpired {
        projectile: first.id
    }));
    assert!(query::projectile_view(session.world())
        .iter()
        .all(|projectile| projectile.id != first.id));
}

#[test]
fn shots_are_fifty_one_ticks_apart() {
    let mut session = started();
    let _ = press(&mut session, FIRST_CELL);

    let mut fired_on = Vec::new();
    for tick in 1..=200u32 {
        if session
            .update()
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. }))
        {
            fired_on.push(tick);
        }
    }

    assert_eq!(fired_on, vec![1, 52, 103, 154]);
    assert_eq!(
        session
            .take_cues()
            .iter()
            .filter(|cue| **cue == Cue::Attack)
            .count(),
        4
    );
}

#[test]
fn breach_returns_to_menu_with_a_fresh_round() {
    let mut session = started();
    let _ = press(&mut session, FIRST_CELL);
    let _ = session.apply(Command::SpawnEnemy {
        row: 4,
        speed: SpeedTier::Slow,
    });

    let mut ticks = 0;
    let mut breached = false;
    while session.game_state() == GameState::Playing {
        ticks += 1;
        assert!(ticks <= 1024, "slow enemy must breach within 1024 ticks");
        breached |= session
            .update()
            .iter()
            .any(|event| matches!(event, Event::Breached { .. }));
    }

    assert!(breached);
    assert_eq!(session.game_state(), GameState::Menu);
    assert_eq!(session.currency(), 150);
    assert_eq!(session.spawn_count(), 0);
    assert_eq!(session.spawn_timer(), 0);
    assert_eq!(query::defender_count(session.world()), 0);
    assert!(query::projectile_view(session.world()).is_empty());
    assert!(query::enemy_view(session.world()).is_empty());
    assert!(session.take_cues().contains(&Cue::GameOver));
}

#[test]
fn two_projectiles_on_one_enemy_kill_it_once_and_both_disappear() {
    let rules = Rules {
        enemy_health: 10,
        ..Rules::default()
    };
    let mut session = Session::new(rules, 7);
    let _ = press(&mut session, START_BUTTON);
    let _ = press(&mut session, FIRST_CELL);
    let _ = session.apply(Command::SpawnEnemy {
        row: 0,
        speed: SpeedTier::Slow,
    });
    let _ = run(&mut session, 11);
    // Fired eleven ticks later from one column ahead, this shot leads the first by 3 px.
    let _ = press(&mut session, Vec2::new(169.0, 256.0));
    assert_eq!(query::defender_count(session.world()), 2);

    let early = run(&mut session, 87 - 11);
    assert!(!early
        .iter()
        .any(|event| matches!(event, Event::ProjectileResolved { .. })));
    let leading: Vec<_> = query::projectile_view(session.world())
        .iter()
        .filter(|projectile| projectile.bounds.x() > 900)
        .map(|projectile| projectile.id)
        .collect();
    assert_eq!(leading.len(), 2, "both first shots are closing in");

    let events = session.update();
    let resolved: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::ProjectileResolved { projectile, hits } => Some((*projectile, *hits)),
            _ => None,
        })
        .collect();
    assert_eq!(resolved, vec![(leading[0], 1), (leading[1], 0)]);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::EnemyKilled { .. }))
            .count(),
        1
    );
    assert!(query::enemy_view(session.world()).is_empty());
    assert!(query::projectile_view(session.world())
        .iter()
        .all(|projectile| !leading.contains(&projectile.id)));
}

#[test]
fn spawner_runs_only_while_playing() {
    let mut session = Session::new(Rules::default(), 3);
    let _ = run(&mut session, 250);
    assert_eq!(session.spawn_timer(), 0);
    assert_eq!(session.spawn_count(), 0);

    let _ = press(&mut session, START_BUTTON);
    let events = run(&mut session, 250);
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count();
    assert_eq!(spawned, 2);
    assert_eq!(session.spawn_count(), 2);
    assert_eq!(session.spawn_timer(), 50);
}

#[test]
fn shop_selection_is_cleared_by_every_round_reset() {
    let mut session = Session::new(Rules::default(), 1);
    let _ = press(&mut session, SHOP_BUTTON);
    assert_eq!(session.game_state(), GameState::Shop);
    assert_eq!(
        session
            .buttons()
            .iter()
            .map(|button| button.action)
            .collect::<Vec<_>>(),
        vec![
            ButtonAction::Select(DefenderKind::Attacker),
            ButtonAction::Select(DefenderKind::Blocker),
            ButtonAction::BackToMenu,
        ]
    );

    let events = press(&mut session, SHOP_BUTTON);
    assert_eq!(
        events,
        vec![Event::DefenderSelected {
            kind: DefenderKind::Blocker
        }]
    );
    let _ = press(&mut session, EXIT_BUTTON);
    assert_eq!(session.game_state(), GameState::Menu);
    assert!(!session.exit_requested());
    assert_eq!(session.selected_defender(), DefenderKind::Blocker);

    let _ = press(&mut session, START_BUTTON);
    assert_eq!(session.selected_defender(), DefenderKind::Attacker);
    let _ = press(&mut session, FIRST_CELL);
    assert_eq!(session.currency(), 100);

    let events = press(&mut session, Vec2::new(100.0, 300.0));
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            kind: DefenderKind::Attacker,
            cell: CellCoord::new(0, 0),
            reason: PlacementError::Occupied,
        }]
    );
    assert_eq!(session.currency(), 100);

    let _ = session.apply(Command::SpawnEnemy {
        row: 4,
        speed: SpeedTier::Fast,
    });
    let mut ticks = 0;
    while session.game_state() == GameState::Playing {
        ticks += 1;
        assert!(ticks <= 512, "fast enemy must breach within 512 ticks");
        let _ = session.update();
    }
    assert_eq!(session.selected_defender(), DefenderKind::Attacker);

    let _ = press(&mut session, START_BUTTON);
    assert_eq!(session.selected_defender(), DefenderKind::Attacker);
}

#[test]
fn clicks_above_the_field_or_on_the_sliver_are_ignored() {
    let mut session = started();

    assert!(press(&mut session, Vec2::new(300.0, 150.0)).is_empty());
    assert!(press(&mut session, Vec2::new(1020.0, 300.0)).is_empty());
    assert_eq!(session.currency(), 150);
}

#[test]
fn secondary_button_never_places() {
    let mut session = started();
    let events = session.handle_input(InputEvent::PointerPressed {
        button: PointerButton::Secondary,
        position: FIRST_CELL,
    });

    assert!(events.is_empty());
    assert_eq!(query::defender_count(session.world()), 0);
}

#[test]
fn exit_button_and_quit_request_end_the_loop() {
    let mut session = Session::new(Rules::default(), 1);
    let _ = press(&mut session, EXIT_BUTTON);
    assert!(session.exit_requested());

    let mut session = Session::new(Rules::default(), 1);
    let output = session.frame(FrameInput {
        events: vec![InputEvent::QuitRequested],
    });
    assert!(output.exit_requested);
}

#[test]
fn menu_frame_shows_title_and_hovered_button() {
    let mut session = Session::new(Rules::default(), 1);
    let output = session.frame(FrameInput {
        events: vec![InputEvent::PointerMoved(START_BUTTON)],
    });

    assert!(output.cues.is_empty());
    assert!(output.frame.primitives.iter().any(|primitive| matches!(
        primitive,
        DrawPrimitive::Text { text, .. } if text == "Lane Defence"
    )));
    assert!(session.buttons()[0].hovered);
    assert!(!session.buttons()[1].hovered);
}

#[test]
fn playing_frame_draws_hud_and_entities() {
    let mut session = started();
    let _ = press(&mut session, FIRST_CELL);
    let output = session.frame(FrameInput::default());

    assert_eq!(output.cues, vec![Cue::Attack]);
    let primitives = &output.frame.primitives;
    assert!(primitives.iter().any(|primitive| matches!(
        primitive,
        DrawPrimitive::Text { text, .. } if text == "Sun: 100"
    )));
    assert!(primitives.iter().any(|primitive| matches!(
        primitive,
        DrawPrimitive::Text { text, .. } if text == "Selected: Attacker"
    )));
    let circles = primitives
        .iter()
        .filter(|primitive| matches!(primitive, DrawPrimitive::Circle { .. }))
        .count();
    assert_eq!(circles, 1);
}

#[test]
fn identical_seeds_replay_identically() {
    fn replay(seed: u64) -> Vec<Event> {
        let rules = Rules {
            starting_currency: 250,
            ..Rules::default()
        };
        let mut session = Session::new(rules, seed);
        let _ = press(&mut session, START_BUTTON);
        for row in 0..5 {
            let _ = press(&mut session, Vec2::new(56.0, 256.0 + 113.0 * row as f32));
        }
        assert_eq!(session.currency(), 0);
        run(&mut session, 1_500)
    }

    let first = replay(99);
    let second = replay(99);
    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .iter()
        .any(|event| matches!(event, Event::EnemyKilled { .. })));
}

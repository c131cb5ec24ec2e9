//! Frame composition for every screen of the game.

use glam::Vec2;
use lane_defence_core::{DefenderKind, EntityKind, EntitySnapshot, GameState, PixelRect, Rules};
use lane_defence_rendering::{Color, DrawPrimitive, Frame, TextAnchor};
use lane_defence_world::{query, World};

use crate::menu::Button;

const BLACK: Color = Color::from_rgb_u8(0, 0, 0);
const WHITE: Color = Color::from_rgb_u8(255, 255, 255);
const RED: Color = Color::from_rgb_u8(255, 0, 0);
const YELLOW: Color = Color::from_rgb_u8(255, 255, 0);
const SKY_BLUE: Color = Color::from_rgb_u8(135, 206, 235);
const GREEN: Color = Color::from_rgb_u8(34, 139, 34);
const DARK_GREEN: Color = Color::from_rgb_u8(0, 100, 0);
const BROWN: Color = Color::from_rgb_u8(139, 69, 19);
const DARK_RED: Color = Color::from_rgb_u8(139, 0, 0);
const GREY: Color = Color::from_rgb_u8(169, 169, 169);

const TITLE_SIZE: f32 = 36.0;
const BUTTON_TEXT_SIZE: f32 = 30.0;
const HEALTH_BAR_HEIGHT: f32 = 5.0;
const HEALTH_BAR_GAP: f32 = 10.0;

/// Builds the frame for whatever screen is active.
pub(crate) fn compose(world: &World, buttons: &[Button]) -> Frame {
    let mut frame = Frame::new(SKY_BLUE);
    let rules = query::rules(world);

    match query::game_state(world) {
        GameState::Menu => {
            title(
                &mut frame,
                lane_defence_core::WINDOW_TITLE,
                point(rules.screen_width / 2, rules.screen_height / 2 - 150),
            );
            draw_buttons(&mut frame, buttons);
        }
        GameState::Shop => {
            title(&mut frame, "Shop", point(rules.screen_width / 2, 100));
            draw_buttons(&mut frame, buttons);
            text(
                &mut frame,
                selected_label(query::selected_defender(world)),
                point(rules.screen_width / 2, rules.screen_height / 2 + 130),
                TextAnchor::TopCenter,
            );
        }
        GameState::Playing => draw_field(&mut frame, world, rules),
    }

    frame
}

fn draw_field(frame: &mut Frame, world: &World, rules: &Rules) {
    let field = query::field(world);
    let lawn = field.bounds();
    frame.push(DrawPrimitive::Rectangle {
        origin: point(lawn.x(), lawn.y()),
        size: point(lawn.width(), lawn.height()),
        color: GREEN,
    });

    let rows = i32::try_from(field.rows()).unwrap_or(0);
    for row in 0..=rows {
        let y = field.y_offset() + row * field.cell_height();
        grid_line(frame, point(0, y), point(rules.screen_width, y));
    }
    let columns = i32::try_from(field.columns()).unwrap_or(0);
    for column in 0..=columns {
        let x = column * field.cell_width();
        grid_line(frame, point(x, field.y_offset()), point(x, rules.screen_height));
    }

    text(
        frame,
        format!("Sun: {}", query::currency(world)),
        point(10, 10),
        TextAnchor::TopLeft,
    );
    text(
        frame,
        selected_label(query::selected_defender(world)),
        point(200, 10),
        TextAnchor::TopLeft,
    );

    let entities = query::entity_view(world);
    for entity in &entities {
        draw_entity(frame, entity);
    }
    for entity in entities
        .iter()
        .filter(|entity| entity.kind == EntityKind::Enemy)
    {
        health_bar(frame, entity);
    }
}

fn draw_entity(frame: &mut Frame, entity: &EntitySnapshot) {
    let bounds = entity.bounds;
    let fill = match entity.kind {
        EntityKind::Attacker => DARK_GREEN,
        EntityKind::Blocker => BROWN,
        EntityKind::Enemy => DARK_RED,
        EntityKind::Projectile => {
            let (x, y) = bounds.center();
            frame.push(DrawPrimitive::Circle {
                center: point(x, y),
                radius: bounds.width() as f32 / 2.0,
                color: YELLOW,
            });
            return;
        }
    };
    rectangle(frame, bounds, fill);
}

fn health_bar(frame: &mut Frame, enemy: &EntitySnapshot) {
    if enemy.max_health == 0 {
        return;
    }
    let bounds = enemy.bounds;
    let origin = Vec2::new(bounds.x() as f32, bounds.y() as f32 - HEALTH_BAR_GAP);
    let width = bounds.width() as f32;
    let fraction = enemy.health as f32 / enemy.max_health as f32;

    frame.push(DrawPrimitive::Rectangle {
        origin,
        size: Vec2::new(width * fraction, HEALTH_BAR_HEIGHT),
        color: RED,
    });
    frame.push(DrawPrimitive::RectangleOutline {
        origin,
        size: Vec2::new(width, HEALTH_BAR_HEIGHT),
        thickness: 1.0,
        color: BLACK,
    });
}

fn draw_buttons(frame: &mut Frame, buttons: &[Button]) {
    for button in buttons {
        let fill = if button.hovered { WHITE } else { GREY };
        rectangle(frame, button.rect, fill);
        frame.push(DrawPrimitive::RectangleOutline {
            origin: point(button.rect.x(), button.rect.y()),
            size: point(button.rect.width(), button.rect.height()),
            thickness: 2.0,
            color: BLACK,
        });
        let (x, y) = button.rect.center();
        frame.push(DrawPrimitive::Text {
            text: button.label.clone(),
            position: point(x, y),
            size: BUTTON_TEXT_SIZE,
            color: BLACK,
            anchor: TextAnchor::Center,
        });
    }
}

fn title(frame: &mut Frame, content: &str, position: Vec2) {
    frame.push(DrawPrimitive::Text {
        text: content.to_owned(),
        position,
        size: TITLE_SIZE,
        color: DARK_GREEN,
        anchor: TextAnchor::Center,
    });
}

fn text(frame: &mut Frame, content: String, position: Vec2, anchor: TextAnchor) {
    frame.push(DrawPrimitive::Text {
        text: content,
        position,
        size: TITLE_SIZE,
        color: BLACK,
        anchor,
    });
}

fn rectangle(frame: &mut Frame, rect: PixelRect, color: Color) {
    frame.push(DrawPrimitive::Rectangle {
        origin: point(rect.x(), rect.y()),
        size: point(rect.width(), rect.height()),
        color,
    });
}

fn grid_line(frame: &mut Frame, from: Vec2, to: Vec2) {
    frame.push(DrawPrimitive::Line {
        from,
        to,
        thickness: 1.0,
        color: WHITE,
    });
}

fn selected_label(kind: DefenderKind) -> String {
    format!("Selected: {}", kind.label())
}

fn point(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32, y as f32)
}

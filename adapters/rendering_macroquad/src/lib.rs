#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Lane Defence.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! The crate therefore depends on macroquad without its default `audio`
//! feature; enabling this crate's `audio` feature turns playback back on.

mod pacing;
mod sound;

use self::{
    pacing::{FpsCounter, FpsMetrics, FrameBreakdown, FramePacer, TARGET_FPS},
    sound::CuePlayer,
};
use anyhow::{Context, Result};
use glam::Vec2;
use lane_defence_rendering::{
    DrawPrimitive, Frame, FrameInput, FrameOutput, InputEvent, PointerButton, Presentation,
    RenderingBackend, TextAnchor,
};
use macroquad::input::{
    is_key_pressed, is_mouse_button_pressed, is_quit_requested, mouse_position, prevent_quit,
    KeyCode, MouseButton,
};
use std::{sync::mpsc, time::Instant};
use tracing::info;

/// Turns raw per-frame pointer and keyboard observations into input events.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    last_position: Option<Vec2>,
}

impl PointerTracker {
    /// Builds the frame input for one frame of observations.
    ///
    /// A move event is only reported when the pointer changed position since
    /// the previous frame and always precedes any press at the new position.
    pub fn observe(
        &mut self,
        position: Vec2,
        primary_pressed: bool,
        secondary_pressed: bool,
        quit_pressed: bool,
    ) -> FrameInput {
        let mut events = Vec::new();

        if self.last_position != Some(position) {
            self.last_position = Some(position);
            events.push(InputEvent::PointerMoved(position));
        }
        if primary_pressed {
            events.push(InputEvent::PointerPressed {
                button: PointerButton::Primary,
                position,
            });
        }
        if secondary_pressed {
            events.push(InputEvent::PointerPressed {
                button: PointerButton::Secondary,
                position,
            });
        }
        if quit_pressed {
            events.push(InputEvent::QuitRequested);
        }

        FrameInput { events }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as the frame pacer allows.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update: F) -> Result<()>
    where
        F: FnMut(FrameInput) -> FrameOutput + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            width,
            height,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(width).context("window width exceeds platform limits")?,
            window_height: i32::try_from(height)
                .context("window height exceeds platform limits")?,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (init_sender, init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut init_sender = Some(init_sender);
            // Window close is routed through the session like Escape.
            prevent_quit();

            let cue_player = match CuePlayer::load()
                .await
                .context("failed to initialise cue playback")
            {
                Ok(player) => player,
                Err(error) => {
                    if let Some(sender) = init_sender.take() {
                        let _ = sender.send(Err(error));
                    }
                    return;
                }
            };

            if let Some(sender) = init_sender.take() {
                let _ = sender.send(Ok(()));
            }

            let mut pointer = PointerTracker::default();
            let mut pacer = FramePacer::new(TARGET_FPS);
            let mut fps_counter = FpsCounter::default();

            loop {
                let frame_input = gather_frame_input(&mut pointer);

                let simulation_start = Instant::now();
                let FrameOutput {
                    frame,
                    cues,
                    exit_requested,
                } = update(frame_input);
                let simulation = simulation_start.elapsed();

                for cue in cues {
                    cue_player.play(cue);
                }

                let render_start = Instant::now();
                draw_frame(&frame);
                let render = render_start.elapsed();

                if exit_requested {
                    info!("frame loop finished");
                    break;
                }

                macroquad::window::next_frame().await;

                let metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: pacer.wait(),
                    simulation,
                    render,
                });
                if show_fps {
                    if let Some(metrics) = metrics {
                        log_fps(metrics);
                    }
                }
            }
        });

        init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn gather_frame_input(pointer: &mut PointerTracker) -> FrameInput {
    let (x, y) = mouse_position();
    let primary = is_mouse_button_pressed(MouseButton::Left);
    let secondary = is_mouse_button_pressed(MouseButton::Right);
    let quit = quit_observed(is_key_pressed(KeyCode::Escape), is_quit_requested());
    pointer.observe(Vec2::new(x, y), primary, secondary, quit)
}

/// Escape and the window's close button both ask the session to quit.
fn quit_observed(escape_pressed: bool, close_requested: bool) -> bool {
    escape_pressed || close_requested
}

fn log_fps(metrics: FpsMetrics) {
    info!(
        fps = metrics.per_second,
        fps_10s = metrics.trailing_ten_seconds,
        sim_ms = metrics.avg_simulation.as_secs_f64() * 1_000.0,
        render_ms = metrics.avg_render.as_secs_f64() * 1_000.0,
        "frame timing"
    );
}

fn draw_frame(frame: &Frame) {
    macroquad::window::clear_background(to_macroquad_color(frame.clear_color));

    for primitive in &frame.primitives {
        match primitive {
            DrawPrimitive::Rectangle {
                origin,
                size,
                color,
            } => macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                size.x,
                size.y,
                to_macroquad_color(*color),
            ),
            DrawPrimitive::RectangleOutline {
                origin,
                size,
                thickness,
                color,
            } => macroquad::shapes::draw_rectangle_lines(
                origin.x,
                origin.y,
                size.x,
                size.y,
                *thickness,
                to_macroquad_color(*color),
            ),
            DrawPrimitive::Line {
                from,
                to,
                thickness,
                color,
            } => macroquad::shapes::draw_line(
                from.x,
                from.y,
                to.x,
                to.y,
                *thickness,
                to_macroquad_color(*color),
            ),
            DrawPrimitive::Circle {
                center,
                radius,
                color,
            } => macroquad::shapes::draw_circle(
                center.x,
                center.y,
                *radius,
                to_macroquad_color(*color),
            ),
            DrawPrimitive::Text {
                text,
                position,
                size,
                color,
                anchor,
            } => {
                let dimensions =
                    macroquad::text::measure_text(text, None, size.round() as u16, 1.0);
                let baseline = text_baseline(
                    *position,
                    *anchor,
                    Vec2::new(dimensions.width, dimensions.height),
                    dimensions.offset_y,
                );
                macroquad::text::draw_text(
                    text,
                    baseline.x,
                    baseline.y,
                    *size,
                    to_macroquad_color(*color),
                );
            }
        }
    }
}

/// Converts an anchored text position into the baseline origin macroquad draws from.
fn text_baseline(position: Vec2, anchor: TextAnchor, extent: Vec2, offset_y: f32) -> Vec2 {
    match anchor {
        TextAnchor::TopLeft => Vec2::new(position.x, position.y + offset_y),
        TextAnchor::TopCenter => Vec2::new(position.x - extent.x / 2.0, position.y + offset_y),
        TextAnchor::Center => Vec2::new(
            position.x - extent.x / 2.0,
            position.y - extent.y / 2.0 + offset_y,
        ),
    }
}

fn to_macroquad_color(color: lane_defence_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_rendering::Color;

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.1, 0.2, 0.3, 0.4)
        );
    }

    #[test]
    fn window_close_counts_as_a_quit_request() {
        assert!(quit_observed(false, true));
        assert!(quit_observed(true, false));
        assert!(!quit_observed(false, false));

        let input =
            PointerTracker::default().observe(Vec2::ZERO, false, false, quit_observed(false, true));
        assert_eq!(input.events.last(), Some(&InputEvent::QuitRequested));
    }

    #[test]
    fn top_left_text_drops_to_the_baseline() {
        let baseline = text_baseline(
            Vec2::new(10.0, 10.0),
            TextAnchor::TopLeft,
            Vec2::new(80.0, 20.0),
            16.0,
        );

        assert_eq!(baseline, Vec2::new(10.0, 26.0));
    }

    #[test]
    fn centred_text_is_balanced_around_its_anchor() {
        let extent = Vec2::new(120.0, 24.0);
        let centred = text_baseline(Vec2::new(512.0, 234.0), TextAnchor::Center, extent, 18.0);
        let top_centred = text_baseline(
            Vec2::new(512.0, 514.0),
            TextAnchor::TopCenter,
            extent,
            18.0,
        );

        assert_eq!(centred, Vec2::new(452.0, 240.0));
        assert_eq!(top_centred, Vec2::new(452.0, 532.0));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and audio contracts for Lane Defence adapters.

pub mod audio;

use anyhow::Result as AnyResult;
use glam::Vec2;
use lane_defence_core::Cue;
use std::{error::Error, fmt};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Point of a text string that its position refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Position is the top-left corner of the text box.
    #[default]
    TopLeft,
    /// Position is the centre of the text box.
    Center,
    /// Position is the middle of the top edge.
    TopCenter,
}

/// Single drawing instruction expressed in screen pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawPrimitive {
    /// Filled axis-aligned rectangle.
    Rectangle {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Rectangle outline of the given stroke thickness.
    RectangleOutline {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Stroke thickness in pixels.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Straight line segment.
    Line {
        /// Segment start.
        from: Vec2,
        /// Segment end.
        to: Vec2,
        /// Stroke thickness in pixels.
        thickness: f32,
        /// Stroke color.
        color: Color,
    },
    /// Filled circle.
    Circle {
        /// Circle centre.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// Text label.
    Text {
        /// Content to render.
        text: String,
        /// Anchor position.
        position: Vec2,
        /// Font size in pixels.
        size: f32,
        /// Glyph color.
        color: Color,
        /// Which point of the text box `position` names.
        anchor: TextAnchor,
    },
}

/// Ordered list of primitives making up one rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Solid color used to clear the surface before drawing.
    pub clear_color: Color,
    /// Primitives drawn in order, later entries on top.
    pub primitives: Vec<DrawPrimitive>,
}

impl Frame {
    /// Creates an empty frame cleared to `clear_color`.
    #[must_use]
    pub fn new(clear_color: Color) -> Self {
        Self {
            clear_color,
            primitives: Vec::new(),
        }
    }

    /// Appends a primitive on top of everything drawn so far.
    pub fn push(&mut self, primitive: DrawPrimitive) {
        self.primitives.push(primitive);
    }

    /// Number of primitives in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Reports whether nothing is drawn besides the clear color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Pointer button reported by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button or primary touch.
    Primary,
    /// Right mouse button.
    Secondary,
}

/// Discrete input observed by the adapter since the previous frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a new screen position.
    PointerMoved(Vec2),
    /// Pointer button went down at a screen position.
    PointerPressed {
        /// Button that was pressed.
        button: PointerButton,
        /// Screen position of the press.
        position: Vec2,
    },
    /// Window close or the quit key was requested.
    QuitRequested,
}

/// Input snapshot gathered by adapters before updating the session.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Events in the order they were observed.
    pub events: Vec<InputEvent>,
}

/// Result of advancing the session by one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    /// Primitives to present this frame.
    pub frame: Frame,
    /// Audio cues raised while simulating the frame.
    pub cues: Vec<Cue>,
    /// Whether the frame loop should end after presenting.
    pub exit_requested: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RenderingError::InvalidWindowSize`] when either dimension is zero.
    pub fn new<T>(window_title: T, width: u32, height: u32) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidWindowSize { width, height });
        }

        Ok(Self {
            window_title: window_title.into(),
            width,
            height,
        })
    }
}

/// Rendering backend capable of presenting Lane Defence frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update` closure receives the input captured by the
    /// adapter for one frame and returns the frame to draw alongside any
    /// audio cues to play.
    fn run<F>(self, presentation: Presentation, update: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput) -> FrameOutput + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Window dimensions must be positive.
    InvalidWindowSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindowSize { width, height } => {
                write!(
                    f,
                    "window dimensions must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_accepts_positive_dimensions() {
        let presentation =
            Presentation::new("Lane Defence", 1024, 768).expect("positive size should succeed");

        assert_eq!(presentation.window_title, "Lane Defence");
        assert_eq!((presentation.width, presentation.height), (1024, 768));
    }

    #[test]
    fn presentation_rejects_zero_dimensions_without_panicking() {
        let error = Presentation::new("Lane Defence", 0, 768)
            .expect_err("zero width must be rejected");

        assert_eq!(
            error,
            RenderingError::InvalidWindowSize {
                width: 0,
                height: 768
            }
        );
        assert_eq!(
            error.to_string(),
            "window dimensions must be positive (received 0x768)"
        );
    }

    #[test]
    fn rgb_bytes_map_to_unit_channels() {
        let color = Color::from_rgb_u8(255, 0, 51);

        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn frame_keeps_primitives_in_push_order() {
        let mut frame = Frame::new(Color::from_rgb_u8(0, 0, 0));
        assert!(frame.is_empty());

        frame.push(DrawPrimitive::Circle {
            center: Vec2::new(5.0, 5.0),
            radius: 5.0,
            color: Color::from_rgb_u8(255, 255, 0),
        });
        frame.push(DrawPrimitive::Line {
            from: Vec2::ZERO,
            to: Vec2::new(10.0, 0.0),
            thickness: 1.0,
            color: Color::from_rgb_u8(0, 0, 0),
        });

        assert_eq!(frame.len(), 2);
        assert!(matches!(frame.primitives[0], DrawPrimitive::Circle { .. }));
        assert!(matches!(frame.primitives[1], DrawPrimitive::Line { .. }));
    }
}

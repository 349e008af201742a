//! Robot marker drawn over the map
//!
//! A marker is one of three primitives (image, arrow, shape). It carries the
//! visual state the pose projector writes and a small press-event
//! subscription list that the rendering layer feeds from its hit testing.

pub mod pulse;

use self::pulse::PulseAnimation;
use crate::common::{Callback, Color, ListenerId, Listeners};
use crate::config::{BaseType, MarkerConfig};

/// Fill used when none is configured
pub const DEFAULT_FILL: Color = Color::rgba(255, 128, 0, 0.66);

pub const DEFAULT_IMAGE_SIZE: f64 = 2.5;
pub const DEFAULT_ARROW_SIZE: f64 = 10.0;
pub const DEFAULT_SHAPE_SIZE: f64 = 25.0;
/// Stroke width of arrow and shape markers when none is configured
pub const DEFAULT_STROKE: f64 = 1.0;

/// Which primitive renders the robot
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Image { path: String },
    Arrow,
    Shape { base: BaseType, use_heading: bool },
}

/// Size and colours of a marker
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub size: f64,
    pub stroke_size: f64,
    pub stroke_color: Option<Color>,
    pub fill_color: Option<Color>,
}

/// Position, rotation, scale and visibility on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerVisualState {
    pub x: f64,
    pub y: f64,
    /// Degrees in the display's rotation convention
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub visible: bool,
}

impl Default for MarkerVisualState {
    fn default() -> Self {
        MarkerVisualState {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: false,
        }
    }
}

/// Press on the marker, in stage coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressEvent {
    pub stage_x: f64,
    pub stage_y: f64,
}

/// The robot marker
#[derive(Debug)]
pub struct RobotMarker {
    kind: MarkerKind,
    style: MarkerStyle,
    state: MarkerVisualState,
    pulse: PulseAnimation,
    pressed: Listeners<PressEvent>,
}

impl RobotMarker {
    /// Build the marker selected by `config`.
    ///
    /// An image path wins over `use_triangle`; otherwise a shape is used.
    /// Image and shape markers start at the inverse of `stage_scale` so they
    /// keep a constant on-screen size; the arrow starts unscaled.
    pub fn from_config(config: &MarkerConfig, stage_scale: (f64, f64)) -> Self {
        let inverse = (1.0 / stage_scale.0, 1.0 / stage_scale.1);
        let fill = Some(config.fill_color.unwrap_or(DEFAULT_FILL));

        let (kind, style, scale) = if let Some(path) = &config.image {
            (
                MarkerKind::Image { path: path.clone() },
                MarkerStyle {
                    size: config.size.unwrap_or(DEFAULT_IMAGE_SIZE),
                    stroke_size: 0.0,
                    stroke_color: None,
                    fill_color: None,
                },
                inverse,
            )
        } else if config.use_triangle {
            (
                MarkerKind::Arrow,
                MarkerStyle {
                    size: config.size.unwrap_or(DEFAULT_ARROW_SIZE),
                    stroke_size: config.stroke_size.unwrap_or(DEFAULT_STROKE),
                    stroke_color: config.stroke_color,
                    fill_color: fill,
                },
                (1.0, 1.0),
            )
        } else {
            (
                MarkerKind::Shape {
                    base: config.base_type,
                    use_heading: config.use_heading,
                },
                MarkerStyle {
                    size: config.size.unwrap_or(DEFAULT_SHAPE_SIZE),
                    stroke_size: config.stroke_size.unwrap_or(DEFAULT_STROKE),
                    stroke_color: config.stroke_color,
                    fill_color: fill,
                },
                inverse,
            )
        };

        RobotMarker {
            kind,
            style,
            state: MarkerVisualState {
                scale_x: scale.0,
                scale_y: scale.1,
                ..MarkerVisualState::default()
            },
            pulse: PulseAnimation::default(),
            pressed: Listeners::new(),
        }
    }

    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    pub fn style(&self) -> &MarkerStyle {
        &self.style
    }

    pub fn state(&self) -> MarkerVisualState {
        self.state
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.state.x = x;
        self.state.y = y;
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.state.rotation = degrees;
    }

    pub fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.state.scale_x = scale_x;
        self.state.scale_y = scale_y;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.state.visible = visible;
    }

    pub fn visible(&self) -> bool {
        self.state.visible
    }

    /// Start or stop the pulse animation
    pub fn pulse(&mut self, enabled: bool) {
        self.pulse.set_enabled(enabled);
    }

    pub fn pulsing(&self) -> bool {
        self.pulse.enabled()
    }

    /// Advance animations by one frame
    pub fn tick(&mut self) {
        self.pulse.tick();
    }

    /// Scale the renderer should draw with, pulse included
    pub fn rendered_scale(&self) -> (f64, f64) {
        let factor = self.pulse.factor();
        (self.state.scale_x * factor, self.state.scale_y * factor)
    }

    /// Register a callback for presses on the marker
    pub fn on_pressed(&mut self, callback: Callback<PressEvent>) -> ListenerId {
        self.pressed.add(callback)
    }

    pub fn remove_pressed_listener(&mut self, id: ListenerId) -> bool {
        self.pressed.remove(id)
    }

    /// Deliver a press detected by the rendering layer
    pub fn press(&mut self, event: PressEvent) {
        self.pressed.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn default_config_builds_hidden_shape() {
        let marker = RobotMarker::from_config(&MarkerConfig::default(), (4.0, 2.0));
        assert_eq!(
            *marker.kind(),
            MarkerKind::Shape {
                base: BaseType::Circle,
                use_heading: true
            }
        );
        assert_eq!(marker.style().size, DEFAULT_SHAPE_SIZE);
        assert_eq!(marker.style().stroke_size, DEFAULT_STROKE);
        assert_eq!(marker.style().fill_color, Some(DEFAULT_FILL));
        assert!(!marker.visible());
        assert_eq!(marker.state().scale_x, 0.25);
        assert_eq!(marker.state().scale_y, 0.5);
    }

    #[test]
    fn image_wins_over_triangle() {
        let config = MarkerConfig {
            image: Some("robot.png".to_string()),
            use_triangle: true,
            ..MarkerConfig::default()
        };
        let marker = RobotMarker::from_config(&config, (2.0, 2.0));
        assert!(matches!(marker.kind(), MarkerKind::Image { path } if path == "robot.png"));
        assert_eq!(marker.style().size, DEFAULT_IMAGE_SIZE);
        assert_eq!(marker.state().scale_x, 0.5);
    }

    #[test]
    fn arrow_uses_its_own_defaults() {
        let config = MarkerConfig {
            use_triangle: true,
            fill_color: Some(Color::rgb(0, 0, 255)),
            ..MarkerConfig::default()
        };
        let marker = RobotMarker::from_config(&config, (5.0, 5.0));
        assert_eq!(*marker.kind(), MarkerKind::Arrow);
        assert_eq!(marker.style().size, DEFAULT_ARROW_SIZE);
        assert_eq!(marker.style().stroke_size, 1.0);
        assert_eq!(marker.style().fill_color, Some(Color::rgb(0, 0, 255)));
        assert_eq!(marker.state().scale_x, 1.0);
    }

    #[test]
    fn press_listeners_register_and_unregister() {
        let mut marker = RobotMarker::from_config(&MarkerConfig::default(), (1.0, 1.0));
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let id = marker.on_pressed(Box::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        marker.press(PressEvent {
            stage_x: 1.0,
            stage_y: 2.0,
        });
        assert!(marker.remove_pressed_listener(id));
        marker.press(PressEvent {
            stage_x: 1.0,
            stage_y: 2.0,
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn pulse_scales_rendering_only() {
        let mut marker = RobotMarker::from_config(&MarkerConfig::default(), (1.0, 1.0));
        marker.pulse(true);
        assert!(marker.pulsing());
        marker.tick();
        let (rx, _) = marker.rendered_scale();
        assert!(rx > 1.0);
        assert_eq!(marker.state().scale_x, 1.0);
        marker.pulse(false);
        assert_eq!(marker.rendered_scale(), (1.0, 1.0));
    }
}

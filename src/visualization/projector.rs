//! Pose projection onto the canvas

use crate::common::Pose;
use crate::display::DisplayRoot;
use crate::marker::RobotMarker;

/// Canvas placement computed from a world pose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub x: f64,
    pub y: f64,
    /// Degrees in the display's rotation convention
    pub rotation: f64,
}

/// Whether the marker scale has been locked yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleState {
    #[default]
    Uninitialized,
    Scaled,
}

/// Moves a marker to follow incoming poses.
///
/// The marker scale is locked to the inverse of the display scale on the
/// first pose only. A viewport rescale after that point is not reflected in
/// the marker size.
#[derive(Debug, Default, Clone)]
pub struct PoseProjector {
    scale_state: ScaleState,
}

impl PoseProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canvas position and heading of `pose`; canvas Y points down
    pub fn project(pose: &Pose, display: &dyn DisplayRoot) -> Projection {
        Projection {
            x: pose.position.x,
            y: -pose.position.y,
            rotation: display.quaternion_to_global_theta(&pose.orientation),
        }
    }

    /// Apply `pose` to `marker` and make it visible
    pub fn update(&mut self, marker: &mut RobotMarker, pose: &Pose, display: &dyn DisplayRoot) {
        let projection = Self::project(pose, display);
        marker.set_position(projection.x, projection.y);
        if self.scale_state == ScaleState::Uninitialized {
            let (scale_x, scale_y) = display.scale();
            marker.set_scale(1.0 / scale_x, 1.0 / scale_y);
            self.scale_state = ScaleState::Scaled;
        }
        marker.set_rotation(projection.rotation);
        marker.set_visible(true);
    }

    pub fn scale_state(&self) -> ScaleState {
        self.scale_state
    }
}

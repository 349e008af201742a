//! Common types shared across the overlay components

use nalgebra::{Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boxed callback used by every event source in the crate
pub type Callback<T> = Box<dyn FnMut(&T) + Send>;

/// A robot pose in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vector3<f64>,
    pub orientation: Quaternion<f64>,
}

impl Pose {
    /// Create a pose from a position and an `(x, y, z, w)` quaternion
    pub fn new(position: Vector3<f64>, orientation: Quaternion<f64>) -> Self {
        Pose {
            position,
            orientation,
        }
    }

    /// Planar pose with a yaw angle in radians
    pub fn from_xy_yaw(x: f64, y: f64, yaw: f64) -> Self {
        let half = yaw * 0.5;
        Pose {
            position: Vector3::new(x, y, 0.0),
            // nalgebra takes w first
            orientation: Quaternion::new(half.cos(), 0.0, 0.0, half.sin()),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose {
            position: Vector3::zeros(),
            orientation: Quaternion::identity(),
        }
    }
}

/// RGBA colour, alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Color { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 1.0 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Handle returned when registering a listener or subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A list of callbacks keyed by [`ListenerId`]
pub struct Listeners<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Callback<T>)>,
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Listeners {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a callback
    pub fn add(&mut self, callback: Callback<T>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove a callback, returning whether it was registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Invoke every callback in registration order
    pub fn emit(&mut self, value: &T) {
        for (_, callback) in &mut self.entries {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

//! Display root abstraction
//!
//! The overlay never renders anything itself. It reads and writes the
//! transform of a display root (the scene the map and marker live in) and
//! asks it to convert orientations into its own rotation convention.

pub mod stage;

pub use self::stage::Stage;

use nalgebra::Quaternion;
use std::sync::{Arc, RwLock};

/// Display root shared between the map fit controller and the projector
pub type SharedDisplay = Arc<RwLock<dyn DisplayRoot>>;

/// Scene root of a 2D canvas
pub trait DisplayRoot: Send + Sync {
    /// Available drawing width in screen pixels
    fn width(&self) -> f64;

    /// Available drawing height in screen pixels
    fn height(&self) -> f64;

    /// Current `(scale_x, scale_y)`
    fn scale(&self) -> (f64, f64);

    fn set_scale(&mut self, scale_x: f64, scale_y: f64);

    /// Current pan offset in screen pixels
    fn offset(&self) -> (f64, f64);

    fn set_offset(&mut self, x: f64, y: f64);

    /// Heading of a world orientation expressed as this display's rotation
    fn quaternion_to_global_theta(&self, orientation: &Quaternion<f64>) -> f64;

    /// Attach a named child to the scene
    fn add_child(&mut self, name: &str);
}

/// Wrap a display root for sharing
pub fn shared<D: DisplayRoot + 'static>(display: D) -> SharedDisplay {
    Arc::new(RwLock::new(display))
}

//! In-memory display root

use super::DisplayRoot;
use nalgebra::Quaternion;

/// A canvas stage with a uniform transform and a flat child list
#[derive(Debug, Clone)]
pub struct Stage {
    width: f64,
    height: f64,
    scale_x: f64,
    scale_y: f64,
    x: f64,
    y: f64,
    children: Vec<String>,
}

impl Stage {
    /// Create a stage with identity transform
    pub fn new(width: f64, height: f64) -> Self {
        Stage {
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            x: 0.0,
            y: 0.0,
            children: Vec::new(),
        }
    }

    /// Change the drawing area, keeping the transform
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Map a canvas point to screen pixels
    pub fn to_screen(&self, canvas_x: f64, canvas_y: f64) -> (f64, f64) {
        (
            canvas_x * self.scale_x + self.x,
            canvas_y * self.scale_y + self.y,
        )
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }
}

impl DisplayRoot for Stage {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    fn set_scale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    fn offset(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn set_offset(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Canvas rotation is clockwise and in degrees, so the yaw is negated.
    fn quaternion_to_global_theta(&self, orientation: &Quaternion<f64>) -> f64 {
        let (qx, qy, qz, qw) = (orientation.i, orientation.j, orientation.k, orientation.w);
        let yaw = (2.0 * (qw * qz + qx * qy)).atan2(1.0 - 2.0 * (qy * qy + qz * qz));
        -yaw.to_degrees()
    }

    fn add_child(&mut self, name: &str) {
        self.children.push(name.to_string());
    }
}

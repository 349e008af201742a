//! Occupancy grid metadata
//!
//! Cell data is carried along untouched; only the grid geometry matters to
//! the overlay.

use crate::common::Pose;

/// Geometry of an occupancy grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridInfo {
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
    /// World units per cell
    pub resolution: f64,
    /// World pose of cell (0, 0)
    pub origin: Pose,
}

impl GridInfo {
    pub fn new(width: u32, height: u32, resolution: f64) -> Self {
        GridInfo {
            width,
            height,
            resolution,
            origin: Pose::default(),
        }
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin.position.x = x;
        self.origin.position.y = y;
        self
    }

    /// Grid size in world units
    pub fn world_extents(&self) -> (f64, f64) {
        (
            self.width as f64 * self.resolution,
            self.height as f64 * self.resolution,
        )
    }

    /// True when the grid covers no area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An occupancy grid as delivered by the map topic
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    pub info: GridInfo,
    /// Row-major cell values, -1 unknown, 0..=100 occupancy
    pub data: Vec<i8>,
}

impl OccupancyGrid {
    /// A grid with every cell unknown
    pub fn unknown(info: GridInfo) -> Self {
        let cells = info.width as usize * info.height as usize;
        OccupancyGrid {
            info,
            data: vec![-1; cells],
        }
    }
}

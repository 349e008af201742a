//! Viewport fitting for occupancy grids
//!
//! Every grid-changed event recomputes the viewport from scratch: the scale is
//! the largest uniform factor that shows the whole grid, and the offset
//! centres the grid's world box (Y flipped into canvas space) in the display.

use super::occupancy_grid::GridInfo;
use crate::display::DisplayRoot;
use tracing::{debug, info};

/// Transform applied to the display root by the last fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Grid the viewport was fitted to
    pub grid: GridInfo,
}

/// Compute the viewport fitting `grid` into a `width` x `height` display.
///
/// Returns `None` for grids without area, non-positive resolutions and empty
/// displays.
pub fn compute_fit(width: f64, height: f64, grid: &GridInfo) -> Option<ViewportState> {
    if grid.is_empty() || !(grid.resolution.is_finite() && grid.resolution > 0.0) {
        return None;
    }
    if !(width > 0.0 && height > 0.0) {
        return None;
    }

    let (grid_width, grid_height) = grid.world_extents();
    let scale = (width / grid_width).min(height / grid_height);
    let origin = grid.origin.position;

    Some(ViewportState {
        scale,
        offset_x: (width - scale * grid_width) / 2.0 - scale * origin.x,
        offset_y: (height - scale * grid_height) / 2.0 + scale * (origin.y + grid_height),
        grid: *grid,
    })
}

/// Fit the display to `grid`.
///
/// Takes the previous state and returns the new one. When the grid cannot be
/// fitted the display is left alone and `previous` is returned unchanged.
pub fn fit_viewport(
    previous: Option<ViewportState>,
    display: &mut dyn DisplayRoot,
    grid: &GridInfo,
) -> Option<ViewportState> {
    match compute_fit(display.width(), display.height(), grid) {
        Some(state) => {
            display.set_scale(state.scale, state.scale);
            display.set_offset(state.offset_x, state.offset_y);
            debug!(
                scale = state.scale,
                offset_x = state.offset_x,
                offset_y = state.offset_y,
                "viewport fitted"
            );
            Some(state)
        }
        None => {
            debug!(
                width = grid.width,
                height = grid.height,
                resolution = grid.resolution,
                "grid cannot be fitted, keeping viewport"
            );
            previous
        }
    }
}

/// Keeps the latest viewport state between grid-changed events
#[derive(Debug, Default, Clone)]
pub struct MapFitController {
    state: Option<ViewportState>,
}

impl MapFitController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a grid-changed notification
    pub fn on_grid_changed(&mut self, display: &mut dyn DisplayRoot, grid: &GridInfo) {
        let resized = self
            .state
            .map_or(true, |s| s.grid.width != grid.width || s.grid.height != grid.height);
        self.state = fit_viewport(self.state, display, grid);
        if resized {
            if let Some(state) = &self.state {
                info!(
                    width = grid.width,
                    height = grid.height,
                    scale = state.scale,
                    "map dimensions changed"
                );
            }
        }
    }

    /// Fit the last grid again, e.g. after the display was resized
    pub fn refit(&mut self, display: &mut dyn DisplayRoot) {
        if let Some(grid) = self.state.map(|s| s.grid) {
            self.state = fit_viewport(self.state, display, &grid);
        }
    }

    pub fn state(&self) -> Option<ViewportState> {
        self.state
    }
}

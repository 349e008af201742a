pub mod common;
pub mod config;
pub mod display;
pub mod error;
pub mod lifecycle;
pub mod marker;
pub mod navigation;
pub mod tf;
pub mod transport;
pub mod visualization;

pub use crate::error::{Result, VizError};

use crate::lifecycle::LifecycleNode;
use crate::navigation::OccupancyGridMarker;
use tracing::info;

/// Registry driving the lifecycle of overlay components
pub struct Nav2dViz {
    components: Vec<Box<dyn LifecycleNode>>,
}

impl Nav2dViz {
    /// Create an empty registry
    pub fn new() -> Self {
        Nav2dViz {
            components: Vec::new(),
        }
    }

    /// Register a component
    pub fn register<T: LifecycleNode + 'static>(&mut self, component: T) {
        info!(component = component.name(), "registered");
        self.components.push(Box::new(component));
    }

    /// Configure and activate all registered components
    pub fn init(&mut self) -> Result<()> {
        for component in &mut self.components {
            component.on_configure()?;
            component.on_activate()?;
        }
        Ok(())
    }

    /// Deactivate and clean up all registered components
    pub fn shutdown(&mut self) -> Result<()> {
        for component in &mut self.components {
            component.on_deactivate()?;
            component.on_cleanup()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// First registered map overlay
    pub fn grid_marker_mut(&mut self) -> Option<&mut OccupancyGridMarker> {
        self.components
            .iter_mut()
            .find_map(|component| component.as_any_mut().downcast_mut::<OccupancyGridMarker>())
    }
}

impl Default for Nav2dViz {
    fn default() -> Self {
        Self::new()
    }
}

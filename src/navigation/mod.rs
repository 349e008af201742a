//! Map overlay: grid client, viewport fitting and the robot marker
pub mod grid_client;
pub mod map_fit;
pub mod occupancy_grid;

use self::grid_client::{MapSource, OccupancyGridClient};
use self::map_fit::{MapFitController, ViewportState};
use crate::common::ListenerId;
use crate::config::OverlayConfig;
use crate::display::SharedDisplay;
use crate::error::{Result, VizError};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::visualization::source::{select_pose_source, Connections};
use crate::visualization::Visualizator;
use std::any::Any;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Occupancy grid view with a robot marker on top.
///
/// Every grid change refits the display root to the new grid.
pub struct OccupancyGridMarker {
    base: LifecycleNodeBase,
    client: Arc<dyn MapSource>,
    visualizator: Visualizator,
    fit: Arc<Mutex<MapFitController>>,
    display: SharedDisplay,
    change_listener: Option<ListenerId>,
}

impl OccupancyGridMarker {
    /// Build the overlay.
    ///
    /// Uses `connections.grid_client` when given, otherwise subscribes a new
    /// grid client to `config.map_topic` on the transport.
    pub fn new(config: &OverlayConfig, display: SharedDisplay, connections: &Connections) -> Result<Self> {
        config.validate()?;

        let client: Arc<dyn MapSource> = match (&connections.grid_client, &connections.transport) {
            (Some(client), _) => Arc::clone(client),
            (None, Some(transport)) => {
                OccupancyGridClient::connect(Arc::clone(transport), &config.map_topic, config.continuous)?
            }
            (None, None) => return Err(VizError::MissingConnection("transport for the map topic")),
        };

        let source = select_pose_source(connections, config)?;
        let visualizator = Visualizator::new(config, Arc::clone(&display), source)?;

        Ok(OccupancyGridMarker {
            base: LifecycleNodeBase::new("occupancy_grid_marker"),
            client,
            visualizator,
            fit: Arc::new(Mutex::new(MapFitController::new())),
            display,
            change_listener: None,
        })
    }

    pub fn visualizator(&self) -> &Visualizator {
        &self.visualizator
    }

    pub fn map_source(&self) -> Arc<dyn MapSource> {
        Arc::clone(&self.client)
    }

    /// Viewport computed by the last successful fit
    pub fn viewport(&self) -> Result<Option<ViewportState>> {
        Ok(self.fit.lock().map_err(|_| VizError::Lock("map fit"))?.state())
    }

    /// Refit the current grid, e.g. after the display was resized
    pub fn refit(&self) -> Result<()> {
        let mut fit = self.fit.lock().map_err(|_| VizError::Lock("map fit"))?;
        let mut display = self.display.write().map_err(|_| VizError::Lock("display root"))?;
        fit.refit(&mut *display);
        Ok(())
    }
}

impl LifecycleNode for OccupancyGridMarker {
    fn on_configure(&mut self) -> Result<()> {
        info!("Configuring occupancy grid marker");
        self.visualizator.on_configure()?;
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        info!("Activating occupancy grid marker");
        let fit = Arc::clone(&self.fit);
        let display = Arc::clone(&self.display);
        let id = self.client.on_change(Box::new(move |grid| {
            let fitted = fit
                .lock()
                .map_err(|_| VizError::Lock("map fit"))
                .and_then(|mut fit| {
                    let mut display = display.write().map_err(|_| VizError::Lock("display root"))?;
                    fit.on_grid_changed(&mut *display, grid);
                    Ok(())
                });
            if let Err(e) = fitted {
                warn!("failed to fit map: {}", e);
            }
        }))?;
        self.change_listener = Some(id);

        // a grid that arrived before activation is fitted right away
        if let Some(grid) = self.client.current_grid() {
            let mut fit = self.fit.lock().map_err(|_| VizError::Lock("map fit"))?;
            let mut display = self.display.write().map_err(|_| VizError::Lock("display root"))?;
            fit.on_grid_changed(&mut *display, &grid);
        }

        self.visualizator.on_activate()?;
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        info!("Deactivating occupancy grid marker");
        if let Some(id) = self.change_listener.take() {
            self.client.remove_change_listener(id)?;
        }
        self.visualizator.on_deactivate()?;
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        info!("Cleaning up occupancy grid marker");
        self.visualizator.on_cleanup()?;
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.base.name
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::occupancy_grid::{GridInfo, OccupancyGrid};
    use super::*;
    use crate::common::Pose;
    use crate::display::{self, DisplayRoot, Stage};
    use crate::transport::{LocalBus, Message};

    fn overlay(continuous: bool) -> (OccupancyGridMarker, Arc<LocalBus>, SharedDisplay) {
        let bus = Arc::new(LocalBus::new());
        let display = display::shared(Stage::new(800.0, 600.0));
        let config = OverlayConfig {
            continuous,
            throttle_rate_ms: 0,
            ..OverlayConfig::default()
        };
        let marker =
            OccupancyGridMarker::new(&config, Arc::clone(&display), &Connections::with_transport(bus.clone()))
                .unwrap();
        (marker, bus, display)
    }

    fn publish_grid(bus: &LocalBus, info: GridInfo) {
        bus.publish("/map", Message::OccupancyGrid(OccupancyGrid::unknown(info)))
            .unwrap();
    }

    #[test]
    fn grid_change_fits_display() {
        let (mut marker, bus, display) = overlay(true);
        marker.on_configure().unwrap();
        marker.on_activate().unwrap();

        publish_grid(&bus, GridInfo::new(100, 50, 0.05));
        assert_eq!(display.read().unwrap().scale(), (160.0, 160.0));
        assert_eq!(marker.viewport().unwrap().unwrap().scale, 160.0);

        publish_grid(&bus, GridInfo::new(0, 50, 0.05));
        assert_eq!(display.read().unwrap().scale(), (160.0, 160.0));
    }

    #[test]
    fn grid_received_before_activation_is_fitted() {
        let (mut marker, bus, display) = overlay(false);
        publish_grid(&bus, GridInfo::new(100, 50, 0.05));
        assert_eq!(display.read().unwrap().scale(), (1.0, 1.0));

        marker.on_activate().unwrap();
        assert_eq!(display.read().unwrap().scale(), (160.0, 160.0));
    }

    #[test]
    fn pose_topic_drives_marker() {
        let (mut marker, bus, _) = overlay(true);
        marker.on_activate().unwrap();
        bus.publish("/robot_pose", Message::Pose(Pose::from_xy_yaw(1.0, 2.0, 0.0)))
            .unwrap();
        let state = marker.visualizator().marker_state().unwrap();
        assert!(state.visible);
        assert_eq!((state.x, state.y), (1.0, -2.0));
    }

    #[test]
    fn deactivation_detaches_map_and_pose() {
        let (mut marker, bus, display) = overlay(true);
        marker.on_activate().unwrap();
        marker.on_deactivate().unwrap();

        publish_grid(&bus, GridInfo::new(100, 50, 0.05));
        bus.publish("/robot_pose", Message::Pose(Pose::default()))
            .unwrap();

        assert_eq!(display.read().unwrap().scale(), (1.0, 1.0));
        assert!(!marker.visualizator().visible().unwrap());
        // the grid client itself stays subscribed and keeps the grid
        assert!(marker.map_source().current_grid().is_some());
    }

    #[test]
    fn refit_follows_display_resize() {
        let bus = Arc::new(LocalBus::new());
        let stage = Arc::new(std::sync::RwLock::new(Stage::new(800.0, 600.0)));
        let mut marker = OccupancyGridMarker::new(
            &OverlayConfig::default(),
            stage.clone(),
            &Connections::with_transport(bus.clone()),
        )
        .unwrap();
        marker.on_activate().unwrap();
        publish_grid(&bus, GridInfo::new(100, 50, 0.05));

        stage.write().unwrap().resize(400.0, 300.0);
        marker.refit().unwrap();
        assert_eq!(stage.read().unwrap().scale(), (80.0, 80.0));
    }

    #[test]
    fn needs_a_map_source() {
        let display = display::shared(Stage::new(800.0, 600.0));
        let result = OccupancyGridMarker::new(&OverlayConfig::default(), display, &Connections::default());
        assert!(matches!(result, Err(VizError::MissingConnection(_))));
    }
}

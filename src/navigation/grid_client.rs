//! Map data source

use super::occupancy_grid::{GridInfo, OccupancyGrid};
use crate::common::{Callback, ListenerId, Listeners};
use crate::error::{Result, VizError};
use crate::transport::{Message, Transport, OCCUPANCY_GRID_TYPE};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Source of occupancy grids with change notification
pub trait MapSource: Send + Sync {
    /// Register a callback fired with the new grid geometry on every change
    fn on_change(&self, callback: Callback<GridInfo>) -> Result<ListenerId>;

    fn remove_change_listener(&self, id: ListenerId) -> Result<bool>;

    /// Geometry of the grid currently held, if any
    fn current_grid(&self) -> Option<GridInfo>;
}

#[derive(Default)]
struct GridState {
    current: Mutex<Option<OccupancyGrid>>,
    listeners: Mutex<Listeners<GridInfo>>,
}

impl GridState {
    fn receive(&self, grid: &OccupancyGrid, continuous: bool) -> Result<()> {
        {
            let mut current = self
                .current
                .lock()
                .map_err(|_| VizError::Lock("current grid"))?;
            if current.is_some() && !continuous {
                debug!("ignoring grid update, client is not continuous");
                return Ok(());
            }
            *current = Some(grid.clone());
        }
        info!(
            width = grid.info.width,
            height = grid.info.height,
            resolution = grid.info.resolution,
            "received map"
        );
        self.listeners
            .lock()
            .map_err(|_| VizError::Lock("grid listeners"))?
            .emit(&grid.info);
        Ok(())
    }
}

/// Grid client subscribed to a map topic.
///
/// Unless `continuous` is set only the first grid is kept.
pub struct OccupancyGridClient {
    transport: Arc<dyn Transport>,
    topic: String,
    state: Arc<GridState>,
    subscription: Mutex<Option<ListenerId>>,
}

impl OccupancyGridClient {
    /// Subscribe to `topic` on `transport`
    pub fn connect(transport: Arc<dyn Transport>, topic: &str, continuous: bool) -> Result<Arc<Self>> {
        let state = Arc::new(GridState::default());

        let receiver = Arc::clone(&state);
        let id = transport.subscribe(
            topic,
            OCCUPANCY_GRID_TYPE,
            Box::new(move |message| {
                if let Message::OccupancyGrid(grid) = message {
                    if let Err(e) = receiver.receive(grid, continuous) {
                        warn!("failed to handle map update: {}", e);
                    }
                }
            }),
        )?;
        debug!(topic, continuous, "grid client connected");

        Ok(Arc::new(OccupancyGridClient {
            transport,
            topic: topic.to_string(),
            state,
            subscription: Mutex::new(Some(id)),
        }))
    }

    /// Full copy of the grid currently held
    pub fn current(&self) -> Result<Option<OccupancyGrid>> {
        Ok(self
            .state
            .current
            .lock()
            .map_err(|_| VizError::Lock("current grid"))?
            .clone())
    }

    /// Stop listening to the map topic
    pub fn disconnect(&self) -> Result<()> {
        let id = self
            .subscription
            .lock()
            .map_err(|_| VizError::Lock("grid subscription"))?
            .take();
        if let Some(id) = id {
            self.transport.unsubscribe(&self.topic, id)?;
        }
        Ok(())
    }
}

impl MapSource for OccupancyGridClient {
    fn on_change(&self, callback: Callback<GridInfo>) -> Result<ListenerId> {
        Ok(self
            .state
            .listeners
            .lock()
            .map_err(|_| VizError::Lock("grid listeners"))?
            .add(callback))
    }

    fn remove_change_listener(&self, id: ListenerId) -> Result<bool> {
        Ok(self
            .state
            .listeners
            .lock()
            .map_err(|_| VizError::Lock("grid listeners"))?
            .remove(id))
    }

    fn current_grid(&self) -> Option<GridInfo> {
        self.state
            .current
            .lock()
            .ok()
            .and_then(|current| current.as_ref().map(|grid| grid.info))
    }
}

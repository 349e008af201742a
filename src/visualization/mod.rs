//! Robot pose visualization
//!
//! A [`Visualizator`] only displays the robot; it never sends goals. It owns
//! the marker, the projector and one pose source.
pub mod projector;
pub mod source;

use self::projector::PoseProjector;
use self::source::PoseSource;
use crate::common::{Callback, ListenerId, Pose};
use crate::config::OverlayConfig;
use crate::display::SharedDisplay;
use crate::error::{Result, VizError};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use crate::marker::{MarkerVisualState, PressEvent, RobotMarker};
use std::any::Any;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Scene name of the robot marker
pub const MARKER_NAME: &str = "robot_marker";

struct MarkerView {
    marker: RobotMarker,
    projector: PoseProjector,
}

impl MarkerView {
    fn apply(&mut self, pose: &Pose, display: &SharedDisplay) -> Result<()> {
        let display = display.read().map_err(|_| VizError::Lock("display root"))?;
        self.projector.update(&mut self.marker, pose, &*display);
        Ok(())
    }
}

/// Robot marker driven by a pose source
pub struct Visualizator {
    base: LifecycleNodeBase,
    display: SharedDisplay,
    view: Arc<Mutex<MarkerView>>,
    source: Box<dyn PoseSource>,
}

impl Visualizator {
    /// Create the marker and add it, hidden, to the display root
    pub fn new(
        config: &OverlayConfig,
        display: SharedDisplay,
        source: Box<dyn PoseSource>,
    ) -> Result<Self> {
        let marker = {
            let mut root = display.write().map_err(|_| VizError::Lock("display root"))?;
            let marker = RobotMarker::from_config(&config.marker, root.scale());
            root.add_child(MARKER_NAME);
            marker
        };

        Ok(Visualizator {
            base: LifecycleNodeBase::new("visualizator"),
            display,
            view: Arc::new(Mutex::new(MarkerView {
                marker,
                projector: PoseProjector::new(),
            })),
            source,
        })
    }

    fn lock_view(&self) -> Result<std::sync::MutexGuard<'_, MarkerView>> {
        self.view.lock().map_err(|_| VizError::Lock("robot marker"))
    }

    /// Apply a pose directly, bypassing the pose source
    pub fn pose_update(&self, pose: &Pose) -> Result<()> {
        self.lock_view()?.apply(pose, &self.display)
    }

    /// Hide the marker; the next pose shows it again
    pub fn hide(&self) -> Result<()> {
        self.lock_view()?.marker.set_visible(false);
        Ok(())
    }

    pub fn visible(&self) -> Result<bool> {
        Ok(self.lock_view()?.marker.visible())
    }

    pub fn pulse(&self, enabled: bool) -> Result<()> {
        self.lock_view()?.marker.pulse(enabled);
        Ok(())
    }

    pub fn pulsing(&self) -> Result<bool> {
        Ok(self.lock_view()?.marker.pulsing())
    }

    /// Advance marker animations by one frame
    pub fn tick(&self) -> Result<()> {
        self.lock_view()?.marker.tick();
        Ok(())
    }

    pub fn marker_state(&self) -> Result<MarkerVisualState> {
        Ok(self.lock_view()?.marker.state())
    }

    pub fn rendered_scale(&self) -> Result<(f64, f64)> {
        Ok(self.lock_view()?.marker.rendered_scale())
    }

    pub fn on_pressed(&self, callback: Callback<PressEvent>) -> Result<ListenerId> {
        Ok(self.lock_view()?.marker.on_pressed(callback))
    }

    pub fn remove_pressed_listener(&self, id: ListenerId) -> Result<bool> {
        Ok(self.lock_view()?.marker.remove_pressed_listener(id))
    }

    /// Forward a press detected on the marker by the rendering layer
    pub fn press(&self, event: PressEvent) -> Result<()> {
        self.lock_view()?.marker.press(event);
        Ok(())
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn state(&self) -> State {
        self.base.get_state()
    }
}

impl LifecycleNode for Visualizator {
    fn on_configure(&mut self) -> Result<()> {
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        let view = Arc::clone(&self.view);
        let display = Arc::clone(&self.display);
        self.source.attach(Box::new(move |pose| {
            let result = view
                .lock()
                .map_err(|_| VizError::Lock("robot marker"))
                .and_then(|mut view| view.apply(pose, &display));
            if let Err(e) = result {
                warn!("dropping pose update: {}", e);
            }
        }))?;
        info!(source = self.source.name(), "listening for robot pose");
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.source.detach()?;
        info!(source = self.source.name(), "stopped listening for robot pose");
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
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

//! Pose source backed by a custom client emitting `pose-update` events

use super::PoseSource;
use crate::common::{Callback, ListenerId, Listeners, Pose};
use crate::error::{Result, VizError};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Anything that emits pose-update events
pub trait PoseEmitter: Send + Sync {
    fn on_pose_update(&self, callback: Callback<Pose>) -> Result<ListenerId>;

    fn remove_listener(&self, id: ListenerId) -> Result<bool>;
}

/// Minimal pose-update event hub
#[derive(Debug, Default)]
pub struct PoseEventEmitter {
    listeners: Mutex<Listeners<Pose>>,
}

impl PoseEventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire a pose-update event
    pub fn emit(&self, pose: &Pose) -> Result<()> {
        self.listeners
            .lock()
            .map_err(|_| VizError::Lock("pose listeners"))?
            .emit(pose);
        Ok(())
    }
}

impl PoseEmitter for PoseEventEmitter {
    fn on_pose_update(&self, callback: Callback<Pose>) -> Result<ListenerId> {
        Ok(self
            .listeners
            .lock()
            .map_err(|_| VizError::Lock("pose listeners"))?
            .add(callback))
    }

    fn remove_listener(&self, id: ListenerId) -> Result<bool> {
        Ok(self
            .listeners
            .lock()
            .map_err(|_| VizError::Lock("pose listeners"))?
            .remove(id))
    }
}

/// Forwards pose-update events of a [`PoseEmitter`]
pub struct ClientPoseSource {
    emitter: Arc<dyn PoseEmitter>,
    listener: Option<ListenerId>,
}

impl ClientPoseSource {
    pub fn new(emitter: Arc<dyn PoseEmitter>) -> Self {
        ClientPoseSource {
            emitter,
            listener: None,
        }
    }
}

impl PoseSource for ClientPoseSource {
    fn attach(&mut self, sink: Callback<Pose>) -> Result<()> {
        self.detach()?;
        self.listener = Some(self.emitter.on_pose_update(sink)?);
        debug!("client pose source attached");
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        if let Some(id) = self.listener.take() {
            self.emitter.remove_listener(id)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "client"
    }
}

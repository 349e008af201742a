//! Pose sources
//!
//! Three interchangeable ways of receiving the robot pose. Whichever is
//! chosen, the projector only ever sees [`Pose`] values.

pub mod client;
pub mod tf;
pub mod throttle;
pub mod topic;

pub use self::client::{ClientPoseSource, PoseEmitter, PoseEventEmitter};
pub use self::tf::TfPoseSource;
pub use self::topic::TopicPoseSource;

use crate::common::{Callback, Pose};
use crate::config::OverlayConfig;
use crate::error::{Result, VizError};
use crate::navigation::grid_client::MapSource;
use crate::tf::TransformClient;
use crate::transport::Transport;
use std::sync::Arc;

/// Delivers poses to a sink until detached
pub trait PoseSource: Send + Sync {
    /// Start forwarding poses to `sink`, replacing any previous sink
    fn attach(&mut self, sink: Callback<Pose>) -> Result<()>;

    /// Stop forwarding poses
    fn detach(&mut self) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Handles to the outside world an overlay may use
#[derive(Clone, Default)]
pub struct Connections {
    pub transport: Option<Arc<dyn Transport>>,
    pub tf_client: Option<Arc<dyn TransformClient>>,
    pub robot_client: Option<Arc<dyn PoseEmitter>>,
    pub grid_client: Option<Arc<dyn MapSource>>,
}

impl Connections {
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Connections {
            transport: Some(transport),
            ..Self::default()
        }
    }
}

/// Pick the pose source: transform client first, then the custom client,
/// then a topic subscription on the transport
pub fn select_pose_source(
    connections: &Connections,
    config: &OverlayConfig,
) -> Result<Box<dyn PoseSource>> {
    if let Some(tf_client) = &connections.tf_client {
        return Ok(Box::new(TfPoseSource::new(
            Arc::clone(tf_client),
            &config.robot_pose,
        )));
    }
    if let Some(robot_client) = &connections.robot_client {
        return Ok(Box::new(ClientPoseSource::new(Arc::clone(robot_client))));
    }
    let transport = connections
        .transport
        .as_ref()
        .ok_or(VizError::MissingConnection("transport for the pose topic"))?;
    Ok(Box::new(TopicPoseSource::new(
        Arc::clone(transport),
        &config.robot_pose,
        config.throttle(),
    )))
}

//! Topic transport abstraction
//!
//! Pose topics, map topics and transform streams all arrive through a
//! [`Transport`]. Wire formats belong to the transport; subscribers only see
//! decoded [`Message`] values.

pub mod local_bus;

pub use self::local_bus::LocalBus;

use crate::common::{Callback, ListenerId, Pose};
use crate::error::Result;
use crate::navigation::occupancy_grid::OccupancyGrid;
use crate::tf::TransformStamped;

pub const POSE_TYPE: &str = "geometry_msgs/Pose";
pub const OCCUPANCY_GRID_TYPE: &str = "nav_msgs/OccupancyGrid";
pub const TF_MESSAGE_TYPE: &str = "tf2_msgs/TFMessage";

/// A decoded topic message
#[derive(Debug, Clone)]
pub enum Message {
    Pose(Pose),
    OccupancyGrid(OccupancyGrid),
    Tf(Vec<TransformStamped>),
}

impl Message {
    /// Message type name as used in subscriptions
    pub fn type_name(&self) -> &'static str {
        match self {
            Message::Pose(_) => POSE_TYPE,
            Message::OccupancyGrid(_) => OCCUPANCY_GRID_TYPE,
            Message::Tf(_) => TF_MESSAGE_TYPE,
        }
    }
}

/// Publish/subscribe connection to the robot middleware
pub trait Transport: Send + Sync {
    /// Subscribe to `topic`, receiving only messages of `message_type`
    fn subscribe(
        &self,
        topic: &str,
        message_type: &str,
        callback: Callback<Message>,
    ) -> Result<ListenerId>;

    /// Drop a subscription created by [`Transport::subscribe`]
    fn unsubscribe(&self, topic: &str, id: ListenerId) -> Result<()>;
}

//! Transform-tree types and client

pub mod client;
pub mod tree;

pub use self::client::TfClient;
pub use self::tree::TfTree;

use crate::common::{Callback, ListenerId, Pose};
use crate::error::Result;
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};

/// Rigid transform of a frame relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f64>,
    pub rotation: Quaternion<f64>,
}

impl Transform {
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.translation),
            UnitQuaternion::new_normalize(self.rotation),
        )
    }

    pub fn from_isometry(isometry: &Isometry3<f64>) -> Self {
        Transform {
            translation: isometry.translation.vector,
            rotation: *isometry.rotation.quaternion(),
        }
    }
}

impl From<&Transform> for Pose {
    fn from(transform: &Transform) -> Self {
        Pose::new(transform.translation, transform.rotation)
    }
}

/// A transform with its parent and child frame names
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStamped {
    pub parent_frame_id: String,
    pub child_frame_id: String,
    pub transform: Transform,
}

/// Resolves named frames to their pose in a fixed frame
pub trait TransformClient: Send + Sync {
    /// Call `callback` with the frame's transform whenever it is resolved
    fn subscribe(&self, frame_id: &str, callback: Callback<Transform>) -> Result<ListenerId>;

    fn unsubscribe(&self, frame_id: &str, id: ListenerId) -> Result<()>;
}

/// Frame names are compared without a leading slash
pub(crate) fn normalize_frame(frame: &str) -> &str {
    frame.trim_start_matches('/')
}

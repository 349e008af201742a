//! Pose source backed by a transform-tree client

use super::PoseSource;
use crate::common::{Callback, ListenerId, Pose};
use crate::error::Result;
use crate::tf::TransformClient;
use std::sync::Arc;
use tracing::debug;

/// Follows one named frame of a [`TransformClient`]
pub struct TfPoseSource {
    client: Arc<dyn TransformClient>,
    frame: String,
    listener: Option<ListenerId>,
}

impl TfPoseSource {
    pub fn new(client: Arc<dyn TransformClient>, frame: &str) -> Self {
        TfPoseSource {
            client,
            frame: frame.to_string(),
            listener: None,
        }
    }
}

impl PoseSource for TfPoseSource {
    fn attach(&mut self, mut sink: Callback<Pose>) -> Result<()> {
        self.detach()?;
        let id = self
            .client
            .subscribe(&self.frame, Box::new(move |tf| sink(&Pose::from(tf))))?;
        debug!(frame = %self.frame, "tf pose source attached");
        self.listener = Some(id);
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        if let Some(id) = self.listener.take() {
            self.client.unsubscribe(&self.frame, id)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tf::{TfClient, Transform, TransformStamped, client::TF_TOPIC};
    use crate::transport::{LocalBus, Message};
    use nalgebra::{Quaternion, Vector3};
    use std::sync::Mutex;

    #[test]
    fn converts_transforms_to_poses() {
        let bus = Arc::new(LocalBus::new());
        let client = TfClient::connect(bus.clone(), "map").unwrap();
        let mut source = TfPoseSource::new(client, "base_link");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        source
            .attach(Box::new(move |pose| s.lock().unwrap().push(*pose)))
            .unwrap();

        let rotation = Quaternion::new(0.0, 0.0, 0.0, 1.0);
        bus.publish(
            TF_TOPIC,
            Message::Tf(vec![TransformStamped {
                parent_frame_id: "map".to_string(),
                child_frame_id: "base_link".to_string(),
                transform: Transform {
                    translation: Vector3::new(1.5, -0.5, 0.0),
                    rotation,
                },
            }]),
        )
        .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].position, Vector3::new(1.5, -0.5, 0.0));
        assert_eq!(seen[0].orientation, rotation);

        drop(seen);
        source.detach().unwrap();
    }
}

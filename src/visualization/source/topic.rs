//! Pose source backed by a direct topic subscription

use super::throttle::Throttle;
use super::PoseSource;
use crate::common::{Callback, ListenerId, Pose};
use crate::error::Result;
use crate::transport::{Message, Transport, POSE_TYPE};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Subscribes to a `geometry_msgs/Pose` topic, optionally throttled
pub struct TopicPoseSource {
    transport: Arc<dyn Transport>,
    topic: String,
    throttle: Option<Duration>,
    subscription: Option<ListenerId>,
}

impl TopicPoseSource {
    pub fn new(transport: Arc<dyn Transport>, topic: &str, throttle: Option<Duration>) -> Self {
        TopicPoseSource {
            transport,
            topic: topic.to_string(),
            throttle,
            subscription: None,
        }
    }
}

impl PoseSource for TopicPoseSource {
    fn attach(&mut self, mut sink: Callback<Pose>) -> Result<()> {
        self.detach()?;
        let mut throttle = self.throttle.map(Throttle::new);
        let id = self.transport.subscribe(
            &self.topic,
            POSE_TYPE,
            Box::new(move |message| {
                let Message::Pose(pose) = message else {
                    return;
                };
                if let Some(throttle) = throttle.as_mut() {
                    if !throttle.admit() {
                        trace!("pose throttled");
                        return;
                    }
                }
                sink(pose);
            }),
        )?;
        debug!(topic = %self.topic, throttle = ?self.throttle, "topic pose source attached");
        self.subscription = Some(id);
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        if let Some(id) = self.subscription.take() {
            self.transport.unsubscribe(&self.topic, id)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "topic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LocalBus;
    use std::sync::Mutex;

    fn collect(source: &mut TopicPoseSource) -> Arc<Mutex<Vec<Pose>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        source
            .attach(Box::new(move |pose| s.lock().unwrap().push(*pose)))
            .unwrap();
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn throttles_bursts() {
        let bus = Arc::new(LocalBus::new());
        let mut source =
            TopicPoseSource::new(bus.clone(), "/robot_pose", Some(Duration::from_millis(100)));
        let seen = collect(&mut source);

        for i in 0..5 {
            bus.publish("/robot_pose", Message::Pose(Pose::from_xy_yaw(i as f64, 0.0, 0.0)))
                .unwrap();
        }
        tokio::time::advance(Duration::from_millis(100)).await;
        bus.publish("/robot_pose", Message::Pose(Pose::from_xy_yaw(9.0, 0.0, 0.0)))
            .unwrap();

        let xs: Vec<f64> = seen.lock().unwrap().iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![0.0, 9.0]);
    }

    #[test]
    fn unthrottled_source_sees_everything_until_detached() {
        let bus = Arc::new(LocalBus::new());
        let mut source = TopicPoseSource::new(bus.clone(), "/robot_pose", None);
        let seen = collect(&mut source);

        for _ in 0..3 {
            bus.publish("/robot_pose", Message::Pose(Pose::default()))
                .unwrap();
        }
        source.detach().unwrap();
        bus.publish("/robot_pose", Message::Pose(Pose::default()))
            .unwrap();

        assert_eq!(seen.lock().unwrap().len(), 3);
        assert_eq!(bus.subscriber_count("/robot_pose"), 0);
    }
}

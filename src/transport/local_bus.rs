//! In-process transport
//!
//! Delivers published messages synchronously, in subscription order, on the
//! publishing thread. Callbacks run without the bus lock held, so they may
//! subscribe or unsubscribe.

use super::{Message, Transport};
use crate::common::{Callback, ListenerId};
use crate::error::{Result, VizError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace};

type SharedCallback = Arc<Mutex<Callback<Message>>>;

struct Subscriber {
    id: ListenerId,
    message_type: String,
    callback: SharedCallback,
}

/// Topic bus living in the current process
#[derive(Default)]
pub struct LocalBus {
    topics: RwLock<HashMap<String, Vec<Subscriber>>>,
    next_id: AtomicU64,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `message` to every matching subscriber of `topic`.
    ///
    /// Returns the number of callbacks invoked.
    pub fn publish(&self, topic: &str, message: Message) -> Result<usize> {
        let targets: Vec<SharedCallback> = {
            let topics = self
                .topics
                .read()
                .map_err(|_| VizError::Lock("bus topics"))?;
            match topics.get(topic) {
                Some(subscribers) => subscribers
                    .iter()
                    .filter(|s| s.message_type == message.type_name())
                    .map(|s| Arc::clone(&s.callback))
                    .collect(),
                None => Vec::new(),
            }
        };

        trace!(topic, kind = message.type_name(), receivers = targets.len(), "publish");
        for target in &targets {
            let mut callback = target
                .lock()
                .map_err(|_| VizError::Lock("bus subscriber"))?;
            (*callback)(&message);
        }
        Ok(targets.len())
    }

    /// Number of live subscriptions on `topic`
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .map(|topics| topics.get(topic).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

impl Transport for LocalBus {
    fn subscribe(
        &self,
        topic: &str,
        message_type: &str,
        callback: Callback<Message>,
    ) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut topics = self
            .topics
            .write()
            .map_err(|_| VizError::Lock("bus topics"))?;
        topics.entry(topic.to_string()).or_default().push(Subscriber {
            id,
            message_type: message_type.to_string(),
            callback: Arc::new(Mutex::new(callback)),
        });
        debug!(topic, message_type, id = id.0, "subscribed");
        Ok(id)
    }

    fn unsubscribe(&self, topic: &str, id: ListenerId) -> Result<()> {
        let mut topics = self
            .topics
            .write()
            .map_err(|_| VizError::Lock("bus topics"))?;
        let subscribers = topics
            .get_mut(topic)
            .ok_or_else(|| VizError::NotSubscribed(topic.to_string()))?;
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        if subscribers.len() == before {
            return Err(VizError::NotSubscribed(format!("{} #{}", topic, id.0)));
        }
        if subscribers.is_empty() {
            topics.remove(topic);
        }
        debug!(topic, id = id.0, "unsubscribed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Pose;
    use crate::transport::{OCCUPANCY_GRID_TYPE, POSE_TYPE};
    use std::sync::atomic::AtomicUsize;

    fn counter(count: &Arc<AtomicUsize>) -> Callback<Message> {
        let count = Arc::clone(count);
        Box::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn delivers_only_matching_message_types() {
        let bus = LocalBus::new();
        let poses = Arc::new(AtomicUsize::new(0));
        let grids = Arc::new(AtomicUsize::new(0));
        bus.subscribe("/robot_pose", POSE_TYPE, counter(&poses)).unwrap();
        bus.subscribe("/robot_pose", OCCUPANCY_GRID_TYPE, counter(&grids))
            .unwrap();

        let delivered = bus
            .publish("/robot_pose", Message::Pose(Pose::default()))
            .unwrap();

        assert_eq!(delivered, 1);
        assert_eq!(poses.load(Ordering::SeqCst), 1);
        assert_eq!(grids.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = LocalBus::new();
        assert_eq!(bus.publish("/nobody", Message::Pose(Pose::default())).unwrap(), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = LocalBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        let id = bus.subscribe("/robot_pose", POSE_TYPE, counter(&count)).unwrap();
        bus.unsubscribe("/robot_pose", id).unwrap();

        bus.publish("/robot_pose", Message::Pose(Pose::default()))
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count("/robot_pose"), 0);
        assert!(matches!(
            bus.unsubscribe("/robot_pose", id),
            Err(VizError::NotSubscribed(_))
        ));
    }
}

//! Transform client over a topic transport

use super::{normalize_frame, Transform, TransformClient, TfTree};
use crate::common::{Callback, ListenerId, Listeners};
use crate::error::{Result, VizError};
use crate::transport::{Message, Transport, TF_MESSAGE_TYPE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub const TF_TOPIC: &str = "/tf";
pub const TF_STATIC_TOPIC: &str = "/tf_static";

#[derive(Default)]
struct TfState {
    tree: TfTree,
    frames: HashMap<String, Listeners<Transform>>,
}

impl TfState {
    fn apply(&mut self, fixed_frame: &str, batch: &[super::TransformStamped]) {
        for transform in batch {
            self.tree.insert(transform);
        }
        let TfState { tree, frames } = self;
        for (frame, listeners) in frames.iter_mut() {
            if let Some(resolved) = tree.lookup(fixed_frame, frame) {
                listeners.emit(&resolved);
            }
        }
    }
}

/// Listens on `/tf` and `/tf_static` and resolves frames into a fixed frame
pub struct TfClient {
    transport: Arc<dyn Transport>,
    fixed_frame: String,
    state: Arc<Mutex<TfState>>,
    subscriptions: Mutex<Vec<(&'static str, ListenerId)>>,
}

impl TfClient {
    /// Subscribe to the transform topics of `transport`
    pub fn connect(transport: Arc<dyn Transport>, fixed_frame: &str) -> Result<Arc<Self>> {
        let fixed_frame = normalize_frame(fixed_frame).to_string();
        let state = Arc::new(Mutex::new(TfState::default()));

        let mut subscriptions = Vec::new();
        for topic in [TF_TOPIC, TF_STATIC_TOPIC] {
            let state = Arc::clone(&state);
            let fixed = fixed_frame.clone();
            let id = transport.subscribe(
                topic,
                TF_MESSAGE_TYPE,
                Box::new(move |message| {
                    let Message::Tf(batch) = message else {
                        return;
                    };
                    match state.lock() {
                        Ok(mut state) => state.apply(&fixed, batch),
                        Err(_) => warn!("dropping transforms: tf state poisoned"),
                    }
                }),
            )?;
            subscriptions.push((topic, id));
        }
        debug!(fixed_frame = %fixed_frame, "tf client connected");

        Ok(Arc::new(TfClient {
            transport,
            fixed_frame,
            state,
            subscriptions: Mutex::new(subscriptions),
        }))
    }

    /// Latest resolved transform of `frame`
    pub fn lookup(&self, frame: &str) -> Result<Option<Transform>> {
        let state = self.state.lock().map_err(|_| VizError::Lock("tf state"))?;
        Ok(state.tree.lookup(&self.fixed_frame, frame))
    }

    /// Stop listening to the transform topics
    pub fn disconnect(&self) -> Result<()> {
        let mut subscriptions = self
            .subscriptions
            .lock()
            .map_err(|_| VizError::Lock("tf subscriptions"))?;
        for (topic, id) in subscriptions.drain(..) {
            self.transport.unsubscribe(topic, id)?;
        }
        Ok(())
    }
}

impl TransformClient for TfClient {
    fn subscribe(&self, frame_id: &str, mut callback: Callback<Transform>) -> Result<ListenerId> {
        let frame = normalize_frame(frame_id).to_string();
        let mut state = self.state.lock().map_err(|_| VizError::Lock("tf state"))?;

        // a frame that is already known is reported right away
        if let Some(resolved) = state.tree.lookup(&self.fixed_frame, &frame) {
            callback(&resolved);
        }
        let id = state.frames.entry(frame).or_default().add(callback);
        Ok(id)
    }

    fn unsubscribe(&self, frame_id: &str, id: ListenerId) -> Result<()> {
        let frame = normalize_frame(frame_id);
        let mut state = self.state.lock().map_err(|_| VizError::Lock("tf state"))?;
        let removed = state
            .frames
            .get_mut(frame)
            .map_or(false, |listeners| listeners.remove(id));
        if !removed {
            return Err(VizError::NotSubscribed(frame.to_string()));
        }
        if state.frames.get(frame).map_or(false, Listeners::is_empty) {
            state.frames.remove(frame);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tf::TransformStamped;
    use crate::transport::LocalBus;
    use nalgebra::{Quaternion, Vector3};

    fn stamped(parent: &str, child: &str, x: f64, y: f64) -> TransformStamped {
        TransformStamped {
            parent_frame_id: parent.to_string(),
            child_frame_id: child.to_string(),
            transform: Transform {
                translation: Vector3::new(x, y, 0.0),
                rotation: Quaternion::identity(),
            },
        }
    }

    #[test]
    fn notifies_once_chain_resolves() {
        let bus = Arc::new(LocalBus::new());
        let client = TfClient::connect(bus.clone(), "/map").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        client
            .subscribe(
                "/base_link",
                Box::new(move |tf| s.lock().unwrap().push(tf.translation)),
            )
            .unwrap();

        bus.publish(TF_TOPIC, Message::Tf(vec![stamped("odom", "base_link", 1.0, 1.0)]))
            .unwrap();
        assert!(seen.lock().unwrap().is_empty());

        bus.publish(
            TF_STATIC_TOPIC,
            Message::Tf(vec![stamped("map", "odom", 2.0, 0.0)]),
        )
        .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Vector3::new(3.0, 1.0, 0.0)]);
        assert!(client.lookup("base_link").unwrap().is_some());
    }

    #[test]
    fn unsubscribe_and_disconnect() {
        let bus = Arc::new(LocalBus::new());
        let client = TfClient::connect(bus.clone(), "map").unwrap();
        let id = client.subscribe("base_link", Box::new(|_| {})).unwrap();
        client.unsubscribe("base_link", id).unwrap();
        assert!(client.unsubscribe("base_link", id).is_err());

        assert_eq!(bus.subscriber_count(TF_TOPIC), 1);
        client.disconnect().unwrap();
        assert_eq!(bus.subscriber_count(TF_TOPIC), 0);
        assert_eq!(bus.subscriber_count(TF_STATIC_TOPIC), 0);
    }
}

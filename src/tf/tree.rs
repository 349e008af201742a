//! Latest-transform buffer with chain resolution

use super::{normalize_frame, Transform, TransformStamped};
use nalgebra::Isometry3;
use std::collections::HashMap;

/// Longest parent chain followed before giving up (guards against cycles)
const MAX_CHAIN_DEPTH: usize = 64;

/// Latest transform of every child frame relative to its parent
#[derive(Debug, Default, Clone)]
pub struct TfTree {
    parents: HashMap<String, (String, Isometry3<f64>)>,
}

impl TfTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a transform, replacing any previous one for the same child
    pub fn insert(&mut self, transform: &TransformStamped) {
        self.parents.insert(
            normalize_frame(&transform.child_frame_id).to_string(),
            (
                normalize_frame(&transform.parent_frame_id).to_string(),
                transform.transform.to_isometry(),
            ),
        );
    }

    /// Pose of `frame` expressed in `fixed_frame`, if the chain is known
    pub fn lookup(&self, fixed_frame: &str, frame: &str) -> Option<Transform> {
        let fixed_frame = normalize_frame(fixed_frame);
        let mut current = normalize_frame(frame);
        let mut accumulated = Isometry3::identity();

        for _ in 0..MAX_CHAIN_DEPTH {
            if current == fixed_frame {
                return Some(Transform::from_isometry(&accumulated));
            }
            let (parent, parent_to_child) = self.parents.get(current)?;
            accumulated = parent_to_child * accumulated;
            current = parent.as_str();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};
    use std::f64::consts::FRAC_PI_2;

    fn stamped(parent: &str, child: &str, x: f64, y: f64, yaw: f64) -> TransformStamped {
        TransformStamped {
            parent_frame_id: parent.to_string(),
            child_frame_id: child.to_string(),
            transform: Transform {
                translation: Vector3::new(x, y, 0.0),
                rotation: *UnitQuaternion::from_euler_angles(0.0, 0.0, yaw).quaternion(),
            },
        }
    }

    #[test]
    fn composes_chain_to_fixed_frame() {
        let mut tree = TfTree::new();
        tree.insert(&stamped("map", "odom", 1.0, 0.0, FRAC_PI_2));
        tree.insert(&stamped("odom", "base_link", 2.0, 0.0, 0.0));

        let pose = tree.lookup("map", "base_link").unwrap();
        // odom is rotated a quarter turn, so base_link's 2m ends up along +y
        assert!((pose.translation.x - 1.0).abs() < 1e-9);
        assert!((pose.translation.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn leading_slashes_are_ignored() {
        let mut tree = TfTree::new();
        tree.insert(&stamped("/map", "/base_link", 3.0, 4.0, 0.0));
        let pose = tree.lookup("map", "/base_link").unwrap();
        assert_eq!(pose.translation, Vector3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn unknown_or_cyclic_chains_resolve_to_none() {
        let mut tree = TfTree::new();
        assert!(tree.lookup("map", "base_link").is_none());

        tree.insert(&stamped("a", "b", 0.0, 0.0, 0.0));
        tree.insert(&stamped("b", "a", 0.0, 0.0, 0.0));
        assert!(tree.lookup("map", "a").is_none());
    }

    #[test]
    fn fixed_frame_resolves_to_identity() {
        let tree = TfTree::new();
        let pose = tree.lookup("map", "map").unwrap();
        assert_eq!(pose.translation, Vector3::zeros());
    }
}

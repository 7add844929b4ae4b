//! The serialized form of a node collection, used for save, load, and paste.
//!
//! The payload is plain JSON: one record per node carrying its shape kind
//! and geometry, texts, identity, and the identities of its children. Only
//! the `"Rectangle"` shape kind is supported; anything else fails the whole
//! load before any node is materialized. Child references that resolve to
//! nothing are tolerated — partial pastes are expected to point at nodes
//! outside the pasted set.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TrellisError;
use crate::node::NodeId;

/// The only body shape kind the snapshot format supports
pub const RECTANGLE_KIND: &str = "Rectangle";

/// A serialized node collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<NodeRecord>,
}

/// One serialized node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub body_shape: BodyShapeRecord,
    #[serde(default)]
    pub inner_text: String,
    #[serde(default)]
    pub details: String,
    pub uuid: NodeId,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// Serialized geometry of a node's body shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyShapeRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub width: f32,
    pub height: f32,
    pub location_left_top: [f32; 2],
}

impl Snapshot {
    /// Reads a snapshot from a JSON file
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, TrellisError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the snapshot to a JSON file, overwriting it as a whole
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), TrellisError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Replaces every identity in the payload with a fresh one, rewriting all
/// internal child references consistently.
///
/// Users paste the same payload repeatedly; refreshing prevents identity
/// collisions with nodes already owned by the manager. References to
/// identities outside the payload are left untouched so that a partial
/// paste can still wire up against nodes that already exist.
pub fn refresh_identities(snapshot: &mut Snapshot) {
    for i in 0..snapshot.nodes.len() {
        let old = snapshot.nodes[i].uuid;
        let fresh = NodeId::generate();
        snapshot.nodes[i].uuid = fresh;

        for (j, record) in snapshot.nodes.iter_mut().enumerate() {
            if j == i {
                continue;
            }
            for child in &mut record.children {
                if *child == old {
                    *child = fresh;
                }
            }
        }
    }
}

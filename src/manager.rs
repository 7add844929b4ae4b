//! The node manager: owner of the node collection, its connectivity, and
//! every edit operation on them.
//!
//! The manager holds the nodes in insertion order (which doubles as the
//! tie-break order for cursor navigation and the paint order), a derived
//! connector cache that is rebuilt wholesale after any edit that can touch
//! edges or positions, the keyboard cursor, and the staged "grow" state for
//! two-step node creation. All operations run synchronously to completion.

use std::str::FromStr;

use log::debug;

use crate::color::Color;
use crate::draw::PaintContext;
use crate::draw::curve::ConnectCurve;
use crate::error::TrellisError;
use crate::geometry::{Circle, Rect, Segment, Vector};
use crate::node::{EntityNode, NodeId};
use crate::settings::Settings;
use crate::snapshot::{self, BodyShapeRecord, NodeRecord, RECTANGLE_KIND, Snapshot};

/// Default offset of a freshly staged grow target, relative to the cursor
/// node's center
const DEFAULT_GROW_OFFSET: Vector = Vector::new(400.0, 0.0);

/// Rotation step of the staged grow direction, in degrees
const GROW_ROTATE_STEP: f32 = 30.0;

/// Draft text of a freshly staged grow target
const DEFAULT_GROW_TEXT: &str = "New Node";

/// Half extent of the placeholder rectangle for newly clicked-in nodes
const NEW_NODE_HALF_EXTENT: f32 = 50.0;

/// A cursor movement direction.
///
/// Parsing is the boundary for raw textual commands: anything that is not
/// one of the four names fails to parse, and the caller treats that as a
/// no-op rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err("unrecognized direction"),
        }
    }
}

/// How connectors are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectorStyle {
    /// Cubic curve between the trimmed endpoints
    #[default]
    Curved,
    /// Straight line with an arrowhead at the child end
    Straight,
}

/// Behavior flags the manager consumes, handed in explicitly at
/// construction instead of being read from process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Whether overlapping nodes push each other apart
    pub collision_enabled: bool,
    /// Connector rendering style
    pub connector_style: ConnectorStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collision_enabled: true,
            connector_style: ConnectorStyle::default(),
        }
    }
}

impl From<&Settings> for EngineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            collision_enabled: settings.is_enable_node_collision,
            connector_style: if settings.line_style == 1 {
                ConnectorStyle::Straight
            } else {
                ConnectorStyle::Curved
            },
        }
    }
}

/// Owns all nodes and connections of one diagram.
///
/// Node lookup is by identity with first-match semantics over insertion
/// order; loading the same payload twice without an identity refresh can
/// leave duplicate identities in the collection, and every identity-based
/// operation then addresses the earliest node.
#[derive(Debug)]
pub struct NodeManager {
    nodes: Vec<EntityNode>,

    /// Trimmed visible connector per (parent, child) edge. Purely a paint
    /// cache: rebuilt wholesale after edits, never patched incrementally.
    connectors: Vec<Segment>,

    /// The node keyboard navigation is attached to, if any
    cursor: Option<NodeId>,

    /// Offset of the staged grow target relative to the cursor center;
    /// `Some` means a grow is pending confirmation
    grow_offset: Option<Vector>,
    grow_draft: String,

    config: EngineConfig,
}

impl NodeManager {
    /// Creates an empty manager with the given behavior flags
    pub fn new(config: EngineConfig) -> Self {
        Self {
            nodes: Vec::new(),
            connectors: Vec::new(),
            cursor: None,
            grow_offset: None,
            grow_draft: String::new(),
            config,
        }
    }

    /// Returns the nodes in insertion order
    pub fn nodes(&self) -> &[EntityNode] {
        &self.nodes
    }

    /// Returns the number of owned nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of parent→child edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.children().len()).sum()
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id() == id)
    }

    /// Returns the first owned node with the given identity
    pub fn node(&self, id: NodeId) -> Option<&EntityNode> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Returns the first owned node with the given identity, mutably
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut EntityNode> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Returns the node the cursor is attached to, if any
    pub fn cursor_node(&self) -> Option<&EntityNode> {
        self.cursor.and_then(|id| self.node(id))
    }

    /// Returns the identity under the cursor, if any
    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Attaches the cursor to an owned node, or detaches it.
    ///
    /// Pointing the cursor at an identity the manager does not own is a
    /// no-op.
    pub fn set_cursor(&mut self, id: Option<NodeId>) {
        match id {
            Some(id) if self.index_of(id).is_none() => {}
            _ => self.cursor = id,
        }
    }

    /// Moves the cursor to the nearest node on the queried side.
    ///
    /// Without a cursor the first owned node is adopted (no-op on an empty
    /// collection). Candidates are the nodes whose center lies strictly on
    /// the queried side of the cursor's center; the winner minimizes the
    /// facing edge-midpoint distance, with collection order breaking ties.
    /// No candidate leaves the cursor unchanged.
    pub fn move_cursor(&mut self, direction: Direction) {
        let Some(cursor_shape) = self.cursor_node().map(|node| node.body_shape()) else {
            self.cursor = self.nodes.first().map(|node| node.id());
            return;
        };

        let mut min_dist = f32::INFINITY;
        let mut min_id = None;
        for node in &self.nodes {
            if Some(node.id()) == self.cursor {
                continue;
            }
            let shape = node.body_shape();
            let (qualifies, dist) = match direction {
                Direction::Up => (
                    shape.center().y() < cursor_shape.center().y(),
                    shape.bottom_center().distance_to(cursor_shape.top_center()),
                ),
                Direction::Down => (
                    shape.center().y() > cursor_shape.center().y(),
                    shape.top_center().distance_to(cursor_shape.bottom_center()),
                ),
                Direction::Left => (
                    shape.center().x() < cursor_shape.center().x(),
                    shape.right_center().distance_to(cursor_shape.left_center()),
                ),
                Direction::Right => (
                    shape.center().x() > cursor_shape.center().x(),
                    shape.left_center().distance_to(cursor_shape.right_center()),
                ),
            };
            if qualifies && dist < min_dist {
                min_dist = dist;
                min_id = Some(node.id());
            }
        }
        if min_id.is_some() {
            self.cursor = min_id;
        }
    }

    /// Reports whether a grow target is staged and awaiting confirmation
    pub fn is_grow_prepared(&self) -> bool {
        self.grow_offset.is_some()
    }

    /// Returns the staged grow offset relative to the cursor center
    pub fn grow_offset(&self) -> Option<Vector> {
        self.grow_offset
    }

    /// Stages a grow target at the default offset from the cursor node.
    ///
    /// No-op without a cursor.
    pub fn grow_node(&mut self) {
        if self.cursor_node().is_none() {
            return;
        }
        self.grow_offset = Some(DEFAULT_GROW_OFFSET);
        self.grow_draft = DEFAULT_GROW_TEXT.to_string();
    }

    /// Rotates the staged grow direction by one step.
    ///
    /// No-op when nothing is staged.
    pub fn rotate_grow_direction(&mut self, clockwise: bool) {
        if let Some(offset) = self.grow_offset {
            let step = if clockwise {
                GROW_ROTATE_STEP
            } else {
                -GROW_ROTATE_STEP
            };
            self.grow_offset = Some(offset.rotate(step));
        }
    }

    /// Discards any staged grow target; no node is created
    pub fn grow_node_cancel(&mut self) {
        self.grow_offset = None;
        self.grow_draft.clear();
    }

    /// Materializes the staged grow target: creates a node at
    /// cursor-center + offset carrying the draft text, and connects the
    /// cursor node to it as a parent.
    ///
    /// Requires both a cursor and a staged offset; otherwise a no-op
    /// returning `None`.
    pub fn grow_node_confirm(&mut self) -> Option<NodeId> {
        let cursor_id = self.cursor?;
        let offset = self.grow_offset?;
        let center = self.node(cursor_id)?.body_shape().center();

        let new_id = self.add_node_at(center.add(offset));
        let draft = std::mem::take(&mut self.grow_draft);
        if let Some(node) = self.node_mut(new_id) {
            node.set_inner_text(draft);
        }
        self.connect(cursor_id, new_id);
        self.grow_node_cancel();
        Some(new_id)
    }

    /// Creates a node whose placeholder rectangle is centered on the given
    /// world point; the node immediately auto-sizes to its text
    pub fn add_node_at(&mut self, location_world: Vector) -> NodeId {
        let half = Vector::new(NEW_NODE_HALF_EXTENT, NEW_NODE_HALF_EXTENT);
        let node = EntityNode::new(Rect::new(
            location_world.sub(half),
            NEW_NODE_HALF_EXTENT * 2.0,
            NEW_NODE_HALF_EXTENT * 2.0,
        ));
        let id = node.id();
        self.nodes.push(node);
        id
    }

    /// Propagates overlap resolution outward from a node.
    ///
    /// The subject is pushed off every other node it strictly overlaps, and
    /// propagation then continues from each such neighbor — a chain
    /// reaction that settles a cluster of freshly overlapping boxes. There
    /// is deliberately no visited set: a resolution rule that fails to
    /// reduce overlap between two mutually overlapping nodes can recurse
    /// without bound, matching the behavior this engine reproduces.
    ///
    /// No-op when collision is disabled in the configuration.
    pub fn collide_dfs(&mut self, subject: NodeId) {
        if !self.config.collision_enabled {
            return;
        }
        if let Some(idx) = self.index_of(subject) {
            self.collide_dfs_at(idx);
        }
    }

    fn collide_dfs_at(&mut self, subject_idx: usize) {
        for i in 0..self.nodes.len() {
            if i == subject_idx {
                continue;
            }
            let other_shape = self.nodes[i].body_shape();
            let subject_shape = self.nodes[subject_idx].body_shape();
            if other_shape.is_collision(subject_shape, 0.0) {
                self.nodes[subject_idx].resolve_overlap(other_shape);
                self.collide_dfs_at(i);
            }
        }
    }

    /// Moves a single node, resolves collisions around it, and rebuilds the
    /// connector cache. Children stay where they are.
    pub fn move_node(&mut self, id: NodeId, delta: Vector) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        self.nodes[idx].translate(delta);
        if self.config.collision_enabled {
            self.collide_dfs_at(idx);
        }
        self.rebuild_connectors();
    }

    /// Moves a node together with everything reachable through its
    /// children.
    ///
    /// The traversal carries a per-branch visited chain (cloned into each
    /// recursive call, not shared across siblings), so a cycle back toward
    /// the root terminates while a diamond may legitimately be reached once
    /// per branch.
    pub fn move_node_with_children(&mut self, id: NodeId, delta: Vector) {
        if self.index_of(id).is_none() {
            return;
        }
        self.move_with_children_dfs(id, delta, vec![id]);
        self.rebuild_connectors();
    }

    fn move_with_children_dfs(&mut self, id: NodeId, delta: Vector, visited: Vec<NodeId>) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        self.nodes[idx].translate(delta);
        if self.config.collision_enabled {
            self.collide_dfs_at(idx);
        }
        let children = self.nodes[idx].children().to_vec();
        for child in children {
            if visited.contains(&child) {
                continue;
            }
            let mut branch = visited.clone();
            branch.push(id);
            self.move_with_children_dfs(child, delta, branch);
        }
    }

    /// Rotates the subtree hanging off a node around that node's center.
    ///
    /// Every node reachable through children (chain-guarded like
    /// [`Self::move_node_with_children`]) keeps its distance to the fixed
    /// rotation center while the center→node direction turns by `degrees`.
    /// A node with no children therefore shows no visible effect.
    pub fn rotate_node(&mut self, id: NodeId, degrees: f32) {
        if self.index_of(id).is_none() {
            return;
        }
        self.rotate_dfs(id, id, degrees, Vec::new());
        self.rebuild_connectors();
    }

    fn rotate_dfs(&mut self, center_id: NodeId, current_id: NodeId, degrees: f32, visited: Vec<NodeId>) {
        let Some(center) = self.node(center_id).map(|node| node.body_shape().center()) else {
            return;
        };
        let Some(idx) = self.index_of(current_id) else {
            return;
        };

        let shape = self.nodes[idx].body_shape();
        let radius = shape.center().distance_to(center);
        let direction = shape.center().sub(center).normalize().rotate(degrees);
        let new_center = center.add(direction.scale(radius));
        self.nodes[idx].translate_to(new_center.sub(Vector::new(
            shape.width() / 2.0,
            shape.height() / 2.0,
        )));

        let children = self.nodes[idx].children().to_vec();
        for child in children {
            if visited.contains(&child) {
                continue;
            }
            let mut branch = visited.clone();
            branch.push(current_id);
            self.rotate_dfs(center_id, child, degrees, branch);
        }
    }

    /// Connects two owned nodes as parent→child.
    ///
    /// Returns false when either endpoint is not owned, or when the edge
    /// already exists or would point a node at itself.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        if self.index_of(from).is_none() || self.index_of(to).is_none() {
            return false;
        }
        let added = self
            .node_mut(from)
            .map(|node| node.add_child(to))
            .unwrap_or(false);
        self.rebuild_connectors();
        added
    }

    /// Removes the parent→child edge between two owned nodes.
    ///
    /// Returns false when either endpoint is not owned or no such edge
    /// exists.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> bool {
        if self.index_of(from).is_none() || self.index_of(to).is_none() {
            return false;
        }
        let removed = self
            .node_mut(from)
            .map(|node| node.remove_child(to))
            .unwrap_or(false);
        self.rebuild_connectors();
        removed
    }

    /// Deletes a node and purges every incoming reference to it
    pub fn delete_node(&mut self, id: NodeId) {
        self.delete_nodes(&[id]);
    }

    /// Deletes several nodes, purging incoming references for each
    pub fn delete_nodes(&mut self, ids: &[NodeId]) {
        for &id in ids {
            if let Some(idx) = self.index_of(id) {
                self.nodes.remove(idx);
            }
            for node in &mut self.nodes {
                node.remove_child(id);
            }
        }
        if let Some(cursor) = self.cursor {
            if self.index_of(cursor).is_none() {
                self.cursor = None;
            }
        }
        self.rebuild_connectors();
    }

    /// Returns the cached trimmed connectors, one per resolvable edge
    pub fn connectors(&self) -> &[Segment] {
        &self.connectors
    }

    /// Computes fresh trimmed connectors tagged with their endpoints, for
    /// edge hit-testing
    pub fn connectors_with_endpoints(&self) -> Vec<(Segment, NodeId, NodeId)> {
        let mut lines = Vec::new();
        for node in &self.nodes {
            for &child_id in node.children() {
                let Some(child) = self.node(child_id) else {
                    continue;
                };
                lines.push((
                    self.trimmed_connector(node, child),
                    node.id(),
                    child_id,
                ));
            }
        }
        lines
    }

    fn trimmed_connector(&self, parent: &EntityNode, child: &EntityNode) -> Segment {
        let spine = Segment::new(
            parent.body_shape().center(),
            child.body_shape().center(),
        );
        Segment::new(
            parent.body_shape().segment_intersection(spine),
            child.body_shape().segment_intersection(spine),
        )
    }

    /// Rebuilds the connector cache from scratch.
    ///
    /// Always a full O(edges) recompute; it runs only after discrete edits,
    /// never per frame.
    fn rebuild_connectors(&mut self) {
        let mut lines = Vec::new();
        for node in &self.nodes {
            for &child_id in node.children() {
                let Some(child) = self.node(child_id) else {
                    continue;
                };
                lines.push(self.trimmed_connector(node, child));
            }
        }
        self.connectors = lines;
    }

    /// Serializes every owned node
    pub fn dump(&self) -> Snapshot {
        Snapshot {
            nodes: self
                .nodes
                .iter()
                .map(|node| {
                    let shape = node.body_shape();
                    NodeRecord {
                        body_shape: BodyShapeRecord {
                            kind: RECTANGLE_KIND.to_string(),
                            width: shape.width(),
                            height: shape.height(),
                            location_left_top: [shape.location().x(), shape.location().y()],
                        },
                        inner_text: node.inner_text().to_string(),
                        details: node.details.clone(),
                        uuid: node.id(),
                        children: node.children().to_vec(),
                    }
                })
                .collect(),
        }
    }

    /// Replaces the owned collection with the snapshot contents.
    ///
    /// Identities are preserved as-is; the cursor and any staged grow are
    /// reset along with the nodes they pointed into.
    pub fn load(&mut self, snapshot: &Snapshot) -> Result<(), TrellisError> {
        self.nodes.clear();
        self.cursor = None;
        self.grow_node_cancel();
        self.add_snapshot(snapshot, Vector::default(), false)
    }

    /// Inserts the snapshot contents next to the existing nodes.
    ///
    /// All positions are offset by `offset`. With `refresh_ids` every
    /// pasted node receives a fresh identity (internal child references
    /// follow the remap), so pasting the same payload repeatedly never
    /// collides. Wiring is tolerant: a child identity that resolves to no
    /// owned node is skipped. An unsupported shape kind aborts the whole
    /// operation before any node is committed.
    pub fn add_snapshot(
        &mut self,
        snapshot: &Snapshot,
        offset: Vector,
        refresh_ids: bool,
    ) -> Result<(), TrellisError> {
        let mut snapshot = snapshot.clone();
        if refresh_ids {
            snapshot::refresh_identities(&mut snapshot);
        }

        // Materialize into a staging area first so a bad record cannot
        // leave a partially inserted graph behind
        let mut incoming = Vec::with_capacity(snapshot.nodes.len());
        for record in &snapshot.nodes {
            if record.body_shape.kind != RECTANGLE_KIND {
                return Err(TrellisError::UnsupportedShape(record.body_shape.kind.clone()));
            }
            let shape = Rect::new(
                Vector::new(
                    record.body_shape.location_left_top[0] + offset.x(),
                    record.body_shape.location_left_top[1] + offset.y(),
                ),
                record.body_shape.width,
                record.body_shape.height,
            );
            let mut node = EntityNode::restore(record.uuid, shape);
            node.set_inner_text(record.inner_text.clone());
            node.details = record.details.clone();
            incoming.push(node);
        }
        self.nodes.append(&mut incoming);

        // Second pass: wire children by identity, skipping anything that
        // does not resolve
        for record in &snapshot.nodes {
            let Some(parent_idx) = self.index_of(record.uuid) else {
                continue;
            };
            for &child_id in &record.children {
                if self.index_of(child_id).is_none() {
                    continue;
                }
                self.nodes[parent_idx].add_child(child_id);
            }
        }

        debug!(nodes = snapshot.nodes.len(), total = self.nodes.len(); "Snapshot nodes added");
        self.rebuild_connectors();
        Ok(())
    }

    /// Paints the whole diagram: nodes, connectors, the cursor highlight,
    /// and the pending-grow preview, in that order
    pub fn paint(&self, ctx: &mut PaintContext<'_>) {
        for node in &self.nodes {
            node.paint(ctx);
        }

        let scale = ctx.camera.scale();
        let connector_color = Color::new("rgb(204, 204, 204)").expect("valid CSS color");
        for line in &self.connectors {
            let from = ctx.camera.to_view(line.start());
            let to = ctx.camera.to_view(line.end());
            match self.config.connector_style {
                ConnectorStyle::Curved => {
                    ctx.painter
                        .draw_curve(ConnectCurve::new(from, to), connector_color, 4.0 * scale);
                }
                ConnectorStyle::Straight => {
                    ctx.painter
                        .draw_arrow(from, to, connector_color, 4.0 * scale, 30.0 * scale);
                }
            }
        }

        let white = Color::new("white").expect("valid CSS color");
        if let Some(cursor) = self.cursor_node() {
            let margin = 10.0;
            let shape = cursor.body_shape();
            let outline = Rect::new(
                ctx.camera
                    .to_view(shape.location().sub(Vector::new(margin, margin))),
                (shape.width() + margin * 2.0) * scale,
                (shape.height() + margin * 2.0) * scale,
            );
            ctx.painter.draw_rect(
                outline,
                white.with_alpha(0.0),
                white.with_alpha(0.78),
                2.0 * scale,
                8.0 * scale,
            );
        }

        if let (Some(cursor), Some(offset)) = (self.cursor_node(), self.grow_offset) {
            let center = cursor.body_shape().center();
            let target = center.add(offset);
            ctx.painter.draw_circle(
                Circle::new(ctx.camera.to_view(target), 50.0 * scale),
                white.with_alpha(0.0),
                white.with_alpha(0.5),
                4.0 * scale,
            );
            let arrow_color = Color::new("rgb(23, 159, 255)").expect("valid CSS color");
            ctx.painter.draw_arrow(
                ctx.camera.to_view(center),
                ctx.camera.to_view(target),
                arrow_color,
                4.0 * scale,
                30.0 * scale,
            );
        }
    }
}

impl Default for NodeManager {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

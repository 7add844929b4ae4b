//! The diagram node entity: a text box with geometry, display flags, a
//! stable identity, and an ordered list of child references.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Color;
use crate::draw::PaintContext;
use crate::draw::text::measure_text;
use crate::geometry::{Rect, Vector};

/// The stable identity of a node.
///
/// Identities survive save/reload and are distinct from any in-memory
/// position in the manager's collection; duplication with identity refresh
/// is the only operation that replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generates a fresh, globally unique identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A single diagram box.
///
/// The node owns its rectangle and its text; links to other nodes are held
/// as identities, with the [`NodeManager`](crate::manager::NodeManager) as
/// the sole owner of node lifetime. A node never lists itself as a child
/// and its children list holds no duplicates, but cycles across two or more
/// nodes are legal — traversals terminate through visited chains, not
/// through structural constraints here.
#[derive(Debug, Clone)]
pub struct EntityNode {
    id: NodeId,
    body_shape: Rect,
    inner_text: String,
    children: Vec<NodeId>,

    /// Free-form detail text shown below the box on demand
    pub details: String,
    /// Whether the detail text is currently displayed
    pub is_detail_show: bool,
    /// Whether the node is part of the current selection
    pub is_selected: bool,
    /// Stroke and text color of the box
    pub color: Color,
}

impl EntityNode {
    /// Font size of the inner text
    pub const FONT_SIZE: f32 = 20.0;
    /// Font size of the detail text
    pub const DETAIL_FONT_SIZE: f32 = 16.0;
    /// Padding between the text extent and the box border, in pixels
    pub const PADDING: f32 = 20.0;

    /// Wrap width of the detail panel, in world units
    const DETAIL_PANEL_WIDTH: f32 = 400.0;

    /// Creates a node with a fresh identity at the given body shape.
    ///
    /// The box immediately resizes to fit the default placeholder text.
    pub fn new(body_shape: Rect) -> Self {
        Self::restore(NodeId::generate(), body_shape)
    }

    /// Creates a node under an existing identity, used when materializing a
    /// snapshot.
    pub fn restore(id: NodeId, body_shape: Rect) -> Self {
        let mut node = Self {
            id,
            body_shape,
            inner_text: "...".to_string(),
            children: Vec::new(),
            details: String::new(),
            is_detail_show: false,
            is_selected: false,
            color: Color::new("rgb(204, 204, 204)").expect("valid CSS color"),
        };
        node.adjust_size_by_text();
        node
    }

    /// Returns the identity of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the rectangle governing position and size
    pub fn body_shape(&self) -> Rect {
        self.body_shape
    }

    /// Returns the display text
    pub fn inner_text(&self) -> &str {
        &self.inner_text
    }

    /// Sets the display text and resizes the box to fit it.
    ///
    /// Even empty text produces a valid box: the extent is the measured text
    /// size plus [`Self::PADDING`] on every side.
    pub fn set_inner_text(&mut self, text: impl Into<String>) {
        self.inner_text = text.into();
        self.adjust_size_by_text();
    }

    fn adjust_size_by_text(&mut self) {
        let size = measure_text(&self.inner_text, Self::FONT_SIZE);
        self.body_shape = self.body_shape.with_size(
            size.width() + 2.0 * Self::PADDING,
            size.height() + 2.0 * Self::PADDING,
        );
    }

    /// Replaces the body shape outright, bypassing text-based sizing
    pub(crate) fn set_body_shape(&mut self, body_shape: Rect) {
        self.body_shape = body_shape;
    }

    /// Returns the ordered child identities
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Appends a child reference.
    ///
    /// Returns false without modifying anything when the child is this node
    /// itself or is already present.
    pub fn add_child(&mut self, child: NodeId) -> bool {
        if child == self.id {
            return false;
        }
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Removes a child reference, reporting whether a removal occurred
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|&c| c != child);
        before != self.children.len()
    }

    /// Moves the box by the given delta; children are unaffected
    pub fn translate(&mut self, delta: Vector) {
        self.body_shape = self.body_shape.translate(delta);
    }

    /// Moves the box so its left-top corner sits at the given point
    pub fn translate_to(&mut self, left_top: Vector) {
        self.body_shape = self.body_shape.translate_to(left_top);
    }

    /// Pushes this node off another rectangle it currently overlaps.
    ///
    /// Displacement rule: move along the axis of minimum overlap depth, by
    /// the full depth, away from the other rectangle's center; ties between
    /// axes push along x, ties between directions push toward +x/+y. After
    /// the call the two rectangles no longer strictly overlap.
    pub fn resolve_overlap(&mut self, other: Rect) {
        let body = self.body_shape;
        let overlap_x = body.right().min(other.right()) - body.left().max(other.left());
        let overlap_y = body.bottom().min(other.bottom()) - body.top().max(other.top());
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return;
        }
        if overlap_x <= overlap_y {
            let direction = if body.center().x() >= other.center().x() {
                1.0
            } else {
                -1.0
            };
            self.translate(Vector::new(direction * overlap_x, 0.0));
        } else {
            let direction = if body.center().y() >= other.center().y() {
                1.0
            } else {
                -1.0
            };
            self.translate(Vector::new(0.0, direction * overlap_y));
        }
    }

    /// Paints the box, its text, and its optional decorations.
    pub fn paint(&self, ctx: &mut PaintContext<'_>) {
        let scale = ctx.camera.scale();
        let shape = self.body_shape;

        let view_rect = Rect::new(
            ctx.camera.to_view(shape.location()),
            shape.width() * scale,
            shape.height() * scale,
        );
        let fill = Color::new("rgb(31, 31, 31)")
            .expect("valid CSS color")
            .with_alpha(0.78);
        ctx.painter
            .draw_rect(view_rect, fill, self.color, 2.0 * scale, 16.0 * scale);

        ctx.painter.draw_text_centered(
            ctx.camera.to_view(shape.center()),
            &self.inner_text,
            Self::FONT_SIZE * scale,
            self.color,
        );

        if self.is_detail_show {
            let panel_origin = shape.location().add(Vector::new(0.0, shape.height()));
            let background = Color::new("black").expect("valid CSS color").with_alpha(0.5);
            ctx.painter.draw_paragraph(
                ctx.camera.to_view(panel_origin),
                &self.details,
                Self::DETAIL_PANEL_WIDTH * scale,
                Self::DETAIL_FONT_SIZE * scale,
                Color::new("white").expect("valid CSS color"),
                background,
            );
        }

        if self.is_selected {
            let margin = 10.0;
            let outline = Rect::new(
                ctx.camera
                    .to_view(shape.location().sub(Vector::new(margin, margin))),
                (shape.width() + 2.0 * margin) * scale,
                (shape.height() + 2.0 * margin) * scale,
            );
            let transparent = Color::new("black").expect("valid CSS color").with_alpha(0.0);
            ctx.painter
                .draw_rect(outline, transparent, self.color, 3.0 * scale, 20.0 * scale);
        }
    }
}

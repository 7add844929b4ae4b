/// A 2D vector, used both for positions (world coordinates) and for
/// displacements between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector {
    x: f32,
    y: f32,
}

impl Vector {
    /// Creates a new vector with the specified components
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-component of the vector
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-component of the vector
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both components are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another vector to this vector, returning a new vector
    pub fn add(self, other: Vector) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another vector from this vector, returning a new vector
    pub fn sub(self, other: Vector) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both components by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Rotates the vector around the origin by the given angle in degrees.
    ///
    /// Positive angles rotate from the +x axis toward the +y axis.
    pub fn rotate(self, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = radians.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Returns the vector scaled to unit length.
    ///
    /// The zero vector normalizes to itself.
    pub fn normalize(self) -> Self {
        let len = self.hypot();
        if len == 0.0 { self } else { self.scale(1.0 / len) }
    }

    /// Calculates the hypotenuse (Euclidean distance from the origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Calculates the Euclidean distance to another vector
    pub fn distance_to(self, other: Vector) -> f32 {
        other.sub(self).hypot()
    }

    /// Cross product magnitude of two 2D vectors
    fn cross(self, other: Vector) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    start: Vector,
    end: Vector,
}

impl Segment {
    /// Creates a new segment from start to end
    pub fn new(start: Vector, end: Vector) -> Self {
        Self { start, end }
    }

    /// Returns the start point of the segment
    pub fn start(self) -> Vector {
        self.start
    }

    /// Returns the end point of the segment
    pub fn end(self) -> Vector {
        self.end
    }

    /// Checks whether this segment intersects another segment.
    ///
    /// Parallel, collinear, and degenerate pairs are treated as
    /// non-intersecting.
    pub fn is_intersecting(self, other: Segment) -> bool {
        self.intersection(other).is_some()
    }

    /// Computes the intersection point with another segment, if any.
    ///
    /// Parallel, collinear, and degenerate pairs yield `None`.
    pub fn intersection(self, other: Segment) -> Option<Vector> {
        let r = self.end.sub(self.start);
        let s = other.end.sub(other.start);
        let denom = r.cross(s);
        if denom == 0.0 {
            return None;
        }
        let offset = other.start.sub(self.start);
        let t = offset.cross(s) / denom;
        let u = offset.cross(r) / denom;
        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
            Some(self.start.add(r.scale(t)))
        } else {
            None
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// An axis-aligned rectangle described by its left-top corner and its extent.
///
/// Width and height are always nonnegative: constructing a rectangle with a
/// negative extent shifts the origin so the covered region is unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    location: Vector,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new rectangle from its left-top corner, width, and height
    pub fn new(location_left_top: Vector, width: f32, height: f32) -> Self {
        let mut location = location_left_top;
        let mut width = width;
        let mut height = height;
        if width < 0.0 {
            location = Vector::new(location.x() + width, location.y());
            width = width.abs();
        }
        if height < 0.0 {
            location = Vector::new(location.x(), location.y() + height);
            height = height.abs();
        }
        Self {
            location,
            width,
            height,
        }
    }

    /// Creates a rectangle from its four edge coordinates
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(Vector::new(left, top), right - left, bottom - top)
    }

    /// Returns the left-top corner of the rectangle
    pub fn location(self) -> Vector {
        self.location
    }

    /// Returns the width of the rectangle
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height of the rectangle
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the leftmost x-coordinate
    pub fn left(self) -> f32 {
        self.location.x()
    }

    /// Returns the rightmost x-coordinate
    pub fn right(self) -> f32 {
        self.location.x() + self.width
    }

    /// Returns the topmost y-coordinate
    pub fn top(self) -> f32 {
        self.location.y()
    }

    /// Returns the bottommost y-coordinate
    pub fn bottom(self) -> f32 {
        self.location.y() + self.height
    }

    /// Returns the center point of the rectangle
    pub fn center(self) -> Vector {
        Vector::new(
            self.location.x() + self.width / 2.0,
            self.location.y() + self.height / 2.0,
        )
    }

    /// Returns the midpoint of the left edge
    pub fn left_center(self) -> Vector {
        Vector::new(self.left(), self.center().y())
    }

    /// Returns the midpoint of the right edge
    pub fn right_center(self) -> Vector {
        Vector::new(self.right(), self.center().y())
    }

    /// Returns the midpoint of the top edge
    pub fn top_center(self) -> Vector {
        Vector::new(self.center().x(), self.top())
    }

    /// Returns the midpoint of the bottom edge
    pub fn bottom_center(self) -> Vector {
        Vector::new(self.center().x(), self.bottom())
    }

    /// Returns the four corners in clockwise order starting at the left-top
    pub fn corners(self) -> [Vector; 4] {
        [
            Vector::new(self.left(), self.top()),
            Vector::new(self.right(), self.top()),
            Vector::new(self.right(), self.bottom()),
            Vector::new(self.left(), self.bottom()),
        ]
    }

    /// Checks whether the given point lies inside the rectangle (edges included)
    pub fn contains_point(self, point: Vector) -> bool {
        self.left() <= point.x()
            && point.x() <= self.right()
            && self.top() <= point.y()
            && point.y() <= self.bottom()
    }

    /// Checks whether another rectangle lies entirely inside this one
    pub fn contains(self, other: Rect) -> bool {
        self.left() <= other.left()
            && self.right() >= other.right()
            && self.top() <= other.top()
            && self.bottom() >= other.bottom()
    }

    /// Checks whether the gap between this rectangle and another is strictly
    /// smaller than `margin` on both axes.
    ///
    /// With margin 0 this is a strict-overlap test: rectangles that merely
    /// touch along an edge do not collide.
    pub fn is_collision(self, other: Rect, margin: f32) -> bool {
        let collision_x =
            self.right() - other.left() > -margin && other.right() - self.left() > -margin;
        let collision_y =
            self.bottom() - other.top() > -margin && other.bottom() - self.top() > -margin;
        collision_x && collision_y
    }

    /// Returns the four edges in the fixed probe order: top, bottom, left, right.
    ///
    /// Intersection queries report the first edge hit in this order, which
    /// decides the answer when a segment passes through a corner.
    fn edges(self) -> [Segment; 4] {
        [
            Segment::new(
                Vector::new(self.left(), self.top()),
                Vector::new(self.right(), self.top()),
            ),
            Segment::new(
                Vector::new(self.left(), self.bottom()),
                Vector::new(self.right(), self.bottom()),
            ),
            Segment::new(
                Vector::new(self.left(), self.top()),
                Vector::new(self.left(), self.bottom()),
            ),
            Segment::new(
                Vector::new(self.right(), self.top()),
                Vector::new(self.right(), self.bottom()),
            ),
        ]
    }

    /// Checks whether a segment crosses any edge of the rectangle
    pub fn is_intersecting_segment(self, segment: Segment) -> bool {
        self.edges()
            .iter()
            .any(|edge| edge.is_intersecting(segment))
    }

    /// Returns the intersection of a segment with the rectangle boundary.
    ///
    /// Edges are probed in the fixed top/bottom/left/right order and the
    /// first hit wins. A segment that crosses no edge (typically one lying
    /// entirely inside) falls back to the rectangle's center.
    pub fn segment_intersection(self, segment: Segment) -> Vector {
        for edge in self.edges() {
            if let Some(point) = edge.intersection(segment) {
                return point;
            }
        }
        self.center()
    }

    /// Moves the rectangle by the specified offset
    pub fn translate(self, offset: Vector) -> Self {
        Self {
            location: self.location.add(offset),
            ..self
        }
    }

    /// Relocates the rectangle so its left-top corner sits at the given point
    pub fn translate_to(self, left_top: Vector) -> Self {
        Self {
            location: left_top,
            ..self
        }
    }

    /// Returns a copy with the given extent, keeping the left-top corner
    pub fn with_size(self, width: f32, height: f32) -> Self {
        Self::new(self.location, width, height)
    }
}

/// A circle, used by the pending-grow preview decoration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Vector,
    radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(center: Vector, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns the center of the circle
    pub fn center(self) -> Vector {
        self.center
    }

    /// Returns the radius of the circle
    pub fn radius(self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_vector_add_sub() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(3.0, 4.0);
        assert_eq!(a.add(b), Vector::new(4.0, 6.0));
        assert_eq!(b.sub(a), Vector::new(2.0, 2.0));
    }

    #[test]
    fn test_vector_scale() {
        let v = Vector::new(2.0, -3.0);
        assert_eq!(v.scale(2.0), Vector::new(4.0, -6.0));
        assert!(v.scale(0.0).is_zero());
    }

    #[test]
    fn test_vector_rotate_quarter_turn() {
        let v = Vector::new(1.0, 0.0);
        let rotated = v.rotate(90.0);
        assert!(approx_eq!(f32, rotated.x(), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, rotated.y(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn test_vector_rotate_round_trip() {
        let v = Vector::new(3.0, 4.0);
        let back = v.rotate(30.0).rotate(-30.0);
        assert!(approx_eq!(f32, back.x(), v.x(), epsilon = 1e-5));
        assert!(approx_eq!(f32, back.y(), v.y(), epsilon = 1e-5));
    }

    #[test]
    fn test_vector_rotate_preserves_length() {
        let v = Vector::new(400.0, 0.0);
        let rotated = v.rotate(30.0);
        assert!(approx_eq!(f32, rotated.hypot(), 400.0, epsilon = 1e-2));
    }

    #[test]
    fn test_vector_normalize() {
        let v = Vector::new(3.0, 4.0);
        let unit = v.normalize();
        assert!(approx_eq!(f32, unit.hypot(), 1.0, epsilon = 1e-6));
        assert!(Vector::default().normalize().is_zero());
    }

    #[test]
    fn test_vector_distance() {
        let a = Vector::new(0.0, 0.0);
        let b = Vector::new(3.0, 4.0);
        assert_eq!(a.distance_to(b), 5.0);
        assert_eq!(b.distance_to(a), 5.0);
    }

    #[test]
    fn test_segment_crossing() {
        let a = Segment::new(Vector::new(0.0, 0.0), Vector::new(10.0, 10.0));
        let b = Segment::new(Vector::new(0.0, 10.0), Vector::new(10.0, 0.0));
        let point = a.intersection(b).expect("segments cross");
        assert!(approx_eq!(f32, point.x(), 5.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, point.y(), 5.0, epsilon = 1e-6));
        assert!(a.is_intersecting(b));
    }

    #[test]
    fn test_segment_parallel_is_not_intersecting() {
        let a = Segment::new(Vector::new(0.0, 0.0), Vector::new(10.0, 0.0));
        let b = Segment::new(Vector::new(0.0, 1.0), Vector::new(10.0, 1.0));
        assert!(a.intersection(b).is_none());

        // Collinear overlap also reports no intersection point
        let c = Segment::new(Vector::new(5.0, 0.0), Vector::new(15.0, 0.0));
        assert!(a.intersection(c).is_none());
    }

    #[test]
    fn test_segment_disjoint() {
        let a = Segment::new(Vector::new(0.0, 0.0), Vector::new(1.0, 1.0));
        let b = Segment::new(Vector::new(5.0, 0.0), Vector::new(6.0, 1.0));
        assert!(!a.is_intersecting(b));
    }

    #[test]
    fn test_rect_negative_extent_is_normalized() {
        let rect = Rect::new(Vector::new(0.0, 0.0), -10.0, -10.0);
        let reference = Rect::new(Vector::new(-10.0, -10.0), 10.0, 10.0);
        assert_eq!(rect.left(), reference.left());
        assert_eq!(rect.top(), reference.top());
        assert_eq!(rect.right(), reference.right());
        assert_eq!(rect.bottom(), reference.bottom());
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 10.0);
    }

    #[test]
    fn test_rect_accessors() {
        let rect = Rect::new(Vector::new(2.0, 3.0), 4.0, 6.0);
        assert_eq!(rect.left(), 2.0);
        assert_eq!(rect.right(), 6.0);
        assert_eq!(rect.top(), 3.0);
        assert_eq!(rect.bottom(), 9.0);
        assert_eq!(rect.center(), Vector::new(4.0, 6.0));
        assert_eq!(rect.left_center(), Vector::new(2.0, 6.0));
        assert_eq!(rect.right_center(), Vector::new(6.0, 6.0));
        assert_eq!(rect.top_center(), Vector::new(4.0, 3.0));
        assert_eq!(rect.bottom_center(), Vector::new(4.0, 9.0));
    }

    #[test]
    fn test_rect_overlap_scenario() {
        let r1 = Rect::new(Vector::new(0.0, 0.0), 10.0, 10.0);
        let r2 = Rect::new(Vector::new(5.0, 5.0), 10.0, 10.0);
        assert!(r1.is_collision(r2, 0.0));
        assert!(r2.is_collision(r1, 0.0));
        assert_eq!(r1.center(), Vector::new(5.0, 5.0));
    }

    #[test]
    fn test_rect_touching_edges_do_not_collide() {
        let r1 = Rect::new(Vector::new(0.0, 0.0), 10.0, 10.0);
        let r2 = Rect::new(Vector::new(10.0, 0.0), 10.0, 10.0);
        assert!(!r1.is_collision(r2, 0.0));
        // A positive margin turns the shared edge into a hit
        assert!(r1.is_collision(r2, 1.0));
    }

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(Vector::new(0.0, 0.0), 10.0, 10.0);
        let inner = Rect::new(Vector::new(2.0, 2.0), 4.0, 4.0);
        assert!(outer.contains(inner));
        assert!(!inner.contains(outer));
        assert!(outer.is_collision(inner, 0.0));
    }

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::new(Vector::new(0.0, 0.0), 10.0, 10.0);
        assert!(rect.contains_point(Vector::new(5.0, 5.0)));
        assert!(rect.contains_point(Vector::new(0.0, 0.0)));
        assert!(rect.contains_point(Vector::new(10.0, 10.0)));
        assert!(!rect.contains_point(Vector::new(10.1, 5.0)));
    }

    #[test]
    fn test_rect_segment_intersection_trims_at_boundary() {
        let rect = Rect::new(Vector::new(0.0, 0.0), 10.0, 10.0);

        // Leaves through the top edge
        let up = Segment::new(Vector::new(5.0, 5.0), Vector::new(5.0, -5.0));
        assert_eq!(rect.segment_intersection(up), Vector::new(5.0, 0.0));
        assert!(rect.is_intersecting_segment(up));

        // Leaves through the bottom edge
        let down = Segment::new(Vector::new(5.0, 5.0), Vector::new(5.0, 15.0));
        assert_eq!(rect.segment_intersection(down), Vector::new(5.0, 10.0));

        // Leaves through the right edge
        let right = Segment::new(Vector::new(5.0, 5.0), Vector::new(15.0, 5.0));
        assert_eq!(rect.segment_intersection(right), Vector::new(10.0, 5.0));
    }

    #[test]
    fn test_rect_segment_intersection_center_fallback() {
        let rect = Rect::new(Vector::new(0.0, 0.0), 10.0, 10.0);
        let inside = Segment::new(Vector::new(2.0, 2.0), Vector::new(3.0, 3.0));
        assert!(!rect.is_intersecting_segment(inside));
        assert_eq!(rect.segment_intersection(inside), rect.center());
    }

    #[test]
    fn test_rect_translate() {
        let rect = Rect::new(Vector::new(1.0, 1.0), 4.0, 4.0);
        let moved = rect.translate(Vector::new(2.0, -1.0));
        assert_eq!(moved.location(), Vector::new(3.0, 0.0));
        assert_eq!(moved.width(), 4.0);

        let relocated = rect.translate_to(Vector::new(0.0, 0.0));
        assert_eq!(relocated.location(), Vector::new(0.0, 0.0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_rect() -> impl Strategy<Value = Rect> {
            (
                -1_000.0f32..1_000.0,
                -1_000.0f32..1_000.0,
                0.0f32..500.0,
                0.0f32..500.0,
            )
                .prop_map(|(x, y, w, h)| Rect::new(Vector::new(x, y), w, h))
        }

        proptest! {
            #[test]
            fn collision_is_symmetric(a in arb_rect(), b in arb_rect(), margin in 0.0f32..50.0) {
                prop_assert_eq!(a.is_collision(b, margin), b.is_collision(a, margin));
            }

            #[test]
            fn containment_implies_collision(
                outer in arb_rect(),
                dx in 0.0f32..0.4,
                dy in 0.0f32..0.4,
            ) {
                // Build a positive-size rectangle strictly inside the outer one
                prop_assume!(outer.width() > 1.0 && outer.height() > 1.0);
                let inner = Rect::new(
                    Vector::new(
                        outer.left() + outer.width() * dx,
                        outer.top() + outer.height() * dy,
                    ),
                    outer.width() * 0.5,
                    outer.height() * 0.5,
                );
                prop_assert!(outer.contains(inner));
                prop_assert!(outer.is_collision(inner, 0.0));
            }

            #[test]
            fn normalized_rect_never_has_negative_extent(
                x in -100.0f32..100.0,
                y in -100.0f32..100.0,
                w in -100.0f32..100.0,
                h in -100.0f32..100.0,
            ) {
                let rect = Rect::new(Vector::new(x, y), w, h);
                prop_assert!(rect.width() >= 0.0);
                prop_assert!(rect.height() >= 0.0);
                // The absolute extent is preserved
                prop_assert_eq!(rect.left(), x.min(x + w));
                prop_assert_eq!(rect.top(), y.min(y + h));
            }
        }
    }
}

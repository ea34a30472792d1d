//! Strongly-typed geometric primitives for elbow routing.
//!
//! Coordinates are canvas (world) units with the y axis growing downward,
//! so `Heading::Down` points toward `+y`.

use std::fmt;
use std::ops::{Add, Sub};

use glam::{DVec2, dvec2};
use serde::{Deserialize, Serialize};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate a single coordinate (rejects NaN/infinite)
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

// ============================================================================
// Axis / Heading
// ============================================================================

/// Orientation of an axis-aligned segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis
    #[inline]
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Cardinal direction of a segment or of a shape exit point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Right,
    Down,
    Left,
    Up,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];

    /// Unit vector pointing along this heading (y-down)
    #[inline]
    pub fn unit(self) -> DVec2 {
        match self {
            Heading::Right => dvec2(1.0, 0.0),
            Heading::Down => dvec2(0.0, 1.0),
            Heading::Left => dvec2(-1.0, 0.0),
            Heading::Up => dvec2(0.0, -1.0),
        }
    }

    #[inline]
    pub fn reverse(self) -> Heading {
        match self {
            Heading::Right => Heading::Left,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Up => Heading::Down,
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Heading::Right | Heading::Left => Axis::Horizontal,
            Heading::Down | Heading::Up => Axis::Vertical,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        self.axis() == Axis::Horizontal
    }

    /// `+1.0` when the heading grows its coordinate, `-1.0` otherwise
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Heading::Right | Heading::Down => 1.0,
            Heading::Left | Heading::Up => -1.0,
        }
    }

    /// The positive heading along `axis`
    #[inline]
    pub fn positive(axis: Axis) -> Heading {
        match axis {
            Axis::Horizontal => Heading::Right,
            Axis::Vertical => Heading::Down,
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::Right => "right",
            Heading::Down => "down",
            Heading::Left => "left",
            Heading::Up => "up",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Point
// ============================================================================

/// A location in canvas coordinates
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Create a point with validation (rejects NaN/infinite)
    pub fn try_new(x: f64, y: f64) -> Result<Self, NumericError> {
        Ok(Point { x: check_finite(x)?, y: check_finite(y)? })
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Calculate the midpoint between two points
    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }

    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        dvec2(self.x, self.y)
    }

    /// Manhattan (L1) distance
    #[inline]
    pub fn manhattan(self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.to_dvec2() - other.to_dvec2()).length()
    }

    /// Move `distance` units along `heading`
    #[inline]
    pub fn translate(self, heading: Heading, distance: f64) -> Point {
        self + heading.unit() * distance
    }

    /// The coordinate that varies along `axis` (x for horizontal)
    #[inline]
    pub fn along(self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Copy of this point with the coordinate along `axis` replaced
    #[inline]
    pub fn with_along(self, axis: Axis, value: f64) -> Point {
        match axis {
            Axis::Horizontal => Point { x: value, ..self },
            Axis::Vertical => Point { y: value, ..self },
        }
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point { x: v.x, y: v.y }
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        p.to_dvec2()
    }
}

/// Add an offset vector to a point to get a new point
impl Add<DVec2> for Point {
    type Output = Point;
    fn add(self, rhs: DVec2) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

/// Subtract two points to get an offset vector
impl Sub<Point> for Point {
    type Output = DVec2;
    fn sub(self, rhs: Point) -> DVec2 {
        dvec2(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// Axis-aligned bounding box. `min_x <= max_x` and `min_y <= max_y` always hold.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    /// Create a rect from two opposite corners in any order
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        // comparisons keep a NaN corner so validation can reject it
        let (min_x, max_x) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (min_y, max_y) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Rect { min_x, min_y, max_x, max_y }
    }

    /// Create a rect with validation (rejects NaN/infinite corners)
    pub fn try_new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, NumericError> {
        Ok(Rect::new(check_finite(x1)?, check_finite(y1)?, check_finite(x2)?, check_finite(y2)?))
    }

    /// Bounding rect of a point set, `None` when empty
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in iter {
            rect.min_x = rect.min_x.min(p.x);
            rect.min_y = rect.min_y.min(p.y);
            rect.max_x = rect.max_x.max(p.x);
            rect.max_y = rect.max_y.max(p.y);
        }
        Some(rect)
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite() && self.min_y.is_finite() && self.max_x.is_finite() && self.max_y.is_finite()
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    #[inline]
    pub fn min(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    #[inline]
    pub fn max(&self) -> Point {
        Point::new(self.max_x, self.max_y)
    }

    /// Grow (or shrink, for negative `amount`) on all four sides.
    /// Shrinking never inverts the rect; it collapses onto the center instead.
    pub fn inflate(&self, amount: f64) -> Rect {
        let c = self.center();
        Rect {
            min_x: (self.min_x - amount).min(c.x),
            min_y: (self.min_y - amount).min(c.y),
            max_x: (self.max_x + amount).max(c.x),
            max_y: (self.max_y + amount).max(c.y),
        }
    }

    /// Smallest rect containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Closed containment (points on the boundary are inside)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Open containment: strictly inside by more than `eps` on every side
    pub fn contains_strict(&self, p: Point, eps: f64) -> bool {
        p.x > self.min_x + eps && p.x < self.max_x - eps && p.y > self.min_y + eps && p.y < self.max_y - eps
    }

    /// Whether the open interiors of the two rects overlap
    pub fn intersects(&self, other: &Rect, eps: f64) -> bool {
        self.min_x < other.max_x - eps
            && other.min_x < self.max_x - eps
            && self.min_y < other.max_y - eps
            && other.min_y < self.max_y - eps
    }

    /// Whether the segment `a`-`b` passes through the open interior.
    ///
    /// Axis-aligned segments running along an edge do not count as crossing.
    pub fn segment_crosses(&self, a: Point, b: Point, eps: f64) -> bool {
        let (lo_x, hi_x) = (a.x.min(b.x), a.x.max(b.x));
        let (lo_y, hi_y) = (a.y.min(b.y), a.y.max(b.y));
        let spans_x = lo_x < self.max_x - eps && hi_x > self.min_x + eps;
        let spans_y = lo_y < self.max_y - eps && hi_y > self.min_y + eps;
        if (a.y - b.y).abs() <= eps {
            // horizontal: the row must be strictly inside
            a.y > self.min_y + eps && a.y < self.max_y - eps && spans_x
        } else if (a.x - b.x).abs() <= eps {
            a.x > self.min_x + eps && a.x < self.max_x - eps && spans_y
        } else {
            // diagonal: conservative bounding-box test
            spans_x && spans_y
        }
    }

    /// The coordinate of the edge facing `heading` (e.g. `max_x` for right)
    #[inline]
    pub fn edge(&self, heading: Heading) -> f64 {
        match heading {
            Heading::Right => self.max_x,
            Heading::Down => self.max_y,
            Heading::Left => self.min_x,
            Heading::Up => self.min_y,
        }
    }

    /// Copy with the edge facing `heading` moved to `value`
    pub fn with_edge(&self, heading: Heading, value: f64) -> Rect {
        let mut r = *self;
        match heading {
            Heading::Right => r.max_x = value,
            Heading::Down => r.max_y = value,
            Heading::Left => r.min_x = value,
            Heading::Up => r.min_y = value,
        }
        r
    }

    /// Corners in clockwise order starting at the top-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {} .. {}, {}]", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Point tests ====================

    #[test]
    fn point_try_new_rejects_nan() {
        assert_eq!(Point::try_new(f64::NAN, 0.0), Err(NumericError::NaN));
    }

    #[test]
    fn rect_new_keeps_nan_corners() {
        let r = Rect::new(f64::NAN, 0.0, 100.0, 100.0);
        assert!(!r.is_finite());
        assert!(!Rect::new(0.0, 100.0, 100.0, f64::NAN).is_finite());
        assert_eq!(Rect::new(100.0, 80.0, 0.0, 0.0), Rect::new(0.0, 0.0, 100.0, 80.0));
    }

    #[test]
    fn point_try_new_rejects_infinity() {
        assert_eq!(Point::try_new(0.0, f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(Point::try_new(f64::NEG_INFINITY, 0.0), Err(NumericError::Infinite));
    }

    #[test]
    fn point_minus_point_gives_offset() {
        let offset = Point::new(5.0, 7.0) - Point::new(2.0, 3.0);
        assert_eq!(offset, dvec2(3.0, 4.0));
    }

    #[test]
    fn point_translate_follows_y_down_headings() {
        let p = Point::new(10.0, 10.0);
        assert_eq!(p.translate(Heading::Down, 5.0), Point::new(10.0, 15.0));
        assert_eq!(p.translate(Heading::Up, 5.0), Point::new(10.0, 5.0));
        assert_eq!(p.translate(Heading::Left, 5.0), Point::new(5.0, 10.0));
    }

    #[test]
    fn point_along_and_with_along() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(p.along(Axis::Horizontal), 1.0);
        assert_eq!(p.along(Axis::Vertical), 2.0);
        assert_eq!(p.with_along(Axis::Vertical, 9.0), Point::new(1.0, 9.0));
    }

    // ==================== Heading tests ====================

    #[test]
    fn heading_reverse_is_involution() {
        for h in Heading::ALL {
            assert_eq!(h.reverse().reverse(), h);
            assert_eq!(h.reverse().axis(), h.axis());
            assert_ne!(h.reverse(), h);
        }
    }

    #[test]
    fn heading_unit_matches_sign() {
        for h in Heading::ALL {
            let u = h.unit();
            assert_eq!(u.x + u.y, h.sign());
        }
    }

    // ==================== Rect tests ====================

    #[test]
    fn rect_new_normalizes_corners() {
        let r = Rect::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(r, Rect { min_x: 0.0, min_y: 5.0, max_x: 10.0, max_y: 20.0 });
    }

    #[test]
    fn rect_try_new_rejects_nan() {
        assert_eq!(Rect::try_new(0.0, f64::NAN, 1.0, 1.0), Err(NumericError::NaN));
    }

    #[test]
    fn rect_inflate_never_inverts() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).inflate(-3.0);
        assert!(r.min_x <= r.max_x && r.min_y <= r.max_y);
        assert_eq!(r.min_y, 2.0);
        assert_eq!(r.max_y, 2.0);
    }

    #[test]
    fn rect_segment_along_edge_does_not_cross() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!r.segment_crosses(Point::new(-5.0, 0.0), Point::new(15.0, 0.0), 1e-9));
        assert!(!r.segment_crosses(Point::new(10.0, -5.0), Point::new(10.0, 15.0), 1e-9));
        assert!(r.segment_crosses(Point::new(-5.0, 5.0), Point::new(15.0, 5.0), 1e-9));
        assert!(r.segment_crosses(Point::new(5.0, -5.0), Point::new(5.0, 1.0), 1e-9));
    }

    #[test]
    fn rect_intersects_is_open() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        let c = Rect::new(9.0, 9.0, 20.0, 20.0);
        assert!(!a.intersects(&b, 1e-9));
        assert!(a.intersects(&c, 1e-9));
    }

    #[test]
    fn rect_edges_by_heading() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.edge(Heading::Left), 1.0);
        assert_eq!(r.edge(Heading::Up), 2.0);
        assert_eq!(r.edge(Heading::Right), 3.0);
        assert_eq!(r.edge(Heading::Down), 4.0);
        assert_eq!(r.with_edge(Heading::Right, 8.0).max_x, 8.0);
    }

    #[test]
    fn rect_from_points() {
        let r = Rect::from_points([Point::new(3.0, -1.0), Point::new(-2.0, 4.0)]).unwrap();
        assert_eq!(r, Rect::new(-2.0, -1.0, 3.0, 4.0));
        assert!(Rect::from_points(std::iter::empty()).is_none());
    }
}

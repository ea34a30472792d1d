//! World and local forms of a routed path.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Rect};

/// A path in canvas coordinates together with the same path relative to
/// the min corner of its bounding rect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedPoints {
    origin: Point,
    local: Vec<Point>,
    world: Vec<Point>,
}

impl RoutedPoints {
    pub fn from_world(world: Vec<Point>) -> Self {
        let origin = Rect::from_points(world.iter().copied()).map_or(Point::ORIGIN, |r| r.min());
        let local = world.iter().map(|p| Point::new(p.x - origin.x, p.y - origin.y)).collect();
        Self { origin, local, world }
    }

    pub fn from_local(origin: Point, local: Vec<Point>) -> Self {
        let world = local.iter().map(|p| Point::new(p.x + origin.x, p.y + origin.y)).collect();
        Self { origin, local, world }
    }

    /// Min corner of the world bounding rect
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn local(&self) -> &[Point] {
        &self.local
    }

    pub fn world(&self) -> &[Point] {
        &self.world
    }

    pub fn into_world(self) -> Vec<Point> {
        self.world
    }

    /// World-space bounding rect
    pub fn bounds(&self) -> Option<Rect> {
        Rect::from_points(self.world.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }
}

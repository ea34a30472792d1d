//! Route pipeline: obstacle layout, grid search, cleanup, validation.
//!
//! [`route`] is the single entry point. It never fails for lack of a
//! clear path; the fixed-shape fallback covers that case. Errors are
//! reserved for input that cannot describe a path at all.

mod astar;
mod fallback;
mod grid;
mod postprocess;

use fallback::fallback_path;
pub(crate) use postprocess::harmonize_shafts;

use crate::endpoint::{Anchor, EndpointSpec};
use crate::errors::RouteError;
use crate::geometry::{heading_for_segment, is_orthogonal_path, orthogonalize, points_close, simplify_path};
use crate::log::{debug, warn};
use crate::obstacles::{ObstacleLayout, build_layout};
use crate::options::RoutingOptions;
use crate::points::RoutedPoints;
use crate::types::{Heading, Point, Rect};
use astar::{Search, SearchRequest};
use grid::{Grid, GridSpec};

/// Outcome of one route request, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    points: Vec<Point>,
    start: Point,
    end: Point,
    start_heading: Heading,
    end_heading: Heading,
    used_fallback: bool,
}

impl RouteResult {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Resolved start: the exit point on a bound shape, or the free point
    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Direction the path leaves the start
    pub fn start_heading(&self) -> Heading {
        self.start_heading
    }

    /// Direction the path leaves the end, looking back along the path
    pub fn end_heading(&self) -> Heading {
        self.end_heading
    }

    /// Whether the fixed-shape path was used instead of a searched one
    pub fn used_fallback(&self) -> bool {
        self.used_fallback
    }

    pub fn routed_points(&self) -> RoutedPoints {
        RoutedPoints::from_world(self.points.clone())
    }
}

/// Route an orthogonal path from `start` to `end` around `obstacles`.
pub fn route(
    start: &EndpointSpec,
    end: &EndpointSpec,
    obstacles: &[Rect],
    options: &RoutingOptions,
) -> Result<RouteResult, RouteError> {
    options.validate()?;
    start.validate("start")?;
    end.validate("end")?;
    if obstacles.iter().any(|r| !r.is_finite()) {
        return Err(RouteError::NonFinite { what: "obstacle" });
    }

    let eps = options.epsilon;
    let layout = build_layout(start, end, options);
    let (a, b) = (layout.start.point, layout.end.point);
    if points_close(a, b, eps) {
        return Err(RouteError::CoincidentEndpoints { x: a.x, y: a.y });
    }

    let candidates = candidate_zones(obstacles, &layout, options);

    let (points, used_fallback) = if layout.zones().next().is_none() && candidates.is_empty() {
        debug!("no zones or obstacles, direct path");
        (fallback_path(&layout.start, &layout.end, eps), false)
    } else {
        match search_path(&layout, &candidates, options) {
            Some(raw) => (postprocess::finish_path(&raw, &layout, &candidates, options), false),
            None => {
                debug!("search failed, using fallback");
                (fallback_path(&layout.start, &layout.end, eps), true)
            }
        }
    };

    let (points, used_fallback) = if is_orthogonal_path(&points, eps) {
        (points, used_fallback)
    } else {
        warn!(?points, "routed path failed validation");
        (validated_fallback(&layout, eps), true)
    };

    Ok(finish_result(points, &layout, used_fallback))
}

/// The fallback shape, or a bare L between the exit points if even that degenerates
fn validated_fallback(layout: &ObstacleLayout, eps: f64) -> Vec<Point> {
    let points = fallback_path(&layout.start, &layout.end, eps);
    if is_orthogonal_path(&points, eps) {
        return points;
    }
    simplify_path(&orthogonalize(&[layout.start.point, layout.end.point], eps), &[], eps)
}

fn finish_result(points: Vec<Point>, layout: &ObstacleLayout, used_fallback: bool) -> RouteResult {
    let n = points.len();
    let start_heading = layout.start.heading.unwrap_or_else(|| heading_for_segment(points[0], points[1]));
    let end_heading = layout.end.heading.unwrap_or_else(|| heading_for_segment(points[n - 1], points[n - 2]));
    RouteResult {
        start: points[0],
        end: points[n - 1],
        points,
        start_heading,
        end_heading,
        used_fallback,
    }
}

/// Inflate the caller's obstacle candidates, dropping those that would
/// trap an endpoint or that are the bound shapes themselves.
fn candidate_zones(obstacles: &[Rect], layout: &ObstacleLayout, options: &RoutingOptions) -> Vec<Rect> {
    let eps = options.epsilon;
    let ends = [layout.start, layout.end];
    let same_rect = |a: &Rect, b: &Rect| {
        (a.min_x - b.min_x).abs() <= eps
            && (a.min_y - b.min_y).abs() <= eps
            && (a.max_x - b.max_x).abs() <= eps
            && (a.max_y - b.max_y).abs() <= eps
    };
    obstacles
        .iter()
        .filter(|r| !ends.iter().any(|e| e.element.is_some_and(|el| same_rect(r, &el))))
        .map(|r| r.inflate(options.obstacle_padding))
        .filter(|zone| {
            let traps = ends.iter().any(|e| zone.contains_strict(e.point, eps) || zone.contains_strict(e.dongle, eps));
            if traps {
                debug!(%zone, "obstacle contains an endpoint, ignored");
            }
            !traps
        })
        .collect()
}

/// A* between the two dongles; `None` when the grid is over budget or the
/// search is exhausted.
fn search_path(layout: &ObstacleLayout, candidates: &[Rect], options: &RoutingOptions) -> Option<Vec<Point>> {
    let mut zones: Vec<Rect> = layout.zones().collect();
    zones.extend_from_slice(candidates);

    let grid = Grid::build(GridSpec {
        start: layout.start.dongle,
        goal: layout.end.dongle,
        zones: &zones,
        margin: options.grid_margin,
        eps: options.epsilon,
    });
    if grid.len() > options.max_grid_nodes {
        warn!(nodes = grid.len(), limit = options.max_grid_nodes, "grid over budget");
        return None;
    }
    debug!(nodes = grid.len(), zones = zones.len(), "searching");

    let request = SearchRequest {
        start: layout.start.dongle,
        start_heading: layout.start.heading,
        goal: layout.end.dongle,
        goal_heading: layout.end.heading.map(Heading::reverse),
        bend_penalty: options.bend_penalty,
    };
    let mut search = Search::new(&grid, request);
    let _state = search.run();
    debug!(state = ?_state, cost = ?search.cost(), "search finished");
    search.path()
}

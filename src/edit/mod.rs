//! Edit pipeline: apply a user gesture to an existing path.
//!
//! The steps always run in the same order:
//! sanitize → reindex → apply intent → reroute gaps → splice → clean up →
//! enforce perpendicular bindings → harmonize → validate.
//! Pinned segments are carried through by coordinates; only the free
//! stretches between them are routed again.

mod binding;
mod fixed_segment;
mod gaps;
mod pins;

pub use binding::{bindings_respected, enforce_perpendicular, harmonize_bindings};
pub use fixed_segment::{FixedSegment, fixed_segments_from_json, fixed_segments_to_json};
pub use gaps::{Draft, reroute_gaps, splice};
pub use pins::{drag_segment, reindex, relocate, release, sanitize};

use serde::{Deserialize, Serialize};

use crate::errors::{EditError, RouteError};
use crate::geometry::{is_orthogonal_path, remove_short_segments, simplify_path};
use crate::log::{debug, warn};
use crate::options::RoutingOptions;
use crate::points::RoutedPoints;
use crate::route::route;
use crate::types::{Point, Rect};

/// One end of the arrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowEnd {
    Start,
    End,
}

/// A user gesture on an existing path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditIntent {
    /// Move one end of the arrow to `to`
    DragEndpoint { which: ArrowEnd, to: Point },
    /// Slide segment `index` across its axis so it passes through `to`, and pin it
    DragSegment { index: usize, to: Point },
    /// Unpin segment `index` and let the router take that stretch back
    ReleaseSegment { index: usize },
}

/// Everything about the arrow's surroundings an edit needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditContext {
    /// Shape the start is bound to
    pub start: Option<Rect>,
    /// Shape the end is bound to
    pub end: Option<Rect>,
    pub start_arrowhead: bool,
    pub end_arrowhead: bool,
    /// Other elements the path should avoid
    pub obstacles: Vec<Rect>,
    pub options: RoutingOptions,
}

impl EditContext {
    pub fn with_start(mut self, bounds: Rect) -> Self {
        self.start = Some(bounds);
        self
    }

    pub fn with_end(mut self, bounds: Rect) -> Self {
        self.end = Some(bounds);
        self
    }

    pub fn with_arrowheads(mut self, start: bool, end: bool) -> Self {
        self.start_arrowhead = start;
        self.end_arrowhead = end;
        self
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Rect>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_options(mut self, options: RoutingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn binding(&self, which: ArrowEnd) -> Option<Rect> {
        match which {
            ArrowEnd::Start => self.start,
            ArrowEnd::End => self.end,
        }
    }

    pub fn arrowhead(&self, which: ArrowEnd) -> bool {
        match which {
            ArrowEnd::Start => self.start_arrowhead,
            ArrowEnd::End => self.end_arrowhead,
        }
    }

    /// Obstacles plus both bound shapes
    pub fn avoided(&self) -> Vec<Rect> {
        let mut all = self.obstacles.clone();
        all.extend(self.start);
        all.extend(self.end);
        all
    }

    fn validate(&self) -> Result<(), EditError> {
        self.options.validate().map_err(RouteError::from)?;
        if [self.start, self.end].into_iter().flatten().any(|r| !r.is_finite()) {
            return Err(EditError::NonFinite { what: "binding" });
        }
        if self.obstacles.iter().any(|r| !r.is_finite()) {
            return Err(EditError::NonFinite { what: "obstacle" });
        }
        Ok(())
    }
}

/// Outcome of one edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditResult {
    points: RoutedPoints,
    fixed_segments: Vec<FixedSegment>,
}

impl EditResult {
    fn new(world: Vec<Point>, fixed_segments: Vec<FixedSegment>) -> Self {
        Self { points: RoutedPoints::from_world(world), fixed_segments }
    }

    pub fn points(&self) -> &RoutedPoints {
        &self.points
    }

    /// The new path in canvas coordinates
    pub fn world(&self) -> &[Point] {
        self.points.world()
    }

    /// Pins that survived the edit, indexed against the new path
    pub fn fixed_segments(&self) -> &[FixedSegment] {
        &self.fixed_segments
    }

    pub fn into_parts(self) -> (RoutedPoints, Vec<FixedSegment>) {
        (self.points, self.fixed_segments)
    }
}

/// Apply `intent` to the path `prior` (world coordinates) with pins `fixed`.
pub fn edit(
    prior: &[Point],
    fixed: &[FixedSegment],
    intent: &EditIntent,
    ctx: &EditContext,
) -> Result<EditResult, EditError> {
    if prior.len() < 2 {
        return Err(EditError::TooFewPoints { len: prior.len() });
    }
    if prior.iter().any(|p| !p.is_finite()) {
        return Err(EditError::NonFinite { what: "points" });
    }
    if intent_target(intent).is_some_and(|p| !p.is_finite()) {
        return Err(EditError::NonFinite { what: "intent" });
    }
    ctx.validate()?;

    let eps = ctx.options.epsilon;
    let pins = sanitize(fixed, prior, eps);
    let pins = reindex(&pins, prior, eps);
    let mut draft = Draft::new(prior.to_vec(), pins);
    apply_intent(&mut draft, intent, eps);

    let sections = reroute_gaps(&draft, ctx)?;
    let spliced = splice(&sections, eps);
    debug!(gaps = sections.len(), points = spliced.len(), "spliced gaps");

    let pinned: Vec<Point> = draft.pins.iter().flat_map(|p| [p.start(), p.end()]).collect();
    let points = simplify_path(&spliced, &pinned, eps);
    let points = remove_short_segments(&points, ctx.options.dedup_threshold, &pinned, eps);
    let points = enforce_perpendicular(points, &pinned, ctx);
    let locked: Vec<usize> = relocate(&draft.pins, &points, eps).iter().map(FixedSegment::index).collect();
    let points = harmonize_bindings(points, &locked, ctx);
    let points = simplify_path(&points, &pinned, eps);

    if is_orthogonal_path(&points, eps) && bindings_respected(&points, ctx) {
        let fixed_segments = relocate(&draft.pins, &points, eps);
        if fixed_segments.len() < draft.pins.len() {
            debug!(lost = draft.pins.len() - fixed_segments.len(), "fixed segments lost in cleanup");
        }
        return Ok(EditResult::new(points, fixed_segments));
    }

    warn!(?points, "edited path failed validation, routing afresh");
    let start = gaps::end_spec(ArrowEnd::Start, draft.start, draft.dragged == Some(ArrowEnd::Start), ctx);
    let end = gaps::end_spec(ArrowEnd::End, draft.end, draft.dragged == Some(ArrowEnd::End), ctx);
    let fresh = route(&start, &end, &ctx.avoided(), &ctx.options)?;
    Ok(EditResult::new(fresh.into_points(), Vec::new()))
}

fn intent_target(intent: &EditIntent) -> Option<Point> {
    match *intent {
        EditIntent::DragEndpoint { to, .. } | EditIntent::DragSegment { to, .. } => Some(to),
        EditIntent::ReleaseSegment { .. } => None,
    }
}

fn apply_intent(draft: &mut Draft, intent: &EditIntent, eps: f64) {
    match *intent {
        EditIntent::DragEndpoint { which: ArrowEnd::Start, to } => {
            draft.start = to;
            draft.dragged = Some(ArrowEnd::Start);
            draft.dirty[0] = true;
        }
        EditIntent::DragEndpoint { which: ArrowEnd::End, to } => {
            let last = draft.gap_count() - 1;
            draft.end = to;
            draft.dragged = Some(ArrowEnd::End);
            draft.dirty[last] = true;
        }
        EditIntent::DragSegment { index, to } => {
            if drag_segment(&mut draft.points, &mut draft.pins, index, to, eps) {
                draft.reset_gaps();
            }
        }
        EditIntent::ReleaseSegment { index } => match release(&mut draft.pins, index) {
            Some(at) => {
                draft.dirty.remove(at + 1);
                draft.dirty[at] = true;
            }
            None => {
                debug!(index, "no fixed segment to release");
            }
        },
    }
}

//! A* over the sparse grid.
//!
//! A search state is a node plus the heading the path arrived with, so a
//! turn costs `bend_penalty` and reversing along a segment is never
//! generated. The heuristic is Manhattan distance, which never
//! overestimates because every step costs at least its length.

use std::cell::Cell;
use std::rc::Rc;

use super::grid::Grid;
use crate::heap::PriorityQueue;
use crate::log::trace;
use crate::types::{Heading, Point};

/// Arrival headings per node, plus one slot for "not yet moving"
const SLOTS: usize = 5;
const NO_HEADING: usize = 4;

fn slot(h: Option<Heading>) -> usize {
    match h {
        Some(Heading::Right) => 0,
        Some(Heading::Down) => 1,
        Some(Heading::Left) => 2,
        Some(Heading::Up) => 3,
        None => NO_HEADING,
    }
}

fn heading_of(slot: usize) -> Option<Heading> {
    Heading::ALL.get(slot).copied()
}

/// What the search is asked to connect
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest {
    pub start: Point,
    /// Heading the path is already moving in when it leaves `start`
    pub start_heading: Option<Heading>,
    pub goal: Point,
    /// Heading the path should be moving in when it reaches `goal`
    pub goal_heading: Option<Heading>,
    pub bend_penalty: f64,
}

/// Lifecycle of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    NotStarted,
    Searching,
    Found,
    Exhausted,
}

pub struct Search<'g> {
    grid: &'g Grid,
    request: SearchRequest,
    state: SearchState,
    start: Option<usize>,
    goal: Option<usize>,
    g: Vec<f64>,
    f: Rc<Vec<Cell<f64>>>,
    came_from: Vec<Option<usize>>,
    closed: Vec<bool>,
    open: PriorityQueue<usize, Box<dyn Fn(&usize) -> f64>>,
    reached: Option<usize>,
}

impl<'g> Search<'g> {
    pub fn new(grid: &'g Grid, request: SearchRequest) -> Self {
        let n = grid.len() * SLOTS;
        let f: Rc<Vec<Cell<f64>>> = Rc::new((0..n).map(|_| Cell::new(f64::INFINITY)).collect());
        let scores = Rc::clone(&f);
        let score: Box<dyn Fn(&usize) -> f64> = Box::new(move |s: &usize| scores[*s].get());
        Self {
            grid,
            request,
            state: SearchState::NotStarted,
            start: grid.index_of(request.start),
            goal: grid.index_of(request.goal),
            g: vec![f64::INFINITY; n],
            f,
            came_from: vec![None; n],
            closed: vec![false; n],
            open: PriorityQueue::new(score),
            reached: None,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Advance by one expansion and report the new state.
    pub fn step(&mut self) -> SearchState {
        match self.state {
            SearchState::NotStarted => self.seed(),
            SearchState::Searching => self.expand(),
            SearchState::Found | SearchState::Exhausted => {}
        }
        self.state
    }

    /// Step until the search is found or exhausted.
    pub fn run(&mut self) -> SearchState {
        while matches!(self.step(), SearchState::NotStarted | SearchState::Searching) {}
        self.state
    }

    fn seed(&mut self) {
        let (Some(start), Some(_)) = (self.start, self.goal) else {
            self.state = SearchState::Exhausted;
            return;
        };
        if self.grid.is_blocked(start) {
            self.state = SearchState::Exhausted;
            return;
        }
        let s = start * SLOTS + slot(self.request.start_heading);
        self.g[s] = 0.0;
        self.f[s].set(self.heuristic(start));
        self.open.push(s);
        self.state = SearchState::Searching;
    }

    fn expand(&mut self) {
        let Some(current) = self.open.pop() else {
            self.state = SearchState::Exhausted;
            return;
        };
        let (node, arrived) = (current / SLOTS, heading_of(current % SLOTS));
        if Some(node) == self.goal {
            self.reached = Some(current);
            self.state = SearchState::Found;
            return;
        }
        self.closed[current] = true;

        let here = self.grid.point(node);
        for (next, h) in self.grid.neighbors(node) {
            if arrived == Some(h.reverse()) {
                continue;
            }
            let is_goal = Some(next) == self.goal;
            if is_goal && self.request.goal_heading == Some(h.reverse()) {
                continue;
            }
            let mut cost = here.manhattan(self.grid.point(next));
            if arrived.is_some_and(|a| a != h) {
                cost += self.request.bend_penalty;
            }
            if is_goal && self.request.goal_heading.is_some_and(|want| want != h) {
                cost += self.request.bend_penalty;
            }

            let s = next * SLOTS + slot(Some(h));
            if self.closed[s] {
                continue;
            }
            let tentative = self.g[current] + cost;
            if tentative >= self.g[s] {
                continue;
            }
            self.g[s] = tentative;
            self.came_from[s] = Some(current);
            self.f[s].set(tentative + self.heuristic(next));
            if self.open.contains(&s) {
                self.open.rescore(&s);
            } else {
                self.open.push(s);
            }
        }
        trace!(node, open = self.open.len(), "expanded");
    }

    fn heuristic(&self, node: usize) -> f64 {
        match self.goal {
            Some(goal) => self.grid.point(node).manhattan(self.grid.point(goal)),
            None => 0.0,
        }
    }

    /// Total cost of the path found, bends included
    pub fn cost(&self) -> Option<f64> {
        self.reached.map(|s| self.g[s])
    }

    /// Node path from start to goal once found
    pub fn path(&self) -> Option<Vec<Point>> {
        let mut s = self.reached?;
        let mut out = vec![self.grid.point(s / SLOTS)];
        while let Some(prev) = self.came_from[s] {
            out.push(self.grid.point(prev / SLOTS));
            s = prev;
        }
        out.reverse();
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{corner_points, is_orthogonal_path};
    use crate::route::grid::GridSpec;
    use crate::types::Rect;

    const EPS: f64 = 1e-9;

    fn grid(start: Point, goal: Point, zones: &[Rect]) -> Grid {
        Grid::build(GridSpec { start, goal, zones, margin: 20.0, eps: EPS })
    }

    fn find(g: &Grid, req: SearchRequest) -> Option<Vec<Point>> {
        let mut search = Search::new(g, req);
        search.run();
        search.path()
    }

    fn request(start: Point, goal: Point) -> SearchRequest {
        SearchRequest { start, start_heading: None, goal, goal_heading: None, bend_penalty: 100.0 }
    }

    #[test]
    fn state_machine_progresses() {
        let (a, b) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let g = grid(a, b, &[]);
        let mut search = Search::new(&g, request(a, b));
        assert_eq!(search.state(), SearchState::NotStarted);
        assert_eq!(search.step(), SearchState::Searching);
        while search.step() == SearchState::Searching {}
        assert_eq!(search.state(), SearchState::Found);
        assert_eq!(search.cost(), Some(100.0));
    }

    #[test]
    fn straight_line_when_unobstructed() {
        let (a, b) = (Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let g = grid(a, b, &[]);
        let path = find(&g, request(a, b)).unwrap();
        assert_eq!(corner_points(&path, EPS), vec![a, b]);
    }

    #[test]
    fn detours_along_a_zone_edge() {
        let (a, b) = (Point::new(0.0, 50.0), Point::new(200.0, 50.0));
        let zone = Rect::new(80.0, 0.0, 120.0, 100.0);
        let g = grid(a, b, &[zone]);
        let path = find(&g, request(a, b)).unwrap();
        let corners = corner_points(&path, EPS);
        assert!(is_orthogonal_path(&corners, EPS));
        // the bottom edge is shared with the zone, not crossed
        let along_bottom =
            [Point::new(0.0, 50.0), Point::new(0.0, 100.0), Point::new(200.0, 100.0), Point::new(200.0, 50.0)];
        assert_eq!(corners, along_bottom);
        for w in corners.windows(2) {
            assert!(!zone.segment_crosses(w[0], w[1], EPS));
        }
    }

    #[test]
    fn start_heading_forbids_reversal() {
        // start moving right but the goal is to the left
        let (a, b) = (Point::new(100.0, 0.0), Point::new(0.0, 0.0));
        let g = grid(a, b, &[]);
        let mut req = request(a, b);
        req.start_heading = Some(Heading::Right);
        let path = find(&g, req).unwrap();
        assert_ne!(crate::geometry::heading_for_segment(path[0], path[1]), Heading::Left);
    }

    #[test]
    fn goal_heading_shapes_the_approach() {
        let (a, b) = (Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let g = grid(a, b, &[]);
        let mut req = request(a, b);
        req.goal_heading = Some(Heading::Down);
        let path = corner_points(&find(&g, req).unwrap(), EPS);
        let n = path.len();
        assert_eq!(crate::geometry::heading_for_segment(path[n - 2], path[n - 1]), Heading::Down);
    }

    #[test]
    fn blocked_goal_is_exhausted() {
        let (a, b) = (Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let g = grid(a, b, &[Rect::new(90.0, 90.0, 110.0, 110.0)]);
        let mut search = Search::new(&g, request(a, b));
        assert_eq!(search.run(), SearchState::Exhausted);
        assert!(search.path().is_none());
    }
}

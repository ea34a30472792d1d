//! Sparse orthogonal grid built fresh for every route request.
//!
//! Grid lines are drawn through every keep-out zone edge, both search
//! terminals, the midlines between them, and a margin ring around
//! everything. Nodes are the line crossings that are not strictly inside a
//! zone; two neighbouring nodes on a line are adjacent when the segment
//! between them stays out of every zone's interior.

use crate::types::{Heading, Point, Rect};

/// Grid lines and the blocked flag of every crossing
#[derive(Debug)]
pub struct Grid {
    xs: Vec<f64>,
    ys: Vec<f64>,
    blocked: Vec<bool>,
    zones: Vec<Rect>,
    eps: f64,
}

/// Inputs that decide where grid lines go
#[derive(Debug, Clone, Copy)]
pub struct GridSpec<'a> {
    pub start: Point,
    pub goal: Point,
    pub zones: &'a [Rect],
    pub margin: f64,
    pub eps: f64,
}

impl Grid {
    pub fn build(spec: GridSpec<'_>) -> Grid {
        let GridSpec { start, goal, zones, margin, eps } = spec;
        let mut xs = vec![start.x, goal.x, (start.x + goal.x) / 2.0];
        let mut ys = vec![start.y, goal.y, (start.y + goal.y) / 2.0];

        let mut outer = Rect::new(start.x, start.y, goal.x, goal.y);
        for z in zones {
            xs.extend([z.min_x, z.max_x]);
            ys.extend([z.min_y, z.max_y]);
            outer = outer.union(z);
        }
        let outer = outer.inflate(margin);
        xs.extend([outer.min_x, outer.max_x]);
        ys.extend([outer.min_y, outer.max_y]);

        let xs = sorted_unique(xs, eps);
        let ys = sorted_unique(ys, eps);

        let mut blocked = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                let p = Point::new(x, y);
                blocked.push(zones.iter().any(|z| z.contains_strict(p, eps)));
            }
        }

        Grid { xs, ys, blocked, zones: zones.to_vec(), eps }
    }

    /// Number of nodes (blocked ones included)
    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn point(&self, idx: usize) -> Point {
        let nx = self.xs.len();
        Point::new(self.xs[idx % nx], self.ys[idx / nx])
    }

    pub fn is_blocked(&self, idx: usize) -> bool {
        self.blocked[idx]
    }

    /// Node index for a point lying on a grid crossing
    pub fn index_of(&self, p: Point) -> Option<usize> {
        let xi = find_line(&self.xs, p.x, self.eps)?;
        let yi = find_line(&self.ys, p.y, self.eps)?;
        Some(yi * self.xs.len() + xi)
    }

    /// Open neighbours of `idx`, with the heading of travel toward each.
    pub fn neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, Heading)> + '_ {
        let nx = self.xs.len();
        let ny = self.ys.len();
        let (xi, yi) = (idx % nx, idx / nx);
        Heading::ALL.into_iter().filter_map(move |h| {
            let next = match h {
                Heading::Right if xi + 1 < nx => idx + 1,
                Heading::Left if xi > 0 => idx - 1,
                Heading::Down if yi + 1 < ny => idx + nx,
                Heading::Up if yi > 0 => idx - nx,
                _ => return None,
            };
            if self.blocked[next] || self.edge_blocked(idx, next) {
                return None;
            }
            Some((next, h))
        })
    }

    /// Zone edges are grid lines, so a grid edge crosses a zone exactly when
    /// its midpoint is inside one.
    fn edge_blocked(&self, a: usize, b: usize) -> bool {
        let mid = self.point(a).midpoint(self.point(b));
        self.zones.iter().any(|z| z.contains_strict(mid, self.eps))
    }
}

fn sorted_unique(mut values: Vec<f64>, eps: f64) -> Vec<f64> {
    values.retain(|v| v.is_finite());
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| (*a - *b).abs() <= eps);
    values
}

fn find_line(lines: &[f64], value: f64, eps: f64) -> Option<usize> {
    let i = lines.partition_point(|&l| l < value - eps);
    (i < lines.len() && (lines[i] - value).abs() <= eps).then_some(i)
}

// Copyright 2023 John Nunley
//
// This file is part of trapmap.
//
// trapmap is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// trapmap is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with trapmap. If not, see <https://www.gnu.org/licenses/>.

use crate::point::{Point, Vector};
use crate::ApproxEq;

use core::fmt;

use num_traits::real::Real;

/// Which side of an edge the polygon's interior lies on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// The interior lies to the left of the edge.
    Left,

    /// The interior lies to the right of the edge.
    Right,

    /// The edge is a vertical wall introduced by the decomposition; the
    /// interior may lie on either side.
    Both,

    /// The edge bounds the enclosing box; no interior side applies.
    Undefined,
}

/// An edge between two endpoints, tagged with the side the polygon's
/// interior lies on.
///
/// Equality considers the endpoint pair only: two edges with the same
/// endpoints but different side tags compare equal.
#[derive(Copy, Clone)]
pub struct Edge<Num: Copy> {
    p1: Point<Num>,
    p2: Point<Num>,
    side: Side,
}

impl<Num: Copy + fmt::Debug> fmt::Debug for Edge<Num> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Edge")
            .field("p1", &self.p1)
            .field("p2", &self.p2)
            .field("side", &self.side)
            .finish()
    }
}

impl<Num: Copy + PartialEq> PartialEq for Edge<Num> {
    fn eq(&self, other: &Self) -> bool {
        self.p1 == other.p1 && self.p2 == other.p2
    }
}

impl<Num: Copy> Edge<Num> {
    /// Create a new edge from two endpoints and an interior side.
    #[inline]
    pub fn new(p1: Point<Num>, p2: Point<Num>, side: Side) -> Self {
        Edge { p1, p2, side }
    }

    /// Get the first endpoint, in input order.
    #[inline]
    pub fn p1(&self) -> Point<Num> {
        self.p1
    }

    /// Get the second endpoint, in input order.
    #[inline]
    pub fn p2(&self) -> Point<Num> {
        self.p2
    }

    /// Get the side of this edge the polygon's interior lies on.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }
}

impl<Num: Real> Edge<Num> {
    /// Get the endpoint with the smaller x coordinate.
    #[inline]
    pub fn start(&self) -> Point<Num> {
        if self.p1.x() < self.p2.x() {
            self.p1
        } else {
            self.p2
        }
    }

    /// Get the endpoint with the larger x coordinate.
    #[inline]
    pub fn end(&self) -> Point<Num> {
        if self.p1.x() < self.p2.x() {
            self.p2
        } else {
            self.p1
        }
    }

    /// Get the left-to-right vector spanned by this edge.
    #[inline]
    pub fn as_vector(&self) -> Vector<Num> {
        self.end() - self.start()
    }

    /// Tell whether one of this edge's endpoints is the given vertex.
    #[inline]
    pub fn has_endpoint(&self, vertex: Point<Num>) -> bool {
        self.p1 == vertex || self.p2 == vertex
    }

    /// Tell whether this edge shares an endpoint with another edge.
    pub fn has_common_endpoint(&self, other: &Self) -> bool {
        self.has_endpoint(other.p1) || self.has_endpoint(other.p2)
    }

    /// Tell whether this edge lies above another edge.
    ///
    /// Both edges are compared by their lowest endpoint, which is how the
    /// split's neighbor partition ranks a neighbor against the new edge.
    pub fn lies_above(&self, other: &Self) -> bool {
        self.p1.y().min(self.p2.y()) > other.p1.y().min(other.p2.y())
    }
}

impl<Num: Real + ApproxEq> Edge<Num> {
    /// Tell whether this edge is vertical.
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.p1.x().approx_eq(&self.p2.x())
    }

    /// Get the slope of this edge.
    ///
    /// Returns `None` if the edge is vertical.
    pub fn slope(&self) -> Option<Num> {
        if self.is_vertical() {
            return None;
        }

        let (start, end) = (self.start(), self.end());
        Some((end.y() - start.y()) / (end.x() - start.x()))
    }

    /// Evaluate the line through this edge at the given x coordinate.
    ///
    /// Returns `None` if the edge is vertical or if `x` falls outside the
    /// edge's x range. A result within ε = 10⁻⁴ of an integer is snapped to
    /// that integer, so walls derived from integer input stay on integer
    /// coordinates.
    pub fn y_at(&self, x: Num) -> Option<Num> {
        let (start, end) = (self.start(), self.end());
        if x < start.x() || end.x() < x {
            return None;
        }

        let slope = self.slope()?;
        Some(snap(slope * (x - start.x()) + start.y()))
    }

    /// Tell whether the vertex lies strictly above this edge.
    pub fn point_above(&self, vertex: Point<Num>) -> bool {
        self.as_vector().cross(vertex - self.end()) > Num::zero()
    }

    /// Tell whether the vertex lies strictly below this edge.
    pub fn point_below(&self, vertex: Point<Num>) -> bool {
        self.as_vector().cross(vertex - self.end()) < Num::zero()
    }

    /// Tell whether the vertex lies on this edge.
    ///
    /// An endpoint lies on the edge; any other vertex lies on it when it is
    /// collinear with the edge and its projection parameter falls in [0, 1).
    pub fn point_on(&self, vertex: Point<Num>) -> bool {
        if self.has_endpoint(vertex) {
            return true;
        }

        let span = self.as_vector();
        let offset = vertex - self.start();

        if !span.cross(offset).approx_eq(&Num::zero()) {
            return false;
        }

        let along = offset.dot(span);
        along >= Num::zero() && along < span.length_squared()
    }

    /// Tell whether this edge intersects another edge.
    ///
    /// The test is the parametric one: with `r` and `s` the edge vectors
    /// and `pq` the vector between the start points, the segments meet iff
    /// `r × s ≠ 0` and both `t = (pq × s)/(r × s)` and `u = (pq × r)/(r × s)`
    /// fall in [0, 1]. Parallel segments never intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        let r = self.as_vector();
        let s = other.as_vector();

        let denominator = r.cross(s);
        if denominator.approx_eq(&Num::zero()) {
            return false;
        }

        let pq = other.start() - self.start();
        let t = pq.cross(s) / denominator;
        let u = pq.cross(r) / denominator;

        Num::zero() <= t && t <= Num::one() && Num::zero() <= u && u <= Num::one()
    }
}

/// Round a coordinate to the nearest integer when it is within tolerance.
fn snap<Num: Real>(y: Num) -> Num {
    let tolerance = Num::from(1e-4).expect("snap tolerance fits the coordinate type");
    let nearest = y.round();

    if (y - nearest).abs() < tolerance {
        nearest
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::{Edge, Side};
    use crate::point::Point;

    fn edge(x1: f64, y1: f64, x2: f64, y2: f64) -> Edge<f64> {
        Edge::new(Point::new(x1, y1), Point::new(x2, y2), Side::Right)
    }

    #[test]
    fn test_start_end() {
        let e = edge(5.0, 1.0, 3.0, 5.0);
        assert_eq!(e.start(), Point::new(3.0, 5.0));
        assert_eq!(e.end(), Point::new(5.0, 1.0));
    }

    #[test]
    fn test_equality_ignores_side() {
        let a = edge(0.0, 0.0, 4.0, 2.0);
        let b = Edge::new(Point::new(0.0, 0.0), Point::new(4.0, 2.0), Side::Undefined);
        assert_eq!(a, b);
    }

    #[test]
    fn test_vertical() {
        assert!(edge(3.0, 1.0, 3.0, 5.0).is_vertical());
        assert!(!edge(3.0, 1.0, 4.0, 5.0).is_vertical());
        assert_eq!(edge(3.0, 1.0, 3.0, 5.0).slope(), None);
    }

    #[test]
    fn test_y_at() {
        let e = edge(1.0, 1.0, 5.0, 3.0);
        assert_eq!(e.y_at(1.0), Some(1.0));
        assert_eq!(e.y_at(3.0), Some(2.0));
        assert_eq!(e.y_at(5.0), Some(3.0));
        assert_eq!(e.y_at(0.5), None);
        assert_eq!(e.y_at(5.5), None);
    }

    #[test]
    fn test_y_at_snaps_to_integers() {
        // The true value at x = 2 is 2 + 1/3; at x = 4 it is 3, which must
        // come out exactly even though the slope is not representable.
        let e = edge(1.0, 2.0, 4.0, 3.0);
        assert_eq!(e.y_at(4.0), Some(3.0));
        let inner = e.y_at(2.0).unwrap();
        assert!((inner - (2.0 + 1.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_point_orientation() {
        let e = edge(0.0, 0.0, 4.0, 0.0);
        assert!(e.point_above(Point::new(2.0, 1.0)));
        assert!(e.point_below(Point::new(2.0, -1.0)));
        assert!(!e.point_above(Point::new(2.0, 0.0)));
        assert!(!e.point_below(Point::new(2.0, 0.0)));
    }

    #[test]
    fn test_point_on() {
        let e = edge(0.0, 0.0, 4.0, 2.0);
        assert!(e.point_on(Point::new(0.0, 0.0)));
        assert!(e.point_on(Point::new(2.0, 1.0)));
        assert!(e.point_on(Point::new(4.0, 2.0)));
        assert!(!e.point_on(Point::new(2.0, 1.5)));
        assert!(!e.point_on(Point::new(6.0, 3.0)));
    }

    #[test]
    fn test_intersects() {
        let a = edge(0.0, 0.0, 4.0, 4.0);
        let b = edge(0.0, 4.0, 4.0, 0.0);
        assert!(a.intersects(&b));

        // Sharing an endpoint counts as intersecting.
        let c = edge(4.0, 4.0, 8.0, 0.0);
        assert!(a.intersects(&c));

        let far = edge(5.0, 0.0, 9.0, 1.0);
        assert!(!a.intersects(&far));
    }

    #[test]
    fn test_parallel_edges_do_not_intersect() {
        let a = edge(0.0, 0.0, 4.0, 4.0);
        let b = edge(1.0, 0.0, 5.0, 4.0);
        assert!(!a.intersects(&b));

        // Collinear overlap is also reported as non-intersecting.
        let c = edge(2.0, 2.0, 6.0, 6.0);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_lies_above() {
        let low = edge(0.0, 0.0, 4.0, 1.0);
        let high = edge(1.0, 3.0, 3.0, 5.0);
        assert!(high.lies_above(&low));
        assert!(!low.lies_above(&high));
    }
}

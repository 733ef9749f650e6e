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

use crate::edge::{Edge, Side};
use crate::point::Point;

use core::fmt;

use num_traits::real::Real;

/// The padded rectangle enclosing all input edges.
///
/// The box supplies the initial trapezoid of the decomposition: its top and
/// bottom sides are materialized as `Side::Undefined` edges, and its
/// top-left and bottom-right corners are the initial trapezoid's defining
/// vertices.
#[derive(Copy, Clone, PartialEq)]
pub struct BoundingBox<Num: Copy> {
    min: Point<Num>,
    max: Point<Num>,
}

impl<Num: Copy + fmt::Debug> fmt::Debug for BoundingBox<Num> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoundingBox")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish()
    }
}

impl<Num: Copy> BoundingBox<Num> {
    /// Create a new bounding box from its minimum and maximum corners.
    pub fn new(min: Point<Num>, max: Point<Num>) -> Self {
        BoundingBox { min, max }
    }

    /// Get the minimum corner of the box.
    pub fn min(&self) -> Point<Num> {
        self.min
    }

    /// Get the maximum corner of the box.
    pub fn max(&self) -> Point<Num> {
        self.max
    }

    /// Get the top-left corner of the box.
    pub fn top_left(&self) -> Point<Num> {
        Point::new(self.min.x(), self.max.y())
    }

    /// Get the bottom-right corner of the box.
    pub fn bottom_right(&self) -> Point<Num> {
        Point::new(self.max.x(), self.min.y())
    }
}

impl<Num: Real> BoundingBox<Num> {
    /// Compute the padded box around the endpoints of the given edges.
    ///
    /// An empty edge list yields the padded box around the origin.
    pub fn around_edges(edges: &[Edge<Num>], padding: Num) -> Self {
        let mut points = edges.iter().flat_map(|edge| [edge.p1(), edge.p2()]);

        let first = points.next().unwrap_or_else(Point::zero);
        let (min, max) = points.fold((first, first), |(min, max), point| {
            (
                Point::new(min.x().min(point.x()), min.y().min(point.y())),
                Point::new(max.x().max(point.x()), max.y().max(point.y())),
            )
        });

        BoundingBox {
            min: Point::new(min.x() - padding, min.y() - padding),
            max: Point::new(max.x() + padding, max.y() + padding),
        }
    }

    /// Materialize the top side of the box as an edge.
    pub fn top_edge(&self) -> Edge<Num> {
        Edge::new(
            self.top_left(),
            Point::new(self.max.x(), self.max.y()),
            Side::Undefined,
        )
    }

    /// Materialize the bottom side of the box as an edge.
    pub fn bottom_edge(&self) -> Edge<Num> {
        Edge::new(
            self.bottom_right(),
            Point::new(self.min.x(), self.min.y()),
            Side::Undefined,
        )
    }

    /// Tell whether the box contains a point.
    pub fn contains(&self, point: Point<Num>) -> bool {
        self.min.x() <= point.x()
            && point.x() <= self.max.x()
            && self.min.y() <= point.y()
            && point.y() <= self.max.y()
    }

    /// Get the area covered by the box.
    pub fn area(&self) -> Num {
        (self.max.x() - self.min.x()) * (self.max.y() - self.min.y())
    }
}

#[cfg(test)]
mod tests {
    use super::BoundingBox;
    use crate::edge::{Edge, Side};
    use crate::point::Point;

    #[test]
    fn test_around_edges() {
        let edges = [
            Edge::new(Point::new(1.0, 1.0), Point::new(5.0, 1.0), Side::Right),
            Edge::new(Point::new(5.0, 1.0), Point::new(3.0, 5.0), Side::Right),
        ];

        let bbox = BoundingBox::around_edges(&edges, 2.0);
        assert_eq!(bbox.min(), Point::new(-1.0, -1.0));
        assert_eq!(bbox.max(), Point::new(7.0, 7.0));
        assert_eq!(bbox.top_left(), Point::new(-1.0, 7.0));
        assert_eq!(bbox.bottom_right(), Point::new(7.0, -1.0));
    }

    #[test]
    fn test_around_no_edges() {
        let bbox = BoundingBox::<f64>::around_edges(&[], 2.0);
        assert_eq!(bbox.min(), Point::new(-2.0, -2.0));
        assert_eq!(bbox.max(), Point::new(2.0, 2.0));
    }

    #[test]
    fn test_box_edges_are_horizontal() {
        let edges = [Edge::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 2.0),
            Side::Right,
        )];

        let bbox = BoundingBox::around_edges(&edges, 2.0);
        let top = bbox.top_edge();
        let bottom = bbox.bottom_edge();
        assert_eq!(top.p1().y(), top.p2().y());
        assert_eq!(bottom.p1().y(), bottom.p2().y());
        assert_eq!(top.side(), Side::Undefined);
        assert!(bbox.contains(Point::new(0.0, 0.0)));
        assert!(!bbox.contains(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_area() {
        let bbox = BoundingBox::new(Point::new(0.0, 0.0), Point::new(4.0, 3.0));
        assert_eq!(bbox.area(), 12.0);
    }
}

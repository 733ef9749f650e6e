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

//! A trapezoid of the map, bounded above and below by edges and on the
//! sides by vertical walls.

use crate::decomp::{NodeId, TrapId};
use crate::edge::{Edge, Side};
use crate::point::Point;
use crate::ApproxEq;

use num_traits::real::Real;
use smallvec::SmallVec;

/// The neighbor multiset of one trapezoid side.
///
/// Two entries cover every steady state; duplicates only occur transiently
/// while neighbor lists are being restitched during a split.
pub(crate) type Neighbors = SmallVec<[TrapId; 2]>;

/// A trapezoid of the map.
///
/// The trapezoid spans the x range between its two defining vertices
/// `leftp` and `rightp` and is bounded by the non-vertical edges `top` and
/// `bottom`, which must cover that range without crossing each other over
/// it. The vertical walls through `leftp` and `rightp` connect the
/// trapezoid to its neighbor multisets.
#[derive(Debug, Clone)]
pub struct Trapezoid<Num: Copy> {
    leftp: Point<Num>,
    rightp: Point<Num>,
    top: Edge<Num>,
    bottom: Edge<Num>,

    /// Live trapezoids touching the left wall.
    pub(crate) left_neighbors: Neighbors,

    /// Live trapezoids touching the right wall.
    pub(crate) right_neighbors: Neighbors,

    /// The leaf of the search DAG holding this trapezoid, `None` once the
    /// trapezoid has died.
    pub(crate) leaf: Option<NodeId>,
}

impl<Num: Copy> Trapezoid<Num> {
    /// Create a new trapezoid with no leaf assigned yet.
    pub(crate) fn new(
        leftp: Point<Num>,
        rightp: Point<Num>,
        top: Edge<Num>,
        bottom: Edge<Num>,
        left_neighbors: Neighbors,
        right_neighbors: Neighbors,
    ) -> Self {
        Trapezoid {
            leftp,
            rightp,
            top,
            bottom,
            left_neighbors,
            right_neighbors,
            leaf: None,
        }
    }

    /// Get the vertex defining the left wall.
    #[inline]
    pub fn leftp(&self) -> Point<Num> {
        self.leftp
    }

    /// Get the vertex defining the right wall.
    #[inline]
    pub fn rightp(&self) -> Point<Num> {
        self.rightp
    }

    /// Get the edge bounding the trapezoid from above.
    #[inline]
    pub fn top(&self) -> Edge<Num> {
        self.top
    }

    /// Get the edge bounding the trapezoid from below.
    #[inline]
    pub fn bottom(&self) -> Edge<Num> {
        self.bottom
    }
}

impl<Num: Real + ApproxEq> Trapezoid<Num> {
    /// Get the top-left corner of the trapezoid.
    pub fn top_left(&self) -> Point<Num> {
        let x = self.leftp.x();
        Point::new(x, self.top.y_at(x).expect("left point outside top edge"))
    }

    /// Get the top-right corner of the trapezoid.
    pub fn top_right(&self) -> Point<Num> {
        let x = self.rightp.x();
        Point::new(x, self.top.y_at(x).expect("right point outside top edge"))
    }

    /// Get the bottom-left corner of the trapezoid.
    pub fn bottom_left(&self) -> Point<Num> {
        let x = self.leftp.x();
        Point::new(x, self.bottom.y_at(x).expect("left point outside bottom edge"))
    }

    /// Get the bottom-right corner of the trapezoid.
    pub fn bottom_right(&self) -> Point<Num> {
        let x = self.rightp.x();
        Point::new(x, self.bottom.y_at(x).expect("right point outside bottom edge"))
    }

    /// Get the left wall as an edge.
    ///
    /// Returns `None` when the wall degenerates to a point.
    pub fn left_edge(&self) -> Option<Edge<Num>> {
        let top_left = self.top_left();
        let bottom_left = self.bottom_left();

        if top_left == bottom_left {
            None
        } else {
            Some(Edge::new(bottom_left, top_left, Side::Both))
        }
    }

    /// Get the right wall as an edge.
    ///
    /// Returns `None` when the wall degenerates to a point.
    pub fn right_edge(&self) -> Option<Edge<Num>> {
        let top_right = self.top_right();
        let bottom_right = self.bottom_right();

        if top_right == bottom_right {
            None
        } else {
            Some(Edge::new(top_right, bottom_right, Side::Both))
        }
    }

    /// Get the part of the top edge bounding this trapezoid.
    ///
    /// The segment inherits the interior side of its carrier edge.
    pub fn top_segment(&self) -> Edge<Num> {
        Edge::new(self.top_left(), self.top_right(), self.top.side())
    }

    /// Get the part of the bottom edge bounding this trapezoid.
    pub fn bottom_segment(&self) -> Edge<Num> {
        Edge::new(self.bottom_right(), self.bottom_left(), self.bottom.side())
    }

    /// Get the centroid of the trapezoid's four corners.
    ///
    /// The centroid is strictly interior, which makes it the canonical
    /// probe point for point-location round trips.
    pub fn centroid(&self) -> Point<Num> {
        let four = Num::from(4).expect("small integer fits the coordinate type");
        let (tl, tr) = (self.top_left(), self.top_right());
        let (bl, br) = (self.bottom_left(), self.bottom_right());

        Point::new(
            (tl.x() + tr.x() + bl.x() + br.x()) / four,
            (tl.y() + tr.y() + bl.y() + br.y()) / four,
        )
    }

    /// Tell whether the vertex lies strictly inside this trapezoid.
    pub fn contains(&self, vertex: Point<Num>) -> bool {
        self.leftp.x() < vertex.x()
            && vertex.x() < self.rightp.x()
            && self.top.point_below(vertex)
            && self.bottom.point_above(vertex)
    }

    /// Classify how the given edge meets this trapezoid.
    ///
    /// Returns 0 when the edge is disjoint from the trapezoid or entirely
    /// contained in it, 1 when exactly one of its endpoints lies strictly
    /// inside, and 2 when it traverses the trapezoid from wall to wall
    /// (corner touches included).
    pub fn intersections_with(&self, edge: &Edge<Num>) -> usize {
        let p1_inside = self.contains(edge.p1());
        let p2_inside = self.contains(edge.p2());

        if p1_inside && p2_inside {
            // The trapezoid swallows the whole edge.
            return 0;
        }
        if p1_inside || p2_inside {
            return 1;
        }

        let left = self.left_edge();
        let right = self.right_edge();

        let top_left = self.top_left();
        let top_right = self.top_right();
        let bottom_left = self.bottom_left();
        let bottom_right = self.bottom_right();

        let tl_hit = edge.point_on(top_left);
        let tr_hit = edge.point_on(top_right);
        let bl_hit = left.is_some() && top_left != bottom_left && edge.point_on(bottom_left);
        let br_hit = right.is_some() && top_right != bottom_right && edge.point_on(bottom_right);

        let corner_hits = tl_hit as usize + tr_hit as usize + bl_hit as usize + br_hit as usize;
        if corner_hits == 2 {
            // Two corner hits leave no room for further crossings.
            return 2;
        }

        let top_hit = self.top_segment().intersects(edge);
        let bottom_hit = self.bottom_segment().intersects(edge);
        let left_hit = left.map_or(false, |wall| wall.intersects(edge));
        let right_hit = right.map_or(false, |wall| wall.intersects(edge));

        // Crossings on opposite sides, or a side crossing paired with a
        // corner hit on the far side, traverse the trapezoid.
        if (right_hit && left_hit)
            || (top_hit && bottom_hit)
            || (right_hit && (tl_hit || bl_hit))
            || (left_hit && (tr_hit || br_hit))
            || (top_hit && (bl_hit || br_hit))
            || (bottom_hit && (tl_hit || tr_hit))
        {
            return 2;
        }

        // Corner hits are counted by the side tests as well; subtract them.
        (top_hit as usize + right_hit as usize + bottom_hit as usize + left_hit as usize)
            .saturating_sub(corner_hits)
    }

    /// Tell whether the given edge intersects this trapezoid at all.
    pub fn is_crossed_by(&self, edge: &Edge<Num>) -> bool {
        self.intersections_with(edge) > 0
    }
}

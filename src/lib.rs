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

//! Trapezoidal decomposition of simple polygons.
//!
//! `trapmap` computes the vertical decomposition of a simple polygon in the
//! plane and, alongside it, a search structure that answers "which trapezoid
//! contains this point?" in expected logarithmic time. Construction is
//! randomized and incremental: the polygon's edges are inserted one by one
//! in a seed-controlled random order, and every insertion locates the
//! trapezoids the new edge crosses, splits them, merges fragments whose
//! separating wall became fictitious and grafts a matching sub-DAG into the
//! search structure.
//!
//! Out of the box, `trapmap` provides the following:
//!
//! * Point, vector and edge primitives.
//! * The trapezoid map and its point-location DAG.
//! * A seed-controlled randomized incremental builder.
//! * A plain-text polygon parser and generator.
//!
//! Vertical input edges are not supported and are rejected with a defined
//! error; the input is assumed to be in general position (no two vertices
//! share an x coordinate, no three vertices are collinear, no vertex lies on
//! a non-incident edge).

#![no_std]
#![forbid(unsafe_code, future_incompatible)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod bbox;
pub mod decomp;
mod edge;
mod error;
mod point;
mod polygon;
mod trapezoid;

pub use bbox::BoundingBox;
pub use decomp::{Decomposition, EdgeKind, NodeId, TrapId};
pub use edge::{Edge, Side};
pub use error::{Error, Phase};
pub use point::{Point, Vector};
pub use polygon::{check_general_position, parse_polygon, random_polygon};
pub use trapezoid::Trapezoid;

/// Simple trait for telling if one value is approximately equal to another.
pub trait ApproxEq {
    /// Returns true if the values are approximately equal.
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f32 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < f32::EPSILON
    }
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < f64::EPSILON
    }
}

impl<T: ApproxEq> ApproxEq for &T {
    fn approx_eq(&self, other: &Self) -> bool {
        T::approx_eq(*self, *other)
    }
}

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

//! The trapezoid map and its randomized incremental construction.
//!
//! The decomposition owns two arenas: the trapezoids of the map and the
//! nodes of the point-location DAG. Trapezoids reference each other through
//! their neighbor multisets and reference their DAG leaf; leaves point back
//! at their trapezoid. Edges are inserted one at a time, each insertion
//! running four strictly ordered phases: locate-and-follow, split, merge,
//! graft.

mod dag;
mod insert;

#[cfg(test)]
mod tests;

use crate::bbox::BoundingBox;
use crate::edge::{Edge, Side};
use crate::error::Error;
use crate::point::Point;
use crate::trapezoid::{Neighbors, Trapezoid};

use alloc::vec::Vec;
use core::fmt;

use num_traits::real::Real;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smallvec::SmallVec;

use crate::ApproxEq;
use dag::{Node, SearchDag};

/// Identifier of a trapezoid in the map's arena.
///
/// Identifiers stay valid for the lifetime of the decomposition; dead
/// trapezoids keep their slot but lose their leaf.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrapId(pub(crate) usize);

/// Identifier of a node in the search DAG's arena.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// How an edge of the finished decomposition relates to the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The edge lies on an input polygon edge.
    Polygon,

    /// The edge is synthetic: a vertical wall or a piece of the bounding
    /// box.
    Wall,
}

/// A trapezoidal decomposition under construction, or finished.
#[derive(Debug)]
pub struct Decomposition<Num: Copy> {
    traps: Vec<Trapezoid<Num>>,
    dag: SearchDag<Num>,
    bbox: BoundingBox<Num>,
}

impl<Num: Real + ApproxEq + fmt::Debug> Decomposition<Num> {
    /// Create the empty decomposition of a bounding box: one trapezoid
    /// spanning the whole rectangle, and a single-leaf search structure.
    pub fn new(bbox: BoundingBox<Num>) -> Self {
        let initial = Trapezoid::new(
            bbox.top_left(),
            bbox.bottom_right(),
            bbox.top_edge(),
            bbox.bottom_edge(),
            Neighbors::new(),
            Neighbors::new(),
        );

        let mut decomp = Decomposition {
            traps: alloc::vec![initial],
            dag: SearchDag::with_root_leaf(TrapId(0)),
            bbox,
        };
        decomp.traps[0].leaf = Some(decomp.dag.root());
        decomp
    }

    /// Build the decomposition of the given edges, inserting them in a
    /// uniformly random order drawn from the seed.
    ///
    /// The random order is what gives the construction its expected
    /// O(n log n) running time; the seed makes runs reproducible.
    pub fn build(edges: &[Edge<Num>], seed: u64) -> Result<Self, Error<Num>> {
        let mut order = edges.to_vec();
        let mut rng = SmallRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        Self::build_in_order(&order)
    }

    /// Build the decomposition of the given edges, inserting them in the
    /// order given.
    pub fn build_in_order(edges: &[Edge<Num>]) -> Result<Self, Error<Num>> {
        let padding = Num::one() + Num::one();
        let bbox = BoundingBox::around_edges(edges, padding);

        let mut decomp = Self::new(bbox);
        for edge in edges {
            decomp.insert(*edge)?;
        }
        Ok(decomp)
    }

    /// Get the bounding box the decomposition was built over.
    pub fn bbox(&self) -> BoundingBox<Num> {
        self.bbox
    }

    /// Get a trapezoid by its identifier.
    pub fn trapezoid(&self, id: TrapId) -> &Trapezoid<Num> {
        &self.traps[id.0]
    }

    /// Iterate over the live trapezoids of the map.
    pub fn trapezoids(&self) -> impl Iterator<Item = (TrapId, &Trapezoid<Num>)> + '_ {
        self.traps
            .iter()
            .enumerate()
            .filter(|(_, trap)| trap.leaf.is_some())
            .map(|(index, trap)| (TrapId(index), trap))
    }

    /// Count the live trapezoids of the map.
    pub fn trapezoid_count(&self) -> usize {
        self.trapezoids().count()
    }

    /// Locate the trapezoids containing the given vertex.
    ///
    /// The result is a singleton unless the vertex lies exactly on a
    /// structure boundary (notably: it is a polygon vertex shared by two
    /// trapezoids), in which case all matching leaves are returned and the
    /// caller disambiguates.
    pub fn locate(&self, vertex: Point<Num>) -> SmallVec<[TrapId; 2]> {
        let mut found: SmallVec<[TrapId; 2]> = SmallVec::new();
        for leaf in self.dag.locate(vertex) {
            let trap = self.dag.leaf_trap(leaf).expect("located node is a leaf");
            if !found.contains(&trap) {
                found.push(trap);
            }
        }
        found
    }

    /// Read the finished decomposition out as a set of tagged edges.
    ///
    /// The read-out walks the leaves of the search structure. Every live
    /// trapezoid contributes its top and bottom segments and its two walls;
    /// segments lying on an input polygon edge are tagged
    /// [`EdgeKind::Polygon`], everything else [`EdgeKind::Wall`]. Shared
    /// walls are reported once.
    pub fn edges(&self) -> Vec<(Edge<Num>, EdgeKind)> {
        let mut result: Vec<(Edge<Num>, EdgeKind)> = Vec::new();

        let push = |result: &mut Vec<(Edge<Num>, EdgeKind)>, edge: Edge<Num>| {
            let kind = match edge.side() {
                Side::Left | Side::Right => EdgeKind::Polygon,
                Side::Both | Side::Undefined => EdgeKind::Wall,
            };
            if !result.iter().any(|(seen, _)| same_segment(seen, &edge)) {
                result.push((edge, kind));
            }
        };

        for leaf in self.dag.leaves() {
            let id = self.dag.leaf_trap(leaf).expect("reachable node is a leaf");
            let trap = self.trapezoid(id);

            push(&mut result, trap.top_segment());
            push(&mut result, trap.bottom_segment());
            if let Some(wall) = trap.left_edge() {
                push(&mut result, wall);
            }
            if let Some(wall) = trap.right_edge() {
                push(&mut result, wall);
            }
        }

        result
    }

    pub(crate) fn trap(&self, id: TrapId) -> &Trapezoid<Num> {
        &self.traps[id.0]
    }

    pub(crate) fn trap_mut(&mut self, id: TrapId) -> &mut Trapezoid<Num> {
        &mut self.traps[id.0]
    }

    /// Allocate a trapezoid together with its leaf in the search DAG.
    pub(crate) fn new_trap(
        &mut self,
        leftp: Point<Num>,
        rightp: Point<Num>,
        top: Edge<Num>,
        bottom: Edge<Num>,
        left_neighbors: Neighbors,
        right_neighbors: Neighbors,
    ) -> TrapId {
        let id = TrapId(self.traps.len());
        self.traps.push(Trapezoid::new(
            leftp,
            rightp,
            top,
            bottom,
            left_neighbors,
            right_neighbors,
        ));

        let leaf = self.dag.alloc(Node::Leaf { trap: id });
        self.traps[id.0].leaf = Some(leaf);
        id
    }
}

/// Compare two segments as unordered endpoint pairs.
fn same_segment<Num: Real>(a: &Edge<Num>, b: &Edge<Num>) -> bool {
    (a.p1() == b.p1() && a.p2() == b.p2()) || (a.p1() == b.p2() && a.p2() == b.p1())
}

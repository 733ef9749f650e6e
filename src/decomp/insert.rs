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

//! Incremental insertion of one edge into the map.
//!
//! An insertion runs four phases, in order: locate the trapezoids the edge
//! crosses by walking right-neighbors from the located start, split every
//! crossed trapezoid over the edge, sweep the split records left to right
//! merging fragments whose separating wall became fictitious, and finally
//! graft a replacement sub-DAG over each split trapezoid's leaf. The phase
//! boundaries are strict: neighbor lists only change during splits and
//! merges, and the search structure only changes during grafts, so the
//! walk never observes a half-updated map.

use crate::edge::Edge;
use crate::error::{Error, Phase};
use crate::point::Point;
use crate::trapezoid::Neighbors;
use crate::ApproxEq;

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use num_traits::real::Real;
use smallvec::smallvec;

use super::dag::Node;
use super::{Decomposition, NodeId, TrapId};

/// The fragments produced by splitting one trapezoid over an edge.
///
/// `top` and `bottom` initially name the fragments above and below the
/// edge; the merge pass rewrites them to the merged trapezoids they were
/// absorbed into. The optional rectangles appear when an endpoint of the
/// edge lay strictly inside the original.
#[derive(Debug, Clone)]
pub(crate) struct SplitRecord {
    original: TrapId,
    top: TrapId,
    bottom: TrapId,
    left: Option<TrapId>,
    right: Option<TrapId>,
}

impl<Num: Real + ApproxEq + fmt::Debug> Decomposition<Num> {
    /// Insert one edge into the decomposition.
    ///
    /// Vertical edges are rejected before anything is touched. Any other
    /// failure is an [`Error::InvariantBroken`] and indicates a bug.
    pub fn insert(&mut self, edge: Edge<Num>) -> Result<(), Error<Num>> {
        if edge.is_vertical() {
            return Err(Error::UnsupportedEdge(edge));
        }

        // Phase 1: locate and follow.
        let located = self.locate(edge.start());
        if located.is_empty() {
            return Err(Error::InvariantBroken {
                phase: Phase::Locate,
                edge,
                trap: None,
                detail: "point location returned no leaf",
            });
        }

        let crossed = self.find_crossed(&located, &edge);
        tracing::debug!(
            "inserting {:?}: located {}, crossing {}",
            edge,
            located.len(),
            crossed.len()
        );

        // Phase 2: split every crossed trapezoid, left to right.
        let mut records = Vec::with_capacity(crossed.len());
        for tid in crossed {
            if let Some(record) = self.split(tid, &edge)? {
                records.push(record);
            }
        }

        // Phase 3: dissolve fictitious walls between adjacent fragments.
        self.merge_fragments(&mut records);

        // Phase 4: graft the replacement sub-DAGs.
        for record in &records {
            self.graft(record, &edge)?;
        }

        Ok(())
    }

    /// Walk the map from the located start trapezoids and collect, in
    /// left-to-right order, every trapezoid the edge crosses.
    fn find_crossed(&self, located: &[TrapId], edge: &Edge<Num>) -> Vec<TrapId> {
        // Keep only the left-most of the located trapezoids: when the
        // start vertex is shared, the query returns a trapezoid and its
        // right-neighbor, and the walk has to begin at the left one.
        let mut work: Vec<TrapId> = located
            .iter()
            .copied()
            .filter(|&tid| {
                !located
                    .iter()
                    .any(|&other| other != tid && self.trap(other).right_neighbors.contains(&tid))
            })
            .collect();

        let start = edge.start();
        let mut crossed = Vec::new();
        let mut cursor = 0;

        while cursor < work.len() {
            let tid = work[cursor];
            cursor += 1;

            let trap = self.trap(tid);
            if !trap.is_crossed_by(edge) && !trap.contains(start) {
                continue;
            }
            crossed.push(tid);

            // Extend the frontier deterministically.
            let mut rights: Vec<TrapId> = trap.right_neighbors.to_vec();
            rights.sort_by(|&a, &b| {
                let ax = self.trap(a).top().start().x();
                let bx = self.trap(b).top().start().x();
                ax.partial_cmp(&bx).unwrap_or(Ordering::Equal)
            });

            for right in rights {
                if !work.contains(&right) {
                    work.push(right);
                }
            }
        }

        crossed
    }

    /// Split one trapezoid over the edge.
    ///
    /// Returns `None` when the edge only brushes a wall or corner and the
    /// trapezoid survives unchanged.
    fn split(&mut self, tid: TrapId, edge: &Edge<Num>) -> Result<Option<SplitRecord>, Error<Num>> {
        let crossings = self.trap(tid).intersections_with(edge);
        let start = edge.start();
        let end = edge.end();

        let (leftp, rightp, top, bottom) = {
            let trap = self.trap(tid);
            (trap.leftp(), trap.rightp(), trap.top(), trap.bottom())
        };

        match crossings {
            0 => {
                if !(self.trap(tid).contains(start) && self.trap(tid).contains(end)) {
                    // The edge is disjoint from this trapezoid.
                    return Ok(None);
                }

                // The trapezoid swallows the whole edge: a rectangle on
                // either side of the edge's span, and two fragments split
                // by the edge itself.
                let left_neighbors = self.trap(tid).left_neighbors.clone();
                let right_neighbors = self.trap(tid).right_neighbors.clone();

                let left_rect =
                    self.new_trap(leftp, start, top, bottom, left_neighbors.clone(), smallvec![]);
                for &neighbor in &left_neighbors {
                    self.replace_right_neighbor(neighbor, tid, left_rect);
                }

                let right_rect =
                    self.new_trap(end, rightp, top, bottom, smallvec![], right_neighbors.clone());
                for &neighbor in &right_neighbors {
                    self.replace_left_neighbor(neighbor, tid, right_rect);
                }

                let above = self.new_trap(
                    start,
                    end,
                    top,
                    *edge,
                    smallvec![left_rect],
                    smallvec![right_rect],
                );
                let below = self.new_trap(
                    start,
                    end,
                    *edge,
                    bottom,
                    smallvec![left_rect],
                    smallvec![right_rect],
                );

                self.trap_mut(left_rect).right_neighbors = smallvec![above, below];
                self.trap_mut(right_rect).left_neighbors = smallvec![above, below];

                Ok(Some(SplitRecord {
                    original: tid,
                    top: above,
                    bottom: below,
                    left: Some(left_rect),
                    right: Some(right_rect),
                }))
            }
            1 if self.trap(tid).contains(start) => {
                // Chop off the rectangle left of the start vertex, then
                // split the remainder as a traversing case.
                let left_neighbors = self.trap(tid).left_neighbors.clone();
                let rect =
                    self.new_trap(leftp, start, top, bottom, left_neighbors.clone(), smallvec![]);
                for &neighbor in &left_neighbors {
                    self.replace_right_neighbor(neighbor, tid, rect);
                }

                let right_neighbors = self.trap(tid).right_neighbors.clone();
                let rest = self.new_trap(
                    start,
                    rightp,
                    top,
                    bottom,
                    smallvec![rect],
                    right_neighbors.clone(),
                );
                self.trap_mut(rect).right_neighbors = smallvec![rest];
                for &neighbor in &right_neighbors {
                    self.replace_left_neighbor(neighbor, tid, rest);
                }

                let inner = self.split(rest, edge)?.ok_or(Error::InvariantBroken {
                    phase: Phase::Split,
                    edge: *edge,
                    trap: Some(tid),
                    detail: "remainder of an endpoint split does not cross the edge",
                })?;

                // The remainder was only a stepping stone; it dies here and
                // its fragments are reported against the real original.
                self.trap_mut(rest).leaf = None;

                Ok(Some(SplitRecord {
                    original: tid,
                    top: inner.top,
                    bottom: inner.bottom,
                    left: Some(rect),
                    right: inner.right,
                }))
            }
            1 if self.trap(tid).contains(end) => {
                // Mirror image: chop off the rectangle right of the end
                // vertex.
                let right_neighbors = self.trap(tid).right_neighbors.clone();
                let rect =
                    self.new_trap(end, rightp, top, bottom, smallvec![], right_neighbors.clone());
                for &neighbor in &right_neighbors {
                    self.replace_left_neighbor(neighbor, tid, rect);
                }

                let left_neighbors = self.trap(tid).left_neighbors.clone();
                let rest = self.new_trap(
                    leftp,
                    end,
                    top,
                    bottom,
                    left_neighbors.clone(),
                    smallvec![rect],
                );
                self.trap_mut(rect).left_neighbors = smallvec![rest];
                for &neighbor in &left_neighbors {
                    self.replace_right_neighbor(neighbor, tid, rest);
                }

                let inner = self.split(rest, edge)?.ok_or(Error::InvariantBroken {
                    phase: Phase::Split,
                    edge: *edge,
                    trap: Some(tid),
                    detail: "remainder of an endpoint split does not cross the edge",
                })?;

                self.trap_mut(rest).leaf = None;

                Ok(Some(SplitRecord {
                    original: tid,
                    top: inner.top,
                    bottom: inner.bottom,
                    left: inner.left,
                    right: Some(rect),
                }))
            }
            1 => {
                // The edge only brushes a wall; nothing to split.
                Ok(None)
            }
            _ => self.split_traversing(tid, edge, leftp, rightp, top, bottom),
        }
    }

    /// Split a trapezoid the edge crosses from wall to wall.
    #[allow(clippy::too_many_arguments)]
    fn split_traversing(
        &mut self,
        tid: TrapId,
        edge: &Edge<Num>,
        leftp: Point<Num>,
        rightp: Point<Num>,
        top: Edge<Num>,
        bottom: Edge<Num>,
    ) -> Result<Option<SplitRecord>, Error<Num>> {
        // Work out the defining vertices of the two fragments on each
        // wall: the wall vertex itself on the side of the edge it lies on,
        // and the wall's far corner on the other side.
        let (mut leftp_top, mut leftp_bottom) = if edge.has_endpoint(leftp) {
            (leftp, leftp)
        } else if edge.point_above(leftp) {
            let x = leftp.x();
            let below = Point::new(x, bottom.y_at(x).expect("left point outside bottom edge"));
            (leftp, below)
        } else {
            let x = leftp.x();
            let above = Point::new(x, top.y_at(x).expect("left point outside top edge"));
            (above, leftp)
        };

        let (mut rightp_top, mut rightp_bottom) = if edge.has_endpoint(rightp) {
            (rightp, rightp)
        } else if edge.point_above(rightp) {
            let x = rightp.x();
            let below = Point::new(x, bottom.y_at(x).expect("right point outside bottom edge"));
            (rightp, below)
        } else {
            let x = rightp.x();
            let above = Point::new(x, top.y_at(x).expect("right point outside top edge"));
            (above, rightp)
        };

        // Prefer a real endpoint of the edge over a synthetic intersection
        // vertex at the same x.
        if let Some(y) = edge.y_at(leftp.x()) {
            let on_edge = Point::new(leftp.x(), y);
            if edge.has_endpoint(on_edge) {
                if !top.has_endpoint(leftp_top) {
                    leftp_top = on_edge;
                }
                if !bottom.has_endpoint(leftp_bottom) {
                    leftp_bottom = on_edge;
                }
            }
        }
        if let Some(y) = edge.y_at(rightp.x()) {
            let on_edge = Point::new(rightp.x(), y);
            if edge.has_endpoint(on_edge) {
                if !top.has_endpoint(rightp_top) {
                    rightp_top = on_edge;
                }
                if !bottom.has_endpoint(rightp_bottom) {
                    rightp_bottom = on_edge;
                }
            }
        }

        let above = self.new_trap(leftp_top, rightp_top, top, *edge, smallvec![], smallvec![]);
        let below = self.new_trap(
            leftp_bottom,
            rightp_bottom,
            *edge,
            bottom,
            smallvec![],
            smallvec![],
        );

        // Hand each neighbor of the dying trapezoid to the fragment (or
        // fragments) its interior lines up with.
        let left_neighbors = self.trap(tid).left_neighbors.clone();
        for &neighbor in &left_neighbors {
            self.remove_right_neighbor(neighbor, tid);

            let (n_rightp, n_top, n_bottom) = {
                let n = self.trap(neighbor);
                (n.rightp(), n.top(), n.bottom())
            };
            let straddler = edge.lies_above(&n_bottom) && n_top.lies_above(edge);

            let mut linked = false;
            if straddler
                || n_rightp == leftp_top
                || n_top == top
                || n_bottom == *edge
                || n_bottom.lies_above(edge)
            {
                self.link(neighbor, above);
                linked = true;
            }
            if straddler
                || n_rightp == leftp_bottom
                || n_top == *edge
                || n_bottom == bottom
                || edge.lies_above(&n_top)
            {
                self.link(neighbor, below);
                linked = true;
            }

            if !linked {
                return Err(Error::InvariantBroken {
                    phase: Phase::Split,
                    edge: *edge,
                    trap: Some(tid),
                    detail: "left neighbor lines up with neither fragment",
                });
            }
        }

        let right_neighbors = self.trap(tid).right_neighbors.clone();
        for &neighbor in &right_neighbors {
            self.remove_left_neighbor(neighbor, tid);

            let (n_leftp, n_top, n_bottom) = {
                let n = self.trap(neighbor);
                (n.leftp(), n.top(), n.bottom())
            };
            let straddler = edge.lies_above(&n_bottom) && n_top.lies_above(edge);

            let mut linked = false;
            if straddler
                || n_leftp == rightp_top
                || n_top == top
                || n_bottom == *edge
                || n_bottom.lies_above(edge)
            {
                self.link(above, neighbor);
                linked = true;
            }
            if straddler
                || n_leftp == rightp_bottom
                || n_top == *edge
                || n_bottom == bottom
                || edge.lies_above(&n_top)
            {
                self.link(below, neighbor);
                linked = true;
            }

            if !linked {
                return Err(Error::InvariantBroken {
                    phase: Phase::Split,
                    edge: *edge,
                    trap: Some(tid),
                    detail: "right neighbor lines up with neither fragment",
                });
            }
        }

        Ok(Some(SplitRecord {
            original: tid,
            top: above,
            bottom: below,
            left: None,
            right: None,
        }))
    }

    /// Tell whether `left` may merge with `right`, its horizontal neighbor.
    ///
    /// The merge is legal iff the two share their top and bottom edges,
    /// each is the other's sole neighbor across the touching wall, and the
    /// wall is fictitious: neither of its corners is an endpoint of the
    /// edge it lies on.
    fn can_merge(&self, left: TrapId, right: TrapId) -> bool {
        let (a, b) = (self.trap(left), self.trap(right));

        if a.top() != b.top() || a.bottom() != b.bottom() {
            return false;
        }

        let sole_neighbors = a.right_neighbors.len() == 1
            && a.right_neighbors[0] == right
            && b.left_neighbors.len() == 1
            && b.left_neighbors[0] == left;
        if !sole_neighbors {
            return false;
        }

        !a.top().has_endpoint(a.top_right()) && !a.bottom().has_endpoint(a.bottom_right())
    }

    /// Merge two horizontally adjacent fragments into one trapezoid.
    ///
    /// Both fragments die; the merged trapezoid takes over the outer
    /// neighbor sets on both sides.
    fn merge(&mut self, left: TrapId, right: TrapId) -> TrapId {
        let (leftp, top, bottom, left_neighbors) = {
            let a = self.trap(left);
            (a.leftp(), a.top(), a.bottom(), a.left_neighbors.clone())
        };
        let (rightp, right_neighbors) = {
            let b = self.trap(right);
            (b.rightp(), b.right_neighbors.clone())
        };

        let merged = self.new_trap(
            leftp,
            rightp,
            top,
            bottom,
            left_neighbors.clone(),
            right_neighbors.clone(),
        );
        for &neighbor in &left_neighbors {
            self.replace_right_neighbor(neighbor, left, merged);
        }
        for &neighbor in &right_neighbors {
            self.replace_left_neighbor(neighbor, right, merged);
        }

        // The fragments were never grafted; they die unseen by the search
        // structure.
        self.trap_mut(left).leaf = None;
        self.trap_mut(right).leaf = None;

        tracing::trace!("merged {:?} and {:?} into {:?}", left, right, merged);
        merged
    }

    /// Sweep the split records left to right, absorbing fragments whose
    /// separating wall became fictitious.
    ///
    /// Two merge chains run at once, one over the top fragments and one
    /// over the bottom fragments. When a chain breaks, the accumulated
    /// trapezoid is committed into every record that contributed to it, so
    /// records of merged fragments end up sharing a trapezoid (and with it
    /// a DAG leaf).
    fn merge_fragments(&mut self, records: &mut [SplitRecord]) {
        if records.is_empty() {
            return;
        }

        let mut top_current = records[0].top;
        let mut top_members: Vec<usize> = alloc::vec![0];
        let mut bottom_current = records[0].bottom;
        let mut bottom_members: Vec<usize> = alloc::vec![0];

        for index in 1..records.len() {
            let candidate = records[index].top;
            if self.can_merge(top_current, candidate) {
                top_current = self.merge(top_current, candidate);
                top_members.push(index);
            } else {
                for &member in &top_members {
                    records[member].top = top_current;
                }
                top_current = candidate;
                top_members.clear();
                top_members.push(index);
            }

            let candidate = records[index].bottom;
            if self.can_merge(bottom_current, candidate) {
                bottom_current = self.merge(bottom_current, candidate);
                bottom_members.push(index);
            } else {
                for &member in &bottom_members {
                    records[member].bottom = bottom_current;
                }
                bottom_current = candidate;
                bottom_members.clear();
                bottom_members.push(index);
            }
        }

        // Commit whatever chains are still running.
        for &member in &top_members {
            records[member].top = top_current;
        }
        for &member in &bottom_members {
            records[member].bottom = bottom_current;
        }
    }

    /// Replace the original trapezoid's leaf with the sub-DAG describing
    /// its split.
    ///
    /// The inner y-node separates the fragments along the edge; an x-node
    /// on the edge's end shields the right rectangle, and one on its start
    /// the left rectangle. Replacement happens in place at the old leaf's
    /// slot, so every parent that referenced it (there may be several after
    /// earlier merges) now reaches the sub-DAG. Merged fragments contribute
    /// the same leaf to every record they absorbed, which is what keeps
    /// repeated grafting over a shared fragment consistent.
    fn graft(&mut self, record: &SplitRecord, edge: &Edge<Num>) -> Result<(), Error<Num>> {
        let old_leaf = self.live_leaf(record.original, edge)?;
        let above = self.live_leaf(record.top, edge)?;
        let below = self.live_leaf(record.bottom, edge)?;

        let mut content = Node::Y {
            edge: *edge,
            below,
            above,
        };

        if let Some(rect) = record.right {
            let inner = self.dag.alloc(content);
            content = Node::X {
                vertex: edge.end(),
                left: inner,
                right: self.live_leaf(rect, edge)?,
            };
        }

        if let Some(rect) = record.left {
            let inner = self.dag.alloc(content);
            content = Node::X {
                vertex: edge.start(),
                left: self.live_leaf(rect, edge)?,
                right: inner,
            };
        }

        self.dag.replace(old_leaf, content);
        self.trap_mut(record.original).leaf = None;

        tracing::trace!("grafted over {:?}", record.original);
        Ok(())
    }

    fn live_leaf(&self, trap: TrapId, edge: &Edge<Num>) -> Result<NodeId, Error<Num>> {
        self.trap(trap).leaf.ok_or(Error::InvariantBroken {
            phase: Phase::Graft,
            edge: *edge,
            trap: Some(trap),
            detail: "trapezoid has no live leaf",
        })
    }

    /// Make `left` and `right` horizontal neighbors of each other.
    fn link(&mut self, left: TrapId, right: TrapId) {
        self.trap_mut(left).right_neighbors.push(right);
        self.trap_mut(right).left_neighbors.push(left);
    }

    fn remove_left_neighbor(&mut self, of: TrapId, gone: TrapId) {
        remove_first(&mut self.trap_mut(of).left_neighbors, gone);
    }

    fn remove_right_neighbor(&mut self, of: TrapId, gone: TrapId) {
        remove_first(&mut self.trap_mut(of).right_neighbors, gone);
    }

    fn replace_left_neighbor(&mut self, of: TrapId, gone: TrapId, new: TrapId) {
        let neighbors = &mut self.trap_mut(of).left_neighbors;
        remove_first(neighbors, gone);
        neighbors.push(new);
    }

    fn replace_right_neighbor(&mut self, of: TrapId, gone: TrapId, new: TrapId) {
        let neighbors = &mut self.trap_mut(of).right_neighbors;
        remove_first(neighbors, gone);
        neighbors.push(new);
    }
}

/// Remove one occurrence of a trapezoid from a neighbor multiset.
fn remove_first(neighbors: &mut Neighbors, gone: TrapId) {
    if let Some(position) = neighbors.iter().position(|&id| id == gone) {
        neighbors.remove(position);
    }
}

//! The half-edge mesh the partitioner cuts up.
//!
//! Everything lives in one append-only arena: vertices and half-edges are
//! addressed by index and are never removed during a build, so indices stay
//! valid across splits. Half-edges are threaded onto intrusive doubly linked
//! lists (`next_on_side`/`prev_on_side`), one list per pending half-edge set
//! or finished leaf; a split fragment is always linked right after the edge
//! it was cut from.

use super::errors::{ErrorKind, Result};
use super::types::{LineSide, LinedefId, SectorId, VertexId};
use super::util::{angle_difference, ANG_EPSILON};
use failchain::bail;
use math::prelude::*;
use math::{compute_angle, Line2d, Pnt2d, Vec2d};

pub type HEdgeId = usize;
pub type ListId = usize;

/// A wall leaving a vertex: its direction and the sectors on either side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallTip {
    pub angle: f64,
    pub left: Option<SectorId>,
    pub right: Option<SectorId>,
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub pos: Pnt2d,
    // Sorted by increasing angle.
    tips: Vec<WallTip>,
}

impl Vertex {
    #[cfg(test)]
    pub fn tips(&self) -> &[WallTip] {
        &self.tips
    }
}

/// Cached geometry of a half-edge, valid for its current endpoints only.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HEdgeMetrics {
    pub start: Pnt2d,
    pub end: Pnt2d,
    pub direction: Vec2d,
    pub length: f64,
    pub angle: f64,
    /// Line constants used when this half-edge acts as a partition.
    pub perp: f64,
    pub para: f64,
}

impl HEdgeMetrics {
    fn compute(start: Pnt2d, end: Pnt2d) -> Option<HEdgeMetrics> {
        let direction = end - start;
        let length = direction.magnitude();
        if !(length > 0.0) || !length.is_finite() {
            return None;
        }
        Some(HEdgeMetrics {
            start,
            end,
            direction,
            length,
            angle: compute_angle(direction),
            perp: start.y * direction.x - start.x * direction.y,
            para: -start.x * direction.x - start.y * direction.y,
        })
    }

    /// Signed distance of `point` from this edge's line, positive on the right.
    pub fn perp_distance(&self, point: Pnt2d) -> f64 {
        (point.x * self.direction.y - point.y * self.direction.x + self.perp) / self.length
    }

    /// Distance of `point` along this edge's line, measured from `start`.
    pub fn para_distance(&self, point: Pnt2d) -> f64 {
        (point.x * self.direction.x + point.y * self.direction.y + self.para) / self.length
    }

    pub fn line(&self) -> Line2d {
        Line2d::from_two_points(self.start, self.end)
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.direction.x == 0.0 || self.direction.y == 0.0
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    pub start: VertexId,
    pub end: VertexId,
    /// Side of the input linedef this edge was cut from; `None` for mini-edges.
    pub line_side: Option<LineSide>,
    /// Line this edge lies along; for mini-edges, the partition's line.
    pub source_line: Option<LinedefId>,
    pub sector: Option<SectorId>,
    pub twin: Option<HEdgeId>,
    /// Set when the owning line has the same sector on both sides.
    pub self_ref: bool,

    pub next_on_side: Option<HEdgeId>,
    pub prev_on_side: Option<HEdgeId>,
    pub list: Option<ListId>,

    pub next: Option<HEdgeId>,
    pub prev: Option<HEdgeId>,

    metrics: HEdgeMetrics,
}

impl HalfEdge {
    pub fn metrics(&self) -> &HEdgeMetrics {
        &self.metrics
    }

    pub fn is_mini(&self) -> bool {
        self.line_side.is_none()
    }

    pub fn line(&self) -> Option<LinedefId> {
        self.line_side.map(|line_side| line_side.line)
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct SideList {
    head: Option<HEdgeId>,
    tail: Option<HEdgeId>,
    len: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    hedges: Vec<HalfEdge>,
    lists: Vec<SideList>,
}

impl Mesh {
    pub fn new() -> Mesh {
        Mesh::default()
    }

    pub fn add_vertex(&mut self, pos: Pnt2d) -> VertexId {
        self.vertices.push(Vertex {
            pos,
            tips: Vec::new(),
        });
        self.vertices.len() - 1
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[cfg(test)]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    pub fn vertex_pos(&self, id: VertexId) -> Pnt2d {
        self.vertices[id].pos
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    pub fn num_hedges(&self) -> usize {
        self.hedges.len()
    }

    pub fn hedge(&self, id: HEdgeId) -> &HalfEdge {
        &self.hedges[id]
    }

    pub fn hedge_mut(&mut self, id: HEdgeId) -> &mut HalfEdge {
        &mut self.hedges[id]
    }

    pub fn metrics(&self, id: HEdgeId) -> &HEdgeMetrics {
        &self.hedges[id].metrics
    }

    pub fn new_hedge(
        &mut self,
        start: VertexId,
        end: VertexId,
        line_side: Option<LineSide>,
        sector: Option<SectorId>,
    ) -> Result<HEdgeId> {
        let id = self.hedges.len();
        let metrics = self.compute_metrics(id, start, end)?;
        self.hedges.push(HalfEdge {
            start,
            end,
            line_side,
            source_line: line_side.map(|line_side| line_side.line),
            sector,
            twin: None,
            self_ref: false,
            next_on_side: None,
            prev_on_side: None,
            list: None,
            next: None,
            prev: None,
            metrics,
        });
        Ok(id)
    }

    /// Copies the build metadata of `id` into a fresh, unlinked half-edge.
    pub fn clone_hedge(&mut self, id: HEdgeId) -> HEdgeId {
        let original = &self.hedges[id];
        let copy = HalfEdge {
            start: original.start,
            end: original.end,
            line_side: original.line_side,
            source_line: original.source_line,
            sector: original.sector,
            twin: None,
            self_ref: original.self_ref,
            next_on_side: None,
            prev_on_side: None,
            list: None,
            next: None,
            prev: None,
            metrics: original.metrics,
        };
        self.hedges.push(copy);
        self.hedges.len() - 1
    }

    pub fn set_twins(&mut self, a: HEdgeId, b: HEdgeId) {
        self.hedges[a].twin = Some(b);
        self.hedges[b].twin = Some(a);
    }

    /// Moves the start of `id`; on error the half-edge is left untouched.
    pub fn set_start(&mut self, id: HEdgeId, start: VertexId) -> Result<()> {
        let metrics = self.compute_metrics(id, start, self.hedges[id].end)?;
        let hedge = &mut self.hedges[id];
        hedge.start = start;
        hedge.metrics = metrics;
        Ok(())
    }

    pub fn set_end(&mut self, id: HEdgeId, end: VertexId) -> Result<()> {
        let metrics = self.compute_metrics(id, self.hedges[id].start, end)?;
        let hedge = &mut self.hedges[id];
        hedge.end = end;
        hedge.metrics = metrics;
        Ok(())
    }

    fn compute_metrics(&self, id: HEdgeId, start: VertexId, end: VertexId) -> Result<HEdgeMetrics> {
        match HEdgeMetrics::compute(self.vertices[start].pos, self.vertices[end].pos) {
            Some(metrics) => Ok(metrics),
            None => bail!(ErrorKind::ZeroLengthHEdge {
                hedge: id,
                start,
                end,
            }),
        }
    }

    /// Records a wall leaving `vertex`. Walls leaving the same way share one
    /// tip, open on each side where either wall is.
    pub fn add_wall_tip(
        &mut self,
        vertex: VertexId,
        direction: Vec2d,
        left: Option<SectorId>,
        right: Option<SectorId>,
    ) {
        let angle = compute_angle(direction);
        let tips = &mut self.vertices[vertex].tips;
        if let Some(tip) = tips
            .iter_mut()
            .find(|tip| angle_difference(tip.angle, angle) < ANG_EPSILON)
        {
            tip.left = tip.left.or(left);
            tip.right = tip.right.or(right);
            return;
        }
        let position = tips
            .iter()
            .position(|tip| tip.angle > angle)
            .unwrap_or_else(|| tips.len());
        tips.insert(position, WallTip { angle, left, right });
    }

    /// Sector open when leaving `vertex` along `direction`, or `None` if the
    /// way is closed (void, or a wall runs exactly that way).
    pub fn open_sector_towards(&self, vertex: VertexId, direction: Vec2d) -> Option<SectorId> {
        let angle = compute_angle(direction);
        let tips = &self.vertices[vertex].tips;
        if tips
            .iter()
            .any(|tip| angle_difference(tip.angle, angle) < ANG_EPSILON)
        {
            return None;
        }
        match tips.iter().find(|tip| angle + ANG_EPSILON < tip.angle) {
            Some(tip) => tip.right,
            None => tips.last().and_then(|tip| tip.left),
        }
    }

    pub fn new_list(&mut self) -> ListId {
        self.lists.push(SideList::default());
        self.lists.len() - 1
    }

    pub fn list_len(&self, list: ListId) -> usize {
        self.lists[list].len
    }

    pub fn list_is_empty(&self, list: ListId) -> bool {
        self.lists[list].len == 0
    }

    pub fn iter_list(&self, list: ListId) -> ListIter {
        ListIter {
            mesh: self,
            current: self.lists[list].head,
        }
    }

    pub fn list_hedges(&self, list: ListId) -> Vec<HEdgeId> {
        self.iter_list(list).collect()
    }

    pub fn push_back(&mut self, list: ListId, id: HEdgeId) {
        debug_assert!(self.hedges[id].list.is_none(), "half-edge {} already listed", id);
        let tail = self.lists[list].tail;
        {
            let hedge = &mut self.hedges[id];
            hedge.list = Some(list);
            hedge.prev_on_side = tail;
            hedge.next_on_side = None;
        }
        match tail {
            Some(tail) => self.hedges[tail].next_on_side = Some(id),
            None => self.lists[list].head = Some(id),
        }
        self.lists[list].tail = Some(id);
        self.lists[list].len += 1;
    }

    /// Links `id` into whichever list `anchor` is on, right after it.
    pub fn insert_after(&mut self, anchor: HEdgeId, id: HEdgeId) {
        debug_assert!(self.hedges[id].list.is_none(), "half-edge {} already listed", id);
        let list = match self.hedges[anchor].list {
            Some(list) => list,
            None => return,
        };
        let next = self.hedges[anchor].next_on_side;
        {
            let hedge = &mut self.hedges[id];
            hedge.list = Some(list);
            hedge.prev_on_side = Some(anchor);
            hedge.next_on_side = next;
        }
        self.hedges[anchor].next_on_side = Some(id);
        match next {
            Some(next) => self.hedges[next].prev_on_side = Some(id),
            None => self.lists[list].tail = Some(id),
        }
        self.lists[list].len += 1;
    }

    pub fn unlink(&mut self, id: HEdgeId) {
        let list = match self.hedges[id].list.take() {
            Some(list) => list,
            None => return,
        };
        let (prev, next) = {
            let hedge = &mut self.hedges[id];
            (hedge.prev_on_side.take(), hedge.next_on_side.take())
        };
        match prev {
            Some(prev) => self.hedges[prev].next_on_side = next,
            None => self.lists[list].head = next,
        }
        match next {
            Some(next) => self.hedges[next].prev_on_side = prev,
            None => self.lists[list].tail = prev,
        }
        self.lists[list].len -= 1;
    }

    pub fn pop_front(&mut self, list: ListId) -> Option<HEdgeId> {
        let head = self.lists[list].head?;
        self.unlink(head);
        Some(head)
    }

    /// Makes `ring` a closed `next`/`prev` cycle.
    pub fn link_ring(&mut self, ring: &[HEdgeId]) {
        for (i_hedge, &id) in ring.iter().enumerate() {
            let next = ring[(i_hedge + 1) % ring.len()];
            self.hedges[id].next = Some(next);
            self.hedges[next].prev = Some(id);
        }
    }

    /// First half-edge whose twin does not point back at it, or whose twin
    /// does not run between the same two vertices in the opposite direction.
    #[cfg(test)]
    pub fn twin_symmetry_violation(&self) -> Option<HEdgeId> {
        self.hedges.iter().enumerate().find_map(|(id, hedge)| {
            let twin = &self.hedges[hedge.twin?];
            if twin.twin != Some(id) || twin.start != hedge.end || twin.end != hedge.start {
                Some(id)
            } else {
                None
            }
        })
    }
}

pub struct ListIter<'a> {
    mesh: &'a Mesh,
    current: Option<HEdgeId>,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = HEdgeId;

    fn next(&mut self) -> Option<HEdgeId> {
        let current = self.current?;
        self.current = self.mesh.hedges[current].next_on_side;
        Some(current)
    }
}

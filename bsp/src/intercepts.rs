use super::errors::Result;
use super::mesh::{HEdgeId, ListId, Mesh};
use super::partition::Partition;
use super::types::{SectorId, VertexId};
use super::util::{midpoint, DIST_EPSILON, SHORT_INTERCEPT_GAP};
use log::warn;
use math::prelude::*;
use math::Pnt2d;

/// A vertex lying on the current partition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intercept {
    pub vertex: VertexId,
    /// Distance along the partition, from the partition's start.
    pub distance: f64,
    pub self_ref: bool,
    /// Sector open just before the vertex along the partition, `None` if solid.
    pub before: Option<SectorId>,
    /// Sector open just after the vertex along the partition, `None` if solid.
    pub after: Option<SectorId>,
}

/// A stretch of the partition that is open on one end and closed on the
/// other, i.e. a hole in the sector's outline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UnclosedGap {
    pub sector: SectorId,
    pub near: Pnt2d,
}

#[derive(Clone, Debug, Default)]
pub struct MiniHedges {
    pub count: usize,
    pub gaps: Vec<UnclosedGap>,
}

/// Intercepts along one partition, sorted by distance, at most one per vertex.
#[derive(Clone, Debug, Default)]
pub struct InterceptList {
    intercepts: Vec<Intercept>,
}

impl InterceptList {
    pub fn new() -> InterceptList {
        InterceptList::default()
    }

    /// Collects every endpoint of `hedges` lying on `partition`, without
    /// touching the mesh. Coincident intercepts are left unmerged.
    pub fn find<I>(mesh: &Mesh, partition: &Partition, hedges: I) -> InterceptList
    where
        I: IntoIterator<Item = HEdgeId>,
    {
        let mut list = InterceptList::new();
        for id in hedges {
            let hedge = mesh.hedge(id);
            for &vertex in &[hedge.start, hedge.end] {
                if partition.perp_distance(mesh.vertex_pos(vertex)).abs() <= DIST_EPSILON {
                    list.insert(mesh, partition, vertex, hedge.self_ref);
                }
            }
        }
        list
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.intercepts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.intercepts.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Intercept> {
        self.intercepts.iter()
    }

    #[cfg(test)]
    pub fn by_vertex(&self, vertex: VertexId) -> Option<&Intercept> {
        self.intercepts
            .iter()
            .find(|intercept| intercept.vertex == vertex)
    }

    /// An intercepted vertex within `DIST_EPSILON` of `point`, if any.
    pub fn vertex_near(&self, mesh: &Mesh, point: Pnt2d) -> Option<VertexId> {
        self.intercepts
            .iter()
            .map(|intercept| intercept.vertex)
            .find(|&vertex| (mesh.vertex_pos(vertex) - point).magnitude() < DIST_EPSILON)
    }

    /// Adds `vertex`, or refreshes its open sectors if it is already present.
    /// A vertex stays self-referencing only while every edge that touched it
    /// was.
    pub fn insert(&mut self, mesh: &Mesh, partition: &Partition, vertex: VertexId, self_ref: bool) {
        let direction = partition.metrics().direction;
        let before = mesh.open_sector_towards(vertex, -direction);
        let after = mesh.open_sector_towards(vertex, direction);

        if let Some(existing) = self
            .intercepts
            .iter_mut()
            .find(|intercept| intercept.vertex == vertex)
        {
            existing.self_ref &= self_ref;
            existing.before = before;
            existing.after = after;
            return;
        }

        let distance = partition.para_distance(mesh.vertex_pos(vertex));
        let position = self
            .intercepts
            .iter()
            .position(|intercept| intercept.distance > distance)
            .unwrap_or_else(|| self.intercepts.len());
        self.intercepts.insert(
            position,
            Intercept {
                vertex,
                distance,
                self_ref,
                before,
                after,
            },
        );
    }

    /// Folds intercepts closer than `SHORT_INTERCEPT_GAP` into the first of
    /// them. Open sides win over closed ones, and a real intercept's sectors
    /// win over a self-referencing one's.
    pub fn merge_coincident(&mut self) {
        let mut i_cur = 0;
        while i_cur + 1 < self.intercepts.len() {
            let next = self.intercepts[i_cur + 1];
            let cur = &mut self.intercepts[i_cur];
            if next.distance - cur.distance > SHORT_INTERCEPT_GAP {
                i_cur += 1;
                continue;
            }

            if cur.self_ref && !next.self_ref {
                if cur.before.is_some() && next.before.is_some() {
                    cur.before = next.before;
                }
                if cur.after.is_some() && next.after.is_some() {
                    cur.after = next.after;
                }
                cur.self_ref = false;
            }
            if cur.before.is_none() {
                cur.before = next.before;
            }
            if cur.after.is_none() {
                cur.after = next.after;
            }
            self.intercepts.remove(i_cur + 1);
        }
    }

    /// Closes both sides of the partition: every stretch between consecutive
    /// intercepts that is open at both ends gets a twinned pair of mini
    /// half-edges, the one running along the partition going `right`.
    ///
    /// Stretches open at one end only are returned as unclosed gaps, unless
    /// a self-referencing line is involved.
    pub fn build_mini_hedges(
        &self,
        mesh: &mut Mesh,
        partition: &Partition,
        right: ListId,
        left: ListId,
    ) -> Result<MiniHedges> {
        let mut minis = MiniHedges::default();
        for pair in self.intercepts.windows(2) {
            let (cur, next) = (&pair[0], &pair[1]);
            let near = || midpoint(mesh.vertex_pos(cur.vertex), mesh.vertex_pos(next.vertex));
            let sector = match (cur.after, next.before) {
                (None, None) => continue,
                (Some(sector), None) | (None, Some(sector)) => {
                    if !cur.self_ref && !next.self_ref {
                        minis.gaps.push(UnclosedGap {
                            sector,
                            near: near(),
                        });
                    }
                    continue;
                }
                (Some(after), Some(before)) => {
                    if after != before && !cur.self_ref && !next.self_ref {
                        let near = near();
                        warn!(
                            "Sector mismatch along partition near ({:.1}, {:.1}): {} vs {}.",
                            near.x, near.y, after, before
                        );
                    }
                    after
                }
            };

            let along = mesh.new_hedge(cur.vertex, next.vertex, None, Some(sector))?;
            let against = mesh.new_hedge(next.vertex, cur.vertex, None, Some(sector))?;
            mesh.hedge_mut(along).source_line = partition.line;
            mesh.hedge_mut(against).source_line = partition.line;
            mesh.set_twins(along, against);
            mesh.push_back(right, along);
            mesh.push_back(left, against);
            minis.count += 1;
        }
        Ok(minis)
    }
}

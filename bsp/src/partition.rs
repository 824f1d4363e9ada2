use super::mesh::{HEdgeId, HEdgeMetrics, Mesh};
use super::types::LinedefId;
use super::util::DIST_EPSILON;
use math::prelude::*;
use math::{Line2d, Pnt2d};

/// A candidate splitting line, always lying along an existing half-edge.
#[derive(Copy, Clone, Debug)]
pub struct Partition {
    pub line: Option<LinedefId>,
    metrics: HEdgeMetrics,
}

/// Where a half-edge lies relative to a partition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Classification {
    Right,
    Left,
    /// On the partition, running the same way.
    CollinearSame,
    /// On the partition, running the opposite way.
    CollinearOpposite,
    /// Crosses the partition; `a` and `b` are the signed distances of the
    /// start and end points.
    Split { a: f64, b: f64 },
}

impl Partition {
    pub fn from_hedge(mesh: &Mesh, source: HEdgeId) -> Partition {
        let hedge = mesh.hedge(source);
        Partition {
            line: hedge.source_line,
            metrics: *hedge.metrics(),
        }
    }

    pub fn metrics(&self) -> &HEdgeMetrics {
        &self.metrics
    }

    pub fn line2(&self) -> Line2d {
        self.metrics.line()
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.metrics.is_axis_aligned()
    }

    /// Signed distance from the partition, positive on its right.
    pub fn perp_distance(&self, point: Pnt2d) -> f64 {
        self.metrics.perp_distance(point)
    }

    pub fn para_distance(&self, point: Pnt2d) -> f64 {
        self.metrics.para_distance(point)
    }

    /// Classifies `hedge`. Endpoints within `DIST_EPSILON` of the line count
    /// as touching it, so an edge touching the partition at one end lies on
    /// the side of its other end.
    pub fn classify(&self, mesh: &Mesh, hedge: HEdgeId) -> Classification {
        let (a, b) = self.distances(mesh, hedge);
        if a.abs() <= DIST_EPSILON && b.abs() <= DIST_EPSILON {
            if self.runs_along(mesh, hedge) {
                Classification::CollinearSame
            } else {
                Classification::CollinearOpposite
            }
        } else if a > -DIST_EPSILON && b > -DIST_EPSILON {
            Classification::Right
        } else if a < DIST_EPSILON && b < DIST_EPSILON {
            Classification::Left
        } else {
            Classification::Split { a, b }
        }
    }

    /// Signed distances of the start and end of `hedge` from the partition.
    /// Half-edges along the partition's own line are exactly on it.
    pub fn distances(&self, mesh: &Mesh, hedge: HEdgeId) -> (f64, f64) {
        let hedge = mesh.hedge(hedge);
        if self.line.is_some() && hedge.source_line == self.line {
            (0.0, 0.0)
        } else {
            (
                self.perp_distance(hedge.metrics().start),
                self.perp_distance(hedge.metrics().end),
            )
        }
    }

    /// Whether `hedge` points the same way as the partition.
    pub fn runs_along(&self, mesh: &Mesh, hedge: HEdgeId) -> bool {
        mesh.metrics(hedge).direction.dot(self.metrics.direction) > 0.0
    }

    /// Point at which a half-edge with end distances `a` and `b` crosses the
    /// partition, and its fraction along the half-edge.
    ///
    /// Axis-aligned partitions snap the crossing coordinate exactly onto the
    /// partition.
    pub fn crossing(&self, hedge: &HEdgeMetrics, a: f64, b: f64) -> (Pnt2d, f64) {
        let fraction = a / (a - b);
        let part = &self.metrics;
        let point = if part.direction.x == 0.0 {
            Pnt2d::new(
                part.start.x,
                if hedge.direction.y == 0.0 {
                    hedge.start.y
                } else {
                    hedge.start.y + hedge.direction.y * fraction
                },
            )
        } else if part.direction.y == 0.0 {
            Pnt2d::new(
                if hedge.direction.x == 0.0 {
                    hedge.start.x
                } else {
                    hedge.start.x + hedge.direction.x * fraction
                },
                part.start.y,
            )
        } else {
            hedge.start + hedge.direction * fraction
        };
        (point, fraction)
    }
}

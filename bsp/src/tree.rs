use super::types::{LineSide, SectorId, VertexId};
use math::{Bounds2d, Line2d, Pnt2d};

pub type NodeId = usize;
pub type LeafId = usize;
pub type SegmentId = usize;

/// Side of a partition: `Right` is where its signed distance is positive.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum Branch {
    Right,
    Left,
}

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum Child {
    Node(NodeId),
    Leaf(LeafId),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BspNode {
    pub partition: Line2d,
    pub right_bounds: Bounds2d,
    pub left_bounds: Bounds2d,
    pub right: Child,
    pub left: Child,
}

impl BspNode {
    pub fn child(&self, branch: Branch) -> Child {
        match branch {
            Branch::Right => self.right,
            Branch::Left => self.left,
        }
    }
}

/// A convex leaf: a ring of segments, stored contiguously, clockwise.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BspLeaf {
    pub sector: Option<SectorId>,
    pub first_segment: SegmentId,
    pub num_segments: usize,
    pub bounds: Bounds2d,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: VertexId,
    pub end: VertexId,
    /// `None` for segments along a partition with no wall behind them.
    pub line_side: Option<LineSide>,
    pub sector: Option<SectorId>,
    pub twin: Option<SegmentId>,
    pub leaf: LeafId,
    pub next: SegmentId,
    pub prev: SegmentId,
    pub angle: f64,
    pub length: f64,
    /// Distance from the start of the line side to the start of the segment.
    pub offset: f64,
}

impl Segment {
    pub fn is_mini(&self) -> bool {
        self.line_side.is_none()
    }
}

/// The finished tree, with every vertex (original ones first, in input
/// order) and every segment it references.
#[derive(Clone, Debug, PartialEq)]
pub struct BspTree {
    pub root: Child,
    pub nodes: Vec<BspNode>,
    pub leafs: Vec<BspLeaf>,
    pub segments: Vec<Segment>,
    pub vertices: Vec<Pnt2d>,
    pub num_original_vertices: usize,
}

impl BspTree {
    pub fn node(&self, id: NodeId) -> Option<&BspNode> {
        self.nodes.get(id)
    }

    pub fn leaf(&self, id: LeafId) -> Option<&BspLeaf> {
        self.leafs.get(id)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<Pnt2d> {
        self.vertices.get(id).cloned()
    }

    pub fn leaf_segments(&self, id: LeafId) -> &[Segment] {
        match self.leafs.get(id) {
            Some(leaf) => {
                &self.segments[leaf.first_segment..leaf.first_segment + leaf.num_segments]
            }
            None => &[],
        }
    }

    /// The leaf containing `point`. Points on a partition go right.
    pub fn leaf_at(&self, point: Pnt2d) -> LeafId {
        let mut child = self.root;
        loop {
            match child {
                Child::Leaf(leaf) => return leaf,
                Child::Node(node) => {
                    let node = &self.nodes[node];
                    child = node.child(if node.partition.signed_distance(point) >= 0.0 {
                        Branch::Right
                    } else {
                        Branch::Left
                    });
                }
            }
        }
    }

    /// Signed area of a leaf's polygon, positive when it winds clockwise.
    pub fn leaf_area(&self, id: LeafId) -> f64 {
        let segments = self.leaf_segments(id);
        let twice_area = segments
            .iter()
            .map(|segment| {
                let (start, end) = (self.vertices[segment.start], self.vertices[segment.end]);
                start.x * end.y - end.x * start.y
            })
            .sum::<f64>();
        -twice_area * 0.5
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((child, depth)) = stack.pop() {
            match child {
                Child::Leaf(_) => deepest = deepest.max(depth),
                Child::Node(node) => {
                    let node = &self.nodes[node];
                    stack.push((node.right, depth + 1));
                    stack.push((node.left, depth + 1));
                }
            }
        }
        deepest
    }
}

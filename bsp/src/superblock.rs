//! Bounding-box hierarchy over a half-edge set.
//!
//! A half-edge sits in the smallest block whose box holds both of its
//! endpoints. Blocks halve along their longer side until both sides are at
//! most the configured leaf size. The tree is built once per partitioner
//! level and thrown away afterwards; splits never update it.

use super::mesh::{HEdgeId, Mesh};
use super::partition::Partition;
use super::tree::Branch;
use super::util::SUPERBLOCK_PADDING;
use math::{Bounds2d, Pnt2d};

pub type BlockId = usize;

#[derive(Clone, Debug)]
pub struct SuperBlock {
    pub bounds: Bounds2d,
    pub hedges: Vec<HEdgeId>,
    pub children: [Option<BlockId>; 2],
    /// Line-owned and mini half-edges in this block and all its children.
    pub real_count: usize,
    pub mini_count: usize,
}

impl SuperBlock {
    fn new(bounds: Bounds2d) -> SuperBlock {
        SuperBlock {
            bounds,
            hedges: Vec::new(),
            children: [None, None],
            real_count: 0,
            mini_count: 0,
        }
    }

    pub fn total_count(&self) -> usize {
        self.real_count + self.mini_count
    }
}

#[derive(Clone, Debug)]
pub struct SuperBlockTree {
    blocks: Vec<SuperBlock>,
    leaf_size: f64,
}

impl SuperBlockTree {
    pub fn build<I>(mesh: &Mesh, hedges: I, leaf_size: f64) -> SuperBlockTree
    where
        I: IntoIterator<Item = HEdgeId> + Clone,
    {
        let bounds = Bounds2d::from_points(hedges.clone().into_iter().flat_map(|id| {
            let metrics = mesh.metrics(id);
            vec![metrics.start, metrics.end]
        }));
        let mut tree = SuperBlockTree {
            blocks: vec![SuperBlock::new(bounds)],
            leaf_size,
        };
        for id in hedges {
            tree.insert(mesh, id);
        }
        tree
    }

    pub fn root(&self) -> &SuperBlock {
        &self.blocks[0]
    }

    pub fn block(&self, id: BlockId) -> &SuperBlock {
        &self.blocks[id]
    }

    #[cfg(test)]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn insert(&mut self, mesh: &Mesh, id: HEdgeId) {
        let hedge = mesh.hedge(id);
        let (start, end) = (hedge.metrics().start, hedge.metrics().end);
        let mut block = 0;
        loop {
            if hedge.is_mini() {
                self.blocks[block].mini_count += 1;
            } else {
                self.blocks[block].real_count += 1;
            }

            let bounds = self.blocks[block].bounds;
            if bounds.width() <= self.leaf_size && bounds.height() <= self.leaf_size {
                break;
            }
            let halves = halve(&bounds);
            let i_child = match halves
                .iter()
                .position(|half| half.contains(start) && half.contains(end))
            {
                Some(i_child) => i_child,
                None => break,
            };
            block = match self.blocks[block].children[i_child] {
                Some(child) => child,
                None => {
                    self.blocks.push(SuperBlock::new(halves[i_child]));
                    let child = self.blocks.len() - 1;
                    self.blocks[block].children[i_child] = Some(child);
                    child
                }
            };
        }
        self.blocks[block].hedges.push(id);
    }

    /// Calls `visit` on every half-edge: a block's own first, then its
    /// children's, in child order.
    pub fn for_each<F: FnMut(HEdgeId)>(&self, visit: F) {
        let bounds = self.root().bounds;
        self.for_each_in(&bounds, visit)
    }

    /// Like `for_each`, but skips blocks whose box misses `bounds`.
    pub fn for_each_in<F: FnMut(HEdgeId)>(&self, bounds: &Bounds2d, mut visit: F) {
        let mut stack = vec![0];
        while let Some(block) = stack.pop() {
            let block = &self.blocks[block];
            if !block.bounds.intersects(bounds) {
                continue;
            }
            for &id in &block.hedges {
                visit(id);
            }
            stack.extend(block.children.iter().rev().filter_map(|&child| child));
        }
    }

    /// The side of `partition` the padded box of `block` lies entirely on, if
    /// any.
    pub fn side_of(&self, block: BlockId, partition: &Partition) -> Option<Branch> {
        let corners = self.blocks[block].bounds.expanded(SUPERBLOCK_PADDING).corners();
        let mut distances = corners.iter().map(|&corner| partition.perp_distance(corner));
        if distances.clone().all(|distance| distance > 0.0) {
            Some(Branch::Right)
        } else if distances.all(|distance| distance < 0.0) {
            Some(Branch::Left)
        } else {
            None
        }
    }
}

fn halve(bounds: &Bounds2d) -> [Bounds2d; 2] {
    let (min, max) = (bounds.min, bounds.max);
    if bounds.width() >= bounds.height() {
        let mid = (min.x + max.x) * 0.5;
        [
            Bounds2d::new(min, Pnt2d::new(mid, max.y)),
            Bounds2d::new(Pnt2d::new(mid, min.y), max),
        ]
    } else {
        let mid = (min.y + max.y) * 0.5;
        [
            Bounds2d::new(min, Pnt2d::new(max.x, mid)),
            Bounds2d::new(Pnt2d::new(min.x, mid), max),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::SuperBlockTree;
    use crate::mesh::Mesh;
    use crate::partition::Partition;
    use crate::tree::Branch;
    use crate::types::{LineSide, Side};
    use math::{Bounds2d, Pnt2d};

    fn scattered_mesh() -> (Mesh, Vec<usize>) {
        let mut mesh = Mesh::new();
        let segments = [
            ((0.0, 0.0), (0.0, 1024.0)),
            ((10.0, 10.0), (20.0, 10.0)),
            ((1000.0, 10.0), (1010.0, 20.0)),
            ((500.0, 500.0), (520.0, 540.0)),
            ((400.0, 600.0), (600.0, 600.0)),
        ];
        let mut hedges = Vec::new();
        for (i_line, &((x1, y1), (x2, y2))) in segments.iter().enumerate() {
            let start = mesh.add_vertex(Pnt2d::new(x1, y1));
            let end = mesh.add_vertex(Pnt2d::new(x2, y2));
            let line_side = if i_line == 4 {
                None
            } else {
                Some(LineSide {
                    line: i_line,
                    side: Side::Front,
                })
            };
            hedges.push(mesh.new_hedge(start, end, line_side, Some(0)).unwrap());
        }
        (mesh, hedges)
    }

    #[test]
    fn buckets_hedges_and_counts_them() {
        let (mesh, hedges) = scattered_mesh();
        let tree = SuperBlockTree::build(&mesh, hedges.iter().cloned(), 256.0);
        let root = tree.root();
        assert_eq!(root.real_count, 4);
        assert_eq!(root.mini_count, 1);
        assert_eq!(root.total_count(), 5);
        // Both straddle the first halving line at y = 512.
        assert_eq!(root.hedges, vec![hedges[0], hedges[3]]);
        assert!(tree.num_blocks() > 1);

        let mut visited = Vec::new();
        tree.for_each(|id| visited.push(id));
        visited.sort();
        assert_eq!(visited, hedges);

        let mut near_origin = Vec::new();
        tree.for_each_in(
            &Bounds2d::new(Pnt2d::new(0.0, 0.0), Pnt2d::new(64.0, 64.0)),
            |id| near_origin.push(id),
        );
        assert!(near_origin.contains(&hedges[0]));
        assert!(near_origin.contains(&hedges[1]));
        assert!(!near_origin.contains(&hedges[2]));
    }

    #[test]
    fn whole_blocks_fall_on_one_side() {
        let (mut mesh, hedges) = scattered_mesh();
        let tree = SuperBlockTree::build(&mesh, hedges.iter().cloned(), 256.0);
        let a = mesh.add_vertex(Pnt2d::new(-100.0, -10.0));
        let b = mesh.add_vertex(Pnt2d::new(-100.0, 10.0));
        let up = mesh.new_hedge(a, b, None, None).unwrap();
        let down = mesh.new_hedge(b, a, None, None).unwrap();
        assert_eq!(
            tree.side_of(0, &Partition::from_hedge(&mesh, up)),
            Some(Branch::Right)
        );
        assert_eq!(
            tree.side_of(0, &Partition::from_hedge(&mesh, down)),
            Some(Branch::Left)
        );

        let c = mesh.add_vertex(Pnt2d::new(512.0, 0.0));
        let d = mesh.add_vertex(Pnt2d::new(512.0, 10.0));
        let middle = mesh.new_hedge(c, d, None, None).unwrap();
        assert_eq!(tree.side_of(0, &Partition::from_hedge(&mesh, middle)), None);
    }
}

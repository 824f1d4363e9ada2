//! The recursive node builder.
//!
//! A half-edge set becomes a leaf once it is convex and covers a single
//! sector; otherwise it is divided along the cheapest partition and both
//! halves are built in turn, right first. Leaf rings are only put together
//! once the whole tree is built, since dividing a later set can still split
//! the twin of an edge in an earlier leaf.

use super::analysis::MapAnalysis;
use super::config::BuildConfig;
use super::errors::{ErrorKind, Result};
use super::map::Map;
use super::mesh::{HEdgeId, ListId, Mesh};
use super::partition::{Classification, Partition};
use super::report::Reporter;
use super::selector::PartitionSelector;
use super::splitter::divide;
use super::superblock::SuperBlockTree;
use super::tree::{BspLeaf, BspNode, BspTree, Child, Segment};
use super::types::{LineSide, SectorId, Side, VertexId};
use super::util::{midpoint, point_key, polygon_center, LEAF_CLOSE_EPSILON};
use failchain::{bail, ensure};
use indexmap::{IndexMap, IndexSet};
use log::{debug, info, warn};
use math::prelude::*;
use math::{compute_angle, Bounds2d, Pnt2d};
use std::cmp::Ordering;

/// Counters gathered over one build.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub splits: usize,
    pub mini_hedges: usize,
    pub forced_leafs: usize,
    pub reused_vertices: usize,
    pub max_depth: usize,
}

/// A node builder bound to one input map.
pub struct Partitioner<'a> {
    map: &'a Map,
    config: BuildConfig,
}

impl<'a> Partitioner<'a> {
    pub fn new(map: &'a Map, config: BuildConfig) -> Partitioner<'a> {
        Partitioner { map, config }
    }

    pub fn map(&self) -> &'a Map {
        self.map
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn set_split_cost_factor(&mut self, split_cost_factor: i32) {
        self.config.split_cost_factor = split_cost_factor;
    }

    /// Builds a complete tree. Anomalies go to `reporter`; any error discards
    /// everything built so far.
    pub fn build(&self, reporter: &mut dyn Reporter) -> Result<(BspTree, BuildStats)> {
        ensure!(!self.map.linedefs.is_empty(), ErrorKind::EmptyMap);
        self.map.validate()?;
        info!(
            "Building BSP for {} linedefs, split cost factor {}.",
            self.map.linedefs.len(),
            self.config.split_cost_factor
        );

        let analysis = MapAnalysis::analyze(self.map, reporter);
        let mut context = BuildContext {
            config: &self.config,
            mesh: Mesh::new(),
            selector: PartitionSelector::new(self.map.linedefs.len()),
            nodes: Vec::new(),
            leaf_lists: Vec::new(),
            reporter,
            reported_unclosed: IndexSet::new(),
            stats: BuildStats::default(),
        };
        let list = context.seed(self.map, &analysis)?;
        ensure!(!context.mesh.list_is_empty(list), ErrorKind::EmptyMap);

        let root = context.build_node(list, 0)?;
        let tree = context.finish(self.map, root)?;
        let stats = context.stats;
        info!(
            "Built BSP: {} nodes, {} leafs, {} segments, {} vertices ({} new), depth {}.",
            tree.nodes.len(),
            tree.leafs.len(),
            tree.segments.len(),
            tree.vertices.len(),
            tree.vertices.len() - tree.num_original_vertices,
            stats.max_depth
        );
        info!(
            "Build stats: {} splits, {} mini half-edges, {} forced leafs, {} reused vertices.",
            stats.splits, stats.mini_hedges, stats.forced_leafs, stats.reused_vertices
        );
        Ok((tree, stats))
    }
}

struct BuildContext<'c, 'r> {
    config: &'c BuildConfig,
    mesh: Mesh,
    selector: PartitionSelector,
    nodes: Vec<BspNode>,
    leaf_lists: Vec<ListId>,
    reporter: &'r mut dyn Reporter,
    reported_unclosed: IndexSet<SectorId>,
    stats: BuildStats,
}

impl<'c, 'r> BuildContext<'c, 'r> {
    /// Creates a vertex per map vertex (same indices), wall tips, and the
    /// initial half-edges of every usable line, front before back. Lines
    /// use the first of any map vertices sharing a position, and the fronts
    /// of back-to-back lines are twinned.
    fn seed(&mut self, map: &Map, analysis: &MapAnalysis) -> Result<ListId> {
        let mut first_at = IndexMap::new();
        let mut canonical = Vec::with_capacity(map.vertices.len());
        for vertex in &map.vertices {
            let pos = Pnt2d::new(vertex.x, vertex.y);
            let id = self.mesh.add_vertex(pos);
            canonical.push(*first_at.entry(point_key(pos)).or_insert(id));
        }
        let shared = canonical
            .iter()
            .enumerate()
            .filter(|&(id, &first)| id != first)
            .count();
        if shared > 0 {
            debug!("{} map vertices share a position with an earlier one.", shared);
        }

        let list = self.mesh.new_list();
        let mut front_hedges = vec![None; map.linedefs.len()];
        for (i_linedef, linedef) in map.linedefs.iter().enumerate() {
            let line = match analysis.line(i_linedef) {
                Some(line) if line.is_used() => line,
                _ => continue,
            };
            let (start, end) = (
                canonical[linedef.start_vertex],
                canonical[linedef.end_vertex],
            );
            let front = linedef.front_sector;
            let back = line.back_sector(linedef);

            let direction = self.mesh.vertex_pos(end) - self.mesh.vertex_pos(start);
            self.mesh.add_wall_tip(start, direction, back, front);
            self.mesh.add_wall_tip(end, -direction, front, back);

            let front_hedge = match front {
                Some(sector) => {
                    let side = LineSide {
                        line: i_linedef,
                        side: Side::Front,
                    };
                    Some(self.seed_hedge(list, (start, end), side, sector, line.self_ref)?)
                }
                None => None,
            };
            let back_hedge = match back {
                Some(sector) => {
                    let side = LineSide {
                        line: i_linedef,
                        side: Side::Back,
                    };
                    Some(self.seed_hedge(list, (end, start), side, sector, line.self_ref)?)
                }
                None => None,
            };
            if let (Some(front_hedge), Some(back_hedge)) = (front_hedge, back_hedge) {
                self.mesh.set_twins(front_hedge, back_hedge);
            }

            front_hedges[i_linedef] = front_hedge;
            let partner = line.back_to_back.and_then(|partner| front_hedges[partner]);
            if let (Some(front_hedge), Some(partner)) = (front_hedge, partner) {
                self.mesh.set_twins(front_hedge, partner);
            }
        }
        debug!(
            "Seeded {} half-edges over {} vertices.",
            self.mesh.list_len(list),
            self.mesh.num_vertices()
        );
        Ok(list)
    }

    fn seed_hedge(
        &mut self,
        list: ListId,
        (start, end): (VertexId, VertexId),
        line_side: LineSide,
        sector: SectorId,
        self_ref: bool,
    ) -> Result<HEdgeId> {
        let id = self
            .mesh
            .new_hedge(start, end, Some(line_side), Some(sector))?;
        self.mesh.hedge_mut(id).self_ref = self_ref;
        self.mesh.push_back(list, id);
        Ok(id)
    }

    fn build_node(&mut self, list: ListId, depth: usize) -> Result<Child> {
        if depth > self.config.max_recursion_depth {
            bail!(ErrorKind::recursion_too_deep(
                self.config.max_recursion_depth,
                self.list_center(list)
            ));
        }
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if self.is_leaf_ready(list) {
            return Ok(self.make_leaf(list));
        }

        let hedges = self.mesh.list_hedges(list);
        let blocks = SuperBlockTree::build(
            &self.mesh,
            hedges.iter().cloned(),
            self.config.superblock_leaf_size,
        );
        let choice = match self.selector.pick(&self.mesh, &blocks, self.config) {
            Some(choice) => choice,
            None => {
                let sectors = self.list_sectors(list);
                let near = self.list_center(list);
                ensure!(
                    !sectors.is_empty(),
                    ErrorKind::no_partition(hedges.len(), sectors, near)
                );
                warn!(
                    "Forcing a leaf of {} half-edges near ({:.1}, {:.1}), sectors {:?}: \
                     no partition divides them.",
                    hedges.len(),
                    near.x,
                    near.y,
                    sectors
                );
                self.stats.forced_leafs += 1;
                return Ok(self.make_leaf(list));
            }
        };
        let partition = choice.partition;
        debug!(
            "Depth {}: partition along line {:?} from ({:.1}, {:.1}), cost {}, {} splits.",
            depth,
            partition.line,
            partition.metrics().start.x,
            partition.metrics().start.y,
            choice.cost.cost,
            choice.cost.splits
        );

        let division = divide(&mut self.mesh, list, &partition)?;
        self.stats.splits += division.splits;
        self.stats.reused_vertices += division.reused_vertices;
        let minis = division
            .intercepts
            .build_mini_hedges(&mut self.mesh, &partition, division.right, division.left)?;
        self.stats.mini_hedges += minis.count;
        for gap in minis.gaps {
            self.report_unclosed(gap.sector, gap.near);
        }

        let right_bounds = self.list_bounds(division.right);
        let left_bounds = self.list_bounds(division.left);
        let right = self.build_node(division.right, depth + 1)?;
        let left = self.build_node(division.left, depth + 1)?;
        self.nodes.push(BspNode {
            partition: partition.line2(),
            right_bounds,
            left_bounds,
            right,
            left,
        });
        Ok(Child::Node(self.nodes.len() - 1))
    }

    /// A set is a leaf when all its half-edges share one sector and none of
    /// them lies behind, or crosses, another one's line.
    fn is_leaf_ready(&self, list: ListId) -> bool {
        let hedges = self.mesh.list_hedges(list);
        let mut sectors = hedges.iter().map(|&id| self.mesh.hedge(id).sector);
        if let Some(first) = sectors.next() {
            if sectors.any(|sector| sector != first) {
                return false;
            }
        }
        hedges.iter().all(|&id| {
            let partition = Partition::from_hedge(&self.mesh, id);
            hedges.iter().all(|&other| match partition.classify(&self.mesh, other) {
                Classification::Right | Classification::CollinearSame => true,
                _ => false,
            })
        })
    }

    fn make_leaf(&mut self, list: ListId) -> Child {
        self.leaf_lists.push(list);
        Child::Leaf(self.leaf_lists.len() - 1)
    }

    fn report_unclosed(&mut self, sector: SectorId, near: Pnt2d) {
        if self.reported_unclosed.insert(sector) {
            self.reporter.unclosed_sector_found(sector, near);
        }
    }

    fn list_sectors(&self, list: ListId) -> Vec<SectorId> {
        self.mesh
            .iter_list(list)
            .filter(|&id| !self.mesh.hedge(id).is_mini())
            .filter_map(|id| self.mesh.hedge(id).sector)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    fn list_center(&self, list: ListId) -> Pnt2d {
        polygon_center(self.mesh.iter_list(list).map(|id| self.mesh.metrics(id).start))
    }

    fn list_bounds(&self, list: ListId) -> Bounds2d {
        Bounds2d::from_points(self.mesh.iter_list(list).flat_map(|id| {
            let metrics = self.mesh.metrics(id);
            vec![metrics.start, metrics.end]
        }))
    }

    /// Orders each leaf's half-edges into a clockwise ring starting at a
    /// line-owned edge, checks it closes, and flattens everything into a tree.
    fn finish(&mut self, map: &Map, root: Child) -> Result<BspTree> {
        let mut rings = Vec::with_capacity(self.leaf_lists.len());
        let mut segment_of = vec![None; self.mesh.num_hedges()];
        let mut num_segments = 0;
        for i_leaf in 0..self.leaf_lists.len() {
            let ring = self.leaf_ring(self.leaf_lists[i_leaf]);
            self.mesh.link_ring(&ring);
            for &id in &ring {
                segment_of[id] = Some(num_segments);
                num_segments += 1;
            }
            rings.push(ring);
        }

        let mut leafs = Vec::with_capacity(rings.len());
        let mut segments = Vec::with_capacity(num_segments);
        for (i_leaf, ring) in rings.iter().enumerate() {
            let sector = self.leaf_sector(ring);
            self.check_closed(ring, sector);
            let first_segment = segments.len();
            for (i_hedge, &id) in ring.iter().enumerate() {
                let hedge = self.mesh.hedge(id);
                let metrics = hedge.metrics();
                let offset = match hedge.line_side {
                    Some(line_side) => {
                        let linedef = &map.linedefs[line_side.line];
                        let from = match line_side.side {
                            Side::Front => linedef.start_vertex,
                            Side::Back => linedef.end_vertex,
                        };
                        (metrics.start - self.mesh.vertex_pos(from)).magnitude()
                    }
                    None => 0.0,
                };
                segments.push(Segment {
                    start: hedge.start,
                    end: hedge.end,
                    line_side: hedge.line_side,
                    sector: hedge.sector,
                    twin: hedge.twin.and_then(|twin| segment_of[twin]),
                    leaf: i_leaf,
                    next: first_segment + (i_hedge + 1) % ring.len(),
                    prev: first_segment + (i_hedge + ring.len() - 1) % ring.len(),
                    angle: metrics.angle,
                    length: metrics.length,
                    offset,
                });
            }
            leafs.push(BspLeaf {
                sector,
                first_segment,
                num_segments: ring.len(),
                bounds: Bounds2d::from_points(ring.iter().map(|&id| self.mesh.metrics(id).start)),
            });
            debug!(
                "Leaf {}: sector {:?}, {} segments.",
                i_leaf,
                sector,
                ring.len()
            );
        }

        Ok(BspTree {
            root,
            nodes: self.nodes.clone(),
            leafs,
            segments,
            vertices: self.mesh.vertices().map(|vertex| vertex.pos).collect(),
            num_original_vertices: map.vertices.len(),
        })
    }

    fn leaf_ring(&self, list: ListId) -> Vec<HEdgeId> {
        let mut ring = self.mesh.list_hedges(list);
        let center = polygon_center(ring.iter().map(|&id| self.mesh.metrics(id).start));
        let angle_of = |id: HEdgeId| compute_angle(self.mesh.metrics(id).start - center);
        ring.sort_by(|&a, &b| {
            angle_of(b)
                .partial_cmp(&angle_of(a))
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        if let Some(first_real) = ring.iter().position(|&id| !self.mesh.hedge(id).is_mini()) {
            ring.rotate_left(first_real);
        }
        ring
    }

    /// The sector most line-owned edges of the ring face, first seen on ties.
    fn leaf_sector(&self, ring: &[HEdgeId]) -> Option<SectorId> {
        let mut counts = IndexMap::new();
        let real = ring
            .iter()
            .filter(|&&id| !self.mesh.hedge(id).is_mini())
            .collect::<Vec<_>>();
        let candidates = if real.is_empty() { ring.iter().collect() } else { real };
        for &id in candidates {
            if let Some(sector) = self.mesh.hedge(id).sector {
                *counts.entry(sector).or_insert(0usize) += 1;
            }
        }
        let mut best: Option<(SectorId, usize)> = None;
        for (&sector, &count) in &counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((sector, count));
            }
        }
        best.map(|(sector, _)| sector)
    }

    fn check_closed(&mut self, ring: &[HEdgeId], sector: Option<SectorId>) {
        for (i_hedge, &id) in ring.iter().enumerate() {
            let next = ring[(i_hedge + 1) % ring.len()];
            let end = self.mesh.metrics(id).end;
            let next_start = self.mesh.metrics(next).start;
            if (next_start - end).magnitude() > LEAF_CLOSE_EPSILON {
                if let Some(sector) = sector.or(self.mesh.hedge(id).sector) {
                    self.report_unclosed(sector, midpoint(end, next_start));
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::Partitioner;
    use crate::config::BuildConfig;
    use crate::errors::ErrorKind;
    use crate::map::Map;
    use crate::report::{NullReporter, ReportLog};
    use crate::test_maps;
    use crate::tree::{BspTree, Child};
    use math::Pnt2d;

    fn build(map: &Map) -> BspTree {
        Partitioner::new(map, BuildConfig::default())
            .build(&mut NullReporter)
            .expect("test: build failed")
            .0
    }

    fn assert_leafs_closed(tree: &BspTree) {
        for (i_leaf, leaf) in tree.leafs.iter().enumerate() {
            assert!(leaf.num_segments >= 3, "leaf {} too small", i_leaf);
            let mut segment = leaf.first_segment;
            for _ in 0..leaf.num_segments {
                let next = tree.segments[segment].next;
                assert_eq!(tree.segments[next].prev, segment);
                assert_eq!(tree.segments[next].leaf, i_leaf);
                segment = next;
            }
            assert_eq!(segment, leaf.first_segment);
            assert!(
                tree.leaf_area(i_leaf) > 0.0,
                "leaf {} has area {}",
                i_leaf,
                tree.leaf_area(i_leaf)
            );
        }
    }

    fn assert_binary(tree: &BspTree) {
        let mut seen_leafs = vec![false; tree.leafs.len()];
        let mut seen_nodes = vec![false; tree.nodes.len()];
        let mut stack = vec![tree.root];
        while let Some(child) = stack.pop() {
            match child {
                Child::Leaf(leaf) => {
                    assert!(!seen_leafs[leaf]);
                    seen_leafs[leaf] = true;
                }
                Child::Node(node) => {
                    assert!(!seen_nodes[node]);
                    seen_nodes[node] = true;
                    stack.push(tree.nodes[node].right);
                    stack.push(tree.nodes[node].left);
                }
            }
        }
        assert!(seen_leafs.iter().all(|&seen| seen));
        assert!(seen_nodes.iter().all(|&seen| seen));
        assert_eq!(tree.leafs.len(), tree.nodes.len() + 1);
    }

    #[test]
    fn single_room_is_one_leaf() {
        let tree = build(&test_maps::room());
        assert_eq!(tree.root, Child::Leaf(0));
        assert_eq!(tree.nodes.len(), 0);
        assert_eq!(tree.leafs.len(), 1);
        assert_eq!(tree.segments.len(), 4);
        assert_eq!(tree.vertices.len(), 4);
        assert_eq!(tree.leafs[0].sector, Some(0));
        assert_eq!(tree.leaf_area(0), 64.0 * 64.0);
        assert!(tree.segments[0].line_side.is_some());
        assert_leafs_closed(&tree);
    }

    #[test]
    fn two_rooms_share_a_wall() {
        let map = test_maps::two_rooms();
        let tree = build(&map);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.leafs.len(), 2);
        assert_eq!(tree.root, Child::Node(0));
        let sectors = tree.leafs.iter().map(|leaf| leaf.sector).collect::<Vec<_>>();
        assert_eq!(sectors, vec![Some(0), Some(1)]);

        let shared = tree
            .segments
            .iter()
            .enumerate()
            .filter(|(_, segment)| {
                segment.line_side.map(|side| side.line) == Some(test_maps::SHARED_LINE)
            })
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        assert_eq!(shared.len(), 2);
        assert_eq!(tree.segments[shared[0]].twin, Some(shared[1]));
        assert_eq!(tree.segments[shared[1]].twin, Some(shared[0]));
        assert_ne!(tree.segments[shared[0]].leaf, tree.segments[shared[1]].leaf);
        assert_binary(&tree);
        assert_leafs_closed(&tree);
        assert_eq!(tree.leaf_at(math::Pnt2d::new(32.0, 32.0)), 0);
        assert_eq!(tree.leaf_at(math::Pnt2d::new(96.0, 32.0)), 1);
    }

    #[test]
    fn self_referencing_line_builds_cleanly() {
        let map = test_maps::self_referencing();
        let mut log = ReportLog::new();
        let (tree, stats) = Partitioner::new(&map, BuildConfig::default())
            .build(&mut log)
            .expect("test: self-referencing map failed");
        assert!(log.is_empty());
        assert_eq!(stats.splits, 2);
        assert_eq!(stats.forced_leafs, 0);
        assert_eq!(tree.leafs.len(), 2);
        assert!(tree.leafs.iter().all(|leaf| leaf.sector == Some(0)));
        assert_binary(&tree);
        assert_leafs_closed(&tree);
    }

    #[test]
    fn unclosed_room_is_reported_once() {
        let map = test_maps::unclosed_room();
        let mut log = ReportLog::new();
        let (tree, _) = Partitioner::new(&map, BuildConfig::default())
            .build(&mut log)
            .expect("test: unclosed map failed");
        assert_eq!(log.unclosed_sectors.len(), 1);
        assert_eq!(log.unclosed_sectors[0].sector, 0);
        assert!(log.one_way_windows.is_empty());
        assert_eq!(tree.leafs.len(), 1);
    }

    #[test]
    fn window_line_gets_a_back_side() {
        let map = test_maps::one_way_window();
        let mut log = ReportLog::new();
        let (tree, _) = Partitioner::new(&map, BuildConfig::default())
            .build(&mut log)
            .expect("test: window map failed");
        assert_eq!(log.one_way_windows.len(), 1);
        assert!(log.unclosed_sectors.is_empty());
        assert_eq!(tree.leafs.len(), 2);
        let window_segments = tree
            .segments
            .iter()
            .filter(|segment| {
                segment.line_side.map(|side| side.line) == Some(test_maps::WINDOW_LINE)
            })
            .collect::<Vec<_>>();
        assert_eq!(window_segments.len(), 2);
        assert!(window_segments
            .iter()
            .any(|segment| segment.sector == Some(test_maps::WINDOW_SECTOR)));
        assert_leafs_closed(&tree);
    }

    #[test]
    fn larger_maps_stay_binary_and_closed() {
        for map in &[
            test_maps::room_grid(3, 2),
            test_maps::pillar_room(),
            test_maps::diagonal_room(),
        ] {
            let (tree, stats) = Partitioner::new(map, BuildConfig::default())
                .build(&mut NullReporter)
                .expect("test: larger map failed");
            assert_binary(&tree);
            assert_leafs_closed(&tree);
            assert_eq!(stats.forced_leafs, 0);
            assert!(tree.vertices.len() >= map.vertices.len());
            for (i_vertex, vertex) in map.vertices.iter().enumerate() {
                assert_eq!(tree.vertices[i_vertex].x, vertex.x);
                assert_eq!(tree.vertices[i_vertex].y, vertex.y);
            }
            for (i_segment, segment) in tree.segments.iter().enumerate() {
                if let Some(twin) = segment.twin {
                    assert_eq!(tree.segments[twin].twin, Some(i_segment));
                    assert_eq!(tree.segments[twin].start, segment.end);
                    assert_eq!(tree.segments[twin].end, segment.start);
                }
            }
        }
    }

    fn build_cleanly(map: &Map) -> BspTree {
        let mut log = ReportLog::new();
        let (tree, stats) = Partitioner::new(map, BuildConfig::default())
            .build(&mut log)
            .expect("test: build failed");
        assert!(log.is_empty(), "unexpected reports {:?}", log);
        assert_eq!(stats.forced_leafs, 0);
        assert_binary(&tree);
        assert_leafs_closed(&tree);
        tree
    }

    #[test]
    fn undividable_mixed_sectors_become_a_forced_leaf() {
        let map = test_maps::mismatched_divider();
        let mut log = ReportLog::new();
        let (tree, stats) = Partitioner::new(&map, BuildConfig::default())
            .build(&mut log)
            .expect("test: mismatched divider failed");
        assert!(log.is_empty());
        assert_eq!(stats.forced_leafs, 1);
        assert_eq!(tree.leafs.len(), 2);
        assert!(tree.leafs.iter().all(|leaf| leaf.sector == Some(0)));
        assert_binary(&tree);
        assert_leafs_closed(&tree);

        let behind_divider = tree
            .segments
            .iter()
            .find(|segment| {
                segment.line_side.map(|side| side.line) == Some(test_maps::DIVIDER_LINE)
                    && segment.sector == Some(1)
            })
            .expect("test: no segment behind the divider");
        assert_eq!(tree.leafs[behind_divider.leaf].sector, Some(0));
    }

    #[test]
    fn line_ending_on_a_wall_reuses_its_vertices() {
        let map = test_maps::touching_self_reference();
        let tree = build_cleanly(&map);
        assert_eq!(tree.leafs.len(), 2);
        assert_eq!(tree.vertices.len(), map.vertices.len());
        assert!(tree.leafs.iter().all(|leaf| leaf.sector == Some(0)));
    }

    #[test]
    fn coincident_map_vertices_are_shared() {
        let map = test_maps::duplicate_vertex_rooms();
        let tree = build_cleanly(&map);
        assert_eq!(tree.leafs.len(), 2);
        assert_eq!(tree.vertices.len(), map.vertices.len());
        // Vertices 6 and 7 repeat vertices 2 and 3.
        assert!(tree
            .segments
            .iter()
            .all(|segment| segment.start < 6 && segment.end < 6));
        let sectors = tree.leafs.iter().map(|leaf| leaf.sector).collect::<Vec<_>>();
        assert_eq!(sectors, vec![Some(0), Some(1)]);
    }

    #[test]
    fn back_to_back_walls_are_twinned() {
        let map = test_maps::back_to_back_rooms();
        let tree = build_cleanly(&map);
        assert_eq!(tree.leafs.len(), 2);
        let on_line = |line| {
            tree.segments
                .iter()
                .position(|segment| segment.line_side.map(|side| side.line) == Some(line))
                .expect("test: wall missing from the tree")
        };
        let (west, east) = (
            on_line(test_maps::WEST_FACE_LINE),
            on_line(test_maps::EAST_FACE_LINE),
        );
        assert_eq!(tree.segments[west].twin, Some(east));
        assert_eq!(tree.segments[east].twin, Some(west));
        assert_eq!(tree.segments[west].sector, Some(0));
        assert_eq!(tree.segments[east].sector, Some(1));
    }

    #[test]
    fn equal_cost_partitions_go_to_the_lowest_line() {
        // The walls at x = 64 and x = 128 leave the same imbalance.
        let tree = build(&test_maps::room_grid(3, 1));
        let root = match tree.root {
            Child::Node(node) => &tree.nodes[node],
            Child::Leaf(_) => panic!("test: three rooms built as one leaf"),
        };
        assert!(root.partition.signed_distance(Pnt2d::new(64.0, 32.0)).abs() < 1e-9);
        assert!(root.partition.signed_distance(Pnt2d::new(128.0, 32.0)).abs() > 1.0);
    }

    #[test]
    fn building_twice_gives_the_same_tree() {
        let map = test_maps::room_grid(3, 3);
        assert_eq!(build(&map), build(&map));
    }

    #[test]
    fn fatal_errors() {
        let error = Partitioner::new(&Map::default(), BuildConfig::default())
            .build(&mut NullReporter)
            .err()
            .expect("test: empty map built");
        assert_eq!(*error.kind(), ErrorKind::EmptyMap);

        let map = test_maps::room_grid(4, 4);
        let mut config = BuildConfig::default();
        config.max_recursion_depth = 1;
        let error = Partitioner::new(&map, config)
            .build(&mut NullReporter)
            .err()
            .expect("test: deep map built with depth limit 1");
        match error.kind() {
            ErrorKind::RecursionTooDeep { max_depth: 1, .. } => {}
            kind => panic!("unexpected error {:?}", kind),
        }
    }
}

//! Partition choice.
//!
//! Every line-owned half-edge of the current set is a candidate, each line
//! at most once per pick. A candidate's cost grows with the edges it splits,
//! with edges it passes or cuts uncomfortably close to their ends, and with
//! the imbalance between its two sides. Candidates leaving either side with
//! no line-owned edges are rejected.

use super::config::BuildConfig;
use super::mesh::{HEdgeId, Mesh};
use super::partition::Partition;
use super::superblock::{BlockId, SuperBlockTree};
use super::tree::Branch;
use super::util::{DIST_EPSILON, IFFY_LEN};
use std::cmp::Ordering;

const SPLIT_COST: f64 = 100.0;
const IFFY_SPLIT_COST: f64 = 70.0;
const NEAR_MISS_COST: f64 = 100.0;
const REAL_BALANCE_COST: f64 = 100.0;
const MINI_BALANCE_COST: f64 = 50.0;
const DIAGONAL_COST: f64 = 25.0;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PartitionCost {
    pub cost: f64,
    pub splits: usize,
    pub iffy: usize,
    pub near_miss: usize,
    pub real_left: usize,
    pub real_right: usize,
    pub mini_left: usize,
    pub mini_right: usize,
}

impl PartitionCost {
    fn count(&mut self, branch: Branch, is_mini: bool, num: usize) {
        match (branch, is_mini) {
            (Branch::Right, false) => self.real_right += num,
            (Branch::Right, true) => self.mini_right += num,
            (Branch::Left, false) => self.real_left += num,
            (Branch::Left, true) => self.mini_left += num,
        }
    }

    fn add_hedge(&mut self, mesh: &Mesh, partition: &Partition, hedge: HEdgeId, factor: f64) {
        let is_mini = mesh.hedge(hedge).is_mini();
        let (a, b) = partition.distances(mesh, hedge);
        let (fa, fb) = (a.abs(), b.abs());

        if fa <= DIST_EPSILON && fb <= DIST_EPSILON {
            let branch = if partition.runs_along(mesh, hedge) {
                Branch::Right
            } else {
                Branch::Left
            };
            self.count(branch, is_mini, 1);
        } else if a > -DIST_EPSILON && b > -DIST_EPSILON {
            self.count(Branch::Right, is_mini, 1);
            self.add_near_miss(a, b, factor);
        } else if a < DIST_EPSILON && b < DIST_EPSILON {
            self.count(Branch::Left, is_mini, 1);
            self.add_near_miss(-a, -b, factor);
        } else {
            self.splits += 1;
            self.cost += SPLIT_COST * factor;
            if fa < IFFY_LEN || fb < IFFY_LEN {
                self.iffy += 1;
                let quantity = IFFY_LEN / fa.min(fb);
                self.cost += IFFY_SPLIT_COST * factor * (quantity * quantity - 1.0);
            }
            self.count(Branch::Left, is_mini, 1);
            self.count(Branch::Right, is_mini, 1);
        }
    }

    // `a` and `b` are distances on the edge's side, so at least -DIST_EPSILON.
    fn add_near_miss(&mut self, a: f64, b: f64, factor: f64) {
        if (a >= IFFY_LEN && b >= IFFY_LEN)
            || (a <= DIST_EPSILON && b >= IFFY_LEN)
            || (b <= DIST_EPSILON && a >= IFFY_LEN)
        {
            return;
        }
        self.near_miss += 1;
        let quantity = if a <= DIST_EPSILON || b <= DIST_EPSILON {
            IFFY_LEN / a.max(b)
        } else {
            IFFY_LEN / a.min(b)
        };
        self.cost += NEAR_MISS_COST * factor * (quantity * quantity - 1.0);
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Choice {
    pub partition: Partition,
    pub cost: PartitionCost,
    pub two_sided: bool,
}

/// Picks partitions; remembers which lines were tried during the current
/// pick.
pub struct PartitionSelector {
    tried: Vec<u32>,
    generation: u32,
}

impl PartitionSelector {
    pub fn new(num_lines: usize) -> PartitionSelector {
        PartitionSelector {
            tried: vec![0; num_lines],
            generation: 0,
        }
    }

    /// The cheapest valid partition for the half-edges in `blocks`, or `None`
    /// if no candidate divides them. Equal costs go to a two-sided line when
    /// configured to, then to the lowest line index.
    pub fn pick(
        &mut self,
        mesh: &Mesh,
        blocks: &SuperBlockTree,
        config: &BuildConfig,
    ) -> Option<Choice> {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            for tried in &mut self.tried {
                *tried = 0;
            }
            self.generation = 1;
        }

        let mut candidates = Vec::with_capacity(blocks.root().total_count());
        blocks.for_each(|id| candidates.push(id));

        let mut best: Option<Choice> = None;
        for id in candidates {
            let hedge = mesh.hedge(id);
            let line = match hedge.line() {
                Some(line) => line,
                None => continue,
            };
            if hedge.metrics().length < DIST_EPSILON {
                continue;
            }
            if line >= self.tried.len() {
                self.tried.resize(line + 1, 0);
            }
            if self.tried[line] == self.generation {
                continue;
            }
            self.tried[line] = self.generation;

            let partition = Partition::from_hedge(mesh, id);
            let limit = best.map_or(std::f64::INFINITY, |best| best.cost.cost);
            let cost = match evaluate(mesh, blocks, &partition, config, limit) {
                Some(cost) => cost,
                None => continue,
            };
            let choice = Choice {
                partition,
                cost,
                two_sided: hedge.twin.is_some(),
            };
            let better = match best {
                None => true,
                Some(best) => match choice.cost.cost.partial_cmp(&best.cost.cost) {
                    Some(Ordering::Less) => true,
                    Some(Ordering::Equal) => {
                        let sides_differ = choice.two_sided != best.two_sided;
                        if config.prefer_two_sided_partitions && sides_differ {
                            choice.two_sided
                        } else {
                            choice.partition.line < best.partition.line
                        }
                    }
                    _ => false,
                },
            };
            if better {
                best = Some(choice);
            }
        }
        best
    }
}

/// Cost of dividing the half-edges in `blocks` along `partition`; `None`
/// if the partition is rejected or turns out dearer than `limit`.
pub fn evaluate(
    mesh: &Mesh,
    blocks: &SuperBlockTree,
    partition: &Partition,
    config: &BuildConfig,
    limit: f64,
) -> Option<PartitionCost> {
    let factor = f64::from(config.split_cost_factor);
    let mut cost = PartitionCost::default();
    if evaluate_block(mesh, blocks, 0, partition, factor, limit, &mut cost) {
        return None;
    }

    if cost.real_left == 0 || cost.real_right == 0 {
        return None;
    }
    cost.cost += REAL_BALANCE_COST * (cost.real_left as f64 - cost.real_right as f64).abs();
    cost.cost += MINI_BALANCE_COST * (cost.mini_left as f64 - cost.mini_right as f64).abs();
    if !partition.is_axis_aligned() {
        cost.cost += DIAGONAL_COST;
    }
    if cost.cost > limit {
        None
    } else {
        Some(cost)
    }
}

// Returns true once the running cost exceeds `limit`.
fn evaluate_block(
    mesh: &Mesh,
    blocks: &SuperBlockTree,
    id: BlockId,
    partition: &Partition,
    factor: f64,
    limit: f64,
    cost: &mut PartitionCost,
) -> bool {
    let block = blocks.block(id);
    if let Some(branch) = blocks.side_of(id, partition) {
        cost.count(branch, false, block.real_count);
        cost.count(branch, true, block.mini_count);
        return false;
    }

    for &hedge in &block.hedges {
        cost.add_hedge(mesh, partition, hedge, factor);
        if cost.cost > limit {
            return true;
        }
    }
    for &child in block.children.iter().flatten() {
        if evaluate_block(mesh, blocks, child, partition, factor, limit, cost) {
            return true;
        }
    }
    false
}

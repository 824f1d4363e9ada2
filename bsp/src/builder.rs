use super::config::BuildConfig;
use super::errors::{ErrorKind, Result};
use super::map::Map;
use super::partitioner::{BuildStats, Partitioner};
use super::report::{NullReporter, ReportLog, Reporter, ReporterChain};
use super::tree::{BspLeaf, BspNode, BspTree, Child, Segment};
use failchain::{bail, ensure};
use indexmap::IndexSet;
use log::{error, info};
use math::Pnt2d;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Element {
    Node,
    Leaf,
    Segment,
    Vertex,
}

impl Element {
    fn name(self) -> &'static str {
        match self {
            Element::Node => "node",
            Element::Leaf => "leaf",
            Element::Segment => "segment",
            Element::Vertex => "vertex",
        }
    }
}

struct Built {
    tree: BspTree,
    stats: BuildStats,
    taken: IndexSet<(Element, usize)>,
}

/// Builds the BSP tree of one map and hands out the produced elements.
///
/// A failed build leaves nothing behind: every accessor behaves as if
/// `build` was never called. Anomalies found along the way are kept in
/// `report()` and logged as warnings once the build is over.
pub struct BspBuilder<'a> {
    partitioner: Partitioner<'a>,
    report: ReportLog,
    built: Option<Built>,
    tree_taken: bool,
}

impl<'a> BspBuilder<'a> {
    pub fn new(map: &'a Map, config: BuildConfig) -> Self {
        BspBuilder {
            partitioner: Partitioner::new(map, config),
            report: ReportLog::new(),
            built: None,
            tree_taken: false,
        }
    }

    pub fn with_split_cost_factor(map: &'a Map, split_cost_factor: i32) -> Self {
        Self::new(map, BuildConfig::default().with_split_cost_factor(split_cost_factor))
    }

    pub fn config(&self) -> &BuildConfig {
        self.partitioner.config()
    }

    pub fn set_split_cost_factor(&mut self, split_cost_factor: i32) {
        self.partitioner.set_split_cost_factor(split_cost_factor);
    }

    pub fn build(&mut self) -> Result<()> {
        self.build_observed(&mut NullReporter)
    }

    /// Like `build`, also forwarding every anomaly to `observer` as it is found.
    pub fn build_observed(&mut self, observer: &mut dyn Reporter) -> Result<()> {
        self.built = None;
        self.tree_taken = false;
        self.report.clear();

        let result = {
            let mut reporter = ReporterChain::new(&mut self.report, observer);
            self.partitioner.build(&mut reporter)
        };
        self.report.log_warnings();
        match result {
            Ok((tree, stats)) => {
                info!(
                    "BSP ready for {} linedefs: {} unclosed sectors, {} one-way windows.",
                    self.partitioner.map().linedefs.len(),
                    self.report.unclosed_sectors.len(),
                    self.report.one_way_windows.len()
                );
                self.built = Some(Built {
                    tree,
                    stats,
                    taken: IndexSet::new(),
                });
                Ok(())
            }
            Err(build_error) => {
                error!("BSP build failed: {}", build_error);
                Err(build_error)
            }
        }
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn report(&self) -> &ReportLog {
        &self.report
    }

    pub fn stats(&self) -> Option<&BuildStats> {
        self.built.as_ref().map(|built| &built.stats)
    }

    pub fn tree(&self) -> Result<&BspTree> {
        ensure!(!self.tree_taken, ErrorKind::already_taken("tree", 0));
        match self.built {
            Some(ref built) => Ok(&built.tree),
            None => bail!(ErrorKind::NotBuilt),
        }
    }

    pub fn root(&self) -> Option<Child> {
        self.built.as_ref().map(|built| built.tree.root)
    }

    pub fn node_count(&self) -> usize {
        self.built.as_ref().map_or(0, |built| built.tree.nodes.len())
    }

    pub fn leaf_count(&self) -> usize {
        self.built.as_ref().map_or(0, |built| built.tree.leafs.len())
    }

    pub fn segment_count(&self) -> usize {
        self.built.as_ref().map_or(0, |built| built.tree.segments.len())
    }

    pub fn vertex_count(&self) -> usize {
        self.built.as_ref().map_or(0, |built| built.tree.vertices.len())
    }

    pub fn vertex(&self, index: usize) -> Option<Pnt2d> {
        self.built.as_ref().and_then(|built| built.tree.vertex(index))
    }

    pub fn take_node(&mut self, index: usize) -> Result<BspNode> {
        self.take(Element::Node, index, |tree| tree.node(index).cloned())
    }

    pub fn take_leaf(&mut self, index: usize) -> Result<BspLeaf> {
        self.take(Element::Leaf, index, |tree| tree.leaf(index).cloned())
    }

    pub fn take_segment(&mut self, index: usize) -> Result<Segment> {
        self.take(Element::Segment, index, |tree| tree.segment(index).cloned())
    }

    pub fn take_vertex(&mut self, index: usize) -> Result<Pnt2d> {
        self.take(Element::Vertex, index, |tree| tree.vertex(index))
    }

    /// Moves the whole tree out. Nothing else can be taken afterwards.
    pub fn take_tree(&mut self) -> Result<BspTree> {
        ensure!(!self.tree_taken, ErrorKind::already_taken("tree", 0));
        match self.built {
            Some(ref built) => {
                if let Some(&(element, index)) = built.taken.iter().next() {
                    bail!(ErrorKind::already_taken(element.name(), index));
                }
            }
            None => bail!(ErrorKind::NotBuilt),
        }
        match self.built.take() {
            Some(built) => {
                self.tree_taken = true;
                Ok(built.tree)
            }
            None => bail!(ErrorKind::NotBuilt),
        }
    }

    fn take<T, F>(&mut self, element: Element, index: usize, get: F) -> Result<T>
    where
        F: FnOnce(&BspTree) -> Option<T>,
    {
        ensure!(!self.tree_taken, ErrorKind::already_taken("tree", 0));
        let built = match self.built {
            Some(ref mut built) => built,
            None => bail!(ErrorKind::NotBuilt),
        };
        let value = match get(&built.tree) {
            Some(value) => value,
            None => bail!(ErrorKind::no_such_element(element.name(), index)),
        };
        ensure!(
            built.taken.insert((element, index)),
            ErrorKind::already_taken(element.name(), index)
        );
        Ok(value)
    }
}

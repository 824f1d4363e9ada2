mod analysis;
mod builder;
mod config;
mod errors;
mod intercepts;
mod map;
mod mesh;
mod partition;
mod partitioner;
mod report;
mod selector;
mod splitter;
mod superblock;
mod tree;
mod visitor;

#[cfg(test)]
mod test_maps;

pub mod types;
pub mod util;

pub use self::analysis::{LineAnalysis, MapAnalysis, Skip};
pub use self::builder::BspBuilder;
pub use self::config::BuildConfig;
pub use self::errors::{Error, ErrorKind, Result};
pub use self::map::Map;
pub use self::partitioner::{BuildStats, Partitioner};
pub use self::report::{
    NullReporter, OneWayWindow, ReportLog, Reporter, ReporterChain, UnclosedSector,
};
pub use self::tree::{Branch, BspLeaf, BspNode, BspTree, Child, LeafId, NodeId, Segment, SegmentId};
pub use self::visitor::{TreeVisitor, TreeWalker, VisitorChain};

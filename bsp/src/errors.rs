use super::types::{LinedefId, SectorId, VertexId};
use failchain::{BoxedError, ChainErrorKind};
use failure::Fail;
use math::Pnt2d;
use std::result::Result as StdResult;

pub type Error = BoxedError<ErrorKind>;
pub type Result<T> = StdResult<T, Error>;

#[derive(Clone, Eq, PartialEq, Debug, Fail)]
pub enum ErrorKind {
    #[fail(
        display = "Half-edge {} from vertex {} to {} has zero length.",
        hedge, start, end
    )]
    ZeroLengthHEdge {
        hedge: usize,
        start: VertexId,
        end: VertexId,
    },

    #[fail(
        display = "Split point near ({}, {}) does not lie strictly inside half-edge {}.",
        x, y, hedge
    )]
    SplitPointOutOfRange { hedge: usize, x: i64, y: i64 },

    #[fail(
        display = "Partitioner exceeded maximum recursion depth {} near ({}, {}).",
        max_depth, x, y
    )]
    RecursionTooDeep { max_depth: usize, x: i64, y: i64 },

    #[fail(
        display = "No partition divides {} half-edges spanning sectors {:?} near ({}, {}).",
        num_hedges, sectors, x, y
    )]
    NoPartition {
        num_hedges: usize,
        sectors: Vec<SectorId>,
        x: i64,
        y: i64,
    },

    #[fail(display = "Map has no linedefs to build from.")]
    EmptyMap,

    #[fail(display = "Bad map element: {}", message)]
    BadMapElement { message: String },

    #[fail(display = "Built {} {} was already taken.", element, index)]
    ElementAlreadyTaken { element: &'static str, index: usize },

    #[fail(display = "No {} with index {} in the built map.", element, index)]
    NoSuchElement { element: &'static str, index: usize },

    #[fail(display = "BSP tree was not built (or the last build failed).")]
    NotBuilt,

    #[fail(display = "Corrupt builder configuration: {}", message)]
    CorruptConfig { message: String },

    #[fail(display = "I/O error reading builder configuration: {}", message)]
    ConfigIo { message: String },
}

impl ChainErrorKind for ErrorKind {
    type Error = Error;
}

impl ErrorKind {
    pub(crate) fn bad_vertex_index(
        linedef: LinedefId,
        vertex: VertexId,
        num_vertices: usize,
    ) -> Self {
        ErrorKind::BadMapElement {
            message: format!(
                "Linedef {} references vertex {}, but the map has {} vertices.",
                linedef, vertex, num_vertices
            ),
        }
    }

    pub(crate) fn bad_sector_index(
        linedef: LinedefId,
        sector: SectorId,
        num_sectors: usize,
    ) -> Self {
        ErrorKind::BadMapElement {
            message: format!(
                "Linedef {} references sector {}, but the map has {} sectors.",
                linedef, sector, num_sectors
            ),
        }
    }

    pub(crate) fn bad_vertex_coords(vertex: VertexId, x: f64, y: f64) -> Self {
        ErrorKind::BadMapElement {
            message: format!("Vertex {} has non-finite coordinates ({}, {}).", vertex, x, y),
        }
    }

    pub(crate) fn split_point_out_of_range(hedge: usize, point: Pnt2d) -> Self {
        ErrorKind::SplitPointOutOfRange {
            hedge,
            x: point.x.round() as i64,
            y: point.y.round() as i64,
        }
    }

    pub(crate) fn recursion_too_deep(max_depth: usize, near: Pnt2d) -> Self {
        ErrorKind::RecursionTooDeep {
            max_depth,
            x: near.x.round() as i64,
            y: near.y.round() as i64,
        }
    }

    pub(crate) fn no_partition(num_hedges: usize, sectors: Vec<SectorId>, near: Pnt2d) -> Self {
        ErrorKind::NoPartition {
            num_hedges,
            sectors,
            x: near.x.round() as i64,
            y: near.y.round() as i64,
        }
    }

    pub(crate) fn already_taken(element: &'static str, index: usize) -> Self {
        ErrorKind::ElementAlreadyTaken { element, index }
    }

    pub(crate) fn no_such_element(element: &'static str, index: usize) -> Self {
        ErrorKind::NoSuchElement { element, index }
    }

    pub(crate) fn on_config_read(path: &str) -> impl FnOnce() -> Self + '_ {
        move || ErrorKind::ConfigIo {
            message: format!("Failed to read `{}`.", path),
        }
    }

    pub(crate) fn on_config_parse() -> Self {
        ErrorKind::CorruptConfig {
            message: "Failed to parse builder configuration.".to_owned(),
        }
    }
}

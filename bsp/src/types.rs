use serde::Deserialize;

pub type MapCoord = f64;
pub type LinedefFlags = u16;
pub type SectorTag = u16;
pub type VertexId = usize;
pub type LinedefId = usize;
pub type SectorId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct MapVertex {
    pub x: MapCoord,
    pub y: MapCoord,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct MapLinedef {
    pub start_vertex: VertexId,
    pub end_vertex: VertexId,
    #[serde(default)]
    pub flags: LinedefFlags,
    #[serde(default)]
    pub front_sector: Option<SectorId>,
    #[serde(default)]
    pub back_sector: Option<SectorId>,
}

impl MapLinedef {
    pub fn is_self_referencing(&self) -> bool {
        self.front_sector.is_some() && self.front_sector == self.back_sector
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MapSector {
    #[serde(default)]
    pub tag: SectorTag,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Front,
    Back,
}

/// One side of an input linedef, as owned by a half-edge or segment.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LineSide {
    pub line: LinedefId,
    pub side: Side,
}

use super::errors::{ErrorKind, Result};
use super::types::{MapLinedef, MapSector, MapVertex, VertexId};
use failchain::{bail, ensure, ResultExt};
use log::info;
use math::Pnt2d;
use serde::Deserialize;

/// The editable map handed to the builder: vertices, linedefs and sectors.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Map {
    #[serde(default)]
    pub vertices: Vec<MapVertex>,
    #[serde(default)]
    pub linedefs: Vec<MapLinedef>,
    #[serde(default)]
    pub sectors: Vec<MapSector>,
}

impl Map {
    pub fn new(
        vertices: Vec<MapVertex>,
        linedefs: Vec<MapLinedef>,
        sectors: Vec<MapSector>,
    ) -> Map {
        Map {
            vertices,
            linedefs,
            sectors,
        }
    }

    pub fn from_text(text: &str) -> Result<Map> {
        let map: Map = toml::from_str(text).chain_err(|| ErrorKind::BadMapElement {
            message: "Failed to parse map text.".to_owned(),
        })?;
        map.validate()?;
        Ok(map)
    }

    /// Checks every linedef reference is in range and every vertex is finite.
    pub fn validate(&self) -> Result<()> {
        for (i_vertex, vertex) in self.vertices.iter().enumerate() {
            ensure!(
                vertex.x.is_finite() && vertex.y.is_finite(),
                ErrorKind::bad_vertex_coords(i_vertex, vertex.x, vertex.y)
            );
        }
        for (i_linedef, linedef) in self.linedefs.iter().enumerate() {
            for &vertex in &[linedef.start_vertex, linedef.end_vertex] {
                ensure!(
                    vertex < self.vertices.len(),
                    ErrorKind::bad_vertex_index(i_linedef, vertex, self.vertices.len())
                );
            }
            for sector in linedef.front_sector.iter().chain(linedef.back_sector.iter()) {
                if *sector >= self.sectors.len() {
                    bail!(ErrorKind::bad_sector_index(
                        i_linedef,
                        *sector,
                        self.sectors.len()
                    ));
                }
            }
        }
        info!(
            "Validated map: {} vertices, {} linedefs, {} sectors.",
            self.vertices.len(),
            self.linedefs.len(),
            self.sectors.len()
        );
        Ok(())
    }

    pub fn vertex(&self, id: VertexId) -> Option<Pnt2d> {
        self.vertices.get(id).map(|v| Pnt2d::new(v.x, v.y))
    }

    pub fn linedef_vertices(&self, linedef: &MapLinedef) -> Option<(Pnt2d, Pnt2d)> {
        if let (Some(v1), Some(v2)) = (
            self.vertex(linedef.start_vertex),
            self.vertex(linedef.end_vertex),
        ) {
            Some((v1, v2))
        } else {
            None
        }
    }
}

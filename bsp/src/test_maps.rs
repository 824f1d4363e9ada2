//! Small hand-built maps shared by the unit tests. Every room is 64 units
//! wide and winds clockwise, so its sector is on the right of each wall.

use super::map::Map;
use super::types::{MapLinedef, MapSector, MapVertex, SectorId, VertexId};

/// The two-sided wall between the rooms of `two_rooms`.
pub const SHARED_LINE: usize = 6;

/// The line of `self_referencing` with the same sector on both sides.
pub const SELF_REF_LINE: usize = 4;

/// The one-sided line of `one_way_window`, and the sector visible behind it.
pub const WINDOW_LINE: usize = 6;
pub const WINDOW_SECTOR: SectorId = 1;

/// The line of `mismatched_divider` with a sector of its own on the back.
pub const DIVIDER_LINE: usize = 4;

/// The west room's east wall in `back_to_back_rooms`, and the east room's
/// west wall lying over it.
pub const WEST_FACE_LINE: usize = 2;
pub const EAST_FACE_LINE: usize = 7;

type Wall = (VertexId, VertexId, Option<SectorId>, Option<SectorId>);

fn build(points: &[(f64, f64)], walls: &[Wall], num_sectors: usize) -> Map {
    Map::new(
        points.iter().map(|&(x, y)| MapVertex { x, y }).collect(),
        walls
            .iter()
            .map(|&(start_vertex, end_vertex, front_sector, back_sector)| MapLinedef {
                start_vertex,
                end_vertex,
                flags: if back_sector.is_some() { 0x0004 } else { 0x0001 },
                front_sector,
                back_sector,
            })
            .collect(),
        vec![MapSector::default(); num_sectors],
    )
}

const SQUARE: [(f64, f64); 4] = [(0.0, 0.0), (0.0, 64.0), (64.0, 64.0), (64.0, 0.0)];
const SIDE_BY_SIDE: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.0, 64.0),
    (64.0, 64.0),
    (64.0, 0.0),
    (128.0, 64.0),
    (128.0, 0.0),
];

pub fn room() -> Map {
    let a = Some(0);
    build(
        &SQUARE,
        &[(0, 1, a, None), (1, 2, a, None), (2, 3, a, None), (3, 0, a, None)],
        1,
    )
}

pub fn two_rooms() -> Map {
    let (a, b) = (Some(0), Some(1));
    build(
        &SIDE_BY_SIDE,
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (3, 0, a, None),
            (2, 4, b, None),
            (4, 5, b, None),
            (5, 3, b, None),
            (2, 3, a, b),
        ],
        2,
    )
}

/// A room crossed halfway up by a line with the room's sector on both sides.
pub fn self_referencing() -> Map {
    let a = Some(0);
    let mut points = SQUARE.to_vec();
    points.extend_from_slice(&[(16.0, 32.0), (48.0, 32.0)]);
    build(
        &points,
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (2, 3, a, None),
            (3, 0, a, None),
            (4, 5, a, a),
        ],
        1,
    )
}

/// A room crossed halfway up by a line with the room's sector on both sides,
/// ending on the middle of the west and east walls.
pub fn touching_self_reference() -> Map {
    let a = Some(0);
    let mut points = SQUARE.to_vec();
    points.extend_from_slice(&[(0.0, 32.0), (64.0, 32.0)]);
    build(
        &points,
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (2, 3, a, None),
            (3, 0, a, None),
            (4, 5, a, a),
        ],
        1,
    )
}

/// A room cut in half by a line claiming a second sector behind it, while
/// every wall of the northern half still faces the first one.
pub fn mismatched_divider() -> Map {
    let a = Some(0);
    let mut points = SQUARE.to_vec();
    points.extend_from_slice(&[(0.0, 32.0), (64.0, 32.0)]);
    build(
        &points,
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (2, 3, a, None),
            (3, 0, a, None),
            (4, 5, a, Some(1)),
        ],
        2,
    )
}

/// `two_rooms`, with the east room's corners on the shared wall given
/// vertices of their own at the same positions.
pub fn duplicate_vertex_rooms() -> Map {
    let (a, b) = (Some(0), Some(1));
    let mut points = SIDE_BY_SIDE.to_vec();
    points.extend_from_slice(&[(64.0, 64.0), (64.0, 0.0)]);
    build(
        &points,
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (3, 0, a, None),
            (6, 4, b, None),
            (4, 5, b, None),
            (5, 7, b, None),
            (2, 3, a, b),
        ],
        2,
    )
}

/// Two closed rooms side by side, each with its own vertices and its own
/// one-sided wall where they meet.
pub fn back_to_back_rooms() -> Map {
    let (a, b) = (Some(0), Some(1));
    let mut points = SQUARE.to_vec();
    points.extend_from_slice(&[(64.0, 64.0), (128.0, 64.0), (128.0, 0.0), (64.0, 0.0)]);
    build(
        &points,
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (2, 3, a, None),
            (3, 0, a, None),
            (4, 5, b, None),
            (5, 6, b, None),
            (6, 7, b, None),
            (7, 4, b, None),
        ],
        2,
    )
}

/// A room missing its south wall.
pub fn unclosed_room() -> Map {
    let a = Some(0);
    build(&SQUARE, &[(0, 1, a, None), (1, 2, a, None), (2, 3, a, None)], 1)
}

/// `two_rooms` with the shared wall one-sided, facing only the west room.
pub fn one_way_window() -> Map {
    let mut map = two_rooms();
    map.linedefs[WINDOW_LINE].back_sector = None;
    map.linedefs[WINDOW_LINE].flags = 0x0001;
    map
}

/// A `columns` by `rows` grid of rooms, each its own sector, numbered row by
/// row from the south-west corner.
pub fn room_grid(columns: usize, rows: usize) -> Map {
    let vertex = |x: usize, y: usize| y * (columns + 1) + x;
    let cell = |x: usize, y: usize| Some(y * columns + x);

    let mut points = Vec::with_capacity((columns + 1) * (rows + 1));
    for y in 0..=rows {
        for x in 0..=columns {
            points.push((x as f64 * 64.0, y as f64 * 64.0));
        }
    }

    let mut walls = Vec::new();
    for y in 0..=rows {
        for x in 0..columns {
            if y == 0 {
                walls.push((vertex(x + 1, y), vertex(x, y), cell(x, y), None));
            } else {
                let north = if y < rows { cell(x, y) } else { None };
                walls.push((vertex(x, y), vertex(x + 1, y), cell(x, y - 1), north));
            }
        }
    }
    for x in 0..=columns {
        for y in 0..rows {
            if x == columns {
                walls.push((vertex(x, y + 1), vertex(x, y), cell(x - 1, y), None));
            } else {
                let west = if x > 0 { cell(x - 1, y) } else { None };
                walls.push((vertex(x, y), vertex(x, y + 1), cell(x, y), west));
            }
        }
    }
    build(&points, &walls, columns * rows)
}

/// A large room around a square pillar.
pub fn pillar_room() -> Map {
    let a = Some(0);
    build(
        &[
            (0.0, 0.0),
            (0.0, 256.0),
            (256.0, 256.0),
            (256.0, 0.0),
            (96.0, 96.0),
            (160.0, 96.0),
            (160.0, 160.0),
            (96.0, 160.0),
        ],
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (2, 3, a, None),
            (3, 0, a, None),
            (4, 5, a, None),
            (5, 6, a, None),
            (6, 7, a, None),
            (7, 4, a, None),
        ],
        1,
    )
}

/// A square cut along its diagonal into two triangular sectors.
pub fn diagonal_room() -> Map {
    let (a, b) = (Some(0), Some(1));
    build(
        &[(0.0, 0.0), (0.0, 128.0), (128.0, 128.0), (128.0, 0.0)],
        &[
            (0, 1, a, None),
            (1, 2, a, None),
            (2, 3, b, None),
            (3, 0, b, None),
            (2, 0, a, b),
        ],
        2,
    )
}

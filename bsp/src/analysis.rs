//! Checks run over the input linedefs before any half-edge is created.

use super::map::Map;
use super::report::Reporter;
use super::types::{LinedefId, MapLinedef, SectorId};
use super::util::{midpoint, point_key, DIST_EPSILON};
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::{debug, info, warn};
use math::{Line2d, Pnt2d};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Skip {
    ZeroLength,
    /// Runs between the same two points as an earlier line.
    Overlaps(LinedefId),
    NoSectors,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LineAnalysis {
    pub skip: Option<Skip>,
    pub self_ref: bool,
    /// Sector visible behind a one-sided line.
    pub window: Option<SectorId>,
    /// A one-sided line running the other way between the same two points,
    /// with a different sector in front.
    pub back_to_back: Option<LinedefId>,
}

impl LineAnalysis {
    pub fn is_used(&self) -> bool {
        self.skip.is_none()
    }

    /// Sector on the back of the line, counting a window's facing sector.
    pub fn back_sector(&self, linedef: &MapLinedef) -> Option<SectorId> {
        linedef.back_sector.or(self.window)
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapAnalysis {
    lines: Vec<LineAnalysis>,
}

impl MapAnalysis {
    pub fn analyze(map: &Map, reporter: &mut dyn Reporter) -> MapAnalysis {
        let mut analysis = MapAnalysis {
            lines: vec![LineAnalysis::default(); map.linedefs.len()],
        };
        analysis.find_skipped(map);
        analysis.find_windows(map, reporter);

        let lines = &analysis.lines;
        info!(
            "Analysed {} linedefs: {} skipped, {} self-referencing, {} one-way windows.",
            lines.len(),
            lines.iter().filter(|line| !line.is_used()).count(),
            lines.iter().filter(|line| line.self_ref).count(),
            lines.iter().filter(|line| line.window.is_some()).count()
        );
        analysis
    }

    pub fn line(&self, id: LinedefId) -> Option<&LineAnalysis> {
        self.lines.get(id)
    }

    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    fn find_skipped(&mut self, map: &Map) {
        let mut seen: IndexMap<((u64, u64), (u64, u64)), (LinedefId, Option<LinedefId>)> =
            IndexMap::new();
        for (i_linedef, linedef) in map.linedefs.iter().enumerate() {
            let (start, end) = match map.linedef_vertices(linedef) {
                Some(vertices) => vertices,
                None => continue,
            };
            let analysis = &mut self.lines[i_linedef];
            if linedef.front_sector.is_none() && linedef.back_sector.is_none() {
                warn!("Skipping linedef {}: it has no sectors.", i_linedef);
                analysis.skip = Some(Skip::NoSectors);
                continue;
            }
            if start == end {
                warn!(
                    "Skipping zero-length linedef {} at ({}, {}).",
                    i_linedef, start.x, start.y
                );
                analysis.skip = Some(Skip::ZeroLength);
                continue;
            }

            let (a, b) = (point_key(start), point_key(end));
            let key = if a < b { (a, b) } else { (b, a) };
            match seen.entry(key) {
                Entry::Occupied(mut entry) => {
                    let (first, partner) = *entry.get();
                    let other = &map.linedefs[first];
                    let reversed = map
                        .linedef_vertices(other)
                        .map_or(false, |(other_start, _)| point_key(other_start) == b);
                    if partner.is_none()
                        && reversed
                        && linedef.back_sector.is_none()
                        && other.back_sector.is_none()
                        && linedef.front_sector != other.front_sector
                    {
                        debug!("Linedefs {} and {} are back to back.", first, i_linedef);
                        entry.insert((first, Some(i_linedef)));
                        self.lines[first].back_to_back = Some(i_linedef);
                        self.lines[i_linedef].back_to_back = Some(first);
                        continue;
                    }
                    warn!(
                        "Skipping linedef {}: it overlaps linedef {}.",
                        i_linedef, first
                    );
                    self.lines[i_linedef].skip = Some(Skip::Overlaps(first));
                    continue;
                }
                Entry::Vacant(entry) => {
                    entry.insert((i_linedef, None));
                }
            }

            let analysis = &mut self.lines[i_linedef];
            analysis.self_ref = linedef.is_self_referencing();
            if analysis.self_ref {
                debug!("Linedef {} is self-referencing.", i_linedef);
            }
        }
    }

    fn find_windows(&mut self, map: &Map, reporter: &mut dyn Reporter) {
        for (i_linedef, linedef) in map.linedefs.iter().enumerate() {
            let line = &self.lines[i_linedef];
            if !line.is_used() || line.back_to_back.is_some() || linedef.back_sector.is_some() {
                continue;
            }
            let front = match linedef.front_sector {
                Some(front) => front,
                None => continue,
            };
            let (front_open, back_open) = match self.cast_rays(map, i_linedef) {
                Some(open) => open,
                None => continue,
            };
            if front_open != Some(front) {
                continue;
            }
            if let Some(back) = back_open.filter(|&back| back != front) {
                debug!(
                    "Linedef {} looks onto sector {} from its back.",
                    i_linedef, back
                );
                self.lines[i_linedef].window = Some(back);
                reporter.one_way_window_found(i_linedef, back);
            }
        }
    }

    /// Casts an axis-aligned ray both ways from the middle of `id`, across its
    /// main direction, and returns the sector facing the middle from the
    /// nearest line hit on its front and on its back.
    fn cast_rays(&self, map: &Map, id: LinedefId) -> Option<(Option<SectorId>, Option<SectorId>)> {
        let (start, end) = map.linedef_vertices(&map.linedefs[id])?;
        let line = Line2d::from_two_points(start, end);
        let origin = midpoint(start, end);
        let horizontal = (end.x - start.x).abs() < (end.y - start.y).abs();

        let mut front: Option<(f64, Option<SectorId>)> = None;
        let mut back: Option<(f64, Option<SectorId>)> = None;
        for (i_other, other) in map.linedefs.iter().enumerate() {
            if i_other == id || !self.lines[i_other].is_used() {
                continue;
            }
            let (p1, p2) = match map.linedef_vertices(other) {
                Some(vertices) => vertices,
                None => continue,
            };
            let hit = match ray_hit(origin, p1, p2, horizontal) {
                Some(hit) => hit,
                None => continue,
            };
            let distance = (hit - origin).x.abs().max((hit - origin).y.abs());
            if distance < DIST_EPSILON {
                continue;
            }

            let facing = if Line2d::from_two_points(p1, p2).signed_distance(origin) > 0.0 {
                other.front_sector
            } else {
                other.back_sector.or_else(|| {
                    self.lines[i_other]
                        .back_to_back
                        .and_then(|partner| map.linedefs[partner].front_sector)
                })
            };
            let nearest = if line.signed_distance(hit) > 0.0 {
                &mut front
            } else {
                &mut back
            };
            if nearest.map_or(true, |(best, _)| distance < best) {
                *nearest = Some((distance, facing));
            }
        }
        Some((
            front.and_then(|(_, sector)| sector),
            back.and_then(|(_, sector)| sector),
        ))
    }

    #[cfg(test)]
    pub(crate) fn windows(&self) -> Vec<(LinedefId, SectorId)> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(id, line)| line.window.map(|sector| (id, sector)))
            .collect()
    }
}

/// Where the axis-aligned line through `origin` crosses segment `p1`-`p2`.
fn ray_hit(origin: Pnt2d, p1: Pnt2d, p2: Pnt2d, horizontal: bool) -> Option<Pnt2d> {
    // Work in (along, across) coordinates so both ray directions share code.
    let swap = |p: Pnt2d| if horizontal { p } else { Pnt2d::new(p.y, p.x) };
    let (o, a, b) = (swap(origin), swap(p1), swap(p2));
    if (a.y - b.y).abs() < DIST_EPSILON {
        return None;
    }
    if (a.y > o.y + DIST_EPSILON && b.y > o.y + DIST_EPSILON)
        || (a.y < o.y - DIST_EPSILON && b.y < o.y - DIST_EPSILON)
    {
        return None;
    }
    let along = a.x + (o.y - a.y) * (b.x - a.x) / (b.y - a.y);
    Some(swap(Pnt2d::new(along, o.y)))
}

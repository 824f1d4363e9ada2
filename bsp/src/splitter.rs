use super::errors::{ErrorKind, Result};
use super::intercepts::InterceptList;
use super::mesh::{HEdgeId, ListId, Mesh};
use super::partition::{Classification, Partition};
use failchain::bail;

/// The two half-edge sets produced by dividing one along a partition.
#[derive(Debug)]
pub struct Division {
    pub right: ListId,
    pub left: ListId,
    pub intercepts: InterceptList,
    pub splits: usize,
    pub reused_vertices: usize,
}

/// Empties `list` into a new right and a new left list, splitting every
/// half-edge that crosses `partition` (along with its twin). Collinear
/// half-edges go right when they run the same way as the partition.
///
/// Vertices already on the partition are gathered first, so a crossing
/// that lands on one of them reuses it instead of adding a new vertex.
pub fn divide(mesh: &mut Mesh, list: ListId, partition: &Partition) -> Result<Division> {
    let mut division = Division {
        right: mesh.new_list(),
        left: mesh.new_list(),
        intercepts: InterceptList::find(mesh, partition, mesh.iter_list(list)),
        splits: 0,
        reused_vertices: 0,
    };

    while let Some(id) = mesh.pop_front(list) {
        let target = match partition.classify(mesh, id) {
            Classification::CollinearSame | Classification::Right => division.right,
            Classification::CollinearOpposite | Classification::Left => division.left,
            Classification::Split { a, b } => {
                let fragment = split_hedge(mesh, id, partition, a, b, &mut division)?;
                if a < 0.0 {
                    mesh.push_back(division.left, id);
                    mesh.push_back(division.right, fragment);
                } else {
                    mesh.push_back(division.right, id);
                    mesh.push_back(division.left, fragment);
                }
                continue;
            }
        };
        mesh.push_back(target, id);
    }

    division.intercepts.merge_coincident();
    Ok(division)
}

/// Cuts `id` (A -> B) where it crosses `partition`, at a vertex V.
///
/// `id` becomes A -> V and the returned fragment is V -> B. A twin B -> A
/// becomes V -> A, and its new fragment B -> V, twinned with the returned
/// one, is linked right after it in whatever list it is on.
fn split_hedge(
    mesh: &mut Mesh,
    id: HEdgeId,
    partition: &Partition,
    a: f64,
    b: f64,
    division: &mut Division,
) -> Result<HEdgeId> {
    let metrics = *mesh.metrics(id);
    let (point, fraction) = partition.crossing(&metrics, a, b);
    if !(fraction > 0.0 && fraction < 1.0) {
        bail!(ErrorKind::split_point_out_of_range(id, point));
    }

    let (sector, twin, self_ref) = {
        let hedge = mesh.hedge(id);
        (hedge.sector, hedge.twin, hedge.self_ref)
    };
    let twin_sector = twin.and_then(|twin| mesh.hedge(twin).sector);

    let vertex = match division.intercepts.vertex_near(mesh, point) {
        Some(vertex) => {
            division.reused_vertices += 1;
            vertex
        }
        None => mesh.add_vertex(point),
    };
    mesh.add_wall_tip(vertex, -metrics.direction, sector, twin_sector);
    mesh.add_wall_tip(vertex, metrics.direction, twin_sector, sector);

    let fragment = mesh.clone_hedge(id);
    mesh.set_end(id, vertex)?;
    mesh.set_start(fragment, vertex)?;

    if let Some(twin) = twin {
        let twin_fragment = mesh.clone_hedge(twin);
        mesh.set_start(twin, vertex)?;
        mesh.set_end(twin_fragment, vertex)?;
        mesh.set_twins(fragment, twin_fragment);
        mesh.insert_after(twin, twin_fragment);
    }

    division.intercepts.insert(mesh, partition, vertex, self_ref);
    division.splits += 1;
    Ok(fragment)
}

#[cfg(test)]
mod test {
    use super::divide;
    use crate::mesh::Mesh;
    use crate::partition::Partition;
    use crate::types::{LineSide, Side};
    use crate::util::DIST_EPSILON;
    use math::Pnt2d;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn add_wall(mesh: &mut Mesh, line: usize, from: (f64, f64), to: (f64, f64)) -> (usize, usize) {
        let start = mesh.add_vertex(Pnt2d::new(from.0, from.1));
        let end = mesh.add_vertex(Pnt2d::new(to.0, to.1));
        let front = mesh
            .new_hedge(
                start,
                end,
                Some(LineSide {
                    line,
                    side: Side::Front,
                }),
                Some(0),
            )
            .unwrap();
        let back = mesh
            .new_hedge(
                end,
                start,
                Some(LineSide {
                    line,
                    side: Side::Back,
                }),
                Some(1),
            )
            .unwrap();
        mesh.set_twins(front, back);
        (front, back)
    }

    #[test]
    fn splits_hedge_and_twin_together() {
        let mut mesh = Mesh::new();
        let (part, _) = add_wall(&mut mesh, 0, (0.0, 0.0), (0.0, 64.0));
        let (front, back) = add_wall(&mut mesh, 1, (-32.0, 16.0), (32.0, 16.0));
        let list = mesh.new_list();
        mesh.push_back(list, front);
        let other = mesh.new_list();
        mesh.push_back(other, back);

        let partition = Partition::from_hedge(&mesh, part);
        let division = divide(&mut mesh, list, &partition).unwrap();
        assert!(mesh.list_is_empty(list));
        assert_eq!(division.splits, 1);
        assert_eq!(mesh.twin_symmetry_violation(), None);

        // `front` ran west to east, so its first half is on the left.
        let left = mesh.list_hedges(division.left);
        let right = mesh.list_hedges(division.right);
        assert_eq!(left, vec![front]);
        assert_eq!(right.len(), 1);
        let split_vertex = mesh.hedge(front).end;
        assert_eq!(mesh.vertex_pos(split_vertex), Pnt2d::new(0.0, 16.0));
        assert_eq!(mesh.hedge(right[0]).start, split_vertex);

        // The twin's fragment follows it in its own list.
        let others = mesh.list_hedges(other);
        assert_eq!(others.len(), 2);
        assert_eq!(others[0], back);
        assert_eq!(mesh.hedge(back).start, split_vertex);
        assert_eq!(mesh.hedge(others[1]).end, split_vertex);
        assert_eq!(mesh.hedge(others[1]).twin, Some(right[0]));

        let intercept = division
            .intercepts
            .by_vertex(split_vertex)
            .cloned()
            .unwrap();
        assert_eq!(intercept.distance, 16.0);
        assert_eq!(intercept.before, Some(0));
        assert_eq!(intercept.after, Some(1));
    }

    #[test]
    fn crossing_at_an_existing_vertex_reuses_it() {
        let mut mesh = Mesh::new();
        let (part, _) = add_wall(&mut mesh, 0, (0.0, 0.0), (0.0, 64.0));
        let (front, back) = add_wall(&mut mesh, 1, (-32.0, 16.0), (32.0, 16.0));
        let on_line = mesh.add_vertex(Pnt2d::new(0.0, 16.0));
        let off_line = mesh.add_vertex(Pnt2d::new(16.0, 40.0));
        let side = Some(LineSide {
            line: 2,
            side: Side::Front,
        });
        let touching = mesh.new_hedge(on_line, off_line, side, Some(0)).unwrap();
        // The crossing edge comes first, before anything has put `on_line`
        // on the partition.
        let list = mesh.new_list();
        mesh.push_back(list, front);
        mesh.push_back(list, touching);
        let other = mesh.new_list();
        mesh.push_back(other, back);

        let num_vertices = mesh.num_vertices();
        let partition = Partition::from_hedge(&mesh, part);
        let division = divide(&mut mesh, list, &partition).unwrap();
        assert_eq!(division.splits, 1);
        assert_eq!(division.reused_vertices, 1);
        assert_eq!(mesh.num_vertices(), num_vertices);
        assert_eq!(mesh.hedge(front).end, on_line);
        assert_eq!(mesh.hedge(back).start, on_line);
        assert_eq!(division.intercepts.len(), 1);
        assert_eq!(mesh.list_hedges(division.right).len(), 2);
        assert_eq!(mesh.twin_symmetry_violation(), None);
    }

    #[test]
    fn twins_stay_symmetric_under_random_splits() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let mut mesh = Mesh::new();
            let list = mesh.new_list();
            let mut line = 0;
            while line < 40 {
                let mut coord = || f64::from(rng.gen_range(-512i32..512));
                let (from, to) = ((coord(), coord()), (coord(), coord()));
                if from == to {
                    continue;
                }
                let (front, back) = add_wall(&mut mesh, line, from, to);
                mesh.push_back(list, front);
                mesh.push_back(list, back);
                line += 1;
            }

            let mut pending = list;
            for _ in 0..6 {
                let hedges = mesh.list_hedges(pending);
                if hedges.is_empty() {
                    break;
                }
                let source = hedges[rng.gen_range(0..hedges.len())];
                let partition = Partition::from_hedge(&mesh, source);
                let num_vertices = mesh.num_vertices();
                let division = divide(&mut mesh, pending, &partition)
                    .expect("test: random division failed");
                assert_eq!(mesh.twin_symmetry_violation(), None);
                assert!(mesh.num_vertices() >= num_vertices);
                for id in mesh.list_hedges(division.right) {
                    let (a, b) = partition.distances(&mesh, id);
                    assert!(a > -DIST_EPSILON && b > -DIST_EPSILON);
                }
                for id in mesh.list_hedges(division.left) {
                    let (a, b) = partition.distances(&mesh, id);
                    assert!(a < DIST_EPSILON && b < DIST_EPSILON);
                }
                pending = if rng.gen() {
                    division.right
                } else {
                    division.left
                };
            }
        }
    }
}

use math::Pnt2d;

/// Perpendicular distance under which a point counts as lying on a line.
pub const DIST_EPSILON: f64 = 1.0 / 128.0;

/// Angular difference, in degrees, under which two directions are the same.
pub const ANG_EPSILON: f64 = 1.0 / 1024.0;

/// Distances shorter than this from a partition make for thin slivers, and cost extra.
pub const IFFY_LEN: f64 = 4.0;

/// Intercepts closer than this along a partition are merged into one.
pub const SHORT_INTERCEPT_GAP: f64 = 0.2;

/// Gap between consecutive leaf edges above which the leaf counts as unclosed.
pub const LEAF_CLOSE_EPSILON: f64 = 0.5;

/// Superblock boxes are padded by this much when tested against a partition.
pub const SUPERBLOCK_PADDING: f64 = IFFY_LEN * 1.5;

/// Exact identity of a point, usable as a hash key. Zero has one key.
pub fn point_key(point: Pnt2d) -> (u64, u64) {
    ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits())
}

pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

pub fn midpoint(a: Pnt2d, b: Pnt2d) -> Pnt2d {
    Pnt2d::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

pub fn polygon_center<I: IntoIterator<Item = Pnt2d>>(points: I) -> Pnt2d {
    let (sum_x, sum_y, count) = points
        .into_iter()
        .fold((0.0, 0.0, 0usize), |(x, y, n), p| (x + p.x, y + p.y, n + 1));
    if count == 0 {
        Pnt2d::new(0.0, 0.0)
    } else {
        Pnt2d::new(sum_x / count as f64, sum_y / count as f64)
    }
}

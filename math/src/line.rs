use super::vector::{Pnt2, Vec2};
use cgmath::prelude::*;
use cgmath::BaseFloat;
use num_traits::NumCast;

pub type Line2f = Line2<f32>;
pub type Line2d = Line2<f64>;

/// An infinite 2D line through `origin`, with unit direction `displace`.
///
/// `length` is the length of the segment the line was built from, so the
/// line doubles as a segment `[origin, origin + displace * length]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line2<S: BaseFloat> {
    pub origin: Pnt2<S>,
    pub displace: Vec2<S>,
    pub length: S,
}

impl<S: BaseFloat> Line2<S> {
    pub fn from_origin_and_displace(origin: Pnt2<S>, displace: Vec2<S>) -> Line2<S> {
        let length = displace.magnitude();
        if length.abs() >= tiny() {
            Line2 {
                origin,
                displace: displace / length,
                length,
            }
        } else {
            Line2 {
                origin,
                displace: Vec2::zero(),
                length: S::zero(),
            }
        }
    }

    pub fn from_two_points(origin: Pnt2<S>, towards: Pnt2<S>) -> Line2<S> {
        Self::from_origin_and_displace(origin, towards - origin)
    }

    pub fn inverted_halfspaces(&self) -> Line2<S> {
        Line2 {
            origin: self.origin,
            displace: -self.displace,
            length: self.length,
        }
    }

    /// Perpendicular distance from the line, positive on its right-hand side
    /// (with y pointing up).
    pub fn signed_distance(&self, to: Pnt2<S>) -> S {
        (to - self.origin).perp_dot(self.displace)
    }
}

fn tiny<S: BaseFloat>() -> S {
    <S as NumCast>::from(1e-16).unwrap_or_else(S::zero)
}

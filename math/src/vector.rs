use cgmath::{BaseFloat, Point2, Vector2};
use num_traits::NumCast;

pub type Pnt2<S> = Point2<S>;
pub type Vec2<S> = Vector2<S>;

pub type Pnt2f = Pnt2<f32>;
pub type Vec2f = Vec2<f32>;
pub type Pnt2d = Pnt2<f64>;
pub type Vec2d = Vec2<f64>;

/// Angle of `direction` in degrees, counter-clockwise from the positive x axis, in `[0, 360)`.
pub fn compute_angle<S: BaseFloat>(direction: Vec2<S>) -> S {
    if direction.x == S::zero() && direction.y == S::zero() {
        return S::zero();
    }
    let full_turn = <S as NumCast>::from(360.0).unwrap_or_else(S::zero);
    let angle = direction.y.atan2(direction.x).to_degrees();
    if angle < S::zero() {
        angle + full_turn
    } else {
        angle
    }
}

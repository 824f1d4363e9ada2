mod bounds;
mod line;
mod vector;

pub use self::bounds::{Bounds2, Bounds2d, Bounds2f};
pub use self::line::{Line2, Line2d, Line2f};
pub use self::vector::{compute_angle, Pnt2, Pnt2d, Pnt2f, Vec2, Vec2d, Vec2f};
pub use cgmath::{vec2, BaseFloat, Deg, Rad};

pub mod prelude {
    pub use cgmath::prelude::*;
}

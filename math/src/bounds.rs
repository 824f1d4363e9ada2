use super::vector::Pnt2;
use cgmath::BaseFloat;

pub type Bounds2f = Bounds2<f32>;
pub type Bounds2d = Bounds2<f64>;

/// Axis aligned 2D box. An empty box has `min > max` and contains nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2<S: BaseFloat> {
    pub min: Pnt2<S>,
    pub max: Pnt2<S>,
}

impl<S: BaseFloat> Bounds2<S> {
    pub fn new(min: Pnt2<S>, max: Pnt2<S>) -> Self {
        Bounds2 { min, max }
    }

    pub fn empty() -> Self {
        Bounds2 {
            min: Pnt2::new(S::infinity(), S::infinity()),
            max: Pnt2::new(S::neg_infinity(), S::neg_infinity()),
        }
    }

    pub fn from_points<I: IntoIterator<Item = Pnt2<S>>>(points: I) -> Self {
        points.into_iter().fold(Self::empty(), |mut bounds, point| {
            bounds.add_point(point);
            bounds
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn add_point(&mut self, point: Pnt2<S>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn expanded(&self, by: S) -> Self {
        Bounds2 {
            min: Pnt2::new(self.min.x - by, self.min.y - by),
            max: Pnt2::new(self.max.x + by, self.max.y + by),
        }
    }

    pub fn width(&self) -> S {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> S {
        self.max.y - self.min.y
    }

    pub fn contains(&self, point: Pnt2<S>) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.min.x <= other.max.x
            && self.max.x >= other.min.x && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn corners(&self) -> [Pnt2<S>; 4] {
        [
            self.min,
            Pnt2::new(self.max.x, self.min.y),
            self.max,
            Pnt2::new(self.min.x, self.max.y),
        ]
    }
}

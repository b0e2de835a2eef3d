use euclid::TypedPoint2D;

use fixed::Fixed;

pub struct MapSpace;
pub type Point = TypedPoint2D<Fixed, MapSpace>;

/// Axis-aligned bounding box in map space, edges inclusive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BBox {
    pub top: Fixed,
    pub bottom: Fixed,
    pub left: Fixed,
    pub right: Fixed,
}

impl BBox {
    pub fn from_points(a: Point, b: Point) -> BBox {
        BBox {
            top: a.y.max(b.y),
            bottom: a.y.min(b.y),
            left: a.x.min(b.x),
            right: a.x.max(b.x),
        }
    }

    /// A box that contains nothing; growing it by any point yields just that point.
    pub fn empty() -> BBox {
        BBox {
            top: Fixed::min_value(),
            bottom: Fixed::max_value(),
            left: Fixed::max_value(),
            right: Fixed::min_value(),
        }
    }

    pub fn add_point(&mut self, x: Fixed, y: Fixed) {
        self.left = self.left.min(x);
        self.right = self.right.max(x);
        self.bottom = self.bottom.min(y);
        self.top = self.top.max(y);
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.bottom > self.top
    }
}

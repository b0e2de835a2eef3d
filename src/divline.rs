//! Infinite lines given by a point and a direction, and the two questions traces ask of them:
//! which side is a point on, and how far along a ray does it cross another line.

use fixed::{Fixed, fixed_div, fixed_mul};
use map::{Level, Line};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Divline {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
}

/// Which half-plane a point is in: 0 is the front (right-hand) side, 1 the back.
pub type SideIndex = usize;

impl Divline {
    pub fn new(x: Fixed, y: Fixed, dx: Fixed, dy: Fixed) -> Divline {
        Divline{ x, y, dx, dy }
    }

    pub fn from_line(level: &Level, line: &Line) -> Divline {
        let v1 = level.vertex(line.v1);
        Divline{ x: v1.x, y: v1.y, dx: line.dx, dy: line.dy }
    }

    pub fn end_x(&self) -> Fixed {
        self.x.wrapping_add(self.dx)
    }

    pub fn end_y(&self) -> Fixed {
        self.y.wrapping_add(self.dy)
    }

    /// Cross-product sign test.  The products are taken in 64 bits, so no precision is thrown away
    /// even for lines spanning the whole map.
    pub fn point_on_side(&self, x: Fixed, y: Fixed) -> SideIndex {
        if self.dx == 0 {
            if x <= self.x {
                return (self.dy > 0) as SideIndex;
            }
            return (self.dy < 0) as SideIndex;
        }
        if self.dy == 0 {
            if y <= self.y {
                return (self.dx < 0) as SideIndex;
            }
            return (self.dx > 0) as SideIndex;
        }

        let dx = x as i64 - self.x as i64;
        let dy = y as i64 - self.y as i64;
        let left = self.dy as i64 * dx;
        let right = dy * self.dx as i64;
        if right < left {
            return 0;
        }
        return 1;
    }
}

/// Which side of a map line a point is on.
pub fn point_on_line_side(level: &Level, x: Fixed, y: Fixed, line: &Line) -> SideIndex {
    Divline::from_line(level, line).point_on_side(x, y)
}

/// The fraction along `trace` at which it crosses the infinite line through `line`.  Parallel
/// lines never cross, and come back as 0; callers treat that as "not in front of the ray".
///
/// This keeps the classic 8-bit pre-shift so that fractions match the historical values exactly.
pub fn intercept_vector(trace: &Divline, line: &Divline) -> Fixed {
    let den = fixed_mul(line.dy >> 8, trace.dx).wrapping_sub(fixed_mul(line.dx >> 8, trace.dy));
    if den == 0 {
        return 0;
    }

    let num = fixed_mul(line.x.wrapping_sub(trace.x) >> 8, line.dy)
        .wrapping_add(fixed_mul(trace.y.wrapping_sub(line.y) >> 8, line.dx));
    return fixed_div(num, den);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::{FRACUNIT, to_fixed};

    #[test]
    fn sides_of_axis_lines() {
        // Pointing north: east is the front
        let north = Divline::new(0, 0, 0, to_fixed(10));
        assert_eq!(north.point_on_side(to_fixed(5), to_fixed(3)), 0);
        assert_eq!(north.point_on_side(to_fixed(-5), to_fixed(3)), 1);

        // Pointing east: south is the front
        let east = Divline::new(0, 0, to_fixed(10), 0);
        assert_eq!(east.point_on_side(to_fixed(3), to_fixed(-5)), 0);
        assert_eq!(east.point_on_side(to_fixed(3), to_fixed(5)), 1);
    }

    #[test]
    fn sides_of_diagonal_near_overflow() {
        let big = to_fixed(30000);
        let diag = Divline::new(-big, -big, big, big);
        assert_eq!(diag.point_on_side(big, -big), 0);
        assert_eq!(diag.point_on_side(-big, big), 1);
    }

    #[test]
    fn intercept_halfway() {
        let trace = Divline::new(0, 0, to_fixed(100), 0);
        let wall = Divline::new(to_fixed(50), to_fixed(-10), 0, to_fixed(20));
        assert_eq!(intercept_vector(&trace, &wall), FRACUNIT / 2);
    }

    #[test]
    fn intercept_parallel_is_zero() {
        let trace = Divline::new(0, 0, to_fixed(100), 0);
        let rail = Divline::new(0, to_fixed(10), to_fixed(50), 0);
        assert_eq!(intercept_vector(&trace, &rail), 0);
    }

    #[test]
    fn intercept_behind_is_negative() {
        let trace = Divline::new(0, 0, to_fixed(100), 0);
        let wall = Divline::new(to_fixed(-50), to_fixed(-10), 0, to_fixed(20));
        assert!(intercept_vector(&trace, &wall) < 0);
    }
}

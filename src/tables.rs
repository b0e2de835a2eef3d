//! Binary angles and the fine trigonometry tables.
//!
//! The tables are generated once, on first use, with integer arithmetic only, and never touched
//! again.  Nothing here ever calls a float trig function.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::sync::OnceLock;

use fixed::{Fixed, FRACBITS, FRACUNIT};

pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;
pub const ANGLETOFINESHIFT: u32 = 19;

pub const SLOPERANGE: usize = 2048;
pub const SLOPEBITS: u32 = 11;
pub const DBITS: u32 = FRACBITS - SLOPEBITS;

/// A binary angle: a full turn is 2^32, and all arithmetic wraps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(pub u32);

pub const ANG45: Angle = Angle(0x2000_0000);
pub const ANG90: Angle = Angle(0x4000_0000);
pub const ANG180: Angle = Angle(0x8000_0000);
pub const ANG270: Angle = Angle(0xC000_0000);

impl Angle {
    /// Index into the fine tables.
    #[inline]
    pub fn fine(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }

    /// Reinterpret as a signed angle centered on zero, for half-turn comparisons.
    #[inline]
    pub fn signed(self) -> i32 {
        self.0 as i32
    }

    #[inline]
    pub fn sin(self) -> Fixed {
        finesine(self.fine())
    }

    #[inline]
    pub fn cos(self) -> Fixed {
        finecosine(self.fine())
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_add(other.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_sub(other.0))
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_sub(other.0);
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

struct TrigTables {
    // Five quarter-turns long, so that cosine can be read as sine shifted a quarter turn
    finesine: Vec<Fixed>,
    finetangent: Vec<Fixed>,
    tantoangle: Vec<u32>,
}

static TABLES: OnceLock<TrigTables> = OnceLock::new();

// Table generation runs in 2.60 integer fixed point, with no floats anywhere
const WIDE_BITS: u32 = 60;
const WIDE_ONE: i128 = 1 << WIDE_BITS;
const WIDE_PI: i128 = 3_622_009_729_038_561_421;

/// Sine and cosine of `x` in [0, pi/2], by Taylor series until the terms vanish.
fn wide_sin_cos(x: i128) -> (i128, i128) {
    let mut sin = x;
    let mut term = x;
    let mut n = 1;
    loop {
        term = -term * x / WIDE_ONE * x / WIDE_ONE / ((2 * n) * (2 * n + 1));
        if term == 0 {
            break;
        }
        sin += term;
        n += 1;
    }

    let mut cos = WIDE_ONE;
    let mut term = WIDE_ONE;
    let mut n = 1;
    loop {
        term = -term * x / WIDE_ONE * x / WIDE_ONE / ((2 * n - 1) * (2 * n));
        if term == 0 {
            break;
        }
        cos += term;
        n += 1;
    }
    (sin, cos)
}

/// Arctangent of `x` in [0, 1].  Past one half, atan(x) = pi/4 + atan((x - 1) / (x + 1)) keeps
/// the series short.
fn wide_atan(x: i128) -> i128 {
    if x > WIDE_ONE / 2 {
        return WIDE_PI / 4 + wide_atan_series((x - WIDE_ONE) * WIDE_ONE / (x + WIDE_ONE));
    }
    wide_atan_series(x)
}

fn wide_atan_series(x: i128) -> i128 {
    let mut sum = x;
    let mut power = x;
    let mut n = 1;
    loop {
        power = -power * x / WIDE_ONE * x / WIDE_ONE;
        if power == 0 {
            break;
        }
        sum += power / (2 * n + 1);
        n += 1;
    }
    sum
}

fn to_fixed_trunc(wide: i128) -> Fixed {
    (wide * FRACUNIT as i128 / WIDE_ONE) as Fixed
}

fn tables() -> &'static TrigTables {
    TABLES.get_or_init(|| {
        let quarter = FINEANGLES / 4;
        // Sine and cosine at the middle of each fine angle in the first quadrant
        let first: Vec<(i128, i128)> = (0 .. quarter)
            .map(|r| wide_sin_cos((2 * r as i128 + 1) * WIDE_PI / FINEANGLES as i128))
            .collect();

        let finesine = (0 .. 5 * quarter)
            .map(|i| {
                let (sin, cos) = first[i % quarter];
                match (i / quarter) % 4 {
                    0 => to_fixed_trunc(sin),
                    1 => to_fixed_trunc(cos),
                    2 => -to_fixed_trunc(sin),
                    _ => -to_fixed_trunc(cos),
                }
            })
            .collect();

        let finetangent = (0 .. FINEANGLES / 2)
            .map(|i| {
                if i >= quarter {
                    let (sin, cos) = first[i - quarter];
                    (sin * FRACUNIT as i128 / cos) as Fixed
                }
                else {
                    let (sin, cos) = first[quarter - 1 - i];
                    -((sin * FRACUNIT as i128 / cos) as Fixed)
                }
            })
            .collect();

        let tantoangle = (0 ..= SLOPERANGE)
            .map(|i| wide_atan(i as i128 * WIDE_ONE / SLOPERANGE as i128))
            .map(|a| (a * u32::max_value() as i128 / (2 * WIDE_PI)) as u32)
            .collect();

        TrigTables{ finesine, finetangent, tantoangle }
    })
}

/// Force the tables to be built now, rather than on the first trace.
pub fn init_tables() {
    tables();
}

#[inline]
pub fn finesine(index: usize) -> Fixed {
    tables().finesine[index & FINEMASK]
}

#[inline]
pub fn finecosine(index: usize) -> Fixed {
    tables().finesine[(index & FINEMASK) + FINEANGLES / 4]
}

#[inline]
pub fn finetangent(index: usize) -> Fixed {
    tables().finetangent[index & (FINEANGLES / 2 - 1)]
}

#[inline]
pub fn tantoangle(index: usize) -> Angle {
    Angle(tables().tantoangle[index.min(SLOPERANGE)])
}

fn slope_div(num: u32, den: u32) -> usize {
    if den < 512 {
        return SLOPERANGE;
    }
    let ans = ((num << 3) / (den >> 8)) as usize;
    if ans <= SLOPERANGE { ans } else { SLOPERANGE }
}

/// The angle of the vector from (x1, y1) to (x2, y2), by octant and table lookup.
pub fn point_to_angle2(x1: Fixed, y1: Fixed, x2: Fixed, y2: Fixed) -> Angle {
    let mut x = x2.wrapping_sub(x1);
    let mut y = y2.wrapping_sub(y1);

    if x == 0 && y == 0 {
        return Angle(0);
    }

    if x >= 0 {
        if y >= 0 {
            if x > y {
                return tantoangle(slope_div(y as u32, x as u32));
            }
            return Angle(ANG90.0 - 1) - tantoangle(slope_div(x as u32, y as u32));
        }
        y = y.wrapping_neg();
        if x > y {
            return -tantoangle(slope_div(y as u32, x as u32));
        }
        return ANG270 + tantoangle(slope_div(x as u32, y as u32));
    }

    x = x.wrapping_neg();
    if y >= 0 {
        if x > y {
            return Angle(ANG180.0 - 1) - tantoangle(slope_div(y as u32, x as u32));
        }
        return ANG90 + tantoangle(slope_div(x as u32, y as u32));
    }
    y = y.wrapping_neg();
    if x > y {
        return ANG180 + tantoangle(slope_div(y as u32, x as u32));
    }
    return Angle(ANG270.0 - 1) - tantoangle(slope_div(x as u32, y as u32));
}

/// Cheap distance estimate, good to within about 12%.
pub fn approx_distance(dx: Fixed, dy: Fixed) -> Fixed {
    let dx = dx.wrapping_abs();
    let dy = dy.wrapping_abs();
    if dx < dy {
        return dx + dy - (dx >> 1);
    }
    return dx + dy - (dy >> 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_endpoints() {
        assert_eq!(finesine(0), 25);
        assert_eq!(finesine(FINEANGLES / 4 - 1), 65535);
        assert!(finesine(FINEANGLES / 2 + 10) < 0);
    }

    #[test]
    fn tables_are_pinned() {
        // Built without floats, so these hold on every platform
        assert_eq!(finesine(1024), 46358);
        assert_eq!(finesine(5000), -41904);
        assert_eq!(finetangent(0), -170891310);
        assert_eq!(finetangent(2048), 25);
        assert_eq!(finetangent(4095), 170891310);
        assert_eq!(tantoangle(1), Angle(333772));
        assert_eq!(tantoangle(1024), Angle(316933405));
        assert_eq!(tantoangle(SLOPERANGE), Angle(0x1FFF_FFFF));
    }

    #[test]
    fn tangent_is_odd() {
        for i in 0 .. FINEANGLES / 4 {
            assert_eq!(finetangent(i), -finetangent(FINEANGLES / 2 - 1 - i));
        }
    }

    #[test]
    fn cosine_is_shifted_sine() {
        for &i in [0, 1, 100, 2048, 4095, 6000].iter() {
            assert_eq!(finecosine(i), finesine(i + FINEANGLES / 4));
        }
        assert_eq!(ANG90.cos(), finesine(FINEANGLES / 2));
        assert!(Angle(0).cos() > 65000);
        assert!(ANG180.cos() < -65000);
    }

    #[test]
    fn angle_arithmetic_wraps() {
        assert_eq!(ANG270 + ANG180, ANG90);
        assert_eq!(Angle(0) - ANG90, ANG270);
        assert_eq!(-ANG90, ANG270);
        assert_eq!(ANG180.signed(), i32::min_value());
    }

    #[test]
    fn point_to_angle_cardinal_directions() {
        let u = FRACUNIT;
        assert_eq!(point_to_angle2(0, 0, 10 * u, 0), Angle(0));
        // Some axis-aligned directions come out one unit shy
        assert_eq!(point_to_angle2(0, 0, -10 * u, 0), Angle(ANG180.0 - 1));
        assert_eq!(point_to_angle2(0, 0, 0, 10 * u), Angle(ANG90.0 - 1));
        assert_eq!(point_to_angle2(0, 0, 0, -10 * u), ANG270);
        assert_eq!(point_to_angle2(5, 5, 5, 5), Angle(0));
    }

    #[test]
    fn point_to_angle_diagonal_is_about_45() {
        let a = point_to_angle2(0, 0, 100 * FRACUNIT, 100 * FRACUNIT);
        let diff = (a.0 as i64 - ANG45.0 as i64).abs();
        assert!(diff < 0x0010_0000, "angle {:x}", a.0);
    }

    #[test]
    fn approx_distance_axis() {
        assert_eq!(approx_distance(10 * FRACUNIT, 0), 10 * FRACUNIT);
        assert_eq!(approx_distance(0, -10 * FRACUNIT), 10 * FRACUNIT);
    }
}

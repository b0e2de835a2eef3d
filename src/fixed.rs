//! 16.16 fixed-point arithmetic.
//!
//! Everything positional in the simulation is a `Fixed`: coordinates, momentum, slopes, and the
//! fractions along a traced ray.  The rounding here is part of the game's behavior, so none of it
//! ever goes through floating point.

pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: Fixed = 1 << FRACBITS;
pub const FIXED_MAX: Fixed = i32::max_value();
pub const FIXED_MIN: Fixed = i32::min_value();

/// Convert whole map units to fixed point.
#[inline]
pub fn to_fixed(units: i32) -> Fixed {
    units << FRACBITS
}

/// Truncate to whole map units, rounding toward negative infinity like the arithmetic shift does.
#[inline]
pub fn to_int(value: Fixed) -> i32 {
    value >> FRACBITS
}

#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FRACBITS) as Fixed
}

/// Fixed-point division.  Anything that would overflow, division by zero included, saturates to
/// `FIXED_MAX` or `FIXED_MIN` depending on the sign of the result.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if (a.wrapping_abs() as u32 >> 14) >= b.wrapping_abs() as u32 {
        return if (a ^ b) < 0 { FIXED_MIN } else { FIXED_MAX };
    }
    return (((a as i64) << FRACBITS) / b as i64) as Fixed;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_matches_known_values() {
        assert_eq!(fixed_mul(FRACUNIT, FRACUNIT), FRACUNIT);
        assert_eq!(fixed_mul(3 * FRACUNIT, FRACUNIT / 2), 3 * FRACUNIT / 2);
        assert_eq!(fixed_mul(-2 * FRACUNIT, 5 * FRACUNIT), -10 * FRACUNIT);
        // Truncation toward negative infinity, as the shift does
        assert_eq!(fixed_mul(-1, 1), -1);
    }

    #[test]
    fn div_matches_known_values() {
        assert_eq!(fixed_div(FRACUNIT, 2 * FRACUNIT), FRACUNIT / 2);
        assert_eq!(fixed_div(-9 * FRACUNIT, 3 * FRACUNIT), -3 * FRACUNIT);
        assert_eq!(fixed_div(7 * FRACUNIT, -FRACUNIT), -7 * FRACUNIT);
    }

    #[test]
    fn div_by_zero_saturates() {
        assert_eq!(fixed_div(FRACUNIT, 0), FIXED_MAX);
        assert_eq!(fixed_div(-FRACUNIT, 0), FIXED_MIN);
        assert_eq!(fixed_div(0, 0), FIXED_MAX);
    }

    #[test]
    fn div_overflow_saturates() {
        assert_eq!(fixed_div(FIXED_MAX, 1), FIXED_MAX);
        assert_eq!(fixed_div(FIXED_MIN, 1), FIXED_MIN);
        assert_eq!(fixed_div(30000 * FRACUNIT, -FRACUNIT / 2), FIXED_MIN);
    }

    proptest! {
        #[test]
        fn div_never_panics(a in proptest::num::i32::ANY, b in proptest::num::i32::ANY) {
            let q = fixed_div(a, b);
            if b == 0 {
                prop_assert!(q == FIXED_MAX || q == FIXED_MIN);
            }
        }

        #[test]
        fn div_inverts_mul_for_small_values(a in -100i32..100, b in 1i32..100) {
            let fa = to_fixed(a);
            let fb = to_fixed(b);
            prop_assert_eq!(fixed_div(fixed_mul(fa, fb), fb), fa);
        }
    }
}

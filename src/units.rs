//! Rack unit conversion.
//!
//! Device positions are stored on a fixed-point grid of 1/6 U so that half-U
//! and third-U alignments never accumulate floating-point drift. Human-facing
//! values (U numbers, device heights) are `f64`; stored positions are `i32`.

// Internal positions never approach i32 limits (racks are at most 100U)
#![allow(clippy::cast_possible_truncation)]

/// Number of internal grid units per rack unit.
pub const UNITS_PER_U: i32 = 6;

/// Converts a human rack-unit value to internal grid units.
///
/// # Examples
///
/// ```
/// use rackplan::units::to_internal;
///
/// assert_eq!(to_internal(1.0), 6);
/// assert_eq!(to_internal(0.5), 3);
/// assert_eq!(to_internal(1.0 / 3.0), 2);
/// ```
#[must_use]
pub fn to_internal(human_u: f64) -> i32 {
    (human_u * f64::from(UNITS_PER_U)).round() as i32
}

/// Converts internal grid units back to human rack units.
#[must_use]
pub fn to_human(internal: i32) -> f64 {
    f64::from(internal) / f64::from(UNITS_PER_U)
}

/// Lowest valid bottom position in any rack (the bottom edge of U1).
#[must_use]
pub fn rack_min_position() -> i32 {
    to_internal(1.0)
}

/// Highest occupied internal unit in a rack of `height` U (the top edge of the top U).
#[must_use]
pub fn rack_max_position(height: u32) -> i32 {
    to_internal(f64::from(height) + 1.0) - 1
}

/// Inclusive internal range occupied by a block of `height_u` starting at `position`.
#[must_use]
pub fn occupied_range(position: i32, height_u: f64) -> (i32, i32) {
    (position, position + to_internal(height_u) - 1)
}

/// Returns true if two inclusive ranges share at least one internal unit.
#[must_use]
pub const fn ranges_overlap(a: (i32, i32), b: (i32, i32)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// Formats an internal position as a U label (e.g. `U5`, `U5.5`).
#[must_use]
pub fn format_u(internal: i32) -> String {
    let human = to_human(internal);
    if (human - human.round()).abs() < f64::EPSILON {
        format!("U{}", human.round() as i64)
    } else {
        let mut label = format!("U{human:.2}");
        while label.ends_with('0') {
            label.pop();
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_internal_whole_units() {
        assert_eq!(to_internal(1.0), 6);
        assert_eq!(to_internal(42.0), 252);
        assert_eq!(to_internal(0.0), 0);
    }

    #[test]
    fn test_to_internal_fractions() {
        assert_eq!(to_internal(0.5), 3);
        assert_eq!(to_internal(1.0 / 3.0), 2);
        assert_eq!(to_internal(2.0 / 3.0), 4);
        assert_eq!(to_internal(1.0 / 6.0), 1);
    }

    #[test]
    fn test_roundtrip_sixths() {
        for k in 0..=600 {
            let human = f64::from(k) / 6.0;
            assert_eq!(to_human(to_internal(human)), human, "k = {k}");
        }
    }

    #[test]
    fn test_rack_bounds() {
        assert_eq!(rack_min_position(), 6);
        // 12U rack: U12 occupies 72..=77
        assert_eq!(rack_max_position(12), 77);
    }

    #[test]
    fn test_occupied_range() {
        assert_eq!(occupied_range(30, 2.0), (30, 41));
        assert_eq!(occupied_range(30, 0.5), (30, 32));
    }

    #[test]
    fn test_ranges_overlap() {
        assert!(ranges_overlap((30, 41), (36, 41)));
        assert!(ranges_overlap((36, 41), (30, 41)));
        assert!(!ranges_overlap((30, 35), (36, 41)));
    }

    #[test]
    fn test_format_u() {
        assert_eq!(format_u(30), "U5");
        assert_eq!(format_u(33), "U5.5");
    }
}

//! Conversion of harness-reported timings to canonical nanosecond counts.
//!
//! Every value stored in a [`crate::results::ResultSet`] is an integer
//! nanosecond count, regardless of which unit the originating harness chose
//! to print. The conversion is deliberately closed over the unit tokens the
//! supported harnesses actually emit; anything else is a [`MalformedValue`]
//! so the caller can drop the record with a diagnostic instead of guessing.
//!
//! # Examples
//!
//! ```
//! use kzg_bench_report::units::to_nanos;
//!
//! assert_eq!(to_nanos(1.0, "s").unwrap(), 1_000_000_000);
//! assert_eq!(to_nanos(1.5, "ms").unwrap(), 1_500_000);
//! assert_eq!(to_nanos(1.0, "ns").unwrap(), 1);
//! ```

use thiserror::Error;

/// A timing value that cannot be converted to nanoseconds.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("malformed timing value: {0}")]
pub struct MalformedValue(String);

impl From<std::num::ParseFloatError> for MalformedValue {
    fn from(err: std::num::ParseFloatError) -> Self {
        Self(err.to_string())
    }
}

/// Converts a numeric timing value with a unit token to integer nanoseconds.
///
/// Recognized unit tokens are `ns`, `ms`, and `s`. The result is rounded to
/// the nearest nanosecond.
///
/// # Errors
///
/// Returns [`MalformedValue`] for an unrecognized unit token, or for a value
/// that is negative or not finite.
pub fn to_nanos(value: f64, unit: &str) -> Result<u64, MalformedValue> {
    let multiplier = match unit {
        "ns" => 1.0,
        "ms" => 1e6,
        "s" => 1e9,
        _ => {
            return Err(MalformedValue(format!("unrecognized time unit `{unit}`")));
        }
    };
    if !value.is_finite() || value < 0.0 {
        return Err(MalformedValue(format!("non-representable value `{value}`")));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok((value * multiplier).round() as u64)
}

/// Converts integer nanoseconds back into a display value in the given unit.
///
/// Used when rendering artifacts whose templates ask for a specific time
/// unit. The result is rounded to three decimal places, matching the
/// precision reports are published with. Unknown unit tokens fall back to
/// nanoseconds.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn from_nanos(nanos: u64, unit: &str) -> f64 {
    let divisor = match unit {
        "ms" => 1e6,
        "s" => 1e9,
        _ => 1.0,
    };
    (nanos as f64 / divisor * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_recognized_units() {
        assert_eq!(to_nanos(1.0, "ns").unwrap(), 1);
        assert_eq!(to_nanos(1.0, "ms").unwrap(), 1_000_000);
        assert_eq!(to_nanos(1.0, "s").unwrap(), 1_000_000_000);
    }

    #[test]
    fn rounds_fractional_nanos() {
        assert_eq!(to_nanos(1.2345, "ms").unwrap(), 1_234_500);
        assert_eq!(to_nanos(0.6, "ns").unwrap(), 1);
    }

    #[test]
    fn rejects_unknown_unit() {
        assert!(to_nanos(1.0, "us").is_err());
        assert!(to_nanos(1.0, "").is_err());
    }

    #[test]
    fn rejects_unrepresentable_values() {
        assert!(to_nanos(-1.0, "ns").is_err());
        assert!(to_nanos(f64::NAN, "ms").is_err());
        assert!(to_nanos(f64::INFINITY, "s").is_err());
    }

    #[test]
    fn display_conversion_rounds_to_three_places() {
        assert_eq!(from_nanos(1_234_567, "ms"), 1.235);
        assert_eq!(from_nanos(5000, "ns"), 5000.0);
        assert_eq!(from_nanos(1_500_000_000, "s"), 1.5);
    }
}

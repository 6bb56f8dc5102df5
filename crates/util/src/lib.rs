//! Shared leaf helpers for json-mill.
//!
//! Small free functions with no dependency on the value model: string
//! blankness checks, list joining, decimal rounding and padding, natural
//! float rendering, and `time` format-description compilation.

use time::format_description::OwnedFormatItem;

// ── Strings ───────────────────────────────────────────────────────────────

/// Returns `true` when the string is empty or all whitespace.
///
/// # Example
///
/// ```
/// use json_mill_util::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank("  \t "));
/// assert!(!is_blank(" x "));
/// ```
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Joins stringish items with a separator.
///
/// # Example
///
/// ```
/// use json_mill_util::join;
///
/// assert_eq!(join(["a", "b", "c"], ","), "a,b,c");
/// assert_eq!(join(Vec::<String>::new(), ","), "");
/// ```
pub fn join<I>(items: I, sep: &str) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(item.as_ref());
    }
    out
}

// ── Numbers ───────────────────────────────────────────────────────────────

/// Decimal rounding behavior for formatted numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Away from zero.
    Up,
    /// Toward zero (truncate).
    Down,
    /// Toward positive infinity.
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// Nearest neighbor, ties away from zero.
    #[default]
    HalfUp,
    /// Nearest neighbor, ties toward zero.
    HalfDown,
    /// Nearest neighbor, ties to the even neighbor.
    HalfEven,
}

/// Rounds `value` to `digits` decimal places using `mode`.
///
/// # Example
///
/// ```
/// use json_mill_util::{round_to, RoundingMode};
///
/// assert_eq!(round_to(2.375, 2, RoundingMode::HalfUp), 2.38);
/// assert_eq!(round_to(2.375, 2, RoundingMode::Down), 2.37);
/// assert_eq!(round_to(-2.5, 0, RoundingMode::HalfUp), -3.0);
/// assert_eq!(round_to(2.5, 0, RoundingMode::HalfEven), 2.0);
/// ```
pub fn round_to(value: f64, digits: u32, mode: RoundingMode) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    let rounded = match mode {
        RoundingMode::Up => scaled.abs().ceil().copysign(scaled),
        RoundingMode::Down => scaled.trunc(),
        RoundingMode::Ceiling => scaled.ceil(),
        RoundingMode::Floor => scaled.floor(),
        RoundingMode::HalfUp => (scaled.abs() + 0.5).floor().copysign(scaled),
        RoundingMode::HalfDown => (scaled.abs() - 0.5).ceil().copysign(scaled),
        RoundingMode::HalfEven => scaled.round_ties_even(),
    };
    rounded / scale
}

/// Rounds and zero-pads `value` to exactly `digits` decimal places.
///
/// # Example
///
/// ```
/// use json_mill_util::{format_decimal, RoundingMode};
///
/// assert_eq!(format_decimal(2.5, 2, RoundingMode::HalfUp), "2.50");
/// assert_eq!(format_decimal(2.999, 2, RoundingMode::Down), "2.99");
/// ```
pub fn format_decimal(value: f64, digits: u32, mode: RoundingMode) -> String {
    format!("{:.*}", digits as usize, round_to(value, digits, mode))
}

/// Renders an integer with `digits` zero-padded decimal places.
///
/// # Example
///
/// ```
/// use json_mill_util::format_int_padded;
///
/// assert_eq!(format_int_padded(5, 2), "5.00");
/// assert_eq!(format_int_padded(-3, 0), "-3");
/// ```
pub fn format_int_padded(value: i128, digits: u32) -> String {
    if digits == 0 {
        return value.to_string();
    }
    format!("{value}.{:0>width$}", "", width = digits as usize)
}

/// Natural rendering of a float: integral values keep one decimal place
/// (`1.0`, not `1`), non-finite values render as the JSON `null` literal.
///
/// # Example
///
/// ```
/// use json_mill_util::format_f64;
///
/// assert_eq!(format_f64(1.0), "1.0");
/// assert_eq!(format_f64(3.14), "3.14");
/// assert_eq!(format_f64(f64::NAN), "null");
/// ```
pub fn format_f64(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{value:.1}");
    }
    value.to_string()
}

// ── Dates ─────────────────────────────────────────────────────────────────

/// Compiles a `time` format-description pattern.
///
/// # Example
///
/// ```
/// use json_mill_util::compile_format;
/// use time::macros::date;
///
/// let fmt = compile_format("[year]-[month]-[day]").unwrap();
/// assert_eq!(date!(2024 - 01 - 31).format(&fmt).unwrap(), "2024-01-31");
/// ```
pub fn compile_format(
    pattern: &str,
) -> Result<OwnedFormatItem, time::error::InvalidFormatDescription> {
    time::format_description::parse_owned::<2>(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blankness() {
        assert!(is_blank(""));
        assert!(is_blank(" \n\t"));
        assert!(!is_blank("0"));
    }

    #[test]
    fn join_mixed() {
        assert_eq!(join(["x"], ","), "x");
        assert_eq!(join(["x", "y"], ", "), "x, y");
    }

    #[test]
    fn rounding_modes() {
        assert_eq!(round_to(1.05, 1, RoundingMode::Ceiling), 1.1);
        assert_eq!(round_to(-1.05, 1, RoundingMode::Ceiling), -1.0);
        assert_eq!(round_to(-1.05, 1, RoundingMode::Floor), -1.1);
        assert_eq!(round_to(1.15, 1, RoundingMode::Down), 1.1);
        assert_eq!(round_to(-2.5, 0, RoundingMode::HalfDown), -2.0);
        assert_eq!(round_to(3.5, 0, RoundingMode::HalfEven), 4.0);
    }

    #[test]
    fn decimal_padding() {
        assert_eq!(format_decimal(0.0, 3, RoundingMode::HalfUp), "0.000");
        assert_eq!(format_int_padded(42, 3), "42.000");
        assert_eq!(format_int_padded(7, 0), "7");
    }

    #[test]
    fn natural_floats() {
        assert_eq!(format_f64(-2.0), "-2.0");
        assert_eq!(format_f64(0.5), "0.5");
        assert_eq!(format_f64(f64::INFINITY), "null");
    }

    #[test]
    fn format_compilation() {
        assert!(compile_format("[year]-[month]-[day]").is_ok());
        assert!(compile_format("[bogus]").is_err());
    }
}

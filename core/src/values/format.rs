//! `toString()` for floating point values, following the JVM's rules.
//!
//! Values with magnitude in `[1e-3, 1e7)` print in plain decimal with at least
//! one fractional digit; everything else uses `<mantissa>E<exponent>`.

use alloc::string::String;

pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if value == 0.0 {
        return String::from(if value.is_sign_negative() { "-0.0" } else { "0.0" });
    }
    let magnitude = value.abs();
    if (1e-3..1e7).contains(&magnitude) {
        plain(alloc::format!("{}", value))
    } else {
        scientific(alloc::format!("{:e}", value))
    }
}

pub fn format_float(value: f32) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return String::from(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if value == 0.0 {
        return String::from(if value.is_sign_negative() { "-0.0" } else { "0.0" });
    }
    let magnitude = value.abs();
    if (1e-3..1e7).contains(&magnitude) {
        plain(alloc::format!("{}", value))
    } else {
        scientific(alloc::format!("{:e}", value))
    }
}

fn plain(mut digits: String) -> String {
    if !digits.contains('.') {
        digits.push_str(".0");
    }
    digits
}

fn scientific(digits: String) -> String {
    let (mantissa, exponent) = digits.split_once('e').unwrap_or((&digits, "0"));
    let mut out = String::from(mantissa);
    if !out.contains('.') {
        out.push_str(".0");
    }
    out.push('E');
    out.push_str(exponent);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_range() {
        assert_eq!(format_double(1.0), "1.0");
        assert_eq!(format_double(3.25), "3.25");
        assert_eq!(format_double(-0.5), "-0.5");
        assert_eq!(format_double(1234567.0), "1234567.0");
        assert_eq!(format_double(0.001), "0.001");
    }

    #[test]
    fn test_scientific_range() {
        assert_eq!(format_double(1e7), "1.0E7");
        assert_eq!(format_double(1.5e10), "1.5E10");
        assert_eq!(format_double(1e-4), "1.0E-4");
        assert_eq!(format_double(-2.5e-5), "-2.5E-5");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_double(f64::NAN), "NaN");
        assert_eq!(format_double(f64::INFINITY), "Infinity");
        assert_eq!(format_double(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_double(-0.0), "-0.0");
        assert_eq!(format_float(0.0), "0.0");
    }

    #[test]
    fn test_float_uses_shortest_digits() {
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(2.5), "2.5");
        assert_eq!(format_float(3e9), "3.0E9");
    }
}

//! Numeric literal spelling.

use wgslx_ast::{FloatSuffix, IntSuffix};

pub(crate) fn int_literal(value: i64, suffix: IntSuffix, with_suffix: bool) -> String {
    let suffix = match suffix {
        IntSuffix::None => "",
        IntSuffix::I => "i",
        IntSuffix::U => "u",
    };
    if with_suffix {
        format!("{value}{suffix}")
    } else {
        value.to_string()
    }
}

/// Spells a float literal.
///
/// Precise spelling is the shortest decimal that reads back to the same
/// bits. Approximate spelling rounds to six fractional digits, unless the
/// precise spelling is shorter (large magnitudes).
pub(crate) fn float_literal(
    value: f64,
    suffix: FloatSuffix,
    precise: bool,
    with_suffix: bool,
) -> String {
    let exact = spell(precise_digits(value, suffix, with_suffix));
    let mut text = if precise {
        exact
    } else {
        let fixed = format!("{value:.6}");
        let rounded = spell(fixed.trim_end_matches('0').to_owned());
        if exact.len() < rounded.len() { exact } else { rounded }
    };
    if with_suffix {
        match suffix {
            FloatSuffix::None => {}
            FloatSuffix::F => text.push('f'),
            FloatSuffix::H => text.push('h'),
        }
    }
    text
}

fn precise_digits(value: f64, suffix: FloatSuffix, with_suffix: bool) -> String {
    match suffix {
        FloatSuffix::F => {
            let single = value as f32;
            let digits = format!("{single:?}");
            // Unsuffixed, the digits are read as an abstract float first and
            // only then converted to f32.
            if with_suffix || reads_back_as(&digits, single) {
                digits
            } else {
                format!("{:?}", f64::from(single))
            }
        }
        FloatSuffix::None | FloatSuffix::H => format!("{value:?}"),
    }
}

fn reads_back_as(digits: &str, value: f32) -> bool {
    digits
        .parse::<f64>()
        .is_ok_and(|wide| (wide as f32).to_bits() == value.to_bits())
}

fn spell(digits: String) -> String {
    strip_leading_zero(trim_zero_fraction(digits))
}

/// `2.0` -> `2.`
fn trim_zero_fraction(mut digits: String) -> String {
    if !digits.contains('e') && digits.ends_with(".0") {
        digits.pop();
    }
    digits
}

/// `0.5` -> `.5`; a lone `0.` is kept.
fn strip_leading_zero(digits: String) -> String {
    match digits.strip_prefix("0.") {
        Some(fraction) if !fraction.is_empty() => format!(".{fraction}"),
        _ => digits,
    }
}

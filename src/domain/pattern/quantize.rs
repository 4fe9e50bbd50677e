//! Coordinate parsing and fixed-point formatting

/// Extra digits requested from the formatter beyond the kept precision.
///
/// Doubles near a rounding boundary of two fractional digits differ from the
/// boundary by far more than 10^-40, so the first dropped digit is exact.
const GUARD_DIGITS: usize = 40;

/// Parses a coordinate's wire text as a decimal number.
///
/// Keys must line up with cells already in the store, so the accepted
/// grammar is fixed:
/// - surrounding whitespace is ignored and blank text is `0`;
/// - only `Infinity`, with an optional sign and exact case, is infinite;
/// - `0x`, `0o` and `0b` prefixes select an unsigned integer radix;
/// - anything else that is not a decimal literal is NaN.
pub fn parse_coordinate(text: &str) -> f64 {
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_integer(trimmed) {
        return value;
    }

    // Rust also accepts `inf`, `infinity` and `nan` spellings, which are NaN here
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_integer(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();

    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }

    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &text[2..];

    if digits.is_empty() {
        return Some(f64::NAN);
    }

    Some(
        digits
            .chars()
            .try_fold(0.0_f64, |acc, c| {
                c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
            })
            .unwrap_or(f64::NAN),
    )
}

/// Formats `value` with exactly `digits` fractional digits.
///
/// Rounds half-up on the exact binary value, so `0.005` becomes `0.01` and
/// `0.125` becomes `0.13`. Non-finite values render as `NaN`, `Infinity` and
/// `-Infinity`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }

    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let negative = value < 0.0;
    let exact = format!("{:.*}", digits + GUARD_DIGITS, value.abs());
    let (integer, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let round_up = fraction
        .as_bytes()
        .get(digits)
        .is_some_and(|digit| *digit >= b'5');

    let mut kept: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().take(digits))
        .collect();

    if round_up {
        increment_decimal(&mut kept);
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);

    if negative {
        out.push('-');
    }

    out.extend(kept[..split].iter().map(|digit| *digit as char));

    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|digit| *digit as char));
    }

    out
}

fn increment_decimal(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }

    digits.insert(0, b'1');
}

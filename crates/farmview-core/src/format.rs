//! Cell and column name formatting for rendered tables.

use crate::types::CellValue;

/// Text shown for null or missing values.
pub const NULL_PLACEHOLDER: &str = "N/A";

/// Formats a cell for display.
///
/// Numbers get `,` thousands separators and at most two fraction digits,
/// nulls become [`NULL_PLACEHOLDER`], text is shown as-is.
#[must_use]
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Null => NULL_PLACEHOLDER.to_string(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Text(s) => s.clone(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Json(v) => v.to_string(),
    }
}

/// Formats a number in en-US style with up to two fraction digits.
///
/// Rounding works on the shortest decimal form of the number, halves away
/// from zero, and trailing fraction zeros are dropped: `1234.5` → `1,234.5`,
/// `1.005` → `1.01`, `0.125` → `0.13`. Negative values keep their sign even
/// when they round to zero (`-0.001` → `-0`).
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-∞" } else { "∞" }.to_string();
    }

    let text = n.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(FRACTION_DIGITS))
        .collect();
    if frac_part.as_bytes().get(FRACTION_DIGITS).is_some_and(|d| *d >= b'5') {
        round_up(&mut digits);
    }

    let split = digits.len() - FRACTION_DIGITS;
    let int_digits = String::from_utf8_lossy(&digits[..split]).into_owned();
    let frac_digits = String::from_utf8_lossy(&digits[split..]);
    let frac_digits = frac_digits.trim_end_matches('0');

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if n.is_sign_negative() {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_digits));
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }
    out
}

/// Maximum number of fraction digits shown.
const FRACTION_DIGITS: usize = 2;

/// Adds one unit in the last place of a string of ASCII digits.
fn round_up(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Turns a record key into a column heading.
///
/// Underscores become spaces and each word gets an uppercase first letter;
/// the rest of each word is left untouched (`net_farm_income` →
/// `Net Farm Income`).
#[must_use]
pub fn format_column_name(name: &str) -> String {
    name.replace('_', " ")
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

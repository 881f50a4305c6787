//! ISBN-10 / ISBN-13 checksum validation.
//!
//! [`is_valid`] is a plain predicate with no framework attached, so any layer
//! can call it. Presence is a separate concern: an absent or blank value is
//! reported as valid here and must be rejected by the caller's "required"
//! check when the field is mandatory.

/// Whether `value` is a checksum-valid ISBN-10 or ISBN-13.
///
/// Hyphens and whitespace are ignored. `None`, `""` and whitespace-only
/// input return `true`.
#[must_use]
pub fn is_valid(value: Option<&str>) -> bool {
    let Some(value) = value else {
        return true;
    };
    if value.trim().is_empty() {
        return true;
    }

    let chars = normalize(value);
    match chars.len() {
        10 => is_valid_isbn10(&chars),
        13 => is_valid_isbn13(&chars),
        _ => false,
    }
}

/// Drop separators, keeping only the significant characters.
fn normalize(value: &str) -> Vec<char> {
    value
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Weights run 10 down to 2 over the first nine digits; the check character
/// may be `X` (worth 10). The weighted total must be a multiple of 11.
fn is_valid_isbn10(chars: &[char]) -> bool {
    let (body, check) = chars.split_at(9);

    let mut sum = 0;
    for (c, weight) in body.iter().zip((2..=10).rev()) {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += digit * weight;
    }

    let check = match check[0] {
        'X' | 'x' => 10,
        c => match c.to_digit(10) {
            Some(digit) => digit,
            None => return false,
        },
    };

    (sum + check).is_multiple_of(11)
}

/// Alternating 1/3 weights over the first twelve digits; the thirteenth
/// digit must equal `(10 - sum % 10) % 10`.
fn is_valid_isbn13(chars: &[char]) -> bool {
    let mut digits = [0_u32; 13];
    for (slot, c) in digits.iter_mut().zip(chars) {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        *slot = digit;
    }

    let sum: u32 = digits[..12]
        .iter()
        .enumerate()
        .map(|(i, d)| if i.is_multiple_of(2) { *d } else { d * 3 })
        .sum();

    digits[12] == (10 - sum % 10) % 10
}

/// Parse the leading integer of a form value.
///
/// Leading whitespace and a single sign are accepted, parsing stops at the
/// first non-digit, and anything after it is ignored: `"42"`, `" 42 "` and
/// `"42.9€"` all yield `42`. A `0x`/`0X` prefix switches to base 16, so
/// `"0x10"` is `16`. Returns `None` when no digit is found or the value does
/// not fit in an `i64`.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let digits_len = rest
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = i64::from_str_radix(&rest[..digits_len], radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

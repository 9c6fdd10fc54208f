//! Parsing of human-formatted quantities such as `"1.5M"`, `"10K"`, `"1.4万"`
//! or `"チャンネル登録者数 1.57万人"` into integers.
//!
//! Parsing never fails: anything that does not contain a number yields `0`,
//! which callers treat as "unknown".

use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::normalize_text;

/// Label tokens stripped before suffix detection. Several of them contain
/// letters that would otherwise be read as a multiplier (`subscribers` has a
/// `b`, `likes` has a `k`).
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)チャンネル登録者数|登録者数|登録者|subscribers?|followers?|following|フォロワー|フォロー中|件のポスト|ポスト|posts?|本の動画|videos?|likes?|いいね|人",
    )
    .expect("valid label regex")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid number regex"));

/// Multiplier suffixes in precedence order. Only the first one present in
/// the string is applied.
const SUFFIXES: [(&[char], u64); 5] = [
    (&['万'], 10_000),
    (&['K', 'k'], 1_000),
    (&['M', 'm'], 1_000_000),
    (&['B', 'b'], 1_000_000_000),
    (&['億'], 100_000_000),
];

/// Maximum number of fractional digits considered; more precision than this
/// cannot change the floored result for any supported multiplier.
const MAX_FRACTION_DIGITS: usize = 18;

/// Parses a human-formatted count into an integer, returning `0` for empty,
/// absent, or non-numeric input.
///
/// When several number/suffix pairs appear (`"1.2万人 / 300 Followers"`), the
/// first suffix by precedence and the first number are used.
#[must_use]
pub fn parse_count(text: &str) -> u64 {
    let normalized = normalize_text(text).replace(',', "");
    if normalized.is_empty() {
        return 0;
    }

    let mut remainder = LABEL_RE.replace_all(&normalized, " ").into_owned();

    let mut multiplier = 1u64;
    for (chars, factor) in SUFFIXES {
        if remainder.contains(chars) {
            multiplier = factor;
            remainder = remainder.replace(chars, "");
            break;
        }
    }

    let Some(number) = NUMBER_RE.find(&remainder) else {
        return 0;
    };

    scale_decimal(number.as_str(), multiplier)
}

/// Computes `floor(decimal * multiplier)` with integer arithmetic so values
/// like `4.35万` do not land one below the expected result.
fn scale_decimal(decimal: &str, multiplier: u64) -> u64 {
    let (int_part, frac_part) = decimal.split_once('.').unwrap_or((decimal, ""));

    let Ok(int_value) = int_part.parse::<u128>() else {
        return 0;
    };

    let frac_digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
    let frac_value = if frac_digits.is_empty() {
        0
    } else {
        frac_digits.parse::<u128>().unwrap_or(0)
    };
    #[allow(clippy::cast_possible_truncation)]
    let scale = 10u128.pow(frac_digits.len() as u32);

    let multiplier = u128::from(multiplier);
    let whole = int_value.saturating_mul(multiplier);
    let fraction = frac_value.saturating_mul(multiplier) / scale;

    u64::try_from(whole.saturating_add(fraction)).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;

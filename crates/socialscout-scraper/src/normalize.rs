//! Text and company-name normalization.
//!
//! All comparisons between a company name and page content go through
//! [`contains_name`], which folds width, case, and whitespace so that
//! `"ＡＢＣ 商事"` matches `"abc商事"`.

use unicode_normalization::UnicodeNormalization;

/// Legal-entity designators stripped from company names. Parenthesized
/// forms use ASCII parentheses because input is NFKC-normalized first.
const ENTITY_DESIGNATORS: [&str; 4] = ["株式会社", "有限会社", "合同会社", "(株)"];

/// Applies NFKC compatibility normalization and trims surrounding whitespace.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_string()
}

/// Reduces a company name to its core for matching: NFKC-normalized, with
/// legal-entity designators removed wherever they appear.
///
/// `"株式会社テスト"`, `"(株)テスト"` and `"（株）テスト"` all become `"テスト"`.
#[must_use]
pub fn normalize_company_name(name: &str) -> String {
    let mut core = normalize_text(name);
    for designator in ENTITY_DESIGNATORS {
        core = core.replace(designator, "");
    }
    core.trim().to_string()
}

/// Returns `true` when `core_name` occurs in `haystack` after both are
/// NFKC-normalized, lowercased, and stripped of all whitespace.
///
/// An empty core name never matches.
#[must_use]
pub fn contains_name(haystack: &str, core_name: &str) -> bool {
    let needle = fold(core_name);
    if needle.is_empty() {
        return false;
    }
    fold(haystack).contains(&needle)
}

fn fold(text: &str) -> String {
    text.nfkc()
        .flat_map(char::to_lowercase)
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

use super::*;

// -----------------------------------------------------------------------
// parse_count: plain numbers
// -----------------------------------------------------------------------

#[test]
fn empty_string_is_zero() {
    assert_eq!(parse_count(""), 0);
}

#[test]
fn whitespace_only_is_zero() {
    assert_eq!(parse_count("   "), 0);
}

#[test]
fn thousands_separator_is_removed() {
    assert_eq!(parse_count("1,744"), 1744);
}

#[test]
fn full_width_digits_are_normalized() {
    assert_eq!(parse_count("１，２３４"), 1234);
}

#[test]
fn non_numeric_text_is_zero() {
    assert_eq!(parse_count("Followers"), 0);
    assert_eq!(parse_count("N/A"), 0);
}

// -----------------------------------------------------------------------
// parse_count: suffixes
// -----------------------------------------------------------------------

#[test]
fn man_suffix_multiplies_by_ten_thousand() {
    assert_eq!(parse_count("1.4万"), 14_000);
}

#[test]
fn k_suffix_multiplies_by_thousand() {
    assert_eq!(parse_count("10K"), 10_000);
    assert_eq!(parse_count("2.5k"), 2_500);
}

#[test]
fn m_suffix_multiplies_by_million() {
    assert_eq!(parse_count("1.5M"), 1_500_000);
}

#[test]
fn b_suffix_multiplies_by_billion() {
    assert_eq!(parse_count("2B"), 2_000_000_000);
}

#[test]
fn oku_suffix_multiplies_by_hundred_million() {
    assert_eq!(parse_count("1.2億"), 120_000_000);
}

#[test]
fn fractional_result_is_floored() {
    assert_eq!(parse_count("1.2345K"), 1234);
}

#[test]
fn decimal_math_is_exact() {
    assert_eq!(parse_count("4.35万"), 43_500);
    assert_eq!(parse_count("1.1M"), 1_100_000);
}

#[test]
fn man_takes_precedence_over_latin_suffix() {
    assert_eq!(parse_count("1.2万 K"), 12_000);
}

// -----------------------------------------------------------------------
// parse_count: labels
// -----------------------------------------------------------------------

#[test]
fn youtube_japanese_subscriber_label() {
    assert_eq!(parse_count("チャンネル登録者数 1.57万人"), 15_700);
}

#[test]
fn english_subscriber_label_does_not_trigger_billion() {
    assert_eq!(parse_count("1.2K subscribers"), 1_200);
    assert_eq!(parse_count("532 subscribers"), 532);
}

#[test]
fn follower_label_is_ignored() {
    assert_eq!(parse_count("3,210 Followers"), 3_210);
    assert_eq!(parse_count("フォロワー 987人"), 987);
}

#[test]
fn likes_label_does_not_trigger_thousand() {
    assert_eq!(parse_count("45 likes"), 45);
}

#[test]
fn post_labels_are_ignored() {
    assert_eq!(parse_count("1,024 posts"), 1_024);
    assert_eq!(parse_count("12件のポスト"), 12);
    assert_eq!(parse_count("340本の動画"), 340);
}

#[test]
fn first_number_wins_when_several_present() {
    assert_eq!(parse_count("120 posts 3,400 followers"), 120);
}

#[test]
fn huge_values_saturate() {
    assert_eq!(parse_count("99999999999999999999999B"), u64::MAX);
}

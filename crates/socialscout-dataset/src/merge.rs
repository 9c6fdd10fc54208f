//! Folds per-platform output files back into the base dataset.

use std::collections::{HashMap, HashSet};

use socialscout_core::ColumnNames;

use crate::dataset::Dataset;

/// Counters reported after merging one platform file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Base rows whose name was found in the platform file.
    pub matched: usize,
    /// Cells overwritten with a different non-empty platform value.
    pub updated: usize,
    /// Distinct platform names absent from the base.
    pub unmatched: usize,
}

/// Copies the profile columns of `platform_ds` into `base` by company name.
///
/// A non-empty platform value overwrites the base cell; empty values leave
/// the base untouched. When a name repeats in the platform file its first
/// row wins. Missing columns are appended to `base`.
pub fn merge_platform(base: &mut Dataset, platform_ds: &Dataset, cols: &ColumnNames) -> MergeStats {
    base.ensure_column(&cols.profile_url);
    base.ensure_column(&cols.follower_count);

    let mut by_name: HashMap<String, usize> = HashMap::new();
    for row in 0..platform_ds.len() {
        if let Some(name) = trimmed_name(platform_ds, row, cols) {
            by_name.entry(name).or_insert(row);
        }
    }

    let mut stats = MergeStats::default();
    let mut base_names = HashSet::new();
    for row in 0..base.len() {
        let Some(name) = trimmed_name(base, row, cols) else {
            continue;
        };
        let source_row = by_name.get(&name).copied();
        base_names.insert(name);
        let Some(source_row) = source_row else {
            continue;
        };
        stats.matched += 1;

        for column in [&cols.profile_url, &cols.follower_count] {
            let value = platform_ds.get(source_row, column).unwrap_or("").trim();
            if value.is_empty() || base.get(row, column) == Some(value) {
                continue;
            }
            base.set(row, column, value);
            stats.updated += 1;
        }
    }

    stats.unmatched = by_name
        .keys()
        .filter(|name| !base_names.contains(*name))
        .count();
    stats
}

fn trimmed_name(dataset: &Dataset, row: usize, cols: &ColumnNames) -> Option<String> {
    dataset
        .get(row, &cols.company_name)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use socialscout_core::Platform;

    use super::*;

    fn base() -> Dataset {
        Dataset::from_csv_str(
            "company_name,website_url,x_url,x_followers\n\
             Alpha,https://alpha.jp,https://x.com/old,5\n\
             Beta,https://beta.jp,,\n\
             Gamma,,https://x.com/gamma,40\n",
        )
        .unwrap()
    }

    #[test]
    fn non_empty_platform_values_overwrite_base() {
        let platform = Dataset::from_csv_str(
            "company_name,website_url,x_url,x_followers\n\
             Alpha,,https://x.com/alpha,120\n\
             Beta,,https://x.com/beta,0\n\
             Gamma,,,\n",
        )
        .unwrap();
        let mut base = base();
        let stats = merge_platform(&mut base, &platform, &Platform::X.default_columns());

        assert_eq!(base.get(0, "x_url"), Some("https://x.com/alpha"));
        assert_eq!(base.get(0, "x_followers"), Some("120"));
        assert_eq!(base.get(1, "x_followers"), Some("0"));
        assert_eq!(base.get(2, "x_url"), Some("https://x.com/gamma"));
        assert_eq!(stats.matched, 3);
        assert_eq!(stats.updated, 4);
        assert_eq!(stats.unmatched, 0);
    }

    #[test]
    fn first_duplicate_wins_and_unknown_names_are_counted() {
        let platform = Dataset::from_csv_str(
            "company_name,tiktok_url,tiktok_followers\n\
             Beta,https://www.tiktok.com/@beta,10\n\
             Beta,https://www.tiktok.com/@other,99\n\
             Omega,https://www.tiktok.com/@omega,1\n",
        )
        .unwrap();
        let mut base = base();
        let stats = merge_platform(&mut base, &platform, &Platform::Tiktok.default_columns());

        assert_eq!(base.get(1, "tiktok_url"), Some("https://www.tiktok.com/@beta"));
        assert_eq!(base.get(0, "tiktok_url"), Some(""));
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.unmatched, 1);
    }

    #[test]
    fn names_are_compared_after_trimming() {
        let platform = Dataset::from_csv_str(
            "company_name,x_url,x_followers\n Beta ,https://x.com/beta,7\n",
        )
        .unwrap();
        let mut base = base();
        merge_platform(&mut base, &platform, &Platform::X.default_columns());
        assert_eq!(base.get(1, "x_followers"), Some("7"));
    }
}

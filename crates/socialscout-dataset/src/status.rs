//! Progress statistics for one platform's dataset.

use socialscout_core::{ColumnNames, CompanyRecord};

use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub total: usize,
    pub done: usize,
    pub remaining: usize,
    /// Zero-based row index and record of the next pending rows.
    pub next: Vec<(usize, CompanyRecord)>,
}

/// Counts named rows with and without a profile URL and lists up to
/// `next_count` pending rows in row order. Nameless rows are never
/// processed and are left out of every counter.
#[must_use]
pub fn status(dataset: &Dataset, cols: &ColumnNames, next_count: usize) -> StatusReport {
    let mut report = StatusReport {
        total: 0,
        done: 0,
        remaining: 0,
        next: Vec::new(),
    };

    for row in 0..dataset.len() {
        let Some(record) = dataset.record(row, cols) else {
            continue;
        };
        if !record.has_name() {
            continue;
        }
        report.total += 1;
        if record.has_profile() {
            report.done += 1;
        } else {
            report.remaining += 1;
            if report.next.len() < next_count {
                report.next.push((row, record));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use socialscout_core::Platform;

    use super::*;

    #[test]
    fn counts_done_and_remaining() {
        let ds = Dataset::from_csv_str(
            "company_name,youtube_url,youtube_subscribers\n\
             A,https://www.youtube.com/@a,10\n\
             B,,\n\
             ,,\n\
             C,,\n\
             D,,\n",
        )
        .unwrap();
        let report = status(&ds, &Platform::Youtube.default_columns(), 2);

        assert_eq!(report.total, 4);
        assert_eq!(report.done, 1);
        assert_eq!(report.remaining, 3);
        let next: Vec<(usize, &str)> = report
            .next
            .iter()
            .map(|(row, r)| (*row, r.company_name.as_str()))
            .collect();
        assert_eq!(next, [(1, "B"), (3, "C")]);
    }

    #[test]
    fn empty_dataset_reports_zeroes() {
        let ds = Dataset::from_csv_str("company_name\n").unwrap();
        let report = status(&ds, &Platform::X.default_columns(), 5);
        assert_eq!(report.total, 0);
        assert!(report.next.is_empty());
    }
}

use std::sync::atomic::{AtomicBool, Ordering};

use socialscout_core::RunMode;
use socialscout_dataset::{Dataset, DatasetError};
use socialscout_scraper::{
    CandidateSource, PageFetcher, ProfileValidator, SearchBackend, ValidationOutcome,
};

use super::{CheckpointSink, RowOutcome, RunConfig, RunSummary};

/// Resolves dataset rows one at a time for a single platform.
pub(crate) struct RowProcessor<'a, S, F> {
    config: &'a RunConfig,
    source: CandidateSource<'a, S, F>,
    fetcher: &'a F,
    validator: ProfileValidator,
}

impl<'a, S, F> RowProcessor<'a, S, F>
where
    S: SearchBackend,
    F: PageFetcher,
{
    pub(crate) fn new(config: &'a RunConfig, search: &'a S, fetcher: &'a F) -> Self {
        Self {
            config,
            source: CandidateSource::new(config.platform, search, fetcher)
                .with_official_site_scan(config.scan_official_site),
            fetcher,
            validator: ProfileValidator::new(config.platform)
                .with_threshold(config.post_count_threshold),
        }
    }

    /// Processes rows from the configured start offset until the end of the
    /// dataset or until `stop` is observed between rows.
    ///
    /// The dataset is persisted after every `checkpoint_interval` processed
    /// rows and exactly once more when the loop ends, whether it finished,
    /// was interrupted, or hit a checkpoint failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`DatasetError`] raised by `sink`, after a final
    /// best-effort persist.
    pub(crate) async fn run<C: CheckpointSink>(
        &self,
        dataset: &mut Dataset,
        sink: &mut C,
        stop: &AtomicBool,
    ) -> Result<RunSummary, DatasetError> {
        let platform = self.config.platform;
        let interval = self.config.checkpoint_interval.max(1);
        let start = self.config.start_offset.min(dataset.len());
        let mut summary = RunSummary::default();
        let mut since_checkpoint = 0usize;

        tracing::info!(
            %platform,
            mode = %self.config.mode,
            start,
            rows = dataset.len(),
            threshold = self.validator.threshold(),
            "run started"
        );

        for row in start..dataset.len() {
            if stop.load(Ordering::SeqCst) {
                tracing::warn!(%platform, row, "interrupt received; stopping before next row");
                summary.interrupted = true;
                break;
            }

            let outcome = self.process_row(dataset, row).await;
            summary.record(outcome);
            if !outcome.is_processed() {
                continue;
            }

            since_checkpoint += 1;
            if since_checkpoint >= interval {
                if let Err(e) = sink.persist(dataset) {
                    tracing::error!(%platform, row, error = %e, "checkpoint failed");
                    final_persist(sink, dataset);
                    return Err(e);
                }
                summary.checkpoints += 1;
                since_checkpoint = 0;
                tracing::info!(%platform, row, processed = summary.processed, "checkpoint saved");
            }
        }

        if let Err(e) = sink.persist(dataset) {
            tracing::error!(%platform, error = %e, "final save failed");
            return Err(e);
        }

        tracing::info!(
            %platform,
            processed = summary.processed,
            accepted = summary.accepted(),
            unresolved = summary.unresolved,
            interrupted = summary.interrupted,
            "run finished"
        );
        Ok(summary)
    }

    /// Runs the Skip / Verify / Search state machine for one row and writes
    /// the result back into `dataset`.
    pub(crate) async fn process_row(&self, dataset: &mut Dataset, row: usize) -> RowOutcome {
        let cols = &self.config.columns;
        let Some(record) = dataset.record(row, cols) else {
            return RowOutcome::Skipped;
        };
        if !record.has_name() {
            tracing::debug!(row, "skipping row without company name");
            return RowOutcome::Skipped;
        }

        let name = record.company_name.as_str();
        let website = record.website_url.as_deref();
        let mut rejected_url = None;

        if let Some(existing) = record.profile_url.as_deref() {
            if self.config.mode == RunMode::Fill {
                return RowOutcome::AlreadyResolved;
            }
            let outcome = self.check(existing, name, website).await;
            if outcome.accepted {
                dataset.write_profile(row, cols, &outcome.resolved_url, outcome.follower_count);
                tracing::info!(
                    row,
                    company = name,
                    url = %outcome.resolved_url,
                    followers = outcome.follower_count,
                    "recorded profile verified"
                );
                return RowOutcome::Verified;
            }
            tracing::info!(row, company = name, url = existing, "recorded profile rejected; searching");
            rejected_url = Some(outcome.resolved_url);
        }

        match self.search(name, website, rejected_url.as_deref()).await {
            Some(outcome) => {
                dataset.write_profile(row, cols, &outcome.resolved_url, outcome.follower_count);
                tracing::info!(
                    row,
                    company = name,
                    url = %outcome.resolved_url,
                    followers = outcome.follower_count,
                    "profile found"
                );
                RowOutcome::Found
            }
            None => {
                dataset.clear_profile(row, cols);
                tracing::info!(row, company = name, "no profile accepted");
                RowOutcome::Unresolved
            }
        }
    }

    async fn check(&self, url: &str, name: &str, website: Option<&str>) -> ValidationOutcome {
        let fetched = self.fetcher.load(url).await;
        self.validator.validate_fetch(&fetched, name, website)
    }

    /// Validates candidates in order and returns the first accepted one.
    /// `skip` is a URL already rejected for this row.
    async fn search(
        &self,
        name: &str,
        website: Option<&str>,
        skip: Option<&str>,
    ) -> Option<ValidationOutcome> {
        let candidates = self.source.candidates(name, website).await;
        for candidate in candidates {
            if skip == Some(candidate.url.as_str()) {
                continue;
            }
            let outcome = self.check(&candidate.url, name, website).await;
            if outcome.accepted {
                return Some(outcome);
            }
        }
        None
    }
}

fn final_persist<C: CheckpointSink>(sink: &mut C, dataset: &Dataset) {
    if let Err(e) = sink.persist(dataset) {
        tracing::error!(error = %e, "final save after checkpoint failure also failed");
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;

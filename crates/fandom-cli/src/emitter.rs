use fandom_core::{JobSummary, ProfileRecord, RuntimeConfig};
use fandom_dataset::{ApiDatasetSink, LocalDatasetSink, RecordSink};

/// Hands records to the configured sink and keeps the run totals.
///
/// Sink failures are logged and never abort the run.
pub(crate) struct Emitter {
    sink: Option<Box<dyn RecordSink>>,
    summary: JobSummary,
}

impl Emitter {
    pub(crate) fn new(sink: Option<Box<dyn RecordSink>>) -> Self {
        match &sink {
            Some(sink) => tracing::info!(sink = %sink.describe(), "record sink configured"),
            None => tracing::info!("no dataset configured; records will not be stored"),
        }
        Self {
            sink,
            summary: JobSummary::default(),
        }
    }

    pub(crate) async fn emit(&mut self, username: &str, record: ProfileRecord) {
        self.summary.records += 1;
        if record.is_failure() {
            self.summary.failed += 1;
        } else {
            self.summary.succeeded += 1;
        }

        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        match sink.push(&record.to_value()).await {
            Ok(()) => {
                self.summary.pushed += 1;
                println!("Pushed record for {username}");
            }
            Err(e) => {
                tracing::warn!(username, error = %e, "failed to push record; continuing");
            }
        }
    }

    pub(crate) fn finalize(self) -> JobSummary {
        let summary = self.summary;
        println!("Completed. Scraped {} profiles.", summary.records);
        tracing::info!(
            records = summary.records,
            succeeded = summary.succeeded,
            failed = summary.failed,
            pushed = summary.pushed,
            "scrape run complete"
        );
        summary
    }
}

/// Picks the sink from the runtime environment.
///
/// A dataset id with an API token pushes to the Apify API. A dataset id on
/// its own writes into local storage. Without a dataset id there is no sink.
pub(crate) fn build_sink(config: &RuntimeConfig) -> Option<Box<dyn RecordSink>> {
    let dataset_id = config.dataset_id.as_deref()?;

    match config.apify_token.as_deref() {
        Some(token) => match ApiDatasetSink::with_base_url(
            token,
            dataset_id,
            config.request_timeout_secs,
            &config.apify_api_base_url,
        ) {
            Ok(sink) => Some(Box::new(sink)),
            Err(e) => {
                tracing::warn!(error = %e, dataset_id, "could not build dataset sink; records will not be stored");
                None
            }
        },
        None => Some(Box::new(LocalDatasetSink::new(
            config.local_dataset_dir(dataset_id),
        ))),
    }
}

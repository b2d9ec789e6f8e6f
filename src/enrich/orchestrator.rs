use crate::config::EnrichmentConfig;
use crate::enrich::EnrichmentKind;
use crate::fetch::Fetcher;
use crate::record::{MergePolicy, Record};
use crate::{OtakuError, Result};
use futures::stream::{self, StreamExt};

/// Options for one enrichment call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    /// How detail fields are merged into records that already have them
    pub merge_policy: MergePolicy,

    /// Return the first failure once every fetch has settled
    pub raise_on_error: bool,

    /// Maximum number of detail fetches in flight at once
    pub concurrency_limit: usize,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            merge_policy: MergePolicy::KeepExisting,
            raise_on_error: false,
            concurrency_limit: 100,
        }
    }
}

impl EnrichOptions {
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            merge_policy: if config.overwrite_existing {
                MergePolicy::Overwrite
            } else {
                MergePolicy::KeepExisting
            },
            raise_on_error: config.raise_on_error,
            concurrency_limit: config.max_connections,
        }
    }
}

/// Records to enrich with one kind of detail page
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentBatch {
    pub kind: EnrichmentKind,
    pub records: Vec<Record>,
}

impl EnrichmentBatch {
    pub fn new(kind: EnrichmentKind, records: Vec<Record>) -> Self {
        Self { kind, records }
    }
}

/// A record whose detail page could not be fetched
#[derive(Debug)]
pub struct EnrichmentFailure {
    /// Position of the batch in the call
    pub batch: usize,

    /// Position of the record in its batch
    pub index: usize,

    pub kind: EnrichmentKind,

    /// Detail URL, if the record had one
    pub url: Option<String>,

    pub error: OtakuError,
}

/// Outcome of one enrichment call
///
/// Records that failed are returned unchanged. Failures are listed in the
/// order they settled.
#[derive(Debug, Default)]
pub struct EnrichmentReport {
    pub batches: Vec<EnrichmentBatch>,
    pub failures: Vec<EnrichmentFailure>,
}

impl EnrichmentReport {
    /// Number of records that received their detail fields
    pub fn enriched(&self) -> usize {
        self.total() - self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.batches.iter().map(|b| b.records.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Records of every batch, in batch order
    pub fn into_records(self) -> Vec<Record> {
        self.batches
            .into_iter()
            .flat_map(|batch| batch.records)
            .collect()
    }
}

/// Result of one detail fetch
struct Settled {
    batch: usize,
    index: usize,
    outcome: Result<Record>,
}

/// Fans detail-page fetches out over one shared fetch client
///
/// All fetches of a call run concurrently on the calling task, bounded by
/// [`EnrichOptions::concurrency_limit`]. A call returns only after every
/// fetch has settled. One record's failure never affects another's merge.
///
/// # Example
///
/// ```no_run
/// use otakudesu_scraper::config::Config;
/// use otakudesu_scraper::enrich::{EnrichOptions, Enricher, EnrichmentKind};
/// use otakudesu_scraper::{Fetcher, Record};
///
/// # async fn run(records: Vec<Record>) -> otakudesu_scraper::Result<()> {
/// let enricher = Enricher::new(Fetcher::new(&Config::default())?);
/// let records = enricher
///     .enrich_records(records, EnrichmentKind::Anime, &EnrichOptions::default())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Enricher {
    fetcher: Fetcher,
}

impl Enricher {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Enriches every record of every batch in one concurrent scope
    ///
    /// Patches are merged only after all fetches have settled, so the input
    /// records are never touched while requests are in flight.
    ///
    /// # Returns
    ///
    /// * `Ok(EnrichmentReport)` - Enriched batches plus the suppressed failures
    /// * `Err(OtakuError)` - With `raise_on_error`, the first failure to settle
    ///
    /// The batches are consumed, so on `Err` the listing records are lost
    /// along with the enrichment. Clone them first if they are still needed
    /// after a failed call.
    pub async fn enrich(
        &self,
        batches: Vec<EnrichmentBatch>,
        options: &EnrichOptions,
    ) -> Result<EnrichmentReport> {
        let jobs: Vec<_> = batches
            .iter()
            .enumerate()
            .flat_map(|(batch, b)| {
                b.records.iter().enumerate().map(move |(index, record)| {
                    (batch, index, b.kind, record.url().map(str::to_string))
                })
            })
            .collect();

        if jobs.is_empty() {
            return Ok(EnrichmentReport {
                batches,
                failures: Vec::new(),
            });
        }

        tracing::info!(
            "Enriching {} records (limit {})",
            jobs.len(),
            options.concurrency_limit
        );

        let settled: Vec<Settled> = stream::iter(jobs)
            .map(|(batch, index, kind, url)| {
                let fetcher = self.fetcher.clone();
                async move {
                    let outcome = match url {
                        Some(url) => fetcher
                            .fetch_page(&url)
                            .await
                            .map(|body| kind.patch(&body))
                            .map_err(OtakuError::from),
                        None => Err(OtakuError::MissingUrl { kind }),
                    };
                    Settled {
                        batch,
                        index,
                        outcome,
                    }
                }
            })
            .buffer_unordered(options.concurrency_limit.max(1))
            .collect()
            .await;

        let mut report = EnrichmentReport {
            batches,
            failures: Vec::new(),
        };

        for Settled {
            batch,
            index,
            outcome,
        } in settled
        {
            let target = &mut report.batches[batch];
            let kind = target.kind;
            let record = &mut target.records[index];
            match outcome {
                Ok(patch) => {
                    record.merge(patch, options.merge_policy);
                }
                Err(error) => {
                    let url = record.url().map(str::to_string);
                    tracing::warn!(
                        "Failed to enrich {} {}: {}",
                        kind,
                        url.as_deref().unwrap_or("<no url>"),
                        error
                    );
                    report.failures.push(EnrichmentFailure {
                        batch,
                        index,
                        kind,
                        url,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "Enriched {}/{} records",
            report.enriched(),
            report.total()
        );

        if options.raise_on_error && !report.failures.is_empty() {
            let first = report.failures.swap_remove(0);
            return Err(first.error);
        }

        Ok(report)
    }

    /// Enriches one list of records with one kind of detail page
    ///
    /// As with [`Enricher::enrich`], the records are consumed even when the
    /// call fails.
    pub async fn enrich_records(
        &self,
        records: Vec<Record>,
        kind: EnrichmentKind,
        options: &EnrichOptions,
    ) -> Result<Vec<Record>> {
        let report = self
            .enrich(vec![EnrichmentBatch::new(kind, records)], options)
            .await?;
        Ok(report.into_records())
    }
}

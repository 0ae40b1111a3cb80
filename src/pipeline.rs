use std::sync::Arc;

use clap::ValueEnum;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::EnrichError;
use crate::fetch::DocumentFetcher;
use crate::record::CollegeRecord;
use crate::sources::{Site, SourceAdapter};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// One record at a time.
    Sequential,
    /// One task per record; each task still runs its sites back to back.
    FanOut,
}

/// A record after a full pass, with how many fields each site filled.
#[derive(Debug)]
pub struct Outcome {
    pub record: CollegeRecord,
    pub filled: Vec<(Site, usize)>,
}

#[derive(Debug, Default, PartialEq)]
pub struct RunStats {
    pub records: usize,
    pub filled: Vec<(Site, usize)>,
}

impl RunStats {
    fn add(&mut self, outcome: &Outcome) {
        self.records += 1;
        for &(site, n) in &outcome.filled {
            match self.filled.iter_mut().find(|(s, _)| *s == site) {
                Some((_, total)) => *total += n,
                None => self.filled.push((site, n)),
            }
        }
    }
}

/// Runs every adapter over a record in order, then writes it back.
pub struct Enricher<F, S> {
    adapters: Vec<SourceAdapter>,
    fetcher: F,
    store: S,
    write_back: bool,
}

impl<F, S> Enricher<F, S>
where
    F: DocumentFetcher + 'static,
    S: RecordStore + 'static,
{
    /// `adapters` run in the order given; the first one owns shared fields.
    pub fn new(adapters: Vec<SourceAdapter>, fetcher: F, store: S) -> Self {
        Enricher {
            adapters,
            fetcher,
            store,
            write_back: true,
        }
    }

    /// Skip the final patch; records are only returned.
    pub fn dry_run(mut self) -> Self {
        self.write_back = false;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn enrich(&self, mut record: CollegeRecord) -> Result<Outcome, EnrichError> {
        let mut filled = Vec::with_capacity(self.adapters.len());
        for adapter in &self.adapters {
            let n = adapter.enrich(&self.fetcher, &mut record).await?;
            filled.push((adapter.site(), n));
        }

        if self.write_back {
            self.store.patch(&record).await?;
        }
        Ok(Outcome { record, filled })
    }

    /// Enrich every record. The first failure stops the run; records already
    /// written back stay written.
    pub async fn run(
        self: Arc<Self>,
        mode: Mode,
        records: Vec<CollegeRecord>,
        mut on_done: impl FnMut(&Outcome),
    ) -> Result<RunStats, EnrichError> {
        let mut stats = RunStats::default();
        info!(?mode, records = records.len(), "Starting enrichment");

        match mode {
            Mode::Sequential => {
                for record in records {
                    let name = record.name.clone();
                    let outcome = self.enrich(record).await.inspect_err(|e| {
                        error!(college = %name, malformed = e.is_malformed(), "enrichment failed: {}", e);
                    })?;
                    stats.add(&outcome);
                    on_done(&outcome);
                }
            }
            Mode::FanOut => {
                let mut tasks = JoinSet::new();
                for record in records {
                    let this = Arc::clone(&self);
                    tasks.spawn(async move {
                        let name = record.name.clone();
                        this.enrich(record).await.map_err(|e| (name, e))
                    });
                }

                while let Some(joined) = tasks.join_next().await {
                    let outcome = match joined {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err((name, e))) => {
                            error!(college = %name, malformed = e.is_malformed(), "enrichment failed: {}", e);
                            // Dropping the set aborts the tasks still running.
                            return Err(e);
                        }
                        Err(join_err) => std::panic::resume_unwind(join_err.into_panic()),
                    };
                    stats.add(&outcome);
                    on_done(&outcome);
                }
            }
        }

        info!(records = stats.records, "Enrichment complete");
        Ok(stats)
    }
}

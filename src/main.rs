mod coerce;
mod error;
mod fetch;
mod merge;
mod parser;
mod pipeline;
mod ratelimit;
mod record;
mod settings;
mod sources;
mod store;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use fetch::{DocumentFetcher, HttpFetcher};
use pipeline::{Enricher, Mode, Outcome};
use ratelimit::RateLimiter;
use record::CollegeRecord;
use settings::Settings;
use sources::{Site, SourceAdapter};
use store::{AirtableStore, RecordStore};

#[derive(Parser)]
#[command(
    name = "college_enricher",
    about = "Fill Airtable college records from BigFuture and Princeton Review"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich every record that has a site id and write it back
    Run {
        /// Scheduling: one record at a time, or one task per record
        #[arg(short, long, value_enum, default_value = "fan-out")]
        mode: Mode,
        /// Max records to enrich (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print merged records as JSON instead of patching Airtable
        #[arg(long)]
        dry_run: bool,
    },
    /// List the records that would be enriched
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
    /// Fetch one page and show what its site adapter extracts
    Inspect {
        #[arg(short, long, value_enum)]
        site: Site,
        /// The college's id on that site
        #[arg(long)]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Run {
            mode,
            limit,
            dry_run,
        } => run(&settings, mode, limit, dry_run).await,
        Commands::List { limit } => {
            settings.require_airtable()?;
            let records = airtable(&settings).list().await?;
            if records.is_empty() {
                println!("No records with a BigFuture or Princeton Review id.");
                return Ok(());
            }
            print_header();
            for r in records.iter().take(limit) {
                print_row(r);
            }
            println!("\n{} records", records.len());
            Ok(())
        }
        Commands::Inspect { site, id } => {
            let fetcher = HttpFetcher::new(&settings.user_agent)?;
            let html = fetcher
                .fetch(site, id)
                .await
                .with_context(|| format!("Fetching {}", site.page_url(id)))?;

            let mut record = CollegeRecord::default();
            let filled = parser::process_page(site, &html, &mut record).map_err(|m| {
                error::EnrichError::Malformed {
                    site,
                    id,
                    block: m.block,
                    label: m.label,
                    error: m.error,
                }
            })?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            println!("\n{} fields from {} page {}", filled, site, id);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run(
    settings: &Settings,
    mode: Mode,
    limit: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    settings.require_airtable()?;

    let adapters = site_adapters(settings);
    let fetcher = HttpFetcher::new(&settings.user_agent)?;
    let mut enricher = Enricher::new(adapters, fetcher, airtable(settings));
    if dry_run {
        enricher = enricher.dry_run();
    }
    let enricher = Arc::new(enricher);

    let t_list = Instant::now();
    let mut records = enricher
        .store()
        .list()
        .await
        .context("Fetching colleges from Airtable")?;
    if let Some(n) = limit {
        records.truncate(n);
    }
    if records.is_empty() {
        println!("No records with a BigFuture or Princeton Review id.");
        return Ok(());
    }
    println!(
        "Fetched {} colleges from Airtable in {:.2}s",
        records.len(),
        t_list.elapsed().as_secs_f64()
    );

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    println!("Fetching college info...");
    print_header();
    let stats = enricher
        .run(mode, records, |outcome: &Outcome| {
            if dry_run {
                match serde_json::to_string_pretty(&outcome.record) {
                    Ok(json) => pb.println(json),
                    Err(e) => pb.println(format!("{}: {}", outcome.record.name, e)),
                }
            } else {
                pb.println(row(&outcome.record));
            }
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    let stats = stats.context("Enrichment aborted")?;
    let per_site: Vec<String> = stats
        .filled
        .iter()
        .map(|(site, n)| format!("{} {}", n, site))
        .collect();
    println!(
        "{} {} colleges ({} fields filled: {}).",
        if dry_run { "Checked" } else { "Patched" },
        stats.records,
        stats.filled.iter().map(|(_, n)| n).sum::<usize>(),
        per_site.join(", ")
    );
    Ok(())
}

/// One adapter per site, in priority order.
fn site_adapters(settings: &Settings) -> Vec<SourceAdapter> {
    Site::RUN_ORDER
        .iter()
        .map(|&site| SourceAdapter::new(site, RateLimiter::per_second(settings.rps_for(site))))
        .collect()
}

fn airtable(settings: &Settings) -> AirtableStore {
    AirtableStore::new(
        &settings.api_key,
        &settings.base,
        &settings.table,
        RateLimiter::per_second(settings.airtable_rps),
    )
}

fn print_header() {
    println!("{:>40}{:>12}{:>12}", "Name", "BigFuture", "Princeton");
}

fn print_row(c: &CollegeRecord) {
    println!("{}", row(c));
}

fn row(c: &CollegeRecord) -> String {
    let id = |v: Option<u64>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    format!(
        "{:>40}{:>12}{:>12}",
        truncate(&c.name, 40),
        id(c.big_future_id),
        id(c.princeton_review_id)
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

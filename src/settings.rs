use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::sources::Site;

const DEFAULT_USER_AGENT: &str = concat!("college_enricher/", env!("CARGO_PKG_VERSION"));

/// Runtime settings. Layered: defaults, then `enrich.toml` if present, then
/// `AIRTABLE_*` and `ENRICH_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub table: String,
    pub big_future_rps: f64,
    pub princeton_review_rps: f64,
    pub airtable_rps: f64,
    pub user_agent: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let builder = defaults()?
            .add_source(File::with_name("enrich").required(false))
            .add_source(Environment::with_prefix("AIRTABLE").try_parsing(true))
            .add_source(Environment::with_prefix("ENRICH").try_parsing(true));
        build(builder)
    }

    /// Airtable credentials are only needed by commands that touch the table.
    pub fn require_airtable(&self) -> Result<()> {
        for (value, var) in [
            (&self.api_key, "AIRTABLE_API_KEY"),
            (&self.base, "AIRTABLE_BASE"),
            (&self.table, "AIRTABLE_TABLE"),
        ] {
            if value.trim().is_empty() {
                bail!("{} is not set", var);
            }
        }
        Ok(())
    }

    /// Requests per second allowed against `site`.
    pub fn rps_for(&self, site: Site) -> f64 {
        match site {
            Site::BigFuture => self.big_future_rps,
            Site::PrincetonReview => self.princeton_review_rps,
        }
    }

    fn validate(&self) -> Result<()> {
        for (rps, name) in [
            (self.big_future_rps, "big_future_rps"),
            (self.princeton_review_rps, "princeton_review_rps"),
            (self.airtable_rps, "airtable_rps"),
        ] {
            if !(rps.is_finite() && rps > 0.0) {
                bail!("{} must be a positive number, got {}", name, rps);
            }
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("big_future_rps", 2.0)?
        .set_default("princeton_review_rps", 2.0)?
        .set_default("airtable_rps", 5.0)?
        .set_default("user_agent", DEFAULT_USER_AGENT)?)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings> {
    let settings: Settings = builder
        .build()
        .context("Failed to read settings")?
        .try_deserialize()
        .context("Invalid settings")?;
    settings.validate()?;
    Ok(settings)
}

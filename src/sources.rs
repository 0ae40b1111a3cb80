use std::fmt;

use clap::ValueEnum;
use tracing::{debug, info};

use crate::error::EnrichError;
use crate::fetch::DocumentFetcher;
use crate::parser::extract::{big_future, princeton, Field};
use crate::parser::layout::{BlockLayout, HeadingBlocks, LabeledContainers};
use crate::parser::process_page;
use crate::ratelimit::RateLimiter;
use crate::record::CollegeRecord;

const BIG_FUTURE_URL: &str =
    "https://bigfuture.collegeboard.org/college-university-search/print-college-profile?id=";
const PRINCETON_REVIEW_URL: &str = "https://www.princetonreview.com/college/x-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Site {
    BigFuture,
    PrincetonReview,
}

impl Site {
    /// Priority order: earlier sites own any field both can supply.
    pub const RUN_ORDER: [Site; 2] = [Site::BigFuture, Site::PrincetonReview];

    pub fn page_url(self, id: u64) -> String {
        match self {
            Site::BigFuture => format!("{}{}", BIG_FUTURE_URL, id),
            Site::PrincetonReview => format!("{}{}", PRINCETON_REVIEW_URL, id),
        }
    }

    /// The record's id on this site, if it has one.
    pub fn id_of(self, record: &CollegeRecord) -> Option<u64> {
        match self {
            Site::BigFuture => record.big_future_id,
            Site::PrincetonReview => record.princeton_review_id,
        }
    }

    pub fn layout(self) -> &'static dyn BlockLayout {
        match self {
            Site::BigFuture => &HeadingBlocks,
            Site::PrincetonReview => &LabeledContainers,
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            Site::BigFuture => big_future::FIELDS,
            Site::PrincetonReview => princeton::FIELDS,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Site::BigFuture => "BigFuture",
            Site::PrincetonReview => "Princeton Review",
        })
    }
}

/// One site's extraction step: pace, fetch, parse, fill.
pub struct SourceAdapter {
    site: Site,
    limiter: RateLimiter,
}

impl SourceAdapter {
    pub fn new(site: Site, limiter: RateLimiter) -> Self {
        debug!(%site, interval_ms = limiter.interval().as_millis() as u64, "adapter ready");
        SourceAdapter { site, limiter }
    }

    pub fn site(&self) -> Site {
        self.site
    }

    /// Fill the record's unset fields from this site's page. Returns how many
    /// fields were written; a record without an id for this site is left as is.
    pub async fn enrich<F: DocumentFetcher>(
        &self,
        fetcher: &F,
        record: &mut CollegeRecord,
    ) -> Result<usize, EnrichError> {
        let site = self.site;
        let Some(id) = site.id_of(record) else {
            debug!(%site, college = %record.name, "no id, skipping");
            return Ok(0);
        };

        self.limiter.acquire().await;
        let html = fetcher
            .fetch(site, id)
            .await
            .map_err(|error| EnrichError::Transport { site, id, error })?;

        let filled = process_page(site, &html, record).map_err(|m| EnrichError::Malformed {
            site,
            id,
            block: m.block,
            label: m.label,
            error: m.error,
        })?;

        info!(%site, id, college = %record.name, filled, "extracted");
        Ok(filled)
    }
}

use thiserror::Error;

use crate::sources::Site;

/// Something wrong with a single descriptor line or value. A field that is
/// simply missing is not a `FieldError`; those come back as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("line with multiple ':': {line:?}")]
    MultipleColons { line: String },
    #[error("couldn't parse number from {raw:?}")]
    NotANumber { raw: String },
    #[error("couldn't parse deadline from {raw:?}")]
    BadDeadline { raw: String },
    #[error("couldn't split range {raw:?} into low - high")]
    BadRange { raw: String },
}

/// Failure while enriching one record. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The page no longer matches the adapter's field table.
    #[error("{site} page {id}: malformed '{label}' in block '{block}': {error}")]
    Malformed {
        site: Site,
        id: u64,
        block: &'static str,
        label: &'static str,
        #[source]
        error: FieldError,
    },
    #[error("{site} page {id}: {error}")]
    Transport {
        site: Site,
        id: u64,
        #[source]
        error: FetchError,
    },
    #[error("record store: {0}")]
    Store(#[from] StoreError),
}

impl EnrichError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, EnrichError::Malformed { .. })
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("airtable: {kind}: {message}")]
    Api { kind: String, message: String },
    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),
}

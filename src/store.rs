use std::future::Future;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::ratelimit::RateLimiter;
use crate::record::CollegeRecord;

const API_ROOT: &str = "https://api.airtable.com/v0";

/// Only records that some site can enrich.
pub const ENRICHABLE_FILTER: &str =
    "OR(NOT({_big_future_id} = ''), NOT({_princeton_review_id} = ''))";

/// The system of record for colleges.
pub trait RecordStore: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<CollegeRecord>, StoreError>> + Send;
    fn patch(&self, record: &CollegeRecord) -> impl Future<Output = Result<(), StoreError>> + Send;
}

pub struct AirtableStore {
    client: reqwest::Client,
    api_key: String,
    table_url: String,
    limiter: RateLimiter,
}

impl AirtableStore {
    pub fn new(api_key: &str, base: &str, table: &str, limiter: RateLimiter) -> Self {
        AirtableStore {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            table_url: format!("{}/{}/{}", API_ROOT, base, table),
            limiter,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, StoreError> {
        self.limiter.acquire().await;
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        Ok(body)
    }
}

impl RecordStore for AirtableStore {
    async fn list(&self) -> Result<Vec<CollegeRecord>, StoreError> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&self.table_url)
                .query(&[("filterByFormula", ENRICHABLE_FILTER)]);
            if let Some(offset) = &offset {
                request = request.query(&[("offset", offset)]);
            }

            let page = parse_page(&self.send(request).await?)?;
            debug!(count = page.records.len(), more = page.offset.is_some(), "fetched record page");
            records.extend(page.records.into_iter().map(Envelope::into_record));

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        info!("Loaded {} records from Airtable", records.len());
        Ok(records)
    }

    async fn patch(&self, record: &CollegeRecord) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.table_url, record.id);
        let request = self.client.patch(&url).json(&PatchBody { fields: record });
        self.send(request).await?;
        debug!(id = %record.id, "patched");
        Ok(())
    }
}

#[derive(Serialize)]
struct PatchBody<'a> {
    fields: &'a CollegeRecord,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    records: Vec<Envelope>,
    offset: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    id: String,
    #[serde(default)]
    fields: CollegeRecord,
}

impl Envelope {
    fn into_record(self) -> CollegeRecord {
        CollegeRecord {
            id: self.id,
            ..self.fields
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ApiError,
}

/// Airtable reports errors either as `{"type", "message"}` or a bare code.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiError {
    Detailed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: String,
    },
    Code(String),
}

fn parse_page(body: &str) -> Result<Page, StoreError> {
    Ok(serde_json::from_str(body)?)
}

fn api_error(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error: ApiError::Detailed { kind, message },
        }) => StoreError::Api { kind, message },
        Ok(ErrorBody {
            error: ApiError::Code(kind),
        }) => StoreError::Api {
            kind,
            message: status.to_string(),
        },
        Err(_) => StoreError::Api {
            kind: status.to_string(),
            message: body.trim().to_string(),
        },
    }
}

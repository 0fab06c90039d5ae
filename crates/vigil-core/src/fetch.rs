//! HTTP fetchers for the two backend endpoints.
//!
//! Both clients issue a single GET per poll and parse a
//! `{success, data}` envelope. The tri-state result encodes the error
//! policy: `Err` for transport/status/parse failures (logged by the
//! caller, prior state retained), `Ok(None)` for an unsuccessful or
//! incomplete envelope (no-op), `Ok(Some)` for a fresh snapshot. There is
//! no retry or backoff; the next scheduled tick retries naturally.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::config::VigilConfig;
use crate::error::{Result, VigilError};
use crate::types::{slugify, Entity, EntityId, EntityKind};

/// A fresh wholesale replacement for one entity slice.
pub type Snapshot = BTreeMap<EntityId, Entity>;

fn build_http_client(config: &VigilConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| VigilError::internal(format!("failed to create HTTP client: {e}")))
}

async fn get_json<T: serde::de::DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    auth_key: Option<&str>,
) -> Result<T> {
    let mut request = http.get(url);
    if let Some(key) = auth_key {
        request = request.header("Authorization", key);
    }

    let response = request
        .send()
        .await
        .map_err(|e| VigilError::http(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(VigilError::http(url, format!("HTTP status {status}")));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| VigilError::envelope(url, e.to_string()))
}

// =============================================================================
// Live bot status
// =============================================================================

#[derive(Debug, Deserialize)]
struct BotEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<BTreeMap<String, BotRecord>>,
}

#[derive(Debug, Deserialize)]
struct BotRecord {
    #[serde(default)]
    status: String,
    #[serde(default)]
    balance: String,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    last_update: String,
    #[serde(default)]
    next_claim_timestamp: i64,
}

/// Fetcher for the live-bot-status endpoint.
///
/// Carries the static credential key as an `Authorization` header when
/// one is configured.
#[derive(Debug, Clone)]
pub struct BotStatusClient {
    http: reqwest::Client,
    url: String,
    auth_key: Option<String>,
}

impl BotStatusClient {
    /// Create a client from config.
    pub fn new(config: &VigilConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            url: config.bot_status_url.clone(),
            auth_key: config.auth_key.clone(),
        })
    }

    /// Fetch the current bot snapshot.
    pub async fn fetch(&self) -> Result<Option<Snapshot>> {
        let envelope: BotEnvelope =
            get_json(&self.http, &self.url, self.auth_key.as_deref()).await?;

        let Some(data) = envelope.data.filter(|_| envelope.success) else {
            debug!(url = %self.url, "bot envelope unsuccessful or missing data, ignoring");
            return Ok(None);
        };

        let snapshot = data
            .into_iter()
            .map(|(id, record)| {
                let entity = Entity {
                    id: id.clone(),
                    kind: EntityKind::Bot,
                    status: record.status,
                    balance: Some(record.balance),
                    level: record.level,
                    url: None,
                    uptime: None,
                    next_action: Some(record.next_claim_timestamp),
                    last_checked: Some(record.last_update),
                };
                (id, entity)
            })
            .collect();

        Ok(Some(snapshot))
    }
}

// =============================================================================
// Site checks
// =============================================================================

#[derive(Debug, Deserialize)]
struct SiteEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Vec<SiteRecord>>,
}

#[derive(Debug, Deserialize)]
struct SiteRecord {
    #[serde(default)]
    site_name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    uptime: String,
    #[serde(default)]
    last_checked: String,
}

/// Fetcher for the uptime/site-check endpoint.
#[derive(Debug, Clone)]
pub struct SiteCheckClient {
    http: reqwest::Client,
    url: String,
}

impl SiteCheckClient {
    /// Create a client from config.
    pub fn new(config: &VigilConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config)?,
            url: config.site_check_url.clone(),
        })
    }

    /// Fetch the current site snapshot.
    ///
    /// Site ids are slugified from the reported name; records whose name
    /// slugifies to nothing are dropped.
    pub async fn fetch(&self) -> Result<Option<Snapshot>> {
        let envelope: SiteEnvelope = get_json(&self.http, &self.url, None).await?;

        let Some(data) = envelope.data.filter(|_| envelope.success) else {
            debug!(url = %self.url, "site envelope unsuccessful or missing data, ignoring");
            return Ok(None);
        };

        let snapshot = data
            .into_iter()
            .filter_map(|record| {
                let id = slugify(&record.site_name);
                if id.is_empty() {
                    debug!(site_name = %record.site_name, "dropping site with empty slug");
                    return None;
                }
                let entity = Entity {
                    id: id.clone(),
                    kind: EntityKind::Site,
                    status: record.status,
                    balance: None,
                    level: None,
                    url: Some(record.url),
                    uptime: Some(record.uptime),
                    next_action: None,
                    last_checked: Some(record.last_checked),
                };
                Some((id, entity))
            })
            .collect();

        Ok(Some(snapshot))
    }
}

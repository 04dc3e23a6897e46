//! Document-store boundary: connection setup plus the translation between
//! in-memory records and stored documents.
//!
//! Timestamps live in the store as ISO-8601 strings. `to_document` rewrites
//! any BSON datetime into its string form before a write; `from_document`
//! canonicalizes `*_at` string fields on the way back so the typed models
//! always see an RFC 3339 value. Unparseable strings are left untouched.

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use mongodb::bson::{doc, Bson, Document};
use mongodb::{Client, Database};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Opens the single store client for the process and returns the database
/// handle that gets cloned into every service.
pub async fn connect(cfg: &AppConfig) -> anyhow::Result<Database> {
    let client = Client::with_uri_str(&cfg.mongo_url)
        .await
        .context("failed to construct MongoDB client")?;
    let db = client.database(&cfg.db_name);

    // The driver connects lazily; ping now so a bad deployment shows up in
    // the logs at startup rather than on the first request.
    match db.run_command(doc! { "ping": 1 }, None).await {
        Ok(_) => info!(db = %cfg.db_name, "connected to MongoDB"),
        Err(err) => warn!(error = %err, "MongoDB ping failed; continuing startup"),
    }

    Ok(db)
}

/// Serializes an entity for storage, with datetimes as ISO-8601 strings.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, ServiceError> {
    let mut document = mongodb::bson::to_document(value)?;
    stringify_datetimes(&mut document);
    Ok(document)
}

/// Deserializes a stored document back into an entity, canonicalizing
/// timestamp strings first.
pub fn from_document<T: DeserializeOwned>(mut document: Document) -> Result<T, ServiceError> {
    revive_timestamps(&mut document);
    Ok(mongodb::bson::from_document(document)?)
}

fn stringify_datetimes(document: &mut Document) {
    for (_, value) in document.iter_mut() {
        match value {
            Bson::DateTime(dt) => {
                if let Some(parsed) = DateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
                {
                    *value = Bson::String(parsed.to_rfc3339_opts(SecondsFormat::Micros, true));
                }
            }
            Bson::Document(inner) => stringify_datetimes(inner),
            Bson::Array(items) => {
                for item in items.iter_mut() {
                    if let Bson::Document(inner) = item {
                        stringify_datetimes(inner);
                    }
                }
            }
            _ => {}
        }
    }
}

fn revive_timestamps(document: &mut Document) {
    for (key, value) in document.iter_mut() {
        match value {
            Bson::String(raw) if key.ends_with("_at") => {
                if let Some(canonical) = canonical_timestamp(raw) {
                    *value = Bson::String(canonical);
                }
            }
            Bson::Document(inner) => revive_timestamps(inner),
            Bson::Array(items) => {
                for item in items.iter_mut() {
                    if let Bson::Document(inner) = item {
                        revive_timestamps(inner);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Accepts RFC 3339 and timezone-naive forms (treated as UTC); `None` when
/// the string is not a timestamp at all.
fn canonical_timestamp(raw: &str) -> Option<String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(
            parsed
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        );
    }
    raw.parse::<NaiveDateTime>()
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).to_rfc3339_opts(SecondsFormat::Micros, true))
}

//! Document backend over a MongoDB collection.
//!
//! # Responsibility
//! - Map the storage contract onto one collection of entry documents.
//! - Keep BSON shapes private to this module.
//!
//! # Invariants
//! - Lookups filter on the application-level `id` field, never on `_id`.
//! - A unique index on `id` exists before the storage is handed out, so
//!   duplicate inserts fail like the relational primary key does.
//! - Timestamps are stored as BSON dates (millisecond precision).

use crate::model::entry::Entry;
use crate::storage::{Storage, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use log::{error, info};
use mongodb::bson::{doc, DateTime as BsonDateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::sync::{Client, Collection};
use mongodb::IndexModel;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_DATABASE: &str = "journal";
pub const DEFAULT_COLLECTION: &str = "entries";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Persisted document shape; `_id` is assigned by the server and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntryDocument {
    id: String,
    title: String,
    content: String,
    created: BsonDateTime,
    updated: BsonDateTime,
}

impl From<&Entry> for EntryDocument {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            content: entry.content.clone(),
            created: to_bson_datetime(entry.created),
            updated: to_bson_datetime(entry.updated),
        }
    }
}

impl TryFrom<EntryDocument> for Entry {
    type Error = StorageError;

    fn try_from(document: EntryDocument) -> Result<Self, Self::Error> {
        let created = from_bson_datetime(document.created, &document.id, "created")?;
        let updated = from_bson_datetime(document.updated, &document.id, "updated")?;
        let entry = Entry {
            id: document.id,
            title: document.title,
            content: document.content,
            created,
            updated,
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// MongoDB-backed entry storage.
pub struct DocumentStorage {
    collection: Collection<EntryDocument>,
}

impl DocumentStorage {
    /// Connects to `uri` and ensures the unique `id` index on the collection.
    ///
    /// # Side effects
    /// - Performs a round trip to the server (index creation).
    /// - Emits `document_open` logging events with duration and status.
    pub fn connect(uri: &str, database: &str, collection: &str) -> StorageResult<Self> {
        let started_at = Instant::now();
        info!(
            "event=document_open module=storage status=start database={database} collection={collection}"
        );

        match Self::try_connect(uri, database, collection) {
            Ok(storage) => {
                info!(
                    "event=document_open module=storage status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(storage)
            }
            Err(err) => {
                error!(
                    "event=document_open module=storage status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn try_connect(uri: &str, database: &str, collection: &str) -> StorageResult<Self> {
        let client = Client::with_uri_str(uri)?;
        let collection = client
            .database(database)
            .collection::<EntryDocument>(collection);

        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index).run()?;

        Ok(Self { collection })
    }
}

impl Storage for DocumentStorage {
    fn create_entry(&self, entry: &Entry) -> StorageResult<()> {
        entry.validate()?;

        self.collection
            .insert_one(EntryDocument::from(entry))
            .run()
            .map_err(|err| map_insert_error(err, &entry.id))?;

        Ok(())
    }

    fn get_entry(&self, id: &str) -> StorageResult<Entry> {
        match self.collection.find_one(id_filter(id)).run()? {
            Some(document) => Entry::try_from(document),
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }

    fn list_entries(&self) -> StorageResult<Vec<Entry>> {
        let cursor = self.collection.find(doc! {}).run()?;
        let mut entries = Vec::new();

        for document in cursor {
            entries.push(Entry::try_from(document?)?);
        }

        Ok(entries)
    }

    fn update_entry(&self, entry: &Entry) -> StorageResult<()> {
        entry.validate()?;

        let result = self
            .collection
            .update_one(id_filter(&entry.id), mutable_fields(entry))
            .run()?;

        if result.matched_count == 0 {
            return Err(StorageError::NotFound(entry.id.clone()));
        }

        Ok(())
    }

    fn delete_entry(&self, id: &str) -> StorageResult<()> {
        let result = self.collection.delete_one(id_filter(id)).run()?;

        if result.deleted_count == 0 {
            return Err(StorageError::NotFound(id.to_string()));
        }

        Ok(())
    }

    /// Upserts one document per entry, in order.
    ///
    /// Every entry is validated before the first write. The writes are not
    /// wrapped in a transaction (standalone servers do not support them), so
    /// a transport failure mid-batch leaves the earlier entries written;
    /// re-running the same import converges because each write is an upsert.
    fn save_entries(&self, entries: &[Entry]) -> StorageResult<()> {
        for entry in entries {
            entry.validate()?;
        }

        for entry in entries {
            self.collection
                .update_one(id_filter(&entry.id), upsert_pipeline(entry))
                .upsert(true)
                .run()?;
        }

        Ok(())
    }
}

fn id_filter(id: &str) -> Document {
    doc! { "id": id }
}

fn mutable_fields(entry: &Entry) -> Document {
    doc! {
        "$set": {
            "title": entry.title.as_str(),
            "content": entry.content.as_str(),
            "updated": to_bson_datetime(entry.updated),
        }
    }
}

/// Upsert as an aggregation pipeline so the stored `created` survives and
/// `updated` never falls below it.
fn upsert_pipeline(entry: &Entry) -> Vec<Document> {
    let created = doc! { "$ifNull": ["$created", to_bson_datetime(entry.created)] };
    vec![doc! {
        "$set": {
            "id": entry.id.as_str(),
            "title": entry.title.as_str(),
            "content": entry.content.as_str(),
            "created": created.clone(),
            "updated": { "$max": [to_bson_datetime(entry.updated), created] },
        }
    }]
}

fn to_bson_datetime(value: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(value.timestamp_millis())
}

fn from_bson_datetime(value: BsonDateTime, id: &str, field: &str) -> StorageResult<DateTime<Utc>> {
    let millis = value.timestamp_millis();
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        StorageError::InvalidData(format!(
            "timestamp `{millis}` out of range in entries.{field} (id `{id}`)"
        ))
    })
}

fn map_insert_error(err: mongodb::error::Error, id: &str) -> StorageError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StorageError::DuplicateKey(id.to_string())
        }
        _ => err.into(),
    }
}

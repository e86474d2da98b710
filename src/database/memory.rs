//! In-memory [`DocumentStore`] that records every call it receives.
//!
//! A record's physical partition is normally derived from its `pk` field, but
//! [`MemoryStore::insert_in_partition`] can place it elsewhere to model documents whose
//! field drifted away from where the store actually keeps them.

use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{self, Bson, Document};
use serde::{de::DeserializeOwned, Serialize};

use super::store::{DocumentStore, Query, SortOrder, StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PointRead { id: String, partition_key: String },
    Query(Query),
    Create { id: String },
    Replace { id: String, partition_key: String },
    Delete { id: String, partition_key: String },
}

struct Record {
    partition: String,
    document: Document,
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<String>>,
}

fn partition_of(document: &Document) -> String {
    match document.get("pk") {
        Some(Bson::String(pk)) => pk.clone(),
        _ => String::new(),
    }
}

fn string_field(document: &Document, field: &str) -> Option<String> {
    match document.get(field) {
        Some(Bson::String(value)) => Some(value.clone()),
        _ => None,
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document in the partition named by its own `pk` field.
    pub fn insert<T: Serialize>(&self, document: &T) {
        let document = bson::to_document(document).expect("serializable document");
        let partition = partition_of(&document);
        self.records.lock().unwrap().push(Record { partition, document });
    }

    /// Stores a document in `partition` regardless of its `pk` field.
    pub fn insert_in_partition<T: Serialize>(&self, partition: &str, document: &T) {
        let document = bson::to_document(document).expect("serializable document");
        self.records.lock().unwrap().push(Record {
            partition: partition.to_string(),
            document,
        });
    }

    /// Every subsequent call fails with a transient error carrying `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn record(&self, call: Call) -> StoreResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(StoreError::Transient(message.clone())),
            None => Ok(()),
        }
    }

    fn decode<T: DeserializeOwned>(document: &Document) -> StoreResult<T> {
        bson::from_document(document.clone()).map_err(|e| StoreError::Transient(e.to_string()))
    }

    fn encode<T: Serialize>(document: &T) -> StoreResult<Document> {
        bson::to_document(document).map_err(|e| StoreError::Transient(e.to_string()))
    }
}

fn is_addressed(record: &Record, id: &str, partition_key: &str) -> bool {
    record.partition == partition_key
        && string_field(&record.document, "id").as_deref() == Some(id)
}

#[async_trait]
impl<T> DocumentStore<T> for MemoryStore
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn point_read(&self, id: &str, partition_key: &str) -> StoreResult<T> {
        self.record(Call::PointRead {
            id: id.to_string(),
            partition_key: partition_key.to_string(),
        })?;

        let records = self.records.lock().unwrap();
        let found = records
            .iter()
            .find(|r| is_addressed(r, id, partition_key))
            .map(|r| Self::decode(&r.document))
            .unwrap_or(Err(StoreError::NotFound));
        found
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<T>> {
        self.record(Call::Query(query.clone()))?;

        let records = self.records.lock().unwrap();
        let mut matches: Vec<&Document> = records
            .iter()
            .map(|r| &r.document)
            .filter(|d| {
                query
                    .conditions
                    .iter()
                    .all(|(field, value)| string_field(d, field).as_deref() == Some(value))
            })
            .collect();

        if let Some((field, order)) = &query.order_by {
            matches.sort_by(|a, b| {
                let ordering = string_field(a, field).cmp(&string_field(b, field));
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let decoded = matches.into_iter().map(Self::decode).collect();
        decoded
    }

    async fn create(&self, document: &T) -> StoreResult<()> {
        let encoded = Self::encode(document)?;
        self.record(Call::Create {
            id: string_field(&encoded, "id").unwrap_or_default(),
        })?;

        let partition = partition_of(&encoded);
        self.records.lock().unwrap().push(Record {
            partition,
            document: encoded,
        });
        Ok(())
    }

    async fn replace(&self, id: &str, partition_key: &str, document: &T) -> StoreResult<T> {
        self.record(Call::Replace {
            id: id.to_string(),
            partition_key: partition_key.to_string(),
        })?;

        let encoded = Self::encode(document)?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| is_addressed(r, id, partition_key))
            .ok_or(StoreError::NotFound)?;
        record.document = encoded;
        Ok(document.clone())
    }

    async fn delete(&self, id: &str, partition_key: &str) -> StoreResult<()> {
        self.record(Call::Delete {
            id: id.to_string(),
            partition_key: partition_key.to_string(),
        })?;

        let mut records = self.records.lock().unwrap();
        let position = records
            .iter()
            .position(|r| is_addressed(r, id, partition_key))
            .ok_or(StoreError::NotFound)?;
        records.remove(position);
        Ok(())
    }
}

//! Document store seam.
//!
//! Every container in the service is reached through [`DocumentStore`]; the MongoDB-backed
//! implementation lives in [`super::container`], a call-recording in-memory one in
//! `super::memory` for tests.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The addressed document does not exist under the given partition.
    #[error("Not found")]
    NotFound,

    /// Any other failure from the backing service. Never retried.
    #[error("{0}")]
    Transient(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Cross-partition predicate: a conjunction of string equalities plus an optional sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub conditions: Vec<(String, String)>,
    pub order_by: Option<(String, SortOrder)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by = Some((field.into(), order));
        self
    }
}

#[async_trait]
pub trait DocumentStore<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Direct lookup by id inside one partition.
    async fn point_read(&self, id: &str, partition_key: &str) -> StoreResult<T>;

    /// Scan across all partitions. Order is store-defined unless the query sorts.
    async fn query(&self, query: &Query) -> StoreResult<Vec<T>>;

    async fn create(&self, document: &T) -> StoreResult<()>;

    async fn replace(&self, id: &str, partition_key: &str, document: &T) -> StoreResult<T>;

    async fn delete(&self, id: &str, partition_key: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder_keeps_condition_order() {
        let query = Query::new()
            .field_eq("pk", "users")
            .field_eq("email", "a@b.c")
            .order_by("createdAt", SortOrder::Descending);

        assert_eq!(
            query.conditions,
            vec![
                ("pk".to_string(), "users".to_string()),
                ("email".to_string(), "a@b.c".to_string()),
            ]
        );
        assert_eq!(query.order_by, Some(("createdAt".to_string(), SortOrder::Descending)));
    }
}

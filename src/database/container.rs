use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::Collection;
use serde::{de::DeserializeOwned, Serialize};

use super::store::{DocumentStore, Query, SortOrder, StoreError, StoreResult};

/// A MongoDB collection addressed the way a partitioned document container is: every
/// document carries its partition key in the `pk` field.
pub struct MongoContainer<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T: Send + Sync> MongoContainer<T> {
    pub fn new(collection: Collection<T>) -> Self {
        Self { collection }
    }
}

/// Filter addressing one document inside one partition. Legacy documents written without a
/// `pk` field (or with `pk: null`) live in the empty-string partition.
pub(crate) fn partition_filter(id: &str, partition_key: &str) -> Document {
    if partition_key.is_empty() {
        doc! {
            "id": id,
            "$or": [ { "pk": "" }, { "pk": null } ],
        }
    } else {
        doc! { "id": id, "pk": partition_key }
    }
}

pub(crate) fn query_filter(query: &Query) -> Document {
    let mut filter = Document::new();
    for (field, value) in &query.conditions {
        filter.insert(field.as_str(), value.as_str());
    }
    filter
}

pub(crate) fn query_sort(query: &Query) -> Option<Document> {
    query.order_by.as_ref().map(|(field, order)| {
        let direction = match order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        let mut sort = Document::new();
        sort.insert(field.as_str(), direction);
        sort
    })
}

fn transient(e: mongodb::error::Error) -> StoreError {
    StoreError::Transient(format!("Database error: {}", e))
}

#[async_trait]
impl<T> DocumentStore<T> for MongoContainer<T>
where
    T: Serialize + DeserializeOwned + Clone + Unpin + Send + Sync + 'static,
{
    async fn point_read(&self, id: &str, partition_key: &str) -> StoreResult<T> {
        self.collection
            .find_one(partition_filter(id, partition_key))
            .await
            .map_err(transient)?
            .ok_or(StoreError::NotFound)
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<T>> {
        let cursor = match query_sort(query) {
            Some(sort) => self.collection.find(query_filter(query)).sort(sort).await,
            None => self.collection.find(query_filter(query)).await,
        }
        .map_err(transient)?;

        cursor.try_collect().await.map_err(transient)
    }

    async fn create(&self, document: &T) -> StoreResult<()> {
        self.collection
            .insert_one(document)
            .await
            .map(|_| ())
            .map_err(transient)
    }

    async fn replace(&self, id: &str, partition_key: &str, document: &T) -> StoreResult<T> {
        let result = self
            .collection
            .replace_one(partition_filter(id, partition_key), document)
            .await
            .map_err(transient)?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(document.clone())
    }

    async fn delete(&self, id: &str, partition_key: &str) -> StoreResult<()> {
        let result = self
            .collection
            .delete_one(partition_filter(id, partition_key))
            .await
            .map_err(transient)?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn test_partition_filter_canonical_key() {
        let filter = partition_filter("r1", "recipes");
        assert_eq!(filter, doc! { "id": "r1", "pk": "recipes" });
    }

    #[test]
    fn test_partition_filter_empty_key_matches_missing_pk() {
        let filter = partition_filter("r1", "");
        let alternatives = filter.get_array("$or").unwrap();

        assert_eq!(filter.get_str("id").unwrap(), "r1");
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[1], Bson::Document(doc! { "pk": null }));
    }

    #[test]
    fn test_query_filter_and_sort() {
        let query = Query::new()
            .field_eq("pk", "recipes")
            .order_by("createdAt", SortOrder::Descending);

        assert_eq!(query_filter(&query), doc! { "pk": "recipes" });
        assert_eq!(query_sort(&query), Some(doc! { "createdAt": -1 }));
        assert_eq!(query_sort(&Query::new()), None);
    }
}

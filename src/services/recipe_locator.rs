//! Resolves recipe ids to the partition that currently holds them.
//!
//! Recipes were written under more than one partition-key convention over time
//! (`"recipes"`, `""`, no `pk` at all). Reads try the canonical partition first and fall back
//! to a cross-partition scan; mutations always scan and then walk a fixed list of candidate
//! partitions until the store accepts the write.

use std::future::Future;
use std::sync::Arc;

use crate::database::{DocumentStore, Query, StoreError, StoreResult};
use crate::models::{Recipe, RECIPES_PARTITION};

/// Partition tried last when applying a mutation.
const LEGACY_EMPTY_PARTITION: &str = "";

#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub document: Recipe,
    pub partition_key: String,
}

/// Scan result for update/delete: the stored document plus the partitions to try, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationTarget {
    pub document: Recipe,
    /// The `pk` found on the document, if it had one
    pub partition_key: Option<String>,
    pub candidates: Vec<String>,
}

impl MutationTarget {
    fn new(document: Recipe) -> Self {
        let partition_key = document.pk.clone();
        let candidates = candidate_partitions(partition_key.as_deref());
        Self {
            document,
            partition_key,
            candidates,
        }
    }
}

/// `[discovered pk, "recipes", ""]`, skipping values already listed.
pub fn candidate_partitions(discovered: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::with_capacity(3);
    let ordered = discovered
        .into_iter()
        .chain([RECIPES_PARTITION, LEGACY_EMPTY_PARTITION]);

    for pk in ordered {
        if !candidates.iter().any(|c| c == pk) {
            candidates.push(pk.to_string());
        }
    }
    candidates
}

/// Runs `attempt` against each candidate until one does not report not-found.
/// Any other error stops the walk and is returned as is.
pub async fn first_accepting<T, F, Fut>(candidates: &[String], mut attempt: F) -> StoreResult<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    for pk in candidates {
        match attempt(pk.clone()).await {
            Err(StoreError::NotFound) => continue,
            outcome => return outcome,
        }
    }
    Err(StoreError::NotFound)
}

#[derive(Clone)]
pub struct RecipeLocator {
    store: Arc<dyn DocumentStore<Recipe>>,
}

impl RecipeLocator {
    pub fn new(store: Arc<dyn DocumentStore<Recipe>>) -> Self {
        Self { store }
    }

    pub async fn locate(&self, id: &str) -> StoreResult<Located> {
        match self.store.point_read(id, RECIPES_PARTITION).await {
            Ok(document) => {
                return Ok(Located {
                    document,
                    partition_key: RECIPES_PARTITION.to_string(),
                })
            }
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let discovered = self.scan(id).await?.ok_or(StoreError::NotFound)?;
        let partition_key = discovered.pk.ok_or(StoreError::NotFound)?;

        // Re-read through the discovered partition; a miss here means it was deleted meanwhile.
        let document = self.store.point_read(id, &partition_key).await?;
        Ok(Located {
            document,
            partition_key,
        })
    }

    pub async fn resolve_for_mutation(&self, id: &str) -> StoreResult<MutationTarget> {
        let document = self.scan(id).await?.ok_or(StoreError::NotFound)?;
        Ok(MutationTarget::new(document))
    }

    pub async fn replace(&self, target: &MutationTarget, document: &Recipe) -> StoreResult<Recipe> {
        let id = target.document.id.as_str();
        first_accepting(&target.candidates, |pk| async move {
            self.store.replace(id, &pk, document).await
        })
        .await
    }

    pub async fn delete(&self, target: &MutationTarget) -> StoreResult<()> {
        let id = target.document.id.as_str();
        first_accepting(&target.candidates, |pk| async move {
            self.store.delete(id, &pk).await
        })
        .await
    }

    /// Cross-partition lookup by id. Duplicate ids resolve to whichever the store returns first.
    async fn scan(&self, id: &str) -> StoreResult<Option<Recipe>> {
        let matches = self.store.query(&Query::new().field_eq("id", id)).await?;
        Ok(matches.into_iter().next())
    }
}

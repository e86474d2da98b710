pub mod container;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use container::MongoContainer;
pub use store::{DocumentStore, Query, SortOrder, StoreError, StoreResult};

use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        Ok(Self { db })
    }

    /// Creates the lookup indexes used by point reads and the login query.
    pub async fn ensure_indexes(
        &self,
        recipes_collection: &str,
        users_collection: &str,
    ) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let recipes = self.collection::<mongodb::bson::Document>(recipes_collection);

        let id_index = IndexModel::builder().keys(doc! { "id": 1 }).build();
        match recipes.create_index(id_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(id)", recipes_collection),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let partition_index = IndexModel::builder().keys(doc! { "id": 1, "pk": 1 }).build();
        match recipes.create_index(partition_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(id, pk)", recipes_collection),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let users = self.collection::<mongodb::bson::Document>(users_collection);

        let email_index = IndexModel::builder().keys(doc! { "pk": 1, "email": 1 }).build();
        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(pk, email)", users_collection),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Typed container handle implementing [`DocumentStore`].
    pub fn container<T: Send + Sync>(&self, name: &str) -> MongoContainer<T> {
        MongoContainer::new(self.collection(name))
    }
}

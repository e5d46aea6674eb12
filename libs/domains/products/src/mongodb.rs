//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::Product;
use crate::repository::ProductRepository;

/// Default collection name
pub const PRODUCTS_COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Create a new MongoProductRepository on the `products` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Create the lookup and ordering indexes.
    ///
    /// The name index is deliberately not unique: uniqueness is checked by the
    /// service before insert.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().name("idx_name".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    fn by_id(id: ObjectId) -> Document {
        doc! { "_id": id }
    }

    /// Newest first.
    fn list_options() -> FindOptions {
        FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build()
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_id = %product.id, product_name = %product.name))]
    async fn insert(&self, product: &Product) -> ProductResult<()> {
        self.collection.insert_one(product).await?;
        tracing::info!("Product created successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::by_id(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn exists_by_name(&self, name: &str) -> ProductResult<bool> {
        let existing = self.collection.find_one(doc! { "name": name }).await?;
        Ok(existing.is_some())
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProductResult<Vec<Product>> {
        let cursor = self
            .collection
            .find(doc! {})
            .with_options(Self::list_options())
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn replace(&self, product: &Product) -> ProductResult<bool> {
        let result = self
            .collection
            .replace_one(Self::by_id(product.id), product)
            .await?;

        if result.matched_count == 0 {
            return Ok(false);
        }

        tracing::info!("Product updated successfully");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        tracing::info!("Product deleted successfully");
        Ok(true)
    }
}

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::ProductResult;
use crate::models::Product;

/// Repository trait for Product persistence
///
/// Each method is a single round trip to the store. Business rules (blank
/// checks, uniqueness, password gating) live in the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product
    async fn insert(&self, product: &Product) -> ProductResult<()>;

    /// Get a product by ID
    async fn find_by_id(&self, id: ObjectId) -> ProductResult<Option<Product>>;

    /// Check if a product with this exact name exists
    async fn exists_by_name(&self, name: &str) -> ProductResult<bool>;

    /// All products, newest first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Overwrite a stored product. Returns `false` if it no longer exists.
    async fn replace(&self, product: &Product) -> ProductResult<bool>;

    /// Delete a product by ID. Returns `false` if nothing was deleted.
    async fn delete(&self, id: ObjectId) -> ProductResult<bool>;
}

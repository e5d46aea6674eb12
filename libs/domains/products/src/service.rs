//! Product Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{BlankField, ProductError, ProductResult};
use crate::models::{
    CreateProduct, DeleteProduct, Product, ProductChanges, ProductStatus, UpdateProduct,
};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// Every operation issues at most one prior read and exactly one write.
/// The read-then-write sequences are not transactional.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

/// An empty string counts as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: BlankField) -> ProductResult<String> {
    present(value).ok_or(ProductError::Blank(field))
}

/// Ids that are not valid ObjectIds cannot name a stored product.
fn parse_id(id: &str) -> ProductResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| ProductError::NotFound(id.to_string()))
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(product_name = ?input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        let name = required(input.name, BlankField::Name)?;
        let description = required(input.description, BlankField::Description)?;
        let manager = required(input.manager, BlankField::Manager)?;
        let password = required(input.password, BlankField::Password)?;

        if self.repository.exists_by_name(&name).await? {
            return Err(ProductError::AlreadyRegistered(name));
        }

        let product = Product::new(name, description, manager, password);
        self.repository.insert(&product).await?;

        Ok(product)
    }

    /// All products, newest first
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        let object_id = parse_id(id)?;
        self.repository
            .find_by_id(object_id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Update a product after checking its password
    ///
    /// Only non-empty fields are applied. `status` is validated whenever it
    /// is supplied, even when empty.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: UpdateProduct) -> ProductResult<Product> {
        let mut product = self.authorize(id, input.password).await?;

        let status = match input.status {
            Some(raw) => Some(
                raw.parse::<ProductStatus>()
                    .map_err(|_| ProductError::InvalidStatus(raw))?,
            ),
            None => None,
        };

        product.apply_changes(ProductChanges {
            name: present(input.name),
            description: present(input.description),
            manager: present(input.manager),
            status,
        });

        if !self.repository.replace(&product).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }

        Ok(product)
    }

    /// Delete a product after checking its password; returns the removed id
    #[instrument(skip(self, input))]
    pub async fn delete_product(&self, id: &str, input: DeleteProduct) -> ProductResult<ObjectId> {
        let product = self.authorize(id, input.password).await?;

        if !self.repository.delete(product.id).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }

        Ok(product.id)
    }

    /// Existence, then password presence, then password equality.
    async fn authorize(&self, id: &str, password: Option<String>) -> ProductResult<Product> {
        let product = self.get_product(id).await?;
        let password = required(password, BlankField::Password)?;

        if !product.password_matches(&password) {
            return Err(ProductError::PasswordMismatch);
        }

        Ok(product)
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

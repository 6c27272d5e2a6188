//! Product Service - Business logic layer

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{
    CreateProduct, ListProducts, NewProduct, Page, PageRequest, Product, ProductId, UpdateProduct,
};
use crate::repository::{ProductRepository, ProductTransaction};

/// Deadline applied to every service call unless overridden.
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(5000);

/// Product service providing business logic operations
///
/// Owns the validation policy, the not-found policy and the per-call
/// deadline. Every write runs in a single unit of work.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    deadline: Duration,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run `operation` under the deadline. On expiry the future is dropped,
    /// taking any open unit of work with it.
    async fn within<T>(
        &self,
        operation: impl Future<Output = ProductResult<T>>,
    ) -> ProductResult<T> {
        match tokio::time::timeout(self.deadline, operation).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(deadline = ?self.deadline, "Deadline exceeded");
                Err(ProductError::Timeout(self.deadline))
            }
        }
    }

    /// Create a new product
    #[instrument(skip(self, input), fields(category = %input.category))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;
        let new_product = NewProduct::from(input);

        self.within(async {
            let mut txn = self.repository.begin().await?;
            let product = txn.insert(new_product).await?;
            txn.commit().await?;
            Ok(product)
        })
        .await
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> ProductResult<Product> {
        self.within(async {
            self.repository
                .find_by_id(id)
                .await?
                .ok_or(ProductError::NotFound(id))
        })
        .await
    }

    /// Replace category and name of an existing product
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: ProductId, input: UpdateProduct) -> ProductResult<Product> {
        input.validate()?;

        self.within(async {
            let mut txn = self.repository.begin().await?;
            let mut product = txn
                .find_by_id(id)
                .await?
                .ok_or(ProductError::NotFound(id))?;

            product.recategorize(input.category);
            product.rename(input.name);

            let saved = txn.save(&product).await?;
            txn.commit().await?;
            Ok(saved)
        })
        .await
    }

    /// Delete a product. Deleting an id that is not there is `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> ProductResult<()> {
        self.within(async {
            let mut txn = self.repository.begin().await?;
            let product = txn
                .find_by_id(id)
                .await?
                .ok_or(ProductError::NotFound(id))?;

            txn.delete(&product).await?;
            txn.commit().await
        })
        .await
    }

    /// One page of the products in a category, sorted by category
    #[instrument(skip(self, query), fields(category = %query.category, page = query.page, size = query.size))]
    pub async fn list_by_category(&self, query: ListProducts) -> ProductResult<Page<Product>> {
        query.validate()?;
        let request = PageRequest::from(query);

        self.within(self.repository.find_page(&request)).await
    }

    /// Every distinct category, ascending
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> ProductResult<Vec<String>> {
        self.within(self.repository.find_distinct_categories())
            .await
    }
}

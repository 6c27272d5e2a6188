//! Storage port for products.
//!
//! Reads that need no isolation go through [`ProductRepository`] directly.
//! Writes go through a [`ProductTransaction`], a unit of work that is only
//! made durable by [`ProductTransaction::commit`]. Dropping it rolls back.

use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{NewProduct, Page, PageRequest, Product, ProductId};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    type Transaction: ProductTransaction;

    /// Open a unit of work
    async fn begin(&self) -> ProductResult<Self::Transaction>;

    async fn find_by_id(&self, id: ProductId) -> ProductResult<Option<Product>>;

    /// Products whose category equals `request.category` exactly, one page of them
    async fn find_page(&self, request: &PageRequest) -> ProductResult<Page<Product>>;

    /// Each distinct category once, ascending
    async fn find_distinct_categories(&self) -> ProductResult<Vec<String>>;
}

#[async_trait]
pub trait ProductTransaction: Send {
    async fn find_by_id(&mut self, id: ProductId) -> ProductResult<Option<Product>>;

    /// Store a new product; storage assigns the id
    async fn insert(&mut self, product: NewProduct) -> ProductResult<Product>;

    /// Overwrite the stored record with the same id.
    ///
    /// Fails with `NotFound` if that row no longer exists.
    async fn save(&mut self, product: &Product) -> ProductResult<Product>;

    /// Remove the product. Removing an absent row is a no-op.
    async fn delete(&mut self, product: &Product) -> ProductResult<()>;

    async fn commit(self) -> ProductResult<()>;
}

//! In-memory storage adapter, used by tests and local experiments.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Page, PageRequest, Product, ProductId, SortDirection, SortKey};
use crate::repository::{ProductRepository, ProductTransaction};

type Store = BTreeMap<ProductId, Product>;

/// Products kept in a `BTreeMap` behind a tokio mutex.
///
/// A transaction holds the lock for its whole life and works on a staged copy,
/// so transactions are serialized and uncommitted writes are never visible.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<Mutex<Store>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }
}

pub struct InMemoryProductTransaction {
    guard: OwnedMutexGuard<Store>,
    staged: Store,
    last_id: Arc<AtomicI64>,
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    type Transaction = InMemoryProductTransaction;

    async fn begin(&self) -> ProductResult<Self::Transaction> {
        let guard = self.store.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryProductTransaction {
            guard,
            staged,
            last_id: self.last_id.clone(),
        })
    }

    async fn find_by_id(&self, id: ProductId) -> ProductResult<Option<Product>> {
        Ok(self.store.lock().await.get(&id).cloned())
    }

    async fn find_page(&self, request: &PageRequest) -> ProductResult<Page<Product>> {
        let store = self.store.lock().await;
        let mut matching: Vec<Product> = store
            .values()
            .filter(|p| p.category() == request.category)
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            let by_key = match request.sort_key {
                SortKey::Id => a.id().cmp(&b.id()),
                SortKey::Category => a.category().cmp(b.category()),
                SortKey::Name => a.name().cmp(b.name()),
            };
            let by_key = match request.direction {
                SortDirection::Asc => by_key,
                SortDirection::Desc => by_key.reverse(),
            };
            by_key.then(a.id().cmp(&b.id()))
        });

        let total_elements = matching.len() as u64;
        let total_pages = if request.size == 0 {
            0
        } else {
            total_elements.div_ceil(request.size)
        };
        let items = matching
            .into_iter()
            .skip(request.page.saturating_mul(request.size) as usize)
            .take(request.size as usize)
            .collect();

        Ok(Page {
            items,
            total_pages,
            total_elements,
            page: request.page,
        })
    }

    async fn find_distinct_categories(&self) -> ProductResult<Vec<String>> {
        let store = self.store.lock().await;
        let mut categories: Vec<String> = store.values().map(|p| p.category().to_string()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

#[async_trait]
impl ProductTransaction for InMemoryProductTransaction {
    async fn find_by_id(&mut self, id: ProductId) -> ProductResult<Option<Product>> {
        Ok(self.staged.get(&id).cloned())
    }

    async fn insert(&mut self, product: NewProduct) -> ProductResult<Product> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = Product::new(id, product.category, product.name);
        self.staged.insert(id, product.clone());
        Ok(product)
    }

    async fn save(&mut self, product: &Product) -> ProductResult<Product> {
        match self.staged.get_mut(&product.id()) {
            Some(stored) => {
                *stored = product.clone();
                Ok(product.clone())
            }
            None => Err(ProductError::NotFound(product.id())),
        }
    }

    async fn delete(&mut self, product: &Product) -> ProductResult<()> {
        self.staged.remove(&product.id());
        Ok(())
    }

    async fn commit(self) -> ProductResult<()> {
        let Self {
            mut guard, staged, ..
        } = self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(repo: &InMemoryProductRepository, items: &[(&str, &str)]) -> Vec<Product> {
        let mut txn = repo.begin().await.unwrap();
        let mut created = Vec::new();
        for (category, name) in items {
            created.push(txn.insert(NewProduct::new(*category, *name)).await.unwrap());
        }
        txn.commit().await.unwrap();
        created
    }

    fn page_of(category: &str, page: u64, size: u64) -> PageRequest {
        PageRequest {
            category: category.to_string(),
            page,
            size,
            sort_key: SortKey::Name,
            direction: SortDirection::Asc,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, &[("Books", "Atlas"), ("Books", "Almanac")]).await;

        assert_eq!(created[0].id(), 1);
        assert_eq!(created[1].id(), 2);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, &[("Books", "Atlas")]).await;

        let mut txn = repo.begin().await.unwrap();
        txn.delete(&created[0]).await.unwrap();
        txn.commit().await.unwrap();

        let again = seed(&repo, &[("Books", "Atlas")]).await;
        assert_eq!(again[0].id(), 2);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let repo = InMemoryProductRepository::new();
        let created = seed(&repo, &[("Books", "Atlas")]).await;

        {
            let mut txn = repo.begin().await.unwrap();
            txn.insert(NewProduct::new("Maps", "Globe")).await.unwrap();
            let mut product = created[0].clone();
            product.rename("Changed");
            txn.save(&product).await.unwrap();
        }

        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id(created[0].id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Atlas");
    }

    #[tokio::test]
    async fn test_save_missing_row_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let ghost = Product::new(99, "Books".into(), "Ghost".into());

        let mut txn = repo.begin().await.unwrap();
        let err = txn.save(&ghost).await.unwrap_err();
        assert!(matches!(err, ProductError::NotFound(99)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryProductRepository::new();
        let ghost = Product::new(5, "Books".into(), "Ghost".into());

        let mut txn = repo.begin().await.unwrap();
        txn.delete(&ghost).await.unwrap();
        txn.delete(&ghost).await.unwrap();
        txn.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_find_page_filters_and_orders() {
        let repo = InMemoryProductRepository::new();
        seed(
            &repo,
            &[
                ("Books", "Cosmos"),
                ("Maps", "Globe"),
                ("Books", "Atlas"),
                ("books", "Lowercase"),
                ("Books", "Atlas"),
            ],
        )
        .await;

        let page = repo.find_page(&page_of("Books", 0, 2)).await.unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        let ids: Vec<_> = page.items.iter().map(Product::id).collect();
        assert_eq!(ids, vec![3, 5]);

        let last = repo.find_page(&page_of("Books", 1, 2)).await.unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].name(), "Cosmos");

        let beyond = repo.find_page(&page_of("Books", 7, 2)).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.page, 7);
    }

    #[tokio::test]
    async fn test_find_page_descending() {
        let repo = InMemoryProductRepository::new();
        seed(&repo, &[("Books", "Atlas"), ("Books", "Cosmos")]).await;

        let request = PageRequest {
            direction: SortDirection::Desc,
            ..page_of("Books", 0, 10)
        };
        let page = repo.find_page(&request).await.unwrap();
        assert_eq!(page.items[0].name(), "Cosmos");
    }

    #[tokio::test]
    async fn test_distinct_categories() {
        let repo = InMemoryProductRepository::new();
        seed(
            &repo,
            &[("Maps", "Globe"), ("Books", "Atlas"), ("Books", "Cosmos"), ("books", "x")],
        )
        .await;

        let categories = repo.find_distinct_categories().await.unwrap();
        assert_eq!(categories, vec!["Books", "Maps", "books"]);
    }
}

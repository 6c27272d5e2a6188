use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    entity::{self, Column, Entity},
    error::{ProductError, ProductResult},
    models::{NewProduct, Page, PageRequest, Product, ProductId, SortDirection, SortKey},
    repository::{ProductRepository, ProductTransaction},
};

/// PostgreSQL adapter. Each unit of work is a `DatabaseTransaction`.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Rolled back by sea-orm when dropped without `commit`.
pub struct PgProductTransaction {
    txn: DatabaseTransaction,
}

async fn find_one<C: ConnectionTrait>(conn: &C, id: ProductId) -> ProductResult<Option<Product>> {
    let model = Entity::find_by_id(id).one(conn).await?;
    Ok(model.map(Product::from))
}

fn order_column(key: SortKey) -> Column {
    match key {
        SortKey::Id => Column::Id,
        SortKey::Category => Column::Category,
        SortKey::Name => Column::Name,
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    type Transaction = PgProductTransaction;

    async fn begin(&self) -> ProductResult<Self::Transaction> {
        let txn = self.db.begin().await?;
        Ok(PgProductTransaction { txn })
    }

    async fn find_by_id(&self, id: ProductId) -> ProductResult<Option<Product>> {
        find_one(&self.db, id).await
    }

    async fn find_page(&self, request: &PageRequest) -> ProductResult<Page<Product>> {
        let order = match request.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let paginator = Entity::find()
            .filter(Column::Category.eq(request.category.as_str()))
            .order_by(order_column(request.sort_key), order)
            .order_by_asc(Column::Id)
            .paginate(&self.db, request.size);

        let totals = paginator.num_items_and_pages().await?;
        // Pages past the end are empty; skipping the fetch also keeps the offset from overflowing.
        let models = match request.page.checked_mul(request.size) {
            Some(offset) if offset < totals.number_of_items => {
                paginator.fetch_page(request.page).await?
            }
            _ => Vec::new(),
        };

        Ok(Page {
            items: models.into_iter().map(Product::from).collect(),
            total_pages: totals.number_of_pages,
            total_elements: totals.number_of_items,
            page: request.page,
        })
    }

    async fn find_distinct_categories(&self) -> ProductResult<Vec<String>> {
        let categories = Entity::find()
            .select_only()
            .column(Column::Category)
            .distinct()
            .order_by_asc(Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        Ok(categories)
    }
}

#[async_trait]
impl ProductTransaction for PgProductTransaction {
    async fn find_by_id(&mut self, id: ProductId) -> ProductResult<Option<Product>> {
        find_one(&self.txn, id).await
    }

    async fn insert(&mut self, product: NewProduct) -> ProductResult<Product> {
        let model = entity::ActiveModel {
            id: NotSet,
            category: Set(product.category),
            name: Set(product.name),
        }
        .insert(&self.txn)
        .await?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn save(&mut self, product: &Product) -> ProductResult<Product> {
        let active = entity::ActiveModel {
            id: Unchanged(product.id()),
            category: Set(product.category().to_string()),
            name: Set(product.name().to_string()),
        };

        match active.update(&self.txn).await {
            Ok(model) => {
                tracing::info!(product_id = %model.id, "Updated product");
                Ok(model.into())
            }
            Err(DbErr::RecordNotUpdated) => Err(ProductError::NotFound(product.id())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&mut self, product: &Product) -> ProductResult<()> {
        let result = Entity::delete_by_id(product.id()).exec(&self.txn).await?;
        tracing::info!(
            product_id = %product.id(),
            rows_affected = result.rows_affected,
            "Deleted product"
        );
        Ok(())
    }

    async fn commit(self) -> ProductResult<()> {
        self.txn.commit().await?;
        Ok(())
    }
}

//! Idempotent bootstrap of the products table. Not a migration tool.

use sea_orm::{ConnectionTrait, DbErr};

const CREATE_PRODUCTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS products (
    id BIGSERIAL PRIMARY KEY,
    category VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL
)";

const CREATE_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products (category)";

/// Create the products table and its category index if they are missing.
pub async fn ensure_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    db.execute_unprepared(CREATE_PRODUCTS_TABLE).await?;
    db.execute_unprepared(CREATE_CATEGORY_INDEX).await?;
    tracing::info!("Products schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_ensure_schema_runs_both_statements() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        ensure_schema(&db).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
    }
}

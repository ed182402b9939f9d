//! Table bootstrap for the record store.

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use tracing::{debug, info};
use voterroll_entities::{records, relations};

fn is_table_already_exists_error(err: &DbErr) -> bool {
    err.to_string().contains("already exists")
}

/// Create the `records` and `relations` tables if they are missing.
///
/// `records` goes first since `relations` references it.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    create_table(db, &schema.create_table_from_entity(records::Entity), "records").await?;
    create_table(db, &schema.create_table_from_entity(relations::Entity), "relations").await?;

    info!("Record store schema ready");
    Ok(())
}

async fn create_table(
    db: &DatabaseConnection,
    stmt: &TableCreateStatement,
    table: &str,
) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    match db
        .execute_unprepared(&builder.build(stmt).to_string())
        .await
    {
        Ok(_) => {
            debug!("Created table {table}");
            Ok(())
        }
        Err(e) if is_table_already_exists_error(&e) => {
            debug!("Table {table} already exists, skipping creation");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

//! Schema bootstrap
//!
//! Creates the tables from the SeaORM entity definitions on start-up.
//! Existing tables are left as they are.

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::entity::{consultations, lab_results, test_requests, users};

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Create any missing tables, parents before children
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, users::Entity).await?;
    create_table(db, &schema, test_requests::Entity).await?;
    create_table(db, &schema, lab_results::Entity).await?;
    create_table(db, &schema, consultations::Entity).await?;

    tracing::info!("Database schema ready");
    Ok(())
}

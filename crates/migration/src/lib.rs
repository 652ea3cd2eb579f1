//! Migrator registering the SSO schema in dependency order.
//!
//! Migrations are append-only: new schema changes get a new module at the end of
//! the list, applied ones are never edited.
use std::sync::OnceLock;

pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseConnection;

mod m20240101_000001_create_users;
mod m20240101_000002_create_apps;
mod m20240101_000003_add_users_email_index;

/// Bookkeeping table used when none is configured.
pub const DEFAULT_MIGRATIONS_TABLE: &str = "schema_migrations";

static MIGRATIONS_TABLE: OnceLock<String> = OnceLock::new();

/// Override the bookkeeping table name for this process.
///
/// Must be called before the first migrator operation. Returns `false` when a
/// name was already set.
pub fn set_migrations_table(name: &str) -> bool {
    MIGRATIONS_TABLE.set(name.to_string()).is_ok()
}

pub fn migrations_table() -> &'static str {
    MIGRATIONS_TABLE.get().map(String::as_str).unwrap_or(DEFAULT_MIGRATIONS_TABLE)
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_apps::Migration),
            Box::new(m20240101_000003_add_users_email_index::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new(migrations_table()).into_iden()
    }
}

/// Apply every pending migration and return how many ran.
pub async fn apply_pending(db: &DatabaseConnection) -> Result<usize, DbErr> {
    let pending = Migrator::get_pending_migrations(db).await?.len();
    if pending > 0 {
        Migrator::up(db, None).await?;
    }
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database};

    async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        Database::connect(opt).await.expect("connect sqlite")
    }

    #[tokio::test]
    async fn up_is_idempotent() {
        let db = memory_db().await;
        assert_eq!(Migrator::get_pending_migrations(&db).await.unwrap().len(), 3);

        Migrator::up(&db, None).await.expect("first up");
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        // nothing pending is not an error
        Migrator::up(&db, None).await.expect("second up");
        assert_eq!(Migrator::get_applied_migrations(&db).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn apply_pending_reports_what_ran() {
        let db = memory_db().await;
        assert_eq!(apply_pending(&db).await.unwrap(), 3);
        assert_eq!(apply_pending(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn users_email_index_exists() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        assert!(manager.has_index("users", "idx_users_email").await.unwrap());
    }

    #[tokio::test]
    async fn down_drops_everything() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        Migrator::down(&db, None).await.unwrap();
        assert_eq!(Migrator::get_pending_migrations(&db).await.unwrap().len(), 3);
    }
}

/// Embedded database migrations
///
/// Migration files live in `connector-shared/migrations/` and are compiled
/// into the binary with `sqlx::migrate!`, so a deployed server needs no
/// files on disk to bring its schema up to date.

use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{info, warn};

/// All migrations shipped with this crate
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies every pending migration
///
/// # Errors
///
/// Returns an error if a migration fails to apply or a previously applied
/// migration has been modified.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

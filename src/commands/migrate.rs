//! Database migration command.

use crate::output;
use msgcenter_core::error::AppError;

/// Apply all pending migrations.
pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = super::create_db_pool(&config).await?;

    println!("Running database migrations...");
    msgcenter_database::migration::run_migrations(&pool).await?;
    output::print_success("All migrations applied successfully.");

    pool.close().await;
    Ok(())
}

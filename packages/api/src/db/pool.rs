//! Database connection pool.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::settings::Settings;

/// Open the pool, ping the server and bring the schema up to date.
///
/// On any failure after the pool exists, the pool is closed before the error
/// is returned.
pub async fn connect(settings: &Settings) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .acquire_timeout(Duration::from_secs(settings.database_connect_timeout_secs))
        .connect(&settings.database_url())
        .await?;

    if let Err(e) = prepare(&pool).await {
        pool.close().await;
        return Err(e);
    }

    Ok(pool)
}

async fn prepare(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    tracing::info!("pinged database, connection established");

    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

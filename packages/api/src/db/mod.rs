//! # Database module — PostgreSQL connection and the records table
//!
//! The collection is connected once, in the background, when the server
//! starts. [`bootstrap`] opens the pool (see [`connect`]), pings the server,
//! runs the embedded migrations and hands a [`PgCollection`] to the
//! [`AppState`]. If any step fails the error is logged and the pool is closed.
//! There is no retry: the state stays pending and the readiness gate keeps
//! answering 503 while the HTTP listener carries on.

mod collection;
mod pool;

use std::sync::Arc;

pub use collection::PgCollection;
pub use pool::connect;

use crate::settings::Settings;
use crate::state::AppState;

/// Connect the records collection and mark `state` ready on success.
pub async fn bootstrap(settings: Settings, state: AppState) {
    match connect(&settings).await {
        Ok(pool) => {
            state.mark_ready(Arc::new(PgCollection::new(pool)));
            tracing::info!("record collection ready");
        }
        Err(e) => {
            tracing::error!("failed to connect to database: {}", e);
        }
    }
}

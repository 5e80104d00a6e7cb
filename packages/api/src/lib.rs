//! # API crate — HTTP surface for the watch-progress tracker
//!
//! Everything the server binary needs apart from process setup: settings,
//! GitHub login, the browser-session user, the PostgreSQL-backed record
//! collection and the axum router that ties them together.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | GitHub OAuth (authorization URL, code exchange), the [`SessionUser`](auth::SessionUser) and the `require_auth` gate |
//! | [`db`] | PostgreSQL pool, migrations and [`PgCollection`](db::PgCollection); background [`bootstrap`](db::bootstrap) |
//! | [`error`] | [`ApiError`], status-only error responses |
//! | [`routes`] | The router, readiness gate and handlers |
//! | [`settings`] | [`Settings`] loaded from defaults, `config.toml` and the environment |
//! | [`state`] | [`AppState`]: identity provider plus the pending/ready collection |
//!
//! ## Routes
//!
//! - **Authentication**: `GET /auth/github`, `GET /auth/github/callback`, `GET /user`, `POST /logout`
//! - **Records** (login required): `GET /results`, `POST /submit`, `POST /delete`, `POST /update`

pub mod auth;
pub mod db;
pub mod error;
pub mod routes;
pub mod settings;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use settings::Settings;
pub use state::{AppState, Readiness};

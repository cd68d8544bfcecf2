//! College management REST backend: students, faculty, courses, departments and enrollments
//! over PostgreSQL or an in-memory store.

pub mod client;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use client::{ApiClient, ClientError};
pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists};
pub use routes::app;
pub use settings::{Settings, StoreBackend};
pub use state::AppState;
pub use store::{CollegeStore, MemoryStore, PgStore};

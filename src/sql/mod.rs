//! SQL for the PostgreSQL store: fixed joined views, values always bound as parameters.

mod builder;
pub mod views;
pub use builder::*;

//! Connection management for the Strata data layer.
//!
//! Provides a pooled SQLite handle (via `r2d2`) with WAL-mode journaling,
//! foreign-key enforcement, and a configurable busy timeout. Every other
//! Strata crate borrows a plain `rusqlite::Connection`; this crate is where
//! those connections come from in an application.

mod pool;

pub use pool::{create_pool, DbPool, DbSettings, PoolError};

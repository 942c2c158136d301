//! FieldOps Database — SurrealDB connection management, schema
//! migrations, and repository implementations.
//!
//! This crate provides:
//! - Connection management ([`connect`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The permission catalog and stock-role seeding ([`seed`])
//! - SurrealDB implementations of every `fieldops-core` repository
//!   trait ([`repository`])

mod connection;
mod error;
pub mod repository;
mod schema;
pub mod seed;

pub use connection::{DbConfig, connect};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};

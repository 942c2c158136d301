//! Domain models for FieldOps.
//!
//! These are the core types shared across all crates.

pub mod asset;
pub mod assignment;
pub mod audit;
pub mod job;
pub mod permission;
pub mod quota;
pub mod role;
pub mod session;
pub mod signature;
pub mod tenant;
pub mod user;
pub mod worker;

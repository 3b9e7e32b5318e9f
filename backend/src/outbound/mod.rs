//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories used without a database and in tests
//! - **security**: bcrypt password hashing
//! - **media**: image storage under the configured media root
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod media;
pub mod memory;
pub mod persistence;
pub mod security;

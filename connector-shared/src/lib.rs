//! # Connector Shared Library
//!
//! This crate contains the domain types and business logic used by the
//! Connector API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: User persistence port with PostgreSQL and in-memory adapters
//! - `auth`: Password hashing and token signing
//! - `avatar`: Gravatar URL derivation
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod avatar;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Connector shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

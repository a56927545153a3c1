//! Driven adapters behind the domain ports.
//!
//! `persistence` stores accounts, tokens and recipe items in PostgreSQL.
//! `memory` keeps the same data in process for tests and database-less runs.
//! `crypto` hashes passwords with Argon2id.

pub mod crypto;
pub mod memory;
pub mod persistence;

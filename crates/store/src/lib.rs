//! `taskforge-store` — credential store implementations.
//!
//! The in-memory store backs development and tests; the Postgres store
//! (behind the `postgres` feature) backs deployments. Both enforce the same
//! contract: email/role-name uniqueness, eager role joins, and the guarded
//! password-hash write path.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod seed;

#[cfg(test)]
mod integration_tests;

pub use memory::InMemoryCredentialStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresCredentialStore;
pub use seed::{seed_roles, seed_users};

//! Relational storage.
//!
//! [`TursoClient`] wraps a libsql database (local file, in-memory, or
//! remote Turso). Entity operations live in per-table modules as further
//! `impl TursoClient` blocks; all SQL they run is parameterized, with
//! dynamic fragments produced by [`sql`].

pub mod companies;
pub mod jobs;
pub mod sql;
pub mod turso;
pub mod users;

// Re-exports
pub use sql::{sql_for_partial_update, FieldMap, PartialUpdate, UpdatableColumns};
pub use turso::TursoClient;
pub use users::NewUser;

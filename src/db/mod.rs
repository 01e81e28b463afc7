//! Database module: the `pessoas` table and its storage.
//!
//! Layout:
//! - `models.rs`: row struct and the validated insert/update payload
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: pool setup and parameterized statements

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{NewPessoa, Pessoa};
pub use schema::SQLITE_INIT;
pub use sqlite::{PessoaStorage, SqlitePool, connect};

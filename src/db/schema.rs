//! SQL DDL for the person table.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, never reused after delete
/// - `nome` NOT NULL; emptiness is checked by the service, not here
/// - `data_nascimento` stored as ISO `YYYY-MM-DD` text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS pessoas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL,
    email TEXT NULL,
    telefone TEXT NULL,
    data_nascimento TEXT NULL
);
"#;

use crate::db::models::{NewPessoa, Pessoa};
use crate::db::schema::SQLITE_INIT;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `database_url`, creating the database file if missing.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await
}

const SELECT_COLUMNS: &str = "SELECT id, nome, email, telefone, data_nascimento FROM pessoas";

/// Parameterized single-statement access to the `pessoas` table.
///
/// Listing and search return rows newest first (`ORDER BY id DESC`).
#[derive(Clone)]
pub struct PessoaStorage {
    pool: SqlitePool,
}

impl PessoaStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a row and return the id assigned by SQLite.
    pub async fn insert(&self, pessoa: &NewPessoa) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"INSERT INTO pessoas (nome, email, telefone, data_nascimento)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&pessoa.nome)
        .bind(&pessoa.email)
        .bind(&pessoa.telefone)
        .bind(&pessoa.data_nascimento)
        .execute(&self.pool)
        .await?;
        let id = result.last_insert_rowid();
        debug!(id, "pessoa inserted");
        Ok(id)
    }

    /// Replace every column except `id`. Returns rows affected; 0 means no such id.
    pub async fn update(&self, id: i64, pessoa: &NewPessoa) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE pessoas SET
                nome = ?,
                email = ?,
                telefone = ?,
                data_nascimento = ?
              WHERE id = ?"#,
        )
        .bind(&pessoa.nome)
        .bind(&pessoa.email)
        .bind(&pessoa.telefone)
        .bind(&pessoa.data_nascimento)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pessoas WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Pessoa>, sqlx::Error> {
        sqlx::query_as::<_, Pessoa>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Pessoa>, sqlx::Error> {
        sqlx::query_as::<_, Pessoa>(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))
            .fetch_all(&self.pool)
            .await
    }

    /// Substring match on `nome`. SQLite `LIKE` folds ASCII letters only, so
    /// "jo" matches "João" and "JOANA" but accented letters must match exactly.
    /// A blank term yields no rows without running a statement.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<Pessoa>, sqlx::Error> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", escape_like(term));
        sqlx::query_as::<_, Pessoa>(&format!(
            r"{SELECT_COLUMNS} WHERE nome LIKE ? ESCAPE '\' ORDER BY id DESC"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

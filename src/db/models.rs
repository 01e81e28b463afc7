use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `pessoas`. Optional columns serialize as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Pessoa {
    pub id: i64,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub data_nascimento: Option<String>,
}

/// Field set written by insert and update; `nome` already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPessoa {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub data_nascimento: Option<String>,
}

impl NewPessoa {
    pub fn into_pessoa(self, id: i64) -> Pessoa {
        Pessoa {
            id,
            nome: self.nome,
            email: self.email,
            telefone: self.telefone,
            data_nascimento: self.data_nascimento,
        }
    }
}

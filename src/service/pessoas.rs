use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{NewPessoa, Pessoa, PessoaStorage};
use crate::error::CadastroError;

/// Request body for create and update. Every field is optional on the wire so
/// that a missing `nome` surfaces as a validation error rather than a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PessoaPayload {
    pub nome: Option<String>,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub data_nascimento: Option<String>,
}

impl PessoaPayload {
    /// Require a non-blank `nome`. Values are kept exactly as submitted.
    pub fn validate(self) -> Result<NewPessoa, CadastroError> {
        let nome = match self.nome {
            Some(nome) if !nome.trim().is_empty() => nome,
            _ => return Err(CadastroError::MissingName),
        };
        Ok(NewPessoa {
            nome,
            email: self.email,
            telefone: self.telefone,
            data_nascimento: self.data_nascimento,
        })
    }
}

/// Validation and outcome mapping on top of [`PessoaStorage`].
#[derive(Clone)]
pub struct PessoaService {
    storage: PessoaStorage,
}

impl PessoaService {
    pub fn new(storage: PessoaStorage) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> Result<Vec<Pessoa>, CadastroError> {
        self.storage
            .list_all()
            .await
            .map_err(CadastroError::storage("Erro ao listar pessoas"))
    }

    /// Blank or absent terms short-circuit to an empty list.
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Pessoa>, CadastroError> {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(Vec::new());
        };
        self.storage
            .search_by_name(term)
            .await
            .map_err(CadastroError::Search)
    }

    pub async fn get(&self, id: i64) -> Result<Pessoa, CadastroError> {
        self.storage
            .get_by_id(id)
            .await
            .map_err(CadastroError::storage("Erro ao buscar pessoa"))?
            .ok_or(CadastroError::PessoaNotFound(id))
    }

    pub async fn create(&self, payload: PessoaPayload) -> Result<Pessoa, CadastroError> {
        let pessoa = payload.validate()?;
        let id = self
            .storage
            .insert(&pessoa)
            .await
            .map_err(CadastroError::storage("Erro ao incluir pessoa"))?;
        info!(id, "pessoa created");
        Ok(pessoa.into_pessoa(id))
    }

    /// Full replacement; the response echoes what was written.
    pub async fn update(&self, id: i64, payload: PessoaPayload) -> Result<Pessoa, CadastroError> {
        let pessoa = payload.validate()?;
        let changed = self
            .storage
            .update(id, &pessoa)
            .await
            .map_err(CadastroError::storage("Erro ao alterar pessoa"))?;
        if changed == 0 {
            return Err(CadastroError::PessoaNotFound(id));
        }
        info!(id, "pessoa updated");
        Ok(pessoa.into_pessoa(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), CadastroError> {
        let removed = self
            .storage
            .delete(id)
            .await
            .map_err(CadastroError::storage("Erro ao excluir pessoa"))?;
        if removed == 0 {
            return Err(CadastroError::PessoaNotFound(id));
        }
        info!(id, "pessoa deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        for nome in [None, Some(String::new()), Some("   ".to_string())] {
            let payload = PessoaPayload {
                nome,
                ..Default::default()
            };
            assert!(matches!(payload.validate(), Err(CadastroError::MissingName)));
        }
    }

    #[test]
    fn fields_pass_through_untouched() {
        let payload = PessoaPayload {
            nome: Some(" Ana ".to_string()),
            email: Some(String::new()),
            telefone: None,
            data_nascimento: Some("1990-05-17".to_string()),
        };
        let pessoa = payload.validate().expect("valid payload");
        assert_eq!(pessoa.nome, " Ana ");
        assert_eq!(pessoa.email.as_deref(), Some(""));
        assert_eq!(pessoa.data_nascimento.as_deref(), Some("1990-05-17"));
    }
}

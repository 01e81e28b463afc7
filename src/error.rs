use axum::{
    Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::{debug, error};

pub const INVALID_BODY_MESSAGE: &str = "Corpo da requisição inválido";

#[derive(Debug, ThisError)]
pub enum CadastroError {
    #[error("Nome é obrigatório")]
    MissingName,

    #[error("Pessoa não encontrada")]
    PessoaNotFound(i64),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("Erro ao buscar pessoas por nome: {0}")]
    Search(#[source] SqlxError),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("API error with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Session is not authenticated")]
    Unauthenticated,

    #[error("Login rejected")]
    LoginRejected,
}

impl CadastroError {
    /// Attach a fixed, client-safe message to a store failure.
    pub fn storage(context: &'static str) -> impl FnOnce(SqlxError) -> Self {
        move |source| CadastroError::Storage { context, source }
    }

    /// Message shown to an end user; prefers what the server said.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CadastroError::Api { message, .. } if !message.is_empty() => message.clone(),
            CadastroError::MissingName | CadastroError::PessoaNotFound(_) => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<figment::Error> for CadastroError {
    fn from(e: figment::Error) -> Self {
        CadastroError::Config(Box::new(e))
    }
}

impl IntoResponse for CadastroError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            CadastroError::MissingName => (
                StatusCode::BAD_REQUEST,
                ApiErrorResponse::new(self.to_string()),
            ),
            CadastroError::PessoaNotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiErrorResponse::new(self.to_string()),
            ),
            CadastroError::InvalidBody(rejection) => {
                debug!(error = %rejection, "request body rejected");
                (rejection.status(), ApiErrorResponse::new(INVALID_BODY_MESSAGE))
            }
            CadastroError::Storage { context, source } => {
                error!(error = %source, "{context}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new(context),
                )
            }
            CadastroError::Search(source) => {
                error!(error = %source, "search by name failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse {
                        error: "Erro ao buscar pessoas por nome".to_string(),
                        details: Some("Erro ao buscar pessoas por nome".to_string()),
                    },
                )
            }
            other => {
                error!(error = %other, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("Erro interno do servidor"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// JSON error body shared by the server and the client.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn into_message(self) -> String {
        if !self.error.is_empty() {
            self.error
        } else {
            self.details.unwrap_or_default()
        }
    }
}

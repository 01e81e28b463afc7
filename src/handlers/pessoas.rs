//! JSON handlers for `/api/pessoas`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::db::Pessoa;
use crate::error::CadastroError;
use crate::middleware::json_body::JsonBody;
use crate::router::CadastroState;
use crate::service::PessoaPayload;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub nome: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/pessoas
pub async fn list_pessoas(
    State(state): State<CadastroState>,
) -> Result<Json<Vec<Pessoa>>, CadastroError> {
    Ok(Json(state.pessoas.list().await?))
}

/// GET /api/pessoas/busca?nome=...
pub async fn search_pessoas(
    State(state): State<CadastroState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Pessoa>>, CadastroError> {
    Ok(Json(state.pessoas.search(query.nome.as_deref()).await?))
}

/// GET /api/pessoas/{id}
pub async fn get_pessoa(
    State(state): State<CadastroState>,
    Path(id): Path<i64>,
) -> Result<Json<Pessoa>, CadastroError> {
    Ok(Json(state.pessoas.get(id).await?))
}

/// POST /api/pessoas
pub async fn create_pessoa(
    State(state): State<CadastroState>,
    JsonBody(payload): JsonBody<PessoaPayload>,
) -> Result<impl IntoResponse, CadastroError> {
    let pessoa = state.pessoas.create(payload).await?;
    Ok((StatusCode::CREATED, Json(pessoa)))
}

/// PUT /api/pessoas/{id}
pub async fn update_pessoa(
    State(state): State<CadastroState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<PessoaPayload>,
) -> Result<Json<Pessoa>, CadastroError> {
    Ok(Json(state.pessoas.update(id, payload).await?))
}

/// DELETE /api/pessoas/{id}
pub async fn delete_pessoa(
    State(state): State<CadastroState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, CadastroError> {
    state.pessoas.delete(id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

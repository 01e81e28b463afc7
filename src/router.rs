use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::get,
};
use axum_extra::extract::cookie::Key;

use crate::handlers::{pages, pessoas, session};
use crate::middleware::session::require_session;
use crate::service::{CredentialVerifier, PessoaService, SessionStore};

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct CadastroState {
    pub pessoas: PessoaService,
    pub sessions: Arc<dyn SessionStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub secure_cookie: bool,
    cookie_key: Key,
}

impl CadastroState {
    pub fn new(
        pessoas: PessoaService,
        sessions: Arc<dyn SessionStore>,
        credentials: Arc<dyn CredentialVerifier>,
        cookie_key: Key,
        secure_cookie: bool,
    ) -> Self {
        Self {
            pessoas,
            sessions,
            credentials,
            secure_cookie,
            cookie_key,
        }
    }
}

impl FromRef<CadastroState> for Key {
    fn from_ref(state: &CadastroState) -> Self {
        state.cookie_key.clone()
    }
}

/// Build the application router.
///
/// `/login` and `/logout` are public; the management page and everything
/// under `/api` sit behind the session gate. The literal
/// `/api/pessoas/busca` route takes precedence over `/api/pessoas/{id}`.
pub fn cadastro_router(state: CadastroState) -> Router {
    let protected = Router::new()
        .route("/", get(pages::management_page))
        .route(
            "/api/pessoas",
            get(pessoas::list_pessoas).post(pessoas::create_pessoa),
        )
        .route("/api/pessoas/busca", get(pessoas::search_pessoas))
        .route(
            "/api/pessoas/{id}",
            get(pessoas::get_pessoa)
                .put(pessoas::update_pessoa)
                .delete(pessoas::delete_pessoa),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/login", get(pages::login_page).post(session::login))
        .route("/logout", get(session::logout))
        .merge(protected)
        .with_state(state)
}

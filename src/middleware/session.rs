use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::debug;

use crate::handlers::session::{LOGIN_PATH, session_token};
use crate::router::CadastroState;
use crate::service::SessionState;

/// Resolve the session behind the request's cookie.
/// Missing, undecryptable, and unknown tokens are all anonymous.
pub fn session_state(state: &CadastroState, jar: &PrivateCookieJar) -> SessionState {
    match session_token(jar) {
        Some(token) => state.sessions.state(&token),
        None => SessionState::Anonymous,
    }
}

/// Pass authenticated requests through; send everyone else to the login page.
pub async fn require_session(
    State(state): State<CadastroState>,
    jar: PrivateCookieJar,
    req: Request,
    next: Next,
) -> Response {
    match session_state(&state, &jar) {
        SessionState::Authenticated => next.run(req).await,
        SessionState::Anonymous => {
            debug!(path = %req.uri().path(), "anonymous request redirected to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

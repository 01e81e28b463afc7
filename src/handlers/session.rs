use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::router::CadastroState;
use crate::service::SessionToken;

pub const SESSION_COOKIE: &str = "cadastro_sessao";
pub const LOGIN_PATH: &str = "/login";
pub const LOGIN_FAILED_PATH: &str = "/login?erro=1";
pub const HOME_PATH: &str = "/";

/// Form posted by the login page.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub senha: String,
}

/// POST /login -> opens a session on a credential match, else back to the form.
pub async fn login(
    State(state): State<CadastroState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if !state.credentials.verify(&form.login, &form.senha) {
        warn!(login = %form.login, "login rejected");
        return (jar, Redirect::to(LOGIN_FAILED_PATH));
    }

    // A previous session on this browser is replaced, not reused.
    if let Some(old) = session_token(&jar) {
        state.sessions.destroy(&old);
    }

    let token = state.sessions.authenticate();
    info!(login = %form.login, "login accepted");
    let jar = jar.add(build_cookie(token, state.secure_cookie));
    (jar, Redirect::to(HOME_PATH))
}

/// GET /logout -> drops the server-side session and the cookie.
pub async fn logout(
    State(state): State<CadastroState>,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    if let Some(token) = session_token(&jar)
        && state.sessions.destroy(&token)
    {
        info!("session closed");
    }
    (jar.remove(clear_cookie()), Redirect::to(LOGIN_PATH))
}

pub fn session_token(jar: &PrivateCookieJar) -> Option<SessionToken> {
    jar.get(SESSION_COOKIE)
        .map(|c| SessionToken::from(c.value().to_owned()))
}

fn build_cookie(token: SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .build()
}

use axum::{extract::Query, response::Html};
use serde::Deserialize;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const LOGIN_HTML: &str = include_str!("../../assets/login.html");
const ERROR_SLOT: &str = "<!--erro-->";

#[derive(Debug, Deserialize)]
pub struct LoginPageQuery {
    pub erro: Option<String>,
}

/// GET / (behind the session gate)
pub async fn management_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /login
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let notice = if query.erro.is_some() {
        r#"<p class="erro">Login ou senha inválidos.</p>"#
    } else {
        ""
    };
    Html(LOGIN_HTML.replace(ERROR_SLOT, notice))
}

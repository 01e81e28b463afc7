mod common;

use axum::http::{StatusCode, header};
use common::{LOGIN, SENHA, api_request, login_cookie, login_request, send, spawn_app};
use serde_json::json;

#[tokio::test]
async fn anonymous_requests_are_sent_to_login() {
    let t = spawn_app("anon").await;

    let requests = [
        api_request("GET", "/", None, None),
        api_request("GET", "/api/pessoas", None, None),
        api_request("GET", "/api/pessoas/1", None, None),
        api_request("GET", "/api/pessoas/busca?nome=a", None, None),
        api_request("POST", "/api/pessoas", None, Some(json!({"nome": "Ana"}))),
        api_request("PUT", "/api/pessoas/1", None, Some(json!({"nome": "Ana"}))),
        api_request("DELETE", "/api/pessoas/1", None, None),
    ];
    for req in requests {
        let uri = req.uri().to_string();
        let resp = send(&t.app, req).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(resp.location(), Some("/login"), "{uri}");
    }

    // The anonymous POST must not have written anything.
    let cookie = login_cookie(&t.app).await;
    let list = send(&t.app, api_request("GET", "/api/pessoas", Some(&cookie), None)).await;
    assert_eq!(list.json(), json!([]));
}

#[tokio::test]
async fn wrong_credentials_redirect_back_with_error_flag() {
    let t = spawn_app("bad-login").await;

    for (login, senha) in [("admin", "errada"), ("root", "segredo"), ("", "")] {
        let resp = send(&t.app, login_request(login, senha)).await;
        assert_eq!(resp.status, StatusCode::SEE_OTHER);
        assert_eq!(resp.location(), Some("/login?erro=1"));
        assert!(resp.headers.get(header::SET_COOKIE).is_none());
    }
    assert!(t.sessions.is_empty());
}

#[tokio::test]
async fn login_page_shows_error_only_when_flagged() {
    let t = spawn_app("login-page").await;

    let plain = send(&t.app, api_request("GET", "/login", None, None)).await;
    assert_eq!(plain.status, StatusCode::OK);
    assert!(plain.text().contains(r#"action="/login""#));
    assert!(!plain.text().contains("inválidos"));

    let flagged = send(&t.app, api_request("GET", "/login?erro=1", None, None)).await;
    assert_eq!(flagged.status, StatusCode::OK);
    assert!(flagged.text().contains("Login ou senha inválidos."));
}

#[tokio::test]
async fn authenticated_session_reaches_management_page() {
    let t = spawn_app("page").await;
    let cookie = login_cookie(&t.app).await;

    let resp = send(&t.app, api_request("GET", "/", Some(&cookie), None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.text().contains("tabelaCorpo"));
    assert!(!resp.text().contains("<script"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let t = spawn_app("logout").await;
    let cookie = login_cookie(&t.app).await;
    assert_eq!(t.sessions.len(), 1);

    let before = send(&t.app, api_request("GET", "/api/pessoas", Some(&cookie), None)).await;
    assert_eq!(before.status, StatusCode::OK);

    let out = send(&t.app, api_request("GET", "/logout", Some(&cookie), None)).await;
    assert_eq!(out.status, StatusCode::SEE_OTHER);
    assert_eq!(out.location(), Some("/login"));
    assert!(t.sessions.is_empty());

    // Replaying the old cookie no longer works.
    let after = send(&t.app, api_request("GET", "/api/pessoas", Some(&cookie), None)).await;
    assert_eq!(after.status, StatusCode::SEE_OTHER);
    assert_eq!(after.location(), Some("/login"));
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let t = spawn_app("logout-anon").await;

    let resp = send(&t.app, api_request("GET", "/logout", None, None)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn forged_cookie_is_anonymous() {
    let t = spawn_app("forged").await;
    let _ = login_cookie(&t.app).await;

    let resp = send(
        &t.app,
        api_request(
            "GET",
            "/api/pessoas",
            Some("cadastro_sessao=not-encrypted-by-us"),
            None,
        ),
    )
    .await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn logging_in_again_replaces_the_previous_session() {
    let t = spawn_app("relogin").await;
    let first = login_cookie(&t.app).await;
    assert_eq!(t.sessions.len(), 1);

    let mut req = login_request(common::LOGIN, common::SENHA);
    req.headers_mut().insert(
        header::COOKIE,
        first.parse().expect("cookie is a valid header"),
    );
    let resp = send(&t.app, req).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(t.sessions.len(), 1);

    let stale = send(&t.app, api_request("GET", "/api/pessoas", Some(&first), None)).await;
    assert_eq!(stale.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn default_session_cookie_works_over_plain_http() {
    let t = spawn_app("plain-http-cookie").await;

    let resp = send(&t.app, login_request(LOGIN, SENHA)).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    let set_cookie = resp
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("cadastro_sessao="))
        .expect("login did not set the session cookie")
        .to_string();
    let attrs: Vec<&str> = set_cookie.split(';').map(str::trim).collect();
    assert!(!attrs.iter().any(|a| a.eq_ignore_ascii_case("secure")), "{set_cookie}");
    assert!(attrs.iter().any(|a| a.eq_ignore_ascii_case("httponly")), "{set_cookie}");

    let cookie = attrs[0];
    let page = send(&t.app, api_request("GET", "/", Some(cookie), None)).await;
    assert_eq!(page.status, StatusCode::OK);
}

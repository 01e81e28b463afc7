use std::future::Future;

use reqwest::header::{COOKIE, HeaderValue, LOCATION, SET_COOKIE};
use reqwest::{Method, RequestBuilder, Response, redirect};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::db::Pessoa;
use crate::error::{ApiErrorResponse, CadastroError};
use crate::handlers::pessoas::DeleteResponse;
use crate::handlers::session::{LOGIN_FAILED_PATH, SESSION_COOKIE};
use crate::service::PessoaPayload;

/// Operations the management screen needs from the server.
pub trait PessoaApi: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Pessoa>, CadastroError>> + Send;

    fn search(&self, nome: &str)
    -> impl Future<Output = Result<Vec<Pessoa>, CadastroError>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = Result<Pessoa, CadastroError>> + Send;

    fn create(
        &self,
        payload: &PessoaPayload,
    ) -> impl Future<Output = Result<Pessoa, CadastroError>> + Send;

    fn update(
        &self,
        id: i64,
        payload: &PessoaPayload,
    ) -> impl Future<Output = Result<Pessoa, CadastroError>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<(), CadastroError>> + Send;
}

/// reqwest-backed [`PessoaApi`] carrying the session cookie obtained by [`login`].
///
/// Redirects are not followed: the gate answers anonymous calls with a
/// redirect to the login page, which is reported as [`CadastroError::Unauthenticated`].
///
/// [`login`]: HttpPessoaApi::login
#[derive(Clone)]
pub struct HttpPessoaApi {
    client: reqwest::Client,
    base: Url,
    cookie: Option<HeaderValue>,
}

impl HttpPessoaApi {
    pub fn new(base: Url) -> Result<Self, CadastroError> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base,
            cookie: None,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.cookie.is_some()
    }

    /// Post the login form and keep the session cookie the server sets.
    pub async fn login(&mut self, login: &str, senha: &str) -> Result<(), CadastroError> {
        let resp = self
            .client
            .post(self.url("/login")?)
            .form(&[("login", login), ("senha", senha)])
            .send()
            .await?;

        let rejected = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .is_none_or(|location| location == LOGIN_FAILED_PATH);
        if rejected {
            return Err(CadastroError::LoginRejected);
        }

        let prefix = format!("{SESSION_COOKIE}=");
        let cookie = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&prefix) && pair.len() > prefix.len())
            .ok_or(CadastroError::LoginRejected)?;

        self.cookie = Some(
            HeaderValue::from_str(cookie).map_err(|_| CadastroError::LoginRejected)?,
        );
        info!(base = %self.base, "logged in");
        Ok(())
    }

    pub async fn logout(&mut self) -> Result<(), CadastroError> {
        let url = self.url("/logout")?;
        self.request(Method::GET, url).send().await?;
        self.cookie = None;
        Ok(())
    }

    fn url(&self, path: &str) -> Result<Url, CadastroError> {
        Ok(self.base.join(path)?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie.clone()),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, CadastroError> {
        read_json(builder.send().await?).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, CadastroError> {
    let status = resp.status();
    if status.is_redirection() {
        return Err(CadastroError::Unauthenticated);
    }
    if !status.is_success() {
        let message = resp
            .json::<ApiErrorResponse>()
            .await
            .map(ApiErrorResponse::into_message)
            .unwrap_or_default();
        debug!(status = status.as_u16(), %message, "api call failed");
        return Err(CadastroError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.json().await?)
}

impl PessoaApi for HttpPessoaApi {
    async fn list(&self) -> Result<Vec<Pessoa>, CadastroError> {
        let url = self.url("/api/pessoas")?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn search(&self, nome: &str) -> Result<Vec<Pessoa>, CadastroError> {
        let url = self.url("/api/pessoas/busca")?;
        Self::send_json(self.request(Method::GET, url).query(&[("nome", nome)])).await
    }

    async fn get(&self, id: i64) -> Result<Pessoa, CadastroError> {
        let url = self.url(&format!("/api/pessoas/{id}"))?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    async fn create(&self, payload: &PessoaPayload) -> Result<Pessoa, CadastroError> {
        let url = self.url("/api/pessoas")?;
        Self::send_json(self.request(Method::POST, url).json(payload)).await
    }

    async fn update(&self, id: i64, payload: &PessoaPayload) -> Result<Pessoa, CadastroError> {
        let url = self.url(&format!("/api/pessoas/{id}"))?;
        Self::send_json(self.request(Method::PUT, url).json(payload)).await
    }

    async fn delete(&self, id: i64) -> Result<(), CadastroError> {
        let url = self.url(&format!("/api/pessoas/{id}"))?;
        let _: DeleteResponse = Self::send_json(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

use tracing::warn;

use crate::client::api::PessoaApi;
use crate::client::format::format_birth_date;
use crate::db::Pessoa;
use crate::error::CadastroError;
use crate::service::PessoaPayload;

pub const MSG_NOME_OBRIGATORIO: &str = "Nome é obrigatório.";
pub const MSG_CONFIRMA_EXCLUSAO: &str = "Tem certeza que deseja excluir esta pessoa?";

/// What the screen can do. Implemented by whatever renders the page.
pub trait View {
    /// Replace every row of the table.
    fn render_table(&mut self, rows: &[TableRow]);
    fn alert(&mut self, message: &str);
    fn confirm(&mut self, message: &str) -> bool;
    fn fill_form(&mut self, form: &PessoaForm);
    fn reset_form(&mut self);
    fn set_cancel_visible(&mut self, visible: bool);
}

/// Raw form field values; the date stays ISO so a date input can take it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PessoaForm {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub data_nascimento: String,
}

impl PessoaForm {
    pub fn to_payload(&self) -> PessoaPayload {
        PessoaPayload {
            nome: Some(self.nome.clone()),
            email: Some(self.email.clone()),
            telefone: Some(self.telefone.clone()),
            data_nascimento: Some(self.data_nascimento.clone()),
        }
    }
}

impl From<&Pessoa> for PessoaForm {
    fn from(p: &Pessoa) -> Self {
        Self {
            nome: p.nome.clone(),
            email: p.email.clone().unwrap_or_default(),
            telefone: p.telefone.clone().unwrap_or_default(),
            data_nascimento: p.data_nascimento.clone().unwrap_or_default(),
        }
    }
}

/// One rendered table line. `numero` is the 1-based position in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub numero: usize,
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub data_nascimento: String,
}

impl TableRow {
    fn new(numero: usize, p: &Pessoa) -> Self {
        Self {
            numero,
            id: p.id,
            nome: p.nome.clone(),
            email: p.email.clone().unwrap_or_default(),
            telefone: p.telefone.clone().unwrap_or_default(),
            data_nascimento: format_birth_date(p.data_nascimento.as_deref()),
        }
    }
}

/// Drives the management screen.
///
/// Every action issues one request and waits for it. After a successful write
/// the whole list is fetched again and the table rebuilt; failures raise an
/// alert and leave form, table and `editing_id` untouched.
pub struct Controller<A, V> {
    api: A,
    view: V,
    editing_id: Option<i64>,
}

impl<A: PessoaApi, V: View> Controller<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            editing_id: None,
        }
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Fetch everything and redraw.
    pub async fn load(&mut self) {
        match self.api.list().await {
            Ok(pessoas) => self.render(&pessoas),
            Err(e) => self.fail(e, "Erro ao carregar pessoas"),
        }
    }

    /// Blank term shows the full list.
    pub async fn search(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return self.load().await;
        }
        match self.api.search(term).await {
            Ok(pessoas) => self.render(&pessoas),
            Err(e) => self.fail(e, "Erro ao buscar pessoas por nome"),
        }
    }

    pub async fn clear_search(&mut self) {
        self.load().await;
    }

    /// Update when a record is loaded for editing, create otherwise.
    pub async fn submit(&mut self, form: &PessoaForm) {
        if form.nome.trim().is_empty() {
            self.view.alert(MSG_NOME_OBRIGATORIO);
            return;
        }

        let payload = form.to_payload();
        let result = match self.editing_id {
            Some(id) => self
                .api
                .update(id, &payload)
                .await
                .map_err(|e| (e, "Erro ao atualizar pessoa")),
            None => self
                .api
                .create(&payload)
                .await
                .map_err(|e| (e, "Erro ao criar pessoa")),
        };

        match result {
            Ok(_) => {
                self.clear_form();
                self.load().await;
            }
            Err((e, fallback)) => self.fail(e, fallback),
        }
    }

    /// Load one record into the form.
    pub async fn edit(&mut self, id: i64) {
        match self.api.get(id).await {
            Ok(pessoa) => {
                self.editing_id = Some(pessoa.id);
                self.view.fill_form(&PessoaForm::from(&pessoa));
                self.view.set_cancel_visible(true);
            }
            Err(e) => self.fail(e, "Erro ao buscar pessoa"),
        }
    }

    pub async fn delete(&mut self, id: i64) {
        if !self.view.confirm(MSG_CONFIRMA_EXCLUSAO) {
            return;
        }
        match self.api.delete(id).await {
            Ok(()) => {
                if self.editing_id == Some(id) {
                    self.clear_form();
                }
                self.load().await;
            }
            Err(e) => self.fail(e, "Erro ao excluir pessoa"),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.clear_form();
    }

    fn clear_form(&mut self) {
        self.editing_id = None;
        self.view.reset_form();
        self.view.set_cancel_visible(false);
    }

    fn render(&mut self, pessoas: &[Pessoa]) {
        let rows: Vec<TableRow> = pessoas
            .iter()
            .enumerate()
            .map(|(i, p)| TableRow::new(i + 1, p))
            .collect();
        self.view.render_table(&rows);
    }

    fn fail(&mut self, err: CadastroError, fallback: &str) {
        warn!(error = %err, "{fallback}");
        self.view.alert(&err.user_message(fallback));
    }
}

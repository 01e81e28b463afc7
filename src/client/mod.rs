//! Client side of the record management screen.
//!
//! [`HttpPessoaApi`] speaks the JSON API; [`Controller`] owns the screen's
//! only piece of state (which record is being edited) and drives a [`View`].

pub mod api;
pub mod controller;
pub mod format;

pub use api::{HttpPessoaApi, PessoaApi};
pub use controller::{Controller, PessoaForm, TableRow, View};
pub use format::format_birth_date;

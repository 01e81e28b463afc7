pub mod pages;
pub mod pessoas;
pub mod session;

pub mod credentials;
pub mod pessoas;
pub mod session;

pub use credentials::{CredentialVerifier, FixedCredentials};
pub use pessoas::{PessoaPayload, PessoaService};
pub use session::{MemorySessionStore, SessionState, SessionStore, SessionToken};

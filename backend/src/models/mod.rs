//! Data models shared by the session authority and the API handlers.

pub mod credential;
pub mod session;
pub mod token;

pub use credential::{Credential, Provider};
pub use session::{ClaimId, Role, SessionRecord, SessionSeed, SessionUser, SessionView};
pub use token::{AccessClaims, BackendToken};

pub mod auth;
pub mod oauth;
pub mod session;

pub use auth::*;
pub use oauth::*;
pub use session::*;

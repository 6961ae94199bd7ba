pub mod auth_backend;
pub mod authority;
pub mod localization;
pub mod oauth;

pub use auth_backend::{AuthBackend, HttpAuthBackend};
pub use authority::{SessionAuthority, SessionRead};
pub use localization::{I18nLocalizer, Localizer};
pub use oauth::{OAuthClient, OAuthProvider};

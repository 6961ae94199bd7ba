use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        AuthBackend, HttpAuthBackend, I18nLocalizer, Localizer, OAuthClient, SessionAuthority,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub authority: Arc<SessionAuthority>,
    pub oauth: Arc<OAuthClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        backend: Arc<dyn AuthBackend>,
        localizer: Arc<dyn Localizer>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config: Arc::new(config),
            authority: Arc::new(SessionAuthority::new(backend, localizer)),
            oauth: Arc::new(OAuthClient::new(http)),
        }
    }

    /// Wires the HTTP auth backend and the bundled locale catalogs.
    ///
    /// The client carries no timeout, so a hung backend stalls the request.
    pub fn from_config(config: Config) -> Self {
        let http = reqwest::Client::new();
        let backend = Arc::new(HttpAuthBackend::new(
            http.clone(),
            config.endpoints.clone(),
        ));
        let localizer = Arc::new(I18nLocalizer::new(config.default_locale.clone()));
        Self::new(config, backend, localizer, http)
    }
}

//! User-facing messages emitted by the session authority.

/// Messages the authority can surface to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    RefreshTokenError,
}

impl Message {
    pub fn key(&self) -> &'static str {
        match self {
            Message::RefreshTokenError => "error-messages.refresh-token-error",
        }
    }
}

pub trait Localizer: Send + Sync {
    /// Renders `message` in `locale`, or in the default locale when it is
    /// `None` or not bundled.
    fn message(&self, message: Message, locale: Option<&str>) -> String;
}

fn is_bundled(locale: &str) -> bool {
    rust_i18n::available_locales!()
        .iter()
        .any(|available| available.to_string() == locale)
}

/// Picks the first bundled language of an `Accept-Language` header.
///
/// Quality weights are ignored; tags are taken in the order listed and
/// reduced to their primary subtag (`en-US` becomes `en`).
pub fn negotiate_locale(accept_language: &str) -> Option<String> {
    accept_language
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .map(|tag| tag.trim().split('-').next().unwrap_or("").to_ascii_lowercase())
        .find(|primary| !primary.is_empty() && is_bundled(primary))
}

/// Localizer backed by the bundled `locales/*.yml` catalogs.
#[derive(Debug, Clone)]
pub struct I18nLocalizer {
    default_locale: String,
}

impl I18nLocalizer {
    /// Unknown default locales fall back to Russian, the catalog of record.
    pub fn new(default_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        Self {
            default_locale: if is_bundled(&default_locale) {
                default_locale
            } else {
                "ru".to_string()
            },
        }
    }

    /// Locale a message for `requested` is rendered in.
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(locale) if is_bundled(locale) => locale,
            _ => &self.default_locale,
        }
    }
}

impl Localizer for I18nLocalizer {
    fn message(&self, message: Message, locale: Option<&str>) -> String {
        let locale = self.resolve(locale);
        match message {
            Message::RefreshTokenError => {
                rust_i18n::t!("error-messages.refresh-token-error", locale = locale).to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_error_is_translated_per_locale() {
        let localizer = I18nLocalizer::new("ru");
        let ru = localizer.message(Message::RefreshTokenError, None);
        let en = localizer.message(Message::RefreshTokenError, Some("en"));
        assert!(ru.starts_with("Произошла непредвиденная ошибка авторизации"));
        assert!(en.starts_with("An unexpected authorization error occurred"));
    }

    #[test]
    fn unknown_default_locale_falls_back_to_russian() {
        let localizer = I18nLocalizer::new("xx");
        assert_eq!(localizer.resolve(None), "ru");
    }

    #[test]
    fn unbundled_request_uses_default_locale() {
        let localizer = I18nLocalizer::new("en");
        assert_eq!(localizer.resolve(Some("de")), "en");
        assert_eq!(localizer.resolve(Some("ru")), "ru");
    }

    #[test]
    fn accept_language_picks_first_bundled_primary_tag() {
        assert_eq!(negotiate_locale("en-US,en;q=0.9").as_deref(), Some("en"));
        assert_eq!(negotiate_locale("de-DE, RU;q=0.8").as_deref(), Some("ru"));
        assert_eq!(negotiate_locale("fr, de"), None);
        assert_eq!(negotiate_locale(""), None);
    }

    #[test]
    fn message_keys_match_catalog_paths() {
        assert_eq!(
            Message::RefreshTokenError.key(),
            "error-messages.refresh-token-error"
        );
    }
}

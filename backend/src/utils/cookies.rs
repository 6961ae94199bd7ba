use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct CookieOptions {
    pub secure: bool,
    pub same_site: SameSite,
}

pub const SESSION_COOKIE_NAME: &str = "cinema.session-token";
pub const OAUTH_STATE_COOKIE_NAME: &str = "cinema.oauth-state";
pub const SESSION_COOKIE_PATH: &str = "/";
pub const OAUTH_STATE_COOKIE_PATH: &str = "/api/auth/callback";
pub const OAUTH_STATE_MAX_AGE: Duration = Duration::from_secs(10 * 60);

pub fn build_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    path: &str,
    options: CookieOptions,
) -> String {
    let mut cookie = format!(
        "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite={}",
        name,
        value,
        path,
        max_age.as_secs(),
        same_site_value(options.same_site)
    );
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn build_clear_cookie(name: &str, path: &str, options: CookieOptions) -> String {
    build_cookie(name, "", Duration::ZERO, path, options)
}

pub fn extract_cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_string())
    })
}

fn same_site_value(same_site: SameSite) -> &'static str {
    match same_site {
        SameSite::Lax => "Lax",
        SameSite::Strict => "Strict",
        SameSite::None => "None",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_cookie_includes_security_attributes() {
        let opts = CookieOptions {
            secure: true,
            same_site: SameSite::Lax,
        };
        let cookie = build_cookie(
            SESSION_COOKIE_NAME,
            "abc",
            Duration::from_secs(3600),
            SESSION_COOKIE_PATH,
            opts,
        );
        assert!(cookie.starts_with("cinema.session-token=abc"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Secure"));
    }

    #[test]
    fn build_clear_cookie_sets_max_age_zero() {
        let opts = CookieOptions {
            secure: false,
            same_site: SameSite::Strict,
        };
        let cookie = build_clear_cookie(OAUTH_STATE_COOKIE_NAME, OAUTH_STATE_COOKIE_PATH, opts);
        assert!(cookie.contains("cinema.oauth-state=;"));
        assert!(cookie.contains("Path=/api/auth/callback"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn extract_cookie_value_finds_matching_name() {
        let header = "a=1; cinema.session-token=token.value.sig; b=2";
        assert_eq!(
            extract_cookie_value(header, SESSION_COOKIE_NAME).as_deref(),
            Some("token.value.sig")
        );
        assert!(extract_cookie_value(header, "missing").is_none());
    }
}

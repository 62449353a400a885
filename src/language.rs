use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use federation_locale::{Locale, PreferenceStore, localize};
use time::Duration;

/// Locale a request is served in, together with the localized href it was
/// requested under. Set by [`crate::middleware::locale_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale {
    pub locale: Locale,
    pub href: String,
}

impl RequestLocale {
    pub fn new(locale: Locale, bare_path: &str, query: Option<&str>) -> Self {
        let path = localize(bare_path, locale);
        let href = match query {
            Some(query) if !query.is_empty() => format!("{path}?{query}"),
            _ => path,
        };

        Self { locale, href }
    }

    /// Localized href of `bare_path` in the request locale.
    pub fn link(&self, bare_path: &str) -> String {
        localize(bare_path, self.locale)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(locale) = parts.extensions.get::<RequestLocale>() {
            return Ok(locale.clone());
        }

        // routes outside the locale middleware are served in the default locale
        Ok(RequestLocale::new(
            Locale::DEFAULT,
            parts.uri.path(),
            parts.uri.query(),
        ))
    }
}

/// [`PreferenceStore`] backed by the request cookies. Written values are
/// sent back through [`CookiePreferenceStore::into_jar`].
#[derive(Debug, Clone, Default)]
pub struct CookiePreferenceStore {
    jar: CookieJar,
}

impl CookiePreferenceStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl PreferenceStore for CookiePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_owned())
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) {
        let cookie = Cookie::build((key.to_owned(), value.to_owned()))
            .path("/")
            .max_age(ttl)
            .same_site(SameSite::Lax)
            .build();

        self.jar = self.jar.clone().add(cookie);
    }
}

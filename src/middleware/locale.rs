use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use federation_locale::{Locale, canonical_path, localize, negotiate, preferred_locale};

use crate::{
    language::{CookiePreferenceStore, RequestLocale},
    routes::AppState,
};

/// Path prefixes served identically in every locale.
const UNLOCALIZED: [&str; 5] = ["/static", "/api", "/locale", "/health", "/ready"];

fn is_unlocalized(path: &str) -> bool {
    UNLOCALIZED.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

fn with_query(path: String, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path,
    }
}

fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

/// Locale selected for an unprefixed page request: the remembered choice,
/// else the browser's languages when detection is enabled.
fn preferred(jar: CookieJar, accept_language: Option<&str>, detect: bool) -> Option<Locale> {
    let store = CookiePreferenceStore::new(jar);
    if let Some(locale) = preferred_locale(&store) {
        return Some(locale);
    }

    if detect {
        return accept_language.and_then(negotiate);
    }

    None
}

/// Resolves the locale of every page request before routing.
///
/// - non-canonical paths (`/en/news`, `/ar/ar/news`, `//news`) redirect
///   permanently to their canonical form
/// - `/ar/...` is stripped to its bare path and served in Arabic
/// - bare page paths redirect to the preferred locale when it is not the
///   default one
pub async fn locale_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let query = req.uri().query().map(str::to_owned);

    if is_unlocalized(&path) {
        return next.run(req).await;
    }

    if let Some(canonical) = canonical_path(&path) {
        tracing::debug!(from = %path, to = %canonical, "redirecting to canonical path");

        return redirect(
            StatusCode::PERMANENT_REDIRECT,
            &with_query(canonical, query.as_deref()),
        );
    }

    let (locale, bare) = Locale::from_path(&path);

    if locale.is_default() && matches!(*req.method(), Method::GET | Method::HEAD) {
        let accept_language = req
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());

        let preferred = preferred(jar, accept_language, state.config.locale.detect_from_header)
            .filter(|locale| !locale.is_default());

        if let Some(preferred) = preferred {
            return redirect(
                StatusCode::TEMPORARY_REDIRECT,
                &with_query(localize(&bare, preferred), query.as_deref()),
            );
        }
    }

    let rewritten = with_query(bare.clone(), query.as_deref());
    match rewritten.parse::<Uri>() {
        Ok(uri) => *req.uri_mut() = uri,
        Err(err) => {
            tracing::warn!(path = %path, "unable to rewrite localized path: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    }

    req.extensions_mut()
        .insert(RequestLocale::new(locale, &bare, query.as_deref()));

    next.run(req).await
}

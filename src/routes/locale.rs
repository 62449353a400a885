use axum::{
    extract::{Path, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use federation_locale::{Locale, localize, switch_locale};
use serde::Deserialize;

use crate::{language::CookiePreferenceStore, template::Template};

#[derive(Deserialize)]
pub struct SwitchQuery {
    pub from: Option<String>,
}

/// Only same-site hrefs are followed. Browsers drop tabs and newlines from
/// `Location`, so `/\t/host` would be read as `//host`.
fn is_local_href(href: &str) -> bool {
    href.starts_with('/')
        && !href.starts_with("//")
        && !href.contains('\\')
        && !href.chars().any(char::is_control)
}

/// GET /locale/{target}?from=<href> - remembers `target` and sends the
/// visitor to the equivalent of `from` in that locale.
pub async fn switch(
    template: Template,
    Path(target): Path<String>,
    Query(query): Query<SwitchQuery>,
    jar: CookieJar,
) -> Response {
    let Ok(target) = Locale::parse(&target) else {
        return crate::routes::fallback(template).await.into_response();
    };

    let from = query
        .from
        .filter(|href| is_local_href(href))
        .unwrap_or_else(|| "/".to_owned());

    let path = from.split(['?', '#']).next().unwrap_or("/");
    let (current, _) = Locale::from_path(path);

    let mut store = CookiePreferenceStore::new(jar);
    let destination = switch_locale(&mut store, &from, current, target).unwrap_or(from);

    let location = HeaderValue::from_str(&destination)
        .or_else(|_| HeaderValue::from_str(&localize("/", target)));

    match location {
        Ok(location) => (
            StatusCode::SEE_OTHER,
            store.into_jar(),
            [(header::LOCATION, location)],
        )
            .into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

use axum::{
    Router,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use federation_contact::ContactService;

use crate::{
    assets::AssetsService,
    template::{NotFoundTemplate, Template},
};

mod api;
mod contact;
mod health;
mod locale;
mod pages;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub contact: ContactService,
}

pub async fn fallback(template: Template) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        template.render(NotFoundTemplate {
            shell: template.shell(None),
        }),
    )
}

/// Address of the visitor as reported by the reverse proxy.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
        })
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_owned)
}

/// Application routes behind the locale middleware. The middleware wraps
/// the whole router so that `/ar/...` is rewritten before routing.
pub fn router(app_state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/mission", get(pages::mission))
        .route("/leadership", get(pages::leadership))
        .route("/news", get(pages::news))
        .route("/events", get(pages::events))
        .route("/contact", get(contact::page).post(contact::action))
        .route("/contact/validate", post(contact::validate))
        .route("/api/contact", post(api::contact))
        .route("/locale/{target}", get(locale::switch))
        .nest_service("/static", AssetsService::new())
        .fallback(fallback)
        .with_state(app_state.clone());

    Router::new()
        .fallback_service(routes)
        .layer(axum::middleware::from_fn_with_state(
            app_state,
            crate::middleware::locale_middleware,
        ))
}

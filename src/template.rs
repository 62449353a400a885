use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};
use federation_locale::Locale;
use std::{collections::HashMap, convert::Infallible};
use strum::VariantArray;

use crate::language::RequestLocale;

pub(crate) mod filters {
    #[askama::filter_fn]
    pub fn t(value: &str, values: &dyn askama::Values) -> askama::Result<String> {
        let lang = askama::get_value::<String>(values, "lang")?;

        Ok(rust_i18n::t!(value, locale = lang).to_string())
    }
}

/// Pages listed in the site navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray)]
pub enum Page {
    Home,
    About,
    Mission,
    Leadership,
    News,
    Events,
    Contact,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::About => "/about",
            Page::Mission => "/mission",
            Page::Leadership => "/leadership",
            Page::News => "/news",
            Page::Events => "/events",
            Page::Contact => "/contact",
        }
    }

    pub fn title_key(self) -> &'static str {
        match self {
            Page::Home => "nav_home",
            Page::About => "nav_about",
            Page::Mission => "nav_mission",
            Page::Leadership => "nav_leadership",
            Page::News => "nav_news",
            Page::Events => "nav_events",
            Page::Contact => "nav_contact",
        }
    }
}

pub struct NavLink {
    pub href: String,
    pub label: String,
    pub active: bool,
}

/// Layout data shared by every page: document language and direction,
/// navigation and the language switcher.
pub struct Shell {
    pub lang: &'static str,
    pub dir: &'static str,
    pub title: String,
    pub home_href: String,
    pub nav: Vec<NavLink>,
    pub switch_href: String,
    pub switch_lang: &'static str,
    pub switch_label: &'static str,
}

pub struct Template {
    locale: RequestLocale,
}

impl Template {
    pub fn new(locale: RequestLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale.locale
    }

    /// Localized href of `bare_path` in the request locale.
    pub fn link(&self, bare_path: &str) -> String {
        self.locale.link(bare_path)
    }

    pub fn translate(&self, key: &str) -> String {
        rust_i18n::t!(key, locale = self.locale().tag()).to_string()
    }

    pub fn shell(&self, current: Option<Page>) -> Shell {
        let locale = self.locale();
        let other = locale.other();

        let nav = Page::VARIANTS
            .iter()
            .map(|page| NavLink {
                href: self.link(page.path()),
                label: self.translate(page.title_key()),
                active: Some(*page) == current,
            })
            .collect();

        let title = match current {
            Some(page) => format!(
                "{} | {}",
                self.translate(page.title_key()),
                self.translate("site_name")
            ),
            None => self.translate("site_name"),
        };

        Shell {
            lang: locale.tag(),
            dir: locale.dir(),
            title,
            home_href: self.link("/"),
            nav,
            switch_href: format!(
                "/locale/{}?from={}",
                other.tag(),
                urlencoding::encode(&self.locale.href)
            ),
            switch_lang: other.tag(),
            switch_label: other.native_name(),
        }
    }

    fn render_with_values<T: askama::Template>(
        &self,
        template: T,
    ) -> Result<String, askama::Error> {
        let mut values: HashMap<&str, Box<dyn std::any::Any>> = HashMap::new();
        values.insert("lang", Box::new(self.locale().tag().to_owned()));

        #[cfg(debug_assertions)]
        {
            values.insert("is_dev", Box::new(true));
        }
        #[cfg(not(debug_assertions))]
        {
            values.insert("is_dev", Box::new(false));
        }

        template.render_with_values(&values)
    }

    pub fn render<T: askama::Template>(&self, template: T) -> Response {
        match self.render_with_values(template) {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Failed to render template: {err}");

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to render template. Error: {err}"),
                )
                    .into_response()
            }
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Template {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Ok(locale) = parts.extract::<RequestLocale>().await;

        Ok(Template::new(locale))
    }
}

#[derive(askama::Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub shell: Shell,
}

use axum::response::IntoResponse;

use crate::template::{Page, Shell, Template, filters};

#[derive(askama::Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: Shell,
    pub contact_href: String,
}

pub async fn home(template: Template) -> impl IntoResponse {
    template.render(HomeTemplate {
        shell: template.shell(Some(Page::Home)),
        contact_href: template.link(Page::Contact.path()),
    })
}

#[derive(askama::Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub shell: Shell,
}

pub async fn about(template: Template) -> impl IntoResponse {
    template.render(AboutTemplate {
        shell: template.shell(Some(Page::About)),
    })
}

#[derive(askama::Template)]
#[template(path = "mission.html")]
pub struct MissionTemplate {
    pub shell: Shell,
}

pub async fn mission(template: Template) -> impl IntoResponse {
    template.render(MissionTemplate {
        shell: template.shell(Some(Page::Mission)),
    })
}

#[derive(askama::Template)]
#[template(path = "leadership.html")]
pub struct LeadershipTemplate {
    pub shell: Shell,
}

pub async fn leadership(template: Template) -> impl IntoResponse {
    template.render(LeadershipTemplate {
        shell: template.shell(Some(Page::Leadership)),
    })
}

#[derive(askama::Template)]
#[template(path = "news.html")]
pub struct NewsTemplate {
    pub shell: Shell,
}

pub async fn news(template: Template) -> impl IntoResponse {
    template.render(NewsTemplate {
        shell: template.shell(Some(Page::News)),
    })
}

#[derive(askama::Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub shell: Shell,
}

pub async fn events(template: Template) -> impl IntoResponse {
    template.render(EventsTemplate {
        shell: template.shell(Some(Page::Events)),
    })
}

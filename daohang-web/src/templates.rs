//! Template system for server-side rendering
//!
//! Askama templates plus the view models the homepage is built from.

use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Datelike, Utc};
use daohang_core::{Category, NavigationDocument, Site};
use tracing::error;

/// Badge colours, picked by the first character of the site name
const BADGE_COLORS: [&str; 8] = [
    "#667eea", "#764ba2", "#f56565", "#ed8936", "#ecc94b", "#48bb78", "#38b2ac", "#4299e1",
];

const DEFAULT_CATEGORY_ICON: &str = "📂";

/// Public homepage
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site_name: String,
    pub description: String,
    pub body_style: String,
    pub show_search: bool,
    pub categories: Vec<CategoryView>,
    pub version: String,
    pub updated_on: String,
    pub year: i32,
}

/// Admin login page
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Admin panel: the whole document as editable JSON
#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub site_name: String,
    pub owner: String,
    pub document_json: String,
    pub updated_at: String,
    pub version: String,
}

/// Error page template
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub heading: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub sites: Vec<SiteView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteView {
    pub name: String,
    pub description: String,
    /// Only set when the stored URL parses as http(s)
    pub href: Option<String>,
    pub icon: Option<String>,
    pub badge: Badge,
}

/// Letter-on-colour stand-in for a missing site icon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub letter: String,
    pub color: &'static str,
}

impl Badge {
    pub fn for_name(name: &str) -> Self {
        match name.chars().next() {
            Some(first) => Self {
                letter: first.to_uppercase().collect(),
                color: BADGE_COLORS[first as usize % BADGE_COLORS.len()],
            },
            None => Self {
                letter: "?".to_string(),
                color: BADGE_COLORS[0],
            },
        }
    }
}

/// `Some(url)` when `raw` is an absolute http or https URL
pub fn link_target(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

impl From<&Site> for SiteView {
    fn from(site: &Site) -> Self {
        Self {
            name: site.name.clone(),
            description: site.description.clone(),
            href: link_target(&site.url),
            icon: Some(site.icon.trim())
                .filter(|icon| !icon.is_empty())
                .map(str::to_string),
            badge: Badge::for_name(&site.name),
        }
    }
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        let icon = category.icon.trim();
        Self {
            id: category.id.to_string(),
            name: category.name.clone(),
            icon: if icon.is_empty() {
                DEFAULT_CATEGORY_ICON.to_string()
            } else {
                icon.to_string()
            },
            sites: category
                .sorted_sites()
                .into_iter()
                .map(SiteView::from)
                .collect(),
        }
    }
}

impl HomeTemplate {
    pub fn new(document: &NavigationDocument, version: &str) -> Self {
        let config = &document.config;
        let body_style = match link_target(&config.bg_image) {
            Some(image) => format!(
                "background-image: url('{}'); background-size: cover; \
                 background-attachment: fixed;",
                image
            ),
            None => format!("background-color: {};", background_color(&config.bg_color)),
        };

        Self {
            site_name: document.site_name.clone(),
            description: document.description.clone(),
            body_style,
            show_search: config.show_search,
            categories: document
                .visible_categories()
                .into_iter()
                .map(CategoryView::from)
                .collect(),
            version: version.to_string(),
            updated_on: document.updated_at.format("%Y-%m-%d").to_string(),
            year: Utc::now().year(),
        }
    }
}

/// Accept plain colour values only; anything else falls back to the default
fn background_color(raw: &str) -> &str {
    let raw = raw.trim();
    let plain = !raw.is_empty()
        && raw.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | ' ' | '%')
        });
    if plain {
        raw
    } else {
        "#f8fafc"
    }
}

impl LoginTemplate {
    pub fn new(error: Option<String>) -> Self {
        Self { error }
    }
}

impl AdminTemplate {
    pub fn new(
        document: &NavigationDocument,
        owner: &str,
        version: &str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            site_name: document.site_name.clone(),
            owner: owner.to_string(),
            document_json: serde_json::to_string_pretty(document)?,
            updated_at: format_timestamp(&document.updated_at),
            version: version.to_string(),
        })
    }
}

impl ErrorTemplate {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            heading: status
                .canonical_reason()
                .unwrap_or("Something went wrong")
                .to_string(),
            message: message.into(),
        }
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render `template` as an HTML response, or the error page if rendering fails
pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => (
            [(header::CACHE_CONTROL, "no-cache")],
            Html(html),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Template rendering failed");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// HTML error page with `status`
pub fn error_page(status: StatusCode, message: impl Into<String>) -> Response {
    match ErrorTemplate::new(status, message).render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "Error page rendering failed");
            (status, format!("{} {}", status.as_u16(), e)).into_response()
        }
    }
}

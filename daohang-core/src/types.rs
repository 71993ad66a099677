//! Core data type definitions
//!
//! The navigation document is persisted as one JSON value; field names are
//! camelCase on the wire so stored documents stay compatible with the admin UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed key under which the single navigation document is stored
pub const NAV_DATA_KEY: &str = "nav_data";

/// Site name used when the deployment does not override it
pub const DEFAULT_SITE_NAME: &str = "My Navigation";

/// Site description used when the deployment does not override it
pub const DEFAULT_SITE_DESCRIPTION: &str = "A curated collection of useful websites";

/// Version stamped on documents when no build version is configured
pub const DEFAULT_DOCUMENT_VERSION: &str = "1.0.0";

/// Identifier of a category or site.
///
/// The admin panel generates both numeric and string identifiers, so either form
/// is accepted. Uniqueness is only expected within the containing list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        ItemId::Number(value)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// The single aggregate holding all site, category and link data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDocument {
    pub site_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: DisplayConfig,
    pub categories: Vec<Category>,
    /// Free-form links managed by the admin panel
    #[serde(default)]
    pub custom_links: Vec<serde_json::Value>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default = "default_version")]
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Display options for the homepage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayConfig {
    pub bg_color: String,
    pub bg_image: String,
    pub theme: String,
    pub show_categories: bool,
    pub show_search: bool,
    pub layout: String,
    pub items_per_row: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bg_color: "#f8fafc".to_string(),
            bg_image: String::new(),
            theme: "light".to_string(),
            show_categories: true,
            show_search: true,
            layout: "grid".to_string(),
            items_per_row: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub sites: Vec<Site>,
}

impl Category {
    /// Sites in display order
    pub fn sorted_sites(&self) -> Vec<&Site> {
        let mut sites: Vec<&Site> = self.sites.iter().collect();
        sites.sort_by_key(|site| site.order);
        sites
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: ItemId,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_visits: u64,
    pub last_reset: DateTime<Utc>,
    #[serde(default)]
    pub category_count: usize,
    #[serde(default)]
    pub site_count: usize,
}

impl Default for Statistics {
    fn default() -> Self {
        Self {
            total_visits: 0,
            last_reset: Utc::now(),
            category_count: 0,
            site_count: 0,
        }
    }
}

fn default_version() -> String {
    DEFAULT_DOCUMENT_VERSION.to_string()
}

impl NavigationDocument {
    /// Build the built-in default document with the given site name and description.
    ///
    /// Three categories (the last one hidden) holding four sites.
    pub fn builtin(site_name: &str, description: &str) -> Self {
        let now = Utc::now();

        let categories = vec![
            Category {
                id: 1.into(),
                name: "Everyday Tools".to_string(),
                description: "Tools used every day".to_string(),
                icon: "🔧".to_string(),
                hidden: false,
                order: 1,
                sites: vec![
                    Site {
                        id: 1.into(),
                        name: "Google".to_string(),
                        url: "https://www.google.com".to_string(),
                        description: "Web search engine".to_string(),
                        icon: "G".to_string(),
                        tags: vec!["search".to_string(), "tools".to_string()],
                        order: 1,
                    },
                    Site {
                        id: 2.into(),
                        name: "GitHub".to_string(),
                        url: "https://github.com".to_string(),
                        description: "Code hosting platform".to_string(),
                        icon: "GH".to_string(),
                        tags: vec!["development".to_string(), "code".to_string()],
                        order: 2,
                    },
                ],
            },
            Category {
                id: 2.into(),
                name: "Social".to_string(),
                description: "Social networks".to_string(),
                icon: "💬".to_string(),
                hidden: false,
                order: 2,
                sites: vec![Site {
                    id: 3.into(),
                    name: "Twitter".to_string(),
                    url: "https://twitter.com".to_string(),
                    description: "Microblogging platform".to_string(),
                    icon: "T".to_string(),
                    tags: vec!["social".to_string(), "news".to_string()],
                    order: 1,
                }],
            },
            Category {
                id: 3.into(),
                name: "Learning Resources".to_string(),
                description: "Online learning platforms".to_string(),
                icon: "📚".to_string(),
                hidden: true,
                order: 3,
                sites: vec![Site {
                    id: 4.into(),
                    name: "MDN".to_string(),
                    url: "https://developer.mozilla.org".to_string(),
                    description: "Web development documentation".to_string(),
                    icon: "M".to_string(),
                    tags: vec!["docs".to_string(), "development".to_string()],
                    order: 1,
                }],
            },
        ];

        Self {
            site_name: site_name.to_string(),
            description: description.to_string(),
            config: DisplayConfig::default(),
            categories,
            custom_links: Vec::new(),
            statistics: Statistics {
                total_visits: 0,
                last_reset: now,
                category_count: 3,
                site_count: 4,
            },
            version: DEFAULT_DOCUMENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Non-hidden categories in display order
    pub fn visible_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> =
            self.categories.iter().filter(|c| !c.hidden).collect();
        categories.sort_by_key(|c| c.order);
        categories
    }

    /// Total number of sites across all categories
    pub fn site_count(&self) -> usize {
        self.categories.iter().map(|c| c.sites.len()).sum()
    }
}

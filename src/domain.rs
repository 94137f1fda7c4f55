/// Domain classification and categorization rules for Tab Organizer
use std::collections::HashMap;
use std::fmt;

use url::Url;

use crate::tab_data::TabRecord;

/// Domain reported for URLs that cannot be parsed or carry no host
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// URL prefixes owned by the browser itself; tabs on these are never touched
pub const INTERNAL_URL_PREFIXES: [&str; 2] = ["chrome://", "chrome-extension://"];

/// Extract the grouping key from a URL
///
/// The key is the lower-cased hostname with a single leading "www." removed.
/// Anything that does not parse as an absolute URL with a host yields
/// [`UNKNOWN_DOMAIN`].
///
/// Examples:
/// - https://www.github.com/rust-lang → github.com
/// - https://docs.google.com/document → docs.google.com
/// - http://localhost:3000/ → localhost
pub fn classify_domain(url: &str) -> String {
    let host = match Url::parse(url.trim()) {
        Ok(parsed) => parsed.host_str().map(|h| h.to_lowercase()),
        Err(_) => None,
    };

    match host {
        Some(host) if !host.is_empty() => match host.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => host,
        },
        _ => UNKNOWN_DOMAIN.to_string(),
    }
}

pub fn is_internal_url(url: &str) -> bool {
    INTERNAL_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// The URL of a tab we are allowed to manage, if any
pub fn manageable_url(tab: &TabRecord) -> Option<&str> {
    tab.url
        .as_deref()
        .filter(|url| !url.is_empty() && !is_internal_url(url))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Work,
    Social,
    Entertainment,
    Shopping,
    News,
    Development,
    General,
}

/// Matching order matters: the first category with a hit wins
const CATEGORY_RULES: [(Category, &[&str]); 6] = [
    (
        Category::Work,
        &[
            "docs.google",
            "office.com",
            "notion.so",
            "slack.com",
            "zoom.us",
            "teams.microsoft",
        ],
    ),
    (
        Category::Social,
        &[
            "facebook.com",
            "twitter.com",
            "instagram.com",
            "linkedin.com",
            "reddit.com",
        ],
    ),
    (
        Category::Entertainment,
        &["youtube.com", "netflix.com", "spotify.com", "twitch.tv"],
    ),
    (
        Category::Shopping,
        &["amazon.com", "ebay.com", "etsy.com", "shopify.com"],
    ),
    (
        Category::News,
        &["cnn.com", "bbc.com", "reuters.com", "techcrunch.com"],
    ),
    (
        Category::Development,
        &[
            "github.com",
            "stackoverflow.com",
            "codepen.io",
            "developer.mozilla.org",
        ],
    ),
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Social => "social",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::News => "news",
            Category::Development => "development",
            Category::General => "general",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Work => "💼",
            Category::Social => "👥",
            Category::Entertainment => "🎬",
            Category::Shopping => "🛒",
            Category::News => "📰",
            Category::Development => "💻",
            Category::General => "🌐",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorize a tab by substring match on its URL
///
/// The title is accepted so callers do not have to change when title-based
/// rules are added; it is not consulted today.
pub fn categorize(url: &str, _title: Option<&str>) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| url.contains(needle)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::General)
}

pub fn group_title(domain: &str, category: Category) -> String {
    format!("{} {}", category.emoji(), domain)
}

/// Partition manageable tabs by domain, keeping first-seen domain order
///
/// Internal tabs and tabs whose URL has no recognizable host are left out.
pub fn partition_by_domain(tabs: &[TabRecord]) -> Vec<(String, Vec<&TabRecord>)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<&TabRecord>)> = Vec::new();

    for tab in tabs {
        let Some(url) = manageable_url(tab) else {
            continue;
        };
        let domain = classify_domain(url);
        if domain == UNKNOWN_DOMAIN {
            continue;
        }

        match positions.get(&domain) {
            Some(&position) => buckets[position].1.push(tab),
            None => {
                positions.insert(domain.clone(), buckets.len());
                buckets.push((domain, vec![tab]));
            }
        }
    }

    buckets
}

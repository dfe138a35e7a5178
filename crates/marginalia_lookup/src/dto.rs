//! Wire types for the Wikipedia REST API.

use serde::Deserialize;

/// Response of `GET /api/rest_v1/page/summary/{title}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageSummary {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub extract: String,
    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub content_urls: Option<ContentUrls>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Thumbnail {
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentUrls {
    pub desktop: Option<PageUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageUrls {
    pub page: String,
}

/// Response of `GET /w/rest.php/v1/search/page`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub pages: Vec<SearchPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchPage {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

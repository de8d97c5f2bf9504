//! Celebrity catalog and filter state
//!
//! The catalog is fetched once per session and never mutated locally —
//! filtering only derives a visible subset, preserving source order.

use serde::Deserialize;

use crate::api::VoiceService;
use crate::Result;

/// Film-industry category a celebrity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bollywood,
    Tollywood,
    Kollywood,
    Regional,
}

impl Category {
    /// Category identifier as used by the service
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bollywood => "bollywood",
            Self::Tollywood => "tollywood",
            Self::Kollywood => "kollywood",
            Self::Regional => "regional",
        }
    }

    /// Parse a category identifier; `None` for unknown tags
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "bollywood" => Some(Self::Bollywood),
            "tollywood" => Some(Self::Tollywood),
            "kollywood" => Some(Self::Kollywood),
            "regional" => Some(Self::Regional),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Active category filter: a single category or the "all" wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Show every category
    #[default]
    All,
    /// Show only one category
    Only(Category),
}

/// A selectable voice-conversion target profile
///
/// Immutable once fetched; `image` and `voice_sample` are usually paths
/// relative to the service base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct Celebrity {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub voice_characteristics: Vec<String>,
    #[serde(default)]
    pub popularity: u8,
    #[serde(default)]
    pub debut_year: u16,
    #[serde(default)]
    pub notable_films: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub voice_sample: Option<String>,
}

/// Holds the fetched celebrity collection and the active filter predicate
#[derive(Debug, Default)]
pub struct CatalogStore {
    celebrities: Vec<Celebrity>,
    category: CategoryFilter,
    query: String,
}

impl CatalogStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store over an already-fetched collection
    #[must_use]
    pub fn with_celebrities(celebrities: Vec<Celebrity>) -> Self {
        Self {
            celebrities,
            ..Self::default()
        }
    }

    /// Fetch the catalog from the service, replacing the collection
    ///
    /// On failure the prior collection is left untouched (no partial data
    /// is synthesized) and the caller may retry by calling `load` again.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Catalog`] if the fetch fails.
    pub async fn load(&mut self, service: &dyn VoiceService) -> Result<()> {
        let celebrities = service.fetch_celebrities().await?;
        self.celebrities = celebrities;
        Ok(())
    }

    /// The untouched source collection, in service order
    #[must_use]
    pub fn celebrities(&self) -> &[Celebrity] {
        &self.celebrities
    }

    /// Default selection: the first entry of a non-empty catalog
    #[must_use]
    pub fn default_target(&self) -> Option<&Celebrity> {
        self.celebrities.first()
    }

    /// Look up a celebrity by identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Celebrity> {
        self.celebrities.iter().find(|c| c.id == id)
    }

    /// Set the active category filter
    pub fn set_category(&mut self, filter: CategoryFilter) {
        self.category = filter;
    }

    /// Set the free-text search query
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// The active category filter
    #[must_use]
    pub const fn category(&self) -> CategoryFilter {
        self.category
    }

    /// The active search query
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The visible subset: source collection intersected with the category
    /// and case-insensitive text predicates, in source order
    ///
    /// The text predicate matches the name or any voice-characteristic tag.
    #[must_use]
    pub fn visible(&self) -> Vec<&Celebrity> {
        let query = self.query.trim().to_lowercase();

        self.celebrities
            .iter()
            .filter(|c| {
                let category_ok = match self.category {
                    CategoryFilter::All => true,
                    CategoryFilter::Only(category) => c.category == category,
                };

                let text_ok = query.is_empty()
                    || c.name.to_lowercase().contains(&query)
                    || c.voice_characteristics
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&query));

                category_ok && text_ok
            })
            .collect()
    }
}

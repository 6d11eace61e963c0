//! Filter and column configuration
//!
//! The lists are compiled in; `Default` yields them. Tests and library
//! callers can substitute their own.

/// Categories admitted into the output
pub const INCLUDED_CATEGORIES: &[&str] = &[
    "Pet",
    "House Floor",
    "House Wallpaper",
    "House",
    "NPC Skin",
];

/// Name substrings that disqualify an item (case-sensitive)
pub const EXCLUDED_NAME_TERMS: &[&str] = &["Quest", "DONT", "Don't", "Bug"];

/// Allow-list and exclude-list handed to the filter stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Exact category labels that are kept
    pub categories: Vec<String>,
    /// Substrings rejected anywhere in an item name
    pub exclude_terms: Vec<String>,
}

impl FilterConfig {
    pub fn new<C, E>(categories: C, exclude_terms: E) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        FilterConfig {
            categories: categories.into_iter().map(Into::into).collect(),
            exclude_terms: exclude_terms.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `category` exactly matches an allow-list entry
    pub fn allows_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// First exclude term found in `name`, if any
    pub fn excluded_term<'a>(&'a self, name: &str) -> Option<&'a str> {
        self.exclude_terms
            .iter()
            .map(String::as_str)
            .find(|term| name.contains(term))
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig::new(
            INCLUDED_CATEGORIES.iter().copied(),
            EXCLUDED_NAME_TERMS.iter().copied(),
        )
    }
}

/// Header names of the three required columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub id: String,
    pub name: String,
    pub category: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            id: "Item ID".to_string(),
            name: "Name".to_string(),
            category: "Category".to_string(),
        }
    }
}

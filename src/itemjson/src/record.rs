//! Accepted item record

/// An item row that passed every filter rule.
///
/// All three fields are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Item identifier, kept as text even when numeric
    pub id: String,
    /// Display name
    pub name: String,
    /// Classification label
    pub category: String,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Record {
            id: id.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

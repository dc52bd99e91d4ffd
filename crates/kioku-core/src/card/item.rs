//! Catalog items
//!
//! Items belong to the external catalog. The scheduler only ever refers to
//! them by [`ItemId`]; the display content is carried along for quizzes.

use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog item
pub type ItemId = u32;

/// Category reported for items without one
pub const DEFAULT_CATEGORY: &str = "General";

/// A vocabulary item from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Catalog identifier
    pub id: ItemId,
    /// Deck label; `None` or empty means [`DEFAULT_CATEGORY`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Written form (may be kana only)
    pub kanji: String,
    /// Reading
    pub kana: String,
    /// English meaning shown as the answer
    pub meaning: String,
}

impl Item {
    pub fn new(
        id: ItemId,
        kanji: impl Into<String>,
        kana: impl Into<String>,
        meaning: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category: None,
            kanji: kanji.into(),
            kana: kana.into(),
            meaning: meaning.into(),
        }
    }

    /// Builder-style category assignment
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Effective category label
    pub fn category(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CATEGORY,
        }
    }
}

/// Distinct category labels in first-seen catalog order
pub fn categories_of(items: &[Item]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        let category = item.category();
        if !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}

/// Items of one category, catalog order preserved
pub fn filter_by_category(items: &[Item], category: &str) -> Vec<Item> {
    items
        .iter()
        .filter(|item| item.category() == category)
        .cloned()
        .collect()
}

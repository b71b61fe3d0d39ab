//! Validated generator output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Controlled set of content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Science,
    Politics,
    Health,
    Entertainment,
    Sports,
    Other,
}

/// Close variants the generator tends to produce, lowercased.
const CATEGORY_SYNONYMS: &[(&str, Category)] = &[
    ("tech", Category::Technology),
    ("software", Category::Technology),
    ("computing", Category::Technology),
    ("ai", Category::Technology),
    ("programming", Category::Technology),
    ("finance", Category::Business),
    ("economy", Category::Business),
    ("economics", Category::Business),
    ("markets", Category::Business),
    ("startups", Category::Business),
    ("research", Category::Science),
    ("scientific", Category::Science),
    ("political", Category::Politics),
    ("government", Category::Politics),
    ("policy", Category::Politics),
    ("elections", Category::Politics),
    ("medical", Category::Health),
    ("medicine", Category::Health),
    ("healthcare", Category::Health),
    ("wellness", Category::Health),
    ("film", Category::Entertainment),
    ("movies", Category::Entertainment),
    ("music", Category::Entertainment),
    ("gaming", Category::Entertainment),
    ("sport", Category::Sports),
    ("athletics", Category::Sports),
];

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Technology,
        Category::Business,
        Category::Science,
        Category::Politics,
        Category::Health,
        Category::Entertainment,
        Category::Sports,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Business => "Business",
            Self::Science => "Science",
            Self::Politics => "Politics",
            Self::Health => "Health",
            Self::Entertainment => "Entertainment",
            Self::Sports => "Sports",
            Self::Other => "Other",
        }
    }

    /// Map free-form generator output onto the controlled set.
    ///
    /// Tries, in order: exact (case-insensitive) match, a known synonym, a
    /// shared prefix of at least four characters with a category name
    /// ("Politics & Government", "Healthcare"). Anything else is `Other`.
    pub fn coerce(raw: &str) -> Category {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Category::Other;
        }

        if let Some(exact) = Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&normalized))
        {
            return *exact;
        }

        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        for word in &words {
            if let Some((_, category)) = CATEGORY_SYNONYMS.iter().find(|(s, _)| s == word) {
                return *category;
            }
        }

        for word in &words {
            for category in Self::ALL {
                let name = category.as_str().to_lowercase();
                if word.len() >= 4 && (name.starts_with(word) || word.starts_with(name.as_str())) {
                    return category;
                }
            }
        }

        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary fields after schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredSummary {
    pub summary: String,
    pub key_points: Vec<String>,
    pub citations: Option<Vec<String>>,
    pub category: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_exact_and_case() {
        assert_eq!(Category::coerce("Technology"), Category::Technology);
        assert_eq!(Category::coerce("  sports "), Category::Sports);
        assert_eq!(Category::coerce("HEALTH"), Category::Health);
    }

    #[test]
    fn test_coerce_close_variants() {
        assert_eq!(Category::coerce("Tech"), Category::Technology);
        assert_eq!(Category::coerce("Healthcare"), Category::Health);
        assert_eq!(Category::coerce("Politics & Government"), Category::Politics);
        assert_eq!(Category::coerce("Finance"), Category::Business);
        assert_eq!(Category::coerce("Scientific research"), Category::Science);
        assert_eq!(Category::coerce("Entertain"), Category::Entertainment);
    }

    #[test]
    fn test_coerce_unknown_defaults_to_other() {
        assert_eq!(Category::coerce("Cooking"), Category::Other);
        assert_eq!(Category::coerce(""), Category::Other);
        assert_eq!(Category::coerce("Unknown"), Category::Other);
    }

    #[test]
    fn test_category_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&Category::Technology).unwrap(),
            "\"Technology\""
        );
    }
}

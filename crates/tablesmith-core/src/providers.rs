use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic classification of a column, used to decide which operations
/// are legal against a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Joinable,
    Groupable,
    Numeric,
    String,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Joinable,
        Category::Groupable,
        Category::Numeric,
        Category::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Joinable => "joinable",
            Category::Groupable => "groupable",
            Category::Numeric => "numeric",
            Category::String => "string",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "joinable" => Ok(Category::Joinable),
            "groupable" => Ok(Category::Groupable),
            "numeric" => Ok(Category::Numeric),
            "string" => Ok(Category::String),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// A synthetic-value strategy tag and the categories it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    pub tag: &'static str,
    pub categories: &'static [Category],
}

const J: Category = Category::Joinable;
const G: Category = Category::Groupable;
const N: Category = Category::Numeric;
const S: Category = Category::String;

/// Built-in provider table. Tags may belong to several categories.
pub const PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec { tag: "city", categories: &[J] },
    ProviderSpec { tag: "state_abbr", categories: &[J, G] },
    ProviderSpec { tag: "country", categories: &[J, G] },
    ProviderSpec { tag: "company", categories: &[J] },
    ProviderSpec { tag: "currency_code", categories: &[J, G] },
    ProviderSpec { tag: "weekday", categories: &[G] },
    ProviderSpec { tag: "month", categories: &[G] },
    ProviderSpec { tag: "boolean", categories: &[G] },
    ProviderSpec { tag: "int_tiny", categories: &[N, G] },
    ProviderSpec { tag: "int_small", categories: &[N] },
    ProviderSpec { tag: "int_large", categories: &[N] },
    ProviderSpec { tag: "year", categories: &[N, G] },
    ProviderSpec { tag: "float_unit", categories: &[N] },
    ProviderSpec { tag: "price", categories: &[N] },
    ProviderSpec { tag: "percent", categories: &[N] },
    ProviderSpec { tag: "first_name", categories: &[S] },
    ProviderSpec { tag: "last_name", categories: &[S] },
    ProviderSpec { tag: "job_title", categories: &[S] },
    ProviderSpec { tag: "word", categories: &[S] },
    ProviderSpec { tag: "sentence", categories: &[S] },
    ProviderSpec { tag: "phone", categories: &[S] },
    ProviderSpec { tag: "date", categories: &[S] },
];

/// Static category/provider mapping with its inverse, loaded once and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    by_category: BTreeMap<Category, Vec<&'static str>>,
    by_tag: HashMap<&'static str, Vec<Category>>,
    all_tags: Vec<&'static str>,
}

impl ProviderRegistry {
    /// Registry over the built-in provider table.
    pub fn builtin() -> Self {
        Self::from_specs(PROVIDERS)
    }

    pub fn from_specs(specs: &[ProviderSpec]) -> Self {
        let mut by_category: BTreeMap<Category, Vec<&'static str>> = BTreeMap::new();
        let mut by_tag: HashMap<&'static str, Vec<Category>> = HashMap::new();
        let mut all_tags = Vec::new();

        for category in Category::ALL {
            by_category.entry(category).or_default();
        }

        for spec in specs {
            if !by_tag.contains_key(spec.tag) {
                all_tags.push(spec.tag);
            }
            let categories = by_tag.entry(spec.tag).or_default();
            for category in spec.categories {
                by_category.entry(*category).or_default().push(spec.tag);
                if !categories.contains(category) {
                    categories.push(*category);
                }
            }
        }

        Self {
            by_category,
            by_tag,
            all_tags,
        }
    }

    /// Provider tags registered under a category.
    pub fn providers_for(&self, category: Category) -> &[&'static str] {
        self.by_category
            .get(&category)
            .map(|tags| tags.as_slice())
            .unwrap_or(&[])
    }

    /// Inverse lookup; empty for unknown tags.
    pub fn categories_for(&self, tag: &str) -> &[Category] {
        self.by_tag
            .get(tag)
            .map(|categories| categories.as_slice())
            .unwrap_or(&[])
    }

    /// Deduplicated union of all provider tags, in registration order.
    pub fn all_tags(&self) -> &[&'static str] {
        &self.all_tags
    }

    pub fn num_categories(&self) -> usize {
        Category::ALL.len()
    }

    pub fn is_known(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

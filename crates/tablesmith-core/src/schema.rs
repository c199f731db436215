use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::providers::{Category, ProviderRegistry};

/// One schema entry: column label plus the provider tag that generates
/// its values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaColumn {
    pub label: String,
    pub provider: String,
}

/// Ordered mapping of column label to provider tag.
///
/// Labels are expected unique but not enforced: prefixes are generated
/// independently per column, so duplicates are tolerated and lookups
/// return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<SchemaColumn>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, provider: impl Into<String>) {
        self.columns.push(SchemaColumn {
            label: label.into(),
            provider: provider.into(),
        });
    }

    pub fn insert_front(&mut self, label: impl Into<String>, provider: impl Into<String>) {
        self.columns.insert(
            0,
            SchemaColumn {
                label: label.into(),
                provider: provider.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.label.as_str())
    }

    pub fn provider_of(&self, label: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|column| column.label == label)
            .map(|column| column.provider.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.columns.iter().any(|column| column.label == label)
    }

    /// Keep only the named columns, preserving schema order.
    pub fn retain_labels(&mut self, keep: &[String]) {
        self.columns
            .retain(|column| keep.iter().any(|label| *label == column.label));
    }
}

impl FromIterator<(String, String)> for Schema {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let columns = iter
            .into_iter()
            .map(|(label, provider)| SchemaColumn { label, provider })
            .collect();
        Self { columns }
    }
}

/// Derive category -> column-label lists for a schema.
///
/// Recomputed on each call; columns whose provider is unknown to the
/// registry simply appear in no category.
pub fn category_map(schema: &Schema, registry: &ProviderRegistry) -> BTreeMap<Category, Vec<String>> {
    let mut map: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for column in schema.columns() {
        for category in registry.categories_for(&column.provider) {
            map.entry(*category).or_default().push(column.label.clone());
        }
    }
    map
}

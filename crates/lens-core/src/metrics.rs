//! Ordered label → display-text mappings produced by the analysis layer.
//!
//! A [`MetricMap`] keeps insertion order, which is the order the sections
//! are printed in. An entry is either display text or a nested group.

use serde::{Deserialize, Serialize};

/// A single entry in a [`MetricMap`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricEntry {
    /// Display text for one metric.
    Value(String),
    /// A nested group of metrics.
    Group(MetricMap),
}

impl MetricEntry {
    /// Returns the display text, or `None` for a group.
    #[must_use]
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(text) => Some(text),
            Self::Group(_) => None,
        }
    }

    /// Returns the nested group, or `None` for a plain value.
    #[must_use]
    pub const fn as_group(&self) -> Option<&MetricMap> {
        match self {
            Self::Value(_) => None,
            Self::Group(group) => Some(group),
        }
    }
}

impl From<String> for MetricEntry {
    fn from(text: String) -> Self {
        Self::Value(text)
    }
}

impl From<&str> for MetricEntry {
    fn from(text: &str) -> Self {
        Self::Value(text.to_string())
    }
}

impl From<MetricMap> for MetricEntry {
    fn from(group: MetricMap) -> Self {
        Self::Group(group)
    }
}

/// Insertion-ordered mapping from metric label to [`MetricEntry`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricMap {
    entries: Vec<(String, MetricEntry)>,
}

impl MetricMap {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts an entry at the end, or replaces it in place if the label exists.
    pub fn insert(&mut self, label: impl Into<String>, entry: impl Into<MetricEntry>) {
        let label = label.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => *existing = entry,
            None => self.entries.push((label, entry)),
        }
    }

    /// Returns the entry for a label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&MetricEntry> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, entry)| entry)
    }

    /// Returns the display text for a label, if it is a plain value.
    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.get(label).and_then(MetricEntry::as_value)
    }

    /// Returns the nested group for a label, if it is a group.
    #[must_use]
    pub fn group(&self, label: &str) -> Option<&Self> {
        self.get(label).and_then(MetricEntry::as_group)
    }

    /// Returns true if the label is present.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Returns the labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Returns an iterator over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricEntry)> {
        self.entries.iter().map(|(l, e)| (l.as_str(), e))
    }

    /// Returns the number of top-level entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L, E> FromIterator<(L, E)> for MetricMap
where
    L: Into<String>,
    E: Into<MetricEntry>,
{
    fn from_iter<I: IntoIterator<Item = (L, E)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, entry) in iter {
            map.insert(label, entry);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_is_kept() {
        let map: MetricMap = [("Zeta", "1"), ("Alpha", "2"), ("Mid", "3")]
            .into_iter()
            .collect();
        assert_eq!(map.labels().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = MetricMap::new();
        map.insert("A", "1");
        map.insert("B", "2");
        map.insert("A", "3");

        assert_eq!(map.len(), 2);
        assert_eq!(map.labels().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(map.value("A"), Some("3"));
    }

    #[test]
    fn test_nested_groups() {
        let mut inner = MetricMap::new();
        inner.insert("Change", "1.0K");
        let mut outer = MetricMap::new();
        outer.insert("Beta", "1.2");
        outer.insert("Debt Comparison", inner);

        assert!(outer.value("Debt Comparison").is_none());
        assert_eq!(
            outer.group("Debt Comparison").and_then(|g| g.value("Change")),
            Some("1.0K")
        );
        assert!(outer.group("Beta").is_none());
    }

    #[test]
    fn test_serializes_as_ordered_json_pairs() {
        let map: MetricMap = [("B", "2"), ("A", "1")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"[["B","2"],["A","1"]]"#);
    }
}

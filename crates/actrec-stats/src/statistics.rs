use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::number::Number;

/// Named statistics in the order they were computed.
///
/// This is what trackers return from
/// [`Tracker::statistics`](crate::tracker::Tracker::statistics). The
/// [`Display`](fmt::Display) implementation renders one `key: value` line per
/// entry, which is what [`Tracker::summary`](crate::tracker::Tracker::summary)
/// prints.
///
/// # Examples
///
/// ```
/// use actrec_stats::{number::Number, statistics::Statistics};
///
/// let mut stats = Statistics::new();
/// stats.insert("count", Number::Int(3));
/// stats.insert("mean", Number::Float(2.0));
/// assert_eq!(stats.get("count"), Some(Number::Int(3)));
/// assert_eq!(stats.to_string(), "count: 3\nmean:  2.0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics(IndexMap<String, Number>);

impl Statistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a statistic, replacing any previous value with the same key
    /// while keeping its position.
    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<Number>,
    {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Number> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Number)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Moves every entry of `other` in, prefixing its keys.
    pub fn extend_prefixed(&mut self, prefix: &str, other: Statistics) {
        for (key, value) in other.0 {
            self.0.insert(format!("{prefix}{key}"), value);
        }
    }
}

impl FromIterator<(String, Number)> for Statistics {
    fn from_iter<T: IntoIterator<Item = (String, Number)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.0.keys().map(String::len).max().unwrap_or(0) + 1;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let label = format!("{key}:");
            write!(f, "{label:width$} {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut stats = Statistics::new();
        stats.insert("a", 1);
        stats.insert("b", 2);
        stats.insert("a", 3);
        assert_eq!(stats.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(stats.get("a"), Some(Number::Int(3)));
    }

    #[test]
    fn test_json_is_a_plain_object() {
        let mut stats = Statistics::new();
        stats.insert("count", 2);
        stats.insert("mean", 0.5);
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"count":2,"mean":0.5}"#
        );
    }

    #[test]
    fn test_extend_prefixed() {
        let mut inner = Statistics::new();
        inner.insert("count", 1);
        let mut stats = Statistics::new();
        stats.extend_prefixed("value ", inner);
        assert_eq!(stats.get("value count"), Some(Number::Int(1)));
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(Statistics::new().to_string(), "");
    }
}

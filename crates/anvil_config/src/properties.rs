//! Flat `key=value` property files.
//!
//! Boards, platforms and the IDE preferences file all use this format: one
//! `key=value` pair per line, `#` comments, dotted keys forming a tree.

use std::collections::BTreeMap;
use std::path::Path;

/// Upper bound on nested `{placeholder}` substitution passes.
const MAX_EXPANSION_PASSES: usize = 10;

/// An ordered map of dotted property keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    map: BTreeMap<String, String>,
}

impl Properties {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses property text. Blank lines, `#` comments and lines without `=`
    /// are skipped; later duplicates win.
    pub fn parse(text: &str) -> Self {
        let mut props = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => props.insert(key.trim(), value.trim()),
                None => log::debug!("ignoring malformed property line: {line}"),
            }
        }
        props
    }

    /// Reads and parses a property file.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Sets `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no properties.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the properties under `prefix.`, with the prefix stripped.
    pub fn sub_tree(&self, prefix: &str) -> Self {
        let prefix = format!("{prefix}.");
        let map = self
            .map
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(prefix.as_str())
                    .map(|rest| (rest.to_string(), v.clone()))
            })
            .collect();
        Self { map }
    }

    /// Replaces `{key}` placeholders in `template` with property values.
    ///
    /// Substitution repeats so values may reference other keys. Unknown
    /// placeholders are left as-is.
    pub fn expand(&self, template: &str) -> String {
        let mut current = template.to_string();
        for _ in 0..MAX_EXPANSION_PASSES {
            let next = self.expand_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn expand_once(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let key = &after[..close];
                    match self.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(key);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

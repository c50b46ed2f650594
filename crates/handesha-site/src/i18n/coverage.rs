//! Key-path parity across locales in a translation document.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

/// Coverage of a translation document.
///
/// Reference set is the union of every locale's key paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    /// Unique key paths across all locales.
    pub total_keys: usize,
    /// Per-locale coverage, sorted by locale code.
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    /// Whether every locale defines every key path.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.locales.iter().all(|locale| locale.missing.is_empty())
    }
}

/// Per-locale coverage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LocaleCoverage {
    /// Locale code as it appears in the document.
    pub locale: String,
    /// Number of reference key paths present.
    pub present: usize,
    /// Reference key paths this locale lacks.
    pub missing: Vec<String>,
}

/// Collect every dotted path that ends in a string leaf.
#[must_use]
pub fn key_paths(tree: &Value) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    collect(tree, &mut String::new(), &mut paths);
    paths
}

fn collect(node: &Value, prefix: &mut String, paths: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let restore = prefix.len();
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(key);
                collect(child, prefix, paths);
                prefix.truncate(restore);
            }
        }
        Value::String(_) if !prefix.is_empty() => {
            paths.insert(prefix.clone());
        }
        _ => {}
    }
}

/// Compare every locale of `document` against the union of key paths.
///
/// Non-object locale entries count as empty.
#[must_use]
pub fn coverage_report(document: &Value) -> CoverageReport {
    let per_locale: Vec<(String, BTreeSet<String>)> = document
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(locale, tree)| (locale.clone(), key_paths(tree)))
                .collect()
        })
        .unwrap_or_default();

    let reference: BTreeSet<&String> = per_locale.iter().flat_map(|(_, keys)| keys).collect();

    let mut locales: Vec<LocaleCoverage> = per_locale
        .iter()
        .map(|(locale, keys)| {
            let missing: Vec<String> = reference
                .iter()
                .filter(|key| !keys.contains(key.as_str()))
                .map(|key| (*key).clone())
                .collect();
            LocaleCoverage {
                locale: locale.clone(),
                present: reference.len() - missing.len(),
                missing,
            }
        })
        .collect();
    locales.sort_by(|left, right| left.locale.cmp(&right.locale));

    CoverageReport {
        total_keys: reference.len(),
        locales,
    }
}

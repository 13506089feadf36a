//! Log-pattern rules, lookup keys, and the pattern-catalog interface
//!
//! Pattern rules are opaque regex sources: this crate only carries the data
//! that feeds the harness's matching engine, it never compiles or evaluates
//! a pattern. The catalog is keyed by a closed enumeration instead of
//! hand-built strings like `"<name>-ignore"`, so a typo in a key is a
//! compile error rather than a silent empty lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a [`TemplateCatalog`] from JSON
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read pattern catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed pattern catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// One log-pattern rule: the source text of a regex handed to the harness's
/// matching engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternRule(String);

impl PatternRule {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// The raw pattern text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatternRule {
    fn from(source: &str) -> Self {
        Self(source.to_string())
    }
}

impl From<String> for PatternRule {
    fn from(source: String) -> Self {
        Self(source)
    }
}

/// Catalog lookup key for one pattern set of one component
///
/// # Example
/// ```
/// use derribar::patterns::PatternKey;
///
/// assert_eq!(PatternKey::Activity("corosync").storage_key(), "corosync");
/// assert_eq!(
///     PatternKey::IgnoreSpecific("corosync").storage_key(),
///     "corosync-ignore"
/// );
/// assert_eq!(PatternKey::IgnoreCommon.storage_key(), "common-ignore");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKey<'a> {
    /// Normal-activity and failure signatures of a generic component
    Activity(&'a str),
    /// Failure signatures of the decision component, which reports failures
    /// through a scheduler-specific log shape
    Scheduler(&'a str),
    /// Benign-noise patterns specific to one component
    IgnoreSpecific(&'a str),
    /// Benign-noise patterns shared by every component of the stack
    IgnoreCommon,
}

impl PatternKey<'_> {
    /// The string key this entry lives under in a serialized catalog.
    ///
    /// Activity and scheduler patterns share a slot: a component has exactly
    /// one of the two, so the catalog stores both under the bare name and the
    /// descriptor decides which kind it is.
    pub fn storage_key(&self) -> String {
        match self {
            PatternKey::Activity(name) | PatternKey::Scheduler(name) => (*name).to_string(),
            PatternKey::IgnoreSpecific(name) => format!("{name}-ignore"),
            PatternKey::IgnoreCommon => "common-ignore".to_string(),
        }
    }
}

/// Source of log patterns for the components of a stack
///
/// A lookup that has no patterns defined returns an empty sequence, never an
/// error: pattern absence is meaningful ("nothing to match") and is tolerated
/// at build time.
pub trait PatternCatalog {
    fn get_component(&self, stack: &str, key: PatternKey<'_>) -> Vec<PatternRule>;
}

/// In-memory pattern catalog, keyed by stack then storage key
///
/// The serialized form is a two-level JSON object:
///
/// ```json
/// {
///   "corosync2": {
///     "corosync": ["Token has not been received in"],
///     "corosync-ignore": ["Corosync main process was not scheduled"],
///     "common-ignore": ["Pending action:"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateCatalog {
    stacks: HashMap<String, HashMap<String, Vec<PatternRule>>>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rules for one pattern key, replacing any previous entry
    pub fn insert<I, R>(&mut self, stack: &str, key: PatternKey<'_>, rules: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<PatternRule>,
    {
        self.stacks
            .entry(stack.to_string())
            .or_default()
            .insert(key.storage_key(), rules.into_iter().map(Into::into).collect());
    }

    /// Parse a catalog from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

impl PatternCatalog for TemplateCatalog {
    fn get_component(&self, stack: &str, key: PatternKey<'_>) -> Vec<PatternRule> {
        self.stacks
            .get(stack)
            .and_then(|keys| keys.get(&key.storage_key()))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_activity_is_bare_name() {
        assert_eq!(PatternKey::Activity("svc-a").storage_key(), "svc-a");
    }

    #[test]
    fn test_storage_key_scheduler_shares_slot_with_activity() {
        assert_eq!(
            PatternKey::Scheduler("svc-sched").storage_key(),
            PatternKey::Activity("svc-sched").storage_key()
        );
    }

    #[test]
    fn test_storage_key_ignore_specific() {
        assert_eq!(
            PatternKey::IgnoreSpecific("svc-a").storage_key(),
            "svc-a-ignore"
        );
    }

    #[test]
    fn test_storage_key_ignore_common() {
        assert_eq!(PatternKey::IgnoreCommon.storage_key(), "common-ignore");
    }

    #[test]
    fn test_catalog_miss_is_empty_not_error() {
        let catalog = TemplateCatalog::new();
        assert!(catalog
            .get_component("nope", PatternKey::Activity("svc-a"))
            .is_empty());
        assert!(catalog
            .get_component("nope", PatternKey::IgnoreCommon)
            .is_empty());
    }

    #[test]
    fn test_catalog_insert_and_lookup() {
        let mut catalog = TemplateCatalog::new();
        catalog.insert("demo", PatternKey::Activity("svc-a"), ["State transition .* RECOVERY"]);

        let rules = catalog.get_component("demo", PatternKey::Activity("svc-a"));
        assert_eq!(rules, vec![PatternRule::from("State transition .* RECOVERY")]);

        // Same stack, different key: still empty
        assert!(catalog
            .get_component("demo", PatternKey::IgnoreSpecific("svc-a"))
            .is_empty());
    }

    #[test]
    fn test_catalog_insert_replaces_previous_rules() {
        let mut catalog = TemplateCatalog::new();
        catalog.insert("demo", PatternKey::IgnoreCommon, ["old"]);
        catalog.insert("demo", PatternKey::IgnoreCommon, ["new"]);

        let rules = catalog.get_component("demo", PatternKey::IgnoreCommon);
        assert_eq!(rules, vec![PatternRule::from("new")]);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "demo": {
                "svc-a": ["Lost connection to the state store"],
                "svc-a-ignore": ["Connection to the state store terminated"],
                "common-ignore": ["Pending action:"]
            }
        }"#;
        let catalog = TemplateCatalog::from_json(json).unwrap();

        assert_eq!(
            catalog.get_component("demo", PatternKey::Activity("svc-a")),
            vec![PatternRule::from("Lost connection to the state store")]
        );
        assert_eq!(
            catalog.get_component("demo", PatternKey::IgnoreSpecific("svc-a")),
            vec![PatternRule::from("Connection to the state store terminated")]
        );
        assert_eq!(
            catalog.get_component("demo", PatternKey::IgnoreCommon),
            vec![PatternRule::from("Pending action:")]
        );
    }

    #[test]
    fn test_catalog_from_json_rejects_garbage() {
        let result = TemplateCatalog::from_json("not json");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_pattern_rule_display_roundtrip() {
        let rule = PatternRule::new("error.*: Fencer connection failed");
        assert_eq!(rule.to_string(), rule.as_str());
    }
}

//! `package.json` manifest model and textual version patching.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// File name of the manifest that marks a directory as a project.
pub const MANIFEST_FILE: &str = "package.json";

static VERSION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""version"\s*:\s*"([^"]*)""#).expect("valid version regex"));

/// The subset of `package.json` the workflows read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "deserialize_private")]
    pub private: bool,
    #[serde(default, deserialize_with = "deserialize_map_or_null")]
    pub scripts: IndexMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_map_or_null")]
    pub dependencies: IndexMap<String, Value>,
    #[serde(default, deserialize_with = "deserialize_map_or_null")]
    pub dev_dependencies: IndexMap<String, Value>,
    #[serde(default, deserialize_with = "deserialize_map_or_null")]
    pub peer_dependencies: IndexMap<String, Value>,
}

/// An explicit `null` map reads as an empty one.
fn deserialize_map_or_null<'de, D, V>(
    deserializer: D,
) -> std::result::Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(Option::<IndexMap<String, V>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `private` is honoured both as a JSON boolean and as the string `"true"`.
fn deserialize_private<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::String(s) => s == "true",
        _ => false,
    })
}

impl Manifest {
    /// Parses manifest text, attributing failures to `path`.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_json::from_str(content).map_err(|error| Error::Manifest {
            path: path.to_path_buf(),
            error,
        })
    }

    #[inline]
    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    /// Union of dependency, dev-dependency and peer-dependency names.
    ///
    /// Order follows declaration order across the three maps; a name listed
    /// in several maps appears once, at its first position.
    pub fn dependency_names(&self) -> Vec<&str> {
        let names: IndexSet<&str> = self
            .dependencies
            .keys()
            .chain(self.dev_dependencies.keys())
            .chain(self.peer_dependencies.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().collect()
    }
}

/// Returns the first `"version": "..."` value found in raw manifest text.
pub fn read_version_field(text: &str) -> Option<&str> {
    VERSION_FIELD
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Rewrites the first `"version": "..."` field of raw manifest text.
///
/// Only the matched field changes; formatting, key order and trailing
/// content of the file are preserved. Returns `None` when no version field
/// exists.
pub fn replace_version_field(text: &str, new_version: &str) -> Option<String> {
    let found = VERSION_FIELD.find(text)?;
    let mut patched = String::with_capacity(text.len() + new_version.len());
    patched.push_str(&text[..found.start()]);
    patched.push_str(&format!(r#""version": "{}""#, new_version));
    patched.push_str(&text[found.end()..]);
    Some(patched)
}

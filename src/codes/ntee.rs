use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const UNKNOWN_CODE: &str = "Unknown code";

/// A single NTEE taxonomy entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NteeEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// NTEE codebook keyed by upper-cased code. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct NteeCodebook {
    entries: BTreeMap<String, NteeEntry>,
}

impl NteeCodebook {
    /// Load a codebook from a JSON object of `code -> {title, description, keywords}`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read NTEE codebook {}", path.display()))?;
        Self::from_json(&data)
            .with_context(|| format!("Failed to parse NTEE codebook {}", path.display()))
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let raw: BTreeMap<String, NteeEntry> = serde_json::from_str(data)?;
        Ok(Self::from_entries(raw))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, NteeEntry)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(code, entry)| (code.trim().to_uppercase(), entry))
            .collect();
        Self { entries }
    }

    pub fn get_entry(&self, code: &str) -> Option<&NteeEntry> {
        self.entries.get(&code.trim().to_uppercase())
    }

    pub fn get_title(&self, code: &str) -> &str {
        self.get_entry(code)
            .map(|e| e.title.as_str())
            .unwrap_or(UNKNOWN_CODE)
    }

    pub fn get_description(&self, code: &str) -> &str {
        self.get_entry(code)
            .map(|e| e.description.as_str())
            .unwrap_or(UNKNOWN_CODE)
    }

    pub fn get_keywords(&self, code: &str) -> &[String] {
        self.get_entry(code)
            .map(|e| e.keywords.as_slice())
            .unwrap_or(&[])
    }

    /// All known codes, sorted.
    pub fn list_codes(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

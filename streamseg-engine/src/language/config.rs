//! Language pack TOML schema

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root of a language pack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguagePack {
    pub metadata: Metadata,
    pub terminators: Terminators,
    #[serde(default)]
    pub closing: Closing,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub abbreviations: Abbreviations,
}

/// Pack metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Sentence terminators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terminators {
    pub chars: Vec<char>,
    #[serde(default = "default_true")]
    pub newline_is_boundary: bool,
}

/// Punctuation that may trail a terminator and still belongs to the sentence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Closing {
    #[serde(default)]
    pub chars: Vec<char>,
}

/// Suppression switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rules {
    /// A single uppercase letter before a period is an initial
    #[serde(default = "default_true")]
    pub initials_are_abbreviations: bool,
    /// A lowercase word after a terminator continues the sentence
    #[serde(default = "default_true")]
    pub lowercase_continues: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            initials_are_abbreviations: true,
            lowercase_continues: true,
        }
    }
}

/// Abbreviations grouped by category, without the trailing period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Abbreviations {
    #[serde(flatten)]
    pub categories: HashMap<String, Vec<String>>,
}

fn default_true() -> bool {
    true
}

impl LanguagePack {
    /// Validate pack contents
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.metadata.code.trim().is_empty() {
            return Err("Language code is empty".to_string());
        }

        if self.terminators.chars.is_empty() {
            return Err("No terminator characters defined".to_string());
        }

        if let Some(ch) = self
            .terminators
            .chars
            .iter()
            .find(|c| c.is_alphanumeric() || c.is_whitespace())
        {
            return Err(format!("Terminator {ch:?} must be punctuation"));
        }

        for (category, entries) in &self.abbreviations.categories {
            if entries.iter().any(|e| e.trim().is_empty()) {
                return Err(format!("Empty abbreviation in category '{category}'"));
            }
        }

        Ok(())
    }

    /// All abbreviations, lowercased
    pub fn abbreviation_list(&self) -> impl Iterator<Item = String> + '_ {
        self.abbreviations
            .categories
            .values()
            .flatten()
            .map(|a| a.trim().trim_end_matches('.').to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [metadata]
        code = "xx"
        name = "Test"

        [terminators]
        chars = [".", "!"]
    "#;

    #[test]
    fn test_minimal_pack_defaults() {
        let pack: LanguagePack = toml::from_str(MINIMAL).unwrap();
        assert!(pack.terminators.newline_is_boundary);
        assert!(pack.rules.initials_are_abbreviations);
        assert!(pack.closing.chars.is_empty());
        assert!(pack.validate().is_ok());
        assert_eq!(pack.abbreviation_list().count(), 0);
    }

    #[test]
    fn test_validation_failures() {
        let mut pack: LanguagePack = toml::from_str(MINIMAL).unwrap();
        pack.terminators.chars.clear();
        assert!(pack.validate().unwrap_err().contains("No terminator"));

        let mut pack: LanguagePack = toml::from_str(MINIMAL).unwrap();
        pack.terminators.chars.push('x');
        assert!(pack.validate().unwrap_err().contains("punctuation"));

        let mut pack: LanguagePack = toml::from_str(MINIMAL).unwrap();
        pack.abbreviations
            .categories
            .insert("bad".to_string(), vec![" ".to_string()]);
        assert!(pack.validate().is_err());
    }

    #[test]
    fn test_abbreviations_are_normalised() {
        let source = format!("{MINIMAL}\n[abbreviations]\ntitles = [\"Dr.\", \" Prof \"]\n");
        let pack: LanguagePack = toml::from_str(&source).unwrap();
        let mut list: Vec<String> = pack.abbreviation_list().collect();
        list.sort();
        assert_eq!(list, vec!["dr", "prof"]);
    }
}

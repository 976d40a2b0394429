//! Fact-check result types.
//!
//! A completed job stores an ordered list of [`CheckedFact`]s. The list is
//! persisted as JSON and handed back to every later caller unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Verdict for a single checked statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Truthfulness {
    #[serde(rename = "TRUE")]
    True,
    #[serde(rename = "FALSE")]
    False,
    #[serde(rename = "SOMEWHAT_TRUE", alias = "SOMEWHAT TRUE")]
    SomewhatTrue,
}

impl Truthfulness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Truthfulness::True => "TRUE",
            Truthfulness::False => "FALSE",
            Truthfulness::SomewhatTrue => "SOMEWHAT_TRUE",
        }
    }
}

impl std::fmt::Display for Truthfulness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source backing a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Source {
    /// Page the evidence came from.
    pub url: String,
    /// Icon shown next to the source link.
    pub favicon: String,
}

/// One statement found on a page, with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckedFact {
    /// Verbatim text fragment as it appears on the page.
    pub text: String,
    pub truthfulness: Truthfulness,
    /// Short human-readable explanation of the verdict.
    pub summary: String,
    pub sources: Vec<Source>,
}

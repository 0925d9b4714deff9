//! Grounding citations.

use serde::{Deserialize, Serialize};

/// Which retrieval tool produced a citation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CitationKind {
    Web,
    Maps,
}

impl CitationKind {
    /// Label used when the provider omits a title.
    pub const fn fallback_title(self) -> &'static str {
        match self {
            Self::Web => "Web Source",
            Self::Maps => "Map Location",
        }
    }
}

/// A single source the provider used to ground its answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GroundingCitation {
    pub title: String,
    pub uri: String,
    pub kind: CitationKind,
}

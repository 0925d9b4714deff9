//! Grounding/citation extraction from provider metadata.

use serde::Deserialize;
use std::collections::HashSet;
use wellspring_types::{CitationKind, GroundingCitation};

/// `groundingMetadata` block of a provider candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One retrieval chunk. The provider sets exactly one of `web` / `maps`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<ChunkSource>,
    #[serde(default)]
    pub maps: Option<ChunkSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Flatten provider metadata into a de-duplicated, order-preserving citation list.
///
/// Chunks without a URI are dropped; the first occurrence of a URI wins. Absent
/// metadata yields an empty list.
pub fn extract_citations(metadata: Option<&GroundingMetadata>) -> Vec<GroundingCitation> {
    let Some(metadata) = metadata else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut citations = Vec::new();

    for chunk in &metadata.grounding_chunks {
        let sources = [(CitationKind::Web, &chunk.web), (CitationKind::Maps, &chunk.maps)];
        for (kind, source) in sources {
            let Some(source) = source else { continue };
            let Some(uri) = source.uri.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
                continue;
            };
            if !seen.insert(uri.to_string()) {
                continue;
            }
            let title = source
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(kind.fallback_title());
            citations.push(GroundingCitation { title: title.to_string(), uri: uri.to_string(), kind });
        }
    }

    citations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: serde_json::Value) -> GroundingMetadata {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_absent_metadata_is_empty() {
        assert!(extract_citations(None).is_empty());
        assert!(extract_citations(Some(&GroundingMetadata::default())).is_empty());
    }

    #[test]
    fn test_uri_less_chunks_dropped() {
        let meta = metadata(json!({"groundingChunks": [
            {"web": {"title": "No link"}},
            {"maps": {"title": "Also no link", "uri": ""}},
            {"web": {"uri": "https://who.int/a", "title": "WHO"}}
        ]}));
        let citations = extract_citations(Some(&meta));
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].uri, "https://who.int/a");
    }

    #[test]
    fn test_duplicates_keep_first_in_order() {
        let meta = metadata(json!({"groundingChunks": [
            {"web": {"uri": "https://b.example", "title": "B"}},
            {"maps": {"uri": "https://maps.example/p1", "title": "Clinic"}},
            {"web": {"uri": "https://b.example", "title": "B again"}},
            {"web": {"uri": "https://a.example", "title": "A"}}
        ]}));
        let citations = extract_citations(Some(&meta));
        let uris: Vec<&str> = citations.iter().map(|c| c.uri.as_str()).collect();
        assert_eq!(uris, ["https://b.example", "https://maps.example/p1", "https://a.example"]);
        assert_eq!(citations[0].title, "B");
        assert_eq!(citations[1].kind, CitationKind::Maps);
    }

    #[test]
    fn test_missing_title_uses_kind_label() {
        let meta = metadata(json!({"groundingChunks": [
            {"web": {"uri": "https://x.example"}},
            {"maps": {"uri": "https://maps.example/y", "title": "  "}}
        ]}));
        let citations = extract_citations(Some(&meta));
        assert_eq!(citations[0].title, "Web Source");
        assert_eq!(citations[1].title, "Map Location");
    }
}

//! Grounding citations and source URL deduplication.
//!
//! The generator's location tool attaches citation chunks to its answer. Each
//! chunk may carry a map-service reference, a web reference, both, or neither.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One side of a citation chunk
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChunkSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ChunkSource {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title: None,
        }
    }

    fn usable_uri(&self) -> Option<&str> {
        self.uri.as_deref().map(str::trim).filter(|uri| !uri.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub maps: Option<ChunkSource>,
    #[serde(default)]
    pub web: Option<ChunkSource>,
}

impl GroundingChunk {
    /// The map URI if present, otherwise the web URI.
    pub fn preferred_uri(&self) -> Option<&str> {
        self.maps
            .as_ref()
            .and_then(ChunkSource::usable_uri)
            .or_else(|| self.web.as_ref().and_then(ChunkSource::usable_uri))
    }
}

/// Unique source URLs in order of first appearance
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceUrls(Vec<String>);

impl SourceUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|u| u == url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Display labels ("Source 1", "Source 2", ...) paired with each URL
    pub fn labeled(&self) -> impl Iterator<Item = (String, &str)> {
        self.iter()
            .enumerate()
            .map(|(i, url)| (format!("Source {}", i + 1), url))
    }
}

impl<S: Into<String>> FromIterator<S> for SourceUrls {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        Self(
            iter.into_iter()
                .map(Into::into)
                .filter(|url| seen.insert(url.clone()))
                .collect(),
        )
    }
}

/// Collect one URL per chunk and drop repeats.
///
/// Chunks without any usable URI are skipped; an empty input yields an empty set.
pub fn dedup_sources(chunks: &[GroundingChunk]) -> SourceUrls {
    chunks
        .iter()
        .filter_map(GroundingChunk::preferred_uri)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps(uri: &str) -> GroundingChunk {
        GroundingChunk {
            maps: Some(ChunkSource::new(uri)),
            web: None,
        }
    }

    fn web(uri: &str) -> GroundingChunk {
        GroundingChunk {
            maps: None,
            web: Some(ChunkSource::new(uri)),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_sources(&[]).is_empty());
    }

    #[test]
    fn test_repeated_uris_across_fields_appear_once() {
        let chunks = vec![
            maps("https://maps.google.com/?cid=1"),
            web("https://maps.google.com/?cid=1"),
            web("https://example.org/ring-road"),
            maps("https://maps.google.com/?cid=2"),
            maps("https://maps.google.com/?cid=1"),
            web("https://example.org/ring-road"),
        ];

        let urls = dedup_sources(&chunks);
        assert_eq!(
            urls.iter().collect::<Vec<_>>(),
            vec![
                "https://maps.google.com/?cid=1",
                "https://example.org/ring-road",
                "https://maps.google.com/?cid=2",
            ]
        );
    }

    #[test]
    fn test_maps_preferred_over_web() {
        let chunk = GroundingChunk {
            maps: Some(ChunkSource::new("https://maps.google.com/?cid=9")),
            web: Some(ChunkSource::new("https://example.org/stop")),
        };

        let urls = dedup_sources(&[chunk]);
        assert_eq!(urls.len(), 1);
        assert!(urls.contains("https://maps.google.com/?cid=9"));
        assert!(!urls.contains("https://example.org/stop"));
    }

    #[test]
    fn test_chunks_without_uri_are_skipped() {
        let chunks = vec![
            GroundingChunk::default(),
            GroundingChunk {
                maps: Some(ChunkSource {
                    uri: None,
                    title: Some("Ratnapark".into()),
                }),
                web: None,
            },
            GroundingChunk {
                maps: Some(ChunkSource::new("   ")),
                web: Some(ChunkSource::new("https://example.org/fallback")),
            },
        ];

        let urls = dedup_sources(&chunks);
        assert_eq!(urls.iter().collect::<Vec<_>>(), vec!["https://example.org/fallback"]);
    }

    #[test]
    fn test_labels_are_one_based() {
        let urls: SourceUrls = ["https://a.example", "https://b.example"].into_iter().collect();
        let labels: Vec<_> = urls.labeled().collect();

        assert_eq!(labels[0], ("Source 1".to_string(), "https://a.example"));
        assert_eq!(labels[1], ("Source 2".to_string(), "https://b.example"));
    }

    #[test]
    fn test_chunk_deserializes_from_generator_shape() {
        let chunk: GroundingChunk = serde_json::from_str(
            r#"{"maps": {"uri": "https://maps.google.com/?cid=3", "title": "Baneshwor"}}"#,
        )
        .unwrap();

        assert_eq!(chunk.preferred_uri(), Some("https://maps.google.com/?cid=3"));
        assert!(chunk.web.is_none());
    }
}

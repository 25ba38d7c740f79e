//! JSON bodies for the `generateContent` endpoint.

use ktm_transit::grounding::GroundingChunk;
use ktm_transit::network::GeneratedText;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_maps: GoogleMaps,
}

/// Enables map grounding; the service takes an empty object
#[derive(Debug, Default, Serialize)]
struct GoogleMaps {}

impl<'a> GenerateContentRequest<'a> {
    /// Single user turn with the map grounding tool enabled
    pub fn with_maps_grounding(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_maps: GoogleMaps::default(),
            }],
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    /// Set on reasoning parts, which are not part of the answer
    #[serde(default)]
    pub thought: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Answer text and citations from the first candidate.
    pub fn into_generated_text(self) -> GeneratedText {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            tracing::warn!("prompt blocked by the model service: {reason}");
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return GeneratedText::default();
        };

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                tracing::warn!("generation finished early: {reason}");
            }
        }

        let text: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| !part.thought.unwrap_or(false))
            .filter_map(|part| part.text)
            .collect();

        GeneratedText {
            text: (!text.is_empty()).then_some(text),
            grounding: candidate
                .grounding_metadata
                .map(|metadata| metadata.grounding_chunks)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest::with_maps_grounding("find bus 23");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{"role": "user", "parts": [{"text": "find bus 23"}]}],
                "tools": [{"googleMaps": {}}]
            })
        );
    }

    #[test]
    fn test_response_text_and_grounding() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "thinking about Kathmandu...", "thought": true},
                        {"text": "```json\n{\"busNumber\":"},
                        {"text": "\"Sajha 1\"}\n```"}
                    ]
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [
                        {"maps": {"uri": "https://maps.google.com/?cid=11", "title": "Ratnapark", "placeId": "places/abc"}},
                        {"web": {"uri": "https://example.org/ring-road", "title": "Ring Road"}}
                    ],
                    "webSearchQueries": []
                }
            }],
            "usageMetadata": {"totalTokenCount": 512}
        }))
        .unwrap();

        let generated = response.into_generated_text();
        assert_eq!(
            generated.text.as_deref(),
            Some("```json\n{\"busNumber\":\"Sajha 1\"}\n```")
        );
        assert_eq!(generated.grounding.len(), 2);
        assert_eq!(
            generated.grounding[0].preferred_uri(),
            Some("https://maps.google.com/?cid=11")
        );
    }

    #[test]
    fn test_no_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();

        let generated = response.into_generated_text();
        assert_eq!(generated.text, None);
        assert!(generated.grounding.is_empty());
    }

    #[test]
    fn test_candidate_without_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();

        assert_eq!(response.into_generated_text().text, None);
    }
}

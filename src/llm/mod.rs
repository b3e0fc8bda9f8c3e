use async_trait::async_trait;

use crate::error::AdvisorResult;

pub mod client;
pub mod prompts;

pub use client::ChatClient;

/// Injectable text-generation capability.
///
/// The assistant only ever needs "prompt in, text out", so every caller
/// works against this trait and tests substitute fixed-response stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, temperature: f32) -> AdvisorResult<String>;
}

/// Pull a JSON object out of a generation reply.
///
/// Replies arrive as bare JSON, fenced JSON, or JSON buried in prose;
/// each candidate is validated before being accepted.
pub fn extract_json_object(response: &str) -> Option<String> {
    // Look for json code blocks
    if let Some(start) = response.find("```json") {
        if let Some(end) = response[start + 7..].find("```") {
            let candidate = response[start + 7..start + 7 + end].trim();
            if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                return Some(candidate.to_string());
            }
        }
    }

    // Look for generic code blocks
    if let Some(start) = response.find("```") {
        if let Some(end) = response[start + 3..].find("```") {
            let candidate = response[start + 3..start + 3 + end].trim();
            if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                return Some(candidate.to_string());
            }
        }
    }

    // Scan for the first balanced object in surrounding prose
    if let Some(start) = response.find('{') {
        let mut depth = 0usize;
        for (offset, ch) in response[start..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        let candidate = &response[start..start + offset + ch.len_utf8()];
                        if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                            return Some(candidate.to_string());
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    None
}

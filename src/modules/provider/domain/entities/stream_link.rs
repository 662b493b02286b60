use serde::{Deserialize, Serialize};

/// A playable source returned by a streaming-link provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamLink {
    pub provider: String,
    pub url: String,
    pub quality: Option<String>,
    #[serde(rename = "isM3U8")]
    pub is_m3u8: bool,
}

/// What a streaming provider is asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamRequest {
    /// Slug of the normalized base title
    pub slug: String,
    pub episode_number: u32,
    /// Provider-specific episode id, when the caller already has one
    pub episode_id: Option<String>,
}

impl StreamRequest {
    /// The id used for the provider's watch lookup
    pub fn watch_id(&self) -> String {
        match self.episode_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}-episode-{}", self.slug, self.episode_number),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_id_prefers_explicit_episode_id() {
        let request = StreamRequest {
            slug: "frieren".to_string(),
            episode_number: 3,
            episode_id: Some("frieren-xyz$ep=3".to_string()),
        };
        assert_eq!(request.watch_id(), "frieren-xyz$ep=3");
    }

    #[test]
    fn test_watch_id_falls_back_to_slug() {
        let request = StreamRequest {
            slug: "frieren".to_string(),
            episode_number: 3,
            episode_id: Some("  ".to_string()),
        };
        assert_eq!(request.watch_id(), "frieren-episode-3");
    }
}

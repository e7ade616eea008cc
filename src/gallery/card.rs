use crate::models::ArtSubmission;

/// Placeholder shown in place of an artwork image that failed to load.
pub const FALLBACK_IMAGE_URL: &str =
    "https://images.pexels.com/photos/1183992/pexels-photo-1183992.jpeg?auto=compress&cs=tinysrgb&w=400";

/// Display-ready gallery entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkCard {
    pub id: String,
    pub title: String,
    pub creator_name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub fallback_url: &'static str,
    pub submitted_on: String,
}

impl ArtworkCard {
    pub fn new(artwork: &ArtSubmission, image_failed: bool) -> Self {
        let image_url = if image_failed {
            FALLBACK_IMAGE_URL.to_string()
        } else {
            artwork.artwork_url.clone()
        };

        Self {
            id: artwork.id.clone(),
            title: artwork.title.clone(),
            creator_name: artwork.creator_name.clone(),
            description: artwork.description_text().map(str::to_string),
            image_url,
            fallback_url: FALLBACK_IMAGE_URL,
            submitted_on: artwork.created_at.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn uses_fallback(&self) -> bool {
        self.image_url == self.fallback_url
    }
}

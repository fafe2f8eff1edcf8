use std::sync::LazyLock;

use regex::Regex;

use super::model::resource;

static IMAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-z0-9]+$").expect("image id pattern is valid"));

resource!(
    /// A cover or profile image hosted on the CDN.
    Image
);

impl Image {
    pub fn url(&self) -> Option<&str> {
        self.model.str("url")
    }

    pub fn spotify_url(&self) -> Option<&str> {
        self.url()
    }

    /// Trailing alphanumeric segment of the URL.
    pub fn id(&self) -> Option<&str> {
        IMAGE_ID.find(self.url()?).map(|m| m.as_str())
    }

    pub fn spotify_uri(&self) -> Option<String> {
        self.id().map(|id| format!("spotify:image:{id}"))
    }

    pub fn width(&self) -> Option<u64> {
        self.model.u64("width")
    }

    pub fn height(&self) -> Option<u64> {
        self.model.u64("height")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sdk::{model::Resource, test_support::sdk};

    #[test]
    fn id_and_uri_come_from_url() {
        let image = Image::new(
            json!({"url": "https://i.scdn.co/image/ab6761610000e5eb4a0f", "width": 640, "height": 640}),
            &sdk("token"),
        )
        .unwrap();

        assert_eq!(image.id(), Some("ab6761610000e5eb4a0f"));
        assert_eq!(image.spotify_uri().as_deref(), Some("spotify:image:ab6761610000e5eb4a0f"));
        assert_eq!(image.spotify_url(), image.url());
        assert_eq!(image.height(), Some(640));
    }

    #[test]
    fn missing_url_has_no_id() {
        let image = Image::new(json!({}), &sdk("token")).unwrap();
        assert_eq!(image.id(), None);
        assert_eq!(image.spotify_uri(), None);
    }
}

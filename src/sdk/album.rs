use super::{
    Artist, Image,
    model::resource,
};
use crate::Result;

resource!(
    /// An album, full or simplified.
    Album
);

impl Album {
    pub fn id(&self) -> Option<&str> {
        self.model.str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.model.str("name")
    }

    pub fn is_album(&self) -> bool {
        self.model.str("type") == Some("album")
    }

    /// `album`, `single` or `compilation`.
    pub fn album_type(&self) -> Option<&str> {
        self.model.str("album_type")
    }

    pub fn release_date(&self) -> Option<&str> {
        self.model.str("release_date")
    }

    pub fn total_tracks(&self) -> Option<u64> {
        self.model.u64("total_tracks")
    }

    pub fn images(&self) -> Result<Vec<Image>> {
        self.model.children("images")
    }

    pub fn artists(&self) -> Result<Vec<Artist>> {
        self.model.children("artists")
    }

    /// The first credited artist.
    pub fn artist(&self) -> Result<Option<Artist>> {
        Ok(self.artists()?.into_iter().next())
    }

    pub fn spotify_uri(&self) -> Option<&str> {
        self.model.str("uri")
    }

    pub fn spotify_url(&self) -> Option<&str> {
        self.model.str("external_urls.spotify")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sdk::{model::Resource, test_support::sdk};

    #[test]
    fn album_fields() {
        let album = Album::new(
            json!({
                "id": "5ht7ItJgpBH7W6vJ5BqpPr",
                "name": "Cease To Begin",
                "type": "album",
                "album_type": "album",
                "release_date": "2007-10-09",
                "uri": "spotify:album:5ht7ItJgpBH7W6vJ5BqpPr",
                "external_urls": {"spotify": "https://open.spotify.com/album/5ht7ItJgpBH7W6vJ5BqpPr"},
                "artists": [{"id": "a1", "name": "Band of Horses"}, {"id": "a2", "name": "Guest"}],
                "images": [{"url": "https://i.scdn.co/image/xyz789"}]
            }),
            &sdk("token"),
        )
        .unwrap();

        assert!(album.is_album());
        assert_eq!(album.release_date(), Some("2007-10-09"));
        assert_eq!(album.spotify_uri(), Some("spotify:album:5ht7ItJgpBH7W6vJ5BqpPr"));
        assert_eq!(
            album.spotify_url(),
            Some("https://open.spotify.com/album/5ht7ItJgpBH7W6vJ5BqpPr")
        );
        assert_eq!(album.artists().unwrap().len(), 2);
        assert_eq!(album.artist().unwrap(), album.artists().unwrap().into_iter().next());
        assert_eq!(album.images().unwrap()[0].id(), Some("xyz789"));
    }

    #[test]
    fn non_album_type() {
        let album = Album::new(json!({"type": "single"}), &sdk("token")).unwrap();
        assert!(!album.is_album());
        assert_eq!(album.artist().unwrap(), None);
    }
}

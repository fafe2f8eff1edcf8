use super::{
    Album, Artist,
    model::resource,
};
use crate::Result;

resource!(
    /// A playable item, usually a track.
    Item
);

impl Item {
    pub fn id(&self) -> Option<&str> {
        self.model.str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.model.str("name")
    }

    /// Duration in milliseconds.
    pub fn duration(&self) -> Option<u64> {
        self.model.u64("duration_ms")
    }

    pub fn explicit(&self) -> bool {
        self.model.bool("explicit").unwrap_or(false)
    }

    pub fn local(&self) -> bool {
        self.model.bool("is_local").unwrap_or(false)
    }

    pub fn is_track(&self) -> bool {
        self.model.str("type") == Some("track")
    }

    pub fn artists(&self) -> Result<Vec<Artist>> {
        self.model.children("artists")
    }

    pub fn album(&self) -> Result<Option<Album>> {
        self.model.child("album")
    }

    pub fn spotify_uri(&self) -> Option<&str> {
        self.model.str("uri")
    }

    pub fn spotify_url(&self) -> Option<&str> {
        self.model.str("external_urls.spotify")
    }
}

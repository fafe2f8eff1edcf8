use super::{
    Image, RequestOptions,
    model::resource,
};
use crate::{Error, Result};

resource!(
    /// An artist. Albums and tracks embed a simplified artist object; the full
    /// one (with images, genres, followers) is fetched on demand by
    /// [`Artist::retrieve_full_information`].
    Artist
);

impl Artist {
    pub fn id(&self) -> Option<&str> {
        self.model.str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.model.str("name")
    }

    pub fn spotify_uri(&self) -> Option<&str> {
        self.model.str("uri")
    }

    pub fn spotify_url(&self) -> Option<&str> {
        self.model.str("external_urls.spotify")
    }

    /// Follower count, from `followers.total`.
    pub fn followers(&self) -> Option<u64> {
        self.model.u64("followers.total")
    }

    pub fn popularity(&self) -> Option<u64> {
        self.model.u64("popularity")
    }

    pub fn genres(&self) -> Vec<&str> {
        self.model
            .field("genres")
            .and_then(|g| g.as_array())
            .map(|g| g.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Images from the payload; empty for a simplified artist.
    pub fn images(&self) -> Result<Vec<Image>> {
        self.model.children("images")
    }

    /// Whether the payload is the full artist object.
    pub fn full_information(&self) -> bool {
        self.model.has("images")
    }

    /// Fetches `/v1/artists/{id}` and merges it into this artist unless the
    /// payload is already complete.
    pub async fn retrieve_full_information(&mut self) -> Result<()> {
        if self.full_information() {
            return Ok(());
        }

        let id = self
            .id()
            .ok_or(Error::InvalidModel("artist payload has no id"))?
            .to_string();
        let full = self
            .model
            .parent()
            .envelope()
            .get(&format!("/v1/artists/{id}"), RequestOptions::default())
            .await?;

        match full {
            serde_json::Value::Object(map) => {
                self.model.merge(map);
                Ok(())
            }
            _ => Err(Error::InvalidModel("expected payload to be a JSON object")),
        }
    }
}

//! The authorized user: profile, follows and listening history.

mod info;

pub use info::UserInfo;

use reqwest::Method;
use serde_json::Value;

use super::{Artist, Item, RequestOptions, Resource, Sdk};
use crate::{Error, Result};

/// Page size for the followed-artists listing, the API maximum.
const FOLLOWING_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone)]
pub struct Me {
    sdk: Sdk,
}

impl Me {
    pub fn new(sdk: Sdk) -> Self {
        Self { sdk }
    }

    /// Profile of the current user.
    pub async fn info(&self) -> Result<UserInfo> {
        let raw = self
            .sdk
            .envelope()
            .get("/v1/me", RequestOptions::default())
            .await?;
        UserInfo::new(raw, &self.sdk)
    }

    /// Artists the user follows, walking the cursor pages in order.
    ///
    /// Stops at the last page, at an empty page, or after `max_pages` pages
    /// when a cap is given.
    pub async fn following(&self, max_pages: Option<usize>) -> Result<Vec<Artist>> {
        let mut artists = Vec::new();
        let mut after: Option<String> = None;
        let mut pages = 0;

        loop {
            if max_pages.is_some_and(|cap| pages >= cap) {
                break;
            }

            let mut options = RequestOptions::default()
                .query("type", "artist")
                .query("limit", FOLLOWING_PAGE_SIZE);
            if let Some(cursor) = &after {
                options = options.query("after", cursor);
            }
            let body = self.sdk.envelope().get("/v1/me/following", options).await?;
            pages += 1;

            let page = body
                .get("artists")
                .ok_or(Error::InvalidModel("following response has no artists page"))?;
            let items = match page.get("items") {
                Some(Value::Array(items)) => items,
                _ => break,
            };
            if items.is_empty() {
                break;
            }
            for raw in items {
                artists.push(Artist::new(raw.clone(), &self.sdk)?);
            }

            let has_next = page.get("next").is_some_and(|next| !next.is_null());
            after = page
                .get("cursors")
                .and_then(|c| c.get("after"))
                .and_then(Value::as_str)
                .map(str::to_string);
            if !has_next || after.is_none() {
                break;
            }
        }

        tracing::debug!(count = artists.len(), pages, "fetched followed artists");
        Ok(artists)
    }

    /// Most recently played tracks, newest first.
    pub async fn history(&self, limit: u32) -> Result<Vec<Item>> {
        let body = self
            .sdk
            .envelope()
            .get(
                "/v1/me/player/recently-played",
                RequestOptions::default().query("limit", limit),
            )
            .await?;
        let Some(Value::Array(entries)) = body.get("items") else {
            return Ok(Vec::new());
        };
        entries
            .iter()
            .filter_map(|entry| entry.get("track"))
            .map(|track| Item::new(track.clone(), &self.sdk))
            .collect()
    }

    /// For each id, whether the user follows that artist.
    pub async fn following_artists(&self, ids: &[&str]) -> Result<Vec<bool>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let body = self
            .sdk
            .envelope()
            .get("/v1/me/following/contains", artist_ids(ids))
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn follow_artists(&self, ids: &[&str]) -> Result<()> {
        self.change_follows(Method::PUT, ids).await
    }

    pub async fn unfollow_artists(&self, ids: &[&str]) -> Result<()> {
        self.change_follows(Method::DELETE, ids).await
    }

    async fn change_follows(&self, method: Method, ids: &[&str]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.sdk
            .envelope()
            .command(method, "/v1/me/following", None, artist_ids(ids))
            .await
    }
}

fn artist_ids(ids: &[&str]) -> RequestOptions {
    RequestOptions::default()
        .query("type", "artist")
        .query("ids", ids.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::test_support::sdk;

    #[test]
    fn ids_are_comma_joined() {
        let options = artist_ids(&["a", "b", "c"]);
        assert_eq!(
            options.query,
            vec![
                ("type".to_string(), "artist".to_string()),
                ("ids".to_string(), "a,b,c".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn empty_id_lists_skip_the_request() {
        let me = Me::new(sdk("token"));
        assert!(me.following_artists(&[]).await.unwrap().is_empty());
        assert!(me.follow_artists(&[]).await.is_ok());
    }

    #[tokio::test]
    async fn zero_page_cap_fetches_nothing() {
        let me = Me::new(sdk("token"));
        assert!(me.following(Some(0)).await.unwrap().is_empty());
    }
}

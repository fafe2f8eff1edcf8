//! Spotify Connect: the user's devices and what they are playing.

mod device;
mod playback_state;

pub use device::{Device, PlayTarget, RepeatMode};
pub use playback_state::PlaybackState;

use super::{RequestOptions, Response, Resource, Sdk};
use crate::{Error, Result};

/// Device and playback queries.
#[derive(Debug, Clone)]
pub struct Connect {
    sdk: Sdk,
}

impl Connect {
    pub fn new(sdk: Sdk) -> Self {
        Self { sdk }
    }

    pub fn sdk(&self) -> &Sdk {
        &self.sdk
    }

    /// Every device the user can control, active or not.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let body = self
            .sdk
            .envelope()
            .get("/v1/me/player/devices", RequestOptions::default())
            .await?;
        match body.get("devices") {
            Some(serde_json::Value::Array(devices)) => devices
                .iter()
                .map(|raw| Device::new(raw.clone(), &self.sdk))
                .collect(),
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(_) => Err(Error::InvalidModel("expected devices to be an array")),
        }
    }

    /// Current playback, or `None` when nothing is playing anywhere.
    pub async fn playback(&self) -> Result<Option<PlaybackState>> {
        let response = self
            .sdk
            .envelope()
            .send(
                reqwest::Method::GET,
                "/v1/me/player",
                None,
                RequestOptions::expect_empty().query("market", "from_token"),
            )
            .await?;
        match response {
            Response::Json(raw) => PlaybackState::new(raw, &self.sdk).map(Some),
            _ => Ok(None),
        }
    }

    /// The first device flagged active.
    pub async fn active_device(&self) -> Result<Option<Device>> {
        Ok(self.devices().await?.into_iter().find(Device::active))
    }
}

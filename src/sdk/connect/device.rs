use std::{fmt, str::FromStr};

use reqwest::Method;
use serde_json::{Value, json};

use super::{Connect, PlaybackState};
use crate::{
    Error, Result,
    sdk::{RequestOptions, model::resource},
};

resource!(
    /// A Connect device: phone, desktop app, speaker.
    Device
);

impl Device {
    pub fn id(&self) -> Option<&str> {
        self.model.str("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.model.str("name")
    }

    /// `Computer`, `Smartphone`, `Speaker`, ...
    pub fn kind(&self) -> Option<&str> {
        self.model.str("type")
    }

    /// Volume in percent; `None` for devices that do not report one.
    pub fn volume(&self) -> Option<u64> {
        self.model.u64("volume_percent")
    }

    pub fn active(&self) -> bool {
        self.model.bool("is_active").unwrap_or(false)
    }

    pub fn private_session(&self) -> bool {
        self.model.bool("is_private_session").unwrap_or(false)
    }

    /// Restricted devices accept no commands.
    pub fn restricted(&self) -> bool {
        self.model.bool("is_restricted").unwrap_or(false)
    }

    pub async fn playback(&self) -> Result<Option<PlaybackState>> {
        Connect::new(self.model.parent().clone()).playback().await
    }

    /// Starts playing `target` on this device.
    pub async fn play(&self, target: &PlayTarget) -> Result<()> {
        let body = target.body()?;
        self.player(Method::PUT, "play", Some(&body), self.options()?)
            .await
    }

    /// Resumes whatever was playing.
    pub async fn resume(&self) -> Result<()> {
        self.player(Method::PUT, "play", None, self.options()?).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.player(Method::PUT, "pause", None, self.options()?).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.player(Method::POST, "previous", None, self.options()?)
            .await
    }

    pub async fn next(&self) -> Result<()> {
        self.player(Method::POST, "next", None, self.options()?)
            .await
    }

    /// Sets the volume to `percent`, which must be at most 100.
    pub async fn change_volume(&self, percent: u8) -> Result<()> {
        if percent > 100 {
            return Err(Error::InvalidPlaybackCommand("volume must be between 0 and 100"));
        }
        let options = self.options()?.query("volume_percent", percent);
        self.player(Method::PUT, "volume", None, options).await
    }

    pub async fn seek_ms(&self, position_ms: u64) -> Result<()> {
        let options = self.options()?.query("position_ms", position_ms);
        self.player(Method::PUT, "seek", None, options).await
    }

    pub async fn repeat(&self, mode: RepeatMode) -> Result<()> {
        let options = self.options()?.query("state", mode);
        self.player(Method::PUT, "repeat", None, options).await
    }

    pub async fn shuffle(&self, on: bool) -> Result<()> {
        let options = self.options()?.query("state", on);
        self.player(Method::PUT, "shuffle", None, options).await
    }

    /// Moves playback here; `play` forces playback to start.
    pub async fn transfer_playback(&self, play: bool) -> Result<()> {
        let body = json!({ "device_ids": [self.require_id()?], "play": play });
        self.model
            .parent()
            .envelope()
            .command(Method::PUT, "/v1/me/player", Some(&body), RequestOptions::default())
            .await
    }

    fn require_id(&self) -> Result<&str> {
        self.id()
            .ok_or(Error::InvalidModel("device payload has no id"))
    }

    fn options(&self) -> Result<RequestOptions> {
        Ok(RequestOptions::default().query("device_id", self.require_id()?))
    }

    async fn player(
        &self,
        method: Method,
        action: &str,
        body: Option<&Value>,
        options: RequestOptions,
    ) -> Result<()> {
        tracing::debug!(device = ?self.name(), action, "player command");
        self.model
            .parent()
            .envelope()
            .command(method, &format!("/v1/me/player/{action}"), body, options)
            .await
    }
}

/// What to start playing.
///
/// | set                     | request body                          |
/// |-------------------------|---------------------------------------|
/// | `uri`                   | `{"uris": [uri]}`                     |
/// | `context` + `index`     | `{"context_uri", "offset": {"position"}}` |
/// | `context` + `uri`       | `{"context_uri", "offset": {"uri"}}`  |
/// | `context`               | `{"context_uri"}`                     |
///
/// Anything else is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayTarget {
    pub uri: Option<String>,
    pub context: Option<String>,
    pub index: Option<u32>,
}

impl PlayTarget {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Default::default()
        }
    }

    pub fn context(context: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            ..Default::default()
        }
    }

    pub fn at_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn at_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn body(&self) -> Result<Value> {
        match (&self.context, &self.uri, self.index) {
            (None, Some(uri), None) => Ok(json!({ "uris": [uri] })),
            (Some(context), None, Some(position)) => Ok(json!({
                "context_uri": context,
                "offset": { "position": position }
            })),
            (Some(context), Some(uri), None) => Ok(json!({
                "context_uri": context,
                "offset": { "uri": uri }
            })),
            (Some(context), None, None) => Ok(json!({ "context_uri": context })),
            (Some(_), Some(_), Some(_)) => Err(Error::InvalidPlaybackCommand(
                "offset takes either an index or a uri, not both",
            )),
            (None, _, Some(_)) => Err(Error::InvalidPlaybackCommand(
                "an index needs a context to play from",
            )),
            (None, None, None) => Err(Error::InvalidPlaybackCommand("nothing to play")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Track,
    Context,
    Off,
}

impl RepeatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatMode::Track => "track",
            RepeatMode::Context => "context",
            RepeatMode::Off => "off",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "track" => Ok(RepeatMode::Track),
            "context" => Ok(RepeatMode::Context),
            "off" => Ok(RepeatMode::Off),
            _ => Err(Error::InvalidPlaybackCommand(
                "repeat mode must be track, context or off",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{model::Resource, test_support::sdk};

    #[test]
    fn device_flags() {
        let device = Device::new(
            json!({
                "id": "d1",
                "name": "Kitchen",
                "type": "Speaker",
                "volume_percent": 35,
                "is_active": true,
                "is_private_session": false,
                "is_restricted": false
            }),
            &sdk("token"),
        )
        .unwrap();

        assert_eq!(device.kind(), Some("Speaker"));
        assert_eq!(device.volume(), Some(35));
        assert!(device.active());
        assert!(!device.private_session());
        assert!(!device.restricted());
    }

    #[test]
    fn play_target_bodies() {
        assert_eq!(
            PlayTarget::uri("spotify:track:1").body().unwrap(),
            json!({"uris": ["spotify:track:1"]})
        );
        assert_eq!(
            PlayTarget::context("spotify:album:1").at_index(2).body().unwrap(),
            json!({"context_uri": "spotify:album:1", "offset": {"position": 2}})
        );
        assert_eq!(
            PlayTarget::context("spotify:album:1")
                .at_uri("spotify:track:9")
                .body()
                .unwrap(),
            json!({"context_uri": "spotify:album:1", "offset": {"uri": "spotify:track:9"}})
        );
        assert_eq!(
            PlayTarget::context("spotify:playlist:1").body().unwrap(),
            json!({"context_uri": "spotify:playlist:1"})
        );
    }

    #[test]
    fn incoherent_play_targets_are_rejected() {
        let targets = [
            PlayTarget::default(),
            PlayTarget::uri("spotify:track:1").at_index(0),
            PlayTarget::context("spotify:album:1")
                .at_uri("spotify:track:1")
                .at_index(0),
        ];
        for target in targets {
            assert!(matches!(target.body(), Err(Error::InvalidPlaybackCommand(_))));
        }
    }

    #[tokio::test]
    async fn volume_above_100_never_reaches_the_network() {
        let device = Device::new(json!({"id": "d1"}), &sdk("token")).unwrap();
        assert!(matches!(
            device.change_volume(101).await,
            Err(Error::InvalidPlaybackCommand(_))
        ));
    }

    #[tokio::test]
    async fn commands_need_a_device_id() {
        let device = Device::new(json!({"name": "Ghost"}), &sdk("token")).unwrap();
        assert!(matches!(device.pause().await, Err(Error::InvalidModel(_))));
    }

    #[test]
    fn repeat_modes_parse() {
        assert_eq!("Track".parse::<RepeatMode>().unwrap(), RepeatMode::Track);
        assert_eq!(RepeatMode::Context.to_string(), "context");
        assert!("sometimes".parse::<RepeatMode>().is_err());
    }
}

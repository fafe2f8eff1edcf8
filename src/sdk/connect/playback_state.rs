use chrono::{DateTime, Utc};

use super::{Device, RepeatMode};
use crate::{
    Result,
    sdk::{Artist, Item, model::resource},
};

resource!(
    /// Snapshot of what a device is playing.
    PlaybackState
);

impl PlaybackState {
    pub fn device(&self) -> Result<Option<Device>> {
        self.model.child("device")
    }

    pub fn shuffling(&self) -> bool {
        self.model.bool("shuffle_state").unwrap_or(false)
    }

    pub fn repeat_mode(&self) -> Option<RepeatMode> {
        self.model.str("repeat_state")?.parse().ok()
    }

    /// When the snapshot was taken. The API reports milliseconds.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.model
            .i64("timestamp")
            .and_then(|ms| DateTime::from_timestamp(ms / 1000, 0))
    }

    pub fn progress_ms(&self) -> Option<u64> {
        self.model.u64("progress_ms")
    }

    pub fn playing(&self) -> bool {
        self.model.bool("is_playing").unwrap_or(false)
    }

    pub fn item(&self) -> Result<Option<Item>> {
        self.model.child("item")
    }

    /// Artists of the current item; empty when nothing is loaded.
    pub fn artists(&self) -> Result<Vec<Artist>> {
        match self.item()? {
            Some(item) => item.artists(),
            None => Ok(Vec::new()),
        }
    }

    pub fn artist(&self) -> Result<Option<Artist>> {
        Ok(self.artists()?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sdk::{model::Resource, test_support::sdk};

    #[test]
    fn playback_fields() {
        let state = PlaybackState::new(
            json!({
                "device": {"id": "d1", "name": "Desk", "is_active": true},
                "shuffle_state": true,
                "repeat_state": "context",
                "timestamp": 1_700_000_000_123_i64,
                "progress_ms": 44_000,
                "is_playing": true,
                "item": {
                    "name": "Is There a Ghost",
                    "type": "track",
                    "artists": [{"name": "Band of Horses"}]
                }
            }),
            &sdk("token"),
        )
        .unwrap();

        assert!(state.device().unwrap().unwrap().active());
        assert!(state.shuffling());
        assert_eq!(state.repeat_mode(), Some(RepeatMode::Context));
        assert_eq!(state.time().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(state.progress_ms(), Some(44_000));
        assert!(state.playing());
        assert_eq!(state.artist().unwrap().unwrap().name(), Some("Band of Horses"));
    }

    #[test]
    fn idle_player_has_no_item() {
        let state = PlaybackState::new(json!({"is_playing": false, "item": null}), &sdk("token")).unwrap();
        assert!(state.item().unwrap().is_none());
        assert!(state.artists().unwrap().is_empty());
        assert_eq!(state.time(), None);
    }
}

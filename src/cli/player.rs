use tabled::{Table, Tabled};

use super::open_session;
use crate::{
    Error, Result, error, info,
    sdk::{Device, PlayTarget, Sdk},
    success, warning,
};

#[derive(Tabled)]
struct DeviceRow {
    name: String,
    #[tabled(rename = "type")]
    kind: String,
    volume: String,
    active: String,
}

impl From<&Device> for DeviceRow {
    fn from(device: &Device) -> Self {
        Self {
            name: device.name().unwrap_or("-").to_string(),
            kind: device.kind().unwrap_or("-").to_string(),
            volume: device
                .volume()
                .map(|v| format!("{v}%"))
                .unwrap_or_else(|| "-".to_string()),
            active: if device.active() { "yes" } else { "" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub uri: Option<String>,
    pub context: Option<String>,
    pub index: Option<u32>,
}

pub async fn devices() -> Result<()> {
    let manager = open_session().await?;
    let devices = manager.sdk().await?.connect().devices().await?;
    manager.save().await?;

    if devices.is_empty() {
        warning!("No devices available. Open Spotify on one of your devices.");
        return Ok(());
    }
    let rows: Vec<DeviceRow> = devices.iter().map(DeviceRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn playing() -> Result<()> {
    let manager = open_session().await?;
    let playback = manager.sdk().await?.connect().playback().await?;
    manager.save().await?;

    let Some(playback) = playback else {
        info!("Nothing is playing right now.");
        return Ok(());
    };
    match playback.item()? {
        Some(item) => {
            let artists: Vec<String> = item
                .artists()?
                .iter()
                .filter_map(|a| a.name().map(str::to_string))
                .collect();
            let device = playback.device()?;
            info!(
                "{} {} - {} on {}",
                if playback.playing() { "Playing" } else { "Paused" },
                artists.join(", "),
                item.name().unwrap_or("unknown"),
                device.as_ref().and_then(Device::name).unwrap_or("unknown device")
            );
        }
        None => info!("A device is active but nothing is loaded."),
    }
    Ok(())
}

pub async fn play(device: Option<String>, options: PlayOptions) -> Result<()> {
    let manager = open_session().await?;
    let target = select_device(&manager.sdk().await?, device.as_deref()).await?;
    let result = if options.uri.is_none() && options.context.is_none() {
        target.resume().await
    } else {
        let play_target = PlayTarget {
            uri: options.uri,
            context: options.context,
            index: options.index,
        };
        target.play(&play_target).await
    };
    manager.save().await?;
    report(result, "Playback started")
}

pub async fn pause(device: Option<String>) -> Result<()> {
    let manager = open_session().await?;
    let target = select_device(&manager.sdk().await?, device.as_deref()).await?;
    let result = target.pause().await;
    manager.save().await?;
    report(result, "Playback paused")
}

pub async fn next(device: Option<String>) -> Result<()> {
    let manager = open_session().await?;
    let target = select_device(&manager.sdk().await?, device.as_deref()).await?;
    let result = target.next().await;
    manager.save().await?;
    report(result, "Skipped to next track")
}

pub async fn previous(device: Option<String>) -> Result<()> {
    let manager = open_session().await?;
    let target = select_device(&manager.sdk().await?, device.as_deref()).await?;
    let result = target.previous().await;
    manager.save().await?;
    report(result, "Back to previous track")
}

pub async fn volume(device: Option<String>, percent: u8) -> Result<()> {
    let manager = open_session().await?;
    let target = select_device(&manager.sdk().await?, device.as_deref()).await?;
    let result = target.change_volume(percent).await;
    manager.save().await?;
    report(result, &format!("Volume set to {percent}%"))
}

/// The device matching `wanted` by id or (case-insensitive) name, otherwise
/// the active one.
async fn select_device(sdk: &Sdk, wanted: Option<&str>) -> Result<Device> {
    let devices = sdk.connect().devices().await?;
    let found = match wanted {
        Some(wanted) => devices.into_iter().find(|d| {
            d.id() == Some(wanted) || d.name().is_some_and(|n| n.eq_ignore_ascii_case(wanted))
        }),
        None => devices.into_iter().find(Device::active),
    };
    match (found, wanted) {
        (Some(device), _) => Ok(device),
        (None, Some(wanted)) => error!("No device named {}.", wanted),
        (None, None) => error!("No active device. Pass --device or start playback somewhere."),
    }
}

fn report(result: Result<()>, done: &str) -> Result<()> {
    match result {
        Ok(()) => {
            success!("{}", done);
            Ok(())
        }
        Err(Error::InvalidPlaybackCommand(reason)) => error!("{}", reason),
        Err(e) => Err(e),
    }
}

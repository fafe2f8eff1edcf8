//! # CLI Module
//!
//! Commands of the `spotify-sdk` binary. Each command loads the client
//! credentials from the environment, opens the stored session (refreshing
//! it when needed), talks to the Web API through [`Sdk`] and writes any
//! refreshed tokens back before returning.
//!
//! ```bash
//! spotify-sdk auth                 # authorize and store a session
//! spotify-sdk devices              # list Connect devices
//! spotify-sdk play --uri spotify:track:...
//! spotify-sdk volume 40 --device Kitchen
//! spotify-sdk following --max-pages 2
//! ```

mod auth;
mod me;
mod player;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::auth;
pub use me::{following, me};
pub use player::{
    PlayOptions, devices, next, pause, play, playing, previous, volume,
};

use crate::{
    Result,
    accounts::Accounts,
    error,
    management::{SessionManager, SessionStore},
};

/// Loads credentials and the stored session, exiting with a hint when no
/// session has been stored yet.
async fn open_session() -> Result<SessionManager> {
    let accounts = Arc::new(Accounts::from_env()?);
    match SessionManager::load(accounts, SessionStore::open()).await? {
        Some(manager) => Ok(manager),
        None => error!(
            "No stored session. Please run {} auth first.",
            env!("CARGO_PKG_NAME")
        ),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

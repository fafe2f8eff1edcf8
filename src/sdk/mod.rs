//! # SDK
//!
//! Typed access to the Web API for one authorized [`Session`].
//!
//! [`Sdk`] is cheap to clone: every clone shares the same session, so a
//! refresh made through one is seen by all of them and by every resource
//! fetched through them.
//!
//! ```rust,ignore
//! let sdk = Sdk::new(Arc::new(session));
//! let me = sdk.me().info().await?;
//! for device in sdk.connect().devices().await? {
//!     println!("{:?} {:?}", device.name(), device.volume());
//! }
//! ```

pub mod album;
pub mod artist;
pub mod base;
pub mod connect;
pub mod image;
pub mod initialization;
pub mod item;
pub mod me;
pub mod model;

use std::sync::Arc;

pub use album::Album;
pub use artist::Artist;
pub use base::{Envelope, RequestOptions, Response};
pub use connect::{Connect, Device, PlayTarget, PlaybackState, RepeatMode};
pub use image::Image;
pub use item::Item;
pub use me::{Me, UserInfo};
pub use model::{Model, Resource};

use crate::{
    Result,
    accounts::{Accounts, Session},
};

/// Entry point to the Web API components.
#[derive(Debug, Clone)]
pub struct Sdk {
    envelope: Envelope,
}

impl Sdk {
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            envelope: Envelope::new(session),
        }
    }

    /// Builds an SDK from any credential shape [`Session::detect`] accepts.
    pub fn detect(
        accounts: Arc<Accounts>,
        input: impl Into<initialization::CredentialInput>,
    ) -> Result<Self> {
        Session::detect(accounts, input).map(|session| Self::new(Arc::new(session)))
    }

    pub fn session(&self) -> &Arc<Session> {
        self.envelope.session()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Devices and playback.
    pub fn connect(&self) -> Connect {
        Connect::new(self.clone())
    }

    /// The current user.
    pub fn me(&self) -> Me {
        Me::new(self.clone())
    }

    pub async fn artist(&self, id: &str) -> Result<Artist> {
        self.fetch(&format!("/v1/artists/{id}")).await
    }

    pub async fn album(&self, id: &str) -> Result<Album> {
        self.fetch(&format!("/v1/albums/{id}")).await
    }

    pub async fn track(&self, id: &str) -> Result<Item> {
        self.fetch(&format!("/v1/tracks/{id}")).await
    }

    async fn fetch<T: Resource>(&self, path: &str) -> Result<T> {
        let raw = self.envelope.get(path, RequestOptions::default()).await?;
        T::new(raw, self)
    }
}

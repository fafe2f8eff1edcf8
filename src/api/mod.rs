//! # API Module
//!
//! HTTP endpoints of the local server the CLI runs during authorization.
//!
//! - [`callback`] receives the redirect from the accounts service, checks the
//!   `state` value and hands the authorization `code` to the waiting command.
//! - [`health`] reports status and version.
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use spotify_sdk::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback).layer(Extension(state)))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::{CallbackOutcome, CallbackState, SharedCallbackState, callback};
pub use health::health;

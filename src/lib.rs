//! Spotify Web API SDK
//!
//! Authorization against the Spotify Accounts service, a refreshable token
//! session and typed access to the Web API (devices, playback, the current
//! user, artists, albums and tracks). The `spotify-sdk` binary wraps the
//! library in a small command-line player.
//!
//! # Modules
//!
//! - `accounts` - client credentials, authorization URL, code exchange, sessions
//! - `sdk` - request envelope, credential detection and resource models
//! - `config` - environment configuration and tracing setup
//! - `api`, `server` - local OAuth callback server used by the CLI
//! - `cli`, `management` - command implementations and session persistence
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use spotify_sdk::{accounts::Accounts, sdk::Sdk};
//!
//! #[tokio::main]
//! async fn main() -> spotify_sdk::Result<()> {
//!     let accounts = Arc::new(Accounts::from_env()?);
//!     let sdk = Sdk::detect(accounts, "AQB...")?;
//!     println!("{:?}", sdk.me().info().await?.display_name());
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod api;
pub mod cli;
pub mod config;
mod error;
pub mod management;
pub mod sdk;
pub mod server;

pub use error::{Error, Result};

/// Prints an informational line with a blue bullet.
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line and exits with status 1.
///
/// Only the binary uses this. Library code returns [`Error`] instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

//! Build script for the spotify-sdk CLI.
//!
//! Copies `.env.example` into the local data directory so the CLI's
//! configuration template sits next to the `.env` it reads:
//! - Linux: `~/.local/share/spotify-sdk/.env.example`
//! - macOS: `~/Library/Application Support/spotify-sdk/.env.example`
//! - Windows: `%LOCALAPPDATA%/spotify-sdk/.env.example`
//!
//! A missing template only prints a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotify-sdk");

    if !template.is_file() {
        println!("cargo:warning=.env.example not found at {}", template.display());
        return Ok(());
    }

    // read-only build sandboxes are not fatal
    if let Err(e) = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&template, out_dir.join(".env.example")).map(|_| ()))
    {
        println!("cargo:warning=could not install .env.example: {e}");
    }

    Ok(())
}

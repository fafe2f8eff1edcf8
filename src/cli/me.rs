use tabled::{Table, Tabled};

use super::{open_session, spinner};
use crate::{Result, info, success};

#[derive(Tabled)]
struct ArtistRow {
    name: String,
    genres: String,
    followers: String,
}

pub async fn me() -> Result<()> {
    let manager = open_session().await?;
    let user = manager.sdk().await?.me().info().await?;
    manager.save().await?;

    let name = if user.has_display_name() {
        user.display_name().unwrap_or_default()
    } else {
        user.id().unwrap_or("unknown")
    };
    success!("Signed in as {}", name);
    if let Some(email) = user.email() {
        info!("Email: {}", email);
    }
    if let Some(product) = user.product() {
        info!("Plan: {}", product);
    }
    if let Some(country) = user.country() {
        info!("Country: {}", country);
    }
    if let Some(followers) = user.followers() {
        info!("Followers: {}", followers);
    }
    Ok(())
}

pub async fn following(max_pages: Option<usize>) -> Result<()> {
    let manager = open_session().await?;
    let sdk = manager.sdk().await?;

    let pb = spinner("Fetching followed artists...");
    let artists = sdk.me().following(max_pages).await;
    pb.finish_and_clear();
    manager.save().await?;

    let mut artists = artists?;
    artists.sort_by_key(|a| a.name().unwrap_or_default().to_lowercase());

    let rows: Vec<ArtistRow> = artists
        .iter()
        .map(|a| ArtistRow {
            name: a.name().unwrap_or("-").to_string(),
            genres: a.genres().into_iter().take(3).collect::<Vec<_>>().join(","),
            followers: a.followers().map(|f| f.to_string()).unwrap_or_default(),
        })
        .collect();
    println!("{}", Table::new(rows));
    info!("{} followed artists", artists.len());
    Ok(())
}

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotify_sdk::{cli, config};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default())
        .placeholder(AnsiColor::BrightCyan.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[clap(about = "Authorize with Spotify and store the session")]
    Auth,

    #[clap(about = "List available Connect devices")]
    Devices,

    #[clap(about = "Show the current user's profile")]
    Me,

    #[clap(about = "Show what is playing")]
    Playing,

    #[clap(about = "Start or resume playback")]
    Play(PlayArgs),

    #[clap(about = "Pause playback")]
    Pause(DeviceArg),

    #[clap(about = "Skip to the next track")]
    Next(DeviceArg),

    #[clap(about = "Go back to the previous track")]
    Previous(DeviceArg),

    #[clap(about = "Set the playback volume")]
    Volume(VolumeArgs),

    #[clap(about = "List followed artists")]
    Following(FollowingArgs),

    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DeviceArg {
    /// Device name or id; defaults to the active device
    #[clap(long)]
    device: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayArgs {
    #[clap(flatten)]
    target: DeviceArg,

    /// Track or episode URI
    #[clap(long)]
    uri: Option<String>,

    /// Album, artist or playlist URI to play from
    #[clap(long)]
    context: Option<String>,

    /// Position inside the context to start at
    #[clap(long, requires = "context")]
    index: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct VolumeArgs {
    #[clap(flatten)]
    target: DeviceArg,

    #[clap(value_parser = clap::value_parser!(u8).range(0..=100))]
    percent: u8,
}

#[derive(Parser, Debug, Clone)]
pub struct FollowingArgs {
    /// Stop after this many pages of 50 artists
    #[clap(long)]
    max_pages: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    config::init_tracing();
    if let Err(e) = config::load_env().await {
        spotify_sdk::error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Auth => cli::auth().await,
        Command::Devices => cli::devices().await,
        Command::Me => cli::me().await,
        Command::Playing => cli::playing().await,
        Command::Play(args) => {
            cli::play(
                args.target.device,
                cli::PlayOptions {
                    uri: args.uri,
                    context: args.context,
                    index: args.index,
                },
            )
            .await
        }
        Command::Pause(args) => cli::pause(args.device).await,
        Command::Next(args) => cli::next(args.device).await,
        Command::Previous(args) => cli::previous(args.device).await,
        Command::Volume(args) => cli::volume(args.target.device, args.percent).await,
        Command::Following(args) => cli::following(args.max_pages).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        spotify_sdk::error!("{}", e);
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use playlist_tools::compare::print_diff;
use playlist_tools::lineup::builder::{DEFAULT_PLAYLIST_DESCRIPTION, DEFAULT_PLAYLIST_NAME};
use playlist_tools::lineup::scrape::DEFAULT_LINEUP_URL;
use playlist_tools::spotify::client::parse_market;
use playlist_tools::{
    diff_playlists, BuildOptions, Config, LineupPlaylistBuilder, LineupScraper,
    PublicSpotifyClient, SpotifyClient,
};

#[derive(Parser)]
#[command(name = "playlist-tools")]
#[command(about = "Compare Spotify playlists and build playlists from festival lineups")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tracks that appear in only one of two playlists
    Compare {
        /// First playlist (URL, spotify:playlist: URI or id)
        playlist_a: String,

        /// Second playlist (URL, spotify:playlist: URI or id)
        playlist_b: String,

        /// Print the difference as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build a playlist from the latest album of every act on a lineup page
    Lineup {
        /// Lineup page listing the acts
        #[arg(long, default_value = DEFAULT_LINEUP_URL)]
        url: String,

        /// Name of the playlist to create
        #[arg(long, default_value = DEFAULT_PLAYLIST_NAME)]
        name: String,

        /// Description of the playlist to create
        #[arg(long, default_value = DEFAULT_PLAYLIST_DESCRIPTION)]
        description: String,

        /// Country code used for album lookups
        #[arg(long, default_value = "NL", env = "SPOTIFY_MARKET")]
        market: String,

        /// Pause between artist page requests, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,

        /// Collect tracks without creating the playlist
        #[arg(long)]
        dry_run: bool,

        /// Save a JSON report to lineup_results/
        #[arg(long)]
        save_report: bool,
    },

    /// Show setup guide
    Setup,
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Compare {
            playlist_a,
            playlist_b,
            json,
        } => {
            compare(&playlist_a, &playlist_b, json).await?;
        }
        Commands::Lineup {
            url,
            name,
            description,
            market,
            delay_ms,
            dry_run,
            save_report,
        } => {
            let options = BuildOptions {
                playlist_name: name,
                description,
                market: parse_market(&market).context("Invalid --market")?,
                dry_run,
            };
            lineup(&url, Duration::from_millis(delay_ms), &options, save_report).await?;
        }
        Commands::Setup => {
            show_setup_guide();
        }
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let missing = config.get_missing_config();
    if !missing.is_empty() {
        println!("{}", "Missing configuration:".red());
        for item in &missing {
            println!("   - {}", item);
        }
        println!(
            "\n{}",
            "Run `playlist-tools setup` to see how to create a .env file.".yellow()
        );
        std::process::exit(1);
    }

    Ok(config)
}

async fn compare(playlist_a: &str, playlist_b: &str, json: bool) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    if !config.validate_spotify_config() {
        println!("{}", "Missing Spotify configuration".red());
        std::process::exit(1);
    }

    let client = PublicSpotifyClient::new(&config)
        .await
        .context("Failed to connect to Spotify")?;

    if !json {
        println!("{}", "Fetching tracks from Playlist A...".cyan());
    }
    let a_tracks = client
        .get_playlist_tracks(playlist_a)
        .await
        .context("Failed to fetch Playlist A")?;
    if !json {
        println!("Playlist A has {} tracks", a_tracks.len().to_string().green());
        println!("{}", "Fetching tracks from Playlist B...".cyan());
    }

    let b_tracks = client
        .get_playlist_tracks(playlist_b)
        .await
        .context("Failed to fetch Playlist B")?;
    if !json {
        println!("Playlist B has {} tracks", b_tracks.len().to_string().green());
    }

    let diff = diff_playlists(&a_tracks, &b_tracks);

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print_diff(&diff);
    }

    Ok(())
}

async fn lineup(
    url: &str,
    delay: Duration,
    options: &BuildOptions,
    save_report: bool,
) -> Result<()> {
    println!("{}", "Lineup Latest Albums Playlist Builder".cyan().bold());
    println!("{}", "=".repeat(50));

    if options.dry_run {
        println!(
            "{}",
            "DRY RUN MODE - No playlist will be created".yellow()
        );
    }

    let config = load_config()?;
    let scraper = LineupScraper::new(url, delay).context("Failed to set up lineup scraper")?;

    let report = if options.dry_run {
        let client = PublicSpotifyClient::new(&config)
            .await
            .context("Failed to connect to Spotify")?;
        LineupPlaylistBuilder::read_only(scraper, &client)
            .run(options)
            .await?
    } else {
        let client = SpotifyClient::new(&config)
            .await
            .context("Failed to authorize with Spotify")?;
        LineupPlaylistBuilder::new(scraper, client)
            .run(options)
            .await?
    };

    report.print_summary();

    if save_report {
        let path = report.save().context("Failed to save lineup report")?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn show_setup_guide() {
    println!("{}", "Playlist Tools Setup Guide".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}", "1. Spotify API Setup".yellow());
    println!("   - Go to https://developer.spotify.com/dashboard/");
    println!("   - Create a new app");
    println!("   - Copy your Client ID and Client Secret");
    println!("   - Add 'http://127.0.0.1:8080/callback' as a redirect URI");

    println!("\n{}", "2. Configuration".yellow());
    println!("   - Create a .env file with:");
    println!("     SPOTIFY_CLIENT_ID=your_spotify_client_id");
    println!("     SPOTIFY_CLIENT_SECRET=your_spotify_client_secret");
    println!("     SPOTIFY_REDIRECT_URI=http://127.0.0.1:8080/callback");
    println!("     SPOTIFY_USERNAME=your_spotify_username   (optional)");

    println!("\n{}", "3. Usage".yellow());
    println!("   - playlist-tools compare <PLAYLIST_A> <PLAYLIST_B>   (diff two playlists)");
    println!("   - playlist-tools lineup --dry-run                    (preview the lineup playlist)");
    println!("   - playlist-tools lineup                              (create the lineup playlist)");
    println!("   - playlist-tools lineup --save-report                (also write a JSON report)");

    println!("\n{}", "Ready to go!".green());
}

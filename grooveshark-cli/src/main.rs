use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grooveshark_api::types::{DEFAULT_COVER_ART_SIZE, SearchKinds, Song};
use grooveshark_api::{ClientConfig, DownloadStatus, GroovesharkClient, HasCoverArt};

#[derive(Parser)]
#[command(name = "grooveshark", version, about = "Grooveshark search & download CLI")]
struct Cli {
    /// Verbose logging (same as `RUST_LOG=debug`)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for songs, playlists or albums
    Search {
        /// Search keyword
        query: String,
        /// Also search albums
        #[arg(long)]
        albums: bool,
        /// Also search playlists
        #[arg(long)]
        playlists: bool,
        /// Cover art size to print URLs for
        #[arg(short, long, default_value_t = DEFAULT_COVER_ART_SIZE)]
        size: u32,
    },
    /// List a user's library
    Library {
        /// User ID
        user_id: u64,
    },
    /// List a user's favorite songs
    Favorites {
        /// User ID
        user_id: u64,
    },
    /// Print the playback URL of a song
    StreamUrl {
        /// Song ID
        song_id: u64,
    },
    /// Download a user's favorites (or library)
    Download {
        /// User ID
        user_id: u64,
        /// Download the library instead of favorites
        #[arg(long)]
        library: bool,
        /// Output directory (defaults to `download_dir` from the config)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show or initialise the config file
    Config {
        /// Write the current (or default) config to disk
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Search {
            query,
            albums,
            playlists,
            size,
        } => cmd_search(&query, albums, playlists, size),
        Command::Library { user_id } => cmd_list(user_id, true),
        Command::Favorites { user_id } => cmd_list(user_id, false),
        Command::StreamUrl { song_id } => cmd_stream_url(song_id),
        Command::Download {
            user_id,
            library,
            output,
        } => cmd_download(user_id, library, output),
        Command::Config { init } => cmd_config(init),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn connect() -> Result<GroovesharkClient> {
    GroovesharkClient::new().context("failed to start Grooveshark session")
}

fn print_song(s: &Song) {
    let artist = s.artist().map_or("?", |a| a.name.as_str());
    println!("  [{}] {} - {} ({})", s.id, artist, s.name, s.album.name);
}

// ── search ──

fn cmd_search(query: &str, albums: bool, playlists: bool, size: u32) -> Result<()> {
    grooveshark_api::types::validate_cover_art_size(size)?;
    let client = connect()?;
    let kinds = SearchKinds {
        songs: true,
        playlists,
        albums,
    };
    let result = client.search(query, kinds)?;

    println!("Songs: {}\n", result.songs.len());
    for s in &result.songs {
        print_song(s);
        if let Some(url) = s.cover_art_url(size)? {
            println!("      art: {url}");
        }
    }
    if albums {
        println!("\nAlbums: {}\n", result.albums.len());
        for a in &result.albums {
            println!("  [{}] {}", a.id, a.name);
        }
    }
    if playlists {
        println!("\nPlaylists: {}\n", result.playlists.len());
        for p in &result.playlists {
            let owner = p.user_name.as_deref().unwrap_or("?");
            println!("  [{}] {} (by {owner})", p.id, p.name);
        }
    }
    Ok(())
}

// ── library / favorites ──

fn cmd_list(user_id: u64, library: bool) -> Result<()> {
    let client = connect()?;
    let songs = if library {
        client.library(user_id)?
    } else {
        client.favorites(user_id)?
    };
    println!("Songs: {}\n", songs.len());
    for s in &songs {
        print_song(s);
    }
    Ok(())
}

// ── stream-url / download ──

fn cmd_stream_url(song_id: u64) -> Result<()> {
    let client = connect()?;
    println!("{}", client.stream_url(song_id)?);
    Ok(())
}

fn cmd_download(user_id: u64, library: bool, output: Option<PathBuf>) -> Result<()> {
    let client = connect()?;
    let songs = if library {
        client.library(user_id)?
    } else {
        client.favorites(user_id)?
    };
    let dir = output.unwrap_or_else(|| client.config().download_dir.clone());

    let reports = client.download_songs(&songs, &dir)?;
    let (mut done, mut skipped, mut failed) = (0, 0, 0);
    for r in &reports {
        match &r.status {
            DownloadStatus::Downloaded { .. } => done += 1,
            DownloadStatus::Skipped => skipped += 1,
            DownloadStatus::Failed(e) => {
                failed += 1;
                eprintln!("error: {}: {e}", r.path.display());
            }
        }
    }
    println!(
        "{done} downloaded, {skipped} skipped, {failed} failed -> {}",
        dir.display()
    );
    Ok(())
}

// ── config ──

fn cmd_config(init: bool) -> Result<()> {
    let config = ClientConfig::load()?;
    if init {
        let path = config.save()?;
        println!("Config written to {}", path.display());
    } else {
        println!("{config:#?}");
    }
    Ok(())
}

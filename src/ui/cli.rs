//! Command-line interface implementation

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::error::Error;
use std::io::{self, Write};

use crate::nefarious::{Genre, SessionState, WatchMovie, WatchTVShow};

/// Command-line arguments for r-watchcli
#[derive(Parser, Debug)]
#[command(author, version, about = "Rust watchlist CLI client", long_about = None)]
pub struct Args {
    /// Watchlist server URL
    #[arg(short, long, env = "WATCHLIST_SERVER_URL")]
    pub server_url: Option<String>,

    /// Config file path
    #[arg(short, long, env = "WATCHCLI_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and persist the session token
    Login {
        #[arg(short, long, env = "WATCHLIST_USERNAME")]
        username: Option<String>,
        #[arg(short, long, env = "WATCHLIST_PASSWORD")]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show session status and cached collection counts
    Status,
    /// List watched TV shows
    Shows,
    /// List watched movies
    Movies,
    /// Search the media catalog
    Search {
        query: String,
        #[arg(short, long, default_value = "movie")]
        media_type: String,
    },
    /// Search torrents for a title
    SearchTorrents {
        query: String,
        #[arg(short, long, default_value = "movie")]
        media_type: String,
    },
    /// Queue a torrent for download
    Download {
        torrent: String,
        #[arg(short, long, default_value = "movie")]
        media_type: String,
    },
    /// Track a movie (creates or updates its watch record)
    WatchMovie {
        tmdb_movie_id: i64,
        name: String,
        #[arg(long, default_value = "")]
        poster_image_url: String,
        #[arg(long)]
        quality_profile: Option<String>,
    },
    /// Track a TV show
    WatchShow {
        tmdb_show_id: i64,
        name: String,
        #[arg(long, default_value = "")]
        poster_image_url: String,
    },
    /// Track an entire season of a watched show
    WatchSeason {
        watch_show_id: i64,
        season_number: i64,
    },
    /// Track a single episode of a watched show
    WatchEpisode {
        watch_show_id: i64,
        tmdb_episode_id: i64,
        season_number: i64,
        episode_number: i64,
    },
    /// Stop tracking a movie watch record
    UnwatchMovie { id: i64 },
    /// Stop tracking a show (drops its seasons and episodes too)
    UnwatchShow { id: i64 },
    /// Stop tracking a season
    UnwatchSeason { id: i64 },
    /// Stop tracking an episode
    UnwatchEpisode { id: i64 },
    /// Discover media from the catalog
    Discover {
        #[arg(short, long, default_value = "movie")]
        media_type: String,
    },
    /// List catalog genres
    Genres {
        #[arg(short, long, default_value = "movie")]
        media_type: String,
    },
    /// Show status of currently downloading torrents
    Torrents,
}

/// CLI user interface for interacting with the application
pub struct Cli {
    pub args: Args,
}

impl Cli {
    /// Create a new CLI instance from process arguments
    pub fn new() -> Self {
        Cli {
            args: Args::parse(),
        }
    }

    /// Display session status and cached collection counts
    pub fn display_status(&self, state: &SessionState) {
        match &state.user {
            Some(user) => {
                println!(
                    "Logged in as {} (id {}){}",
                    user.username,
                    user.id,
                    if user.is_staff { " [staff]" } else { "" }
                );
            }
            None => println!("Not logged in"),
        }
        println!("Cached collections:");
        println!("  shows:    {}", state.watch_tv_shows.len());
        println!("  seasons:  {}", state.watch_tv_seasons.len());
        println!("  episodes: {}", state.watch_tv_episodes.len());
        println!("  movies:   {}", state.watch_movies.len());
        if !state.quality_profiles.is_empty() {
            println!("Quality profiles: {}", state.quality_profiles.join(", "));
        }
    }

    /// Display the watched TV show list
    pub fn display_watch_shows(&self, shows: &[WatchTVShow]) {
        println!("\nWatched TV Shows:");
        println!("{:<8} {:<12} {}", "ID", "TMDB", "Name");
        println!("{}", "-".repeat(60));
        for show in shows {
            println!("{:<8} {:<12} {}", show.id, show.tmdb_show_id, show.name);
        }
        println!();
    }

    /// Display the watched movie list
    pub fn display_watch_movies(&self, movies: &[WatchMovie]) {
        println!("\nWatched Movies:");
        println!("{:<8} {:<12} {:<30} {}", "ID", "TMDB", "Name", "Quality");
        println!("{}", "-".repeat(70));
        for movie in movies {
            let name = if movie.name.len() > 28 {
                format!("{:.25}...", movie.name)
            } else {
                movie.name.clone()
            };
            println!(
                "{:<8} {:<12} {:<30} {}",
                movie.id,
                movie.tmdb_movie_id,
                name,
                movie.quality_profile_custom.as_deref().unwrap_or("-")
            );
        }
        println!();
    }

    pub fn display_genres(&self, genres: &[Genre]) {
        for genre in genres {
            println!("{:<8} {}", genre.id, genre.name);
        }
    }

    /// Pretty-print a raw JSON payload (search results, torrent status, ...)
    pub fn display_json(&self, value: &Value) {
        match serde_json::to_string_pretty(value) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{}", value),
        }
    }

    /// Get username and password interactively if needed
    pub fn get_credentials(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(String, String), Box<dyn Error>> {
        let username = match username {
            Some(u) => u.to_string(),
            None => {
                print!("Enter username: ");
                io::stdout().flush()?;
                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                input.trim().to_string()
            }
        };

        let password = match password {
            Some(p) => p.to_string(),
            None => {
                print!("Enter password: ");
                io::stdout().flush()?;
                let mut input = String::new();
                io::stdin().read_line(&mut input)?;
                input.trim().to_string()
            }
        };

        Ok((username, password))
    }

    /// Display error messages
    pub fn display_error(&self, error: &dyn Error) {
        eprintln!("Error: {}", error);
    }
}

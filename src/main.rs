use r_watchcli::config::Settings;
use r_watchcli::init_app_dirs;
use r_watchcli::nefarious::{InitState, MediaType, NefariousClient, SessionStore};
use r_watchcli::ui::{Cli, Command};
use std::error::Error;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::new();
    let args = &cli.args;

    init_app_dirs()?;

    let config_path = match &args.config {
        Some(path) => Path::new(path).to_path_buf(),
        None => Settings::default_path(),
    };
    let mut settings = Settings::load(&config_path)?;

    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    settings.validate()?;

    let store = match &settings.data_dir {
        Some(dir) => SessionStore::new(dir.clone()),
        None => SessionStore::default(),
    };
    let client = NefariousClient::new(&settings.server_url).with_store(store);

    // Login and logout work without a restored session.
    match &args.command {
        Command::Login { username, password } => {
            let (username, password) = cli.get_credentials(
                username.as_deref().or(settings.username.as_deref()),
                password.as_deref(),
            )?;
            client.login(&username, &password).await?;
            match client.fetch_user().await? {
                Some(user) => println!("Logged in as {}", user.username),
                None => println!("Logged in (no user record returned)"),
            }
            return Ok(());
        }
        Command::Logout => {
            client.logout();
            println!("Session cleared");
            return Ok(());
        }
        _ => {}
    }

    if client.init().await? != InitState::Ready {
        return Err("not logged in; run `r-watchcli login` first".into());
    }

    match &args.command {
        Command::Login { .. } | Command::Logout => unreachable!(),
        Command::Status => cli.display_status(&client.state()),
        Command::Shows => cli.display_watch_shows(&client.state().watch_tv_shows),
        Command::Movies => cli.display_watch_movies(&client.state().watch_movies),
        Command::Search { query, media_type } => {
            let results = client
                .search_media(query, media_type.parse::<MediaType>()?)
                .await?;
            cli.display_json(&results);
        }
        Command::SearchTorrents { query, media_type } => {
            let results = client
                .search_torrents(query, media_type.parse::<MediaType>()?)
                .await?;
            cli.display_json(&results);
        }
        Command::Download { torrent, media_type } => {
            let result = client
                .download_torrent(torrent, media_type.parse::<MediaType>()?)
                .await?;
            cli.display_json(&result);
        }
        Command::WatchMovie {
            tmdb_movie_id,
            name,
            poster_image_url,
            quality_profile,
        } => {
            let record = client
                .watch_movie(*tmdb_movie_id, name, poster_image_url, quality_profile.as_deref())
                .await?;
            println!("Watching movie '{}' (watch id {})", record.name, record.id);
        }
        Command::WatchShow {
            tmdb_show_id,
            name,
            poster_image_url,
        } => {
            let record = client
                .watch_tv_show(*tmdb_show_id, name, poster_image_url)
                .await?;
            println!("Watching show '{}' (watch id {})", record.name, record.id);
        }
        Command::WatchSeason {
            watch_show_id,
            season_number,
        } => {
            let record = client.watch_tv_season(*watch_show_id, *season_number).await?;
            println!(
                "Watching season {} (watch id {})",
                record.season_number, record.id
            );
        }
        Command::WatchEpisode {
            watch_show_id,
            tmdb_episode_id,
            season_number,
            episode_number,
        } => {
            let record = client
                .watch_tv_episode(*watch_show_id, *tmdb_episode_id, *season_number, *episode_number)
                .await?;
            println!(
                "Watching episode S{:02}E{:02} (watch id {})",
                record.season_number, record.episode_number, record.id
            );
        }
        Command::UnwatchMovie { id } => {
            client.unwatch_movie(*id).await?;
            println!("Removed movie watch {}", id);
        }
        Command::UnwatchShow { id } => {
            client.unwatch_tv_show(*id).await?;
            println!("Removed show watch {} and its seasons/episodes", id);
        }
        Command::UnwatchSeason { id } => {
            client.unwatch_tv_season(*id).await?;
            println!("Removed season watch {}", id);
        }
        Command::UnwatchEpisode { id } => {
            client.unwatch_tv_episode(*id).await?;
            println!("Removed episode watch {}", id);
        }
        Command::Discover { media_type } => {
            let results = match media_type.parse::<MediaType>()? {
                MediaType::Movie => client.discover_movies(&[]).await?,
                MediaType::Tv => client.discover_tv(&[]).await?,
            };
            cli.display_json(&results);
        }
        Command::Genres { media_type } => {
            let genres = match media_type.parse::<MediaType>()? {
                MediaType::Movie => client.fetch_movie_genres().await?,
                MediaType::Tv => client.fetch_tv_genres().await?,
            };
            cli.display_genres(&genres);
        }
        Command::Torrents => {
            let torrents = client.fetch_current_torrents(&[]).await?;
            cli.display_json(&torrents);
        }
    }

    Ok(())
}

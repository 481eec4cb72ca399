//! Data models for watchlist server API responses

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Media type discriminator used by the search, discover and genre endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(format!("unknown media type '{}' (expected 'movie' or 'tv')", other)),
        }
    }
}

/// A server-side user account. The current user plus, for staff, the full
/// user list. Unknown server fields are preserved in `extra`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from the token auth endpoint
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Debug)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
}

/// Server-owned settings row. The server returns at most one of these as a
/// list; only the id is interpreted client-side, everything else rides along.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub id: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Quality profile names, fetched as a flat list
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct QualityProfilesResponse {
    #[serde(default)]
    pub profiles: Option<Vec<String>>,
}

/// Watch record for an entire TV show
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WatchTVShow {
    pub id: i64,
    pub tmdb_show_id: i64,
    pub name: String,
    #[serde(default)]
    pub poster_image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Watch record for a whole season, parented by a show watch record
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WatchTVSeason {
    pub id: i64,
    pub watch_tv_show: i64,
    pub season_number: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Watch record for a single episode, parented by a show watch record
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WatchTVEpisode {
    pub id: i64,
    pub watch_tv_show: i64,
    #[serde(default)]
    pub tmdb_episode_id: Option<i64>,
    pub season_number: i64,
    pub episode_number: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Watch record for a movie, upsert-keyed by its TMDB id
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WatchMovie {
    pub id: i64,
    pub tmdb_movie_id: i64,
    pub name: String,
    #[serde(default)]
    pub poster_image_url: Option<String>,
    #[serde(default)]
    pub quality_profile_custom: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Debug)]
pub struct WatchTVShowRequest {
    pub tmdb_show_id: i64,
    pub name: String,
    pub poster_image_url: String,
}

#[derive(Serialize, Debug)]
pub struct WatchTVSeasonRequest {
    pub watch_tv_show: i64,
    pub season_number: i64,
}

#[derive(Serialize, Debug)]
pub struct WatchTVEpisodeRequest {
    pub watch_tv_show: i64,
    pub tmdb_episode_id: i64,
    pub season_number: i64,
    pub episode_number: i64,
}

#[derive(Serialize, Debug)]
pub struct WatchMovieRequest {
    pub tmdb_movie_id: i64,
    pub name: String,
    pub poster_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_profile_custom: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct DownloadTorrentRequest {
    pub torrent: String,
    pub media_type: String,
}

/// A TMDB genre entry
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GenresResponse {
    pub genres: Vec<Genre>,
}

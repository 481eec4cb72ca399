//! Watchlist server API client implementation
//!
//! One typed method per REST endpoint. Mutating calls replay their effect
//! into the in-memory [`SessionState`] after the response completes, so
//! callers get synchronous read access to the last-known server collections.

use reqwest::{Client, Error as ReqwestError, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, error, info, warn};

use crate::nefarious::auth;
use crate::nefarious::models::{
    CreateUserRequest, DownloadTorrentRequest, Genre, GenresResponse, MediaType,
    QualityProfilesResponse, ServerSettings, TokenResponse, User, WatchMovie, WatchMovieRequest,
    WatchTVEpisode, WatchTVEpisodeRequest, WatchTVSeason, WatchTVSeasonRequest, WatchTVShow,
    WatchTVShowRequest,
};
use crate::nefarious::state::SessionState;
use crate::nefarious::storage::SessionStore;

pub(crate) const API_URL_LOGIN: &str = "/api/auth/";
const API_URL_USER: &str = "/api/user/";
const API_URL_USERS: &str = "/api/users/";
const API_URL_SETTINGS: &str = "/api/settings/";
const API_URL_JACKETT_INDEXERS_CONFIGURED: &str = "/api/settings/configured-indexers/";
const API_URL_SEARCH_TORRENTS: &str = "/api/search/torrents/";
const API_URL_DOWNLOAD_TORRENTS: &str = "/api/download/torrents/";
const API_URL_SEARCH_MEDIA: &str = "/api/search/media/";
const API_URL_SEARCH_SIMILAR_MEDIA: &str = "/api/search/similar/media/";
const API_URL_WATCH_TV_SHOW: &str = "/api/watch-tv-show/";
const API_URL_WATCH_TV_SEASON: &str = "/api/watch-tv-season/";
const API_URL_WATCH_TV_EPISODE: &str = "/api/watch-tv-episode/";
const API_URL_WATCH_MOVIE: &str = "/api/watch-movie/";
const API_URL_CURRENT_TORRENTS: &str = "/api/current/torrents/";
const API_URL_DISCOVER_MEDIA: &str = "/api/discover/media/";
const API_URL_GENRES: &str = "/api/genres/";
const API_URL_QUALITY_PROFILES: &str = "/api/quality-profiles/";

/// Client for the watchlist server REST API
#[derive(Debug, Clone)]
pub struct NefariousClient {
    client: Client,
    server_url: String,
    state: Arc<RwLock<SessionState>>,
    store: SessionStore,
}

/// Outcome of the startup sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// No usable session: nothing restored, or the restored token was rejected
    Unauthenticated,
    /// Token validated and all core collections fetched
    Ready,
}

/// Error types for watchlist API operations
#[derive(Debug)]
pub enum ClientError {
    Network(ReqwestError),
    /// The server rejected the session token (HTTP 401)
    Unauthorized(String),
    /// Any other non-success HTTP status, passed through unmodified
    Api { status: StatusCode, body: String },
    InvalidResponse(String),
    /// A call that needs cached context (e.g. a settings id) was made without it
    State(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(e) => write!(f, "Network error: {}", e),
            ClientError::Unauthorized(body) => write!(f, "Unauthorized: {}", body),
            ClientError::Api { status, body } => {
                write!(f, "Request failed with status {}: {}", status, body)
            }
            ClientError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ClientError::State(msg) => write!(f, "Client state error: {}", msg),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClientError::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ReqwestError> for ClientError {
    fn from(err: ReqwestError) -> Self {
        ClientError::Network(err)
    }
}

/// Handles response status checking and JSON deserialization.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        let text = response.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            error!("failed to decode response body: {}", e);
            ClientError::InvalidResponse(format!("failed to decode response body: {}", e))
        })
    } else {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "failed to read error body".to_string());
        error!("request failed, status {}: {}", status, body);
        match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(body)),
            _ => Err(ClientError::Api { status, body }),
        }
    }
}

impl NefariousClient {
    /// Create a new client for the given server URL, persisting the session
    /// under the default store directory.
    pub fn new(server_url: &str) -> Self {
        debug!("creating NefariousClient for {}", server_url);

        let client = match Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!("failed to build HTTP client with timeout ({}), using default", e);
                Client::new()
            }
        };

        NefariousClient {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
            state: Arc::new(RwLock::new(SessionState::default())),
            store: SessionStore::default(),
        }
    }

    /// Use a different session store, e.g. a temp directory in tests.
    pub fn with_store(mut self, store: SessionStore) -> Self {
        self.store = store;
        self
    }

    /// Seed the in-memory token, bypassing storage.
    pub fn with_token(self, token: &str) -> Self {
        self.state.write().unwrap().token = Some(token.to_string());
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Cloned snapshot of the in-memory session state.
    pub fn state(&self) -> SessionState {
        self.state.read().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().unwrap().user.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.read().unwrap().is_logged_in()
    }

    pub fn user_is_staff(&self) -> bool {
        self.state.read().unwrap().user_is_staff()
    }

    // --- Startup sequence ---

    /// Restore a persisted session and bring the client to a ready state.
    ///
    /// A restored token that the server answers with 401 is discarded from
    /// memory (the persisted copy is left alone) and the client ends up
    /// unauthenticated without an error. Any other failure is propagated and
    /// leaves the credentials in place.
    pub async fn init(&self) -> Result<InitState, ClientError> {
        let restored_user = self.restore_session();
        if !restored_user {
            info!("not logged in");
            return Ok(InitState::Unauthenticated);
        }

        info!("restored persisted session, validating token");
        match self.fetch_user().await {
            Ok(_) => {
                debug!("token valid, fetching core data");
                self.fetch_core_data().await?;
                Ok(InitState::Ready)
            }
            Err(ClientError::Unauthorized(_)) => {
                warn!("unauthorized, discarding restored user and token");
                self.state.write().unwrap().clear_session();
                Ok(InitState::Unauthenticated)
            }
            Err(e) => Err(e),
        }
    }

    /// Load token and user from the session store into memory. Returns
    /// whether a user record was restored.
    fn restore_session(&self) -> bool {
        let token = self.store.load_token();
        let user = self.store.load_user();
        let mut state = self.state.write().unwrap();
        state.token = token;
        state.user = user;
        state.user.is_some()
    }

    /// Fan-out fetch of every core collection. All six requests must succeed;
    /// each touches a disjoint cache field so no ordering is required.
    pub async fn fetch_core_data(&self) -> Result<(), ClientError> {
        tokio::try_join!(
            self.fetch_settings(),
            self.fetch_watch_tv_shows(None),
            self.fetch_watch_tv_seasons(None),
            self.fetch_watch_tv_episodes(),
            self.fetch_watch_movies(None),
            self.fetch_quality_profiles(),
        )?;
        Ok(())
    }

    // --- Session ---

    /// Log in and store the returned token in memory and on disk. Does not
    /// fetch the user record; callers wanting one must call
    /// [`fetch_user`](Self::fetch_user) afterwards.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let response = auth::login(&self.client, &self.server_url, username, password).await?;
        info!("login successful, storing token");
        self.state.write().unwrap().token = Some(response.token.clone());
        self.store.save_token(&response.token);
        Ok(response)
    }

    /// Drop the session from memory and delete the persisted copies.
    pub fn logout(&self) {
        info!("logging out");
        self.state.write().unwrap().clear_session();
        self.store.clear();
    }

    // --- Users ---

    /// Fetch the current user. The endpoint returns a list; element 0 is the
    /// user, an empty list leaves the cached user untouched.
    pub async fn fetch_user(&self) -> Result<Option<User>, ClientError> {
        let users: Vec<User> = self.get_json(API_URL_USER, None).await?;
        match users.into_iter().next() {
            Some(user) => {
                self.store.save_user(&user);
                self.state.write().unwrap().user = Some(user.clone());
                Ok(Some(user))
            }
            None => {
                debug!("server returned no current user");
                Ok(None)
            }
        }
    }

    /// Fetch all users (staff only), replacing the cached list.
    pub async fn fetch_users(&self) -> Result<Vec<User>, ClientError> {
        let users: Vec<User> = self.get_json(API_URL_USERS, None).await?;
        self.state.write().unwrap().users = users.clone();
        Ok(users)
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, ClientError> {
        let params = CreateUserRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let user: User = self.post_json(API_URL_USERS, &params).await?;
        self.state.write().unwrap().users.push(user.clone());
        Ok(user)
    }

    pub async fn update_user(&self, id: i64, params: &Value) -> Result<User, ClientError> {
        self.put_json(&format!("{}{}/", API_URL_USERS, id), params)
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{}{}/", API_URL_USERS, id)).await?;
        self.state.write().unwrap().remove_user(id);
        Ok(())
    }

    // --- Settings ---

    /// Fetch the settings row. The server returns at most one; an empty list
    /// keeps whatever was cached before.
    pub async fn fetch_settings(&self) -> Result<Option<ServerSettings>, ClientError> {
        let rows: Vec<ServerSettings> = self.get_json(API_URL_SETTINGS, None).await?;
        let mut state = self.state.write().unwrap();
        match rows.into_iter().next() {
            Some(settings) => state.settings = Some(settings),
            None => debug!("server returned no settings row, keeping cached value"),
        }
        Ok(state.settings.clone())
    }

    pub async fn create_settings(&self, params: &Value) -> Result<ServerSettings, ClientError> {
        let settings: ServerSettings = self.post_json(API_URL_SETTINGS, params).await?;
        self.state.write().unwrap().settings = Some(settings.clone());
        Ok(settings)
    }

    pub async fn update_settings(&self, id: i64, params: &Value) -> Result<ServerSettings, ClientError> {
        let settings: ServerSettings = self
            .patch_json(&format!("{}{}/", API_URL_SETTINGS, id), params)
            .await?;
        self.state.write().unwrap().settings = Some(settings.clone());
        Ok(settings)
    }

    /// Ask the server to verify the cached settings row.
    pub async fn verify_settings(&self) -> Result<Value, ClientError> {
        let id = self.settings_id()?;
        self.get_json(&format!("{}{}/verify/", API_URL_SETTINGS, id), None)
            .await
    }

    pub async fn fetch_jackett_indexers(&self) -> Result<Value, ClientError> {
        self.get_json(API_URL_JACKETT_INDEXERS_CONFIGURED, None).await
    }

    pub async fn verify_jackett_indexers(&self) -> Result<Value, ClientError> {
        let id = self.settings_id()?;
        self.get_json(
            &format!("{}{}/verify-jackett-indexers/", API_URL_SETTINGS, id),
            None,
        )
        .await
    }

    fn settings_id(&self) -> Result<i64, ClientError> {
        self.state
            .read()
            .unwrap()
            .settings
            .as_ref()
            .map(|s| s.id)
            .ok_or_else(|| ClientError::State("settings not loaded".to_string()))
    }

    // --- Search / discovery ---

    pub async fn search_torrents(&self, query: &str, media_type: MediaType) -> Result<Value, ClientError> {
        let params = [("q", query), ("media_type", media_type.as_str())];
        self.get_json(API_URL_SEARCH_TORRENTS, Some(&params)).await
    }

    /// Ask the server to start downloading a torrent (magnet or URL).
    pub async fn download_torrent(&self, torrent: &str, media_type: MediaType) -> Result<Value, ClientError> {
        let params = DownloadTorrentRequest {
            torrent: torrent.to_string(),
            media_type: media_type.as_str().to_string(),
        };
        self.post_json(API_URL_DOWNLOAD_TORRENTS, &params).await
    }

    pub async fn search_media(&self, query: &str, media_type: MediaType) -> Result<Value, ClientError> {
        let params = [("q", query), ("media_type", media_type.as_str())];
        self.get_json(API_URL_SEARCH_MEDIA, Some(&params)).await
    }

    pub async fn search_media_detail(&self, media_type: MediaType, id: i64) -> Result<Value, ClientError> {
        self.get_json(&format!("{}{}/{}/", API_URL_SEARCH_MEDIA, media_type, id), None)
            .await
    }

    pub async fn fetch_media_videos(&self, media_type: MediaType, id: i64) -> Result<Value, ClientError> {
        self.get_json(
            &format!("{}{}/{}/videos/", API_URL_SEARCH_MEDIA, media_type, id),
            None,
        )
        .await
    }

    pub async fn search_similar_media(&self, tmdb_media_id: i64, media_type: MediaType) -> Result<Value, ClientError> {
        let id = tmdb_media_id.to_string();
        let params = [("tmdb_media_id", id.as_str()), ("media_type", media_type.as_str())];
        self.get_json(API_URL_SEARCH_SIMILAR_MEDIA, Some(&params)).await
    }

    pub async fn discover_movies(&self, params: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.discover_media(MediaType::Movie, params).await
    }

    pub async fn discover_tv(&self, params: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.discover_media(MediaType::Tv, params).await
    }

    async fn discover_media(&self, media_type: MediaType, params: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.get_json(&format!("{}{}/", API_URL_DISCOVER_MEDIA, media_type), Some(params))
            .await
    }

    pub async fn fetch_movie_genres(&self) -> Result<Vec<Genre>, ClientError> {
        self.fetch_genres(MediaType::Movie).await
    }

    pub async fn fetch_tv_genres(&self) -> Result<Vec<Genre>, ClientError> {
        self.fetch_genres(MediaType::Tv).await
    }

    async fn fetch_genres(&self, media_type: MediaType) -> Result<Vec<Genre>, ClientError> {
        let response: GenresResponse = self
            .get_json(&format!("{}{}/", API_URL_GENRES, media_type), None)
            .await?;
        Ok(response.genres)
    }

    /// Fetch quality profile names, replacing the cache when the server
    /// returns any. An absent list keeps the previous value.
    pub async fn fetch_quality_profiles(&self) -> Result<Vec<String>, ClientError> {
        let response: QualityProfilesResponse =
            self.get_json(API_URL_QUALITY_PROFILES, None).await?;
        let mut state = self.state.write().unwrap();
        match response.profiles {
            Some(profiles) => state.quality_profiles = profiles,
            None => error!("server returned no quality profiles, keeping cached value"),
        }
        Ok(state.quality_profiles.clone())
    }

    // --- Watch collections ---

    pub async fn fetch_watch_tv_shows(&self, params: Option<&[(&str, &str)]>) -> Result<Vec<WatchTVShow>, ClientError> {
        let shows: Vec<WatchTVShow> = self.get_json(API_URL_WATCH_TV_SHOW, params).await?;
        self.state.write().unwrap().watch_tv_shows = shows.clone();
        Ok(shows)
    }

    pub async fn fetch_watch_tv_seasons(&self, params: Option<&[(&str, &str)]>) -> Result<Vec<WatchTVSeason>, ClientError> {
        let seasons: Vec<WatchTVSeason> = self.get_json(API_URL_WATCH_TV_SEASON, params).await?;
        self.state.write().unwrap().watch_tv_seasons = seasons.clone();
        Ok(seasons)
    }

    pub async fn fetch_watch_tv_episodes(&self) -> Result<Vec<WatchTVEpisode>, ClientError> {
        let episodes: Vec<WatchTVEpisode> = self.get_json(API_URL_WATCH_TV_EPISODE, None).await?;
        self.state.write().unwrap().watch_tv_episodes = episodes.clone();
        Ok(episodes)
    }

    pub async fn fetch_watch_movies(&self, params: Option<&[(&str, &str)]>) -> Result<Vec<WatchMovie>, ClientError> {
        let movies: Vec<WatchMovie> = self.get_json(API_URL_WATCH_MOVIE, params).await?;
        self.state.write().unwrap().watch_movies = movies.clone();
        Ok(movies)
    }

    /// Refresh a single movie watch record, merging it into the cache by id.
    pub async fn fetch_watch_movie(&self, id: i64) -> Result<WatchMovie, ClientError> {
        let record: WatchMovie = self
            .get_json(&format!("{}{}/", API_URL_WATCH_MOVIE, id), None)
            .await?;
        self.state.write().unwrap().merge_watch_movie(&record);
        Ok(record)
    }

    pub async fn fetch_watch_tv_season(&self, id: i64) -> Result<WatchTVSeason, ClientError> {
        let record: WatchTVSeason = self
            .get_json(&format!("{}{}/", API_URL_WATCH_TV_SEASON, id), None)
            .await?;
        self.state.write().unwrap().merge_watch_tv_season(&record);
        Ok(record)
    }

    pub async fn fetch_watch_tv_episode(&self, id: i64) -> Result<WatchTVEpisode, ClientError> {
        let record: WatchTVEpisode = self
            .get_json(&format!("{}{}/", API_URL_WATCH_TV_EPISODE, id), None)
            .await?;
        self.state.write().unwrap().merge_watch_tv_episode(&record);
        Ok(record)
    }

    /// Torrent status for in-flight watch records.
    pub async fn fetch_current_torrents(&self, params: &[(&str, &str)]) -> Result<Value, ClientError> {
        self.get_json(API_URL_CURRENT_TORRENTS, Some(params)).await
    }

    // --- Watch mutations ---

    pub async fn watch_tv_show(&self, tmdb_show_id: i64, name: &str, poster_image_url: &str) -> Result<WatchTVShow, ClientError> {
        let params = WatchTVShowRequest {
            tmdb_show_id,
            name: name.to_string(),
            poster_image_url: poster_image_url.to_string(),
        };
        let record: WatchTVShow = self.post_json(API_URL_WATCH_TV_SHOW, &params).await?;
        self.state.write().unwrap().watch_tv_shows.push(record.clone());
        Ok(record)
    }

    pub async fn watch_tv_season(&self, watch_show_id: i64, season_number: i64) -> Result<WatchTVSeason, ClientError> {
        let params = WatchTVSeasonRequest {
            watch_tv_show: watch_show_id,
            season_number,
        };
        let record: WatchTVSeason = self
            .post_json(
                &format!("{}{}/entire-season/", API_URL_WATCH_TV_SHOW, watch_show_id),
                &params,
            )
            .await?;
        self.state.write().unwrap().watch_tv_seasons.push(record.clone());
        Ok(record)
    }

    pub async fn watch_tv_episode(
        &self,
        watch_show_id: i64,
        tmdb_episode_id: i64,
        season_number: i64,
        episode_number: i64,
    ) -> Result<WatchTVEpisode, ClientError> {
        let params = WatchTVEpisodeRequest {
            watch_tv_show: watch_show_id,
            tmdb_episode_id,
            season_number,
            episode_number,
        };
        let record: WatchTVEpisode = self.post_json(API_URL_WATCH_TV_EPISODE, &params).await?;
        self.state.write().unwrap().watch_tv_episodes.push(record.clone());
        Ok(record)
    }

    /// Create-or-update a movie watch record. When a cached record already
    /// carries this TMDB id the server record is patched and merged in place,
    /// otherwise a new record is created and appended.
    pub async fn watch_movie(
        &self,
        tmdb_movie_id: i64,
        name: &str,
        poster_image_url: &str,
        quality_profile_custom: Option<&str>,
    ) -> Result<WatchMovie, ClientError> {
        let params = WatchMovieRequest {
            tmdb_movie_id,
            name: name.to_string(),
            poster_image_url: poster_image_url.to_string(),
            quality_profile_custom: quality_profile_custom.map(|s| s.to_string()),
        };

        let existing_id = self
            .state
            .read()
            .unwrap()
            .find_watch_movie_by_tmdb_id(tmdb_movie_id)
            .map(|w| w.id);

        let record: WatchMovie = match existing_id {
            Some(id) => {
                self.patch_json(&format!("{}{}/", API_URL_WATCH_MOVIE, id), &params)
                    .await?
            }
            None => self.post_json(API_URL_WATCH_MOVIE, &params).await?,
        };

        let mut state = self.state.write().unwrap();
        if existing_id.is_some() {
            state.merge_watch_movie(&record);
        } else {
            state.watch_movies.push(record.clone());
        }
        Ok(record)
    }

    /// Stop watching a show. Cascades: the server deletes the dependent
    /// season and episode records, so the cache drops them too.
    pub async fn unwatch_tv_show(&self, watch_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{}{}/", API_URL_WATCH_TV_SHOW, watch_id))
            .await?;
        self.state
            .write()
            .unwrap()
            .remove_watch_tv_show_cascade(watch_id);
        Ok(())
    }

    pub async fn unwatch_tv_season(&self, watch_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{}{}/", API_URL_WATCH_TV_SEASON, watch_id))
            .await?;
        self.state.write().unwrap().remove_watch_tv_season(watch_id);
        Ok(())
    }

    pub async fn unwatch_tv_episode(&self, watch_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{}{}/", API_URL_WATCH_TV_EPISODE, watch_id))
            .await?;
        self.state.write().unwrap().remove_watch_tv_episode(watch_id);
        Ok(())
    }

    pub async fn unwatch_movie(&self, watch_id: i64) -> Result<(), ClientError> {
        self.delete(&format!("{}{}/", API_URL_WATCH_MOVIE, watch_id))
            .await?;
        self.state.write().unwrap().remove_watch_movie(watch_id);
        Ok(())
    }

    /// Blacklist the current torrent for a movie watch and retry, merging the
    /// returned record back into the cache.
    pub async fn blacklist_retry_movie(&self, watch_id: i64) -> Result<WatchMovie, ClientError> {
        let record: WatchMovie = self
            .post_empty(&format!("{}{}/blacklist-auto-retry/", API_URL_WATCH_MOVIE, watch_id))
            .await?;
        self.state.write().unwrap().merge_watch_movie(&record);
        Ok(record)
    }

    pub async fn blacklist_retry_tv_season(&self, watch_id: i64) -> Result<WatchTVSeason, ClientError> {
        let record: WatchTVSeason = self
            .post_empty(&format!(
                "{}{}/blacklist-auto-retry/",
                API_URL_WATCH_TV_SEASON, watch_id
            ))
            .await?;
        self.state.write().unwrap().merge_watch_tv_season(&record);
        Ok(record)
    }

    pub async fn blacklist_retry_tv_episode(&self, watch_id: i64) -> Result<WatchTVEpisode, ClientError> {
        let record: WatchTVEpisode = self
            .post_empty(&format!(
                "{}{}/blacklist-auto-retry/",
                API_URL_WATCH_TV_EPISODE, watch_id
            ))
            .await?;
        self.state.write().unwrap().merge_watch_tv_episode(&record);
        Ok(record)
    }

    // --- Private request helpers ---

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// `Authorization: Token <token>` for every authenticated request. When
    /// no token is set the header is still sent with an empty value; the
    /// server is responsible for rejecting it.
    fn auth_header_value(&self) -> String {
        let token = self
            .state
            .read()
            .unwrap()
            .token
            .clone()
            .unwrap_or_default();
        format!("Token {}", token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header_value());
        if let Some(params) = query_params {
            request = request.query(params);
        }

        handle_response(request.send().await?).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header_value())
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.build_url(path);
        debug!("POST {} (empty body)", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header_value())
            .send()
            .await?;
        handle_response(response).await
    }

    async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        debug!("PATCH {}", url);

        let response = self
            .client
            .patch(&url)
            .header("Authorization", self.auth_header_value())
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header_value())
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", self.auth_header_value())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            error!("DELETE failed, status {}: {}", status, body);
            match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized(body)),
                _ => Err(ClientError::Api { status, body }),
            }
        }
    }
}

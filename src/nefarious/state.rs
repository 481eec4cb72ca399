//! In-memory session state: the client-side mirror of server collections.
//!
//! The client owns one of these behind a lock and is the only writer. Cached
//! collections reflect the last successful response plus locally replayed
//! mutations; mutations from other clients are not observed until the next
//! full refetch.

use tracing::debug;

use crate::nefarious::models::{
    ServerSettings, User, WatchMovie, WatchTVEpisode, WatchTVSeason, WatchTVShow,
};

/// Session token, current user and the mirrored server collections.
#[derive(Debug, Default, Clone)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
    /// Full user list, staff only
    pub users: Vec<User>,
    pub settings: Option<ServerSettings>,
    pub quality_profiles: Vec<String>,
    pub watch_tv_shows: Vec<WatchTVShow>,
    pub watch_tv_seasons: Vec<WatchTVSeason>,
    pub watch_tv_episodes: Vec<WatchTVEpisode>,
    pub watch_movies: Vec<WatchMovie>,
}

impl SessionState {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_is_staff(&self) -> bool {
        self.user.as_ref().map(|u| u.is_staff).unwrap_or(false)
    }

    /// Upsert lookup for movie watches, keyed by the external TMDB id.
    pub fn find_watch_movie_by_tmdb_id(&self, tmdb_movie_id: i64) -> Option<&WatchMovie> {
        self.watch_movies
            .iter()
            .find(|w| w.tmdb_movie_id == tmdb_movie_id)
    }

    pub(crate) fn clear_session(&mut self) {
        self.token = None;
        self.user = None;
    }

    /// Overwrite the cached movie record matching `record.id` in place.
    /// Returns false (and logs) when the id is not cached.
    pub(crate) fn merge_watch_movie(&mut self, record: &WatchMovie) -> bool {
        match self.watch_movies.iter_mut().find(|w| w.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                true
            }
            None => {
                debug!("watch movie {} not in cache, skipping merge", record.id);
                false
            }
        }
    }

    pub(crate) fn merge_watch_tv_season(&mut self, record: &WatchTVSeason) -> bool {
        match self.watch_tv_seasons.iter_mut().find(|w| w.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                true
            }
            None => {
                debug!("watch TV season {} not in cache, skipping merge", record.id);
                false
            }
        }
    }

    pub(crate) fn merge_watch_tv_episode(&mut self, record: &WatchTVEpisode) -> bool {
        match self.watch_tv_episodes.iter_mut().find(|w| w.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                true
            }
            None => {
                debug!("watch TV episode {} not in cache, skipping merge", record.id);
                false
            }
        }
    }

    /// Remove a show watch record along with every season and episode watch
    /// record that references it.
    pub(crate) fn remove_watch_tv_show_cascade(&mut self, watch_id: i64) {
        self.watch_tv_shows.retain(|w| w.id != watch_id);
        self.watch_tv_seasons.retain(|w| w.watch_tv_show != watch_id);
        self.watch_tv_episodes.retain(|w| w.watch_tv_show != watch_id);
    }

    pub(crate) fn remove_watch_tv_season(&mut self, watch_id: i64) {
        self.watch_tv_seasons.retain(|w| w.id != watch_id);
    }

    pub(crate) fn remove_watch_tv_episode(&mut self, watch_id: i64) {
        self.watch_tv_episodes.retain(|w| w.id != watch_id);
    }

    pub(crate) fn remove_watch_movie(&mut self, watch_id: i64) {
        self.watch_movies.retain(|w| w.id != watch_id);
    }

    pub(crate) fn remove_user(&mut self, user_id: i64) {
        self.users.retain(|u| u.id != user_id);
    }
}

//! Session and cache behavior tests against a mocked watchlist server

use serde_json::{json, Map};
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use r_watchcli::nefarious::{InitState, NefariousClient, SessionStore, User};

use crate::test_utils::{
    sample_episode, sample_movie, sample_season, sample_show, sample_user,
};

fn stored_user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        is_staff: false,
        extra: Map::new(),
    }
}

/// Mounts a 200 JSON response for a GET collection endpoint.
async fn mock_get(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Client wired to a mock server and a temp-dir session store.
fn test_client(server: &MockServer, store: SessionStore) -> NefariousClient {
    NefariousClient::new(&server.uri()).with_store(store)
}

#[tokio::test]
async fn startup_without_persisted_session_is_unauthenticated() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf()));

    let outcome = client.init().await.unwrap();

    assert_eq!(outcome, InitState::Unauthenticated);
    assert!(!client.is_logged_in());
    // nothing was requested
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn startup_with_rejected_token_clears_in_memory_session() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf());
    store.save_token("stale-token");
    store.save_user(&stored_user(1, "alice"));

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(header("Authorization", "Token stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let client = test_client(&server, store.clone());
    let outcome = client.init().await.unwrap();

    assert_eq!(outcome, InitState::Unauthenticated);
    assert!(client.token().is_none());
    assert!(client.current_user().is_none());
    // persisted copies are deliberately left in place
    assert_eq!(store.load_token(), Some("stale-token".to_string()));
    assert!(store.load_user().is_some());
}

#[tokio::test]
async fn startup_fetches_all_core_collections() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf());
    store.save_token("good-token");
    store.save_user(&stored_user(1, "alice"));

    mock_get(&server, "/api/user/", json!([sample_user(1, "alice")])).await;
    mock_get(&server, "/api/settings/", json!([{"id": 5, "tmdb_token": "t"}])).await;
    mock_get(&server, "/api/watch-tv-show/", json!([sample_show(1)])).await;
    mock_get(&server, "/api/watch-tv-season/", json!([sample_season(10, 1)])).await;
    mock_get(
        &server,
        "/api/watch-tv-episode/",
        json!([sample_episode(20, 1), sample_episode(21, 1)]),
    )
    .await;
    mock_get(&server, "/api/watch-movie/", json!([sample_movie(7, 550, "Fight Club")])).await;
    mock_get(&server, "/api/quality-profiles/", json!({"profiles": ["1080p", "720p"]})).await;

    let client = test_client(&server, store);
    let outcome = client.init().await.unwrap();

    assert_eq!(outcome, InitState::Ready);
    let state = client.state();
    assert_eq!(state.user.as_ref().map(|u| u.username.as_str()), Some("alice"));
    assert_eq!(state.settings.as_ref().map(|s| s.id), Some(5));
    assert_eq!(state.watch_tv_shows.len(), 1);
    assert_eq!(state.watch_tv_seasons.len(), 1);
    assert_eq!(state.watch_tv_episodes.len(), 2);
    assert_eq!(state.watch_movies.len(), 1);
    assert_eq!(state.quality_profiles, vec!["1080p", "720p"]);
}

#[tokio::test]
async fn empty_settings_response_keeps_cached_value() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/settings/", json!([{"id": 5}])).await;
    let first = client.fetch_settings().await.unwrap();
    assert_eq!(first.map(|s| s.id), Some(5));

    server.reset().await;
    mock_get(&server, "/api/settings/", json!([])).await;
    let second = client.fetch_settings().await.unwrap();

    assert_eq!(second.map(|s| s.id), Some(5));
    assert_eq!(client.state().settings.map(|s| s.id), Some(5));
}

#[tokio::test]
async fn absent_quality_profiles_keep_cached_value() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/quality-profiles/", json!({"profiles": ["1080p"]})).await;
    client.fetch_quality_profiles().await.unwrap();

    server.reset().await;
    mock_get(&server, "/api/quality-profiles/", json!({})).await;
    let profiles = client.fetch_quality_profiles().await.unwrap();

    assert_eq!(profiles, vec!["1080p"]);
}

#[tokio::test]
async fn collection_fetch_replaces_cached_array() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/watch-movie/", json!([sample_movie(1, 100, "one"), sample_movie(2, 200, "two")])).await;
    client.fetch_watch_movies(None).await.unwrap();
    assert_eq!(client.state().watch_movies.len(), 2);

    server.reset().await;
    mock_get(&server, "/api/watch-movie/", json!([sample_movie(3, 300, "three")])).await;
    client.fetch_watch_movies(None).await.unwrap();

    let movies = client.state().watch_movies;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, 3);
}

#[tokio::test]
async fn movie_upsert_patches_when_tmdb_id_is_cached() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/watch-movie/", json!([sample_movie(7, 550, "Fight Club")])).await;
    client.fetch_watch_movies(None).await.unwrap();

    let mut updated = sample_movie(7, 550, "Fight Club");
    updated["quality_profile_custom"] = json!("2160p");
    Mock::given(method("PATCH"))
        .and(path("/api/watch-movie/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/watch-movie/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let record = client
        .watch_movie(550, "Fight Club", "", Some("2160p"))
        .await
        .unwrap();

    assert_eq!(record.id, 7);
    let movies = client.state().watch_movies;
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].quality_profile_custom.as_deref(), Some("2160p"));
}

#[tokio::test]
async fn movie_upsert_creates_when_tmdb_id_is_not_cached() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    Mock::given(method("POST"))
        .and(path("/api/watch-movie/"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(sample_movie(9, 603, "The Matrix")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let record = client.watch_movie(603, "The Matrix", "", None).await.unwrap();

    assert_eq!(record.id, 9);
    assert_eq!(client.state().watch_movies.len(), 1);
}

#[tokio::test]
async fn unwatching_a_show_cascades_to_seasons_and_episodes() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/watch-tv-show/", json!([sample_show(1), sample_show(2)])).await;
    mock_get(&server, "/api/watch-tv-season/", json!([sample_season(10, 1), sample_season(11, 2)])).await;
    mock_get(
        &server,
        "/api/watch-tv-episode/",
        json!([sample_episode(20, 1), sample_episode(21, 2)]),
    )
    .await;
    client.fetch_watch_tv_shows(None).await.unwrap();
    client.fetch_watch_tv_seasons(None).await.unwrap();
    client.fetch_watch_tv_episodes().await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/watch-tv-show/1/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.unwatch_tv_show(1).await.unwrap();

    let state = client.state();
    assert_eq!(state.watch_tv_shows.iter().map(|w| w.id).collect::<Vec<_>>(), vec![2]);
    assert_eq!(state.watch_tv_seasons.iter().map(|w| w.id).collect::<Vec<_>>(), vec![11]);
    assert_eq!(state.watch_tv_episodes.iter().map(|w| w.id).collect::<Vec<_>>(), vec![21]);
}

#[tokio::test]
async fn blacklist_retry_merges_returned_record() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/watch-movie/", json!([sample_movie(7, 550, "Fight Club")])).await;
    client.fetch_watch_movies(None).await.unwrap();

    let mut retried = sample_movie(7, 550, "Fight Club");
    retried["name"] = json!("Fight Club (retrying)");
    Mock::given(method("POST"))
        .and(path("/api/watch-movie/7/blacklist-auto-retry/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(retried))
        .mount(&server)
        .await;

    let record = client.blacklist_retry_movie(7).await.unwrap();

    assert_eq!(record.name, "Fight Club (retrying)");
    assert_eq!(client.state().watch_movies[0].name, "Fight Club (retrying)");
}

#[tokio::test]
async fn login_populates_only_the_token() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf());

    Mock::given(method("POST"))
        .and(path("/api/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-123"})))
        .mount(&server)
        .await;

    let client = test_client(&server, store.clone());
    client.login("alice", "hunter2").await.unwrap();

    assert_eq!(client.token(), Some("tok-123".to_string()));
    assert!(client.current_user().is_none());
    // token was persisted, the user record was not
    assert_eq!(store.load_token(), Some("tok-123".to_string()));
    assert!(store.load_user().is_none());
}

#[tokio::test]
async fn login_then_fetch_user_populates_both() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().to_path_buf());

    Mock::given(method("POST"))
        .and(path("/api/auth/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-123"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(header("Authorization", "Token tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sample_user(1, "alice")])))
        .mount(&server)
        .await;

    let client = test_client(&server, store.clone());
    client.login("alice", "hunter2").await.unwrap();
    let user = client.fetch_user().await.unwrap();

    assert_eq!(user.map(|u| u.username), Some("alice".to_string()));
    assert!(client.is_logged_in());
    assert!(client.current_user().is_some());
    assert!(store.load_user().is_some());
}

#[tokio::test]
async fn api_errors_pass_through_with_status_and_body() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    Mock::given(method("GET"))
        .and(path("/api/watch-movie/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.fetch_watch_movies(None).await.unwrap_err();
    match err {
        r_watchcli::nefarious::ClientError::Api { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    // the cache was not touched
    assert!(client.state().watch_movies.is_empty());
}

#[tokio::test]
async fn fetch_by_id_merge_is_a_no_op_for_unknown_ids() {
    let server = MockServer::start().await;
    let dir = tempdir().unwrap();
    let client = test_client(&server, SessionStore::new(dir.path().to_path_buf())).with_token("t");

    mock_get(&server, "/api/watch-movie/99/", sample_movie(99, 900, "Unknown")).await;

    let record = client.fetch_watch_movie(99).await.unwrap();
    assert_eq!(record.id, 99);
    // nothing cached, so nothing merged and no error surfaced
    assert!(client.state().watch_movies.is_empty());
}

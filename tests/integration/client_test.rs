//! Integration tests for watchlist client construction and wiring
//!
//! These tests verify that the client components work together correctly.

use r_watchcli::config::Settings;
use r_watchcli::nefarious::{NefariousClient, SessionStore};
use std::error::Error;

#[cfg(test)]
mod client_integration_tests {
    use super::*;

    #[test]
    fn test_client_init_with_settings() {
        let settings = Settings {
            server_url: "https://watch.example.com/".to_string(),
            username: Some("alice".to_string()),
            data_dir: None,
        };

        let client = NefariousClient::new(&settings.server_url).with_token("test-token");

        assert_eq!(client.server_url(), "https://watch.example.com");
        assert_eq!(client.token(), Some("test-token".to_string()));
        assert!(client.is_logged_in());
    }

    #[test]
    fn test_client_uses_configured_store_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        assert_eq!(store.dir(), &dir.path().to_path_buf());
        assert!(store.load_token().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_login_against_live_server() -> Result<(), Box<dyn Error>> {
        let creds = crate::test_utils::load_credentials("credentials.json")?;
        let dir = tempfile::tempdir()?;

        let client = NefariousClient::new(&creds.server_url)
            .with_store(SessionStore::new(dir.path().to_path_buf()));
        client.login(&creds.username, &creds.password).await?;
        let user = client.fetch_user().await?;
        assert!(user.is_some(), "current user should be returned after login");

        client.fetch_core_data().await?;
        Ok(())
    }
}

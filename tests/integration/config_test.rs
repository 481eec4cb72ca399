//! Integration tests for configuration management

use r_watchcli::config::Settings;
use tempfile::tempdir;

#[cfg(test)]
mod config_integration_tests {
    use super::*;

    #[test]
    fn test_config_roundtrip_through_disk() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config_path = dir.path().join("config.json");

        let settings = Settings {
            server_url: "https://watch.example.com".to_string(),
            username: Some("alice".to_string()),
            data_dir: Some(dir.path().join("session")),
        };
        settings.save(&config_path)?;

        let loaded = Settings::load(&config_path)?;
        assert_eq!(loaded.server_url, settings.server_url);
        assert_eq!(loaded.username, settings.username);
        assert_eq!(loaded.data_dir, settings.data_dir);
        Ok(())
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let settings = Settings {
            server_url: String::new(),
            username: None,
            data_dir: None,
        };
        assert!(settings.validate().is_err());
    }
}

//! Token authentication against the watchlist server
//!
//! Login is the only call that goes out without an `Authorization` header.

use reqwest::Client;
use tracing::debug;

use crate::nefarious::api::{handle_response, ClientError, API_URL_LOGIN};
use crate::nefarious::models::{LoginRequest, TokenResponse};

/// Exchange a username and password for a session token.
pub async fn login(
    client: &Client,
    server_url: &str,
    username: &str,
    password: &str,
) -> Result<TokenResponse, ClientError> {
    let server_url = server_url.trim_end_matches('/');
    let url = format!("{}{}", server_url, API_URL_LOGIN);
    debug!("authenticating user {} against {}", username, url);

    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let response = client.post(&url).json(&request).send().await?;
    handle_response(response).await
}

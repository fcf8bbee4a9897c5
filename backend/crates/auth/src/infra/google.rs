//! Google OAuth Client
//!
//! Authorization-code exchange against Google's OAuth 2.0 endpoints, then
//! one call to the OpenID userinfo endpoint for email, name and picture.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::application::config::GoogleOAuthConfig;
use crate::application::google_oauth::{OAuthProfile, OAuthProvider};
use crate::error::{AuthError, AuthResult};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPE: &str = "profile email";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UserInfoResponse {
    email: Option<String>,
    #[serde(default)]
    name: String,
    picture: Option<String>,
}

pub struct GoogleOAuthClient {
    http: Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> AuthResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Internal(format!("http client: {e}")))?;
        Ok(Self { http, config })
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<String> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::OAuthProvider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AuthError::OAuthProvider(format!(
                "token exchange status {status}: {text}"
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::OAuthProvider(format!("invalid token response: {e}")))?;
        Ok(tokens.access_token)
    }
}

impl OAuthProvider for GoogleOAuthClient {
    fn authorize_url(&self, state: &str) -> AuthResult<String> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::Internal(format!("authorize url: {e}")))?;
        Ok(url.into())
    }

    async fn fetch_profile(&self, code: &str) -> AuthResult<OAuthProfile> {
        let access_token = self.exchange_code(code).await?;

        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(|e| AuthError::OAuthProvider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AuthError::OAuthProvider(format!("userinfo status {status}")));
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .map_err(|e| AuthError::OAuthProvider(format!("invalid userinfo response: {e}")))?;

        Ok(OAuthProfile {
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}

/// Provider picked at startup from configuration
pub enum AppOAuthProvider {
    Google(GoogleOAuthClient),
    /// No Google credentials configured
    Disabled,
}

impl AppOAuthProvider {
    pub fn from_config(config: Option<&GoogleOAuthConfig>) -> AuthResult<Self> {
        match config {
            Some(config) => Ok(Self::Google(GoogleOAuthClient::new(config.clone())?)),
            None => {
                tracing::warn!("Google OAuth credentials missing, /api/oauth/google disabled");
                Ok(Self::Disabled)
            }
        }
    }
}

impl OAuthProvider for AppOAuthProvider {
    fn authorize_url(&self, state: &str) -> AuthResult<String> {
        match self {
            Self::Google(client) => client.authorize_url(state),
            Self::Disabled => Err(AuthError::OAuthNotConfigured),
        }
    }

    async fn fetch_profile(&self, code: &str) -> AuthResult<OAuthProfile> {
        match self {
            Self::Google(client) => client.fetch_profile(code).await,
            Self::Disabled => Err(AuthError::OAuthNotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/api/oauth/google/callback".to_string(),
        }
    }

    #[test]
    fn test_authorize_url_carries_state_and_scope() {
        let client = GoogleOAuthClient::new(config()).unwrap();
        let url = Url::parse(&client.authorize_url("abc").unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("state".to_string(), "abc".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "profile email".to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "client-123".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
    }

    #[tokio::test]
    async fn test_disabled_provider() {
        let provider = AppOAuthProvider::from_config(None).unwrap();
        assert!(matches!(
            provider.authorize_url("abc"),
            Err(AuthError::OAuthNotConfigured)
        ));
        assert!(matches!(
            provider.fetch_profile("code").await,
            Err(AuthError::OAuthNotConfigured)
        ));
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::jwt::JwtCodec;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Google OAuth client credentials
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the URI registered in the Google console
    pub redirect_uri: String,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub cookie_name: String,
    /// HMAC secret for every JWT the service issues
    pub jwt_secret: Vec<u8>,
    /// Lifetime of session and verification tokens (1 year)
    pub token_max_age: Duration,
    /// Lifetime of the OAuth sign-up token (7 days)
    pub oauth_signup_ttl: Duration,
    /// Lifetime of the OAuth `state` cookie (10 minutes)
    pub oauth_state_ttl: Duration,
    pub cookie_secure: bool,
    /// `None` by default: the front end lives on another origin
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Where OAuth callbacks redirect to
    pub frontend_uri: String,
    pub google: Option<GoogleOAuthConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "auth_token".to_string(),
            jwt_secret: Vec::new(),
            token_max_age: Duration::from_secs(365 * 24 * 3600),
            oauth_signup_ttl: Duration::from_secs(7 * 24 * 3600),
            oauth_state_ttl: Duration::from_secs(10 * 60),
            cookie_secure: true,
            cookie_same_site: SameSite::None,
            password_pepper: None,
            frontend_uri: "http://localhost:5173".to_string(),
            google: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random JWT secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = vec![0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            jwt_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie over plain HTTP)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secret()
        }
    }

    pub fn jwt_codec(&self) -> JwtCodec {
        JwtCodec::new(&self.jwt_secret)
    }

    pub fn token_max_age_secs(&self) -> i64 {
        self.token_max_age.as_secs() as i64
    }

    /// Session cookie; `persistent` adds `Max-Age` (token lifetime)
    pub fn session_cookie(&self, persistent: bool) -> CookieConfig {
        CookieConfig {
            name: self.cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: persistent.then(|| self.token_max_age_secs()),
        }
    }

    /// Short-lived cookie carrying the OAuth `state` between redirect and callback
    ///
    /// `Lax` so the browser sends it on Google's top-level redirect back.
    pub fn oauth_state_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: format!("{}_oauth_state", self.cookie_name),
            secure: self.cookie_secure,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/api/oauth".to_string(),
            max_age_secs: Some(self.oauth_state_ttl.as_secs() as i64),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// `{frontend_uri}{path}` without a doubled slash
    pub fn frontend_url(&self, path: &str) -> String {
        format!("{}{}", self.frontend_uri.trim_end_matches('/'), path)
    }
}

//! Server settings
//!
//! Read once at startup from the environment (and `.env` through
//! `dotenvy`), then split into the per-crate configurations.

use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};
use article::ArticleConfig;
use auth::{AuthConfig, GoogleOAuthConfig};
use auth::application::config::SameSite;
use platform::mailer::MailConfig;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub upload_dir: String,
    pub upload_max_bytes: usize,
    pub auth: AuthConfig,
    pub mail: MailConfig,
}

fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let frontend_uri = var("FRONTEND_URI").unwrap_or_else(|| "http://localhost:5173".to_string());
        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| frontend_uri.clone())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let base = if cfg!(debug_assertions) {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };
        let jwt_secret = match var("JWT_SECRET_KEY") {
            Some(secret) => secret.into_bytes(),
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET_KEY not set, using a random secret");
                base.jwt_secret.clone()
            }
            None => bail!("JWT_SECRET_KEY must be set in production"),
        };

        let cookie_same_site = match var("COOKIE_SAME_SITE") {
            Some(raw) => SameSite::parse(&raw)
                .with_context(|| format!("COOKIE_SAME_SITE has an invalid value: {raw}"))?,
            None => base.cookie_same_site,
        };

        let google = match (
            var("GOOGLE_CLIENT_ID"),
            var("GOOGLE_CLIENT_SECRET"),
            var("GOOGLE_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(GoogleOAuthConfig {
                client_id,
                client_secret,
                redirect_uri,
            }),
            _ => None,
        };

        let from_name = var("MAIL_FROM_NAME").unwrap_or_else(|| "Net Kids".to_string());

        let auth = AuthConfig {
            cookie_name: var("AUTH_TOKEN_NAME").unwrap_or_else(|| base.cookie_name.clone()),
            jwt_secret,
            cookie_secure: parsed("COOKIE_SECURE", base.cookie_secure)?,
            cookie_same_site,
            password_pepper: var("PASSWORD_PEPPER").map(String::into_bytes),
            frontend_uri,
            google,
            ..base
        };

        let mail = MailConfig {
            host: var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            username: var("GMAIL_USER").unwrap_or_default(),
            password: var("GMAIL_PASS").unwrap_or_default(),
            from_name,
        };

        Ok(Self {
            database_url,
            port: parsed("BACKEND_PORT", 3000)?,
            frontend_origins,
            upload_dir: var("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            upload_max_bytes: parsed("UPLOAD_MAX_BYTES", 20 * 1024 * 1024)?,
            auth,
            mail,
        })
    }

    pub fn article(&self) -> ArticleConfig {
        ArticleConfig {
            max_upload_bytes: self.upload_max_bytes,
            ..ArticleConfig::default()
        }
    }
}

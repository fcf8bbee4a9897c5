//! Application Configuration
//!
//! Configuration for the Article application layer.

use kernel::id::UserId;

/// Article application configuration
#[derive(Debug, Clone)]
pub struct ArticleConfig {
    /// Directory under the upload root receiving media files
    pub media_subdir: String,
    /// Largest accepted multipart body
    pub max_upload_bytes: usize,
    /// Files accepted in one request
    pub max_files: usize,
}

impl Default for ArticleConfig {
    fn default() -> Self {
        Self {
            media_subdir: "media".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            max_files: 20,
        }
    }
}

impl ArticleConfig {
    /// Create config for development (small limits)
    pub fn development() -> Self {
        Self {
            max_upload_bytes: 2 * 1024 * 1024,
            max_files: 5,
            ..Default::default()
        }
    }

    /// Upload subdirectory of one author, e.g. `media/user-<uuid>`
    pub fn media_dir(&self, user_id: &UserId) -> String {
        format!("{}/user-{}", self.media_subdir.trim_matches('/'), user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_dir() {
        let config = ArticleConfig {
            media_subdir: "/media/".to_string(),
            ..Default::default()
        };
        let user_id = UserId::new();
        assert_eq!(config.media_dir(&user_id), format!("media/user-{}", user_id));
    }
}

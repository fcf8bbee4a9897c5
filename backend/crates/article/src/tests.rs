//! Crate-level tests for the article crate
//!
//! Router tests run against an in-memory repository and a temporary
//! upload directory. The session is injected as a request extension, the
//! way the auth middleware does it.

#[cfg(test)]
mod support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use axum::{Extension, Router};
    use kernel::session::CurrentUser;
    use platform::storage::UploadStore;
    use tower::ServiceExt;

    use crate::application::config::ArticleConfig;
    use crate::domain::entity::{
        article::{Article, ArticleDetail, SectionDetail},
        media_file::MediaFile,
        section::Section,
    };
    use crate::domain::repository::ArticleRepository;
    use crate::domain::value_object::{
        ArticleId, SectionId, UserId, article_title::ArticleTitle,
        section_content::SectionContent,
    };
    use crate::error::{ArticleError, ArticleResult};
    use crate::presentation::handlers::ArticleAppState;
    use crate::presentation::router::article_router_generic;

    #[derive(Default)]
    pub struct MemoryRepo {
        /// Insertion order; newest last
        pub articles: Mutex<Vec<ArticleDetail>>,
        pub fail_writes: AtomicBool,
    }

    impl MemoryRepo {
        fn check_writes(&self) -> ArticleResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ArticleError::Internal("write failed".to_string()));
            }
            Ok(())
        }
    }

    fn attach(sections: &mut [SectionDetail], files: &[MediaFile]) {
        for file in files {
            if let Some(detail) = sections
                .iter_mut()
                .find(|d| d.section.section_id == file.section_id)
            {
                detail.files.push(file.clone());
                detail.files.sort_by_key(|f| f.position);
            }
        }
    }

    impl ArticleRepository for MemoryRepo {
        async fn create_article(
            &self,
            article: &Article,
            sections: &[Section],
            files: &[MediaFile],
        ) -> ArticleResult<()> {
            self.check_writes()?;

            let mut sections: Vec<SectionDetail> = sections
                .iter()
                .map(|section| SectionDetail {
                    section: section.clone(),
                    files: Vec::new(),
                })
                .collect();
            attach(&mut sections, files);

            self.articles.lock().unwrap().push(ArticleDetail {
                article: article.clone(),
                sections,
            });
            Ok(())
        }

        async fn list_articles(&self) -> ArticleResult<Vec<ArticleDetail>> {
            Ok(self.articles.lock().unwrap().iter().rev().cloned().collect())
        }

        async fn find_article(
            &self,
            article_id: &ArticleId,
        ) -> ArticleResult<Option<ArticleDetail>> {
            Ok(self
                .articles
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.article.article_id == *article_id)
                .cloned())
        }

        async fn update_article(
            &self,
            article_id: &ArticleId,
            owner: &UserId,
            title: &ArticleTitle,
            sections: &[(SectionId, SectionContent)],
            files: &[MediaFile],
        ) -> ArticleResult<()> {
            self.check_writes()?;

            let mut articles = self.articles.lock().unwrap();
            let Some(detail) = articles
                .iter_mut()
                .find(|d| d.article.article_id == *article_id)
            else {
                return Ok(());
            };

            detail.article.title = title.clone();
            for (section_id, content) in sections {
                if let Some(section) = detail
                    .sections
                    .iter_mut()
                    .map(|d| &mut d.section)
                    .find(|s| s.section_id == *section_id && s.user_id == *owner)
                {
                    section.content = content.clone();
                }
            }
            attach(&mut detail.sections, files);
            Ok(())
        }

        async fn delete_article(&self, article_id: &ArticleId) -> ArticleResult<bool> {
            let mut articles = self.articles.lock().unwrap();
            let before = articles.len();
            articles.retain(|d| d.article.article_id != *article_id);
            Ok(articles.len() < before)
        }
    }

    pub const BOUNDARY: &str = "XARTICLEBOUNDARY";

    /// Hand-built `multipart/form-data` body
    #[derive(Default)]
    pub struct Form {
        body: Vec<u8>,
    }

    impl Form {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn text(mut self, name: &str, value: &str) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
            self
        }

        pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
            self.body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            self.body.extend_from_slice(bytes);
            self.body.extend_from_slice(b"\r\n");
            self
        }

        pub fn finish(mut self) -> Vec<u8> {
            self.body
                .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
            self.body
        }
    }

    pub struct TestApp {
        pub state: ArticleAppState<MemoryRepo>,
        _uploads: tempfile::TempDir,
    }

    impl TestApp {
        pub fn new() -> Self {
            let uploads = tempfile::tempdir().unwrap();
            let state = ArticleAppState::new(
                MemoryRepo::default(),
                UploadStore::new(uploads.path()),
                ArticleConfig::development(),
            );
            Self {
                state,
                _uploads: uploads,
            }
        }

        pub fn user() -> CurrentUser {
            CurrentUser {
                user_id: UserId::new(),
                user_type: "person",
            }
        }

        fn router(&self, current: Option<CurrentUser>) -> Router {
            let router =
                Router::new().nest("/api/article", article_router_generic(self.state.clone()));
            match current {
                Some(current) => router.layer(Extension(current)),
                None => router,
            }
        }

        pub async fn send(&self, current: Option<CurrentUser>, req: Request<Body>) -> Response<Body> {
            self.router(current).oneshot(req).await.unwrap()
        }

        pub async fn get(&self, uri: &str) -> Response<Body> {
            self.send(None, Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        pub async fn multipart(
            &self,
            method: &str,
            uri: &str,
            current: Option<CurrentUser>,
            body: Vec<u8>,
        ) -> Response<Body> {
            let req = Request::builder()
                .method(method)
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap();
            self.send(current, req).await
        }

        pub async fn delete(&self, uri: &str, current: CurrentUser) -> Response<Body> {
            self.send(
                Some(current),
                Request::delete(uri).body(Body::empty()).unwrap(),
            )
            .await
        }

        /// Create an article with two sections and return its JSON
        pub async fn create(&self, current: CurrentUser, title: &str) -> serde_json::Value {
            let body = Form::new()
                .text("title", title)
                .text("sections[0][content]", "Première partie")
                .text("sections[1][content]", "Deuxième partie")
                .finish();
            let res = self.multipart("POST", "/api/article", Some(current), body).await;
            assert_eq!(res.status(), axum::http::StatusCode::CREATED);
            json(res).await["article"].clone()
        }

        pub fn exists(&self, src: &str) -> bool {
            let relative = src.strip_prefix("uploads/").unwrap();
            self.state.store.root().join(relative).exists()
        }
    }

    pub async fn json(res: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod config_tests {
    use crate::application::config::*;

    #[test]
    fn test_default_config() {
        let config = ArticleConfig::default();
        assert_eq!(config.media_subdir, "media");
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.max_files, 20);
    }

    #[test]
    fn test_development_config() {
        let config = ArticleConfig::development();
        assert!(config.max_upload_bytes < ArticleConfig::default().max_upload_bytes);
        assert_eq!(config.media_subdir, "media");
    }
}

#[cfg(test)]
mod error_tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::app_error::AppError;
    use kernel::id::ArticleId;

    use crate::error::ArticleError;

    #[test]
    fn test_error_into_response_status_codes() {
        let cases = vec![
            (ArticleError::field("title", "invalid title"), StatusCode::BAD_REQUEST),
            (
                ArticleError::InvalidId("x".parse::<ArticleId>().unwrap_err()),
                StatusCode::BAD_REQUEST,
            ),
            (ArticleError::ArticleNotFound, StatusCode::NOT_FOUND),
            (ArticleError::NotOwner, StatusCode::FORBIDDEN),
            (
                ArticleError::FileWithoutSection { index: 0 },
                StatusCode::BAD_REQUEST,
            ),
            (
                ArticleError::from(AppError::payload_too_large("too big")),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                ArticleError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected);
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let app = ArticleError::Internal("connection reset".to_string()).to_app_error();
        assert_eq!(app.message(), "Internal server error");
    }

    #[test]
    fn test_codes() {
        assert_eq!(ArticleError::ArticleNotFound.code(), Some("articleNotFound"));
        assert_eq!(ArticleError::NotOwner.code(), Some("unAuthorized"));
        assert_eq!(
            ArticleError::FileWithoutSection { index: 2 }.code(),
            Some("fileWithoutSection")
        );
        assert_eq!(ArticleError::Internal(String::new()).code(), None);
    }
}

#[cfg(test)]
mod create_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_create_spreads_files_over_sections() {
        let app = TestApp::new();
        let user = TestApp::user();

        let body = Form::new()
            .text("title", "  Potager collectif ")
            .text(
                "sections",
                r#"[{"content":"Les semis de printemps"},{"content":"Arrosage et paillage"}]"#,
            )
            .file("files", "a.png", b"first")
            .file("files", "b.png", b"second")
            .file("files", "c.png", b"third")
            .finish();
        let res = app.multipart("POST", "/api/article", Some(user), body).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let article = json(res).await["article"].clone();
        assert_eq!(article["title"], "Potager collectif");
        assert_eq!(article["userId"], user.user_id.to_string());

        let sections = article["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["content"], "Les semis de printemps");
        assert_eq!(sections[0]["files"].as_array().unwrap().len(), 2);
        assert_eq!(sections[1]["files"].as_array().unwrap().len(), 1);

        let src = sections[1]["files"][0]["src"].as_str().unwrap();
        assert!(src.starts_with(&format!("uploads/media/user-{}/", user.user_id)));
        assert!(src.ends_with(".png"));
        assert!(app.exists(src));
    }

    #[tokio::test]
    async fn test_create_requires_session() {
        let app = TestApp::new();
        let body = Form::new().text("title", "Sans auteur").finish();

        let res = app.multipart("POST", "/api/article", None, body).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(res).await["code"], "unAuthorized");
    }

    #[tokio::test]
    async fn test_create_collects_field_errors() {
        let app = TestApp::new();

        let body = Form::new()
            .text("title", "ab")
            .text("sections[0][content]", "Bien assez long")
            .text("sections[1][content]", "court")
            .finish();
        let res = app
            .multipart("POST", "/api/article", Some(TestApp::user()), body)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = json(res).await;
        assert_eq!(body["code"], "validationFailed");
        let fields: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["title", "sections[1].content"]);
    }

    #[tokio::test]
    async fn test_create_without_sections() {
        let app = TestApp::new();

        let body = Form::new().text("title", "Seulement un titre").finish();
        let res = app
            .multipart("POST", "/api/article", Some(TestApp::user()), body)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body = json(res).await;
        assert_eq!(body["errors"][0]["field"], "sections");
        assert_eq!(body["errors"][0]["message"], "at least one section");
    }

    #[tokio::test]
    async fn test_failed_write_removes_stored_files() {
        let app = TestApp::new();
        app.state.repo.fail_writes.store(true, Ordering::SeqCst);

        let body = Form::new()
            .text("title", "Jamais enregistré")
            .text("sections[0][content]", "Contenu perdu")
            .file("files", "a.png", b"bytes")
            .finish();
        let user = TestApp::user();
        let res = app.multipart("POST", "/api/article", Some(user), body).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let dir = app
            .state
            .store
            .root()
            .join(format!("media/user-{}", user.user_id));
        let leftover = std::fs::read_dir(&dir)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftover, 0);
    }
}

#[cfg(test)]
mod read_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use kernel::id::ArticleId;

    #[tokio::test]
    async fn test_list_newest_first() {
        let app = TestApp::new();
        let user = TestApp::user();
        app.create(user, "Le premier").await;
        app.create(user, "Le second").await;

        let res = app.get("/api/article").await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = json(res).await;
        let titles: Vec<_> = body["articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["Le second", "Le premier"]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let app = TestApp::new();
        let created = app.create(TestApp::user(), "Un article").await;
        let id = created["id"].as_str().unwrap();

        let res = app.get(&format!("/api/article/{id}")).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = json(res).await;
        assert_eq!(body["article"]["id"], id);
        assert_eq!(body["article"]["sections"][1]["content"], "Deuxième partie");
    }

    #[tokio::test]
    async fn test_get_invalid_and_missing() {
        let app = TestApp::new();

        let res = app.get("/api/article/42").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res).await["code"], "invalidId");

        let res = app.get(&format!("/api/article/{}", ArticleId::new())).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(res).await["code"], "articleNotFound");
    }
}

#[cfg(test)]
mod write_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use kernel::id::SectionId;

    #[tokio::test]
    async fn test_update_by_owner() {
        let app = TestApp::new();
        let owner = TestApp::user();
        let created = app.create(owner, "Titre initial").await;
        let id = created["id"].as_str().unwrap();
        let first = created["sections"][0]["id"].as_str().unwrap();
        let second = created["sections"][1]["id"].as_str().unwrap();

        let body = Form::new()
            .text("title", "Titre modifié")
            .text("sections[0][id]", second)
            .text("sections[0][content]", "Deuxième réécrite")
            .text("sections[1][id]", &SectionId::new().to_string())
            .text("sections[1][content]", "Section inconnue")
            .file("files", "new.png", b"fresh")
            .finish();
        let res = app
            .multipart("PUT", &format!("/api/article/{id}"), Some(owner), body)
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let article = json(res).await["article"].clone();
        assert_eq!(article["title"], "Titre modifié");
        assert_eq!(article["sections"][0]["id"], first);
        assert_eq!(article["sections"][0]["content"], "Première partie");
        assert_eq!(article["sections"][1]["content"], "Deuxième réécrite");
        assert_eq!(article["sections"].as_array().unwrap().len(), 2);

        let src = article["sections"][1]["files"][0]["src"].as_str().unwrap();
        assert!(app.exists(src));
    }

    #[tokio::test]
    async fn test_update_title_only() {
        let app = TestApp::new();
        let owner = TestApp::user();
        let created = app.create(owner, "Titre initial").await;
        let id = created["id"].as_str().unwrap();

        let body = Form::new().text("title", "Seul le titre change").finish();
        let res = app
            .multipart("PUT", &format!("/api/article/{id}"), Some(owner), body)
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let article = json(res).await["article"].clone();
        assert_eq!(article["title"], "Seul le titre change");
        assert_eq!(article["sections"], created["sections"]);
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let app = TestApp::new();
        let created = app.create(TestApp::user(), "Pas à toi").await;
        let id = created["id"].as_str().unwrap();

        let body = Form::new()
            .text("title", "Détourné")
            .text("sections[0][content]", "Contenu détourné")
            .finish();
        let res = app
            .multipart("PUT", &format!("/api/article/{id}"), Some(TestApp::user()), body)
            .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(json(res).await["code"], "unAuthorized");

        let res = app.get(&format!("/api/article/{id}")).await;
        assert_eq!(json(res).await["article"]["title"], "Pas à toi");
    }

    #[tokio::test]
    async fn test_update_file_without_section() {
        let app = TestApp::new();
        let owner = TestApp::user();
        let created = app.create(owner, "Un article").await;
        let id = created["id"].as_str().unwrap();

        let body = Form::new()
            .text("title", "Un article")
            .text("sections[0][content]", "Sans identifiant")
            .file("files", "orphan.png", b"orphan")
            .finish();
        let res = app
            .multipart("PUT", &format!("/api/article/{id}"), Some(owner), body)
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(res).await["code"], "fileWithoutSection");
    }

    #[tokio::test]
    async fn test_update_missing_article() {
        let app = TestApp::new();
        let body = Form::new()
            .text("title", "Fantôme")
            .text("sections[0][content]", "Rien ici")
            .finish();

        let res = app
            .multipart(
                "PUT",
                &format!("/api/article/{}", kernel::id::ArticleId::new()),
                Some(TestApp::user()),
                body,
            )
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_removes_files() {
        let app = TestApp::new();
        let owner = TestApp::user();

        let body = Form::new()
            .text("title", "À supprimer")
            .text("sections[0][content]", "Contenu éphémère")
            .file("files", "gone.png", b"gone")
            .finish();
        let res = app.multipart("POST", "/api/article", Some(owner), body).await;
        let article = json(res).await["article"].clone();
        let id = article["id"].as_str().unwrap();
        let src = article["sections"][0]["files"][0]["src"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(app.exists(&src));

        let res = app.delete(&format!("/api/article/{id}"), TestApp::user()).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let res = app.delete(&format!("/api/article/{id}"), owner).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body = json(res).await;
        assert_eq!(body["deleted"]["id"], id);
        assert_eq!(body["deleted"]["title"], "À supprimer");
        assert!(!app.exists(&src));

        let res = app.get(&format!("/api/article/{id}")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

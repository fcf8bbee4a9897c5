//! HTTP Handlers

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse};
use kernel::session::CurrentUser;
use platform::mailer::Mailer;
use platform::storage::UploadStore;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::google_oauth::OAuthProvider;
use crate::application::tokens::TokenService;
use crate::application::{
    GetUserUseCase, GoogleOAuthUseCase, LoginInput, LoginOutput, LoginUseCase, OAuthCheck,
    OAuthOutcome, OAuthRegisterUseCase, RegisterInput, RegisterUseCase, TokenCheckUseCase,
    UpdateProfileImageUseCase, UpdateUserInput, UpdateUserUseCase, UploadedImage,
    VerifyCodeUseCase,
};
use crate::domain::repository::AuthStore;
use crate::error::AuthResult;
use crate::presentation::dto::{
    DecodedResponse, LoginRequest, LogoutResponse, OAuthCallbackQuery, OAuthCheckResponse,
    OAuthRegisterRequest, ProfileImageResponse, RegisterRequest, SessionResponse,
    SessionUserBody, SignedInResponse, TokenResponse, UpdateUserRequest, UserDto, UserResponse,
    ValidResponse, VerifyCodeRequest,
};

/// Shared state for auth, token, OAuth and user handlers
pub struct AuthAppState<R, M, P>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub oauth: Arc<P>,
    pub tokens: Arc<TokenService>,
    pub store: Arc<UploadStore>,
    pub config: Arc<AuthConfig>,
}

impl<R, M, P> Clone for AuthAppState<R, M, P>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            oauth: self.oauth.clone(),
            tokens: self.tokens.clone(),
            store: self.store.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, M, P> AuthAppState<R, M, P>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    pub fn new(repo: R, mailer: M, oauth: P, store: UploadStore, config: AuthConfig) -> Self {
        let config = Arc::new(config);
        Self {
            repo: Arc::new(repo),
            mailer: Arc::new(mailer),
            oauth: Arc::new(oauth),
            tokens: Arc::new(TokenService::new(config.clone())),
            store: Arc::new(store),
            config,
        }
    }

    /// `Set-Cookie` value for a session `token`
    fn session_cookie(&self, token: &str, persistent: bool) -> String {
        self.config.session_cookie(persistent).build_set_cookie(token)
    }
}

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            user_type: req.user_type,
            sector: req.sector,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: output.token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<axum::response::Response>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
            remember: req.remember,
        })
        .await?;

    match output {
        LoginOutput::SignedIn {
            user_id,
            session_token,
            remember,
        } => {
            let cookie = state.session_cookie(&session_token, remember);
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(SignedInResponse::new(user_id)),
            )
                .into_response())
        }
        // no cookie until the code is confirmed
        LoginOutput::VerificationRequired { token } => {
            Ok(Json(TokenResponse { token }).into_response())
        }
    }
}

/// GET /api/auth/logout
pub async fn logout<R, M, P>(State(state): State<AuthAppState<R, M, P>>) -> impl IntoResponse
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let cookie = state.config.session_cookie(false).build_delete_cookie();
    (
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse { logged_out: true }),
    )
}

/// GET /api/auth/jwt
pub async fn session(current: CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: SessionUserBody {
            id: current.user_id,
            user_type: current.user_type,
        },
    })
}

/// POST /api/auth/register/{token}
pub async fn oauth_register<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    Path(token): Path<String>,
    Json(req): Json<OAuthRegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = OAuthRegisterUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(&token, req.password).await?;
    let cookie = state.session_cookie(&output.session_token, true);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(SignedInResponse::new(output.user_id)),
    ))
}

// ============================================================================
// Token checks
// ============================================================================

/// GET /api/token/{token}
pub async fn check_token<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    Path(token): Path<String>,
) -> AuthResult<Json<DecodedResponse>>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    TokenCheckUseCase::new(state.repo.clone(), state.tokens.clone()).verify(&token)?;
    Ok(Json(DecodedResponse { decoded: true }))
}

/// POST /api/token/{token}/code
pub async fn verify_code<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    Path(token): Path<String>,
    Json(req): Json<VerifyCodeRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = VerifyCodeUseCase::new(state.repo.clone(), state.tokens.clone());
    let output = use_case.execute(&token, &req.code).await?;
    let cookie = state.session_cookie(&output.session_token, true);

    Ok(([(header::SET_COOKIE, cookie)], Json(ValidResponse { valid: true })))
}

/// GET /api/token/{token}/oauth
pub async fn check_oauth_token<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    Path(token): Path<String>,
) -> AuthResult<Json<OAuthCheckResponse>>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let use_case = TokenCheckUseCase::new(state.repo.clone(), state.tokens.clone());

    let response = match use_case.oauth(&token).await? {
        OAuthCheck::Existing(id) => OAuthCheckResponse::Existing { id },
        OAuthCheck::Available => OAuthCheckResponse::Available { valid: true },
    };
    Ok(Json(response))
}

// ============================================================================
// Google OAuth
// ============================================================================

/// GET /api/oauth/google
pub async fn google_start<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let use_case =
        GoogleOAuthUseCase::new(state.repo.clone(), state.oauth.clone(), state.tokens.clone());
    let start = use_case.start()?;
    let state_cookie = state.config.oauth_state_cookie().build_set_cookie(&start.state);

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, start.redirect_url),
            (header::SET_COOKIE, state_cookie),
        ],
    ))
}

/// GET /api/oauth/google/callback
pub async fn google_callback<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    headers: HeaderMap,
    Query(query): Query<OAuthCallbackQuery>,
) -> AuthResult<impl IntoResponse>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let state_cookie = state.config.oauth_state_cookie();
    let expected = platform::cookie::extract_cookie(&headers, &state_cookie.name);

    if let Some(error) = query.error.as_deref() {
        tracing::info!(error, "Google sign-in refused by the user");
    }

    let use_case =
        GoogleOAuthUseCase::new(state.repo.clone(), state.oauth.clone(), state.tokens.clone());
    let outcome = use_case
        .callback(&query.code, &query.state, expected.as_deref())
        .await?;

    let clear_state = state_cookie.build_delete_cookie();

    let response = match outcome {
        OAuthOutcome::SignedIn { session_token, .. } => (
            StatusCode::FOUND,
            AppendHeaders([
                (header::LOCATION, state.config.frontend_url("/home")),
                (header::SET_COOKIE, clear_state),
                (header::SET_COOKIE, state.session_cookie(&session_token, true)),
            ]),
        )
            .into_response(),
        OAuthOutcome::SignUpRequired { signup_token } => (
            StatusCode::FOUND,
            AppendHeaders([
                (
                    header::LOCATION,
                    state.config.frontend_url(&format!("/auth/{}", signup_token)),
                ),
                (header::SET_COOKIE, clear_state),
            ]),
        )
            .into_response(),
    };
    Ok(response)
}

// ============================================================================
// User profile (requires authentication)
// ============================================================================

/// GET /api/user
pub async fn get_user<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    current: CurrentUser,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let view = GetUserUseCase::new(state.repo.clone())
        .execute(&current.user_id)
        .await?;

    Ok(Json(UserResponse {
        user: UserDto::from(view),
    }))
}

/// PUT /api/user
pub async fn update_user<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    current: CurrentUser,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let user = UpdateUserUseCase::new(state.repo.clone())
        .execute(
            &current.user_id,
            UpdateUserInput {
                name: req.name,
                bio: req.bio,
                profession: req.profession,
            },
        )
        .await?;

    Ok(Json(UserResponse {
        user: UserDto::from(&user),
    }))
}

/// PUT /api/user/profile
///
/// Multipart body with one `file` part; other parts are ignored.
pub async fn update_profile_image<R, M, P>(
    State(state): State<AuthAppState<R, M, P>>,
    current: CurrentUser,
    mut multipart: Multipart,
) -> AuthResult<Json<ProfileImageResponse>>
where
    R: AuthStore,
    M: Mailer + Sync + 'static,
    P: OAuthProvider + Sync + 'static,
{
    let mut file = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;
        file = Some(UploadedImage {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    let use_case = UpdateProfileImageUseCase::new(state.repo.clone(), state.store.clone());
    let image = use_case.execute(&current.user_id, file).await?;

    Ok(Json(ProfileImageResponse { image }))
}

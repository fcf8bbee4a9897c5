//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod google_oauth;
pub mod login;
pub mod mail;
pub mod oauth_register;
pub mod register;
pub mod token_check;
pub mod tokens;
pub mod user_profile;
pub mod validation;
pub mod verify_code;

// Re-exports
pub use config::{AuthConfig, GoogleOAuthConfig};
pub use google_oauth::{GoogleOAuthUseCase, OAuthOutcome, OAuthProfile, OAuthProvider};
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use oauth_register::{OAuthRegisterOutput, OAuthRegisterUseCase};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use token_check::{OAuthCheck, TokenCheckUseCase};
pub use tokens::TokenService;
pub use user_profile::{
    GetUserUseCase, UpdateProfileImageUseCase, UpdateUserInput, UpdateUserUseCase, UploadedImage,
    UserView,
};
pub use verify_code::{VerifyCodeOutput, VerifyCodeUseCase};

//! Shared Kernel
//!
//! Vocabulary that every bounded context of the backend agrees on:
//! - The unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Typed entity identifiers ([`id::Id`])
//! - The authenticated caller ([`session::CurrentUser`])
//!
//! Anything placed here is expensive to change, so only concepts with the
//! same meaning in `auth`, `article` and `presence` belong in this crate.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod session;

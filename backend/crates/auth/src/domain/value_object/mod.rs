//! Value Object Module

pub mod email;
pub mod sector;
pub mod user_name;
pub mod user_password;
pub mod user_type;
pub mod verification_code;

pub use kernel::id::UserId;

//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations used by the domain crates:
//! - Cryptographic utilities (SHA-256, Base64, random codes)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - JWT signing and verification
//! - Outgoing mail (SMTP via lettre, or a tracing-only fallback)
//! - Upload storage on the local file system

pub mod cookie;
pub mod crypto;
pub mod jwt;
pub mod mailer;
pub mod password;
pub mod storage;

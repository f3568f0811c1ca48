//! # Auth Module
//!
//! Admin-only gating for every mutation endpoint. The map engine itself
//! assumes its callers are already authorized.

pub mod crypto;
pub mod errors;
pub mod guard;
pub mod jwt;

pub use crypto::{generate_secret, hash_password, is_password_hash, verify_password};
pub use errors::{AuthError, AuthResult};
pub use guard::{AdminAccount, AuthGuard, LoginRequest};
pub use jwt::{AdminClaims, JwtConfig, JwtManager, TokenResponse};

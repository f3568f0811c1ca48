//! # Auth Guard
//!
//! Gates the write endpoints. Admin accounts come from configuration with
//! Argon2id password hashes; a successful login yields a bearer token that
//! [`AuthGuard::authorize`] checks on every gated request.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::crypto::verify_password;
use super::errors::{AuthError, AuthResult};
use super::jwt::{AdminClaims, JwtConfig, JwtManager, TokenResponse};
use crate::observability::Event;

/// An account allowed to log in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Only staff accounts pass the guard
    #[serde(default = "default_is_staff")]
    pub is_staff: bool,
}

fn default_is_staff() -> bool {
    true
}

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Admin authentication and authorization
#[derive(Clone)]
pub struct AuthGuard {
    accounts: HashMap<String, AdminAccount>,
    jwt: JwtManager,
}

impl AuthGuard {
    pub fn new(accounts: Vec<AdminAccount>, jwt: JwtConfig) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|a| (a.username.clone(), a))
                .collect(),
            jwt: JwtManager::new(jwt),
        }
    }

    /// Guard with the given accounts and a one-hour token lifetime
    pub fn with_secret(accounts: Vec<AdminAccount>, secret: impl Into<String>) -> Self {
        Self::new(accounts, JwtConfig::new(secret, Duration::hours(1)))
    }

    /// Check credentials and issue a token
    pub fn login(&self, request: &LoginRequest) -> AuthResult<TokenResponse> {
        let account = match self.accounts.get(&request.username) {
            Some(account) => account,
            None => {
                warn!(event = %Event::AuthRejected, username = %request.username, "unknown account");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_password(&request.password, &account.password_hash)? {
            warn!(event = %Event::AuthRejected, username = %request.username, "wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !account.is_staff {
            warn!(event = %Event::AuthRejected, username = %request.username, "not staff");
            return Err(AuthError::Forbidden);
        }

        info!(event = %Event::LoginSucceeded, username = %account.username, "admin logged in");
        self.jwt.issue(&account.username, account.is_staff)
    }

    /// Require a valid staff bearer token in the request headers
    pub fn authorize(&self, headers: &HeaderMap) -> AuthResult<AdminClaims> {
        let token = bearer_token(headers).ok_or(AuthError::AuthenticationRequired)?;
        let claims = self.jwt.validate(token)?;

        if !claims.is_staff || !self.accounts.contains_key(&claims.sub) {
            return Err(AuthError::Forbidden);
        }
        Ok(claims)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::hash_password;
    use axum::http::HeaderValue;

    fn guard() -> AuthGuard {
        let accounts = vec![
            AdminAccount {
                username: "admin".into(),
                password_hash: hash_password("admin-pass").unwrap(),
                is_staff: true,
            },
            AdminAccount {
                username: "viewer".into(),
                password_hash: hash_password("viewer-pass").unwrap(),
                is_staff: false,
            },
        ];
        AuthGuard::with_secret(accounts, "guard-test-secret")
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_login_and_authorize() {
        let guard = guard();
        let token = guard.login(&login("admin", "admin-pass")).unwrap();

        let claims = guard
            .authorize(&headers_with(&format!("Bearer {}", token.access_token)))
            .unwrap();
        assert_eq!(claims.sub, "admin");
    }

    #[test]
    fn test_bad_credentials() {
        let guard = guard();
        assert!(matches!(
            guard.login(&login("admin", "nope")),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            guard.login(&login("ghost", "admin-pass")),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_non_staff_cannot_login() {
        assert!(matches!(
            guard().login(&login("viewer", "viewer-pass")),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let guard = guard();
        assert!(matches!(
            guard.authorize(&HeaderMap::new()),
            Err(AuthError::AuthenticationRequired)
        ));
        assert!(matches!(
            guard.authorize(&headers_with("Basic YWRtaW46YWRtaW4=")),
            Err(AuthError::AuthenticationRequired)
        ));
        assert!(matches!(
            guard.authorize(&headers_with("Bearer garbage")),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_token_for_removed_account_is_forbidden() {
        let token = guard().login(&login("admin", "admin-pass")).unwrap();
        let other = AuthGuard::with_secret(Vec::new(), "guard-test-secret");
        assert!(matches!(
            other.authorize(&headers_with(&format!("Bearer {}", token.access_token))),
            Err(AuthError::Forbidden)
        ));
    }
}

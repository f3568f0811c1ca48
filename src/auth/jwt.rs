//! # JWT Token Management
//!
//! Stateless bearer tokens for admin sessions. Validation needs no store
//! lookup; the staff flag travels in the claims.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};

/// JWT claims for access tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Subject (username)
    pub sub: String,

    /// Whether the account may use admin endpoints
    pub is_staff: bool,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing
    pub secret: String,

    /// Access token lifetime
    pub access_token_ttl: Duration,

    /// Issuer identifier
    pub issuer: String,

    /// Audience identifier
    pub audience: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, access_token_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_token_ttl,
            issuer: "geolayers".to_string(),
            audience: "geolayers-admin".to_string(),
        }
    }
}

/// Token handed back on login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until expiry
    pub expires_in: i64,
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a new JWT manager with the given configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue an access token
    pub fn issue(&self, username: &str, is_staff: bool) -> AuthResult<TokenResponse> {
        let now = Utc::now();
        let exp = now + self.config.access_token_ttl;

        let claims = AdminClaims {
            sub: username.to_string(),
            is_staff,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.config.access_token_ttl.num_seconds(),
        })
    }

    /// Validate an access token and extract claims
    pub fn validate(&self, token: &str) -> AuthResult<AdminClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<AdminClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(secret: &str) -> JwtManager {
        JwtManager::new(JwtConfig::new(secret, Duration::minutes(15)))
    }

    #[test]
    fn test_issue_and_validate() {
        let jwt = manager("test-secret");
        let token = jwt.issue("admin", true).unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 900);

        let claims = jwt.validate(&token.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.is_staff);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = manager("one").issue("admin", true).unwrap();
        let result = manager("two").validate(&token.access_token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let jwt = JwtManager::new(JwtConfig::new("s", Duration::minutes(-5)));
        let token = jwt.issue("admin", true).unwrap();
        assert!(matches!(jwt.validate(&token.access_token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(manager("s").validate("not.a.jwt"), Err(AuthError::MalformedToken)));
    }
}

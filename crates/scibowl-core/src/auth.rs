//! Password hashing and bearer tokens.
//!
//! Passwords are stored as Argon2id PHC strings. Sessions are stateless
//! HS256 JWTs: a short-lived access token and a long-lived refresh token,
//! told apart by the `kind` claim so one can never stand in for the other.

use std::sync::LazyLock;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use scibowl_types::{TokenPair, UserId};

use crate::config::AuthConfig;

/// Authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hash(String),

    /// The token is malformed, expired, or signed with another key.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// A token of the other kind was presented.
    #[error("Expected a {expected} token")]
    WrongKind {
        /// The kind that was required.
        expected: TokenKind,
    },

    /// The token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Hash a password into an Argon2id PHC string with a random salt.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

/// Check a password against a stored PHC string. Malformed hashes never
/// verify.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Hash verified when a login names no account, so a miss costs as much
/// as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("scibowl-no-such-account").ok());

/// Check a login attempt against the account's stored hash, or `None` when
/// the username matched nothing. A miss still runs one Argon2 verification
/// and always fails.
///
/// CPU-bound; async callers should run it on a blocking thread.
pub fn check_credentials(plain: &str, stored: Option<&str>) -> bool {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(plain, dummy);
            }
            false
        }
    }
}

/// Which of the two token flavors a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Authorizes API calls.
    Access,
    /// Exchanges for a new access token.
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => f.write_str("access"),
            Self::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: u32,
    /// Token flavor.
    pub kind: TokenKind,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signs and verifies bearer tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Build an issuer from a secret and explicit lifetimes.
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Build an issuer from the `auth` config section.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::minutes(config.access_token_minutes),
            Duration::days(config.refresh_token_days),
        )
    }

    /// Sign a token of `kind` for `user`.
    pub fn issue(&self, user: UserId, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let expires = now.checked_add_signed(ttl).unwrap_or(now);
        let claims = Claims {
            sub: user.into_inner(),
            kind,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| AuthError::Signing(err.to_string()))
    }

    /// Sign an access/refresh pair for `user`.
    pub fn issue_pair(&self, user: UserId) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access: self.issue(user, TokenKind::Access)?,
            refresh: self.issue(user, TokenKind::Refresh)?,
        })
    }

    /// Verify `token` and require it to be of kind `expected`.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<UserId, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|err| {
                tracing::debug!(error = %err, "rejected bearer token");
                AuthError::InvalidToken
            })?;
        if data.claims.kind != expected {
            return Err(AuthError::WrongKind { expected });
        }
        Ok(UserId::new(data.claims.sub))
    }

    /// Exchange a refresh token for a fresh access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let user = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue(user, TokenKind::Access)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(60), Duration::days(7))
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("polonium84").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("polonium84", &hash));
        assert!(!verify_password("radium88", &hash));
    }

    #[test]
    fn unknown_account_never_verifies() {
        let hash = hash_password("polonium84").unwrap();
        assert!(check_credentials("polonium84", Some(&hash)));
        assert!(!check_credentials("radium88", Some(&hash)));
        assert!(!check_credentials("polonium84", None));
        assert!(!check_credentials("scibowl-no-such-account", None));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn access_token_round_trip() {
        let issuer = issuer();
        let pair = issuer.issue_pair(UserId::new(7)).unwrap();
        assert_eq!(
            issuer.verify(&pair.access, TokenKind::Access).unwrap(),
            UserId::new(7)
        );
    }

    #[test]
    fn kinds_are_not_interchangeable() {
        let issuer = issuer();
        let pair = issuer.issue_pair(UserId::new(7)).unwrap();
        assert!(matches!(
            issuer.verify(&pair.refresh, TokenKind::Access),
            Err(AuthError::WrongKind { .. })
        ));
        assert!(matches!(
            issuer.refresh(&pair.access),
            Err(AuthError::WrongKind { .. })
        ));
    }

    #[test]
    fn refresh_issues_access() {
        let issuer = issuer();
        let pair = issuer.issue_pair(UserId::new(3)).unwrap();
        let access = issuer.refresh(&pair.refresh).unwrap();
        assert_eq!(
            issuer.verify(&access, TokenKind::Access).unwrap(),
            UserId::new(3)
        );
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let other = TokenIssuer::new("other-secret", Duration::minutes(60), Duration::days(7));
        let token = other.issue(UserId::new(1), TokenKind::Access).unwrap();
        assert!(matches!(
            issuer().verify(&token, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let stale = TokenIssuer::new("test-secret", Duration::hours(-2), Duration::days(7));
        let token = stale.issue(UserId::new(1), TokenKind::Access).unwrap();
        assert!(matches!(
            issuer().verify(&token, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }
}

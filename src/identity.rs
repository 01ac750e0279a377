//! Credential verification.
//!
//! The access service only ever needs one thing from the identity layer: turn
//! a bearer credential into a verified subject identifier, or reject it. That
//! contract is the [`IdentityVerifier`] trait; the default implementation
//! checks HS256 JWTs. Token issuance is out of scope for this service, but a
//! [`sign`] helper exists so operators and tests can mint credentials.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// The credential could not be resolved to a subject.
#[derive(Debug, thiserror::Error)]
#[error("invalid credential")]
pub struct InvalidCredential;

/// Resolves a bearer credential to the authenticated subject's identifier.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<String, InvalidCredential>;
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's opaque identifier.
    pub sub: String,
    pub username: String,
    /// Expiration timestamp.
    pub exp: usize,
}

/// HS256 JWT verifier backed by a shared secret.
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, credential: &str) -> Result<String, InvalidCredential> {
        let data = decode::<Claims>(
            credential,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| InvalidCredential)?;
        Ok(data.claims.sub)
    }
}

/// Sign a new JWT for a user.
pub fn sign(user_id: &str, username: &str, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: user_id.to_owned(),
        username: username.to_owned(),
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

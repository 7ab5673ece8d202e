//! Admin token generation and validation.
//!
//! Tokens are HS256-signed JWTs carrying [`AdminClaims`]. There is a single
//! admin identity, so `sub` is always [`ADMIN_SUBJECT`].

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{parse_or, ConfigError};

/// Subject claim of every admin token.
pub const ADMIN_SUBJECT: &str = "admin";

/// Default token lifetime in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Length of the generated secret when `JWT_SECRET` is unset.
const EPHEMERAL_SECRET_LEN: usize = 64;

/// JWT claims embedded in every admin token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminClaims {
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier, logged on login for audit.
    pub jti: String,
}

/// Configuration for token signing.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    pub expiry_hours: i64,
    /// `true` when the secret was generated for this process only.
    pub ephemeral_secret: bool,
}

impl JwtConfig {
    /// Build from a variable lookup.
    ///
    /// | Env Var            | Required | Default              |
    /// |--------------------|----------|----------------------|
    /// | `JWT_SECRET`       | no       | random, per process  |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`                 |
    pub fn from_lookup<F>(var: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expiry_hours = parse_or(var, "JWT_EXPIRY_HOURS", DEFAULT_EXPIRY_HOURS)?;
        if expiry_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRY_HOURS",
                value: expiry_hours.to_string(),
            });
        }

        let (secret, ephemeral_secret) = match var("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (random_secret(), true),
        };

        Ok(Self {
            secret,
            expiry_hours,
            ephemeral_secret,
        })
    }

    /// Token lifetime in seconds.
    pub fn expiry_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }
}

fn random_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(EPHEMERAL_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// Issue a new admin token. Returns the encoded token and its claims.
pub fn generate_admin_token(
    config: &JwtConfig,
) -> Result<(String, AdminClaims), jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = AdminClaims {
        sub: ADMIN_SUBJECT.to_string(),
        exp: now + config.expiry_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, claims))
}

/// Validate and decode an admin token.
///
/// Signature and expiry are checked by `jsonwebtoken`; a token for any
/// subject other than [`ADMIN_SUBJECT`] is rejected as well.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AdminClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.sub = Some(ADMIN_SUBJECT.to_string());

    let token_data = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

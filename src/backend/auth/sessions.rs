/**
 * Session Tokens
 *
 * Verifies the JWT bearer tokens issued by the authentication service.
 * Issuing tokens is not this server's job; it only checks the signature and
 * expiry and reads the user id from `sub`.
 */

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    #[serde(default)]
    pub iat: u64,
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - JWT token string
/// * `secret` - HMAC secret shared with the issuer
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Extract the user ID from a verified token
pub fn get_user_id_from_token(token: &str, secret: &str) -> Result<Uuid, String> {
    let claims = verify_token(token, secret)
        .map_err(|e| format!("Token verification failed: {}", e))?;
    Uuid::parse_str(&claims.sub)
        .map_err(|e| format!("Invalid user ID in token: {}", e))
}

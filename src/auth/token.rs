use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Represents the claims encoded within a session token.
///
/// A decoded token is never trusted on its own: the middleware additionally
/// requires the token string to be present in the `user_tokens` table, so a
/// logged-out token stops working before it expires.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token, the user's unique identifier.
    pub sub: i32,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
    /// Per-issuance nonce. Two logins in the same second would otherwise sign
    /// identical claims and produce indistinguishable tokens, breaking
    /// per-session logout.
    pub jti: Uuid,
}

/// Signs a fresh session token for a given user ID.
///
/// The token is set to expire in 24 hours.
/// It requires the `JWT_SECRET` environment variable to be set for signing.
///
/// # Arguments
/// * `user_id` - The ID of the user for whom the token is generated.
///
/// # Returns
/// A `Result` containing the token string if successful.
/// Returns `AppError::Internal` if `JWT_SECRET` is not set or encoding fails.
pub fn generate_token(user_id: i32) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        exp: expiration,
        jti: Uuid::new_v4(),
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a session token string and decodes its claims.
///
/// It requires the `JWT_SECRET` environment variable to be set for verifying
/// the signature. Default validation checks are applied (signature, expiry).
///
/// # Arguments
/// * `token` - The token string to verify.
///
/// # Returns
/// A `Result` containing the decoded `Claims` if the token is valid.
/// Returns `AppError::Internal` if `JWT_SECRET` is not set.
/// Returns `AppError::Unauthorized` if the token is malformed, its signature
/// is invalid, or it has expired.
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Signs a fresh token for `user_id` and appends it to the user's token
/// sequence in storage. Used by both signup and login; every call produces a
/// new row, so a user may hold several live sessions at once.
pub async fn issue_token(pool: &PgPool, user_id: i32) -> Result<String, AppError> {
    let token = generate_token(user_id)?;

    sqlx::query("INSERT INTO user_tokens (user_id, kind, token) VALUES ($1, 'auth', $2)")
        .bind(user_id)
        .bind(&token)
        .execute(pool)
        .await?;

    Ok(token)
}

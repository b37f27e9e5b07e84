use anyhow::Result;
use chrono::{Duration, Utc};
use common::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub uid: i32,                   // User ID
    pub student_id: Option<String>, // NULL until registration links one
    pub role: Role,
    pub exp: usize, // Expiration timestamp
}

fn sign(
    user_id: i32,
    student_id: Option<&str>,
    role: Role,
    secret: &str,
    ttl: Duration,
) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(ttl)
        .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?
        .timestamp();

    let claims = Claims {
        uid: user_id,
        student_id: student_id.map(str::to_owned),
        role,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Sign a short-lived access token.
pub fn sign_access(
    user_id: i32,
    student_id: Option<&str>,
    role: Role,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String> {
    sign(
        user_id,
        student_id,
        role,
        secret,
        Duration::minutes(ttl_minutes),
    )
}

/// Sign a long-lived refresh token. Same claims, longer expiry.
pub fn sign_refresh(
    user_id: i32,
    student_id: Option<&str>,
    role: Role,
    secret: &str,
    ttl_days: i64,
) -> Result<String> {
    sign(user_id, student_id, role, secret, Duration::days(ttl_days))
}

/// Verify and decode a token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

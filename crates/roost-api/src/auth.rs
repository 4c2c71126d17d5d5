use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::info;

use roost_db::models::NewSession;
use roost_db::queries;

pub const API_KEY_VALIDITY_DAYS: i64 = 365;

/// 256 random bits, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Sessions are stored by digest so a leaked table can't be replayed.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issue a new session for `user_id`. Returns the secret token and its
/// expiry; the token is not recoverable afterwards.
pub fn create_session(
    conn: &Connection,
    user_id: i64,
    long_lived: bool,
    is_api_key: bool,
    duration: Duration,
) -> Result<(String, DateTime<Utc>)> {
    let token = generate_token();
    let created = Utc::now();
    let expiry = created + duration;

    let session_id = queries::insert_session(
        conn,
        &NewSession {
            token_hash: &hash_token(&token),
            user_id,
            created,
            expiry,
            long_lived,
            is_api_key,
        },
    )?;

    info!(session_id, user_id, long_lived, is_api_key, "Issued session expiring {}", expiry);
    Ok((token, expiry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_and_differs_from_token() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
    }
}

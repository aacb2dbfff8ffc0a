//! Sealed session tokens.
//!
//! A sealed token is `v1.` followed by base64url(nonce || ciphertext || tag),
//! encrypted with AES-256-GCM under a key derived from the session password.
//! The JSON helpers wrap the payload with an expiry so a stolen cookie stops
//! working once its TTL has passed, independently of the cookie's Max-Age.

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Shortest accepted session password.
pub const MIN_PASSWORD_LEN: usize = 32;

/// Default lifetime of a sealed session (14 days).
pub const DEFAULT_TTL_SECS: i64 = 14 * 24 * 60 * 60;

const TOKEN_PREFIX: &str = "v1.";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum SealError {
    #[error("session password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("malformed sealed token")]
    Malformed,

    #[error("sealed token failed authentication")]
    Tampered,

    #[error("sealed token expired")]
    Expired,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("encryption failed")]
    Encryption,
}

/// Seals and unseals opaque byte payloads.
pub trait SessionSealer: Send + Sync {
    fn seal(&self, plaintext: &[u8]) -> Result<String, SealError>;
    fn unseal(&self, token: &str) -> Result<Vec<u8>, SealError>;
}

/// AES-256-GCM sealer keyed by SHA-256 of the session password.
#[derive(Clone)]
pub struct AesGcmSealer {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for AesGcmSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmSealer").finish_non_exhaustive()
    }
}

impl AesGcmSealer {
    pub fn from_password(password: &str) -> Result<Self, SealError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SealError::PasswordTooShort);
        }
        let key = Sha256::digest(password.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| SealError::Encryption)?;
        Ok(Self { cipher })
    }
}

impl SessionSealer for AesGcmSealer {
    fn seal(&self, plaintext: &[u8]) -> Result<String, SealError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| SealError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(sealed)))
    }

    fn unseal(&self, token: &str) -> Result<Vec<u8>, SealError> {
        let body = token.strip_prefix(TOKEN_PREFIX).ok_or(SealError::Malformed)?;
        let data = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| SealError::Malformed)?;
        if data.len() < NONCE_LEN + TAG_LEN {
            return Err(SealError::Malformed);
        }

        let nonce = Nonce::from_slice(&data[..NONCE_LEN]);
        self.cipher
            .decrypt(nonce, &data[NONCE_LEN..])
            .map_err(|_| SealError::Tampered)
    }
}

// ---------------------------------------------------------------------------
// JSON payloads with expiry
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    payload: T,
    /// Unix seconds after which the token is rejected.
    exp: i64,
}

/// Serialize `value`, stamp it with `now + ttl`, and seal it.
pub fn seal_json<T: Serialize>(
    sealer: &dyn SessionSealer,
    value: &T,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String, SealError> {
    let envelope = Envelope {
        payload: value,
        exp: (now + ttl).timestamp(),
    };
    let bytes = serde_json::to_vec(&envelope)?;
    sealer.seal(&bytes)
}

/// Unseal a token produced by [`seal_json`], rejecting it once expired.
pub fn unseal_json<T: DeserializeOwned>(
    sealer: &dyn SessionSealer,
    token: &str,
    now: DateTime<Utc>,
) -> Result<T, SealError> {
    let bytes = sealer.unseal(token)?;
    let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
    if now.timestamp() >= envelope.exp {
        return Err(SealError::Expired);
    }
    Ok(envelope.payload)
}

//! Credential signer for privileged endpoints.
//!
//! Each call draws a fresh random salt and reads the wall clock, then computes
//! an HMAC-SHA256 over the identity claims `(publicId, username, role, salt)`
//! with the shared secret. The server recomputes the same MAC to authenticate
//! the caller without a session store.
//!
//! The MAC input is the claims serialized as compact JSON with the keys in
//! exactly that order, e.g.
//! `{"publicId":"p-1","username":"ada","role":"ADMIN","salt":"…"}`.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use sha2::Sha256;
use stakeadmin_domain::constants::{HEADER_HASH, HEADER_SALT, HEADER_TIMESTAMP};
use stakeadmin_domain::{SaltFormat, SignerConfig, StakeAdminError};
use thiserror::Error;

use crate::time::{Clock, SystemClock};

type HmacSha256 = Hmac<Sha256>;

/// Signing faults. Never retried; propagated to the caller of the signer.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("signer secret is empty")]
    EmptySecret,

    #[error("salt length must be at least one byte")]
    InvalidSaltLength,

    #[error("random source unavailable: {0}")]
    Entropy(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("failed to encode claims: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<SignerError> for StakeAdminError {
    fn from(err: SignerError) -> Self {
        Self::Signing(err.to_string())
    }
}

/// Source of salt bytes
pub trait SaltSource: Send + Sync {
    /// Fill `buf` completely
    fn fill(&self, buf: &mut [u8]) -> Result<(), SignerError>;
}

/// Operating-system entropy
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill(&self, buf: &mut [u8]) -> Result<(), SignerError> {
        OsRng.try_fill_bytes(buf).map_err(|e| SignerError::Entropy(e.to_string()))
    }
}

/// Repeats a fixed byte pattern; for reproducible signatures.
#[derive(Debug, Clone)]
pub struct FixedSalt(Vec<u8>);

impl FixedSalt {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }
}

impl SaltSource for FixedSalt {
    fn fill(&self, buf: &mut [u8]) -> Result<(), SignerError> {
        if self.0.is_empty() {
            return Err(SignerError::InvalidSaltLength);
        }
        for (dst, src) in buf.iter_mut().zip(self.0.iter().cycle()) {
            *dst = *src;
        }
        Ok(())
    }
}

/// Identity claims covered by the signature, in MAC input order
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedClaims<'a> {
    pub public_id: &'a str,
    pub username: &'a str,
    pub role: &'a str,
    pub salt: &'a str,
}

/// Headers attached to a signed request. Recomputed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaderSet {
    pub salt: String,
    /// Milliseconds since the Unix epoch, as a decimal string
    pub timestamp: String,
    /// Base64 HMAC-SHA256
    pub hash: String,
}

impl SignedHeaderSet {
    /// Header name/value pairs
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            (HEADER_SALT, self.salt.as_str()),
            (HEADER_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_HASH, self.hash.as_str()),
        ]
    }
}

/// Signs identity claims with the configured secret
#[derive(Clone)]
pub struct CredentialSigner {
    config: SignerConfig,
    salts: Arc<dyn SaltSource>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CredentialSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSigner").field("config", &self.config).finish_non_exhaustive()
    }
}

impl CredentialSigner {
    /// Create a signer using OS entropy and the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or the salt length is zero.
    pub fn new(config: SignerConfig) -> Result<Self, SignerError> {
        if config.secret.is_empty() {
            return Err(SignerError::EmptySecret);
        }
        if config.salt_bytes == 0 {
            return Err(SignerError::InvalidSaltLength);
        }
        Ok(Self { config, salts: Arc::new(OsSaltSource), clock: Arc::new(SystemClock) })
    }

    pub fn with_salt_source(mut self, salts: impl SaltSource + 'static) -> Self {
        self.salts = Arc::new(salts);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Produce the `salt`, `X-Timestamp` and `hash` header values.
    ///
    /// # Errors
    ///
    /// Returns an error if the salt cannot be drawn or the MAC fails.
    pub fn sign(
        &self,
        public_id: &str,
        username: &str,
        role: &str,
    ) -> Result<SignedHeaderSet, SignerError> {
        let salt = self.generate_salt()?;
        let timestamp = self.clock.millis_since_epoch().to_string();
        let hash = self.signature(&SignedClaims { public_id, username, role, salt: &salt })?;
        Ok(SignedHeaderSet { salt, timestamp, hash })
    }

    /// Base64 HMAC-SHA256 of the claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be encoded.
    pub fn signature(&self, claims: &SignedClaims<'_>) -> Result<String, SignerError> {
        let mac = self.mac_over(claims)?;
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Check a received header set against the claims, in constant time.
    pub fn verify(
        &self,
        public_id: &str,
        username: &str,
        role: &str,
        headers: &SignedHeaderSet,
    ) -> bool {
        let Ok(expected) = BASE64.decode(&headers.hash) else {
            return false;
        };
        let claims = SignedClaims { public_id, username, role, salt: &headers.salt };
        match self.mac_over(&claims) {
            Ok(mac) => mac.verify_slice(&expected).is_ok(),
            Err(_) => false,
        }
    }

    fn mac_over(&self, claims: &SignedClaims<'_>) -> Result<HmacSha256, SignerError> {
        let message = serde_json::to_vec(claims)?;
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        mac.update(&message);
        Ok(mac)
    }

    fn generate_salt(&self) -> Result<String, SignerError> {
        let mut bytes = vec![0u8; self.config.salt_bytes];
        self.salts.fill(&mut bytes)?;
        Ok(match self.config.salt_format {
            SaltFormat::Base64 => BASE64.encode(&bytes),
            SaltFormat::Hex => hex::encode(&bytes),
        })
    }
}

/// One-shot signing with OS entropy and the system clock.
///
/// # Errors
///
/// Propagates [`SignerError`] for an unusable config or a failed MAC.
pub fn build_signed_headers(
    public_id: &str,
    username: &str,
    role: &str,
    config: &SignerConfig,
) -> Result<SignedHeaderSet, SignerError> {
    CredentialSigner::new(config.clone())?.sign(public_id, username, role)
}

//! Correlation ids attached to every outbound request as `X-Request-Id`.

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use stakeadmin_domain::constants::REQUEST_ID_BYTES;
use tracing::debug;

const FALLBACK_ID_LEN: usize = 12;

/// Generate a 16-byte, hex-encoded correlation id.
///
/// Falls back to a shorter pseudo-random alphanumeric id when the operating
/// system's entropy source is unavailable.
pub fn generate_request_id() -> String {
    let mut bytes = [0u8; REQUEST_ID_BYTES];
    match OsRng.try_fill_bytes(&mut bytes) {
        Ok(()) => hex::encode(bytes),
        Err(err) => {
            debug!(error = %err, "secure random source unavailable, using fallback request id");
            fallback_request_id()
        }
    }
}

fn fallback_request_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FALLBACK_ID_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn is_request_id(value: &str) -> bool {
        value.len() == REQUEST_ID_BYTES * 2 && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    #[test]
    fn test_request_id_is_32_hex_chars() {
        let id = generate_request_id();
        assert_eq!(id.len(), 32);
        assert!(is_request_id(&id));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let ids: HashSet<String> = (0..256).map(|_| generate_request_id()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn test_fallback_id_is_lowercase_alphanumeric() {
        let id = fallback_request_id();
        assert_eq!(id.len(), FALLBACK_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert!(!is_request_id(&id));
    }
}

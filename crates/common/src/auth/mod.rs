//! Request authentication primitives
//!
//! - [`signer`]: salted HMAC signature over identity claims for privileged
//!   endpoints (`salt`, `X-Timestamp`, `hash` headers)
//! - [`token_store`]: the bearer token, cached in memory and mirrored to
//!   persistent storage

pub mod signer;
pub mod token_store;

pub use signer::{
    build_signed_headers, CredentialSigner, FixedSalt, OsSaltSource, SaltSource, SignedClaims,
    SignedHeaderSet, SignerError,
};
pub use token_store::TokenStore;

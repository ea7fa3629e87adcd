//! Supported padding schemes.

use alloc::vec::Vec;
use rand_core::RngCore;

use crate::errors::Result;
use crate::key::{RsaPrivateKey, RsaPublicKey};

/// An encryption and decryption padding scheme.
pub trait PaddingScheme {
    /// Pads and encrypts `msg` under `pub_key`, returning a ciphertext the
    /// same length as the modulus.
    fn encrypt(self, rng: &mut dyn RngCore, pub_key: &RsaPublicKey, msg: &[u8]) -> Result<Vec<u8>>;

    /// Decrypts `ciphertext` under `priv_key` and strips the padding.
    ///
    /// `rng` is used to blind the underlying RSA decryption; pass `None` to
    /// disable blinding.
    fn decrypt(
        self,
        rng: Option<&mut dyn RngCore>,
        priv_key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;
}

/// A digital signature scheme.
pub trait SignatureScheme {
    /// Signs `hashed`, the output of hashing the message with this scheme's
    /// hash function, returning a signature the same length as the modulus.
    ///
    /// `rng` is used to blind the underlying RSA decryption; pass `None` to
    /// disable blinding.
    fn sign(
        self,
        rng: Option<&mut dyn RngCore>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>>;

    /// Verifies a signature over `hashed`.
    ///
    /// Returns `Ok(())` if the signature is valid and an opaque error
    /// otherwise; the error never distinguishes *why* verification failed.
    fn verify(self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()>;
}

//! PKCS#1 v1.5 encryption and signatures, as described in
//! [RFC 8017 §7.2 and §8.2].
//!
//! Signing operates directly on caller-supplied, already-hashed bytes: no
//! ASN.1 `DigestInfo` prefix identifying the hash algorithm is prepended,
//! so signatures produced here are not directly interoperable with
//! implementations that require one.
//!
//! [RFC 8017 §7.2 and §8.2]: https://datatracker.ietf.org/doc/html/rfc8017

use alloc::vec::Vec;

use digest::Digest;
use num_bigint::BigUint;
use rand_core::RngCore;
use zeroize::Zeroizing;

use crate::algorithms::pad::{uint_to_be_pad, uint_to_zeroizing_be_pad};
use crate::algorithms::pkcs1v15::{
    pkcs1v15_decrypt_unpad, pkcs1v15_encrypt_pad, pkcs1v15_sign_pad, pkcs1v15_sign_unpad,
};
use crate::algorithms::rsa::{rsa_decrypt, rsa_decrypt_and_check, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::key::{self, RsaPrivateKey, RsaPublicKey};
use crate::traits::{PaddingScheme, PrivateKeyParts, PublicKeyParts, SignatureScheme};

/// Encryption and decryption using PKCS#1 v1.5 padding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pkcs1v15Encrypt;

impl PaddingScheme for Pkcs1v15Encrypt {
    fn encrypt(self, rng: &mut dyn RngCore, pub_key: &RsaPublicKey, msg: &[u8]) -> Result<Vec<u8>> {
        key::check_public(pub_key)?;

        let em = pkcs1v15_encrypt_pad(rng, msg, pub_key.size())?;
        let m = BigUint::from_bytes_be(&em);
        let c = rsa_encrypt(pub_key, &m)?;
        uint_to_be_pad(c, pub_key.size())
    }

    fn decrypt(
        self,
        rng: Option<&mut dyn RngCore>,
        priv_key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        if ciphertext.len() != priv_key.size() || priv_key.size() < 11 {
            return Err(Error::Verification);
        }

        let c = BigUint::from_bytes_be(ciphertext);
        let m = rsa_decrypt(rng, priv_key, &c)?;
        let em = Zeroizing::new(uint_to_be_pad(m, priv_key.size())?);

        pkcs1v15_decrypt_unpad(&em, priv_key.size()).ok_or(Error::Verification)
    }
}

/// `RSASSA-PKCS1-v1_5`: digital signatures using PKCS#1 v1.5 padding.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pkcs1v15Sign {
    /// Expected length of `hashed`, if known. `None` accepts any length,
    /// for signing data that isn't the output of a hash function — not
    /// advisable except for interoperability.
    hash_len: Option<usize>,
}

impl Pkcs1v15Sign {
    /// Create new PKCS#1 v1.5 padding that only accepts a `hashed` of the
    /// length `D` produces.
    pub fn new<D: Digest>() -> Self {
        Self {
            hash_len: Some(<D as Digest>::output_size()),
        }
    }

    /// Create new PKCS#1 v1.5 padding that signs `hashed` directly,
    /// whatever its length.
    pub fn new_unprefixed() -> Self {
        Self { hash_len: None }
    }
}

impl SignatureScheme for Pkcs1v15Sign {
    fn sign(
        self,
        rng: Option<&mut dyn RngCore>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>> {
        if let Some(hash_len) = self.hash_len {
            if hashed.len() != hash_len {
                return Err(Error::InputNotHashed);
            }
        }

        let em = pkcs1v15_sign_pad(hashed, priv_key.size())?;
        let m = BigUint::from_bytes_be(&em);
        let s = rsa_decrypt_and_check(rng, priv_key, &m)?;
        uint_to_be_pad(s, priv_key.size())
    }

    fn verify(self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()> {
        if let Some(hash_len) = self.hash_len {
            if hashed.len() != hash_len {
                return Err(Error::InputNotHashed);
            }
        }

        if sig.len() != pub_key.size() {
            return Err(Error::Verification);
        }

        let s = BigUint::from_bytes_be(sig);
        if s >= *pub_key.n() {
            return Err(Error::Verification);
        }

        let m = rsa_encrypt(pub_key, &s)?;
        let em = uint_to_be_pad(m, pub_key.size())?;

        pkcs1v15_sign_unpad(hashed, &em, pub_key.size())
    }
}

//! Encryption and Decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;

use digest::{Digest, FixedOutputReset};
use num_bigint::BigUint;
use rand_core::RngCore;
use zeroize::Zeroizing;

use crate::algorithms::oaep::{oaep_decrypt_digest, oaep_encrypt_digest};
use crate::algorithms::pad::uint_to_be_pad;
use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::key::{self, RsaPrivateKey, RsaPublicKey};
use crate::traits::{PaddingScheme, PublicKeyParts};

/// Encryption and decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).
///
/// - `D` hashes the label. The maximum possible plaintext length is
///   `k - 2 * h_len - 2`, where `k` is the size of the RSA modulus in
///   bytes.
/// - `MGD` is the hash function used in [MGF1](https://datatracker.ietf.org/doc/html/rfc8017#appendix-B.2).
///   Defaults to `D`, but can be chosen independently, as e.g. the
///   Android Keystore does (SHA-1 MGF1 paired with a caller-chosen label
///   digest).
/// - `label` is optional data associated with the message.
pub struct Oaep<D, MGD = D> {
    /// Optional label.
    pub label: Option<Vec<u8>>,
    _digest: PhantomData<D>,
    _mgf_digest: PhantomData<MGD>,
}

impl<D, MGD> Clone for Oaep<D, MGD> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            _digest: PhantomData,
            _mgf_digest: PhantomData,
        }
    }
}

impl<D, MGD> fmt::Debug for Oaep<D, MGD> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Oaep").field("label", &self.label).finish()
    }
}

impl<D: Digest> Oaep<D, D> {
    /// Create a new OAEP padding using `D` as the hash function for both
    /// the (empty) label and MGF1.
    pub fn new() -> Self {
        Self {
            label: None,
            _digest: PhantomData,
            _mgf_digest: PhantomData,
        }
    }

    /// Create a new OAEP padding with an associated `label`, using `D` for
    /// both the label and MGF1.
    pub fn new_with_label(label: impl Into<Vec<u8>>) -> Self {
        Self {
            label: Some(label.into()),
            _digest: PhantomData,
            _mgf_digest: PhantomData,
        }
    }
}

impl<D: Digest> Default for Oaep<D, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest, MGD: Digest + FixedOutputReset> Oaep<D, MGD> {
    /// Create a new OAEP padding using `D` for the (empty) label and `MGD`
    /// for MGF1.
    pub fn new_with_mgf_hash() -> Self {
        Self {
            label: None,
            _digest: PhantomData,
            _mgf_digest: PhantomData,
        }
    }

    /// Create a new OAEP padding with an associated `label`, using `D` for
    /// the label and `MGD` for MGF1.
    pub fn new_with_mgf_hash_and_label(label: impl Into<Vec<u8>>) -> Self {
        Self {
            label: Some(label.into()),
            _digest: PhantomData,
            _mgf_digest: PhantomData,
        }
    }
}

impl<D: Digest, MGD: Digest + FixedOutputReset> PaddingScheme for Oaep<D, MGD> {
    fn encrypt(self, rng: &mut dyn RngCore, pub_key: &RsaPublicKey, msg: &[u8]) -> Result<Vec<u8>> {
        key::check_public(pub_key)?;

        let em = oaep_encrypt_digest::<D, MGD>(rng, msg, self.label.as_deref(), pub_key.size())?;
        let m = Zeroizing::new(BigUint::from_bytes_be(&em));
        let c = rsa_encrypt(pub_key, &m)?;
        uint_to_be_pad(c, pub_key.size())
    }

    fn decrypt(
        self,
        rng: Option<&mut dyn RngCore>,
        priv_key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        if ciphertext.len() != priv_key.size() {
            return Err(Error::Verification);
        }

        let c = BigUint::from_bytes_be(ciphertext);
        let m = rsa_decrypt(rng, priv_key, &c)?;
        let em = Zeroizing::new(uint_to_be_pad(m, priv_key.size())?);

        oaep_decrypt_digest::<D, MGD>(&em, self.label.as_deref()).ok_or(Error::Verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sha1::Sha1;
    use sha2::Sha256;

    fn test_key() -> RsaPrivateKey {
        let p = BigUint::from_u64(16_777_259).unwrap();
        let q = BigUint::from_u64(16_777_183).unwrap();
        let e = BigUint::from_u64(65537).unwrap();
        RsaPrivateKey::from_p_q(p, q, e).unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_roundtrip() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([1; 32]);

        let msg = b"attack at dawn";
        let ct = pubkey.encrypt(&mut rng, Oaep::<Sha1>::new(), msg).unwrap();
        let pt = key.decrypt(Oaep::<Sha1>::new(), &ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn label_roundtrip() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([2; 32]);

        let msg = b"attack at dawn";
        let ct = pubkey
            .encrypt(&mut rng, Oaep::<Sha1>::new_with_label("context"), msg)
            .unwrap();
        let pt = key
            .decrypt(Oaep::<Sha1>::new_with_label("context"), &ct)
            .unwrap();
        assert_eq!(pt, msg);

        assert!(key.decrypt(Oaep::<Sha1>::new(), &ct).is_err());
    }

    #[test]
    fn independent_mgf_hash_roundtrip() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([5; 32]);

        let msg = b"hunter2";
        let ct = pubkey
            .encrypt(&mut rng, Oaep::<Sha256, Sha1>::new_with_mgf_hash(), msg)
            .unwrap();
        let pt = key
            .decrypt(Oaep::<Sha256, Sha1>::new_with_mgf_hash(), &ct)
            .unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn corrupted_ciphertext_rejected() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([6; 32]);

        let mut ct = pubkey
            .encrypt(&mut rng, Oaep::<Sha1>::new(), b"attack at dawn")
            .unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xff;
        assert!(key.decrypt(Oaep::<Sha1>::new(), &ct).is_err());
    }
}

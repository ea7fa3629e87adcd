//! Support for the [Probabilistic Signature Scheme] (PSS) a.k.a. RSASSA-PSS.
//!
//! Designed by Mihir Bellare and Phillip Rogaway. Specified in [RFC 8017 §8.1].
//!
//! [Probabilistic Signature Scheme]: https://en.wikipedia.org/wiki/Probabilistic_signature_scheme
//! [RFC 8017 §8.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.1

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Debug};
use core::marker::PhantomData;

use digest::{Digest, FixedOutputReset};
use num_bigint::BigUint;
use rand_core::RngCore;

use crate::algorithms::pad::uint_to_be_pad;
use crate::algorithms::pss::{emsa_pss_encode, emsa_pss_verify_digest};
use crate::algorithms::rsa::{rsa_decrypt_and_check, rsa_encrypt};
use crate::errors::{Error, Result};
use crate::key::{RsaPrivateKey, RsaPublicKey};
use crate::traits::{PrivateKeyParts, PublicKeyParts, SignatureScheme};

/// Digital signatures using PSS padding, as specified by `D` (the message
/// and MGF1 hash, shared per RFC 8017).
pub struct Pss<D> {
    /// Length of the random salt, in bytes.
    pub salt_len: usize,
    _digest: PhantomData<D>,
}

impl<D> Clone for Pss<D> {
    fn clone(&self) -> Self {
        Self {
            salt_len: self.salt_len,
            _digest: PhantomData,
        }
    }
}

impl<D> Debug for Pss<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pss").field("salt_len", &self.salt_len).finish()
    }
}

impl<D: Digest> Pss<D> {
    /// Creates a new PSS padding with a salt the same length as `D`'s
    /// output, the RFC 8017 recommendation.
    pub fn new() -> Self {
        Self {
            salt_len: <D as Digest>::output_size(),
            _digest: PhantomData,
        }
    }

    /// Creates a new PSS padding with an explicit salt length.
    pub fn new_with_salt_len(salt_len: usize) -> Self {
        Self {
            salt_len,
            _digest: PhantomData,
        }
    }
}

impl<D: Digest> Default for Pss<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest + FixedOutputReset> SignatureScheme for Pss<D> {
    fn sign(
        self,
        rng: Option<&mut dyn RngCore>,
        priv_key: &RsaPrivateKey,
        hashed: &[u8],
    ) -> Result<Vec<u8>> {
        // PSS always needs randomness for the salt; there is no
        // deterministic fallback.
        let rng = rng.ok_or(Error::BlindingFailed)?;

        let mut salt = vec![0u8; self.salt_len];
        rng.fill_bytes(&mut salt);

        let em_bits = priv_key.n().bits() as usize - 1;
        let em = emsa_pss_encode::<D>(hashed, em_bits, &salt)?;

        let m = BigUint::from_bytes_be(&em);
        let s = rsa_decrypt_and_check(Some(rng), priv_key, &m)?;
        uint_to_be_pad(s, priv_key.size())
    }

    fn verify(self, pub_key: &RsaPublicKey, hashed: &[u8], sig: &[u8]) -> Result<()> {
        if sig.len() != pub_key.size() {
            return Err(Error::Verification);
        }

        let s = BigUint::from_bytes_be(sig);
        if s >= *pub_key.n() {
            return Err(Error::Verification);
        }

        let m = rsa_encrypt(pub_key, &s)?;
        let em = uint_to_be_pad(m, pub_key.size())?;

        emsa_pss_verify_digest::<D>(hashed, &em, self.salt_len, pub_key.n().bits() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
    use sha1::{Digest as _, Sha1};

    fn test_key() -> RsaPrivateKey {
        use num_traits::FromPrimitive;
        let p = BigUint::from_u64(16_777_259).unwrap();
        let q = BigUint::from_u64(16_777_183).unwrap();
        let e = BigUint::from_u64(65537).unwrap();
        RsaPrivateKey::from_p_q(p, q, e).unwrap()
    }

    #[test]
    fn sign_then_verify_roundtrip() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([3; 32]);
        let hashed = Sha1::digest(b"message to sign");

        let sig = key
            .sign_with_rng(&mut rng, Pss::<Sha1>::new(), &hashed)
            .unwrap();
        pubkey.verify(Pss::<Sha1>::new(), &hashed, &sig).unwrap();
    }

    #[test]
    fn sign_without_rng_fails() {
        let key = test_key();
        let hashed = Sha1::digest(b"message to sign");
        assert_eq!(
            key.sign(Pss::<Sha1>::new(), &hashed),
            Err(Error::BlindingFailed)
        );
    }

    #[test]
    fn verify_rejects_tampered_signature() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([4; 32]);
        let hashed = Sha1::digest(b"message to sign");

        let mut sig = key
            .sign_with_rng(&mut rng, Pss::<Sha1>::new(), &hashed)
            .unwrap();
        let last = sig.len() - 1;
        sig[last] ^= 0xff;

        assert!(pubkey.verify(Pss::<Sha1>::new(), &hashed, &sig).is_err());
    }
}

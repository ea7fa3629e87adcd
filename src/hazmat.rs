//! Low-level, unpadded RSA primitives.
//!
//! ⚠️ These operate directly on the textbook RSA primitive with no padding
//! scheme applied. Textbook RSA is deterministic, malleable, and insecure
//! to use directly for encryption or signing — reach for [`crate::oaep`],
//! [`crate::pkcs1v15`] or [`crate::pss`] instead unless you are implementing
//! a padding scheme yourself.

use num_bigint::BigUint;
use rand_core::RngCore;

use crate::algorithms::rsa::{rsa_decrypt, rsa_decrypt_and_check, rsa_encrypt};
use crate::errors::Result;
use crate::key::{self, RsaPrivateKey, RsaPublicKey};
use crate::traits::PublicKeyParts;

/// Raw RSA encryption: `c = m^e mod n`. `m` must be in `[1, n)`.
pub fn encrypt(pub_key: &RsaPublicKey, m: &BigUint) -> Result<BigUint> {
    key::check_public(pub_key)?;
    rsa_encrypt(pub_key, m)
}

/// Raw RSA decryption: `m = c^d mod n`, accelerated by CRT. `c` must be in
/// `[1, n)`.
///
/// If `rng` is given, the computation is blinded to resist timing attacks
/// that try to recover `d` from the time taken by this operation.
pub fn decrypt(rng: Option<&mut dyn RngCore>, priv_key: &RsaPrivateKey, c: &BigUint) -> Result<BigUint> {
    rsa_decrypt(rng, priv_key, c)
}

/// As [`decrypt`], but also re-encrypts the result and checks it matches
/// `c`, guarding against CRT computation errors that can otherwise leak
/// the private key (the Boneh–DeMillo–Lipton fault attack).
pub fn decrypt_and_check(
    rng: Option<&mut dyn RngCore>,
    priv_key: &RsaPrivateKey,
    c: &BigUint,
) -> Result<BigUint> {
    rsa_decrypt_and_check(rng, priv_key, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    fn test_key() -> RsaPrivateKey {
        let p = BigUint::from_u64(16_777_259).unwrap();
        let q = BigUint::from_u64(16_777_183).unwrap();
        let e = BigUint::from_u64(65537).unwrap();
        RsaPrivateKey::from_p_q(p, q, e).unwrap()
    }

    #[test]
    fn raw_roundtrip() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let m = BigUint::from_u64(42).unwrap();

        let c = encrypt(&pubkey, &m).unwrap();
        let recovered = decrypt(None, &key, &c).unwrap();
        assert_eq!(recovered, m);
    }

    #[test]
    fn raw_roundtrip_blinded() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([8; 32]);
        let m = BigUint::from_u64(1234).unwrap();

        let c = encrypt(&pubkey, &m).unwrap();
        let recovered = decrypt_and_check(Some(&mut rng), &key, &c).unwrap();
        assert_eq!(recovered, m);
    }
}

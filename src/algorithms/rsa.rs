//! Core RSA primitive: modular exponentiation, CRT-accelerated private-key
//! operations and blinding.

use alloc::vec;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;

use crate::errors::{Error, Result};
use crate::key::mod_inverse;
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Raw RSA encryption of `m` with the public key. No padding is performed.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without
/// an appropriate padding or signature scheme. See the
/// [module-level documentation][crate::hazmat] for more information.
#[inline]
pub fn rsa_encrypt(key: &impl PublicKeyParts, m: &BigUint) -> Result<BigUint> {
    if m.is_zero() || m >= key.n() {
        return Err(Error::MessageTooLong);
    }
    Ok(m.modpow(key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding or error checking, using
/// the CRT to accelerate the private-key operation.
///
/// Performs RSA blinding if an `rng` is passed, which mitigates timing
/// side-channels against the private exponent.
///
/// # ☢️️ WARNING: HAZARDOUS API ☢️
///
/// Use this function with great care! Raw RSA should never be used without
/// an appropriate padding or signature scheme. See the
/// [module-level documentation][crate::hazmat] for more information.
pub fn rsa_decrypt(
    rng: Option<&mut dyn RngCore>,
    priv_key: &impl PrivateKeyParts,
    c: &BigUint,
) -> Result<BigUint> {
    if c.is_zero() || c >= priv_key.n() {
        return Err(Error::MessageTooLong);
    }
    if priv_key.n().is_zero() {
        return Err(Error::InvalidModulus);
    }

    let (c, unblinder) = match rng {
        Some(rng) => {
            let (blinded, unblinder) = blind(rng, priv_key, c)?;
            (blinded, Some(unblinder))
        }
        None => (c.clone(), None),
    };

    let (p, q) = priv_key.primes();
    let m = decrypt_crt(&c, p, q, priv_key.dp(), priv_key.dq(), priv_key.qinv());

    match unblinder {
        Some(unblinder) => Ok(unblind(priv_key, &m, &unblinder)),
        None => Ok(m),
    }
}

/// As [`rsa_decrypt`], additionally checking the CRT result against a
/// plain modular exponentiation with the public exponent. This guards
/// against CRT computation errors (e.g. induced by fault injection) that
/// could otherwise leak the private key.
pub fn rsa_decrypt_and_check(
    rng: Option<&mut dyn RngCore>,
    priv_key: &impl PrivateKeyParts,
    c: &BigUint,
) -> Result<BigUint> {
    let m = rsa_decrypt(rng, priv_key, c)?;

    // c == m^e mod n, verified with the public exponent.
    let check = m.modpow(priv_key.e(), priv_key.n());
    if &check != c {
        return Err(Error::InvalidModulus);
    }

    Ok(m)
}

/// Computes `m^d mod n` via the CRT: `m_p = c^dp mod p`, `m_q = c^dq mod q`,
/// recombined with the Garner formula `m = m_q + q * ((m_p - m_q) * qinv mod p)`.
fn decrypt_crt(
    c: &BigUint,
    p: &BigUint,
    q: &BigUint,
    dp: &BigUint,
    dq: &BigUint,
    qinv: &BigUint,
) -> BigUint {
    let m_p = c.modpow(dp, p);
    let m_q = c.modpow(dq, q);

    let diff = if m_p >= m_q {
        (&m_p - &m_q) % p
    } else {
        (p - ((&m_q - &m_p) % p)) % p
    };

    let h = (diff * qinv) % p;

    m_q + h * q
}

/// Returns the blinded `c`, along with the unblinding factor.
///
/// Blinding computes `c' = c * r^e mod n` for a random `r` coprime to `n`,
/// so that the private-key operation is performed on a value unrelated to
/// `c` from an attacker's perspective; the factor `r^-1` undoes the
/// blinding afterwards.
fn blind(
    rng: &mut dyn RngCore,
    key: &impl PublicKeyParts,
    c: &BigUint,
) -> Result<(BigUint, BigUint)> {
    let n = key.n();
    for _ in 0..16 {
        let r = random_biguint_below(rng, n);
        if r.is_zero() {
            continue;
        }
        let Some(rinv) = mod_inverse(&r, n) else {
            continue;
        };
        let blinded = (c * r.modpow(key.e(), n)) % n;
        return Ok((blinded, rinv));
    }
    Err(Error::BlindingFailed)
}

/// Given `m` and an unblinding factor, removes the blinding applied by
/// [`blind`].
fn unblind(key: &impl PublicKeyParts, m: &BigUint, unblinder: &BigUint) -> BigUint {
    (m * unblinder) % key.n()
}

/// Samples a uniformly random value in `[0, bound)`.
fn random_biguint_below(rng: &mut dyn RngCore, bound: &BigUint) -> BigUint {
    let bits = bound.bits();
    let bytes = ((bits + 7) / 8) as usize;
    loop {
        let mut buf = vec![0u8; bytes];
        rng.fill_bytes(&mut buf);
        // Mask off any excess high bits so the result stays below 2^bits.
        if bits % 8 != 0 {
            buf[0] &= 0xff >> (8 - bits % 8);
        }
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return candidate;
        }
    }
}

/// Compute the modulus of a key from its two prime factors.
pub(crate) fn compute_modulus(p: &BigUint, q: &BigUint) -> BigUint {
    p * q
}

/// Compute the private exponent from `p`, `q` and the public exponent,
/// using the Carmichael function `lcm(p-1, q-1)`.
///
/// FIPS 186-4 requires the private exponent to be less than `λ(n)`, which
/// the (simpler, but larger) Euler totient `(p-1)(q-1)` does not guarantee.
#[inline]
pub(crate) fn compute_private_exponent_carmicheal(
    p: &BigUint,
    q: &BigUint,
    exp: &BigUint,
) -> Result<BigUint> {
    let p1 = p - BigUint::one();
    let q1 = q - BigUint::one();
    let lambda = (&p1 * &q1) / p1.gcd(&q1);

    mod_inverse(exp, &lambda).ok_or(Error::InvalidExponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::RsaPrivateKey;
    use num_traits::FromPrimitive;

    fn test_key() -> RsaPrivateKey {
        let p = BigUint::from_u64(16_777_259).unwrap();
        let q = BigUint::from_u64(16_777_183).unwrap();
        let e = BigUint::from_u64(65537).unwrap();
        RsaPrivateKey::from_p_q(p, q, e).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let m = BigUint::from_u64(42).unwrap();

        let c = rsa_encrypt(&pubkey, &m).unwrap();
        let m2 = rsa_decrypt(None, &key, &c).unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn encrypt_rejects_zero_message() {
        let key = test_key();
        let pubkey = key.to_public_key();
        assert_eq!(rsa_encrypt(&pubkey, &BigUint::zero()), Err(Error::MessageTooLong));
    }

    #[test]
    fn decrypt_rejects_zero_ciphertext() {
        let key = test_key();
        assert_eq!(rsa_decrypt(None, &key, &BigUint::zero()), Err(Error::MessageTooLong));
    }

    #[test]
    fn blinded_decrypt_matches_unblinded() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let m = BigUint::from_u64(1234).unwrap();
        let c = rsa_encrypt(&pubkey, &m).unwrap();

        let mut rng = rand_chacha_test_rng();
        let m2 = rsa_decrypt(Some(&mut rng), &key, &c).unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn decrypt_and_check_matches() {
        let key = test_key();
        let pubkey = key.to_public_key();
        let m = BigUint::from_u64(7).unwrap();
        let c = rsa_encrypt(&pubkey, &m).unwrap();
        let m2 = rsa_decrypt_and_check(None, &key, &c).unwrap();
        assert_eq!(m, m2);
    }

    // Minimal deterministic RngCore for tests that don't care about the
    // RNG's cryptographic quality, only that blinding takes the same code
    // path it would with a real one.
    struct CountingRng(u64);

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.next_u64() as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
            self.0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn rand_chacha_test_rng() -> CountingRng {
        CountingRng(0xDEAD_BEEF)
    }
}

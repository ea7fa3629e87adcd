//! RSA key types: public/private key representation, validation and
//! construction from components or raw primes.

use alloc::vec::Vec;
use core::hash::{Hash, Hasher};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithms::generate::generate_key_pair;
use crate::algorithms::rsa::{compute_modulus, compute_private_exponent_carmicheal};
use crate::errors::{Error, Result};
use crate::traits::{PaddingScheme, PrivateKeyParts, PublicKeyParts, SignatureScheme};

/// Represents the public part of an RSA key.
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    /// Modulus: product of the prime numbers `p` and `q`.
    n: BigUint,
    /// Public exponent: power to which a plaintext message is raised in
    /// order to encrypt it.
    ///
    /// Typically 0x10001 (65537).
    e: BigUint,
}

impl Eq for RsaPublicKey {}
impl PartialEq for RsaPublicKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.e == other.e
    }
}

impl Hash for RsaPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(b"RsaPublicKey");
        self.n.to_bytes_be().hash(state);
        self.e.to_bytes_be().hash(state);
    }
}

/// Represents a whole RSA key, public and private parts.
///
/// The two prime factors are kept in `p > q` order, matching the
/// convention used by the CRT-accelerated decryption path.
#[derive(Debug, Clone)]
pub struct RsaPrivateKey {
    /// Public components of the private key.
    pubkey_components: RsaPublicKey,
    /// Private exponent.
    pub(crate) d: BigUint,
    /// Larger prime factor.
    pub(crate) p: BigUint,
    /// Smaller prime factor.
    pub(crate) q: BigUint,
    /// `d mod (p-1)`.
    pub(crate) dp: BigUint,
    /// `d mod (q-1)`.
    pub(crate) dq: BigUint,
    /// `q^-1 mod p`.
    pub(crate) qinv: BigUint,
}

impl Eq for RsaPrivateKey {}
impl PartialEq for RsaPrivateKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.pubkey_components == other.pubkey_components
            && self.d == other.d
            && self.p == other.p
            && self.q == other.q
    }
}

impl AsRef<RsaPublicKey> for RsaPrivateKey {
    fn as_ref(&self) -> &RsaPublicKey {
        &self.pubkey_components
    }
}

impl Drop for RsaPrivateKey {
    fn drop(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
        self.dp.zeroize();
        self.dq.zeroize();
        self.qinv.zeroize();
    }
}

impl ZeroizeOnDrop for RsaPrivateKey {}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl RsaPublicKey {
    /// Encrypt the given message using the chosen padding scheme.
    pub fn encrypt<P: PaddingScheme>(
        &self,
        rng: &mut dyn RngCore,
        padding: P,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        padding.encrypt(rng, self, msg)
    }

    /// Verify a signed message.
    ///
    /// `hashed` must be the result of hashing the input using the hashing
    /// function passed in through `hash`. If the message is valid `Ok(())`
    /// is returned, otherwise an opaque `Err`.
    pub fn verify<S: SignatureScheme>(&self, scheme: S, hashed: &[u8], sig: &[u8]) -> Result<()> {
        scheme.verify(self, hashed, sig)
    }
}

impl RsaPublicKey {
    /// Minimum value of the public exponent `e`.
    pub const MIN_PUB_EXPONENT: u64 = 2;

    /// Maximum value of the public exponent `e`.
    pub const MAX_PUB_EXPONENT: u64 = (1 << 33) - 1;

    /// Maximum size of the modulus `n` in bits.
    pub const MAX_SIZE: usize = 4096;

    /// Create a new public key from its components.
    ///
    /// This function accepts public keys with a modulus size up to
    /// 4096-bits, i.e. [`RsaPublicKey::MAX_SIZE`].
    pub fn new(n: BigUint, e: BigUint) -> Result<Self> {
        Self::new_with_max_size(n, e, Self::MAX_SIZE)
    }

    /// Create a new public key from its components, accepting a modulus up
    /// to `max_size` bits.
    pub fn new_with_max_size(n: BigUint, e: BigUint, max_size: usize) -> Result<Self> {
        let k = Self { n, e };
        check_public_with_max_size(&k, max_size)?;
        Ok(k)
    }

    /// Create a new public key, bypassing checks around the modulus and
    /// public exponent size.
    ///
    /// This method is not recommended, and only intended for unusual use
    /// cases. Most applications should use [`RsaPublicKey::new`] or
    /// [`RsaPublicKey::new_with_max_size`] instead.
    pub fn new_unchecked(n: BigUint, e: BigUint) -> Self {
        Self { n, e }
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &BigUint {
        &self.pubkey_components.n
    }

    fn e(&self) -> &BigUint {
        &self.pubkey_components.e
    }
}

impl RsaPrivateKey {
    /// Default public exponent for generated RSA keys.
    const EXP: u64 = 65537;

    /// Generate a new RSA key pair of the given bit size using the default
    /// public exponent (65537).
    pub fn new(rng: &mut dyn RngCore, bit_size: usize) -> Result<Self> {
        let exp = BigUint::from(Self::EXP);
        Self::new_with_exp(rng, bit_size, &exp)
    }

    /// Generate a new RSA key pair of the given bit size and public
    /// exponent.
    ///
    /// Unless you have specific needs, use [`RsaPrivateKey::new`] instead.
    pub fn new_with_exp(rng: &mut dyn RngCore, bit_size: usize, exp: &BigUint) -> Result<Self> {
        let (p, q) = generate_key_pair(rng, bit_size, exp)?;
        Self::from_p_q(p, q, exp.clone())
    }

    /// Constructs an RSA key pair from individual components:
    ///
    /// - `n`: RSA modulus (product of `p` and `q`)
    /// - `e`: public exponent
    /// - `d`: private exponent
    /// - `p`, `q`: the two prime factors of `n`, in any order
    pub fn from_components(n: BigUint, e: BigUint, d: BigUint, p: BigUint, q: BigUint) -> Result<Self> {
        if p == q {
            return Err(Error::InvalidPrime);
        }
        let (p, q) = if p > q { (p, q) } else { (q, p) };

        let (dp, dq, qinv) = precompute(&d, &p, &q)?;

        let key = Self {
            pubkey_components: RsaPublicKey { n, e },
            d,
            p,
            q,
            dp,
            dq,
            qinv,
        };
        key.validate()?;
        Ok(key)
    }

    /// Constructs an RSA key pair from its two primes `p` and `q`.
    ///
    /// The modulus and private exponent are rebuilt from the primes and the
    /// public exponent, using the Carmichael-function method of
    /// [NIST 800-56B §6.2.1](https://nvlpubs.nist.gov/nistpubs/SpecialPublications/NIST.SP.800-56Br2.pdf#page=47).
    pub fn from_p_q(p: BigUint, q: BigUint, public_exponent: BigUint) -> Result<Self> {
        if p == q {
            return Err(Error::InvalidPrime);
        }

        let n = compute_modulus(&p, &q);
        let d = compute_private_exponent_carmicheal(&p, &q, &public_exponent)?;

        Self::from_components(n, public_exponent, d, p, q)
    }

    /// Get the public key from the private key, cloning `n` and `e`.
    pub fn to_public_key(&self) -> RsaPublicKey {
        self.pubkey_components.clone()
    }

    /// Returns the two prime factors, ordered `p > q`.
    pub fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    /// Performs basic sanity checks on the key.
    ///
    /// Returns `Ok(())` if everything is good, otherwise an appropriate
    /// error.
    pub fn validate(&self) -> Result<()> {
        check_public(self)?;

        // Check that p * q == n.
        if &self.p * &self.q != self.pubkey_components.n {
            return Err(Error::InvalidModulus);
        }

        if self.p <= BigUint::one() || self.q <= BigUint::one() {
            return Err(Error::InvalidPrime);
        }

        // Check that d*e ≡ 1 mod (p-1) and mod (q-1). This implies e is
        // coprime to lcm(p-1, q-1), and therefore a^de ≡ a mod n for all a
        // coprime to n, as required.
        let de = &self.d * self.e();
        for prime in [&self.p, &self.q] {
            let pm1 = prime - BigUint::one();
            if (&de % &pm1) != BigUint::one() {
                return Err(Error::InvalidExponent);
            }
        }

        Ok(())
    }

    /// Decrypt the given ciphertext using the chosen padding scheme.
    ///
    /// The underlying RSA operation is blinded using [`rand_core::OsRng`]
    /// to mitigate timing side channels. This is the default blinding
    /// mode; use [`RsaPrivateKey::decrypt_blinded`] to supply a specific
    /// RNG instead, or [`RsaPrivateKey::decrypt_unblinded`] to disable
    /// blinding entirely.
    #[cfg(feature = "getrandom")]
    pub fn decrypt<P: PaddingScheme>(&self, padding: P, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut rng = rand_core::OsRng;
        padding.decrypt(Some(&mut rng), self, ciphertext)
    }

    /// Decrypt the given ciphertext using the chosen padding scheme,
    /// blinding the underlying RSA operation with `rng` to mitigate timing
    /// side channels.
    pub fn decrypt_blinded<P: PaddingScheme>(
        &self,
        rng: &mut dyn RngCore,
        padding: P,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        padding.decrypt(Some(rng), self, ciphertext)
    }

    /// Decrypt the given ciphertext using the chosen padding scheme. No
    /// blinding is performed.
    ///
    /// Prefer [`RsaPrivateKey::decrypt`] or [`RsaPrivateKey::decrypt_blinded`]
    /// unless you have a specific reason to disable blinding, since an
    /// unblinded private-key operation is susceptible to timing attacks.
    pub fn decrypt_unblinded<P: PaddingScheme>(&self, padding: P, ciphertext: &[u8]) -> Result<Vec<u8>> {
        padding.decrypt(None, self, ciphertext)
    }

    /// Sign the given (already hashed, or raw) message. No blinding is
    /// performed.
    pub fn sign<S: SignatureScheme>(&self, padding: S, hashed: &[u8]) -> Result<Vec<u8>> {
        padding.sign(None, self, hashed)
    }

    /// Sign the given message using `rng`.
    ///
    /// - [`Pkcs1v15Sign`][crate::Pkcs1v15Sign] uses `rng` to blind the
    ///   private-key operation, mitigating timing side channels.
    /// - [`Pss`][crate::Pss] always requires randomness, for the salt.
    pub fn sign_with_rng<S: SignatureScheme>(
        &self,
        rng: &mut dyn RngCore,
        padding: S,
        hashed: &[u8],
    ) -> Result<Vec<u8>> {
        padding.sign(Some(rng), self, hashed)
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> (&BigUint, &BigUint) {
        (&self.p, &self.q)
    }

    fn dp(&self) -> &BigUint {
        &self.dp
    }

    fn dq(&self) -> &BigUint {
        &self.dq
    }

    fn qinv(&self) -> &BigUint {
        &self.qinv
    }
}

/// Given `d`, `p` and `q`, computes `dp = d mod (p-1)`, `dq = d mod (q-1)`
/// and `qinv = q^-1 mod p`.
pub(crate) fn precompute(d: &BigUint, p: &BigUint, q: &BigUint) -> Result<(BigUint, BigUint, BigUint)> {
    let dp = d % (p - BigUint::one());
    let dq = d % (q - BigUint::one());
    let qinv = mod_inverse(q, p).ok_or(Error::InvalidPrime)?;
    Ok((dp, dq, qinv))
}

/// Computes `a^-1 mod m` via the extended Euclidean algorithm, or `None` if
/// `a` and `m` are not coprime.
pub(crate) fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a = BigInt::from_biguint(Sign::Plus, a.clone());
    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    let egcd = a.extended_gcd(&m);
    if egcd.gcd != BigInt::one() {
        return None;
    }
    egcd.x.mod_floor(&m).to_biguint()
}

/// Check that the public key is well formed and has an exponent within
/// acceptable bounds.
#[inline]
pub fn check_public(public_key: &impl PublicKeyParts) -> Result<()> {
    check_public_with_max_size(public_key, RsaPublicKey::MAX_SIZE)
}

/// Check that the public key is well formed and has an exponent within
/// acceptable bounds, rejecting moduli larger than `max_size` bits.
#[inline]
fn check_public_with_max_size(public_key: &impl PublicKeyParts, max_size: usize) -> Result<()> {
    if public_key.n().bits() as usize > max_size {
        return Err(Error::ModulusTooLarge);
    }

    let e = public_key.e().to_u64().ok_or(Error::PublicExponentTooLarge)?;

    if public_key.e() >= public_key.n() || public_key.n().is_even() {
        return Err(Error::InvalidModulus);
    }

    if public_key.e().is_even() {
        return Err(Error::InvalidExponent);
    }

    if e < RsaPublicKey::MIN_PUB_EXPONENT {
        return Err(Error::PublicExponentTooSmall);
    }

    if e > RsaPublicKey::MAX_PUB_EXPONENT {
        return Err(Error::PublicExponentTooLarge);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::FromPrimitive;

    fn test_key() -> RsaPrivateKey {
        // 64-bit toy key, for structural tests only — never use for real
        // cryptography.
        let p = BigUint::from_u64(16_777_259).unwrap();
        let q = BigUint::from_u64(16_777_183).unwrap();
        let e = BigUint::from_u64(65537).unwrap();
        RsaPrivateKey::from_p_q(p, q, e).unwrap()
    }

    #[test]
    fn from_p_q_validates() {
        let key = test_key();
        key.validate().unwrap();
    }

    #[test]
    fn p_greater_than_q() {
        let key = test_key();
        let (p, q) = key.primes();
        assert!(p > q);
    }

    #[test]
    fn public_key_roundtrip() {
        let key = test_key();
        let public = key.to_public_key();
        assert_eq!(public.n(), key.n());
        assert_eq!(public.e(), key.e());
    }

    #[test]
    fn rejects_equal_primes() {
        let p = BigUint::from_u64(16_777_259).unwrap();
        let e = BigUint::from_u64(65537).unwrap();
        assert_eq!(
            RsaPrivateKey::from_p_q(p.clone(), p, e),
            Err(Error::InvalidPrime)
        );
    }

    #[test]
    #[cfg(feature = "getrandom")]
    fn decrypt_blinding_modes_agree() {
        use crate::pkcs1v15::Pkcs1v15Encrypt;
        use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

        let key = test_key();
        let pubkey = key.to_public_key();
        let mut rng = ChaCha8Rng::from_seed([9; 32]);
        let msg = b"blind spot";

        let ct = pubkey.encrypt(&mut rng, Pkcs1v15Encrypt, msg).unwrap();

        // Default mode: blinded with OsRng.
        let pt_default = key.decrypt(Pkcs1v15Encrypt, &ct).unwrap();
        // Blinded with a caller-supplied RNG.
        let pt_blinded = key.decrypt_blinded(&mut rng, Pkcs1v15Encrypt, &ct).unwrap();
        // Unblinded.
        let pt_unblinded = key.decrypt_unblinded(Pkcs1v15Encrypt, &ct).unwrap();

        assert_eq!(pt_default, msg);
        assert_eq!(pt_blinded, msg);
        assert_eq!(pt_unblinded, msg);
    }

    #[test]
    fn mod_inverse_roundtrips() {
        let a = BigUint::from_u64(17).unwrap();
        let m = BigUint::from_u64(3120).unwrap();
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!((&a * &inv) % &m, BigUint::one());
    }
}

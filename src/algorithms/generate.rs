//! Probabilistic prime generation and RSA key-pair generation.

use alloc::vec;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;

use crate::errors::{Error, Result};

/// Number of Miller-Rabin rounds run against each candidate. Chosen so the
/// probability of a false positive is negligible (< 2^-128) even for
/// adversarially chosen candidates.
const MILLER_RABIN_ROUNDS: usize = 64;

/// Small primes sieved against before running Miller-Rabin, to reject the
/// overwhelming majority of composite candidates cheaply.
const SMALL_PRIMES: &[u32] = &[
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Generates a 2-prime RSA key pair of the given total modulus bit size,
/// coprime to `exp`, returning the primes ordered `p > q`.
///
/// Retries with fresh candidates whenever `p == q` or either prime shares a
/// factor with `exp - 1`... in practice whenever `gcd(exp, prime - 1) != 1`,
/// matching the usual RSA key-generation rejection rule.
pub(crate) fn generate_key_pair(
    rng: &mut dyn RngCore,
    bit_size: usize,
    exp: &BigUint,
) -> Result<(BigUint, BigUint)> {
    if bit_size < 10 {
        return Err(Error::KeySizeTooSmall);
    }

    let prime_bits = bit_size / 2;

    loop {
        let p = generate_prime(rng, prime_bits, exp)?;
        let q = generate_prime(rng, bit_size - prime_bits, exp)?;

        if p == q {
            continue;
        }

        return Ok(if p > q { (p, q) } else { (q, p) });
    }
}

/// Generates a random prime of exactly `bits` bits such that
/// `gcd(prime - 1, exp) == 1`.
fn generate_prime(rng: &mut dyn RngCore, bits: usize, exp: &BigUint) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::KeySizeTooSmall);
    }

    loop {
        let candidate = random_odd_biguint(rng, bits);

        if !passes_small_prime_sieve(&candidate) {
            continue;
        }

        let candidate_minus_one = &candidate - BigUint::one();
        if candidate_minus_one.gcd(exp) != BigUint::one() {
            continue;
        }

        if is_probably_prime(rng, &candidate) {
            return Ok(candidate);
        }
    }
}

/// Draws a uniformly random odd integer of exactly `bits` bits: the top two
/// bits are forced to 1 (so the product of two such primes reliably has the
/// full requested bit length, rather than landing one bit short about half
/// the time) and the bottom bit is forced to 1 (to guarantee oddness).
fn random_odd_biguint(rng: &mut dyn RngCore, bits: usize) -> BigUint {
    let byte_len = (bits + 7) / 8;
    let mut buf = vec![0u8; byte_len];
    rng.fill_bytes(&mut buf);

    let excess_bits = byte_len * 8 - bits;
    if excess_bits > 0 {
        buf[0] &= 0xff >> excess_bits;
    }
    // Force the top bit of the requested width so the candidate has exactly
    // `bits` bits.
    let top_bit = 7 - excess_bits % 8;
    buf[0] |= 1 << top_bit;
    // Force the second-highest bit too.
    if top_bit >= 1 {
        buf[0] |= 1 << (top_bit - 1);
    } else {
        buf[1] |= 1 << 7;
    }
    // Force the bottom bit so the candidate is odd.
    *buf.last_mut().expect("byte_len >= 1 for bits >= 2") |= 1;

    BigUint::from_bytes_be(&buf)
}

fn passes_small_prime_sieve(candidate: &BigUint) -> bool {
    for &p in SMALL_PRIMES {
        let p = BigUint::from(p);
        if *candidate == p {
            return true;
        }
        if (candidate % &p).is_zero() {
            return false;
        }
    }
    true
}

/// Miller-Rabin probabilistic primality test with randomly chosen bases.
fn is_probably_prime(rng: &mut dyn RngCore, candidate: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *candidate < two {
        return false;
    }
    if *candidate == two {
        return true;
    }
    if candidate.is_even() {
        return false;
    }

    let n_minus_one = candidate - BigUint::one();
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = random_base_in_range(rng, &two, &n_minus_one);
        let mut x = a.modpow(&d, candidate);

        if x == BigUint::one() || x == n_minus_one {
            continue;
        }

        for _ in 0..s.saturating_sub(1) {
            x = x.modpow(&two, candidate);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

/// Samples a uniformly random value in `[low, high)`.
fn random_base_in_range(rng: &mut dyn RngCore, low: &BigUint, high: &BigUint) -> BigUint {
    let span = high - low;
    let bits = span.bits().max(1);
    let bytes = ((bits + 7) / 8) as usize;
    loop {
        let mut buf = vec![0u8; bytes];
        rng.fill_bytes(&mut buf);
        if bits % 8 != 0 {
            buf[0] &= 0xff >> (8 - bits % 8);
        }
        let candidate = BigUint::from_bytes_be(&buf);
        if candidate < span {
            return low + candidate;
        }
    }
}

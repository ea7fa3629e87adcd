//! Support for the [Probabilistic Signature Scheme] (PSS) a.k.a. RSASSA-PSS.
//!
//! Designed by Mihir Bellare and Phillip Rogaway. Specified in [RFC 8017 §8.1].
//!
//! [Probabilistic Signature Scheme]: https://en.wikipedia.org/wiki/Probabilistic_signature_scheme
//! [RFC 8017 §8.1]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.1

use alloc::vec;
use alloc::vec::Vec;

use digest::{Digest, FixedOutputReset};
use subtle::{Choice, ConstantTimeEq};

use super::mgf::mgf1_xor_digest;
use crate::errors::{Error, Result};

/// EMSA-PSS-ENCODE, producing the encoded message `EM` of exactly
/// `(em_bits + 7) / 8` bytes.
pub(crate) fn emsa_pss_encode<D>(m_hash: &[u8], em_bits: usize, salt: &[u8]) -> Result<Vec<u8>>
where
    D: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    let s_len = salt.len();
    let em_len = (em_bits + 7) / 8;

    if em_len < h_len + s_len + 2 {
        return Err(Error::InvalidSaltLength);
    }

    let mut hash = D::new();
    Digest::update(&mut hash, [0u8; 8]);
    Digest::update(&mut hash, m_hash);
    Digest::update(&mut hash, salt);
    let h = hash.finalize_reset();

    let db_len = em_len - h_len - 1;
    let mut em = vec![0u8; em_len];
    {
        let (db, rest) = em.split_at_mut(db_len);
        let (h_out, last) = rest.split_at_mut(h_len);

        db[db_len - s_len - 1] = 1;
        db[db_len - s_len..].copy_from_slice(salt);

        mgf1_xor_digest(db, &mut hash, &h);

        let excess_bits = em_len * 8 - em_bits;
        if excess_bits > 0 {
            db[0] &= 0xff >> excess_bits;
        }

        h_out.copy_from_slice(&h);
        last[0] = 0xbc;
    }

    Ok(em)
}

/// EMSA-PSS-VERIFY, checking that `em` is a valid PSS encoding of `m_hash`
/// with salt length `s_len`.
///
/// Returns an opaque error on any mismatch, without distinguishing which
/// check failed.
pub(crate) fn emsa_pss_verify_digest<D>(m_hash: &[u8], em: &[u8], s_len: usize, key_bits: usize) -> Result<()>
where
    D: Digest + FixedOutputReset,
{
    let em_bits = key_bits - 1;
    let em_len = (em_bits + 7) / 8;
    let key_len = (key_bits + 7) / 8;
    let h_len = <D as Digest>::output_size();

    if em.len() < key_len {
        return Err(Error::Verification);
    }
    let em = &em[key_len - em_len..];

    if m_hash.len() != h_len || em_len < h_len + s_len + 2 {
        return Err(Error::Verification);
    }

    if em[em.len() - 1] != 0xbc {
        return Err(Error::Verification);
    }

    let db_len = em_len - h_len - 1;
    let mut db = em[..db_len].to_vec();
    let h = &em[db_len..db_len + h_len];

    let mut hash = D::new();
    mgf1_xor_digest(&mut db, &mut hash, h);

    let excess_bits = em_len * 8 - em_bits;
    if excess_bits > 0 {
        db[0] &= 0xff >> excess_bits;
    }

    // The leftmost `em_len - h_len - s_len - 2` octets of DB must be zero,
    // followed by a single 0x01 separator, checked branch-free.
    let (zeroes, rest) = db.split_at(db_len - s_len - 1);
    let mut valid: Choice = zeroes.iter().fold(Choice::from(1u8), |a, e| a & e.ct_eq(&0));
    valid &= rest[0].ct_eq(&1);

    let salt = &rest[1..];

    Digest::update(&mut hash, [0u8; 8]);
    Digest::update(&mut hash, m_hash);
    Digest::update(&mut hash, salt);
    let h0 = hash.finalize_reset();

    valid &= h0.as_slice().ct_eq(h);

    if valid.into() {
        Ok(())
    } else {
        Err(Error::Verification)
    }
}

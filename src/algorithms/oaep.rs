//! Encryption and Decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).

use alloc::vec;
use alloc::vec::Vec;

use digest::{Digest, FixedOutputReset};
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::mgf::mgf1_xor_digest;
use crate::errors::{Error, Result};

/// Maximum label size (2^61 octets), matching the hash input limitation
/// common to SHA-1/SHA-2; in practice no label ever approaches this.
const MAX_LABEL_LEN: u64 = 1 << 61;

/// Encrypts `msg` with RSA-OAEP, returning the encoded message `EM` (still
/// to be raised to the public exponent by the caller).
///
/// `D` hashes the label, `MGD` drives MGF1; they may differ (e.g. Android
/// Keystore's SHA-256 label digest with a SHA-1 MGF1).
pub(crate) fn oaep_encrypt_digest<D, MGD>(
    rng: &mut dyn RngCore,
    msg: &[u8],
    label: Option<&[u8]>,
    k: usize,
) -> Result<Vec<u8>>
where
    D: Digest,
    MGD: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    if msg.len() + 2 * h_len + 2 > k {
        return Err(Error::MessageTooLong);
    }

    let label = label.unwrap_or(&[]);
    if label.len() as u64 >= MAX_LABEL_LEN {
        return Err(Error::LabelTooLong);
    }
    let p_hash = D::digest(label);

    let mut em = vec![0u8; k];
    let (_, payload) = em.split_at_mut(1);
    let (seed, db) = payload.split_at_mut(h_len);
    rng.fill_bytes(seed);

    // Data block DB = pHash || PS || 01 || M
    let db_len = k - h_len - 1;
    db[..h_len].copy_from_slice(&p_hash);
    db[db_len - msg.len() - 1] = 1;
    db[db_len - msg.len()..].copy_from_slice(msg);

    let mut mgf_digest = MGD::new();
    mgf1_xor_digest(db, &mut mgf_digest, seed);
    mgf1_xor_digest(seed, &mut mgf_digest, db);

    Ok(em)
}

/// Decrypts an OAEP-encoded message `em` (the recovered plaintext of the
/// raw RSA decryption, left-zero-padded to exactly `k` bytes).
///
/// Returns `None` on any failure — wrong leading byte, label mismatch,
/// missing `0x01` separator — without distinguishing which, and runs in
/// time independent of *where* the failure occurred, closing the Manger
/// padding oracle.
pub(crate) fn oaep_decrypt_digest<D, MGD>(em: &[u8], label: Option<&[u8]>) -> Option<Vec<u8>>
where
    D: Digest,
    MGD: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    let k = em.len();
    if k < 2 * h_len + 2 {
        return None;
    }

    let y = em[0];
    let (masked_seed, masked_db) = em[1..].split_at(h_len);

    let mut seed = masked_seed.to_vec();
    let mut db = masked_db.to_vec();

    let mut mgf_digest = MGD::new();
    mgf1_xor_digest(&mut seed, &mut mgf_digest, &db);
    mgf1_xor_digest(&mut db, &mut mgf_digest, &seed);

    let label = label.unwrap_or(&[]);
    let expected_hash = D::digest(label);

    let mut valid = y.ct_eq(&0);
    valid &= db[..h_len].ct_eq(&expected_hash);

    // Scan the rest of DB for the 0x01 separator in constant time: every
    // byte is compared against 0 and 1 regardless of whether a separator
    // was already found, and only the first 0x01 after an all-zero run
    // marks the message start.
    let mut found = Choice::from(0u8);
    let mut all_zero_so_far = Choice::from(1u8);
    let mut msg_start = 0u32;

    for (i, byte) in db[h_len..].iter().enumerate() {
        let is_zero = byte.ct_eq(&0);
        let is_one = byte.ct_eq(&1);

        let marks_start = !found & all_zero_so_far & is_one;
        msg_start.conditional_assign(&(i as u32 + 1), marks_start);
        found.conditional_assign(&Choice::from(1u8), marks_start);

        all_zero_so_far &= is_zero | found;
    }

    valid &= found;

    if !bool::from(valid) {
        return None;
    }

    Some(db[h_len + msg_start as usize..].to_vec())
}

//! PKCS#1 v1.5 support as described in [RFC 8017 §8.2] (signatures) and
//! [§7.2] (encryption).
//!
//! [RFC 8017 §8.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-8.2
//! [§7.2]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.2

use alloc::vec;
use alloc::vec::Vec;

use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::errors::{Error, Result};

/// Fills the provided slice with random values, none of which are zero, as
/// required by the `PS` padding string.
#[inline]
fn non_zero_random_bytes(rng: &mut dyn RngCore, data: &mut [u8]) {
    rng.fill_bytes(data);

    for el in data {
        while *el == 0u8 {
            rng.fill_bytes(core::slice::from_mut(el));
        }
    }
}

/// Applies the EME-PKCS1-v1_5 padding scheme for encryption. The message
/// must be no longer than `k - 11` bytes, where `k` is the size in bytes of
/// the RSA modulus.
pub(crate) fn pkcs1v15_encrypt_pad(rng: &mut dyn RngCore, msg: &[u8], k: usize) -> Result<Vec<u8>> {
    if msg.len() > k - 11 {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = vec![0u8; k];
    em[1] = 2;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the EME-PKCS1-v1_5 padding applied by [`pkcs1v15_encrypt_pad`].
///
/// Returns `None` on any malformed encoding, branch-free over the padding
/// bytes, to avoid a Bleichenbacher-style padding oracle: a caller can't
/// distinguish "wrong block type" from "missing separator" from "message
/// empty" by timing or by error variant.
pub(crate) fn pkcs1v15_decrypt_unpad(em: &[u8], k: usize) -> Option<Vec<u8>> {
    if em.len() != k || k < 11 {
        return None;
    }

    let mut ok = em[0].ct_eq(&0u8);
    ok &= em[1].ct_eq(&2u8);

    // Find the first zero byte after the two-byte header, which terminates
    // the (non-zero) padding string `PS`. Every byte is inspected
    // regardless of whether the separator was already found.
    let mut found_zero = Choice::from(0u8);
    let mut msg_start = 0u32;
    for (i, byte) in em.iter().enumerate().skip(2) {
        let is_zero = byte.ct_eq(&0u8);
        let marks_start = !found_zero & is_zero;
        // `i + 1` is only ever committed the first time a zero byte is
        // seen; later zero bytes (which are part of the message) leave it
        // unchanged because `marks_start` is false once `found_zero` is set.
        msg_start.conditional_assign(&(i as u32 + 1), marks_start);
        found_zero |= marks_start;
    }

    ok &= found_zero;
    // At least 8 bytes of non-zero padding are required by RFC 8017 §7.2.2.
    ok &= Choice::from((msg_start >= (2 + 8 + 1) as u32) as u8);

    if !bool::from(ok) {
        return None;
    }

    Some(em[msg_start as usize..].to_vec())
}

/// Applies the EMSA-PKCS1-v1_5 padding scheme for signing: `hashed` is the
/// already-hashed message, with no ASN.1 `DigestInfo` prefix prepended.
pub(crate) fn pkcs1v15_sign_pad(hashed: &[u8], k: usize) -> Result<Vec<u8>> {
    let t_len = hashed.len();
    if k < t_len + 11 {
        return Err(Error::MessageTooLong);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut em = vec![0xffu8; k];
    em[0] = 0;
    em[1] = 1;
    em[k - t_len - 1] = 0;
    em[k - t_len..].copy_from_slice(hashed);
    Ok(em)
}

/// Checks that `em` is a valid EMSA-PKCS1-v1_5 encoding of `hashed`.
#[inline]
pub(crate) fn pkcs1v15_sign_unpad(hashed: &[u8], em: &[u8], k: usize) -> Result<()> {
    let t_len = hashed.len();
    if k < t_len + 11 || em.len() != k {
        return Err(Error::Verification);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut ok = em[0].ct_eq(&0u8);
    ok &= em[1].ct_eq(&1u8);
    ok &= em[k - t_len..k].ct_eq(hashed);
    ok &= em[k - t_len - 1].ct_eq(&0u8);

    for el in em.iter().skip(2).take(k - t_len - 3) {
        ok &= el.ct_eq(&0xff);
    }

    if ok.unwrap_u8() != 1 {
        return Err(Error::Verification);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_non_zero_bytes() {
        for _ in 0..10 {
            let mut rng = ChaCha8Rng::from_seed([42; 32]);
            let mut b = vec![0u8; 512];
            non_zero_random_bytes(&mut rng, &mut b);
            for el in &b {
                assert_ne!(*el, 0u8);
            }
        }
    }

    #[test]
    fn encrypt_then_decrypt_recovers_message() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let msg = b"hi mom";
        let k = 128;
        let em = pkcs1v15_encrypt_pad(&mut rng, msg, k).unwrap();
        let recovered = pkcs1v15_decrypt_unpad(&em, k).unwrap();
        assert_eq!(recovered, msg);
    }

    #[test]
    fn decrypt_rejects_wrong_block_type() {
        let mut rng = ChaCha8Rng::from_seed([7; 32]);
        let mut em = pkcs1v15_encrypt_pad(&mut rng, b"hi", 128).unwrap();
        em[1] = 1;
        assert!(pkcs1v15_decrypt_unpad(&em, 128).is_none());
    }

    #[test]
    fn sign_then_verify_succeeds() {
        let hashed = [0x11u8; 20];
        let em = pkcs1v15_sign_pad(&hashed, 128).unwrap();
        pkcs1v15_sign_unpad(&hashed, &em, 128).unwrap();
    }

    #[test]
    fn verify_rejects_wrong_hash() {
        let hashed = [0x11u8; 20];
        let other = [0x22u8; 20];
        let em = pkcs1v15_sign_pad(&hashed, 128).unwrap();
        assert!(pkcs1v15_sign_unpad(&other, &em, 128).is_err());
    }
}

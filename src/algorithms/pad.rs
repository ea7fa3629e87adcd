//! Conversion between non-negative integers and fixed-length big-endian byte
//! strings — the only layer at which a padded message's length is
//! established.

use alloc::vec;
use alloc::vec::Vec;

use num_bigint::BigUint;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Converts `input` to a big-endian byte vector of exactly `padded_len`
/// bytes, left-zero-padded. Fails if `input` doesn't fit in `padded_len`
/// bytes.
#[inline]
pub(crate) fn uint_to_be_pad(input: BigUint, padded_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; padded_len];
    let bytes = input.to_bytes_be();
    if bytes.len() > padded_len {
        return Err(Error::MessageTooLong);
    }
    out[padded_len - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// As [`uint_to_be_pad`], but the returned buffer is zeroed on drop since it
/// may carry secret plaintext or key material.
#[inline]
pub(crate) fn uint_to_zeroizing_be_pad(
    input: BigUint,
    padded_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    uint_to_be_pad(input, padded_len).map(Zeroizing::new)
}

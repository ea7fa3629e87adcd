//! MGF1, the mask generation function used by OAEP and PSS.
//!
//! Specified in [RFC 8017 Appendix B.2.1].
//!
//! [RFC 8017 Appendix B.2.1]: https://datatracker.ietf.org/doc/html/rfc8017#appendix-B.2.1

use digest::{Digest, DynDigest, FixedOutputReset};

/// XORs `out` in place with `MGF1(seed, out.len())`, computed with a
/// runtime-selected hash function.
pub(crate) fn mgf1_xor(out: &mut [u8], digest: &mut dyn DynDigest, seed: &[u8]) {
    let h_len = digest.output_size();
    let mut counter: u32 = 0;
    let mut done = 0;

    while done < out.len() {
        digest.update(seed);
        digest.update(&counter.to_be_bytes());
        let block = digest.finalize_reset();

        let n = core::cmp::min(h_len, out.len() - done);
        for (o, b) in out[done..done + n].iter_mut().zip(block.iter()) {
            *o ^= b;
        }

        done += n;
        counter += 1;
    }
}

/// As [`mgf1_xor`], but driven by a statically-known digest type, avoiding
/// the dynamic dispatch and heap-allocated intermediate hash output.
pub(crate) fn mgf1_xor_digest<D>(out: &mut [u8], digest: &mut D, seed: &[u8])
where
    D: Digest + FixedOutputReset,
{
    let h_len = <D as Digest>::output_size();
    let mut counter: u32 = 0;
    let mut done = 0;

    while done < out.len() {
        Digest::update(digest, seed);
        Digest::update(digest, counter.to_be_bytes());
        let block = digest.finalize_reset();

        let n = core::cmp::min(h_len, out.len() - done);
        for (o, b) in out[done..done + n].iter_mut().zip(block.iter()) {
            *o ^= b;
        }

        done += n;
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha1::Sha1;

    #[test]
    fn mgf1_xor_matches_mgf1_xor_digest() {
        let seed = b"some seed value";
        let mut via_dyn = vec![0u8; 37];
        let mut via_static = vec![0u8; 37];

        let mut digest: Box<dyn DynDigest> = Box::new(Sha1::new());
        mgf1_xor(&mut via_dyn, digest.as_mut(), seed);
        mgf1_xor_digest(&mut via_static, &mut Sha1::new(), seed);

        assert_eq!(via_dyn, via_static);
    }

    #[test]
    fn xor_is_its_own_inverse() {
        let seed = b"seed";
        let original = vec![0xAAu8; 50];
        let mut masked = original.clone();
        mgf1_xor_digest(&mut masked, &mut sha1::Sha1::new(), seed);
        assert_ne!(masked, original);

        mgf1_xor_digest(&mut masked, &mut sha1::Sha1::new(), seed);
        assert_eq!(masked, original);
    }
}

#![cfg(feature = "hazmat")]

use num_bigint::BigUint;
use num_traits::FromPrimitive;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rsa_core::hazmat;
use rsa_core::RsaPrivateKey;

fn test_key() -> RsaPrivateKey {
    let p = BigUint::from_u64(16_777_259).unwrap();
    let q = BigUint::from_u64(16_777_183).unwrap();
    let e = BigUint::from_u64(65537).unwrap();
    RsaPrivateKey::from_p_q(p, q, e).unwrap()
}

#[test]
fn raw_primitive_roundtrips() {
    let key = test_key();
    let pubkey = key.to_public_key();
    let m = BigUint::from_u64(777).unwrap();

    let c = hazmat::encrypt(&pubkey, &m).unwrap();
    assert_ne!(c, m);

    let recovered = hazmat::decrypt(None, &key, &c).unwrap();
    assert_eq!(recovered, m);
}

#[test]
fn raw_primitive_blinded_matches_unblinded() {
    let key = test_key();
    let pubkey = key.to_public_key();
    let mut rng = ChaCha8Rng::from_seed([60; 32]);
    let m = BigUint::from_u64(999).unwrap();

    let c = hazmat::encrypt(&pubkey, &m).unwrap();
    let blinded = hazmat::decrypt_and_check(Some(&mut rng), &key, &c).unwrap();
    let unblinded = hazmat::decrypt(None, &key, &c).unwrap();
    assert_eq!(blinded, unblinded);
}

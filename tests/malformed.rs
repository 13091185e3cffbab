//! Malformed-input behavior: every decode failure must surface as a clean
//! `false` from verification (never a panic), and key parsing must reject
//! out-of-range content.

use mldsa::traits::{SerDes, Signer, Verifier};
use mldsa::{ml_dsa_44, ml_dsa_65, Error};

const OMEGA_44: usize = 80;
const K_44: usize = 4;

fn keypair_and_sig() -> (ml_dsa_44::PublicKey, [u8; ml_dsa_44::SIG_LEN]) {
    let msg = b"malformed-input tests";
    let (pk, sk) = ml_dsa_44::keygen_from_seed(&[0x5Au8; 32]);
    let sig = sk.try_sign_with_rnd(msg, &[], &[0u8; 32]).unwrap();
    assert!(pk.verify(msg, &sig, &[]));
    (pk, sig)
}

// byte offset where the hint area of an ML-DSA-44 signature begins
fn hint_base() -> usize {
    ml_dsa_44::SIG_LEN - (OMEGA_44 + K_44)
}

#[test]
fn test_nonzero_hint_padding_rejected() {
    let msg = b"malformed-input tests";
    let (pk, sig) = keypair_and_sig();

    // the final cumulative count tells how many position slots are in use;
    // anything after that inside the omega area must be zero
    let used = usize::from(sig[hint_base() + OMEGA_44 + K_44 - 1]);
    if used < OMEGA_44 {
        let mut bad = sig;
        bad[hint_base() + used] = 0xAB;
        assert!(!pk.verify(msg, &bad, &[]));
    }
}

#[test]
fn test_hint_count_above_omega_rejected() {
    let msg = b"malformed-input tests";
    let (pk, sig) = keypair_and_sig();

    let mut bad = sig;
    bad[hint_base() + OMEGA_44 + K_44 - 1] = (OMEGA_44 as u8) + 1;
    assert!(!pk.verify(msg, &bad, &[]));
}

#[test]
fn test_hint_decreasing_count_rejected() {
    let msg = b"malformed-input tests";
    let (pk, sig) = keypair_and_sig();

    // forcing a later cumulative count below an earlier one is malformed
    let mut bad = sig;
    bad[hint_base() + OMEGA_44] = OMEGA_44 as u8;
    bad[hint_base() + OMEGA_44 + 1] = 0;
    assert!(!pk.verify(msg, &bad, &[]));
}

#[test]
fn test_hint_positions_must_increase() {
    let msg = b"malformed-input tests";
    let (pk, sig) = keypair_and_sig();

    // give row 0 two position entries in descending order
    let mut bad = sig;
    bad[hint_base()] = 9;
    bad[hint_base() + 1] = 3;
    for i in 0..K_44 {
        let slot = hint_base() + OMEGA_44 + i;
        if bad[slot] < 2 {
            bad[slot] = 2;
        }
    }
    assert!(!pk.verify(msg, &bad, &[]));
}

#[test]
fn test_z_at_gamma1_fails_norm_check() {
    let msg = b"malformed-input tests";
    let (pk, sig) = keypair_and_sig();

    // an all-zero 18-bit field decodes to gamma1 exactly, which must trip
    // the ||z|| < gamma1 - beta bound
    let lambda_div4 = 32;
    let mut bad = sig;
    for b in &mut bad[lambda_div4..lambda_div4 + 9] {
        *b = 0;
    }
    assert!(!pk.verify(msg, &bad, &[]));
}

#[test]
fn test_corrupt_commitment_hash_rejected() {
    let msg = b"malformed-input tests";
    let (pk, sig) = keypair_and_sig();

    for i in 0..32 {
        let mut bad = sig;
        bad[i] = !bad[i];
        assert!(!pk.verify(msg, &bad, &[]));
    }
}

#[test]
fn test_private_key_with_bad_eta_nibble_rejected() {
    let (_, sk) = ml_dsa_65::keygen_from_seed(&[0x5Bu8; 32]);
    let mut sk_bytes = sk.into_bytes();

    // s1 packing for eta = 4 starts at offset 128; 0x99 holds two nibbles
    // of 9, both outside the accept set
    sk_bytes[128] = 0x99;
    assert!(matches!(
        ml_dsa_65::PrivateKey::try_from_bytes(&sk_bytes),
        Err(Error::InvalidEncoding)
    ));
}

#[test]
fn test_public_key_any_bytes_parse() {
    // every 10-bit pattern is in range, so arbitrary bytes parse and
    // round-trip bit-identically
    let mut pk_bytes = [0u8; ml_dsa_44::PK_LEN];
    for (i, b) in pk_bytes.iter_mut().enumerate() {
        *b = (i % 251) as u8;
    }
    let pk = ml_dsa_44::PublicKey::try_from_bytes(&pk_bytes).unwrap();
    assert_eq!(pk_bytes, pk.into_bytes());
}

//! This file implements functionality from FIPS 204 section 8.2 Encodings of ML-DSA Keys and Signatures

use crate::conversion::{
    bit_pack, bit_unpack, hint_bit_pack, hint_bit_unpack, simple_bit_pack, simple_bit_unpack,
};
use crate::helpers::bit_length;
use crate::types::{Error, R, R0};
use crate::{D, Q};


/// # Algorithm 22: `pkEncode(ρ,t1)` on page 33.
/// Encodes a public key into a byte string: `ρ` followed by the 10-bit
/// packing of each `t1` polynomial. Only used with trusted input.
pub(crate) fn pk_encode<const K: usize, const PK_LEN: usize>(
    rho: &[u8; 32], t1: &[R; K],
) -> [u8; PK_LEN] {
    let blqd = bit_length(Q - 1) - D as usize;
    debug_assert_eq!(PK_LEN, 32 + 32 * K * blqd, "Alg 22: bad pk/config size");
    let mut pk = [0u8; PK_LEN];

    // 1: pk ← BitsToBytes(ρ)
    pk[0..32].copy_from_slice(rho);

    // 2-4: pk ← pk || SimpleBitPack(t1[i], 2^{bitlen(q-1)-d} - 1)
    for i in 0..K {
        simple_bit_pack(
            &t1[i],
            (1 << blqd) - 1,
            &mut pk[32 + 32 * i * blqd..32 + 32 * (i + 1) * blqd],
        );
    }

    // 5: return pk
    pk
}


/// # Algorithm 23: `pkDecode(pk)` on page 33.
/// Reverses `pkEncode()`; exposed to untrusted input via deserialization.
/// Every 10-bit pattern is a legal `t1` coefficient, so a decoded public
/// key re-encodes to the identical byte string.
///
/// # Errors
/// Propagates `InvalidEncoding` from the unpacking layer (cannot occur for
/// this parameterization, kept for symmetry with the other decoders).
pub(crate) fn pk_decode<const K: usize, const PK_LEN: usize>(
    pk: &[u8; PK_LEN],
) -> Result<([u8; 32], [R; K]), Error> {
    let blqd = bit_length(Q - 1) - D as usize;
    debug_assert_eq!(PK_LEN, 32 + 32 * K * blqd, "Alg 23: bad pk/config size");

    // 1-2: ρ ← pk[0..32]
    let mut rho = [0u8; 32];
    rho.copy_from_slice(&pk[0..32]);

    // 3-5: t1[i] ← SimpleBitUnpack(z_i, 2^{bitlen(q-1)-d} - 1)
    let mut t1 = [R0; K];
    for i in 0..K {
        t1[i] = simple_bit_unpack(
            &pk[32 + 32 * i * blqd..32 + 32 * (i + 1) * blqd],
            (1 << blqd) - 1,
        )?;
    }

    // 6: return (ρ, t1)
    Ok((rho, t1))
}


/// # Algorithm 24: `skEncode(ρ,K,tr,s1,s2,t0)` on page 34.
/// Encodes a private key into a byte string. Only used with trusted input.
pub(crate) fn sk_encode<const K: usize, const L: usize, const SK_LEN: usize>(
    eta: u32, rho: &[u8; 32], cap_k: &[u8; 32], tr: &[u8; 64], s1: &[R; L], s2: &[R; K],
    t0: &[R; K],
) -> [u8; SK_LEN] {
    let top = 1u32 << (D - 1);
    debug_assert!((eta == 2) | (eta == 4), "Alg 24: incorrect eta");
    debug_assert_eq!(
        SK_LEN,
        128 + 32 * ((K + L) * bit_length(2 * eta) + D as usize * K),
        "Alg 24: bad sk/config size"
    );

    let mut sk = [0u8; SK_LEN];

    // 1: sk ← BitsToBytes(ρ) || BitsToBytes(K) || BitsToBytes(tr)
    sk[0..32].copy_from_slice(rho);
    sk[32..64].copy_from_slice(cap_k);
    sk[64..128].copy_from_slice(tr);

    // 2-4: sk ← sk || BitPack(s1[i], η, η)
    let start = 128;
    let step = 32 * bit_length(2 * eta);
    for i in 0..L {
        bit_pack(&s1[i], eta, eta, &mut sk[start + i * step..start + (i + 1) * step]);
    }

    // 5-7: sk ← sk || BitPack(s2[i], η, η)
    let start = start + L * step;
    for i in 0..K {
        bit_pack(&s2[i], eta, eta, &mut sk[start + i * step..start + (i + 1) * step]);
    }

    // 8-10: sk ← sk || BitPack(t0[i], 2^{d-1} - 1, 2^{d-1})
    let start = start + K * step;
    let step = 32 * D as usize;
    for i in 0..K {
        bit_pack(&t0[i], top - 1, top, &mut sk[start + i * step..start + (i + 1) * step]);
    }

    debug_assert_eq!(start + K * step, sk.len(), "Alg 24: length miscalculation");
    sk
}


/// # Algorithm 25: `skDecode(sk)` on page 34.
/// Reverses `skEncode()`; exposed to untrusted input via deserialization.
///
/// # Errors
/// Returns `InvalidEncoding` when an `s1`/`s2` field falls outside
/// `[−η, η]` (the t0 fields cover their full bit range and cannot fail).
#[allow(clippy::type_complexity)]
pub(crate) fn sk_decode<const K: usize, const L: usize, const SK_LEN: usize>(
    eta: u32, sk: &[u8; SK_LEN],
) -> Result<([u8; 32], [u8; 32], [u8; 64], [R; L], [R; K], [R; K]), Error> {
    let top = 1u32 << (D - 1);
    debug_assert!((eta == 2) | (eta == 4), "Alg 25: incorrect eta");
    debug_assert_eq!(
        SK_LEN,
        128 + 32 * ((K + L) * bit_length(2 * eta) + D as usize * K),
        "Alg 25: bad sk/config size"
    );

    // 1-4: (ρ, K, tr) ← sk[0..128]
    let mut rho = [0u8; 32];
    rho.copy_from_slice(&sk[0..32]);
    let mut cap_k = [0u8; 32];
    cap_k.copy_from_slice(&sk[32..64]);
    let mut tr = [0u8; 64];
    tr.copy_from_slice(&sk[64..128]);

    let (mut s1, mut s2, mut t0) = ([R0; L], [R0; K], [R0; K]);

    // 5-7: s1[i] ← BitUnpack(y_i, η, η)    ▷ may lie outside [−η, η] if malformed
    let start = 128;
    let step = 32 * bit_length(2 * eta);
    for i in 0..L {
        s1[i] = bit_unpack(&sk[start + i * step..start + (i + 1) * step], eta, eta)?;
    }

    // 8-10: s2[i] ← BitUnpack(z_i, η, η)
    let start = start + L * step;
    for i in 0..K {
        s2[i] = bit_unpack(&sk[start + i * step..start + (i + 1) * step], eta, eta)?;
    }

    // 11-13: t0[i] ← BitUnpack(w_i, 2^{d-1} - 1, 2^{d-1})
    let start = start + K * step;
    let step = 32 * D as usize;
    for i in 0..K {
        t0[i] = bit_unpack(&sk[start + i * step..start + (i + 1) * step], top - 1, top)?;
    }

    debug_assert_eq!(start + K * step, sk.len(), "Alg 25: length miscalculation");
    Ok((rho, cap_k, tr, s1, s2, t0))
}


/// # Algorithm 26: `sigEncode(c_tilde,z,h)` on page 35.
/// Encodes a signature into a byte string. Only used with trusted input at
/// the tail of the signing loop.
pub(crate) fn sig_encode<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
>(
    gamma1: u32, omega: usize, c_tilde: &[u8; LAMBDA_DIV4], z: &[R; L], h: &[R; K],
) -> [u8; SIG_LEN] {
    debug_assert_eq!(
        SIG_LEN,
        LAMBDA_DIV4 + L * 32 * (1 + bit_length(gamma1 - 1)) + omega + K,
        "Alg 26: bad sig/config size"
    );

    let mut sigma = [0u8; SIG_LEN];

    // 1: σ ← BitsToBytes(c_tilde)
    sigma[..LAMBDA_DIV4].copy_from_slice(c_tilde);

    // 2-4: σ ← σ || BitPack(z[i], γ1 − 1, γ1)
    let start = LAMBDA_DIV4;
    let step = 32 * (1 + bit_length(gamma1 - 1));
    for i in 0..L {
        bit_pack(&z[i], gamma1 - 1, gamma1, &mut sigma[start + i * step..start + (i + 1) * step]);
    }

    // 5: σ ← σ || HintBitPack(h)
    hint_bit_pack::<K>(omega, h, &mut sigma[start + L * step..]);

    sigma
}


/// # Algorithm 27: `sigDecode(σ)` on page 35.
/// Reverses `sigEncode()`; exposed to untrusted input in verification.
///
/// # Errors
/// Returns `InvalidEncoding` on a malformed hint area (the z fields cover
/// their full bit range and cannot fail).
#[allow(clippy::type_complexity)]
pub(crate) fn sig_decode<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
>(
    gamma1: u32, omega: usize, sigma: &[u8; SIG_LEN],
) -> Result<([u8; LAMBDA_DIV4], [R; L], [R; K]), Error> {
    debug_assert_eq!(
        SIG_LEN,
        LAMBDA_DIV4 + L * 32 * (1 + bit_length(gamma1 - 1)) + omega + K,
        "Alg 27: bad sig/config size"
    );

    // 1-2: c_tilde ← σ[0..λ/4]
    let mut c_tilde = [0u8; LAMBDA_DIV4];
    c_tilde.copy_from_slice(&sigma[0..LAMBDA_DIV4]);

    // 3-5: z[i] ← BitUnpack(x_i, γ1 − 1, γ1)
    let mut z = [R0; L];
    let start = LAMBDA_DIV4;
    let step = 32 * (1 + bit_length(gamma1 - 1));
    for i in 0..L {
        z[i] = bit_unpack(&sigma[start + i * step..start + (i + 1) * step], gamma1 - 1, gamma1)?;
    }

    // 6: h ← HintBitUnpack(y)
    let h = hint_bit_unpack::<K>(omega, &sigma[start + L * step..])?;

    // 7: return (c_tilde, z, h)
    Ok((c_tilde, z, h))
}


/// # Algorithm 28: `w1Encode(w1)` on page 35.
/// Encodes the commitment vector `w1` into the byte string hashed for the
/// challenge. Not exposed to untrusted input.
pub(crate) fn w1_encode<const K: usize>(gamma2: u32, w1: &[R; K], w1_tilde: &mut [u8]) {
    let b = (Q - 1) / (2 * gamma2) - 1;
    debug_assert_eq!(w1_tilde.len(), 32 * K * bit_length(b), "Alg 28: bad w1 output size");

    // 1-4: w1_tilde ← w1_tilde || SimpleBitPack(w1[i], (q-1)/(2γ2) - 1)
    let step = 32 * bit_length(b);
    for i in 0..K {
        simple_bit_pack(&w1[i], b, &mut w1_tilde[i * step..(i + 1) * step]);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::sub;
    use rand_core::RngCore;

    fn get_eta_poly(eta: u32) -> R {
        let mut rng = rand::thread_rng();
        R(core::array::from_fn(|_| sub(eta, rng.next_u32() % (2 * eta + 1))))
    }

    #[test]
    fn test_pk_round_trip_all_sets() {
        let mut rng = rand::thread_rng();
        // any byte string is a valid public key encoding
        let mut pk44 = [0u8; 1312];
        rng.fill_bytes(&mut pk44);
        let (rho, t1) = pk_decode::<4, 1312>(&pk44).unwrap();
        assert_eq!(pk44, pk_encode::<4, 1312>(&rho, &t1));

        let mut pk65 = [0u8; 1952];
        rng.fill_bytes(&mut pk65);
        let (rho, t1) = pk_decode::<6, 1952>(&pk65).unwrap();
        assert_eq!(pk65, pk_encode::<6, 1952>(&rho, &t1));

        let mut pk87 = [0u8; 2592];
        rng.fill_bytes(&mut pk87);
        let (rho, t1) = pk_decode::<8, 2592>(&pk87).unwrap();
        assert_eq!(pk87, pk_encode::<8, 2592>(&rho, &t1));
    }

    #[test]
    fn test_sk_round_trip() {
        let mut rng = rand::thread_rng();
        let mut rho = [0u8; 32];
        rng.fill_bytes(&mut rho);
        let mut cap_k = [0u8; 32];
        rng.fill_bytes(&mut cap_k);
        let mut tr = [0u8; 64];
        rng.fill_bytes(&mut tr);
        let s1: [R; 4] = core::array::from_fn(|_| get_eta_poly(2));
        let s2: [R; 4] = core::array::from_fn(|_| get_eta_poly(2));
        let t0: [R; 4] =
            core::array::from_fn(|_| R(core::array::from_fn(|_| sub(1 << 12, rng.next_u32() % (1 << 13)))));

        let sk = sk_encode::<4, 4, 2560>(2, &rho, &cap_k, &tr, &s1, &s2, &t0);
        let (rho2, cap_k2, tr2, s1_2, s2_2, t0_2) = sk_decode::<4, 4, 2560>(2, &sk).unwrap();
        assert!(
            (rho == rho2) & (cap_k == cap_k2) & (tr == tr2) & (s1 == s1_2) & (s2 == s2_2)
                & (t0 == t0_2)
        );
    }

    #[test]
    fn test_sk_decode_rejects_bad_eta_field() {
        let mut sk = [0u8; 2560];
        sk[128] = 0x07; // a 3-bit field of 7 is outside [0, 4]
        assert!(sk_decode::<4, 4, 2560>(2, &sk).is_err());
    }

    #[test]
    fn test_sig_round_trip() {
        let mut rng = rand::thread_rng();
        let mut c_tilde = [0u8; 32];
        rng.fill_bytes(&mut c_tilde);
        let gamma1 = 1u32 << 17;
        let z: [R; 4] = core::array::from_fn(|_| {
            R(core::array::from_fn(|_| sub(gamma1, rng.next_u32() % (2 * gamma1))))
        });
        let mut h = [R0; 4];
        h[1].0[7] = 1;
        h[3].0[200] = 1;

        let sigma = sig_encode::<4, 4, 32, 2420>(gamma1, 80, &c_tilde, &z, &h);
        let (c_test, z_test, h_test) = sig_decode::<4, 4, 32, 2420>(gamma1, 80, &sigma).unwrap();
        assert_eq!(c_tilde, c_test);
        assert_eq!(z, z_test);
        assert_eq!(h, h_test);
    }
}

//! This file implements the internal machinery of FIPS 204 section 6: key
//! generation (Algorithm 6), signing (Algorithm 7) and verification
//! (Algorithm 8), all in their `_internal` forms.

use crate::encodings::{pk_decode, pk_encode, sig_decode, sig_encode, sk_decode, w1_encode};
use crate::hashing::{expand_a, expand_mask, expand_s, h_xof, message_representative, sample_in_ball};
use crate::helpers::{
    count_ones, ct_eq, infinity_norm, infinity_norm_signed, mat_vec_mul, ntt_sub, poly_add,
    poly_sub, vec_add,
};
use crate::high_low::{high_bits, low_bits, make_hint, power2round, use_hint};
use crate::ntt::{inv_ntt, inv_ntt_vec, ntt, ntt_mul, ntt_vec};
use crate::types::{Error, PrivateKey, PublicKey, R, R0, T};
use crate::D;
use rand_core::CryptoRngCore;
use sha3::digest::XofReader;


/// # Algorithm 6: `ML-DSA.KeyGen_internal(ξ)` on page 23.
/// Deterministically derives a key pair from the 32-byte seed.
///
/// **Input**: Seed `ξ ∈ B^{32}` <br>
/// **Output**: Public and private key structs.
#[allow(clippy::cast_possible_truncation)] // K and L as u8
pub(crate) fn key_gen_from_seed<const K: usize, const L: usize, const PK_LEN: usize>(
    eta: u32, xi: &[u8; 32],
) -> (PublicKey<K, L>, PrivateKey<K, L>) {
    // 1: (ρ, ρ′, K) ∈ B^{32} × B^{64} × B^{32} ← H(ξ || k || ℓ, 1024)
    let mut h = h_xof(&[xi, &[K as u8], &[L as u8]]);
    let mut rho = [0u8; 32];
    h.read(&mut rho);
    let mut rho_prime = [0u8; 64];
    h.read(&mut rho_prime);
    let mut cap_k = [0u8; 32];
    h.read(&mut cap_k);

    // 2: A_hat ← ExpandA(ρ)    ▷ A is generated and stored in NTT representation
    let cap_a: [[T; L]; K] = expand_a(&rho);

    // 3: (s1, s2) ← ExpandS(ρ′)
    let (s1, s2) = expand_s::<K, L>(eta, &rho_prime);

    // 4: t ← NTT−1(A_hat ◦ NTT(s1)) + s2    ▷ t = A·s1 + s2
    let s1_hat = ntt_vec(&s1);
    let t = vec_add(&inv_ntt_vec(&mat_vec_mul(&cap_a, &s1_hat)), &s2);

    // 5: (t1, t0) ← Power2Round(t)    ▷ compress t
    let mut t1 = [R0; K];
    let mut t0 = [R0; K];
    for i in 0..K {
        for j in 0..256 {
            (t1[i].0[j], t0[i].0[j]) = power2round(t[i].0[j]);
        }
    }

    // 6: pk ← pkEncode(ρ, t1)
    let pk_bytes: [u8; PK_LEN] = pk_encode(&rho, &t1);

    // 7: tr ← H(pk, 512)
    let mut tr = [0u8; 64];
    h_xof(&[&pk_bytes]).read(&mut tr);

    // 8-9: sk ← skEncode(ρ, K, tr, s1, s2, t0); return (pk, sk)
    let pk = PublicKey { rho, t1, tr, cap_a };
    let sk = PrivateKey { rho, cap_k, tr, s1, s2, t0, cap_a, seed: Some(*xi) };
    (pk, sk)
}


/// # Algorithm 1: `ML-DSA.KeyGen()` on page 17.
/// Draws a fresh 32-byte seed from the given generator, then derives the
/// key pair deterministically.
///
/// # Errors
/// Returns `Entropy` when the random number generator fails.
pub(crate) fn key_gen<const K: usize, const L: usize, const PK_LEN: usize>(
    rng: &mut impl CryptoRngCore, eta: u32,
) -> Result<(PublicKey<K, L>, PrivateKey<K, L>), Error> {
    // 1-3: ξ ← B^{32}, error out if random bit generation failed
    let mut xi = [0u8; 32];
    rng.try_fill_bytes(&mut xi).map_err(|_| Error::Entropy)?;

    // 4: return ML-DSA.KeyGen_internal(ξ)
    Ok(key_gen_from_seed::<K, L, PK_LEN>(eta, &xi))
}


/// # Algorithm 7: `ML-DSA.Sign_internal(sk, M′, rnd)` on page 25.
/// Fiat-Shamir-with-aborts signing loop. `m_prime` is the formatted message
/// as a sequence of segments absorbed in order; `rnd` is 32 bytes of signer
/// randomness (all zero for the deterministic variant). The loop always
/// terminates for a well-formed private key; each iteration is independent
/// conditioned on the counter κ.
///
/// **Output**: Signature `σ ∈ B^{λ/4 + 32·ℓ·(1+bitlen(γ1−1)) + ω + k}`.
#[allow(clippy::similar_names, clippy::cast_possible_truncation)]
pub(crate) fn sign_internal<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
    const W1_LEN: usize,
>(
    beta: u32, gamma1: u32, gamma2: u32, omega: usize, tau: u32, sk: &PrivateKey<K, L>,
    rnd: &[u8; 32], m_prime: &[&[u8]],
) -> [u8; SIG_LEN] {
    // 1-2: s_hat_1 ← NTT(s1), s_hat_2 ← NTT(s2), t_hat_0 ← NTT(t0)
    let s1_hat: [T; L] = ntt_vec(&sk.s1);
    let s2_hat: [T; K] = ntt_vec(&sk.s2);
    let t0_hat: [T; K] = ntt_vec(&sk.t0);

    // 6: µ ← H(tr || M′, 512)    ▷ message representative
    let mu = message_representative(&sk.tr, m_prime);

    // 7: ρ′′ ← H(K || rnd || µ, 512)    ▷ private random seed
    let mut rho_pp = [0u8; 64];
    h_xof(&[&sk.cap_k, rnd, &mu]).read(&mut rho_pp);

    // 8-9: κ ← 0; (z, h) ← ⊥
    let mut kappa = 0u16;

    // 10: while (z, h) = ⊥ do    ▷ rejection sampling loop, continues instead of ⊥
    loop {
        // 11: y ← ExpandMask(ρ′′, κ)
        let y: [R; L] = expand_mask(gamma1, &rho_pp, kappa);

        // 24: κ ← κ + ℓ    (done up front; κ is not read again this round)
        kappa += L as u16;

        // 12: w ← NTT−1(A_hat ◦ NTT(y))
        let y_hat = ntt_vec(&y);
        let w = inv_ntt_vec(&mat_vec_mul(&sk.cap_a, &y_hat));

        // 13: w1 ← HighBits(w)    ▷ signer's commitment
        let mut w1 = [R0; K];
        for i in 0..K {
            for j in 0..256 {
                w1[i].0[j] = high_bits(gamma2, w[i].0[j]);
            }
        }

        // 14-15: c_tilde ← H(µ || w1Encode(w1), λ/4)    ▷ commitment hash
        let mut w1_enc = [0u8; W1_LEN];
        w1_encode(gamma2, &w1, &mut w1_enc);
        let mut c_tilde = [0u8; LAMBDA_DIV4];
        h_xof(&[&mu, &w1_enc]).read(&mut c_tilde);

        // 16-17: c ← SampleInBall(c_tilde); c_hat ← NTT(c)
        let c = sample_in_ball(tau, &c_tilde);
        let c_hat = ntt(&c);

        // 18-20: z ← y + NTT−1(c_hat ◦ s_hat_1)    ▷ signer's response
        let mut z = [R0; L];
        for i in 0..L {
            let cs1 = inv_ntt(&ntt_mul(&c_hat, &s1_hat[i]));
            z[i] = poly_add(&y[i], &cs1);
        }

        // 21: if ||z||∞ ≥ γ1 − β then (z, h) ← ⊥
        if infinity_norm(&z) >= gamma1 - beta {
            continue;
        }

        // 22: r0 ← LowBits(w − NTT−1(c_hat ◦ s_hat_2))
        let mut w_cs2 = [R0; K];
        let mut r0 = [[0i32; 256]; K];
        for i in 0..K {
            let cs2 = inv_ntt(&ntt_mul(&c_hat, &s2_hat[i]));
            w_cs2[i] = poly_sub(&w[i], &cs2);
            for j in 0..256 {
                r0[i][j] = low_bits(gamma2, w_cs2[i].0[j]);
            }
        }

        // 23: if ||r0||∞ ≥ γ2 − β then (z, h) ← ⊥
        #[allow(clippy::cast_possible_wrap)]
        if infinity_norm_signed(&r0) >= (gamma2 - beta) as i32 {
            continue;
        }

        // 25: ⟨⟨c_t_0⟩⟩ ← NTT−1(c_hat ◦ t_hat_0)
        let mut ct0 = [R0; K];
        for i in 0..K {
            ct0[i] = inv_ntt(&ntt_mul(&c_hat, &t0_hat[i]));
        }

        // 27 (first half): if ||⟨⟨c_t_0⟩⟩||∞ ≥ γ2 then (z, h) ← ⊥
        if infinity_norm(&ct0) >= gamma2 {
            continue;
        }

        // 26: h ← MakeHint(⟨⟨c_t_0⟩⟩, w − c·s2)    ▷ signer's hint
        let mut hints = [R0; K];
        for i in 0..K {
            for j in 0..256 {
                hints[i].0[j] = u32::from(make_hint(gamma2, ct0[i].0[j], w_cs2[i].0[j]));
            }
        }

        // 27 (second half): if the number of 1's in h exceeds ω then (z, h) ← ⊥
        if count_ones(&hints) > omega {
            continue;
        }

        // 32-33: σ ← sigEncode(c_tilde, z, h); return σ
        return sig_encode::<K, L, LAMBDA_DIV4, SIG_LEN>(gamma1, omega, &c_tilde, &z, &hints);
    }
}


/// # Algorithm 8: `ML-DSA.Verify_internal(pk, M′, σ)` on page 27.
/// Verifies a signature against the formatted message `m_prime` (supplied
/// as segments absorbed in order). Never errors: every malformed input
/// path returns `false`. The final commitment-hash comparison is
/// constant-time.
pub(crate) fn verify_internal<
    const K: usize,
    const L: usize,
    const LAMBDA_DIV4: usize,
    const SIG_LEN: usize,
    const W1_LEN: usize,
>(
    beta: u32, gamma1: u32, gamma2: u32, omega: usize, tau: u32, pk: &PublicKey<K, L>,
    sig: &[u8; SIG_LEN], m_prime: &[&[u8]],
) -> bool {
    // 1: (c_tilde, z, h) ← sigDecode(σ)    ▷ reject any malformed hint
    let Ok((c_tilde, z, hints)) = sig_decode::<K, L, LAMBDA_DIV4, SIG_LEN>(gamma1, omega, sig)
    else {
        return false;
    };

    // 13 (left term, hoisted): ||z||∞ < γ1 − β
    if infinity_norm(&z) >= gamma1 - beta {
        return false;
    }

    // 6-7: µ ← H(tr || M′, 512)
    let mu = message_representative(&pk.tr, m_prime);

    // 9: c ← SampleInBall(c_tilde); c_hat ← NTT(c)
    let c = sample_in_ball(tau, &c_tilde);
    let c_hat = ntt(&c);

    // 10: w′ ← NTT−1(A_hat ◦ NTT(z) − c_hat ◦ NTT(t1 · 2^d))
    let z_hat = ntt_vec(&z);
    let az_hat: [T; K] = mat_vec_mul(&pk.cap_a, &z_hat);

    // 11: w1 ← UseHint(h, w′)    ▷ reconstruct signer's commitment
    let mut w1 = [R0; K];
    for i in 0..K {
        let t1_d2 = R(core::array::from_fn(|j| pk.t1[i].0[j] << D));
        let ct1_hat = ntt_mul(&c_hat, &ntt(&t1_d2));
        let w_approx = inv_ntt(&ntt_sub(&az_hat[i], &ct1_hat));
        for j in 0..256 {
            w1[i].0[j] = use_hint(gamma2, hints[i].0[j], w_approx.0[j]);
        }
    }

    // 12: c_tilde′ ← H(µ || w1Encode(w1), λ/4)
    let mut w1_enc = [0u8; W1_LEN];
    w1_encode(gamma2, &w1, &mut w1_enc);
    let mut c_tilde_p = [0u8; LAMBDA_DIV4];
    h_xof(&[&mu, &w1_enc]).read(&mut c_tilde_p);

    // 13: [[c_tilde = c_tilde′]], compared without early exit
    ct_eq(&c_tilde, &c_tilde_p)
}


/// Rebuilds a [`PublicKey`] from its serialized form: decode ρ and t1,
/// regenerate `A_hat` from ρ, recompute `tr` over the full encoding.
///
/// # Errors
/// Returns `InvalidLength` on a wrong-size slice; propagates any decode
/// failure.
pub(crate) fn expand_public<const K: usize, const L: usize, const PK_LEN: usize>(
    pk_bytes: &[u8],
) -> Result<PublicKey<K, L>, Error> {
    let pk_bytes: &[u8; PK_LEN] = pk_bytes.try_into().map_err(|_| Error::InvalidLength)?;
    let (rho, t1) = pk_decode::<K, PK_LEN>(pk_bytes)?;

    let cap_a: [[T; L]; K] = expand_a(&rho);
    let mut tr = [0u8; 64];
    h_xof(&[pk_bytes]).read(&mut tr);

    Ok(PublicKey { rho, t1, tr, cap_a })
}


/// Rebuilds a [`PrivateKey`] from its serialized form, re-validating the η
/// encodings and regenerating `A_hat` from ρ. The originating seed is not
/// part of the encoding, so the result carries none.
///
/// # Errors
/// Returns `InvalidLength` on a wrong-size slice, `InvalidEncoding` on an
/// out-of-range secret coefficient.
pub(crate) fn expand_private<const K: usize, const L: usize, const SK_LEN: usize>(
    eta: u32, sk_bytes: &[u8],
) -> Result<PrivateKey<K, L>, Error> {
    let sk_bytes: &[u8; SK_LEN] = sk_bytes.try_into().map_err(|_| Error::InvalidLength)?;
    let (rho, cap_k, tr, s1, s2, t0) = sk_decode::<K, L, SK_LEN>(eta, sk_bytes)?;

    let cap_a: [[T; L]; K] = expand_a(&rho);
    Ok(PrivateKey { rho, cap_k, tr, s1, s2, t0, cap_a, seed: None })
}


/// Recomputes the public key belonging to a private key: t = A·s1 + s2,
/// then t1 from `Power2Round`; ρ, tr and `A_hat` carry over.
pub(crate) fn private_to_public_key<const K: usize, const L: usize>(
    sk: &PrivateKey<K, L>,
) -> PublicKey<K, L> {
    let s1_hat = ntt_vec(&sk.s1);
    let t = vec_add(&inv_ntt_vec(&mat_vec_mul(&sk.cap_a, &s1_hat)), &sk.s2);

    let mut t1 = [R0; K];
    for i in 0..K {
        for j in 0..256 {
            t1[i].0[j] = power2round(t[i].0[j]).0;
        }
    }

    PublicKey { rho: sk.rho, t1, tr: sk.tr, cap_a: sk.cap_a }
}

//! This file implements functionality from FIPS 204 section 8.3 Hashing and Pseudorandom Sampling

use crate::conversion::{bit_unpack, coeff_from_half_byte, coeff_from_three_bytes};
use crate::helpers::bit_length;
use crate::types::{R, R0, T, T0};
use crate::Q;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake256};


/// # Function H(v,d) of (3.7) on page 17.
/// Absorbs a list of byte-slice references into SHAKE256 and returns a xof
/// reader for extracting extendable output.
pub(crate) fn h_xof(v: &[&[u8]]) -> impl XofReader {
    let mut hasher = Shake256::default();
    v.iter().for_each(|b| hasher.update(b));
    hasher.finalize_xof()
}


/// # Function `H_128(v,d)` of (3.8) on page 17.
/// Absorbs a list of byte-slice references into SHAKE128 and returns a xof
/// reader for extracting extendable output.
pub(crate) fn h128_xof(v: &[&[u8]]) -> impl XofReader {
    let mut hasher = Shake128::default();
    v.iter().for_each(|b| hasher.update(b));
    hasher.finalize_xof()
}


/// The message representative `µ ← H(tr || M', 512)` of Algorithms 7 and 8.
/// `m_prime` is supplied as segments absorbed in order, so the external API
/// can prepend the domain separator and context without allocating.
pub(crate) fn message_representative(tr: &[u8; 64], m_prime: &[&[u8]]) -> [u8; 64] {
    let mut hasher = Shake256::default();
    hasher.update(tr);
    m_prime.iter().for_each(|b| hasher.update(b));
    let mut mu = [0u8; 64];
    hasher.finalize_xof().read(&mut mu);
    mu
}


/// # Algorithm 29: `SampleInBall(ρ)` on page 36.
/// Samples a polynomial `c ∈ R_q` with exactly `τ` nonzero coefficients,
/// each ±1 (q-1 encodes -1), via the Fisher-Yates construction. Operates on
/// the non-secret commitment hash only, so need not be constant-time.
///
/// **Input**: A seed `ρ ∈ B^{λ/4}` <br>
/// **Output**: A polynomial `c` in `R_q`.
pub(crate) fn sample_in_ball(tau: u32, rho: &[u8]) -> R {
    let tau = tau as usize;

    // 1: c ← 0
    let mut c = R0;

    // 2-3: ctx ← H.Init(); H.Absorb(ctx, ρ)
    let mut xof = h_xof(&[rho]);

    // 4-5: the first 8 squeezed bytes form the sign-bit register
    let mut s = [0u8; 8];
    xof.read(&mut s);
    let mut signs = u64::from_le_bytes(s);

    // 6: for i from 256 − τ to 255 do
    let mut j = [0u8];
    for i in (256 - tau)..256 {
        // 7-10: draw j until j ≤ i
        loop {
            xof.read(&mut j);
            if usize::from(j[0]) <= i {
                break;
            }
        }

        // 11-12: c_i ← c_j; c_j ← (−1)^{next sign bit}
        c.0[i] = c.0[usize::from(j[0])];
        c.0[usize::from(j[0])] = if signs & 1 == 0 { 1 } else { Q - 1 };
        signs >>= 1;

        // 13: end for
    }

    debug_assert_eq!(
        c.0.iter().filter(|&&e| e != 0).count(),
        tau,
        "Alg 29: bad hamming weight"
    );

    // 14: return c
    c
}


/// # Algorithm 30: `RejNTTPoly(ρ)` on page 37.
/// Samples a uniformly random polynomial in `T_q` by rejection from a
/// SHAKE128 stream, three bytes per candidate. The output is already in the
/// NTT domain; no transform is applied.
///
/// **Input**: A seed `ρ ∈ B^{34}`.<br>
/// **Output**: An element `a_hat ∈ T_q`.
pub(crate) fn rej_ntt_poly(rhos: &[&[u8]]) -> T {
    debug_assert_eq!(rhos.iter().map(|i| i.len()).sum::<usize>(), 34, "Alg 30: bad rho size");
    let mut a_hat = T0;
    let mut xof = h128_xof(rhos);

    // 1: j ← 0
    let mut j = 0;

    // 3: while j < 256 do
    while j < 256 {
        // 4-5: a_hat[j] ← CoeffFromThreeBytes(...); c ← c + 3
        let mut bytes = [0u8; 3];
        xof.read(&mut bytes);

        // 6-8: keep the draw unless it was rejected
        if let Some(coeff) = coeff_from_three_bytes(bytes) {
            a_hat.0[j] = coeff;
            j += 1;
        }

        // 9: end while
    }

    // 10: return a_hat
    a_hat
}


/// # Algorithm 31: `RejBoundedPoly(ρ)` on page 37.
/// Samples a polynomial with coefficients in `[−η, η]` by rejection from a
/// SHAKE256 stream, two nibble candidates per byte.
///
/// **Input**: A seed `ρ ∈ B^{66}`. <br>
/// **Output**: A polynomial `a ∈ R_q`.
pub(crate) fn rej_bounded_poly(eta: u32, rhos: &[&[u8]]) -> R {
    debug_assert_eq!(rhos.iter().map(|i| i.len()).sum::<usize>(), 66, "Alg 31: bad rho size");
    let mut a = R0;
    let mut xof = h_xof(rhos);

    // 1: j ← 0
    let mut j = 0;
    let mut z = [0u8];

    // 3: while j < 256 do
    while j < 256 {
        // 4: z ← H(ρ)[[c]]
        xof.read(&mut z);

        // 5-6: split into low and high nibble candidates
        let z0 = coeff_from_half_byte(eta, z[0] & 0x0F);
        let z1 = coeff_from_half_byte(eta, z[0] >> 4);

        // 7-10: if z0 != ⊥ then a_j ← z0
        if let Some(z0) = z0 {
            a.0[j] = z0;
            j += 1;
        }

        // 11-14: if z1 != ⊥ and j < 256 then a_j ← z1
        if let Some(z1) = z1 {
            if j < 256 {
                a.0[j] = z1;
                j += 1;
            }
        }

        // 16: end while
    }

    // 17: return a
    a
}


/// # Algorithm 32: `ExpandA(ρ)` on page 38.
/// Samples the k × ℓ matrix `A_hat` of NTT-domain polynomials from the
/// public seed. The column byte precedes the row byte in the XOF input.
#[allow(clippy::cast_possible_truncation)] // s and r as u8
pub(crate) fn expand_a<const K: usize, const L: usize>(rho: &[u8; 32]) -> [[T; L]; K] {
    // 1-5: A_hat[r, s] ← RejNTTPoly(ρ || IntegerToBytes(s, 1) || IntegerToBytes(r, 1))
    core::array::from_fn(|r| {
        core::array::from_fn(|s| rej_ntt_poly(&[&rho[..], &[s as u8], &[r as u8]]))
    })
}


/// # Algorithm 33: `ExpandS(ρ)` on page 38.
/// Samples the secret vectors `s1 ∈ R_q^ℓ` and `s2 ∈ R_q^k` with
/// coefficients in `[−η, η]`, using consecutive 16-bit nonces.
#[allow(clippy::cast_possible_truncation)] // r and r+L as u16
pub(crate) fn expand_s<const K: usize, const L: usize>(
    eta: u32, rho_prime: &[u8; 64],
) -> ([R; L], [R; K]) {
    // 1-3: s1[r] ← RejBoundedPoly(ρ' || IntegerToBytes(r, 2))
    let s1: [R; L] = core::array::from_fn(|r| {
        rej_bounded_poly(eta, &[rho_prime, &(r as u16).to_le_bytes()])
    });

    // 4-6: s2[r] ← RejBoundedPoly(ρ' || IntegerToBytes(r + ℓ, 2))
    let s2: [R; K] = core::array::from_fn(|r| {
        rej_bounded_poly(eta, &[rho_prime, &((r + L) as u16).to_le_bytes()])
    });

    // 7: return (s1, s2)
    (s1, s2)
}


/// # Algorithm 34: `ExpandMask(ρ,µ)` on page 38.
/// Samples the mask vector `y ∈ R_q^ℓ` with coefficients in
/// `(−γ1, γ1]`, one 16-bit counter per polynomial starting at `kappa`.
/// This function is not exposed to untrusted input.
#[allow(clippy::cast_possible_truncation)] // L as u16
pub(crate) fn expand_mask<const L: usize>(gamma1: u32, rho_pp: &[u8; 64], kappa: u16) -> [R; L] {
    let mut y = [R0; L];
    let mut v = [0u8; 32 * 20]; // large enough for both bit widths

    // 1: c ← 1 + bitlen(γ1 − 1)    ▷ γ1 is always a power of 2
    let c = 1 + bit_length(gamma1 - 1);
    debug_assert!((c == 18) | (c == 20), "Alg 34: illegal bit width");

    // 2: for r from 0 to ℓ − 1 do
    for r in 0..L as u16 {
        // 3: n ← IntegerToBytes(µ + r, 2)
        let n = kappa + r;

        // 4: v ← H(ρ || n)[[0 .. 32c]]
        let mut xof = h_xof(&[rho_pp, &n.to_le_bytes()]);
        xof.read(&mut v[0..32 * c]);

        // 5: y[r] ← BitUnpack(v, γ1 − 1, γ1)    ▷ cannot fail for a power of 2 range
        y[usize::from(r)] =
            bit_unpack(&v[0..32 * c], gamma1 - 1, gamma1).expect("cannot fail");

        // 6: end for
    }

    // 7: return y
    y
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{inf_norm, is_in_range};

    #[test]
    fn test_sample_in_ball_weight_and_values() {
        for tau in [39u32, 49, 60] {
            let c = sample_in_ball(tau, &[0x55; 32]);
            let nonzero = c.0.iter().filter(|&&e| e != 0).count();
            assert_eq!(nonzero, tau as usize);
            assert!(c.0.iter().all(|&e| (e == 0) | (e == 1) | (e == Q - 1)));
        }
    }

    #[test]
    fn test_rej_ntt_poly_in_field() {
        let rho = [0x11u8; 32];
        let a = rej_ntt_poly(&[&rho, &[0], &[1]]);
        assert!(a.0.iter().all(|&e| e < Q));
    }

    #[test]
    fn test_rej_bounded_poly_range() {
        let rho = [0x22u8; 64];
        for eta in [2u32, 4] {
            let a = rej_bounded_poly(eta, &[&rho, &0u16.to_le_bytes()]);
            assert!(is_in_range(&a, eta, eta));
        }
    }

    #[test]
    fn test_expand_s_distinct_nonces() {
        let rho = [0x33u8; 64];
        let (s1, s2) = expand_s::<4, 4>(2, &rho);
        // the s2 stream continues where s1 left off, so rows differ
        assert_ne!(s1[0], s1[1]);
        assert_ne!(s1[0], s2[0]);
    }

    #[test]
    fn test_expand_mask_range() {
        let rho = [0x44u8; 64];
        for gamma1 in [1u32 << 17, 1 << 19] {
            let y: [R; 4] = expand_mask(gamma1, &rho, 0);
            assert!(y.iter().all(|p| p.0.iter().all(|&e| inf_norm(e) <= gamma1)));
        }
    }

    #[test]
    fn test_expand_a_deterministic() {
        let rho = [0x66u8; 32];
        let a1: [[T; 4]; 4] = expand_a(&rho);
        let a2: [[T; 4]; 4] = expand_a(&rho);
        assert!(a1 == a2);
        assert!(a1[0][0] != a1[0][1]);
    }
}

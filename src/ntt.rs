//! This file implements functionality from FIPS 204 section 8.5 `NTT` and `invNTT`

use crate::helpers::{add, mul, sub, INV_N, MONT_R2};
use crate::types::{R, T};
use crate::{Q, ZETA};


/// HAC Algorithm 14.76 Right-to-left binary exponentiation mod q.
const fn pow_mod_q(g: u32, e: u8) -> u32 {
    let mut result: u64 = 1;
    let mut s = g as u64;
    let mut e = e;
    while e != 0 {
        if e & 1 != 0 {
            result = (result * s) % (Q as u64);
        }
        e >>= 1;
        s = (s * s) % (Q as u64);
    }
    result as u32
}


/// Twiddle factors in Montgomery form: `zetas[k] = zeta^bitrev8(k) * 2^32
/// mod q` with zeta = 1753, the primitive 512-th root of unity mod q.
const fn gen_zeta_table_mont() -> [u32; 256] {
    let mut result = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        result[i] = mul(pow_mod_q(ZETA, (i as u8).reverse_bits()), MONT_R2);
        i += 1;
    }
    result
}

static ZETA_TABLE_MONT: [u32; 256] = gen_zeta_table_mont();


/// # Algorithm 41: `NTT(w)` on page 43.
/// Computes the Number-Theoretic Transform of a polynomial in the standard
/// basis; the output coefficients are in bit-reversed index order. The
/// Montgomery factor carried by the twiddle table cancels within each
/// butterfly, so canonical input yields canonical output.
///
/// **Input**: polynomial `w(X) = ∑ w_j X^j ∈ R_q` <br>
/// **Output**: `w_hat = (w_hat[0], ..., w_hat[255]) ∈ T_q`
pub(crate) fn ntt(w: &R) -> T {
    let mut f = w.0;
    let mut k = 1;

    // 5-8: len runs 128, 64, ..., 1; start walks the coefficient pairs
    let mut len = 128;
    while len >= 1 {
        let mut start = 0;
        while start < 256 {
            // 10: zeta ← zeta^{brv(k)} mod q
            let zeta = ZETA_TABLE_MONT[k];
            k += 1;

            // 11-15: butterfly
            for j in start..(start + len) {
                let t = mul(zeta, f[j + len]);
                f[j + len] = sub(f[j], t);
                f[j] = add(f[j], t);
            }

            start += 2 * len;
        }
        len /= 2;
    }

    T(f)
}


/// # Algorithm 42: `NTT^-1(w_hat)` on page 44.
/// Computes the inverse Number-Theoretic Transform. The final scaling by
/// `256^-1 * 2^64 mod q` both applies `n^-1` and strips the single
/// Montgomery factor deficit left by a preceding pointwise multiplication,
/// so `inv_ntt` is the exact inverse of `ntt` composed with one
/// [`ntt_mul`].
///
/// **Input**: `w_hat = (w_hat[0], ..., w_hat[255]) ∈ T_q` <br>
/// **Output**: polynomial `w(X) = ∑ w_j X^j ∈ R_q`
pub(crate) fn inv_ntt(w_hat: &T) -> R {
    let mut f = w_hat.0;
    let mut k = 255;

    // 5-8: len runs 1, 2, ..., 128, mirroring the forward transform
    let mut len = 1;
    while len < 256 {
        let mut start = 0;
        while start < 256 {
            // 10: zeta ← -zeta^{brv(k)} mod q
            let zeta = Q - ZETA_TABLE_MONT[k];
            k -= 1;

            // 11-16: inverse butterfly
            for j in start..(start + len) {
                let t = f[j];
                f[j] = add(t, f[j + len]);
                f[j + len] = mul(zeta, sub(t, f[j + len]));
            }

            start += 2 * len;
        }
        len *= 2;
    }

    // 21-24: scale by f = 256^-1 (in Montgomery form)
    for e in &mut f {
        *e = mul(*e, INV_N);
    }

    R(f)
}


/// # Algorithm 45: `MultiplyNTT(a_hat, b_hat)` on page 45.
/// Coordinate-wise Montgomery product of two NTT-domain polynomials.
pub(crate) fn ntt_mul(a: &T, b: &T) -> T {
    T(core::array::from_fn(|i| mul(a.0[i], b.0[i])))
}


/// Lift of [`ntt`] to a vector of polynomials.
pub(crate) fn ntt_vec<const X: usize>(v: &[R; X]) -> [T; X] {
    core::array::from_fn(|i| ntt(&v[i]))
}


/// Lift of [`inv_ntt`] to a vector of polynomials.
pub(crate) fn inv_ntt_vec<const X: usize>(v: &[T; X]) -> [R; X] {
    core::array::from_fn(|i| inv_ntt(&v[i]))
}

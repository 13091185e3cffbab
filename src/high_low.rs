//! This file implements functionality from FIPS 204 section 8.4 High Order / Low Order Bits and Hints

use crate::helpers::{add, sub};
use crate::{D, Q};

// The closed-form high-bits branches follow the dilithium reference tricks
// https://github.com/PQClean/PQClean/tree/master/crypto_sign


/// # Algorithm 35: `Power2Round(r)` on page 40.
/// Decomposes canonical `r` into `(r1, r0)` with `r ≡ r1*2^d + r0 mod q`
/// and `r0` the centered residue in `(-2^{d-1}, 2^{d-1}]` (returned as a
/// canonical field element).
pub(crate) fn power2round(r: u32) -> (u32, u32) {
    // 1-3: r1 ← round(r / 2^d), r0 ← r - r1*2^d centered
    let mut r1 = r >> D;
    let mut r0 = r - (r1 << D);
    if r0 > 1 << (D - 1) {
        r0 = sub(r0, 1 << D);
        r1 += 1;
    }
    (r1, r0)
}


/// # Algorithm 37: `HighBits(r)` on page 40.
/// Returns `r1` from the decomposition of `r` by `2*gamma2`, an integer in
/// `[0, 16)` for gamma2 = (q-1)/32 or `[0, 44)` for gamma2 = (q-1)/88.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub(crate) fn high_bits(gamma2: u32, r: u32) -> u32 {
    let r1 = ((r + 127) >> 7) as i32;

    if gamma2 == (Q - 1) / 32 {
        // m = 16: r1 ← (ceil(r/128) * 1025 + 2^21) / 2^22 mod 16
        (((r1 * 1025 + (1 << 21)) >> 22) as u32) & 15
    } else {
        // gamma2 = (q-1)/88, m = 44
        let mut r1 = (r1 * 11275 + (1 << 23)) >> 24;
        // clamp the q-1 wraparound back to 0
        r1 ^= ((43 - r1) >> 31) & r1;
        r1 as u32
    }
}


/// # Algorithm 36: `Decompose(r)` on page 40.
/// Splits canonical `r` into `(r1, r0)` with `r ≡ r1*2*gamma2 + r0 mod q`
/// and `r0` centered in `(-gamma2, gamma2]` (signed).
#[allow(clippy::cast_possible_wrap)]
pub(crate) fn decompose(gamma2: u32, r: u32) -> (u32, i32) {
    // 1: r1 ← HighBits(r)
    let r1 = high_bits(gamma2, r);

    // 2: r0 ← r - r1*2*gamma2, centered by conditional subtraction of q
    let mut r0 = r as i32 - (r1 * 2 * gamma2) as i32;
    r0 -= (((Q as i32 - 1) / 2 - r0) >> 31) & Q as i32;

    (r1, r0)
}


/// # Algorithm 38: `LowBits(r)` on page 41.
/// Returns the centered signed `r0` from the decomposition of `r`.
pub(crate) fn low_bits(gamma2: u32, r: u32) -> i32 {
    decompose(gamma2, r).1
}


/// # Algorithm 39: `MakeHint(z,r)` on page 41.
/// Returns true iff adding `z` to `r` alters the high bits of `r`.
pub(crate) fn make_hint(gamma2: u32, z: u32, r: u32) -> bool {
    high_bits(gamma2, add(r, z)) != high_bits(gamma2, r)
}


/// # Algorithm 40: `UseHint(h,r)` on page 41.
/// Returns the high bits of `r`, moved to the neighbouring value (mod 16 or
/// mod 44) when the hint is set. Operates on public signature data only, so
/// need not be constant-time.
pub(crate) fn use_hint(gamma2: u32, h: u32, r: u32) -> u32 {
    // 2: (r1, r0) ← Decompose(r)
    let (r1, r0) = decompose(gamma2, r);

    if h == 0 {
        return r1;
    }

    // 3: if h = 1 and r0 > 0 return (r1 + 1) mod m
    // 4: if h = 1 and r0 ≤ 0 return (r1 - 1) mod m
    if gamma2 == (Q - 1) / 32 {
        if r0 > 0 {
            (r1 + 1) & 15
        } else {
            r1.wrapping_sub(1) & 15
        }
    } else if r0 > 0 {
        if r1 == 43 {
            0
        } else {
            r1 + 1
        }
    } else if r1 == 0 {
        43
    } else {
        r1 - 1
    }
}

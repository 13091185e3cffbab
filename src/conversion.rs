//! This file implements functionality from FIPS 204 section 7.1 Conversion Between Data Types

use crate::helpers::{bit_length, ensure, sub};
use crate::types::{Error, R, R0};
use crate::Q;


// Algorithms 9-13 (IntegerToBits, BitsToInteger, IntegerToBytes, BitsToBytes,
// BytesToBits) are not implemented standalone: the pack and unpack routines
// below work on whole bytes directly.


/// # Algorithm 14: `CoeffFromThreeBytes(b0,b1,b2)` on page 29.
/// Generates an element of `{0, 1, ..., q-1} ∪ {⊥}` for rejection sampling;
/// `None` is the rejection case. Only operates on the non-secret `rho`
/// stream expanded from the public seed.
pub(crate) fn coeff_from_three_bytes(b: [u8; 3]) -> Option<u32> {
    // 1-4: clear the top bit of b2, then z ← 2^16*b2' + 2^8*b1 + b0
    let z = (u32::from(b[2] & 0x7F) << 16) | (u32::from(b[1]) << 8) | u32::from(b[0]);

    // 6-8: accept iff z < q
    (z < Q).then_some(z)
}


/// # Algorithm 15: `CoeffFromHalfByte(b)` on page 30.
/// Generates an element of `{-eta, ..., eta} ∪ {⊥}` for eta ∈ {2, 4};
/// `None` is the rejection case. The result is returned as a canonical
/// field element (negatives reduced mod q).
pub(crate) fn coeff_from_half_byte(eta: u32, b: u8) -> Option<u32> {
    debug_assert!((eta == 2) | (eta == 4), "Alg 15: incorrect eta");
    debug_assert!(b < 16, "Alg 15: b out of range");

    // 1: if eta = 2 and b < 15 then return 2 - (b mod 5)
    if (eta == 2) && (b < 15) {
        Some(sub(2, u32::from(b % 5)))

    // 3: if eta = 4 and b < 9 then return 4 - b
    } else if (eta == 4) && (b < 9) {
        Some(sub(4, u32::from(b)))

    // 4: else return ⊥
    } else {
        None
    }
}


/// # Algorithm 16: `SimpleBitPack(w,b)` on page 30.
/// Encodes a polynomial with coefficients in `[0, b]` into `32*bitlen(b)`
/// bytes. Not exposed to unvalidated input.
pub(crate) fn simple_bit_pack(w: &R, b: u32, bytes_out: &mut [u8]) {
    debug_assert!(w.0.iter().all(|&e| e <= b), "Alg 16: w out of range");
    debug_assert_eq!(bytes_out.len(), 32 * bit_length(b), "Alg 16: bad output size");

    // Identical to BitPack with the lower bound set to zero
    bit_pack(w, 0, b, bytes_out);
}


/// # Algorithm 17: `BitPack(w,a,b)` on page 30.
/// Encodes a polynomial whose coefficients lie in `[-a, b]` (as signed
/// residues mod q) into `32*bitlen(a+b)` bytes; each coefficient is stored
/// as `b - w mod q` in `bitlen(a+b)` bits, little-endian. Not exposed to
/// unvalidated input.
pub(crate) fn bit_pack(w: &R, a: u32, b: u32, bytes_out: &mut [u8]) {
    debug_assert!(crate::helpers::is_in_range(w, a, b), "Alg 17: w out of range");
    debug_assert_eq!(bytes_out.len() * 8, 256 * bit_length(a + b), "Alg 17: bad output size");

    let bitlen = bit_length(a + b);
    let mut temp = 0u32; // bits accumulate at the top, bytes drain from the bottom
    let mut byte_index = 0;
    let mut bit_index = 0;

    for coeff in w.0 {
        // the a = 0 encodings store the coefficient itself
        let val = if a == 0 { coeff } else { sub(b, coeff) };
        temp |= val << bit_index;
        bit_index += bitlen;
        while bit_index > 7 {
            bytes_out[byte_index] = temp.to_le_bytes()[0];
            temp >>= 8;
            byte_index += 1;
            bit_index -= 8;
        }
    }
}


/// # Algorithm 18: `SimpleBitUnpack(v,b)` on page 31.
/// Reverses `SimpleBitPack()`. Exposed to untrusted input via `pkDecode()`.
///
/// # Errors
/// Returns `InvalidEncoding` on a coefficient outside `[0, b]` (cannot
/// occur when `b + 1` is a power of two).
pub(crate) fn simple_bit_unpack(v: &[u8], b: u32) -> Result<R, Error> {
    debug_assert_eq!(v.len(), 32 * bit_length(b), "Alg 18: bad input size");

    bit_unpack(v, 0, b)
}


/// # Algorithm 19: `BitUnpack(v,a,b)` on page 31.
/// Reverses `BitPack()`, producing canonical coefficients. Exposed to
/// untrusted input via `skDecode()` and `sigDecode()`.
///
/// # Errors
/// Returns `InvalidEncoding` on any field outside `[0, a+b]` — this is the
/// eta-nibble rejection (fields ≥ 5 for eta = 2, ≥ 9 for eta = 4). When
/// `a + b + 1` is a power of two every field is legal.
pub(crate) fn bit_unpack(v: &[u8], a: u32, b: u32) -> Result<R, Error> {
    debug_assert_eq!(v.len() * 8, 256 * bit_length(a + b), "Alg 19: bad input size");

    let bitlen = bit_length(a + b);
    let mut w_out = R0;
    let mut temp = 0u32;
    let mut r_index = 0;
    let mut bit_index = 0;

    for byte in v {
        temp |= u32::from(*byte) << bit_index;
        bit_index += 8;
        while bit_index >= bitlen {
            let field = temp & ((1 << bitlen) - 1);
            ensure!(field <= a + b, Error::InvalidEncoding);
            // choice fixed by the encoding parameters, so CT
            w_out.0[r_index] = if a == 0 { field } else { sub(b, field) };
            bit_index -= bitlen;
            temp >>= bitlen;
            r_index += 1;
        }
    }

    Ok(w_out)
}


/// # Algorithm 20: `HintBitPack(h)` on page 32.
/// Encodes a hint vector with at most `omega` nonzero coefficients into
/// `omega + K` bytes: ascending positions per row, then cumulative counts.
pub(crate) fn hint_bit_pack<const K: usize>(omega: usize, h: &[R; K], y_bytes: &mut [u8]) {
    debug_assert_eq!(y_bytes.len(), omega + K, "Alg 20: bad output size");
    debug_assert!(crate::helpers::count_ones(h) <= omega, "Alg 20: too many 1's in h");

    // 1: y ← 0^{omega+k}
    y_bytes.fill(0);

    // 2: Index ← 0
    let mut index = 0;

    // 3-11: per row, store the locations of the nonzero coefficients,
    // then the running total at y[omega + i]
    for i in 0..K {
        for j in 0..256 {
            if h[i].0[j] != 0 {
                y_bytes[index] = j.to_le_bytes()[0];
                index += 1;
            }
        }
        y_bytes[omega + i] = index.to_le_bytes()[0];
    }
}


/// # Algorithm 21: `HintBitUnpack(y)` on page 32.
/// Reverses `HintBitPack()`, enforcing that per-row cumulative counts are
/// non-decreasing and at most `omega`, that positions within a row strictly
/// increase, and that unused slots are zero.
///
/// # Errors
/// Returns `InvalidEncoding` on any malformed input (the `⊥` cases).
pub(crate) fn hint_bit_unpack<const K: usize>(omega: usize, y_bytes: &[u8]) -> Result<[R; K], Error> {
    debug_assert_eq!(y_bytes.len(), omega + K, "Alg 21: bad input size");

    // 1: h ← 0^k
    let mut h = [R0; K];

    // 2: Index ← 0
    let mut index = 0usize;

    // 3-15: reconstruct each row
    for i in 0..K {
        // 4: if y[omega + i] < Index or y[omega + i] > omega then return ⊥
        let limit = usize::from(y_bytes[omega + i]);
        ensure!((limit >= index) & (limit <= omega), Error::InvalidEncoding);

        let first = index;
        while index < limit {
            // 9: positions within a row must strictly increase
            if index > first {
                ensure!(y_bytes[index - 1] < y_bytes[index], Error::InvalidEncoding);
            }
            h[i].0[usize::from(y_bytes[index])] = 1;
            index += 1;
        }
    }

    // 16-19: leftover position bytes must all be zero
    for y in &y_bytes[index..omega] {
        ensure!(*y == 0, Error::InvalidEncoding);
    }

    // 20: return h
    Ok(h)
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::RngCore;

    #[test]
    fn test_coeff_from_three_bytes_accept() {
        assert_eq!(coeff_from_three_bytes([0x12, 0x34, 0x56]).unwrap(), 0x0056_3412);
        // top bit of b2 is masked off
        assert_eq!(coeff_from_three_bytes([0x12, 0x34, 0x80]).unwrap(), 0x0000_3412);
        assert_eq!(coeff_from_three_bytes([0x01, 0xe0, 0x80]).unwrap(), 0x0000_e001);
    }

    #[test]
    fn test_coeff_from_three_bytes_reject() {
        // z = 0x7FE001 = q is the smallest rejected value
        assert!(coeff_from_three_bytes([0x01, 0xe0, 0x7f]).is_none());
        assert!(coeff_from_three_bytes([0xff, 0xff, 0x7f]).is_none());
    }

    #[test]
    fn test_coeff_from_half_byte() {
        assert_eq!(coeff_from_half_byte(2, 3).unwrap(), Q - 1); // 2 - (3 mod 5) = -1
        assert_eq!(coeff_from_half_byte(2, 5).unwrap(), 2); // 2 - (5 mod 5)
        assert_eq!(coeff_from_half_byte(4, 8).unwrap(), Q - 4); // 4 - 8
        assert!(coeff_from_half_byte(2, 15).is_none());
        assert!(coeff_from_half_byte(4, 9).is_none());
    }

    #[test]
    fn test_simple_bit_pack_round_trip() {
        let mut random_bytes = [0u8; 32 * 10];
        rand::thread_rng().fill_bytes(&mut random_bytes);
        let r = simple_bit_unpack(&random_bytes, (1 << 10) - 1).unwrap();
        let mut res = [0u8; 32 * 10];
        simple_bit_pack(&r, (1 << 10) - 1, &mut res);
        assert_eq!(random_bytes, res);
    }

    #[test]
    fn test_bit_pack_round_trip_eta() {
        let mut w = R0;
        let mut rng = rand::thread_rng();
        w.0.iter_mut().for_each(|e| *e = sub(2, rng.next_u32() % 5));
        let mut bytes = [0u8; 96];
        bit_pack(&w, 2, 2, &mut bytes);
        assert_eq!(w, bit_unpack(&bytes, 2, 2).unwrap());
    }

    #[test]
    fn test_bit_unpack_eta_rejection() {
        // a nibble of 5 is outside the eta = 2 accept set {0..4}
        let mut bytes = [0u8; 96];
        bytes[0] = 0x05;
        assert_eq!(bit_unpack(&bytes, 2, 2), Err(Error::InvalidEncoding));
        // 9 is outside the eta = 4 accept set {0..8}
        let mut bytes = [0u8; 128];
        bytes[0] = 0x09;
        assert_eq!(bit_unpack(&bytes, 4, 4), Err(Error::InvalidEncoding));
    }

    #[test]
    fn test_hint_pack_round_trip() {
        const OMEGA: usize = 80;
        let mut h = [R0; 4];
        h[0].0[3] = 1;
        h[0].0[17] = 1;
        h[2].0[255] = 1;
        let mut y = [0u8; OMEGA + 4];
        hint_bit_pack::<4>(OMEGA, &h, &mut y);
        assert_eq!(h, hint_bit_unpack::<4>(OMEGA, &y).unwrap());
    }

    #[test]
    fn test_hint_unpack_rejects_descending_positions() {
        const OMEGA: usize = 80;
        let mut y = [0u8; OMEGA + 4];
        y[0] = 9;
        y[1] = 3; // not strictly increasing
        y[OMEGA] = 2;
        y[OMEGA + 1] = 2;
        y[OMEGA + 2] = 2;
        y[OMEGA + 3] = 2;
        assert!(hint_bit_unpack::<4>(OMEGA, &y).is_err());
    }

    #[test]
    fn test_hint_unpack_rejects_decreasing_counts() {
        const OMEGA: usize = 80;
        let mut y = [0u8; OMEGA + 4];
        y[0] = 1;
        y[OMEGA] = 1;
        y[OMEGA + 1] = 0; // cumulative count went backwards
        assert!(hint_bit_unpack::<4>(OMEGA, &y).is_err());
    }

    #[test]
    fn test_hint_unpack_rejects_nonzero_padding() {
        const OMEGA: usize = 80;
        let mut y = [0u8; OMEGA + 4];
        y[5] = 77; // inside the unused area
        assert!(hint_bit_unpack::<4>(OMEGA, &y).is_err());
    }

    #[test]
    fn test_hint_unpack_rejects_count_above_omega() {
        const OMEGA: usize = 80;
        let mut y = [0u8; OMEGA + 4];
        y[OMEGA + 3] = (OMEGA + 1).to_le_bytes()[0];
        assert!(hint_bit_unpack::<4>(OMEGA, &y).is_err());
    }
}

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Polynomial in `R_q = Z_q[X]/(X^256+1)`, standard coefficient basis.
/// Coefficients are canonical field elements in `[0, q)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Zeroize)]
pub(crate) struct R(pub(crate) [u32; 256]);

/// Polynomial in the NTT domain `T_q`, coefficients in bit-reversed index
/// order per FIPS 204. Same shape as [`R`] but semantically distinct; the
/// only legal conversions are `ntt()` and `inv_ntt()`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Zeroize)]
pub(crate) struct T(pub(crate) [u32; 256]);

pub(crate) const R0: R = R([0; 256]);
pub(crate) const T0: T = T([0; 256]);


/// The crate-wide error type.
///
/// Verification functions never surface these: any malformed signature
/// simply verifies as `false`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A byte slice has the wrong size for the chosen parameter set.
    InvalidLength,
    /// A decoded coefficient or hint lies outside its legal domain.
    InvalidEncoding,
    /// The context string exceeds 255 bytes.
    InvalidContext,
    /// The random number generator failed or returned short.
    Entropy,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidLength => write!(f, "mldsa: invalid byte length for parameter set"),
            Error::InvalidEncoding => write!(f, "mldsa: invalid encoding"),
            Error::InvalidContext => write!(f, "mldsa: context string longer than 255 bytes"),
            Error::Entropy => write!(f, "mldsa: random number generator failed"),
        }
    }
}

impl core::error::Error for Error {}


/// Private key specific to the target parameter set. Contains the expanded
/// matrix `A_hat` so that repeated signing does not re-run `ExpandA`.
///
/// Implements the [`crate::traits::Signer`] and [`crate::traits::SerDes`]
/// traits. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey<const K: usize, const L: usize> {
    pub(crate) rho: [u8; 32],
    pub(crate) cap_k: [u8; 32],
    pub(crate) tr: [u8; 64],
    pub(crate) s1: [R; L],
    pub(crate) s2: [R; K],
    pub(crate) t0: [R; K],
    pub(crate) cap_a: [[T; L]; K],
    pub(crate) seed: Option<[u8; 32]>,
}

impl<const K: usize, const L: usize> PrivateKey<K, L> {
    /// Returns the 32-byte seed this key was derived from, when the key was
    /// produced by key generation. Keys deserialized from bytes do not carry
    /// the seed (the FIPS 204 private key encoding does not retain it) and
    /// return `None`.
    #[must_use]
    pub fn seed(&self) -> Option<[u8; 32]> {
        self.seed
    }
}


/// Public key specific to the target parameter set. Contains the expanded
/// matrix `A_hat` so that repeated verification does not re-run `ExpandA`.
///
/// Implements the [`crate::traits::Verifier`] and [`crate::traits::SerDes`]
/// traits.
#[derive(Clone)]
pub struct PublicKey<const K: usize, const L: usize> {
    pub(crate) rho: [u8; 32],
    pub(crate) t1: [R; K],
    pub(crate) tr: [u8; 64],
    pub(crate) cap_a: [[T; L]; K],
}

// The derived fields (tr, A_hat) are functions of (rho, t1).
impl<const K: usize, const L: usize> PartialEq for PublicKey<K, L> {
    fn eq(&self, other: &Self) -> bool {
        (self.rho == other.rho) & (self.t1 == other.t1)
    }
}

impl<const K: usize, const L: usize> Eq for PublicKey<K, L> {}

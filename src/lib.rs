#![no_std]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, missing_docs)]
#![doc = include_str!("../README.md")]

// Implements FIPS 204 Module-Lattice-Based Digital Signature Standard.
// See <https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.204.pdf>

// Functionality map per FIPS 204
//
// Algorithm 1 ML-DSA.KeyGen() on page 17                   --> lib.rs / ml_dsa.rs
// Algorithm 2 ML-DSA.Sign(sk,M,ctx) on page 18             --> lib.rs
// Algorithm 3 ML-DSA.Verify(pk,M,sigma,ctx) on page 18     --> lib.rs
// Algorithm 4/5 HashML-DSA                                 --> intentionally not implemented
// Algorithm 6 ML-DSA.KeyGen_internal(xi) on page 23        --> ml_dsa.rs
// Algorithm 7 ML-DSA.Sign_internal(sk,M',rnd) on page 25   --> ml_dsa.rs
// Algorithm 8 ML-DSA.Verify_internal(pk,M',sigma) on p 27  --> ml_dsa.rs
// Algorithms 9-13 bit/byte conversions                     --> (folded into) conversion.rs
// Algorithm 14 CoeffFromThreeBytes(b0,b1,b2) on page 29    --> conversion.rs
// Algorithm 15 CoeffFromHalfByte(b) on page 30             --> conversion.rs
// Algorithms 16-19 (Simple)BitPack / (Simple)BitUnpack     --> conversion.rs
// Algorithm 20 HintBitPack(h) on page 32                   --> conversion.rs
// Algorithm 21 HintBitUnpack(y) on page 32                 --> conversion.rs
// Algorithms 22-28 pk/sk/sig/w1 encodings on pages 33-35   --> encodings.rs
// Algorithm 29 SampleInBall(rho) on page 36                --> hashing.rs
// Algorithm 30 RejNTTPoly(rho) on page 37                  --> hashing.rs
// Algorithm 31 RejBoundedPoly(rho) on page 37              --> hashing.rs
// Algorithms 32-34 ExpandA / ExpandS / ExpandMask          --> hashing.rs
// Algorithms 35-40 Power2Round .. UseHint on pages 40-41   --> high_low.rs
// Algorithm 41 NTT(w) on page 43                           --> ntt.rs
// Algorithm 42 NTT-1(w_hat) on page 44                     --> ntt.rs
// Algorithm 43 BitRev8(m) on page 44                       --> folded into the zeta table
// Algorithms 44-48 NTT-domain arithmetic on pages 45-46    --> helpers.rs / ntt.rs
// Algorithm 49 MontgomeryReduce(a) on page 50              --> helpers.rs
// Types are in types.rs, traits are in traits.rs

/// The `rand_core` types are re-exported so that users of this crate do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

mod conversion;
mod encodings;
mod hashing;
mod helpers;
mod high_low;
mod ml_dsa;
mod ntt;
mod types;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

pub use crate::types::Error;

// Applies across all security parameter sets; page 15 table 1
const Q: u32 = 8_380_417; // 2^23 - 2^13 + 1
const ZETA: u32 = 1753; // primitive 512-th root of unity mod q
const D: u32 = 13; // dropped bits from t


// This common functionality is injected into each security parameter set
// namespace as a lightweight wrapper around the ml_dsa functions.
macro_rules! functionality {
    () => {
        use crate::encodings;
        use crate::helpers;
        use crate::ml_dsa;
        use crate::traits::{KeyGen, SerDes, Signer, Verifier};
        use crate::types::Error;
        use rand_core::CryptoRngCore;

        const BETA: u32 = TAU * ETA;
        const LAMBDA_DIV4: usize = LAMBDA / 4;
        const W1_LEN: usize = 32 * K * helpers::bit_length((crate::Q - 1) / (2 * GAMMA2) - 1);


        // ----- 'EXTERNAL' DATA TYPES -----

        /// Empty struct to enable `KeyGen` trait objects across security
        /// parameter sets. Implements the [`crate::traits::KeyGen`] trait.
        pub struct KG();

        /// Private key specific to this security parameter set. Holds the
        /// expanded matrix so that repeated signing skips `ExpandA`.
        ///
        /// Implements the [`crate::traits::Signer`] and
        /// [`crate::traits::SerDes`] traits; zeroized on drop.
        pub type PrivateKey = crate::types::PrivateKey<K, L>;

        /// Public key specific to this security parameter set. Holds the
        /// expanded matrix so that repeated verification skips `ExpandA`.
        ///
        /// Implements the [`crate::traits::Verifier`] and
        /// [`crate::traits::SerDes`] traits.
        pub type PublicKey = crate::types::PublicKey<K, L>;

        // Note: (public) Signature is just a vanilla fixed-size byte array


        // ----- PRIMARY FUNCTIONS -----

        /// # Algorithm 1: `ML-DSA.KeyGen()` on page 17.
        /// Generates a public/private key pair using the default OS random
        /// number generator.
        ///
        /// # Errors
        /// Returns [`Error::Entropy`] when the random number generator fails.
        ///
        /// # Examples
        /// ```rust
        /// # use std::error::Error;
        /// # fn main() -> Result<(), Box<dyn Error>> {
        /// # #[cfg(all(feature = "ml-dsa-44", feature = "default-rng"))] {
        /// use mldsa::ml_dsa_44; // Could also be ml_dsa_65 or ml_dsa_87.
        /// use mldsa::traits::{Signer, Verifier};
        ///
        /// let message = [0u8, 1, 2, 3, 4, 5, 6, 7];
        ///
        /// let (pk, sk) = ml_dsa_44::try_keygen()?;
        /// let sig = sk.try_sign(&message, &[])?;
        /// assert!(pk.verify(&message, &sig, &[]));
        /// # }
        /// # Ok(())}
        /// ```
        #[cfg(feature = "default-rng")]
        pub fn try_keygen() -> Result<(PublicKey, PrivateKey), Error> {
            KG::try_keygen()
        }

        /// # Algorithm 1: `ML-DSA.KeyGen()` on page 17.
        /// Generates a public/private key pair using the provided random
        /// number generator.
        ///
        /// # Errors
        /// Returns [`Error::Entropy`] when the random number generator fails.
        pub fn try_keygen_with_rng(
            rng: &mut impl CryptoRngCore,
        ) -> Result<(PublicKey, PrivateKey), Error> {
            KG::try_keygen_with_rng(rng)
        }

        /// # Algorithm 6: `ML-DSA.KeyGen_internal(ξ)` on page 23.
        /// Deterministically derives a key pair from a 32-byte seed; the
        /// same seed always yields the same key pair. The seed remains
        /// retrievable through [`PrivateKey::seed`].
        #[must_use]
        pub fn keygen_from_seed(xi: &[u8; 32]) -> (PublicKey, PrivateKey) {
            KG::keygen_from_seed(xi)
        }

        impl KeyGen for KG {
            type PrivateKey = PrivateKey;
            type PublicKey = PublicKey;

            fn try_keygen_with_rng(
                rng: &mut impl CryptoRngCore,
            ) -> Result<(PublicKey, PrivateKey), Error> {
                ml_dsa::key_gen::<K, L, PK_LEN>(rng, ETA)
            }

            fn keygen_from_seed(xi: &[u8; 32]) -> (PublicKey, PrivateKey) {
                ml_dsa::key_gen_from_seed::<K, L, PK_LEN>(ETA, xi)
            }
        }


        impl Signer for PrivateKey {
            type PublicKey = PublicKey;
            type Signature = [u8; SIG_LEN];

            /// # Algorithm 2: `ML-DSA.Sign(sk, M, ctx)` on page 18.
            fn try_sign_with_rng(
                &self, rng: &mut impl CryptoRngCore, message: &[u8], ctx: &[u8],
            ) -> Result<Self::Signature, Error> {
                // 1-3: return an error if the context string is too long
                helpers::ensure!(ctx.len() < 256, Error::InvalidContext);

                // 5-8: rnd ← B^{32}, error out if random bit generation failed
                let mut rnd = [0u8; 32];
                rng.try_fill_bytes(&mut rnd).map_err(|_| Error::Entropy)?;

                self.try_sign_with_rnd(message, ctx, &rnd)
            }

            /// # Algorithm 2 with caller-supplied randomness; `rnd` of all
            /// zeros is the deterministic variant.
            #[allow(clippy::cast_possible_truncation)] // ctx.len() as u8
            fn try_sign_with_rnd(
                &self, message: &[u8], ctx: &[u8], rnd: &[u8; 32],
            ) -> Result<Self::Signature, Error> {
                helpers::ensure!(ctx.len() < 256, Error::InvalidContext);

                // 10: M′ ← IntegerToBytes(0, 1) || IntegerToBytes(|ctx|, 1) || ctx || M
                let dom_sep = [0u8, ctx.len() as u8];
                let m_prime: [&[u8]; 3] = [&dom_sep, ctx, message];

                // 11-12: σ ← ML-DSA.Sign_internal(sk, M′, rnd); return σ
                Ok(ml_dsa::sign_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                    BETA, GAMMA1, GAMMA2, OMEGA, TAU, self, rnd, &m_prime,
                ))
            }

            fn get_public_key(&self) -> Self::PublicKey {
                ml_dsa::private_to_public_key(self)
            }
        }


        impl Verifier for PublicKey {
            type Signature = [u8; SIG_LEN];

            /// # Algorithm 3: `ML-DSA.Verify(pk, M, σ, ctx)` on page 18.
            #[allow(clippy::cast_possible_truncation)] // ctx.len() as u8
            fn verify(&self, message: &[u8], sig: &Self::Signature, ctx: &[u8]) -> bool {
                // 1-3: a context string longer than 255 bytes never verifies
                if ctx.len() > 255 {
                    return false;
                }

                // 5: M′ ← IntegerToBytes(0, 1) || IntegerToBytes(|ctx|, 1) || ctx || M
                let dom_sep = [0u8, ctx.len() as u8];
                let m_prime: [&[u8]; 3] = [&dom_sep, ctx, message];

                // 6: return ML-DSA.Verify_internal(pk, M′, σ)
                ml_dsa::verify_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                    BETA, GAMMA1, GAMMA2, OMEGA, TAU, self, sig, &m_prime,
                )
            }
        }


        // ----- SERIALIZATION AND DESERIALIZATION -----

        impl SerDes for PrivateKey {
            type ByteArray = [u8; SK_LEN];

            fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                ml_dsa::expand_private::<K, L, SK_LEN>(ETA, bytes)
            }

            fn into_bytes(self) -> Self::ByteArray {
                encodings::sk_encode::<K, L, SK_LEN>(
                    ETA, &self.rho, &self.cap_k, &self.tr, &self.s1, &self.s2, &self.t0,
                )
            }
        }

        impl SerDes for PublicKey {
            type ByteArray = [u8; PK_LEN];

            fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                ml_dsa::expand_public::<K, L, PK_LEN>(bytes)
            }

            fn into_bytes(self) -> Self::ByteArray {
                encodings::pk_encode::<K, PK_LEN>(&self.rho, &self.t1)
            }
        }


        // ----- INTERNAL ENTRY POINTS FOR CONFORMANCE TESTING -----

        /// # Algorithm 7: `ML-DSA.Sign_internal(sk, M′, rnd)` on page 25.
        /// Signs an already-formatted message representative `M′`. Exposed
        /// for NIST ACVP conformance testing; applications should prefer the
        /// [`crate::traits::Signer`] methods, which perform the domain
        /// separation of Algorithm 2.
        #[must_use]
        pub fn sign_internal(sk: &PrivateKey, rnd: &[u8; 32], m_prime: &[u8]) -> [u8; SIG_LEN] {
            ml_dsa::sign_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                BETA, GAMMA1, GAMMA2, OMEGA, TAU, sk, rnd, &[m_prime],
            )
        }

        /// # Algorithm 8: `ML-DSA.Verify_internal(pk, M′, σ)` on page 27.
        /// Verifies a signature over an already-formatted message
        /// representative `M′`. Exposed for NIST ACVP conformance testing.
        #[must_use]
        pub fn verify_internal(pk: &PublicKey, m_prime: &[u8], sig: &[u8; SIG_LEN]) -> bool {
            ml_dsa::verify_internal::<K, L, LAMBDA_DIV4, SIG_LEN, W1_LEN>(
                BETA, GAMMA1, GAMMA2, OMEGA, TAU, pk, sig, &[m_prime],
            )
        }


    };
}


/// # Functionality for the **ML-DSA-44** security parameter set.
///
/// ML-DSA-44 is claimed to be in security strength category 2. The module
/// exposes key generation ([`ml_dsa_44::try_keygen`],
/// [`ml_dsa_44::keygen_from_seed`]), signing through the
/// [`traits::Signer`] trait on [`ml_dsa_44::PrivateKey`], verification
/// through the [`traits::Verifier`] trait on [`ml_dsa_44::PublicKey`], and
/// serialization of both key structs through [`traits::SerDes`]. See the
/// top-level [crate] documentation for example code.
#[cfg(feature = "ml-dsa-44")]
pub mod ml_dsa_44 {
    const TAU: u32 = 39;
    const LAMBDA: usize = 128;
    const GAMMA1: u32 = 1 << 17;
    const GAMMA2: u32 = (crate::Q - 1) / 88;
    const K: usize = 4;
    const L: usize = 4;
    const ETA: u32 = 2;
    const OMEGA: usize = 80;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 2560;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 1312;
    /// Signature length in bytes.
    pub const SIG_LEN: usize = 2420;

    functionality!();
}


/// # Functionality for the **ML-DSA-65** security parameter set.
///
/// ML-DSA-65 is claimed to be in security strength category 3. The module
/// exposes key generation ([`ml_dsa_65::try_keygen`],
/// [`ml_dsa_65::keygen_from_seed`]), signing through the
/// [`traits::Signer`] trait on [`ml_dsa_65::PrivateKey`], verification
/// through the [`traits::Verifier`] trait on [`ml_dsa_65::PublicKey`], and
/// serialization of both key structs through [`traits::SerDes`]. See the
/// top-level [crate] documentation for example code.
#[cfg(feature = "ml-dsa-65")]
pub mod ml_dsa_65 {
    const TAU: u32 = 49;
    const LAMBDA: usize = 192;
    const GAMMA1: u32 = 1 << 19;
    const GAMMA2: u32 = (crate::Q - 1) / 32;
    const K: usize = 6;
    const L: usize = 5;
    const ETA: u32 = 4;
    const OMEGA: usize = 55;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 4032;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 1952;
    /// Signature length in bytes.
    pub const SIG_LEN: usize = 3309;

    functionality!();
}


/// # Functionality for the **ML-DSA-87** security parameter set.
///
/// ML-DSA-87 is claimed to be in security strength category 5. The module
/// exposes key generation ([`ml_dsa_87::try_keygen`],
/// [`ml_dsa_87::keygen_from_seed`]), signing through the
/// [`traits::Signer`] trait on [`ml_dsa_87::PrivateKey`], verification
/// through the [`traits::Verifier`] trait on [`ml_dsa_87::PublicKey`], and
/// serialization of both key structs through [`traits::SerDes`]. See the
/// top-level [crate] documentation for example code.
#[cfg(feature = "ml-dsa-87")]
pub mod ml_dsa_87 {
    const TAU: u32 = 60;
    const LAMBDA: usize = 256;
    const GAMMA1: u32 = 1 << 19;
    const GAMMA2: u32 = (crate::Q - 1) / 32;
    const K: usize = 8;
    const L: usize = 7;
    const ETA: u32 = 2;
    const OMEGA: usize = 75;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 4896;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 2592;
    /// Signature length in bytes.
    pub const SIG_LEN: usize = 4627;

    functionality!();
}

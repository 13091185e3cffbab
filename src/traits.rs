//! All functionality is covered by traits, so consumers can work with trait
//! objects or generics across the three security parameter sets.

use crate::types::Error;
use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is implemented by the `KG` shell struct of each
/// security parameter set.
pub trait KeyGen {
    /// A public key specific to the chosen parameter set.
    type PublicKey;
    /// A private (secret) key specific to the chosen parameter set.
    type PrivateKey;

    /// Generates a key pair using the default OS random number generator.
    ///
    /// # Errors
    /// Returns `Error::Entropy` when the random number generator fails.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "ml-dsa-44", feature = "default-rng"))] {
    /// use mldsa::ml_dsa_44; // Could also be ml_dsa_65 or ml_dsa_87.
    /// use mldsa::traits::{KeyGen, Signer, Verifier};
    ///
    /// let message = [0u8, 1, 2, 3, 4, 5, 6, 7];
    ///
    /// let (pk, sk) = ml_dsa_44::KG::try_keygen()?;
    /// let sig = sk.try_sign(&message, &[])?;
    /// assert!(pk.verify(&message, &sig, &[]));
    /// # }
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates a key pair using the provided random number generator.
    ///
    /// # Errors
    /// Returns `Error::Entropy` when the random number generator fails.
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error>;

    /// Deterministically derives a key pair from a 32-byte seed. The same
    /// seed always produces the same key pair.
    fn keygen_from_seed(xi: &[u8; 32]) -> (Self::PublicKey, Self::PrivateKey);
}


/// The `Signer` trait is implemented by the `PrivateKey` struct of each
/// security parameter set.
pub trait Signer {
    /// The signature byte array specific to the chosen parameter set.
    type Signature;
    /// The public key that corresponds to this private key type.
    type PublicKey;

    /// Signs a message bound to a context string (255 bytes or fewer),
    /// drawing the 32 bytes of signer randomness from the default OS random
    /// number generator (the "hedged" variant of FIPS 204).
    ///
    /// # Errors
    /// Returns `Error::InvalidContext` when the context string is too long,
    /// `Error::Entropy` when the random number generator fails.
    #[cfg(feature = "default-rng")]
    fn try_sign(&self, message: &[u8], ctx: &[u8]) -> Result<Self::Signature, Error> {
        self.try_sign_with_rng(&mut OsRng, message, ctx)
    }

    /// Signs a message bound to a context string, drawing the signer
    /// randomness from the provided random number generator.
    ///
    /// # Errors
    /// Returns `Error::InvalidContext` when the context string is too long,
    /// `Error::Entropy` when the random number generator fails.
    fn try_sign_with_rng(
        &self, rng: &mut impl CryptoRngCore, message: &[u8], ctx: &[u8],
    ) -> Result<Self::Signature, Error>;

    /// Signs a message bound to a context string with caller-supplied
    /// signer randomness `rnd`; passing 32 zero bytes yields the
    /// deterministic variant of FIPS 204.
    ///
    /// # Errors
    /// Returns `Error::InvalidContext` when the context string is too long.
    fn try_sign_with_rnd(
        &self, message: &[u8], ctx: &[u8], rnd: &[u8; 32],
    ) -> Result<Self::Signature, Error>;

    /// Recomputes the public key that corresponds to this private key.
    fn get_public_key(&self) -> Self::PublicKey;
}


/// The `Verifier` trait is implemented by the `PublicKey` struct of each
/// security parameter set.
pub trait Verifier {
    /// The signature byte array specific to the chosen parameter set.
    type Signature;

    /// Verifies a signature over a message bound to a context string.
    /// Never panics and never errors: any malformed signature, oversized
    /// context or failed check simply returns `false`.
    fn verify(&self, message: &[u8], signature: &Self::Signature, ctx: &[u8]) -> bool;
}


/// The `SerDes` trait provides validated serialization and deserialization
/// of fixed-size byte encodings. FIPS 204 requires no public-key validity
/// checks beyond lengths and ranges; deserialization nonetheless returns a
/// `Result` so future checks remain possible.
pub trait SerDes {
    /// The fixed-size byte array produced by serialization.
    type ByteArray;

    /// Serializes the key into its FIPS 204 byte encoding.
    fn into_bytes(self) -> Self::ByteArray;

    /// Deserializes a key from its FIPS 204 byte encoding, validating
    /// length and coefficient ranges.
    ///
    /// # Errors
    /// Returns `Error::InvalidLength` on a wrong-size slice and
    /// `Error::InvalidEncoding` on out-of-range content.
    ///
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # #[cfg(all(feature = "ml-dsa-87", feature = "default-rng"))] {
    /// use mldsa::ml_dsa_87; // Could also be ml_dsa_44 or ml_dsa_65.
    /// use mldsa::traits::{KeyGen, SerDes};
    ///
    /// let (pk, sk) = ml_dsa_87::try_keygen()?;
    /// let pk_bytes = pk.into_bytes();
    /// let sk_bytes = sk.into_bytes();
    /// let pk2 = ml_dsa_87::PublicKey::try_from_bytes(&pk_bytes)?;
    /// let sk2 = ml_dsa_87::PrivateKey::try_from_bytes(&sk_bytes)?;
    /// # }
    /// # Ok(())}
    /// ```
    fn try_from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized;
}

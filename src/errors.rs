//! Error types.

/// Alias for [`core::result::Result`] with the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types.
///
/// Decode-path failures (padding rejected, wrong length, hash mismatch) are
/// never represented here: they surface as `Option::None` or `bool` at the
/// call site so a caller can't distinguish *why* a decode failed. Only
/// encode-side programmer errors and key-construction errors are abrupt.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[non_exhaustive]
pub enum Error {
    /// Message integer is not in `[1, n)`, or plaintext is too long for the
    /// chosen padding and key size.
    MessageTooLong,

    /// Number of primes must be 2 or greater.
    NprimesTooSmall,

    /// Invalid prime value (e.g. `p == q`, or a supplied prime isn't prime).
    InvalidPrime,

    /// Invalid modulus.
    InvalidModulus,

    /// Invalid exponent (`e` even, too small, too large, or not coprime to
    /// `(p-1)(q-1)`).
    InvalidExponent,

    /// Modulus too large.
    ModulusTooLarge,

    /// Public exponent too small.
    PublicExponentTooSmall,

    /// Public exponent too large.
    PublicExponentTooLarge,

    /// Requested key size is too small to hold the public exponent plus
    /// padding overhead.
    KeySizeTooSmall,

    /// Label too long for the hash function's input limit.
    LabelTooLong,

    /// Salt length incompatible with the key size and hash (PSS encode).
    InvalidSaltLength,

    /// Blinding factor sampling failed (negligible probability event).
    BlindingFailed,

    /// `hashed` isn't the length expected for the configured hash function.
    InputNotHashed,

    /// Signature verification failed. Deliberately undifferentiated: it
    /// covers a bad signature, a hash mismatch and a malformed encoding
    /// alike, so a verifier can't be used as an oracle for *why* a forgery
    /// attempt failed.
    Verification,
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Error::MessageTooLong => "message too long for this key and padding",
            Error::NprimesTooSmall => "at least two primes are required",
            Error::InvalidPrime => "invalid prime value",
            Error::InvalidModulus => "invalid modulus",
            Error::InvalidExponent => "invalid exponent",
            Error::ModulusTooLarge => "modulus too large",
            Error::PublicExponentTooSmall => "public exponent too small",
            Error::PublicExponentTooLarge => "public exponent too large",
            Error::KeySizeTooSmall => "requested key size too small",
            Error::LabelTooLong => "label too long",
            Error::InvalidSaltLength => "invalid salt length",
            Error::BlindingFailed => "failed to sample a blinding factor",
            Error::InputNotHashed => "input is not hashed to the expected length",
            Error::Verification => "verification failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_never_panics() {
        let variants = [
            Error::MessageTooLong,
            Error::NprimesTooSmall,
            Error::InvalidPrime,
            Error::InvalidModulus,
            Error::InvalidExponent,
            Error::ModulusTooLarge,
            Error::PublicExponentTooSmall,
            Error::PublicExponentTooLarge,
            Error::KeySizeTooSmall,
            Error::LabelTooLong,
            Error::InvalidSaltLength,
            Error::BlindingFailed,
            Error::InputNotHashed,
            Error::Verification,
        ];
        for e in variants {
            assert!(!e.to_string().is_empty());
        }
    }
}

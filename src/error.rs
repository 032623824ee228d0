// Error Types
// Failures of key generation, block encryption and key envelopes, returned as values

/// Errors produced by the RSA core and the key serialization boundary.
#[derive(Debug, thiserror::Error)]
pub enum RsaError {
    /// Caller input violates a contract (zero bit length, inconsistent key fields, ...).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Key generation did not produce a valid key within the attempt bound.
    #[error("Key generation failed after {attempts} attempts")]
    RetriesExhausted { attempts: usize },

    /// Plaintext does not fit in one block for this modulus.
    #[error("Message too long: max {max} bytes, got {actual}")]
    MessageTooLong { max: usize, actual: usize },

    /// Ciphertext length does not equal the modulus byte length.
    #[error("Invalid ciphertext length: expected {expected} bytes, got {actual}")]
    InvalidCipherLength { expected: usize, actual: usize },

    /// The decrypted block failed structural validation.
    #[error("Malformed block: {0}")]
    MalformedBlock(&'static str),

    /// Envelope label mismatch or malformed encoded structure.
    #[error("Format error: {0}")]
    Format(String),

    /// The secure random source failed.
    #[error("Random source error: {0}")]
    Random(String),
}

impl From<rand::Error> for RsaError {
    fn from(e: rand::Error) -> Self {
        RsaError::Random(e.to_string())
    }
}

impl From<pkcs1::der::Error> for RsaError {
    fn from(e: pkcs1::der::Error) -> Self {
        RsaError::Format(e.to_string())
    }
}

impl From<pem_rfc7468::Error> for RsaError {
    fn from(e: pem_rfc7468::Error) -> Self {
        RsaError::Format(e.to_string())
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, RsaError>;

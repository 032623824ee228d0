// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod decrypt;
pub mod encrypt;
pub mod keygen;
pub mod keys;
pub mod padding;

pub use decrypt::decrypt;
pub use encrypt::{encrypt, encrypt_with_rng};
pub use keygen::{generate_key, generate_key_with_rng, MAX_KEYGEN_ATTEMPTS};
pub use keys::{PrivateKeyParts, PublicKeyParts, RsaPrivateKey, RsaPublicKey, PUBLIC_EXPONENT};
pub use padding::{EncryptionBlock, PADDING_OVERHEAD};

// rsakit - RSA key generation and RFC 2313 block encryption
// rsa is the core, pem maps keys to PKCS#1 envelopes, cli is the command surface

pub mod cli;
pub mod error;
pub mod logging;
pub mod pem;
pub mod rsa;
pub mod util;

pub use error::{Result, RsaError};
pub use pem::KeyEnvelope;
pub use rsa::{
    decrypt, encrypt, generate_key, PrivateKeyParts, PublicKeyParts, RsaPrivateKey, RsaPublicKey,
};

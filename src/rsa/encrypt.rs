// RSA Encryption Implementation
// RFC 2313 block type 02 padding followed by c = m^e mod n

use rand::{CryptoRng, RngCore};

use super::bigint::{from_bytes, mod_pow, to_fixed_bytes};
use super::keys::{PublicKeyParts, RsaPublicKey};
use super::padding::EncryptionBlock;
use crate::error::Result;

/// Encrypt `message` with `public_key`.
/// Returns the ciphertext, left-padded to exactly the modulus byte length.
pub fn encrypt(public_key: &RsaPublicKey, message: &[u8]) -> Result<Vec<u8>> {
    encrypt_with_rng(&mut rand::thread_rng(), public_key, message)
}

/// Same as [`encrypt`] with an explicit random source for the padding.
pub fn encrypt_with_rng<R>(
    rng: &mut R,
    public_key: &RsaPublicKey,
    message: &[u8],
) -> Result<Vec<u8>>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let k = public_key.size();
    let block = EncryptionBlock::build(message, k, rng)?;

    let m = from_bytes(block.as_bytes());
    let c = mod_pow(&m, public_key.e(), public_key.n());

    to_fixed_bytes(&c, k)
}

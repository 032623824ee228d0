// RSA Decryption Implementation
// m = c^d mod n via the Chinese Remainder Theorem, then block validation

use super::bigint::{from_bytes, mod_pow, to_fixed_bytes, RsaBigInt};
use super::keys::{PrivateKeyParts, PublicKeyParts, RsaPrivateKey};
use super::padding::EncryptionBlock;
use crate::error::{Result, RsaError};

/// Decrypt `ciphertext` with `private_key`.
///
/// The ciphertext must be exactly the modulus byte length. The recovered
/// block is validated before the message is returned.
pub fn decrypt(private_key: &RsaPrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let k = private_key.size();
    if ciphertext.len() != k {
        return Err(RsaError::InvalidCipherLength {
            expected: k,
            actual: ciphertext.len(),
        });
    }

    let c = from_bytes(ciphertext);
    let m = decrypt_crt(&c, private_key);

    // Leading zero bytes of the block are lost in the integer form
    let block = EncryptionBlock::from_bytes(to_fixed_bytes(&m, k)?);
    Ok(block.data()?.to_vec())
}

/// Compute c^d mod n using the Chinese Remainder Theorem
/// This is faster than regular decryption because we work with smaller numbers
fn decrypt_crt(c: &RsaBigInt, key: &RsaPrivateKey) -> RsaBigInt {
    let p = &key.primes()[0];
    let q = &key.primes()[1];
    let crt = key.crt_values();

    // m1 = c^dp mod p
    let m1 = mod_pow(c, &crt.dp, p);

    // m2 = c^dq mod q
    let m2 = mod_pow(c, &crt.dq, q);

    // h = (m1 - m2) * qinv mod p
    // m2 < q may exceed p, so lift it into [0, p) before subtracting
    let m2_mod_p = &m2 % p;
    let diff = if m1 >= m2_mod_p {
        m1 - m2_mod_p
    } else {
        m1 + p - m2_mod_p
    };
    let h = (diff * &crt.qinv) % p;

    // m = m2 + q * h, always < n
    m2 + q * h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::encrypt::encrypt_with_rng;
    use crate::rsa::keygen::generate_key_with_rng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_crt_matches_plain_modpow() {
        let mut rng = StdRng::seed_from_u64(20);
        let key = generate_key_with_rng(&mut rng, 256, None, None).unwrap();

        for value in [0u64, 1, 2, 65537, u64::MAX] {
            let c = RsaBigInt::from(value);
            assert_eq!(decrypt_crt(&c, &key), mod_pow(&c, key.d(), key.n()));
        }
    }

    #[test]
    fn test_decrypt_roundtrip() {
        let mut rng = StdRng::seed_from_u64(21);
        let key = generate_key_with_rng(&mut rng, 512, None, None).unwrap();

        let messages: [&[u8]; 6] = [b"", b"A", b"hi", b"Hello, World!", &[0u8; 53], &[0xFF; 53]];
        for message in messages {
            let ciphertext = encrypt_with_rng(&mut rng, key.public_key(), message).unwrap();
            assert_eq!(decrypt(&key, &ciphertext).unwrap(), message);
        }
    }

    #[test]
    fn test_key_methods_roundtrip() {
        let mut rng = StdRng::seed_from_u64(22);
        let key = generate_key_with_rng(&mut rng, 512, None, None).unwrap();
        let message = "Test message for RSA decryption";

        let ciphertext = key.public_key().encrypt(message.as_bytes()).unwrap();
        assert_eq!(key.decrypt(&ciphertext).unwrap(), message.as_bytes());
    }

    #[test]
    fn test_decrypt_invalid_size() {
        let mut rng = StdRng::seed_from_u64(23);
        let key = generate_key_with_rng(&mut rng, 512, None, None).unwrap();
        let k = key.size();

        for len in [k - 1, k + 1, 0] {
            assert!(matches!(
                decrypt(&key, &vec![1u8; len]),
                Err(RsaError::InvalidCipherLength { expected: 64, .. })
            ));
        }
    }

    #[test]
    fn test_decrypt_raw_block_without_terminator() {
        let mut rng = StdRng::seed_from_u64(24);
        let key = generate_key_with_rng(&mut rng, 512, None, None).unwrap();
        let k = key.size();

        // 00 02 followed by non-zero bytes only, encrypted without padding
        let mut block = vec![0x01u8; k];
        block[0] = 0x00;
        block[1] = 0x02;
        let c = mod_pow(&from_bytes(&block), key.e(), key.n());
        let ciphertext = to_fixed_bytes(&c, k).unwrap();

        assert!(matches!(
            decrypt(&key, &ciphertext),
            Err(RsaError::MalformedBlock("missing terminator"))
        ));
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let mut rng = StdRng::seed_from_u64(25);
        let key1 = generate_key_with_rng(&mut rng, 512, None, None).unwrap();
        let key2 = generate_key_with_rng(&mut rng, 512, None, None).unwrap();

        let ciphertext = encrypt_with_rng(&mut rng, key1.public_key(), b"Test").unwrap();
        let result = decrypt(&key2, &ciphertext);
        assert!(matches!(result, Err(RsaError::MalformedBlock(_))));
    }
}

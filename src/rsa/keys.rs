// RSA Key Types
// Public and private key containers plus component accessors

use num_traits::{One, Zero};
use num_integer::Integer;

use super::bigint::{byte_len, is_probable_prime, lcm, mod_inverse, RsaBigInt, PRIMALITY_ROUNDS};
use crate::error::{Result, RsaError};

/// Public exponent used for every generated key.
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &RsaBigInt;

    /// Returns the public exponent of the key.
    fn e(&self) -> &RsaBigInt;

    /// Returns the modulus size in bytes. Ciphertexts produced with this
    /// key have exactly this length.
    fn size(&self) -> usize {
        byte_len(self.n())
    }

    /// Returns the modulus size in bits.
    fn bit_length(&self) -> usize {
        self.n().bits() as usize
    }
}

/// Components of an RSA private key.
pub trait PrivateKeyParts: PublicKeyParts {
    /// Returns the private exponent of the key.
    fn d(&self) -> &RsaBigInt;

    /// Returns the prime factors `[p, q]`.
    fn primes(&self) -> &[RsaBigInt];
}

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: RsaBigInt, // Modulus
    e: RsaBigInt, // Public exponent
}

/// Values precomputed from the private key for CRT decryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrtValues {
    pub dp: RsaBigInt,   // d mod (p-1)
    pub dq: RsaBigInt,   // d mod (q-1)
    pub qinv: RsaBigInt, // q^(-1) mod p
}

/// RSA Private Key
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    public: RsaPublicKey,
    d: RsaBigInt,
    primes: [RsaBigInt; 2],
    crt: CrtValues,
}

impl RsaPublicKey {
    /// Build a public key from its modulus and exponent.
    pub fn new(n: RsaBigInt, e: RsaBigInt) -> Result<Self> {
        if n <= RsaBigInt::one() || n.is_even() {
            return Err(RsaError::InvalidParameter(
                "modulus must be odd and greater than 1".to_string(),
            ));
        }
        if e <= RsaBigInt::one() {
            return Err(RsaError::InvalidParameter(
                "public exponent must be greater than 1".to_string(),
            ));
        }
        Ok(Self { n, e })
    }

    /// Encrypt a message using this public key
    /// Returns the ciphertext, exactly `size()` bytes long
    pub fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>> {
        super::encrypt::encrypt(self, message)
    }
}

impl PublicKeyParts for RsaPublicKey {
    fn n(&self) -> &RsaBigInt {
        &self.n
    }

    fn e(&self) -> &RsaBigInt {
        &self.e
    }
}

impl RsaPrivateKey {
    /// Assemble a private key from already-validated parts, computing the
    /// CRT values. Used by the key generator, which establishes the invariants
    /// itself.
    pub(crate) fn from_parts(
        public: RsaPublicKey,
        d: RsaBigInt,
        p: RsaBigInt,
        q: RsaBigInt,
    ) -> Result<Self> {
        let crt = CrtValues {
            dp: &d % (&p - 1u8),
            dq: &d % (&q - 1u8),
            qinv: mod_inverse(&q, &p).ok_or_else(|| {
                RsaError::InvalidParameter("q has no inverse modulo p".to_string())
            })?,
        };

        Ok(Self {
            public,
            d,
            primes: [p, q],
            crt,
        })
    }

    /// Build a private key from the five canonical fields, checking that they
    /// describe a consistent key.
    ///
    /// `d` may be reduced modulo either the Euler totient or the Carmichael
    /// function; both satisfy `e*d ≡ 1 (mod lcm(p-1, q-1))`.
    pub fn from_components(
        n: RsaBigInt,
        e: RsaBigInt,
        d: RsaBigInt,
        p: RsaBigInt,
        q: RsaBigInt,
    ) -> Result<Self> {
        let public = RsaPublicKey::new(n, e)?;

        if p <= RsaBigInt::one() || q <= RsaBigInt::one() {
            return Err(RsaError::InvalidParameter(
                "prime factors must be greater than 1".to_string(),
            ));
        }
        if p == q {
            return Err(RsaError::InvalidParameter(
                "prime factors must be distinct".to_string(),
            ));
        }
        let mut rng = rand::thread_rng();
        if !is_probable_prime(&p, PRIMALITY_ROUNDS, &mut rng)
            || !is_probable_prime(&q, PRIMALITY_ROUNDS, &mut rng)
        {
            return Err(RsaError::InvalidParameter("factors must be prime".to_string()));
        }
        if &p * &q != public.n {
            return Err(RsaError::InvalidParameter(
                "modulus is not the product of the prime factors".to_string(),
            ));
        }
        if d.is_zero() {
            return Err(RsaError::InvalidParameter(
                "private exponent must be non-zero".to_string(),
            ));
        }

        let lambda = lcm(&(&p - 1u8), &(&q - 1u8));
        if !((&public.e * &d) % &lambda).is_one() {
            return Err(RsaError::InvalidParameter(
                "private exponent does not invert the public exponent".to_string(),
            ));
        }

        Self::from_parts(public, d, p, q)
    }

    /// The public half of this key
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Precomputed CRT values
    pub fn crt_values(&self) -> &CrtValues {
        &self.crt
    }

    /// Decrypt a ciphertext using this private key
    /// Returns plaintext as bytes
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        super::decrypt::decrypt(self, ciphertext)
    }
}

impl PublicKeyParts for RsaPrivateKey {
    fn n(&self) -> &RsaBigInt {
        &self.public.n
    }

    fn e(&self) -> &RsaBigInt {
        &self.public.e
    }
}

impl PrivateKeyParts for RsaPrivateKey {
    fn d(&self) -> &RsaBigInt {
        &self.d
    }

    fn primes(&self) -> &[RsaBigInt] {
        &self.primes
    }
}

// Only public values are printed.
impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

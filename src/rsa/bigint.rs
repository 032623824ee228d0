// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::{Result, RsaError};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Miller-Rabin rounds used for every primality decision.
pub const PRIMALITY_ROUNDS: usize = 10;

/// Primes used for trial division before Miller-Rabin.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to exactly `len` big-endian bytes, left-padded with zeros.
///
/// Leading zero bytes are dropped by the integer representation, so anything
/// that has a fixed on-wire width has to go through here.
pub fn to_fixed_bytes(n: &RsaBigInt, len: usize) -> Result<Vec<u8>> {
    let bytes = if n.is_zero() { Vec::new() } else { n.to_bytes_be() };
    if bytes.len() > len {
        return Err(RsaError::InvalidParameter(format!(
            "integer needs {} bytes, buffer has {}",
            bytes.len(),
            len
        )));
    }

    let mut out = vec![0u8; len];
    out[len - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// Number of bytes needed to hold `n`, i.e. ceil(bits / 8)
pub fn byte_len(n: &RsaBigInt) -> usize {
    ((n.bits() + 7) / 8) as usize
}

/// Modular exponentiation: base^exp mod modulus
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_zero() || modulus.is_one() {
        return RsaBigInt::zero();
    }
    base.modpow(exp, modulus)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let a = BigInt::from_biguint(Sign::Plus, a.clone());
    let m = BigInt::from_biguint(Sign::Plus, m.clone());

    let egcd = a.extended_gcd(&m);
    if !egcd.gcd.is_one() {
        // Inverse doesn't exist
        return None;
    }

    // x may be negative; mod_floor brings it into [0, m)
    egcd.x.mod_floor(&m).to_biguint()
}

/// Miller-Rabin primality test, preceded by trial division by small primes.
/// Returns true if n is probably prime.
pub fn is_probable_prime<R>(n: &RsaBigInt, rounds: usize, rng: &mut R) -> bool
where
    R: RngCore + CryptoRng + ?Sized,
{
    if n < &RsaBigInt::from(2u8) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = RsaBigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let two = RsaBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Generate a random prime of exactly `bit_length` bits.
///
/// The two top bits are forced on so that the product of two such primes has
/// exactly twice the bit length, and the low bit so candidates are odd.
pub fn random_prime<R>(bit_length: usize, rng: &mut R) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bit_length < 2 {
        return Err(RsaError::InvalidParameter(format!(
            "prime size must be at least 2 bits, got {}",
            bit_length
        )));
    }

    let top_bits = (RsaBigInt::one() << (bit_length - 1)) | (RsaBigInt::one() << (bit_length - 2));
    let mut candidates = 0usize;

    loop {
        candidates += 1;
        let mut prime = rng.gen_biguint(bit_length as u64);
        prime |= &top_bits;
        prime |= RsaBigInt::one();

        if is_probable_prime(&prime, PRIMALITY_ROUNDS, rng) {
            tracing::trace!(bit_length, candidates, "found random prime");
            return Ok(prime);
        }
    }
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

/// Least common multiple
pub fn lcm(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    if a.is_zero() || b.is_zero() {
        return RsaBigInt::zero();
    }
    (a * b) / gcd(a, b)
}

// RSA Key Generation
// Bounded search for a validated key pair, optionally from caller-supplied primes

use num_integer::Integer;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use super::bigint::{
    from_u64, is_probable_prime, mod_inverse, random_prime, RsaBigInt, PRIMALITY_ROUNDS,
};
use super::keys::{RsaPrivateKey, RsaPublicKey, PUBLIC_EXPONENT};
use crate::error::{Result, RsaError};

/// Upper bound on key-generation attempts before giving up.
pub const MAX_KEYGEN_ATTEMPTS: usize = 10;

/// Smallest modulus that two distinct odd primes can produce (3 * 5 = 15).
const MIN_BIT_LENGTH: usize = 4;

/// Generate an RSA private key whose modulus has exactly `bit_length` bits,
/// drawing randomness from the thread-local CSPRNG.
///
/// `seed_p` / `seed_q` are used as the prime factors when they are odd
/// primes; zero, absent or composite seeds are replaced with fresh random
/// primes.
pub fn generate_key(
    bit_length: usize,
    seed_p: Option<&RsaBigInt>,
    seed_q: Option<&RsaBigInt>,
) -> Result<RsaPrivateKey> {
    generate_key_with_rng(&mut rand::thread_rng(), bit_length, seed_p, seed_q)
}

/// Same as [`generate_key`] with an explicit random source.
///
/// Makes at most [`MAX_KEYGEN_ATTEMPTS`] attempts. An attempt is discarded
/// when `p == q`, when `p*q` does not have exactly `bit_length` bits, or when
/// the public exponent has no inverse modulo the totient. Valid seeds are
/// reused on every attempt and only the randomly drawn factors are redrawn,
/// with two exceptions: a bit-length mismatch drops both seeds, and a failure
/// between two seeded factors drops the `q` seed.
pub fn generate_key_with_rng<R>(
    rng: &mut R,
    bit_length: usize,
    seed_p: Option<&RsaBigInt>,
    seed_q: Option<&RsaBigInt>,
) -> Result<RsaPrivateKey>
where
    R: RngCore + CryptoRng + ?Sized,
{
    if bit_length == 0 {
        return Err(RsaError::InvalidParameter(
            "bit length must be greater than 0".to_string(),
        ));
    }
    if bit_length < MIN_BIT_LENGTH {
        return Err(RsaError::InvalidParameter(format!(
            "bit length must be at least {}, got {}",
            MIN_BIT_LENGTH, bit_length
        )));
    }

    // q takes the extra bit for odd lengths
    let p_bits = bit_length / 2;
    let q_bits = bit_length - p_bits;
    let e = from_u64(PUBLIC_EXPONENT);

    let mut seed_p = checked_seed(seed_p, rng);
    let mut seed_q = checked_seed(seed_q, rng);

    for attempt in 1..=MAX_KEYGEN_ATTEMPTS {
        let p = seed_or_random(&seed_p, p_bits, rng)?;
        let q = seed_or_random(&seed_q, q_bits, rng)?;

        if p == q {
            tracing::debug!(attempt, "discarding attempt: p == q");
            drop_q_if_both_seeded(&seed_p, &mut seed_q);
            continue;
        }

        let n = &p * &q;
        if n.bits() as usize != bit_length {
            tracing::debug!(
                attempt,
                expected = bit_length,
                actual = n.bits(),
                "discarding attempt: modulus bit length mismatch"
            );
            seed_p = None;
            seed_q = None;
            continue;
        }

        let totient = (&p - 1u8) * (&q - 1u8);
        let d = match mod_inverse(&e, &totient) {
            Some(d) => d,
            None => {
                tracing::debug!(attempt, "discarding attempt: e has no inverse mod totient");
                drop_q_if_both_seeded(&seed_p, &mut seed_q);
                continue;
            }
        };

        tracing::debug!(attempt, bit_length, "generated key pair");
        let public = RsaPublicKey::new(n, e)?;
        return RsaPrivateKey::from_parts(public, d, p, q);
    }

    Err(RsaError::RetriesExhausted {
        attempts: MAX_KEYGEN_ATTEMPTS,
    })
}

/// Keep `seed` only when it is an odd probable prime; zero, absent and
/// composite seeds come back as `None`.
fn checked_seed<R>(seed: Option<&RsaBigInt>, rng: &mut R) -> Option<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    match seed {
        Some(s) if s.is_zero() => None,
        Some(s) if s.is_odd() && is_probable_prime(s, PRIMALITY_ROUNDS, rng) => Some(s.clone()),
        Some(_) => {
            tracing::debug!("seed is not an odd prime, replacing with a random prime");
            None
        }
        None => None,
    }
}

fn seed_or_random<R>(seed: &Option<RsaBigInt>, bits: usize, rng: &mut R) -> Result<RsaBigInt>
where
    R: RngCore + CryptoRng + ?Sized,
{
    match seed {
        Some(s) => Ok(s.clone()),
        None => random_prime(bits, rng),
    }
}

// A seed paired with a random factor keeps its place; the random side is redrawn.
fn drop_q_if_both_seeded(seed_p: &Option<RsaBigInt>, seed_q: &mut Option<RsaBigInt>) {
    if seed_p.is_some() && seed_q.is_some() {
        tracing::debug!("seeded factors cannot form a key, replacing q");
        *seed_q = None;
    }
}

// RFC 2313 Encryption Block
// Block type 02: 0x00 || 0x02 || PS || 0x00 || D, PS being random non-zero bytes

use rand::{CryptoRng, RngCore};

use crate::error::{Result, RsaError};

/// Block type marking randomized padding for public-key encryption.
pub const BLOCK_TYPE_ENCRYPTION: u8 = 0x02;

/// Bytes of the block not available to data: two header bytes, at least
/// eight padding bytes and the terminator.
pub const PADDING_OVERHEAD: usize = 11;

/// Draws allowed per padding byte before the random source is considered
/// broken. Each draw is non-zero with probability 255/256.
pub const MAX_NONZERO_DRAWS: usize = 1024;

/// A formatted encryption block of exactly `k` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionBlock {
    bytes: Vec<u8>,
}

impl EncryptionBlock {
    /// Maximum message length for a `k`-byte block.
    pub fn capacity(k: usize) -> usize {
        k.saturating_sub(PADDING_OVERHEAD)
    }

    /// Format `data` into a `k`-byte block with a random padding string.
    pub fn build<R>(data: &[u8], k: usize, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        if data.len() + PADDING_OVERHEAD > k {
            return Err(RsaError::MessageTooLong {
                max: Self::capacity(k),
                actual: data.len(),
            });
        }

        let ps_len = k - data.len() - 3;
        let mut bytes = vec![0u8; k];
        bytes[1] = BLOCK_TYPE_ENCRYPTION;
        fill_nonzero(&mut bytes[2..2 + ps_len], rng)?;
        // bytes[2 + ps_len] stays 0x00 as the terminator
        bytes[3 + ps_len..].copy_from_slice(data);

        tracing::trace!(k, ps_len, "built encryption block");
        Ok(Self { bytes })
    }

    /// Wrap a recovered block. No validation happens until [`EncryptionBlock::data`].
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Validate the block structure and return the data after the terminator.
    pub fn data(&self) -> Result<&[u8]> {
        match self.bytes.first() {
            Some(0x00) => {}
            _ => return Err(RsaError::MalformedBlock("expected leading zero")),
        }
        match self.bytes.get(1) {
            Some(&BLOCK_TYPE_ENCRYPTION) => {}
            _ => return Err(RsaError::MalformedBlock("unexpected block type")),
        }

        let terminator = self.bytes[2..]
            .iter()
            .position(|&b| b == 0x00)
            .map(|pos| pos + 2) // +2 because we started from index 2
            .ok_or(RsaError::MalformedBlock("missing terminator"))?;

        Ok(&self.bytes[terminator + 1..])
    }

    /// Raw block bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Fill `buf` with random non-zero bytes.
///
/// The buffer is filled in one read, then each zero byte is redrawn on its
/// own until it comes back non-zero. Termination is probabilistic; a source
/// that returns zero [`MAX_NONZERO_DRAWS`] times in a row is rejected.
fn fill_nonzero<R>(buf: &mut [u8], rng: &mut R) -> Result<()>
where
    R: RngCore + CryptoRng + ?Sized,
{
    rng.try_fill_bytes(buf)?;

    for byte in buf.iter_mut() {
        let mut draws = 0;
        while *byte == 0 {
            if draws == MAX_NONZERO_DRAWS {
                return Err(RsaError::Random(
                    "random source produced only zero bytes".to_string(),
                ));
            }
            let mut one = [0u8; 1];
            rng.try_fill_bytes(&mut one)?;
            *byte = one[0];
            draws += 1;
        }
    }

    Ok(())
}

// Command Line Front End
// gen, encrypt and decrypt over PEM key files, raw ciphertext files and hex on stdout

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};

use crate::pem::{
    decode_private_key_pem, decode_public_key_pem, encode_private_key_pem, encode_public_key_pem,
};
use crate::rsa::bigint::RsaBigInt;
use crate::rsa::{decrypt, encrypt, generate_key, PublicKeyParts};
use crate::util::{read_file, read_text_file, OutputTarget};

/// RSA key generation and RFC 2313 block encryption.
#[derive(Parser, Debug)]
#[command(name = "rsakit", about = "RSA key generation and block encryption", version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a key pair and write it as two PEM envelopes
    Gen {
        /// Size of the modulus in bits
        #[arg(long)]
        size: usize,

        /// Prime factor p; 0 or a non-prime means a random prime
        #[arg(long, default_value = "0")]
        p: RsaBigInt,

        /// Prime factor q; 0 or a non-prime means a random prime
        #[arg(long, default_value = "0")]
        q: RsaBigInt,

        /// Output file for the private key PEM
        #[arg(long, default_value = "stdout")]
        out_file_priv: String,

        /// Output file for the public key PEM
        #[arg(long, default_value = "stdout")]
        out_file_pub: String,
    },

    /// Encrypt a message with a public key
    #[command(group(ArgGroup::new("input").required(true).args(["message", "in_file"])))]
    Encrypt {
        /// Public key PEM file
        #[arg(long)]
        key: PathBuf,

        /// Message to encrypt
        #[arg(long)]
        message: Option<String>,

        /// File holding the message to encrypt
        #[arg(long)]
        in_file: Option<PathBuf>,

        /// Output file for the raw ciphertext; stdout prints hex
        #[arg(long, default_value = "stdout")]
        out_file: String,
    },

    /// Decrypt a ciphertext with a private key
    #[command(group(ArgGroup::new("input").required(true).args(["hex", "in_file"])))]
    Decrypt {
        /// Private key PEM file
        #[arg(long)]
        key: PathBuf,

        /// Ciphertext as hex
        #[arg(long)]
        hex: Option<String>,

        /// File holding the raw ciphertext
        #[arg(long)]
        in_file: Option<PathBuf>,

        /// Output file for the recovered message
        #[arg(long, default_value = "stdout")]
        out_file: String,
    },
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Gen {
            size,
            p,
            q,
            out_file_priv,
            out_file_pub,
        } => cmd_gen(size, &p, &q, &out_file_priv, &out_file_pub),
        Commands::Encrypt {
            key,
            message,
            in_file,
            out_file,
        } => cmd_encrypt(&key, message, in_file, &out_file),
        Commands::Decrypt {
            key,
            hex,
            in_file,
            out_file,
        } => cmd_decrypt(&key, hex, in_file, &out_file),
    }
}

fn cmd_gen(
    size: usize,
    p: &RsaBigInt,
    q: &RsaBigInt,
    out_file_priv: &str,
    out_file_pub: &str,
) -> Result<()> {
    let key = generate_key(size, Some(p), Some(q)).context("key generation failed")?;
    tracing::info!(bits = key.bit_length(), "generated key pair");

    let private_pem = encode_private_key_pem(&key)?;
    let public_pem = encode_public_key_pem(key.public_key())?;

    OutputTarget::parse(out_file_priv).write(private_pem.as_bytes())?;
    OutputTarget::parse(out_file_pub).write(public_pem.as_bytes())?;
    Ok(())
}

fn cmd_encrypt(
    key_path: &Path,
    message: Option<String>,
    in_file: Option<PathBuf>,
    out_file: &str,
) -> Result<()> {
    let pem = read_text_file(key_path)?;
    let public_key = decode_public_key_pem(&pem)
        .with_context(|| format!("cannot load public key from {}", key_path.display()))?;

    let plaintext = match (message, in_file) {
        (Some(message), _) => message.into_bytes(),
        (None, Some(path)) => read_file(&path)?,
        (None, None) => anyhow::bail!("either --message or --in-file is required"),
    };

    let ciphertext = encrypt(&public_key, &plaintext)?;
    tracing::debug!(len = ciphertext.len(), "encrypted message");

    let target = OutputTarget::parse(out_file);
    if target.is_stdout() {
        target.write(format!("{}\n", hex::encode(&ciphertext)).as_bytes())?;
    } else {
        target.write(&ciphertext)?;
    }
    Ok(())
}

fn cmd_decrypt(
    key_path: &Path,
    hex_input: Option<String>,
    in_file: Option<PathBuf>,
    out_file: &str,
) -> Result<()> {
    let pem = read_text_file(key_path)?;
    let private_key = decode_private_key_pem(&pem)
        .with_context(|| format!("cannot load private key from {}", key_path.display()))?;

    let ciphertext = match (hex_input, in_file) {
        (Some(text), _) => hex::decode(text.trim()).context("ciphertext is not valid hex")?,
        (None, Some(path)) => read_file(&path)?,
        (None, None) => anyhow::bail!("either --hex or --in-file is required"),
    };

    let plaintext = decrypt(&private_key, &ciphertext)?;
    tracing::debug!(len = plaintext.len(), "decrypted message");

    OutputTarget::parse(out_file).write(&plaintext)?;
    Ok(())
}

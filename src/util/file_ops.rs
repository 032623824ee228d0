// File Operations for key envelopes, messages and ciphertexts
// Handles reading inputs and writing outputs, with "stdout" as a sink name

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Output name that means "write to standard output".
pub const STDOUT: &str = "stdout";

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} is not valid UTF-8", .path.display())]
    NotUtf8 { path: PathBuf },
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Where command output goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Parse an output argument; the literal `stdout` selects standard output.
    pub fn parse(arg: &str) -> Self {
        if arg == STDOUT {
            OutputTarget::Stdout
        } else {
            OutputTarget::File(PathBuf::from(arg))
        }
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, OutputTarget::Stdout)
    }

    /// Write `data` to the target, creating or truncating a file.
    pub fn write(&self, data: &[u8]) -> FileResult<()> {
        match self {
            OutputTarget::Stdout => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(data)
                    .and_then(|_| lock.flush())
                    .map_err(|source| FileError::Write {
                        path: PathBuf::from(STDOUT),
                        source,
                    })
            }
            OutputTarget::File(path) => write_file(path, data),
        }
    }
}

/// Read entire file into memory
pub fn read_file(path: &Path) -> FileResult<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut data))
        .map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(data)
}

/// Read a text file, e.g. a PEM envelope
pub fn read_text_file(path: &Path) -> FileResult<String> {
    let data = read_file(path)?;
    String::from_utf8(data).map_err(|_| FileError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

/// Write data to file
pub fn write_file(path: &Path, data: &[u8]) -> FileResult<()> {
    File::create(path)
        .and_then(|mut file| file.write_all(data))
        .map_err(|source| FileError::Write {
            path: path.to_path_buf(),
            source,
        })
}

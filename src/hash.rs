use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use xxhash_rust::xxh3::{Xxh3, xxh3_128};

/// Read buffer size for streaming hashes.
const CHUNK_SIZE: usize = 65536;

/// Hashes a byte slice into a 32-character lowercase hex digest.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:032x}", xxh3_128(data))
}

/// Computes the content digest of a file, streaming it in fixed-size chunks
/// so large files never require full in-memory buffering.
///
/// The file handle is dropped on every exit path, including read errors.
///
/// # Errors
///
/// Propagates the underlying I/O error if the file cannot be opened or read.
/// Callers decide whether that failure is recoverable; this function never
/// swallows it.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:032x}", hasher.digest128()))
}

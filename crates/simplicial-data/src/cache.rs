//! On-disk cache for processed datasets.
//!
//! A cache file is a CBOR-encoded [`CacheHeader`] followed by the CBOR
//! content. The header carries the content length and SHA-256 checksums of
//! both the content and itself, so truncated or foreign files are rejected
//! before anything is deserialized.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;

// ============================================================================
// Header
// ============================================================================

pub const MAGIC: [u8; 4] = *b"SMPC";

/// Major/minor packed as `0x00_MM_mm_00`.
pub const VERSION: u32 = 0x00_01_00_00;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub content_length: u64,
    pub content_checksum: [u8; 32],
    pub header_checksum: [u8; 32],
}

impl CacheHeader {
    pub fn new(content: &[u8]) -> Self {
        let mut header = Self {
            magic: MAGIC,
            version: VERSION,
            content_length: content.len() as u64,
            content_checksum: sha256(content),
            header_checksum: [0u8; 32],
        };
        header.header_checksum = header.compute_header_checksum();
        header
    }

    fn compute_header_checksum(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.magic);
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.content_length.to_le_bytes());
        hasher.update(self.content_checksum);
        hasher.finalize().into()
    }

    pub fn verify(&self) -> Result<(), CacheError> {
        if self.magic != MAGIC {
            return Err(CacheError::InvalidMagic);
        }
        if !is_version_compatible(self.version, VERSION) {
            return Err(CacheError::IncompatibleVersion {
                file_version: self.version,
                reader_version: VERSION,
            });
        }
        if self.header_checksum != self.compute_header_checksum() {
            return Err(CacheError::HeaderChecksumMismatch);
        }
        Ok(())
    }

    pub fn verify_content(&self, content: &[u8]) -> Result<(), CacheError> {
        if content.len() as u64 != self.content_length {
            return Err(CacheError::ContentLengthMismatch {
                expected: self.content_length,
                actual: content.len() as u64,
            });
        }
        if sha256(content) != self.content_checksum {
            return Err(CacheError::ContentChecksumMismatch);
        }
        Ok(())
    }
}

pub(crate) fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

fn is_version_compatible(file_version: u32, reader_version: u32) -> bool {
    let major = |v: u32| (v >> 16) & 0xFF;
    let minor = |v: u32| (v >> 8) & 0xFF;
    major(file_version) == major(reader_version) && minor(reader_version) >= minor(file_version)
}

// ============================================================================
// Encoding
// ============================================================================

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    let mut content = Vec::new();
    ciborium::into_writer(value, &mut content)
        .map_err(|e| CacheError::Serialization(e.to_string()))?;

    let header = CacheHeader::new(&content);
    let mut output = Vec::with_capacity(content.len() + 128);
    ciborium::into_writer(&header, &mut output)
        .map_err(|e| CacheError::Serialization(e.to_string()))?;
    output.extend_from_slice(&content);
    Ok(output)
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CacheError> {
    let mut cursor = Cursor::new(data);
    let header: CacheHeader = ciborium::from_reader(&mut cursor)
        .map_err(|e| CacheError::Deserialization(e.to_string()))?;
    header.verify()?;

    let content = data
        .get(cursor.position() as usize..)
        .ok_or(CacheError::ContentLengthMismatch {
            expected: header.content_length,
            actual: 0,
        })?;
    header.verify_content(content)?;

    ciborium::from_reader(content).map_err(|e| CacheError::Deserialization(e.to_string()))
}

/// Write `value` to `path`, creating parent directories. The file is written
/// next to its destination and renamed into place.
pub fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), CacheError> {
    let bytes = encode(value)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("cbor.tmp");
    std::fs::write(&tmp, &bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// `Ok(None)` when the file does not exist.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CacheError> {
    match std::fs::read(path) {
        Ok(bytes) => decode(&bytes).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid magic bytes")]
    InvalidMagic,

    #[error("incompatible cache version: file {file_version:#x}, reader {reader_version:#x}")]
    IncompatibleVersion {
        file_version: u32,
        reader_version: u32,
    },

    #[error("header checksum mismatch")]
    HeaderChecksumMismatch,

    #[error("content length mismatch: expected {expected}, got {actual}")]
    ContentLengthMismatch { expected: u64, actual: u64 },

    #[error("content checksum mismatch")]
    ContentChecksumMismatch,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

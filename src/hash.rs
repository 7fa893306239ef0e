// src/hash.rs

//! Content hashes for recipe source artifacts
//!
//! Every declared version of a recipe carries a checksum of its source
//! archive. Checksums are written as `<algorithm>:<hex digest>`:
//!
//! | Algorithm | Prefix   | Hex length |
//! |-----------|----------|------------|
//! | SHA-256   | `sha256` | 64         |
//! | SHA-512   | `sha512` | 128        |
//!
//! An unprefixed digest is accepted when its length identifies the
//! algorithm, which keeps checksums copied from upstream metadata usable
//! as-is.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;

/// Hash algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-256 (256-bit cryptographic hash)
    #[default]
    Sha256,

    /// SHA-512 (512-bit cryptographic hash)
    Sha512,
}

impl HashAlgorithm {
    /// Get the hash output length in bytes
    #[inline]
    pub const fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Get the hash output length as a hex string
    #[inline]
    pub const fn hex_len(&self) -> usize {
        self.output_len() * 2
    }

    /// Get the algorithm name as a string
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Guess the algorithm from the length of a bare hex digest
    fn from_hex_len(len: usize) -> Option<Self> {
        [Self::Sha256, Self::Sha512]
            .into_iter()
            .find(|algo| algo.hex_len() == len)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(HashError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Checksum parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Checksum string is empty
    Empty,
    /// Unknown hash algorithm name
    UnknownAlgorithm(String),
    /// Hash string has wrong length for algorithm
    InvalidLength { expected: usize, got: usize },
    /// Hash string contains invalid hex characters
    InvalidHex(String),
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "checksum is empty"),
            Self::UnknownAlgorithm(name) => write!(f, "unknown hash algorithm: {}", name),
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid hash length: expected {}, got {}", expected, got)
            }
            Self::InvalidHex(s) => write!(f, "invalid hex in hash: {}", s),
        }
    }
}

impl std::error::Error for HashError {}

impl From<HashError> for crate::Error {
    fn from(err: HashError) -> Self {
        crate::Error::InvalidChecksum(err.to_string())
    }
}

/// A content hash together with the algorithm that produced it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    /// The algorithm used
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest
    pub value: String,
}

impl Checksum {
    /// Create a checksum, validating the digest for the algorithm
    pub fn new(algorithm: HashAlgorithm, value: impl Into<String>) -> Result<Self, HashError> {
        let value = value.into();
        if value.is_empty() {
            return Err(HashError::Empty);
        }

        let expected_len = algorithm.hex_len();
        if value.len() != expected_len {
            return Err(HashError::InvalidLength {
                expected: expected_len,
                got: value.len(),
            });
        }

        if hex::decode(&value).is_err() {
            return Err(HashError::InvalidHex(value));
        }

        Ok(Self {
            algorithm,
            value: value.to_lowercase(),
        })
    }

    /// Parse `sha256:abc...`, `sha512:abc...` or a bare digest
    pub fn parse_prefixed(s: &str) -> Result<Self, HashError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(HashError::Empty);
        }

        if let Some((algo, digest)) = s.split_once(':') {
            return Self::new(algo.parse()?, digest);
        }

        let algorithm = HashAlgorithm::from_hex_len(s.len()).unwrap_or_default();
        Self::new(algorithm, s)
    }

    /// Format as a prefixed string (e.g., "sha256:abc123...")
    pub fn to_prefixed_string(&self) -> String {
        format!("{}:{}", self.algorithm.name(), self.value)
    }

    /// Get the digest as a hex string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Verify bytes against this checksum
    pub fn verify_bytes(&self, data: &[u8]) -> Result<(), VerifyError> {
        let mut hasher = Hasher::new(self.algorithm);
        hasher.update(data);
        self.compare(hasher.finalize())
    }

    /// Verify a stream against this checksum without buffering it whole
    pub fn verify_reader<R: Read>(&self, reader: &mut R) -> io::Result<Result<(), VerifyError>> {
        let actual = hash_reader(self.algorithm, reader)?;
        Ok(self.compare(actual))
    }

    fn compare(&self, actual: Checksum) -> Result<(), VerifyError> {
        if actual.value == self.value {
            Ok(())
        } else {
            Err(VerifyError {
                expected: self.value.clone(),
                actual: actual.value,
                algorithm: self.algorithm,
            })
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_prefixed_string())
    }
}

impl FromStr for Checksum {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_prefixed(s)
    }
}

impl Serialize for Checksum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_string())
    }
}

impl<'de> Deserialize<'de> for Checksum {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_prefixed(&raw).map_err(serde::de::Error::custom)
    }
}

/// Incremental hasher for either supported algorithm
pub struct Hasher {
    algorithm: HashAlgorithm,
    state: HasherState,
}

enum HasherState {
    Sha256(Sha256),
    Sha512(Sha512),
}

impl Hasher {
    /// Create a new hasher with the specified algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        let state = match algorithm {
            HashAlgorithm::Sha256 => HasherState::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => HasherState::Sha512(Sha512::new()),
        };
        Self { algorithm, state }
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        match &mut self.state {
            HasherState::Sha256(hasher) => hasher.update(data),
            HasherState::Sha512(hasher) => hasher.update(data),
        }
    }

    /// Finalize and return the checksum
    pub fn finalize(self) -> Checksum {
        let value = match self.state {
            HasherState::Sha256(hasher) => hex::encode(hasher.finalize()),
            HasherState::Sha512(hasher) => hex::encode(hasher.finalize()),
        };
        Checksum {
            algorithm: self.algorithm,
            value,
        }
    }
}

/// Compute the checksum of data from a reader
pub fn hash_reader<R: Read>(algorithm: HashAlgorithm, reader: &mut R) -> io::Result<Checksum> {
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Checksum mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub expected: String,
    pub actual: String,
    pub algorithm: HashAlgorithm,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: expected {}, got {}",
            self.algorithm, self.expected, self.actual
        )
    }
}

impl std::error::Error for VerifyError {}

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Hashing algorithms a [`ContentChecksum`] can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    Md5,
}

impl Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
        }
    }
}

/// A digest of the asset bytes as announced by the source website.
///
/// `value` is always the lowercase hexadecimal representation of the digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentChecksum {
    pub algorithm: ChecksumAlgorithm,
    pub value: String,
}

impl ContentChecksum {
    pub fn md5(hex_digest: &str) -> Self {
        Self {
            algorithm: ChecksumAlgorithm::Md5,
            value: hex_digest.to_lowercase(),
        }
    }

    /// Hashes `data` with this checksum's algorithm and returns the lowercase hex digest.
    pub fn digest(&self, data: &[u8]) -> String {
        match self.algorithm {
            ChecksumAlgorithm::Md5 => format!("{:x}", md5::compute(data)),
        }
    }

    /// Checks if `data` hashes to this checksum.
    #[inline]
    pub fn matches(&self, data: &[u8]) -> bool {
        self.digest(data) == self.value
    }
}

impl Display for ContentChecksum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn md5_is_normalized_to_lowercase() {
        let sum = ContentChecksum::md5("D41D8CD98F00B204E9800998ECF8427E");
        assert_eq!(sum.value, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sum.to_string(), "md5:d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn matches_data() {
        let sum = ContentChecksum::md5("5d41402abc4b2a76b9719d911017c592");
        assert!(sum.matches(b"hello"));
        assert!(!sum.matches(b"hello!"));
    }
}

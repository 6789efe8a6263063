//! Canonical content identifiers.
//!
//! A [`Cid`] is a CIDv1 in its base32 string form:
//!
//! ```text
//! "b" + base32lower_nopad( 0x01 | codec | 0x12 | 0x20 | digest[32] )
//!        version ──┘      │      │      │
//!        content type ────┘      │      └── digest length
//!        multihash sha2-256 ─────┘
//! ```
//!
//! Encoding always produces the `raw` (0x55) content type. Decoding accepts
//! any content-type byte and preserves it, but is strict about everything
//! else: only strings that re-encode to themselves decode successfully.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::{Digest, DIGEST_LEN};
use crate::error::CidError;

/// CID format version.
pub const CID_VERSION: u8 = 0x01;
/// Multicodec tag for raw binary content.
pub const CODEC_RAW: u8 = 0x55;
/// Multihash tag for SHA2-256.
pub const MULTIHASH_SHA2_256: u8 = 0x12;
/// Multibase prefix for lowercase, unpadded RFC 4648 base32.
pub const MULTIBASE_BASE32: char = 'b';

const HEADER_LEN: usize = 4;
const CID_BYTE_LEN: usize = HEADER_LEN + DIGEST_LEN;
const ALPHABET: base32::Alphabet = base32::Alphabet::Rfc4648Lower { padding: false };

/// Encode a SHA-256 digest as a canonical `raw` identifier string.
pub fn encode(digest: &Digest) -> String {
    Cid::raw(*digest).to_string()
}

/// Decode an identifier string back to its digest.
pub fn decode(s: &str) -> Result<Digest, CidError> {
    Cid::parse(s).map(|cid| cid.digest())
}

/// Self-describing content identifier (CIDv1, sha2-256, base32).
///
/// Carries no reference to where the content lives. Two `Cid`s compare equal
/// when both the content-type tag and the digest match; integrity checks
/// should compare [`Cid::digest`] only.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cid {
    codec: u8,
    digest: Digest,
}

impl Cid {
    /// Identifier for raw content with the given digest.
    pub const fn raw(digest: Digest) -> Self {
        Self {
            codec: CODEC_RAW,
            digest,
        }
    }

    /// Identifier with an explicit content-type tag.
    pub const fn with_codec(codec: u8, digest: Digest) -> Self {
        Self { codec, digest }
    }

    /// The content-type tag byte.
    pub fn codec(&self) -> u8 {
        self.codec
    }

    /// The SHA-256 digest this identifier names.
    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Binary form: version, codec, multihash header, digest.
    pub fn to_bytes(&self) -> [u8; CID_BYTE_LEN] {
        let mut buf = [0u8; CID_BYTE_LEN];
        buf[0] = CID_VERSION;
        buf[1] = self.codec;
        buf[2] = MULTIHASH_SHA2_256;
        buf[3] = DIGEST_LEN as u8;
        buf[HEADER_LEN..].copy_from_slice(self.digest.as_bytes());
        buf
    }

    /// First 8 characters of the string form, for file names and logs.
    pub fn short(&self) -> String {
        let mut s = self.to_string();
        s.truncate(8);
        s
    }

    /// Parse and validate an identifier string.
    pub fn parse(s: &str) -> Result<Self, CidError> {
        let mut chars = s.chars();
        let prefix = chars.next().ok_or(CidError::Empty)?;
        if prefix != MULTIBASE_BASE32 {
            return Err(CidError::MissingMultibase(prefix));
        }
        let body = chars.as_str();
        if !body.bytes().all(|b| matches!(b, b'a'..=b'z' | b'2'..=b'7')) {
            return Err(CidError::InvalidBase32);
        }
        let raw = base32::decode(ALPHABET, body).ok_or(CidError::InvalidBase32)?;

        if raw.len() < HEADER_LEN {
            return Err(CidError::Truncated { len: raw.len() });
        }
        if raw[0] != CID_VERSION {
            return Err(CidError::UnsupportedVersion(raw[0]));
        }
        let (code, len) = (raw[2], raw[3]);
        if code != MULTIHASH_SHA2_256 || len as usize != DIGEST_LEN {
            return Err(CidError::UnsupportedMultihash { code, len });
        }
        if raw.len() < CID_BYTE_LEN {
            return Err(CidError::Truncated { len: raw.len() });
        }
        if raw.len() > CID_BYTE_LEN {
            return Err(CidError::TrailingBytes {
                extra: raw.len() - CID_BYTE_LEN,
            });
        }

        let digest =
            Digest::from_slice(&raw[HEADER_LEN..]).map_err(|_| CidError::Truncated { len: raw.len() })?;
        let cid = Self::with_codec(raw[1], digest);

        // Unused trailing bits or odd lengths can decode to the same bytes as
        // the canonical string. Only the canonical spelling is accepted.
        if base32::encode(ALPHABET, &cid.to_bytes()) != body {
            return Err(CidError::NonCanonical);
        }
        Ok(cid)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{MULTIBASE_BASE32}{}",
            base32::encode(ALPHABET, &self.to_bytes())
        )
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({self})")
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Cid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

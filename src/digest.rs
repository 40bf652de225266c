//! Structural digests of constraint systems.
//!
//! A digest binds persisted keys and proofs to the circuit they were produced
//! for. Types opt in through [`SimpleDigestible`]; their serde encoding is fed
//! to SHA3-256, so anything marked `#[serde(skip)]` (debug labels, cached
//! digests) does not influence the result.

use bincode::Options;
use serde::Serialize;
use sha3::{Digest, Sha3_256};
use std::io;

/// A 32-byte SHA3-256 digest of a constraint system's structure
pub type ShapeDigest = [u8; 32];

/// Trait for components with potentially discrete digests to be included in their container's digest.
pub trait Digestible {
  /// Write the byte representation of Self in a byte buffer
  fn write_bytes<W: Sized + io::Write>(&self, byte_sink: &mut W) -> Result<(), io::Error>;
}

/// Marker trait to be implemented for types that implement `Digestible` and `Serialize`.
/// Their instances will be serialized to bytes then digested.
pub trait SimpleDigestible: Serialize {}

impl<T: SimpleDigestible> Digestible for T {
  fn write_bytes<W: Sized + io::Write>(&self, byte_sink: &mut W) -> Result<(), io::Error> {
    let config = bincode::DefaultOptions::new()
      .with_little_endian()
      .with_fixint_encoding();
    config
      .serialize_into(byte_sink, self)
      .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
  }
}

/// Computes SHA3-256 digests of `Digestible` values
pub struct DigestComputer<'a, T> {
  inner: &'a T,
}

impl<'a, T: Digestible> DigestComputer<'a, T> {
  /// Create a new DigestComputer
  pub fn new(inner: &'a T) -> Self {
    DigestComputer { inner }
  }

  /// Compute the digest of a `Digestible` instance.
  pub fn digest(&self) -> Result<ShapeDigest, io::Error> {
    let mut hasher = Sha3_256::new();
    self.inner.write_bytes(&mut hasher)?;
    Ok(hasher.finalize().into())
  }
}

#[cfg(test)]
mod tests {
  use super::{DigestComputer, SimpleDigestible};
  use serde::Serialize;

  #[derive(Serialize)]
  struct S {
    i: usize,
    #[serde(skip)]
    label: String,
  }

  impl SimpleDigestible for S {}

  #[test]
  fn test_skipped_fields_not_ingested() {
    let s1 = S {
      i: 42,
      label: "first".into(),
    };
    let s2 = S {
      i: 42,
      label: "second".into(),
    };
    assert_eq!(
      DigestComputer::new(&s1).digest().unwrap(),
      DigestComputer::new(&s2).digest().unwrap()
    );
  }

  #[test]
  fn test_digest_depends_on_content() {
    let s1 = S {
      i: 1,
      label: String::new(),
    };
    let s2 = S {
      i: 2,
      label: String::new(),
    };
    assert_ne!(
      DigestComputer::new(&s1).digest().unwrap(),
      DigestComputer::new(&s2).digest().unwrap()
    );
  }
}

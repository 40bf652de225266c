//! Persistence of verification keys and proofs.
//!
//! Each file is a bincode-encoded envelope holding a format version, the
//! digest of the constraint system the artifact belongs to, and the backend's
//! own serde encoding of the artifact.
use crate::{digest::ShapeDigest, errors::R1CSError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fs, path::Path};
use tracing::info;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
  version: u32,
  digest: ShapeDigest,
  payload: T,
}

/// Writes a verification key for the circuit with the given digest
pub fn write_verification_key<T: Serialize>(
  path: impl AsRef<Path>,
  digest: &ShapeDigest,
  vk: &T,
) -> Result<(), R1CSError> {
  write_artifact(path.as_ref(), "verification key", digest, vk)
}

/// Writes a proof for the circuit with the given digest
pub fn write_proof<T: Serialize>(
  path: impl AsRef<Path>,
  digest: &ShapeDigest,
  proof: &T,
) -> Result<(), R1CSError> {
  write_artifact(path.as_ref(), "proof", digest, proof)
}

/// Reads a verification key, checking that it belongs to the expected circuit
pub fn read_verification_key<T: DeserializeOwned>(
  path: impl AsRef<Path>,
  expected: &ShapeDigest,
) -> Result<T, R1CSError> {
  read_artifact(path.as_ref(), "verification key", expected)
}

/// Reads a proof, checking that it belongs to the expected circuit
pub fn read_proof<T: DeserializeOwned>(
  path: impl AsRef<Path>,
  expected: &ShapeDigest,
) -> Result<T, R1CSError> {
  read_artifact(path.as_ref(), "proof", expected)
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> R1CSError {
  R1CSError::Storage {
    reason: format!("{}: {e}", path.display()),
  }
}

fn write_artifact<T: Serialize>(
  path: &Path,
  kind: &str,
  digest: &ShapeDigest,
  payload: &T,
) -> Result<(), R1CSError> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
  }

  let bytes = bincode::serialize(&Envelope {
    version: FORMAT_VERSION,
    digest: *digest,
    payload,
  })?;
  fs::write(path, &bytes).map_err(|e| storage_error(path, e))?;

  info!(path = %path.display(), bytes = bytes.len(), kind, "artifact written");
  Ok(())
}

fn read_artifact<T: DeserializeOwned>(
  path: &Path,
  kind: &str,
  expected: &ShapeDigest,
) -> Result<T, R1CSError> {
  let bytes = fs::read(path).map_err(|e| storage_error(path, e))?;
  let envelope: Envelope<T> = bincode::deserialize(&bytes).map_err(|e| storage_error(path, e))?;

  if envelope.version != FORMAT_VERSION {
    return Err(storage_error(
      path,
      format!(
        "unsupported {kind} format version {}, expected {FORMAT_VERSION}",
        envelope.version
      ),
    ));
  }
  if envelope.digest != *expected {
    return Err(storage_error(
      path,
      format!(
        "{kind} belongs to circuit {}, expected {}",
        hex::encode(envelope.digest),
        hex::encode(expected)
      ),
    ));
  }

  Ok(envelope.payload)
}

//! Carries arkworks keys and proofs inside serde structures.
//!
//! A field marked `#[serde_as(as = "ArkCompressed<T>")]` is written as the
//! compressed canonical encoding of `T`. Reading validates curve points and
//! refuses buffers with trailing bytes, so a damaged artifact file fails to
//! load instead of decoding to something else.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use serde::{Deserialize, Deserializer, Serializer, de, ser};
use serde_with::{DeserializeAs, SerializeAs};
use std::marker::PhantomData;

pub(crate) struct ArkCompressed<T>(PhantomData<T>);

impl<T: CanonicalSerialize> SerializeAs<T> for ArkCompressed<T> {
  fn serialize_as<S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    let mut bytes = Vec::with_capacity(value.serialized_size(Compress::Yes));
    value
      .serialize_with_mode(&mut bytes, Compress::Yes)
      .map_err(ser::Error::custom)?;
    serializer.serialize_bytes(&bytes)
  }
}

impl<'de, T: CanonicalDeserialize> DeserializeAs<'de, T> for ArkCompressed<T> {
  fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
    let bytes = Vec::<u8>::deserialize(deserializer)?;
    let mut reader = bytes.as_slice();
    let value = T::deserialize_with_mode(&mut reader, Compress::Yes, Validate::Yes)
      .map_err(de::Error::custom)?;
    if !reader.is_empty() {
      return Err(de::Error::custom(format!(
        "{} trailing bytes after arkworks value",
        reader.len()
      )));
    }
    Ok(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ark_bn254::Fr;
  use serde::Serialize;
  use serde_with::serde_as;

  #[serde_as]
  #[derive(Debug, PartialEq, Serialize, Deserialize)]
  struct Scalars {
    #[serde_as(as = "ArkCompressed<Vec<Fr>>")]
    values: Vec<Fr>,
    #[serde_as(as = "ArkCompressed<Fr>")]
    last: Fr,
  }

  #[serde_as]
  #[derive(Debug, Deserialize)]
  struct Single {
    #[serde_as(as = "ArkCompressed<Fr>")]
    #[allow(dead_code)]
    value: Fr,
  }

  #[test]
  fn test_round_trip() {
    let s = Scalars {
      values: vec![Fr::from(3u64), -Fr::from(8u64)],
      last: Fr::from(17u64),
    };
    let bytes = bincode::serialize(&s).unwrap();
    assert_eq!(bincode::deserialize::<Scalars>(&bytes).unwrap(), s);
  }

  #[test]
  fn test_damaged_bytes_rejected() {
    let mut encoded = Vec::new();
    Fr::from(5u64).serialize_compressed(&mut encoded).unwrap();
    let exact = bincode::serialize(&encoded).unwrap();
    assert!(bincode::deserialize::<Single>(&exact).is_ok());

    let mut longer = encoded.clone();
    longer.push(0);
    let bytes = bincode::serialize(&longer).unwrap();
    assert!(bincode::deserialize::<Single>(&bytes).is_err());

    let bytes = bincode::serialize(&encoded[..encoded.len() - 1].to_vec()).unwrap();
    assert!(bincode::deserialize::<Single>(&bytes).is_err());
  }
}

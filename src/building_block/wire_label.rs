use crate::{
  building_block::util::{bytes_to_integer, extend_with_leading_zeros},
  error::Result,
};
use rand::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;

// 128-bit labels
pub const LABEL_LEN: usize = 16;

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireLabel {
  k: [u8; LABEL_LEN],
}

impl WireLabel {
  // labels encoding to 0 or 1 are resampled; 0 cannot be encrypted
  pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
    loop {
      let mut k = [0u8; LABEL_LEN];
      rng.fill_bytes(&mut k);
      let label = WireLabel { k };
      if label.to_integer() >= 2 {
        break label;
      }
    }
  }

  pub fn from_bytes(k: [u8; LABEL_LEN]) -> Self {
    WireLabel { k }
  }

  pub fn from_decrypted(bytes: &[u8]) -> Result<Self> {
    let padded = extend_with_leading_zeros(bytes, LABEL_LEN)?;
    let mut k = [0u8; LABEL_LEN];
    k.copy_from_slice(&padded);
    Ok(WireLabel { k })
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.k
  }

  pub fn to_integer(&self) -> Integer {
    bytes_to_integer(&self.k)
  }
}

impl fmt::Debug for WireLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "WireLabel({})", hex::encode(self.k))
  }
}

use crate::{
  building_block::{
    elgamal::DiscreteLogCrypto,
    garbled_table::GarbledTable,
    wires::Wires,
  },
  error::{Error, Result},
};
use rug::rand::MutRandState;
use serde::{Deserialize, Serialize};

const FALSE_PLAINTEXT: &[u8] = b"0";
const TRUE_PLAINTEXT: &[u8] = b"1";

/// Final gate of a circuit. Its rows encrypt the plaintext output bit
/// instead of an output label, so whoever evaluates it learns the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDecodingTable {
  table: GarbledTable,
}

impl OutputDecodingTable {
  fn encode(v: bool) -> Vec<u8> {
    let plaintext = if v { TRUE_PLAINTEXT } else { FALSE_PLAINTEXT };
    plaintext.to_vec()
  }

  pub fn new<E, F>(
    crypto: &E,
    left: usize,
    right: usize,
    func: F,
    wires: &Wires,
    rng: &mut dyn MutRandState,
  ) -> Result<Self>
  where
    E: DiscreteLogCrypto + ?Sized,
    F: Fn(bool, bool) -> bool,
  {
    let table = GarbledTable::garble(
      crypto,
      wires.get(left)?,
      wires.get(right)?,
      func,
      Self::encode,
      rng,
    )?;
    Ok(OutputDecodingTable { table })
  }

  pub fn decode<E>(&self, crypto: &E, k_a: &[u8], k_b: &[u8]) -> Result<bool>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    let plaintext = self.table.evaluate(crypto, k_a, k_b)?;
    match plaintext.as_slice() {
      FALSE_PLAINTEXT => Ok(false),
      TRUE_PLAINTEXT => Ok(true),
      other => Err(Error::Decryption(
        format!("unexpected output plaintext {}", hex::encode(other)),
      )),
    }
  }

  pub fn garbled_table(&self) -> &GarbledTable {
    &self.table
  }
}

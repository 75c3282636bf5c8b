use crate::{
  building_block::{
    additive_group::AdditiveGroup,
    elgamal::{Ciphertext, DiscreteLogCrypto, PrivateKey},
    util::bytes_to_integer,
    wire::Wire,
    wires::Wires,
  },
  error::{Error, Result},
};
use rug::{rand::MutRandState, Integer};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::HashMap;
use tracing::debug;

pub type HashKey = [u8; 32];

// rows are keyed by SHA3-256(k_a || k_b) and encrypted under the public key
// of the password (k_a + k_b) mod p
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbledTable {
  table: HashMap<HashKey, Ciphertext>,
}

impl GarbledTable {
  // the order of k_a and k_b matters
  pub fn compute_hash(k_a: &[u8], k_b: &[u8]) -> HashKey {
    let mut hasher = Sha3_256::new();
    hasher.update(k_a);
    hasher.update(k_b);
    hasher.finalize().into()
  }

  pub fn compute_password(k_a: &[u8], k_b: &[u8], p: &Integer) -> PrivateKey {
    let group = AdditiveGroup::new(p);
    let a = group.element(&bytes_to_integer(k_a));
    let b = group.element(&bytes_to_integer(k_b));
    PrivateKey::from((a + b).n)
  }

  // payload maps the gate's output bit to the plaintext stored in the row
  pub(crate) fn garble<E, F, P>(
    crypto: &E,
    left: &Wire,
    right: &Wire,
    func: F,
    payload: P,
    rng: &mut dyn MutRandState,
  ) -> Result<Self>
  where
    E: DiscreteLogCrypto + ?Sized,
    F: Fn(bool, bool) -> bool,
    P: Fn(bool) -> Vec<u8>,
  {
    let p = &crypto.group().p;
    let mut table = HashMap::with_capacity(4);
    let mut rows: HashMap<HashKey, (bool, bool)> = HashMap::with_capacity(4);

    // for all combination of v_a and v_b
    for v_a in [false, true] {
      for v_b in [false, true] {
        let a_label = left.get_label(v_a);
        let b_label = right.get_label(v_b);

        let hash_key = Self::compute_hash(a_label.as_bytes(), b_label.as_bytes());
        if let Some(&first) = rows.get(&hash_key) {
          return Err(Error::HashCollision {
            first,
            second: (v_a, v_b),
          });
        }
        rows.insert(hash_key, (v_a, v_b));

        let password = Self::compute_password(a_label.as_bytes(), b_label.as_bytes(), p);
        let public_key = crypto.public_key_from(&password.x);

        let v_c = func(v_a, v_b);
        let ciphertext = crypto.encrypt(&payload(v_c), &public_key, rng)?;
        table.insert(hash_key, ciphertext);
      }
    }
    debug!(left = left.index, right = right.index, "garbled 4 rows");

    Ok(GarbledTable { table })
  }

  pub fn new<E, F>(
    crypto: &E,
    out: usize,
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
    let out = wires.get(out)?;
    let left = wires.get(left)?;
    let right = wires.get(right)?;

    Self::garble(
      crypto,
      left,
      right,
      func,
      |v_c| out.get_label(v_c).as_bytes().to_vec(),
      rng,
    )
  }

  // labels of the wrong row go undetected
  pub fn evaluate<E>(&self, crypto: &E, k_a: &[u8], k_b: &[u8]) -> Result<Vec<u8>>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    let hash_key = Self::compute_hash(k_a, k_b);
    let ciphertext = self.table.get(&hash_key).ok_or(Error::Lookup)?;
    debug!(row = %hex::encode(&hash_key[..4]), "found garbled row");

    let password = Self::compute_password(k_a, k_b, &crypto.group().p);
    crypto.decrypt(ciphertext, &password)
  }

  pub fn len(&self) -> usize {
    self.table.len()
  }

  pub fn is_empty(&self) -> bool {
    self.table.is_empty()
  }
}

// One-round OT. The receiver holds the private key of y_i only and shifts it
// by the public step r to get y_j = y_i + (j - i) * r mod p. The sender checks
// y_j = y_0 + j * r before encrypting message j under key j.
//
// y_i must be uniform over Z_p^*, i.e. the group generator a primitive root.
// Otherwise the residuosity of the family gives the choice away.

use crate::{
  building_block::{
    additive_group::{AdditiveGroup, Element},
    elgamal::{
      Ciphertext,
      DiscreteLogCrypto,
      GroupParams,
      PrivateKey,
      PublicKey,
    },
    util::bytes_to_integer,
  },
  error::{Error, Result},
};
use rug::{ops::RemRounding, rand::MutRandState, Integer};
use sha3::{Digest, Sha3_256};
use tracing::{debug, instrument};

pub const DEFAULT_PROGRESSION_SEED: &[u8] = b"1";

/// Public step `r = SHA3-256(seed) mod p`.
pub fn progression_step(seed: &[u8], group: &GroupParams) -> Result<Integer> {
  let digest = Sha3_256::digest(seed);
  let r = bytes_to_integer(&digest).rem_euc(&group.p);
  if r.is_zero() {
    return Err(Error::InvalidGroup(
      "progression step reduces to zero modulo p".to_string(),
    ));
  }
  Ok(r)
}

/// Fails with [`Error::ApVerification`] naming the first key that is
/// outside the group or off the progression.
pub fn verify_progression(
  group: &GroupParams,
  public_keys: &[PublicKey],
  step: &Integer,
) -> Result<()> {
  let Some(first) = public_keys.first() else {
    return Ok(());
  };
  let additive = AdditiveGroup::new(&group.p);
  let y_0 = additive.element(&first.y);
  let step = additive.element(step);

  for (j, public_key) in public_keys.iter().enumerate() {
    let in_group = public_key.p == group.p
      && public_key.g == group.g
      && public_key.y > 0
      && public_key.y < group.p;
    if !in_group {
      return Err(Error::ApVerification { index: j });
    }

    let expected = y_0.clone() + &step * &Integer::from(j);
    if additive.element(&public_key.y) != expected {
      return Err(Error::ApVerification { index: j });
    }
  }
  Ok(())
}

pub struct ApReceiver {
  choice: usize,
  private_key: PrivateKey,
  public_keys: Vec<PublicKey>,
}

impl ApReceiver {
  #[instrument(level = "debug", skip(crypto, step, rng), err)]
  pub fn new<E>(
    crypto: &E,
    choice: usize,
    num_keys: usize,
    step: &Integer,
    rng: &mut dyn MutRandState,
  ) -> Result<Self>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    if choice >= num_keys {
      return Err(Error::InvalidChoice { choice, n: num_keys });
    }
    let additive = AdditiveGroup::new(&crypto.group().p);
    let step = additive.element(step);

    loop {
      let (genuine, private_key) = crypto.generate_keys(rng);
      let y_i = additive.element(&genuine.y);

      let ys: Vec<Element> = (0..num_keys)
        .map(|j| {
          let offset = Integer::from(j) - Integer::from(choice);
          y_i.clone() + &step * &offset
        })
        .collect();

      // a zero key cannot encrypt and would be rejected by the sender
      if ys.iter().any(Element::is_zero) {
        debug!("key family contains zero; resampling");
        continue;
      }

      let public_keys = ys.into_iter()
        .map(|y| PublicKey {
          p: genuine.p.clone(),
          g: genuine.g.clone(),
          y: y.n,
        })
        .collect();

      return Ok(ApReceiver {
        choice,
        private_key,
        public_keys,
      });
    }
  }

  pub fn public_keys(&self) -> &[PublicKey] {
    &self.public_keys
  }

  pub fn decrypt<E>(&self, crypto: &E, ciphertexts: &[Ciphertext]) -> Result<Vec<u8>>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    if ciphertexts.len() != self.public_keys.len() {
      return Err(Error::KeyCountMismatch {
        expected: self.public_keys.len(),
        actual: ciphertexts.len(),
      });
    }
    crypto.decrypt(&ciphertexts[self.choice], &self.private_key)
  }
}

pub struct ApSender {
  messages: Vec<Vec<u8>>,
  step: Integer,
}

impl ApSender {
  pub fn new(messages: Vec<Vec<u8>>, step: Integer) -> Self {
    ApSender { messages, step }
  }

  // nothing is encrypted unless the whole family verifies
  #[instrument(level = "debug", skip_all, fields(n = self.messages.len()), err)]
  pub fn encrypt_messages<E>(
    &self,
    crypto: &E,
    public_keys: &[PublicKey],
    rng: &mut dyn MutRandState,
  ) -> Result<Vec<Ciphertext>>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    if public_keys.len() != self.messages.len() {
      return Err(Error::KeyCountMismatch {
        expected: self.messages.len(),
        actual: public_keys.len(),
      });
    }
    verify_progression(crypto.group(), public_keys, &self.step)?;
    debug!("key family verified");

    let mut ciphertexts = Vec::with_capacity(self.messages.len());
    for (message, public_key) in self.messages.iter().zip(public_keys) {
      ciphertexts.push(crypto.encrypt(message, public_key, rng)?);
    }
    Ok(ciphertexts)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::building_block::{
    elgamal::ElGamal,
    util::{get_32_byte_rng, pow_mod},
    wire_label::WireLabel,
    wires::Wires,
  };
  use rand::rngs::OsRng;
  use std::cell::Cell;

  // counts encryptions to prove rejected families are never used
  struct CountingCrypto {
    inner: ElGamal,
    encryptions: Cell<usize>,
  }

  impl DiscreteLogCrypto for CountingCrypto {
    fn group(&self) -> &GroupParams {
      self.inner.group()
    }

    fn generate_keys(&self, rng: &mut dyn MutRandState) -> (PublicKey, PrivateKey) {
      self.inner.generate_keys(rng)
    }

    fn public_key_from(&self, secret: &Integer) -> PublicKey {
      self.inner.public_key_from(secret)
    }

    fn encrypt(
      &self,
      message: &[u8],
      public_key: &PublicKey,
      rng: &mut dyn MutRandState,
    ) -> Result<Ciphertext> {
      self.encryptions.set(self.encryptions.get() + 1);
      self.inner.encrypt(message, public_key, rng)
    }

    fn decrypt(&self, ciphertext: &Ciphertext, private_key: &PrivateKey) -> Result<Vec<u8>> {
      self.inner.decrypt(ciphertext, private_key)
    }
  }

  fn messages(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|j| format!("msg_{}", j + 1).into_bytes()).collect()
  }

  #[test]
  fn test_default_step() {
    let group = GroupParams::default();
    let r = progression_step(DEFAULT_PROGRESSION_SEED, &group).unwrap();
    let digest = Sha3_256::digest(b"1");

    // the group modulus is wider than the digest
    assert_eq!(r, bytes_to_integer(&digest));
  }

  #[test]
  fn test_transfer_every_choice() {
    let elgamal = ElGamal::default();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();

    for n in [2, 3, 8] {
      let sender = ApSender::new(messages(n), step.clone());

      for i in 0..n {
        let receiver = ApReceiver::new(&elgamal, i, n, &step, &mut rng).unwrap();
        assert_eq!(receiver.public_keys().len(), n);

        let ciphertexts = sender
          .encrypt_messages(&elgamal, receiver.public_keys(), &mut rng)
          .unwrap();
        let res = receiver.decrypt(&elgamal, &ciphertexts).unwrap();
        assert_eq!(res, messages(n)[i], "n = {}, i = {}", n, i);
      }
    }
  }

  #[test]
  fn test_other_messages_stay_hidden() {
    let elgamal = ElGamal::default();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();
    let n = 3;

    let sender = ApSender::new(messages(n), step.clone());
    let receiver = ApReceiver::new(&elgamal, 1, n, &step, &mut rng).unwrap();
    let ciphertexts = sender
      .encrypt_messages(&elgamal, receiver.public_keys(), &mut rng)
      .unwrap();

    // the receiver's key only opens its own slot
    for j in [0, 2] {
      let res = elgamal.decrypt(&ciphertexts[j], &receiver.private_key).unwrap();
      assert_ne!(res, messages(n)[j]);
    }
  }

  // the sender sees the same residue pattern whichever key is genuine
  #[test]
  fn test_residuosity_does_not_reveal_choice() {
    let elgamal = ElGamal::default();
    let p = &elgamal.group().p;
    let q = Integer::from(p - 1u8) >> 1u32;
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();

    for choice in [0, 1] {
      let residues = (0..64)
        .map(|_| ApReceiver::new(&elgamal, choice, 2, &step, &mut rng).unwrap())
        .filter(|receiver| pow_mod(&receiver.public_keys()[choice].y, &q, p) == 1)
        .count();
      assert!(
        residues > 0 && residues < 64,
        "genuine key at {} was a residue {} times out of 64", choice, residues,
      );
    }
  }

  #[test]
  fn test_every_choice_passes_verification() {
    let elgamal = ElGamal::default();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();

    for i in 0..4 {
      let receiver = ApReceiver::new(&elgamal, i, 4, &step, &mut rng).unwrap();
      assert!(verify_progression(elgamal.group(), receiver.public_keys(), &step).is_ok());
    }
  }

  #[test]
  fn test_tampered_key_is_rejected_before_encryption() {
    let crypto = CountingCrypto {
      inner: ElGamal::default(),
      encryptions: Cell::new(0),
    };
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, crypto.group()).unwrap();
    let n = 4;

    let sender = ApSender::new(messages(n), step.clone());
    let receiver = ApReceiver::new(&crypto, 2, n, &step, &mut rng).unwrap();

    for tampered in 0..n {
      let mut public_keys = receiver.public_keys().to_vec();
      public_keys[tampered].y += 1;

      let res = sender.encrypt_messages(&crypto, &public_keys, &mut rng);
      // tampering with key 0 shifts the base, so key 1 is the first mismatch
      let expected = if tampered == 0 { 1 } else { tampered };
      match res {
        Err(Error::ApVerification { index }) => assert_eq!(index, expected),
        other => panic!("expected verification failure, got {:?}", other),
      }
    }
    assert_eq!(crypto.encryptions.get(), 0);
  }

  #[test]
  fn test_key_outside_group_is_rejected() {
    let elgamal = ElGamal::default();
    let group = elgamal.group();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, group).unwrap();

    let receiver = ApReceiver::new(&elgamal, 0, 2, &step, &mut rng).unwrap();

    // same residue, but not reduced
    let mut public_keys = receiver.public_keys().to_vec();
    public_keys[1].y += &group.p;
    assert!(matches!(
      verify_progression(group, &public_keys, &step),
      Err(Error::ApVerification { index: 1 }),
    ));

    let mut public_keys = receiver.public_keys().to_vec();
    public_keys[0].g = Integer::from(3);
    assert!(matches!(
      verify_progression(group, &public_keys, &step),
      Err(Error::ApVerification { index: 0 }),
    ));
  }

  #[test]
  fn test_transfer_from_label_catalogue() {
    let elgamal = ElGamal::default();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();

    let mut wires = Wires::new();
    let x = wires.create(true, &mut OsRng);
    let _w = wires.create(false, &mut OsRng);
    let y = wires.create(true, &mut OsRng);
    let catalogue = wires.label_catalogue();

    let sender = ApSender::new(catalogue.clone(), step.clone());
    for (wire, bit) in [(x, true), (y, false)] {
      let choice = wires.catalogue_index(wire, bit).unwrap();
      let receiver = ApReceiver::new(&elgamal, choice, catalogue.len(), &step, &mut rng).unwrap();
      let ciphertexts = sender
        .encrypt_messages(&elgamal, receiver.public_keys(), &mut rng)
        .unwrap();

      let label = WireLabel::from_decrypted(&receiver.decrypt(&elgamal, &ciphertexts).unwrap()).unwrap();
      assert_eq!(&label, wires.get(wire).unwrap().get_label(bit));
    }
  }

  #[test]
  fn test_key_count_mismatch() {
    let elgamal = ElGamal::default();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();

    let sender = ApSender::new(messages(3), step.clone());
    let receiver = ApReceiver::new(&elgamal, 0, 2, &step, &mut rng).unwrap();

    assert!(matches!(
      sender.encrypt_messages(&elgamal, receiver.public_keys(), &mut rng),
      Err(Error::KeyCountMismatch { expected: 3, actual: 2 }),
    ));
    assert!(matches!(
      receiver.decrypt(&elgamal, &[]),
      Err(Error::KeyCountMismatch { expected: 2, actual: 0 }),
    ));
  }

  #[test]
  fn test_invalid_choice() {
    let elgamal = ElGamal::default();
    let mut rng = get_32_byte_rng();
    let step = progression_step(DEFAULT_PROGRESSION_SEED, elgamal.group()).unwrap();

    assert!(matches!(
      ApReceiver::new(&elgamal, 3, 3, &step, &mut rng),
      Err(Error::InvalidChoice { choice: 3, n: 3 }),
    ));
  }
}

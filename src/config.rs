use crate::{
  building_block::{
    elgamal::{ElGamal, GroupParams},
    ot::arithmetic_progression::{progression_step, DEFAULT_PROGRESSION_SEED},
    wire_label::LABEL_LEN,
  },
  error::{Error, Result},
};
use rug::Integer;
use serde::{Deserialize, Serialize};

// every wire label must encode to an integer below p
pub const MIN_GROUP_BITS: u32 = LABEL_LEN as u32 * 8 + 2;

/// Parameters both parties of a session must agree on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
  pub group: GroupParams,
  pub progression_seed: Vec<u8>,
}

impl Default for SessionConfig {
  fn default() -> Self {
    SessionConfig {
      group: GroupParams::modp_1536(),
      progression_seed: DEFAULT_PROGRESSION_SEED.to_vec(),
    }
  }
}

impl SessionConfig {
  pub fn new(group: GroupParams, progression_seed: &[u8]) -> Result<Self> {
    let config = SessionConfig {
      group,
      progression_seed: progression_seed.to_vec(),
    };
    config.validate()?;
    Ok(config)
  }

  // fields are public and may come off the wire, so sessions check again
  pub fn validate(&self) -> Result<()> {
    let num_bits = self.group.p.significant_bits();
    if num_bits < MIN_GROUP_BITS {
      return Err(Error::InvalidGroup(format!(
        "{}-bit modulus cannot hold {}-byte wire labels",
        num_bits, LABEL_LEN,
      )));
    }
    self.progression_step().map(|_| ())
  }

  pub fn crypto(&self) -> ElGamal {
    ElGamal::new(self.group.clone())
  }

  pub fn progression_step(&self) -> Result<Integer> {
    progression_step(&self.progression_seed, &self.group)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::building_block::{elgamal::DiscreteLogCrypto, util::get_32_byte_rng};

  #[test]
  fn test_default() {
    let config = SessionConfig::default();
    assert_eq!(config.group, GroupParams::modp_1536());
    assert_eq!(config.progression_seed, b"1");
    assert_eq!(config.crypto().group(), &config.group);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_seed_changes_step() {
    let a = SessionConfig::default();
    let b = SessionConfig::new(GroupParams::modp_1536(), b"2").unwrap();
    assert_ne!(a.progression_step().unwrap(), b.progression_step().unwrap());
  }

  #[test]
  fn test_group_narrower_than_labels_is_rejected() {
    let mut rng = get_32_byte_rng();
    let group = GroupParams::generate(LABEL_LEN as u32 * 8, &mut rng).unwrap();

    assert!(matches!(
      SessionConfig::new(group.clone(), b"1"),
      Err(Error::InvalidGroup(_)),
    ));

    let config = SessionConfig {
      group,
      progression_seed: b"1".to_vec(),
    };
    assert!(matches!(config.validate(), Err(Error::InvalidGroup(_))));
  }

  #[test]
  fn test_generated_group_config_survives_bincode() {
    let mut rng = get_32_byte_rng();
    let group = GroupParams::generate(192, &mut rng).unwrap();
    let config = SessionConfig::new(group, b"session").unwrap();

    let bytes = bincode::serialize(&config).unwrap();
    let received: SessionConfig = bincode::deserialize(&bytes).unwrap();
    assert_eq!(received, config);
  }
}

// XOR-masking OT. Not secure: the sender can match the value sent back in
// step 2 against the masked messages of step 1. Leading zero bytes of a
// message are lost since messages travel as integers.

use crate::{
  building_block::util::{
    bytes_to_integer,
    gen_random_bits,
    integer_to_bytes,
  },
  error::{Error, Result},
};
use rug::{rand::MutRandState, Integer};
use tracing::debug;

const MIN_MASK_BITS: u32 = 64;

pub fn encode(message: &[u8]) -> Integer {
  bytes_to_integer(message)
}

pub fn decode(n: &Integer) -> Vec<u8> {
  integer_to_bytes(n)
}

fn xor(a: &Integer, b: &Integer) -> Integer {
  Integer::from(a ^ b)
}

// random mask of exactly num_bits bits
fn gen_mask(num_bits: u32, rng: &mut dyn MutRandState) -> Integer {
  let mut mask = gen_random_bits(num_bits, rng);
  mask.set_bit(num_bits - 1, true);
  mask
}

pub struct CommutativeSender {
  secret: Integer,
  messages: Vec<Integer>,
}

impl CommutativeSender {
  pub fn new<M: AsRef<[u8]>>(messages: &[M], rng: &mut dyn MutRandState) -> Self {
    let messages: Vec<Integer> = messages.iter()
      .map(|m| encode(m.as_ref()))
      .collect();

    // the mask must cover every bit of the widest message
    let num_bits = messages.iter()
      .map(|m| m.significant_bits())
      .max()
      .unwrap_or(0)
      .max(MIN_MASK_BITS);
    let secret = gen_mask(num_bits, rng);

    CommutativeSender { secret, messages }
  }

  // step 1
  pub fn mask_messages(&self) -> Vec<Integer> {
    debug!(n = self.messages.len(), "masking messages");
    self.messages.iter()
      .map(|m| xor(&self.secret, m))
      .collect()
  }

  // step 3
  pub fn unmask(&self, remasked: &Integer) -> Integer {
    xor(remasked, &self.secret)
  }
}

pub struct CommutativeReceiver {
  choice: usize,
  secret: Integer,
  remasked: Integer,
}

impl CommutativeReceiver {
  // step 2
  pub fn new(
    choice: usize,
    masked: &[Integer],
    rng: &mut dyn MutRandState,
  ) -> Result<Self> {
    let chosen = masked.get(choice).ok_or(Error::InvalidChoice {
      choice,
      n: masked.len(),
    })?;

    let num_bits = chosen.significant_bits().max(MIN_MASK_BITS);
    let secret = gen_mask(num_bits, rng);
    let remasked = xor(chosen, &secret);

    Ok(CommutativeReceiver {
      choice,
      secret,
      remasked,
    })
  }

  pub fn choice(&self) -> usize {
    self.choice
  }

  pub fn remasked(&self) -> &Integer {
    &self.remasked
  }

  // step 4
  pub fn recover(&self, unmasked: &Integer) -> Vec<u8> {
    decode(&xor(unmasked, &self.secret))
  }
}

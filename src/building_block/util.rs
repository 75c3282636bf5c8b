use crate::error::{Error, Result};
use rand::{
  rngs::OsRng,
  RngCore,
};
use rug::{
  integer::Order,
  rand::{MutRandState, RandState},
  Integer,
};

// GMP random state seeded with 32 bytes from the OS
pub fn get_32_byte_rng() -> RandState<'static> {
  let mut seed = [0u8; 32];
  OsRng.fill_bytes(&mut seed);

  let mut rng = RandState::new();
  rng.seed(&bytes_to_integer(&seed));
  rng
}

pub fn gen_random_bits(num_bits: u32, rng: &mut dyn MutRandState) -> Integer {
  Integer::from(Integer::random_bits(num_bits, rng))
}

// uniformly samples from [lower, upper). upper must be greater than lower
pub fn gen_random_in_range(
  lower: &Integer,
  upper: &Integer,
  rng: &mut dyn MutRandState,
) -> Integer {
  let width = Integer::from(upper - lower);
  width.random_below(rng) + lower
}

pub fn bytes_to_integer(bytes: &[u8]) -> Integer {
  Integer::from_digits(bytes, Order::Msf)
}

// minimal big-endian representation. zero becomes an empty vector
pub fn integer_to_bytes(n: &Integer) -> Vec<u8> {
  n.to_digits::<u8>(Order::Msf)
}

// exp must be non-negative
pub fn pow_mod(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
  debug_assert!(*exp >= 0);
  base.pow_mod_ref(exp, modulus)
    .map(Integer::from)
    .unwrap_or_default()
}

// decryption drops leading zero bytes but hashing needs the full width
pub fn extend_with_leading_zeros(
  bytes: &[u8],
  target_len: usize,
) -> Result<Vec<u8>> {
  if bytes.len() > target_len {
    return Err(Error::Length {
      actual: bytes.len(),
      target: target_len,
    });
  }
  let mut padded = vec![0; target_len - bytes.len()];
  padded.extend_from_slice(bytes);
  Ok(padded)
}

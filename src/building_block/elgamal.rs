// ElGamal over Z_p^* for a safe prime p. Any integer in [0, p) is a valid
// private key, so the sum of two wire labels can be used as a password.
// Decrypting with the wrong key yields garbage, not an error.

use crate::{
  building_block::util::{
    bytes_to_integer,
    gen_random_bits,
    gen_random_in_range,
    integer_to_bytes,
    pow_mod,
  },
  error::{Error, Result},
};
use rug::{
  integer::IsPrime,
  ops::RemRounding,
  rand::MutRandState,
  Integer,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

const NUM_PRIMALITY_ITE: u32 = 25;

// RFC 3526 1536-bit MODP prime. The RFC's g = 2 only generates the
// quadratic residues; 31 is the smallest primitive root
const MODP_1536_PRIME: &str = concat!(
  "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1",
  "29024E088A67CC74020BBEA63B139B22514A08798E3404DD",
  "EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245",
  "E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED",
  "EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D",
  "C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F",
  "83655D23DCA3AD961C62F356208552BB9ED529077096966D",
  "670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF",
);
const MODP_GENERATOR: u32 = 31;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupParams {
  pub p: Integer,
  pub g: Integer,
}

impl GroupParams {
  /// `p` must be a safe prime and `g` must generate all of `Z_p^*`.
  pub fn new(p: Integer, g: Integer) -> Result<Self> {
    if p.is_probably_prime(NUM_PRIMALITY_ITE) == IsPrime::No {
      return Err(Error::InvalidGroup("modulus is not a prime".to_string()));
    }
    let q = Integer::from(&p - 1u8) >> 1u32;
    if q.is_probably_prime(NUM_PRIMALITY_ITE) == IsPrime::No {
      return Err(Error::InvalidGroup("modulus is not a safe prime".to_string()));
    }
    if !Self::is_primitive_root(&g, &p, &q) {
      return Err(Error::InvalidGroup(
        "generator is not a primitive root modulo p".to_string(),
      ));
    }
    Ok(GroupParams { p, g })
  }

  // for a safe prime p = 2q + 1 the only orders are 1, 2, q and 2q
  fn is_primitive_root(g: &Integer, p: &Integer, q: &Integer) -> bool {
    let p_minus_1 = Integer::from(p - 1u8);
    *g > 1 && *g < p_minus_1 && pow_mod(g, q, p) != 1
  }

  pub fn modp_1536() -> Self {
    let p = Integer::from_str_radix(MODP_1536_PRIME, 16)
      .expect("MODP prime is valid hex");
    GroupParams {
      p,
      g: Integer::from(MODP_GENERATOR),
    }
  }

  /// Samples a safe prime `p = 2q + 1` of `num_bits` bits and a primitive
  /// root modulo `p`.
  pub fn generate(num_bits: u32, rng: &mut dyn MutRandState) -> Result<Self> {
    if num_bits < 16 {
      return Err(Error::InvalidGroup(
        format!("{} bits is too small for a group", num_bits),
      ));
    }

    let (p, q) = loop {
      let mut q = gen_random_bits(num_bits - 1, rng);
      q.set_bit(num_bits - 2, true);
      let q = q.next_prime();

      let p = Integer::from(&q << 1u32) + 1u8;
      if p.significant_bits() == num_bits
        && p.is_probably_prime(NUM_PRIMALITY_ITE) != IsPrime::No {
        break (p, q);
      }
    };

    // half of Z_p^* are primitive roots
    let two = Integer::from(2);
    let p_minus_1 = Integer::from(&p - 1u8);
    let g = loop {
      let g = gen_random_in_range(&two, &p_minus_1, rng);
      if Self::is_primitive_root(&g, &p, &q) {
        break g;
      }
    };
    debug!(num_bits, "generated safe prime group");
    GroupParams::new(p, g)
  }
}

impl Default for GroupParams {
  fn default() -> Self {
    Self::modp_1536()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
  pub p: Integer,
  pub g: Integer,
  pub y: Integer, // g^x mod p
}

#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
  pub x: Integer,
}

impl From<Integer> for PrivateKey {
  fn from(x: Integer) -> Self {
    PrivateKey { x }
  }
}

impl fmt::Debug for PrivateKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PrivateKey(..)")
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
  pub c1: Integer, // g^k
  pub c2: Integer, // m * y^k
}

pub trait DiscreteLogCrypto {
  fn group(&self) -> &GroupParams;

  fn generate_keys(&self, rng: &mut dyn MutRandState) -> (PublicKey, PrivateKey);

  fn public_key_from(&self, secret: &Integer) -> PublicKey;

  fn encrypt(
    &self,
    message: &[u8],
    public_key: &PublicKey,
    rng: &mut dyn MutRandState,
  ) -> Result<Ciphertext>;

  fn decrypt(
    &self,
    ciphertext: &Ciphertext,
    private_key: &PrivateKey,
  ) -> Result<Vec<u8>>;

  fn decrypt_to_string(
    &self,
    ciphertext: &Ciphertext,
    private_key: &PrivateKey,
  ) -> Result<String> {
    let bytes = self.decrypt(ciphertext, private_key)?;
    String::from_utf8(bytes).map_err(|e| {
      Error::Decryption(format!("plaintext is not UTF-8: {}", e))
    })
  }
}

#[derive(Clone, Debug, Default)]
pub struct ElGamal {
  group: GroupParams,
}

impl ElGamal {
  pub fn new(group: GroupParams) -> Self {
    ElGamal { group }
  }

  pub fn generate_keys_from_group(
    p: &Integer,
    g: &Integer,
    rng: &mut dyn MutRandState,
  ) -> Result<(PublicKey, PrivateKey)> {
    let group = GroupParams::new(p.clone(), g.clone())?;
    Ok(ElGamal::new(group).generate_keys(rng))
  }

  // sample from [1, p - 1)
  fn gen_exponent(&self, rng: &mut dyn MutRandState) -> Integer {
    let p_minus_1 = Integer::from(&self.group.p - 1u8);
    gen_random_in_range(Integer::ONE, &p_minus_1, rng)
  }
}

impl DiscreteLogCrypto for ElGamal {
  fn group(&self) -> &GroupParams {
    &self.group
  }

  fn generate_keys(&self, rng: &mut dyn MutRandState) -> (PublicKey, PrivateKey) {
    let x = self.gen_exponent(rng);
    let public_key = self.public_key_from(&x);
    (public_key, PrivateKey { x })
  }

  fn public_key_from(&self, secret: &Integer) -> PublicKey {
    let GroupParams { p, g } = &self.group;
    let x = secret.clone().rem_euc(p);
    PublicKey {
      p: p.clone(),
      g: g.clone(),
      y: pow_mod(g, &x, p),
    }
  }

  fn encrypt(
    &self,
    message: &[u8],
    public_key: &PublicKey,
    rng: &mut dyn MutRandState,
  ) -> Result<Ciphertext> {
    let GroupParams { p, g } = &self.group;
    if &public_key.p != p || &public_key.g != g {
      return Err(Error::InvalidGroup(
        "public key belongs to a different group".to_string(),
      ));
    }

    let m = bytes_to_integer(message);
    if m == 0 || &m >= p {
      return Err(Error::MessageOutOfRange);
    }

    let k = self.gen_exponent(rng);
    let c1 = pow_mod(g, &k, p);
    let shared = pow_mod(&public_key.y, &k, p);
    let c2 = (m * shared).rem_euc(p);

    Ok(Ciphertext { c1, c2 })
  }

  fn decrypt(
    &self,
    ciphertext: &Ciphertext,
    private_key: &PrivateKey,
  ) -> Result<Vec<u8>> {
    let p = &self.group.p;
    let Ciphertext { c1, c2 } = ciphertext;
    for c in [c1, c2] {
      if *c <= 0 || c >= p {
        return Err(Error::Decryption(
          "ciphertext component lies outside [1, p)".to_string(),
        ));
      }
    }

    let x = private_key.x.clone().rem_euc(p);
    let shared = pow_mod(c1, &x, p);
    let shared_inv = shared.invert(p).map_err(|_| {
      Error::Decryption("shared secret is not invertible".to_string())
    })?;
    let m = (shared_inv * c2).rem_euc(p);

    Ok(integer_to_bytes(&m))
  }
}

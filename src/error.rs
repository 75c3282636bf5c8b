use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("rows {first:?} and {second:?} of the garbled table hash to the same key")]
  HashCollision {
    first: (bool, bool),
    second: (bool, bool),
  },
  #[error("no garbled table row matches the supplied input labels")]
  Lookup,
  #[error("label of {actual} bytes exceeds the fixed width of {target} bytes")]
  Length {
    actual: usize,
    target: usize,
  },
  #[error("public key {index} is not on the expected arithmetic progression")]
  ApVerification {
    index: usize,
  },
  #[error("decryption failed: {0}")]
  Decryption(String),
  #[error("message must encode to an integer in [1, p)")]
  MessageOutOfRange,
  #[error("invalid group parameters: {0}")]
  InvalidGroup(String),
  #[error("choice {choice} is out of range for {n} messages")]
  InvalidChoice {
    choice: usize,
    n: usize,
  },
  #[error("expected {expected} public keys or ciphertexts but got {actual}")]
  KeyCountMismatch {
    expected: usize,
    actual: usize,
  },
  #[error("wire {0} is not an input wire of the circuit")]
  UnknownWire(usize),
  #[error("network: {0}")]
  Network(String),
  #[error("serialization: {0}")]
  Serialization(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

use crate::{
  building_block::{
    elgamal::DiscreteLogCrypto,
    garbled_table::GarbledTable,
    gate_type::GateType,
    wire_label::WireLabel,
    wires::Wires,
  },
  error::Result,
};
use rug::rand::MutRandState;
use serde::{Deserialize, Serialize};
use tracing::debug;

// A garbled gate whose output label feeds another gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
  pub index: usize,
  pub gate_type: GateType,
  pub out: usize,
  pub left: usize,
  pub right: usize,
  pub garbled_table: GarbledTable,
}

impl Gate {
  #[allow(clippy::too_many_arguments)]
  pub fn new<E>(
    crypto: &E,
    index: usize,
    gate_type: GateType,
    out: usize,
    left: usize,
    right: usize,
    wires: &Wires,
    rng: &mut dyn MutRandState,
  ) -> Result<Self>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    let garbled_table = GarbledTable::new(
      crypto,
      out,
      left,
      right,
      GateType::func(&gate_type),
      wires,
      rng,
    )?;
    debug!(index, ?gate_type, "garbled gate");

    Ok(Gate {
      index,
      gate_type,
      out,
      left,
      right,
      garbled_table,
    })
  }

  pub fn evaluate<E>(
    &self,
    crypto: &E,
    left_label: &WireLabel,
    right_label: &WireLabel,
  ) -> Result<WireLabel>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    let decrypted = self.garbled_table.evaluate(
      crypto,
      left_label.as_bytes(),
      right_label.as_bytes(),
    )?;
    WireLabel::from_decrypted(&decrypted)
  }
}

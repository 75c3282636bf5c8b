use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateType {
  And,
  Or,
  Xor,
  Nand,
  Nor,
  Xnor,
}

impl GateType {
  pub fn eval(&self, a: bool, b: bool) -> bool {
    match self {
      GateType::And => a && b,
      GateType::Or => a || b,
      GateType::Xor => a ^ b,
      GateType::Nand => !(a && b),
      GateType::Nor => !(a || b),
      GateType::Xnor => !(a ^ b),
    }
  }

  pub fn func(gate_type: &GateType) -> Box<dyn Fn(bool, bool) -> bool> {
    let gate_type = *gate_type;
    Box::new(move |a, b| gate_type.eval(a, b))
  }
}

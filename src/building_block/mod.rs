pub mod additive_group;
pub mod elgamal;
pub mod garbled_table;
pub mod gate;
pub mod gate_type;
pub mod ot;
pub mod output_decoding_table;
pub mod util;
pub mod wire;
pub mod wires;
pub mod wire_label;

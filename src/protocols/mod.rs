pub mod network;
pub mod yao_gc;

pub mod arithmetic_progression;
pub mod commutative;

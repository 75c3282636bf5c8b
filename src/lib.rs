pub mod building_block;
pub mod config;
pub mod error;
pub mod protocols;

pub use error::{Error, Result};

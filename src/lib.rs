pub mod error;
pub mod nn;
pub mod repr;
pub mod vectors;

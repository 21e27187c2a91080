//! Cutting-plane driver for integer programs.

mod gomory;

pub use gomory::{CutRecord, CuttingPlane};

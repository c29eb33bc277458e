//! Admin authorization gate.

pub mod gate;

pub use gate::{AdminDecision, AdminGate};

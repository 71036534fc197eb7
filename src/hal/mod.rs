// src/hal/mod.rs
//! Hardware Abstraction Layer for the armband

pub mod traits;
pub mod types;
pub mod events;
pub mod simulator;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use traits::*;
pub use types::*;
pub use events::*;

//! Armband simulation
//! Location: src/hal/simulation/mod.rs

pub mod signal_generator;

pub use signal_generator::MyoSignalGenerator;

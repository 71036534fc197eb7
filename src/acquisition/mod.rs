// src/acquisition/mod.rs
//! Sample buffering and the event listener that feeds it

pub mod ring_buffer;
pub mod sample_store;
pub mod listener;

pub use ring_buffer::*;
pub use sample_store::*;
pub use listener::*;
